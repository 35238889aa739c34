//! The message codec family: per-schema pack/unpack layered on the
//! primitive codec, presence vectors, and the header codec.
//!
//! Mirrors `lifx-core::msg`'s split: [`RawMessage`] is header + opaque
//! payload bytes (what actually crosses the wire), [`Message`] is the
//! decoded, typed form. [`Message::get_num`]/[`Message::from_raw`] play the
//! same role as their `lifx-core` namesakes; [`JausMessage`] adds the
//! `create`/`from_buffer`/`to_buffer` contract each schema needs, generically,
//! instead of repeating it per schema the way the source's per-message `.c`
//! files do.

use std::io::Cursor;

use crate::address::Address;
use crate::command_code as cc;
use crate::config::{
	ACK_NAK_NOT_REQUIRED, DEFAULT_PRIORITY, HEADER_SIZE_BYTES, UDP_HEADER_SIZE_BYTES, UDP_MARKER,
	VERSION_3_2,
};
use crate::error::{Error, Result};
use crate::event_limit::EventLimit;
use crate::header::{DataFlag, Header};
use crate::presence::{PresenceVector1, PresenceVector2, PresenceVector4};
use crate::primitive::{read_exact, read_scaled, write_scaled, WireRead, WireWrite};

/// Header + opaque payload: what is actually sent and received.
///
/// To interpret the payload, use [`Message::from_raw`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage {
	pub header: Header,
	pub payload: Vec<u8>,
}

impl RawMessage {
	/// Total encoded size: header plus payload.
	pub fn size_bytes(&self) -> usize {
		HEADER_SIZE_BYTES + self.payload.len()
	}

	/// Total encoded size including the UDP-framing marker.
	pub fn udp_size_bytes(&self) -> usize {
		self.size_bytes() + UDP_HEADER_SIZE_BYTES
	}

	/// Encodes header (with `data_size` re-derived from the actual payload
	/// length) followed by the payload.
	pub fn pack(&self) -> Result<Vec<u8>> {
		let mut header = self.header;
		header.data_size = self.payload.len() as u16;
		let mut out = Vec::with_capacity(self.size_bytes());
		header.encode(&mut out)?;
		out.extend_from_slice(&self.payload);
		Ok(out)
	}

	/// Same as [`RawMessage::pack`], prefixed with the `"JAUS"` marker.
	pub fn udp_pack(&self) -> Result<Vec<u8>> {
		let mut out = Vec::with_capacity(self.udp_size_bytes());
		out.extend_from_slice(&UDP_MARKER);
		out.extend(self.pack()?);
		Ok(out)
	}

	/// Strips the UDP marker if present, decodes the header, then takes
	/// exactly `header.data_size` bytes as the payload.
	pub fn unpack(buf: &[u8]) -> Result<RawMessage> {
		let body = strip_marker(buf);
		let mut cur = Cursor::new(body);
		let header = Header::decode(&mut cur)?;
		let payload = read_exact(&mut cur, header.data_size as usize)?;
		Ok(RawMessage { header, payload })
	}
}

fn strip_marker(buf: &[u8]) -> &[u8] {
	if buf.len() >= UDP_HEADER_SIZE_BYTES && buf[..UDP_HEADER_SIZE_BYTES] == UDP_MARKER {
		&buf[UDP_HEADER_SIZE_BYTES..]
	} else {
		buf
	}
}

/// One command/service entry in a [`ReportServices`] list.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
	pub command_code: u16,
	pub presence_vector: u32,
}

impl Command {
	fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
		buf.write_val(self.command_code)?;
		buf.write_val(self.presence_vector)
	}

	fn decode(cur: &mut Cursor<&[u8]>) -> Result<Self> {
		Ok(Self {
			command_code: cur.read_val()?,
			presence_vector: cur.read_val()?,
		})
	}
}

fn encode_command_list(buf: &mut Vec<u8>, commands: &[Command]) -> Result<()> {
	buf.write_val(commands.len() as u8)?;
	for c in commands {
		c.encode(buf)?;
	}
	Ok(())
}

fn decode_command_list(cur: &mut Cursor<&[u8]>) -> Result<Vec<Command>> {
	let count: u8 = cur.read_val()?;
	(0..count).map(|_| Command::decode(cur)).collect()
}

/// One service entry in [`ReportServices`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEntry {
	pub service_type: u16,
	pub input_commands: Vec<Command>,
	pub output_commands: Vec<Command>,
}

/// `SetWrenchEffort` — command effort levels for a platform's actuators.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetWrenchEffort {
	pub propulsive_linear_x: Option<f64>,
	pub propulsive_linear_y: Option<f64>,
	pub propulsive_linear_z: Option<f64>,
	pub propulsive_rotational_x: Option<f64>,
	pub propulsive_rotational_y: Option<f64>,
	pub propulsive_rotational_z: Option<f64>,
	pub resistive_linear_x: Option<f64>,
	pub resistive_linear_y: Option<f64>,
	pub resistive_linear_z: Option<f64>,
	pub resistive_rotational_x: Option<f64>,
	pub resistive_rotational_y: Option<f64>,
	pub resistive_rotational_z: Option<f64>,
}

const WRENCH_PROPULSIVE_RANGE: (f64, f64) = (-100.0, 100.0);
const WRENCH_RESISTIVE_RANGE: (f64, f64) = (0.0, 100.0);

impl SetWrenchEffort {
	fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
		let mut pv = PresenceVector2::new();
		let fields: [Option<f64>; 6] = [
			self.propulsive_linear_x,
			self.propulsive_linear_y,
			self.propulsive_linear_z,
			self.propulsive_rotational_x,
			self.propulsive_rotational_y,
			self.propulsive_rotational_z,
		];
		for (i, f) in fields.iter().enumerate() {
			if f.is_some() {
				pv.set(i as u32);
			}
		}
		let resistive: [Option<f64>; 6] = [
			self.resistive_linear_x,
			self.resistive_linear_y,
			self.resistive_linear_z,
			self.resistive_rotational_x,
			self.resistive_rotational_y,
			self.resistive_rotational_z,
		];
		for (i, f) in resistive.iter().enumerate() {
			if f.is_some() {
				pv.set(6 + i as u32);
			}
		}
		pv.encode(buf)?;
		let (lo, hi) = WRENCH_PROPULSIVE_RANGE;
		for f in fields.iter().flatten() {
			write_scaled::<i16>(buf, *f, lo, hi)?;
		}
		let (lo, hi) = WRENCH_RESISTIVE_RANGE;
		for f in resistive.iter().flatten() {
			write_scaled::<u8>(buf, *f, lo, hi)?;
		}
		Ok(())
	}

	fn decode(cur: &mut Cursor<&[u8]>) -> Result<Self> {
		let pv = PresenceVector2::decode(cur)?;
		let (plo, phi) = WRENCH_PROPULSIVE_RANGE;
		let (rlo, rhi) = WRENCH_RESISTIVE_RANGE;
		let mut out = SetWrenchEffort::default();
		if pv.is_set(0) {
			out.propulsive_linear_x = Some(read_scaled::<i16>(cur, plo, phi)?);
		}
		if pv.is_set(1) {
			out.propulsive_linear_y = Some(read_scaled::<i16>(cur, plo, phi)?);
		}
		if pv.is_set(2) {
			out.propulsive_linear_z = Some(read_scaled::<i16>(cur, plo, phi)?);
		}
		if pv.is_set(3) {
			out.propulsive_rotational_x = Some(read_scaled::<i16>(cur, plo, phi)?);
		}
		if pv.is_set(4) {
			out.propulsive_rotational_y = Some(read_scaled::<i16>(cur, plo, phi)?);
		}
		if pv.is_set(5) {
			out.propulsive_rotational_z = Some(read_scaled::<i16>(cur, plo, phi)?);
		}
		if pv.is_set(6) {
			out.resistive_linear_x = Some(read_scaled::<u8>(cur, rlo, rhi)?);
		}
		if pv.is_set(7) {
			out.resistive_linear_y = Some(read_scaled::<u8>(cur, rlo, rhi)?);
		}
		if pv.is_set(8) {
			out.resistive_linear_z = Some(read_scaled::<u8>(cur, rlo, rhi)?);
		}
		if pv.is_set(9) {
			out.resistive_rotational_x = Some(read_scaled::<u8>(cur, rlo, rhi)?);
		}
		if pv.is_set(10) {
			out.resistive_rotational_y = Some(read_scaled::<u8>(cur, rlo, rhi)?);
		}
		if pv.is_set(11) {
			out.resistive_rotational_z = Some(read_scaled::<u8>(cur, rlo, rhi)?);
		}
		Ok(out)
	}
}

/// `QueryWrenchEffort` — asks for a `SetWrenchEffort`-shaped report; the
/// presence vector selects which fields the reply should include.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryWrenchEffort {
	pub pv: PresenceVector2,
}

impl QueryWrenchEffort {
	fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
		self.pv.encode(buf)
	}

	fn decode(cur: &mut Cursor<&[u8]>) -> Result<Self> {
		Ok(Self {
			pv: PresenceVector2::decode(cur)?,
		})
	}
}

/// `ReportVelocityState` — linear/angular velocity and timestamp.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportVelocityState {
	pub velocity_x: Option<f64>,
	pub velocity_y: Option<f64>,
	pub velocity_z: Option<f64>,
	pub velocity_rms: Option<f64>,
	pub roll_rate: Option<f64>,
	pub pitch_rate: Option<f64>,
	pub yaw_rate: Option<f64>,
	pub rate_rms: Option<f64>,
	pub time_stamp: Option<u32>,
}

const VELOCITY_RANGE: (f64, f64) = (-65.534, 65.534);
const VELOCITY_RMS_RANGE: (f64, f64) = (0.0, 100.0);
const RATE_RANGE: (f64, f64) = (-32.767, 32.767);
const RATE_RMS_RANGE: (f64, f64) = (0.0, std::f64::consts::PI);

impl ReportVelocityState {
	fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
		let mut pv = PresenceVector2::new();
		let bits = [
			self.velocity_x.is_some(),
			self.velocity_y.is_some(),
			self.velocity_z.is_some(),
			self.velocity_rms.is_some(),
			self.roll_rate.is_some(),
			self.pitch_rate.is_some(),
			self.yaw_rate.is_some(),
			self.rate_rms.is_some(),
			self.time_stamp.is_some(),
		];
		for (i, set) in bits.iter().enumerate() {
			if *set {
				pv.set(i as u32);
			}
		}
		pv.encode(buf)?;
		let (lo, hi) = VELOCITY_RANGE;
		if let Some(v) = self.velocity_x {
			write_scaled::<i32>(buf, v, lo, hi)?;
		}
		if let Some(v) = self.velocity_y {
			write_scaled::<i32>(buf, v, lo, hi)?;
		}
		if let Some(v) = self.velocity_z {
			write_scaled::<i32>(buf, v, lo, hi)?;
		}
		if let Some(v) = self.velocity_rms {
			let (lo, hi) = VELOCITY_RMS_RANGE;
			write_scaled::<u32>(buf, v, lo, hi)?;
		}
		let (lo, hi) = RATE_RANGE;
		if let Some(v) = self.roll_rate {
			write_scaled::<i16>(buf, v, lo, hi)?;
		}
		if let Some(v) = self.pitch_rate {
			write_scaled::<i16>(buf, v, lo, hi)?;
		}
		if let Some(v) = self.yaw_rate {
			write_scaled::<i16>(buf, v, lo, hi)?;
		}
		if let Some(v) = self.rate_rms {
			let (lo, hi) = RATE_RMS_RANGE;
			write_scaled::<u16>(buf, v, lo, hi)?;
		}
		if let Some(t) = self.time_stamp {
			buf.write_val(t)?;
		}
		Ok(())
	}

	fn decode(cur: &mut Cursor<&[u8]>) -> Result<Self> {
		let pv = PresenceVector2::decode(cur)?;
		let mut out = ReportVelocityState::default();
		let (vlo, vhi) = VELOCITY_RANGE;
		if pv.is_set(0) {
			out.velocity_x = Some(read_scaled::<i32>(cur, vlo, vhi)?);
		}
		if pv.is_set(1) {
			out.velocity_y = Some(read_scaled::<i32>(cur, vlo, vhi)?);
		}
		if pv.is_set(2) {
			out.velocity_z = Some(read_scaled::<i32>(cur, vlo, vhi)?);
		}
		if pv.is_set(3) {
			let (lo, hi) = VELOCITY_RMS_RANGE;
			out.velocity_rms = Some(read_scaled::<u32>(cur, lo, hi)?);
		}
		let (rlo, rhi) = RATE_RANGE;
		if pv.is_set(4) {
			out.roll_rate = Some(read_scaled::<i16>(cur, rlo, rhi)?);
		}
		if pv.is_set(5) {
			out.pitch_rate = Some(read_scaled::<i16>(cur, rlo, rhi)?);
		}
		if pv.is_set(6) {
			out.yaw_rate = Some(read_scaled::<i16>(cur, rlo, rhi)?);
		}
		if pv.is_set(7) {
			let (lo, hi) = RATE_RMS_RANGE;
			out.rate_rms = Some(read_scaled::<u16>(cur, lo, hi)?);
		}
		if pv.is_set(8) {
			out.time_stamp = Some(cur.read_val()?);
		}
		Ok(out)
	}
}

/// `CreateEvent` — registers an event condition with a component,
/// carrying a nested query message describing what to report.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateEvent {
	pub message_code: u16,
	pub event_type: u8,
	pub boundary: Option<u8>,
	pub limit_data_type: Option<u8>,
	pub data_field: Option<u8>,
	pub lower_limit: Option<EventLimit>,
	pub upper_limit: Option<EventLimit>,
	pub state_limit: Option<EventLimit>,
	pub min_rate: Option<f64>,
	pub requested_rate: Option<f64>,
	pub query_message: Box<Message>,
}

const RATE_HZ_RANGE: (f64, f64) = (0.0, 1092.0);

impl CreateEvent {
	fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
		let mut pv = PresenceVector1::new();
		if self.boundary.is_some() {
			pv.set(0);
		}
		if self.limit_data_type.is_some() {
			pv.set(1);
		}
		if self.data_field.is_some() {
			pv.set(2);
		}
		if self.lower_limit.is_some() {
			pv.set(3);
		}
		if self.upper_limit.is_some() {
			pv.set(4);
		}
		if self.state_limit.is_some() {
			pv.set(5);
		}
		if self.min_rate.is_some() {
			pv.set(6);
		}
		if self.requested_rate.is_some() {
			pv.set(7);
		}
		pv.encode(buf)?;
		buf.write_val(self.message_code)?;
		buf.write_val(self.event_type)?;
		if let Some(b) = self.boundary {
			buf.write_val(b)?;
		}
		if let Some(t) = self.limit_data_type {
			buf.write_val(t)?;
		}
		if let Some(f) = self.data_field {
			buf.write_val(f)?;
		}
		if let Some(l) = &self.lower_limit {
			l.encode(buf)?;
		}
		if let Some(l) = &self.upper_limit {
			l.encode(buf)?;
		}
		if let Some(l) = &self.state_limit {
			l.encode(buf)?;
		}
		let (lo, hi) = RATE_HZ_RANGE;
		if let Some(v) = self.min_rate {
			write_scaled::<u16>(buf, v, lo, hi)?;
		}
		if let Some(v) = self.requested_rate {
			write_scaled::<u16>(buf, v, lo, hi)?;
		}
		self.query_message.encode_nested(buf)?;
		Ok(())
	}

	fn decode(cur: &mut Cursor<&[u8]>) -> Result<Self> {
		let pv = PresenceVector1::decode(cur)?;
		let message_code: u16 = cur.read_val()?;
		let event_type: u8 = cur.read_val()?;
		let boundary = if pv.is_set(0) {
			Some(cur.read_val()?)
		} else {
			None
		};
		let limit_data_type: Option<u8> = if pv.is_set(1) {
			Some(cur.read_val()?)
		} else {
			None
		};
		let data_field = if pv.is_set(2) {
			Some(cur.read_val()?)
		} else {
			None
		};
		let limit_tag = || {
			limit_data_type.ok_or_else(|| {
				Error::ProtocolError(
					"CreateEvent: an event limit field is present but limit_data_type is absent".into(),
				)
			})
		};
		let lower_limit = if pv.is_set(3) {
			Some(EventLimit::decode(cur, limit_tag()?)?)
		} else {
			None
		};
		let upper_limit = if pv.is_set(4) {
			Some(EventLimit::decode(cur, limit_tag()?)?)
		} else {
			None
		};
		let state_limit = if pv.is_set(5) {
			Some(EventLimit::decode(cur, limit_tag()?)?)
		} else {
			None
		};
		let (lo, hi) = RATE_HZ_RANGE;
		let min_rate = if pv.is_set(6) {
			Some(read_scaled::<u16>(cur, lo, hi)?)
		} else {
			None
		};
		let requested_rate = if pv.is_set(7) {
			Some(read_scaled::<u16>(cur, lo, hi)?)
		} else {
			None
		};
		let query_message = Box::new(Message::decode_nested(cur)?);
		Ok(Self {
			message_code,
			event_type,
			boundary,
			limit_data_type,
			data_field,
			lower_limit,
			upper_limit,
			state_limit,
			min_rate,
			requested_rate,
			query_message,
		})
	}
}

/// `QueryEvents` — the query counterpart to `CreateEvent`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryEvents {
	pub message_code: Option<u16>,
	pub event_type: Option<u8>,
	pub event_id: Option<u8>,
}

impl QueryEvents {
	fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
		let mut pv = PresenceVector1::new();
		if self.message_code.is_some() {
			pv.set(0);
		}
		if self.event_type.is_some() {
			pv.set(1);
		}
		if self.event_id.is_some() {
			pv.set(2);
		}
		pv.encode(buf)?;
		if let Some(v) = self.message_code {
			buf.write_val(v)?;
		}
		if let Some(v) = self.event_type {
			buf.write_val(v)?;
		}
		if let Some(v) = self.event_id {
			buf.write_val(v)?;
		}
		Ok(())
	}

	fn decode(cur: &mut Cursor<&[u8]>) -> Result<Self> {
		let pv = PresenceVector1::decode(cur)?;
		Ok(Self {
			message_code: if pv.is_set(0) {
				Some(cur.read_val()?)
			} else {
				None
			},
			event_type: if pv.is_set(1) {
				Some(cur.read_val()?)
			} else {
				None
			},
			event_id: if pv.is_set(2) {
				Some(cur.read_val()?)
			} else {
				None
			},
		})
	}
}

/// `ReportServices` — the services a component offers, each with its
/// accepted input/output command list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportServices {
	pub services: Vec<ServiceEntry>,
}

impl ReportServices {
	fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
		buf.write_val(self.services.len() as u8)?;
		for s in &self.services {
			buf.write_val(s.service_type)?;
			encode_command_list(buf, &s.input_commands)?;
			encode_command_list(buf, &s.output_commands)?;
		}
		Ok(())
	}

	fn decode(cur: &mut Cursor<&[u8]>) -> Result<Self> {
		let count: u8 = cur.read_val()?;
		if count < 1 {
			return Err(Error::ProtocolError(
				"ReportServices requires at least one service".into(),
			));
		}
		let mut services = Vec::with_capacity(count as usize);
		for _ in 0..count {
			let service_type: u16 = cur.read_val()?;
			let input_commands = decode_command_list(cur)?;
			let output_commands = decode_command_list(cur)?;
			services.push(ServiceEntry {
				service_type,
				input_commands,
				output_commands,
			});
		}
		Ok(Self { services })
	}
}

const IDENTIFICATION_LEN: usize = 80;

/// `ReportIdentification` — free-text identification of a component.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportIdentification {
	pub query_type: u8,
	pub authority: u8,
	pub report_type: u16,
	pub identification: String,
}

impl ReportIdentification {
	fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
		buf.write_val(self.query_type)?;
		buf.write_val(self.authority)?;
		buf.write_val(self.report_type)?;
		let bytes = self.identification.as_bytes();
		let n = bytes.len().min(IDENTIFICATION_LEN - 1);
		buf.extend_from_slice(&bytes[..n]);
		buf.resize(buf.len() + (IDENTIFICATION_LEN - n), 0);
		Ok(())
	}

	fn decode(cur: &mut Cursor<&[u8]>) -> Result<Self> {
		let query_type: u8 = cur.read_val()?;
		let authority: u8 = cur.read_val()?;
		let report_type: u16 = cur.read_val()?;
		let raw = read_exact(cur, IDENTIFICATION_LEN)?;
		let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
		let identification = String::from_utf8_lossy(&raw[..end]).into_owned();
		Ok(Self {
			query_type,
			authority,
			report_type,
			identification,
		})
	}
}

/// `RequestComponentControl` — a fixed-shape command with no presence
/// vector: just the requesting authority code.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestComponentControl {
	pub authority_code: u8,
}

impl RequestComponentControl {
	fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
		buf.write_val(self.authority_code)
	}

	fn decode(cur: &mut Cursor<&[u8]>) -> Result<Self> {
		Ok(Self {
			authority_code: cur.read_val()?,
		})
	}
}

/// `ReportWaypointCount` — a fixed-shape report, no presence vector.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportWaypointCount {
	pub waypoint_count: u16,
}

impl ReportWaypointCount {
	fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
		buf.write_val(self.waypoint_count)
	}

	fn decode(cur: &mut Cursor<&[u8]>) -> Result<Self> {
		Ok(Self {
			waypoint_count: cur.read_val()?,
		})
	}
}

/// `QueryPlatformSpecifications` — a pure field-selector query whose
/// presence vector is wider (4 bytes) than `QueryWrenchEffort`'s because it
/// selects among more optional report fields than fit in two bytes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryPlatformSpecifications {
	pub pv: PresenceVector4,
}

impl QueryPlatformSpecifications {
	fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
		self.pv.encode(buf)
	}

	fn decode(cur: &mut Cursor<&[u8]>) -> Result<Self> {
		Ok(Self {
			pv: PresenceVector4::decode(cur)?,
		})
	}
}

/// Decoded, typed form of every message schema this crate knows about.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
	SetWrenchEffort(SetWrenchEffort),
	QueryWrenchEffort(QueryWrenchEffort),
	ReportVelocityState(ReportVelocityState),
	CreateEvent(CreateEvent),
	QueryEvents(QueryEvents),
	ReportServices(ReportServices),
	ReportIdentification(ReportIdentification),
	RequestComponentControl(RequestComponentControl),
	ReportWaypointCount(ReportWaypointCount),
	QueryPlatformSpecifications(QueryPlatformSpecifications),
}

impl Message {
	/// The command code identifying this schema on the wire.
	pub fn get_num(&self) -> u16 {
		match self {
			Message::SetWrenchEffort(_) => cc::SET_WRENCH_EFFORT,
			Message::QueryWrenchEffort(_) => cc::QUERY_WRENCH_EFFORT,
			Message::ReportVelocityState(_) => cc::REPORT_VELOCITY_STATE,
			Message::CreateEvent(_) => cc::CREATE_EVENT,
			Message::QueryEvents(_) => cc::QUERY_EVENTS,
			Message::ReportServices(_) => cc::REPORT_SERVICES,
			Message::ReportIdentification(_) => cc::REPORT_IDENTIFICATION,
			Message::RequestComponentControl(_) => cc::REQUEST_COMPONENT_CONTROL,
			Message::ReportWaypointCount(_) => cc::REPORT_WAYPOINT_COUNT,
			Message::QueryPlatformSpecifications(_) => cc::QUERY_PLATFORM_SPECIFICATIONS,
		}
	}

	/// True for the schemas living under the source's `experimental/`
	/// message group (`CreateEvent`, `QueryEvents`, `ReportServices`,
	/// `ReportIdentification`); used to set the header's `exp_flag` default.
	fn is_experimental(&self) -> bool {
		matches!(
			self,
			Message::CreateEvent(_)
				| Message::QueryEvents(_)
				| Message::ReportServices(_)
				| Message::ReportIdentification(_)
		)
	}

	/// Encodes just the payload (no header) in schema pack order.
	pub fn pack_payload(&self) -> Result<Vec<u8>> {
		let mut v = Vec::new();
		match self {
			Message::SetWrenchEffort(m) => m.encode(&mut v)?,
			Message::QueryWrenchEffort(m) => m.encode(&mut v)?,
			Message::ReportVelocityState(m) => m.encode(&mut v)?,
			Message::CreateEvent(m) => m.encode(&mut v)?,
			Message::QueryEvents(m) => m.encode(&mut v)?,
			Message::ReportServices(m) => m.encode(&mut v)?,
			Message::ReportIdentification(m) => m.encode(&mut v)?,
			Message::RequestComponentControl(m) => m.encode(&mut v)?,
			Message::ReportWaypointCount(m) => m.encode(&mut v)?,
			Message::QueryPlatformSpecifications(m) => m.encode(&mut v)?,
		}
		Ok(v)
	}

	/// Decodes a [`RawMessage`]'s payload according to its header's
	/// command code, failing with [`Error::ProtocolError`] when the code is
	/// not recognized and [`Error::LengthMismatch`] when the payload has
	/// leftover or missing bytes after decoding.
	pub fn from_raw(msg: &RawMessage) -> Result<Message> {
		let mut cur = Cursor::new(msg.payload.as_slice());
		let decoded = match msg.header.command_code {
			cc::SET_WRENCH_EFFORT => Message::SetWrenchEffort(SetWrenchEffort::decode(&mut cur)?),
			cc::QUERY_WRENCH_EFFORT => Message::QueryWrenchEffort(QueryWrenchEffort::decode(&mut cur)?),
			cc::REPORT_VELOCITY_STATE => {
				Message::ReportVelocityState(ReportVelocityState::decode(&mut cur)?)
			}
			cc::CREATE_EVENT => Message::CreateEvent(CreateEvent::decode(&mut cur)?),
			cc::QUERY_EVENTS => Message::QueryEvents(QueryEvents::decode(&mut cur)?),
			cc::REPORT_SERVICES => Message::ReportServices(ReportServices::decode(&mut cur)?),
			cc::REPORT_IDENTIFICATION => {
				Message::ReportIdentification(ReportIdentification::decode(&mut cur)?)
			}
			cc::REQUEST_COMPONENT_CONTROL => {
				Message::RequestComponentControl(RequestComponentControl::decode(&mut cur)?)
			}
			cc::REPORT_WAYPOINT_COUNT => {
				Message::ReportWaypointCount(ReportWaypointCount::decode(&mut cur)?)
			}
			cc::QUERY_PLATFORM_SPECIFICATIONS => {
				Message::QueryPlatformSpecifications(QueryPlatformSpecifications::decode(&mut cur)?)
			}
			other => return Err(Error::ProtocolError(format!("unrecognized command code {other:#06x}"))),
		};
		let consumed = cur.position() as usize;
		if consumed != msg.payload.len() {
			return Err(Error::LengthMismatch {
				declared: msg.payload.len(),
				consumed,
			});
		}
		Ok(decoded)
	}

	/// Encodes this message as a nested sub-message: header, then payload,
	/// `data_size` re-derived from the payload actually written — used by
	/// `CreateEvent`'s embedded query.
	fn encode_nested(&self, buf: &mut Vec<u8>) -> Result<()> {
		let payload = self.pack_payload()?;
		let header = Header {
			priority: DEFAULT_PRIORITY,
			ack_nak: ACK_NAK_NOT_REQUIRED,
			sc_flag: false,
			exp_flag: self.is_experimental(),
			version: VERSION_3_2,
			command_code: self.get_num(),
			destination: Address::default(),
			source: Address::default(),
			data_size: payload.len() as u16,
			data_flag: DataFlag::Single,
			sequence_number: 0,
		};
		header.encode(buf)?;
		buf.extend_from_slice(&payload);
		Ok(())
	}

	/// Decodes a nested sub-message: reads its header, then exactly
	/// `header.data_size` payload bytes, then dispatches on command code —
	/// the "nested-message length" rule (length comes from the
	/// sub-message's own header, not an enclosing length field).
	fn decode_nested(cur: &mut Cursor<&[u8]>) -> Result<Message> {
		let header = Header::decode(cur)?;
		let payload = read_exact(cur, header.data_size as usize)?;
		Message::from_raw(&RawMessage { header, payload })
	}
}

/// Header-carrying wrapper implementing the full per-schema contract
/// (`create`/`from_buffer`/`to_buffer`/UDP variants/size predicates)
/// generically across every [`Message`] variant, collapsing what the
/// source repeats per message file into one path.
#[derive(Debug, Clone, PartialEq)]
pub struct JausMessage {
	pub header: Header,
	pub message: Message,
}

impl JausMessage {
	/// Builds a message with schema-appropriate header defaults: priority
	/// 6, no ack/nak, `scFlag` off, `version` 3.2, sequence 0, `expFlag` on
	/// for the source's `experimental/` message group.
	pub fn create(message: Message) -> Self {
		let header = Header {
			priority: DEFAULT_PRIORITY,
			ack_nak: ACK_NAK_NOT_REQUIRED,
			sc_flag: false,
			exp_flag: message.is_experimental(),
			version: VERSION_3_2,
			command_code: message.get_num(),
			destination: Address::default(),
			source: Address::default(),
			data_size: 0,
			data_flag: DataFlag::Single,
			sequence_number: 0,
		};
		Self { header, message }
	}

	pub fn size_bytes(&self) -> usize {
		HEADER_SIZE_BYTES + self.message.pack_payload().map(|p| p.len()).unwrap_or(0)
	}

	pub fn udp_size_bytes(&self) -> usize {
		self.size_bytes() + UDP_HEADER_SIZE_BYTES
	}

	/// Encodes payload, re-derives `data_size`, then encodes the header.
	pub fn to_buffer(&self) -> Result<Vec<u8>> {
		let payload = self.message.pack_payload()?;
		let mut header = self.header;
		header.data_size = payload.len() as u16;
		let mut out = Vec::with_capacity(HEADER_SIZE_BYTES + payload.len());
		header.encode(&mut out)?;
		out.extend_from_slice(&payload);
		Ok(out)
	}

	pub fn udp_to_buffer(&self) -> Result<Vec<u8>> {
		let mut out = Vec::with_capacity(self.udp_size_bytes());
		out.extend_from_slice(&UDP_MARKER);
		out.extend(self.to_buffer()?);
		Ok(out)
	}

	/// Strips the marker if present, decodes the header, verifies the
	/// command code matches `expected`, decodes the payload, and requires
	/// that decoding consumed exactly `header.data_size` bytes.
	pub fn from_buffer(buf: &[u8], expected: u16) -> Result<Self> {
		let raw = RawMessage::unpack(buf)?;
		if raw.header.command_code != expected {
			return Err(Error::WrongType {
				expected,
				actual: raw.header.command_code,
			});
		}
		let message = Message::from_raw(&raw)?;
		Ok(Self {
			header: raw.header,
			message,
		})
	}

	pub fn udp_from_buffer(buf: &[u8], expected: u16) -> Result<Self> {
		Self::from_buffer(buf, expected)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn set_wrench_effort_empty_pv_is_two_bytes() {
		let m = JausMessage::create(Message::SetWrenchEffort(SetWrenchEffort::default()));
		let buf = m.to_buffer().unwrap();
		assert_eq!(buf.len(), HEADER_SIZE_BYTES + 2);
		assert_eq!(&buf[12..14], &2u16.to_le_bytes()[..]);
	}

	#[test]
	fn set_wrench_effort_round_trips() {
		let body = SetWrenchEffort {
			propulsive_linear_x: Some(50.0),
			resistive_rotational_z: Some(25.0),
			..Default::default()
		};
		let m = JausMessage::create(Message::SetWrenchEffort(body));
		let buf = m.to_buffer().unwrap();
		let decoded = JausMessage::from_buffer(&buf, cc::SET_WRENCH_EFFORT).unwrap();
		match decoded.message {
			Message::SetWrenchEffort(b) => {
				assert!((b.propulsive_linear_x.unwrap() - 50.0).abs() < 0.01);
				assert!((b.resistive_rotational_z.unwrap() - 25.0).abs() < 0.5);
				assert!(b.propulsive_linear_y.is_none());
			}
			_ => panic!("wrong variant"),
		}
	}

	#[test]
	fn report_velocity_state_scenario_a() {
		let body = ReportVelocityState {
			velocity_x: Some(1.0),
			yaw_rate: Some(-1.5),
			..Default::default()
		};
		let m = JausMessage::create(Message::ReportVelocityState(body));
		let buf = m.to_buffer().unwrap();
		assert_eq!(buf.len(), HEADER_SIZE_BYTES + 8);
		let decoded = JausMessage::from_buffer(&buf, cc::REPORT_VELOCITY_STATE).unwrap();
		match decoded.message {
			Message::ReportVelocityState(b) => {
				let eps = 65.534 * 2.0 / (u32::MAX as f64);
				assert!((b.velocity_x.unwrap() - 1.0).abs() <= eps);
				let eps2 = 32.767 * 2.0 / (u16::MAX as f64);
				assert!((b.yaw_rate.unwrap() - (-1.5)).abs() <= eps2);
			}
			_ => panic!("wrong variant"),
		}
	}

	#[test]
	fn report_identification_truncates_and_nul_terminates() {
		let body = ReportIdentification {
			query_type: 1,
			authority: 2,
			report_type: 3,
			identification: "A".repeat(100),
		};
		let m = JausMessage::create(Message::ReportIdentification(body));
		let buf = m.to_buffer().unwrap();
		let field = &buf[HEADER_SIZE_BYTES + 4..HEADER_SIZE_BYTES + 4 + IDENTIFICATION_LEN];
		assert_eq!(field.len(), IDENTIFICATION_LEN);
		assert_eq!(field[IDENTIFICATION_LEN - 1], 0);
		assert!(field[..IDENTIFICATION_LEN - 1].iter().all(|&b| b == b'A'));
	}

	#[test]
	fn report_services_rejects_empty_list() {
		let buf = vec![0u8];
		let mut cur = Cursor::new(buf.as_slice());
		let err = ReportServices::decode(&mut cur).unwrap_err();
		assert!(matches!(err, Error::ProtocolError(_)));
	}

	#[test]
	fn report_services_round_trips() {
		let body = ReportServices {
			services: vec![ServiceEntry {
				service_type: 42,
				input_commands: vec![Command {
					command_code: 1,
					presence_vector: 0xFF,
				}],
				output_commands: vec![],
			}],
		};
		let m = JausMessage::create(Message::ReportServices(body.clone()));
		let buf = m.to_buffer().unwrap();
		let decoded = JausMessage::from_buffer(&buf, cc::REPORT_SERVICES).unwrap();
		match decoded.message {
			Message::ReportServices(b) => assert_eq!(b, body),
			_ => panic!("wrong variant"),
		}
	}

	#[test]
	fn create_event_nests_a_query_message() {
		let query = Message::QueryWrenchEffort(QueryWrenchEffort {
			pv: PresenceVector2(0x0003),
		});
		let body = CreateEvent {
			message_code: cc::SET_WRENCH_EFFORT,
			event_type: 1,
			boundary: None,
			limit_data_type: None,
			data_field: None,
			lower_limit: None,
			upper_limit: None,
			state_limit: None,
			min_rate: None,
			requested_rate: None,
			query_message: Box::new(query),
		};
		let m = JausMessage::create(Message::CreateEvent(body));
		let buf = m.to_buffer().unwrap();
		let decoded = JausMessage::from_buffer(&buf, cc::CREATE_EVENT).unwrap();
		match decoded.message {
			Message::CreateEvent(b) => match *b.query_message {
				Message::QueryWrenchEffort(q) => assert_eq!(q.pv.0, 0x0003),
				_ => panic!("wrong nested variant"),
			},
			_ => panic!("wrong variant"),
		}
	}

	#[test]
	fn wrong_command_code_errors() {
		let m = JausMessage::create(Message::ReportWaypointCount(ReportWaypointCount {
			waypoint_count: 4,
		}));
		let buf = m.to_buffer().unwrap();
		let err = JausMessage::from_buffer(&buf, cc::SET_WRENCH_EFFORT).unwrap_err();
		assert!(matches!(err, Error::WrongType { .. }));
	}

	#[test]
	fn udp_variant_prepends_marker() {
		let m = JausMessage::create(Message::RequestComponentControl(RequestComponentControl {
			authority_code: 7,
		}));
		let buf = m.udp_to_buffer().unwrap();
		assert_eq!(&buf[..4], b"JAUS");
		assert_eq!(&buf[4..], &m.to_buffer().unwrap()[..]);
	}
}
