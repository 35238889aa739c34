//! A wire-format message codec and Large Message Handler for the JAUS
//! (Joint Architecture for Unmanned Systems) v3.2/v3.3 messaging stack.
//!
//! This crate is the narrow, hard core of a JAUS component: it encodes and
//! decodes the common 16-byte header and the per-message schemas built on
//! top of it, and it fragments/reassembles messages too large for a single
//! datagram. Socket I/O, routing, the component directory, and
//! service-connection bookkeeping are someone else's problem — this crate
//! exposes only the two narrow interfaces they need: [`lmh::Transport`] for
//! emitting fragments, and [`lmh::Delivery`] for routing an assembled
//! message to the right sink.
//!
//! # Layout
//!
//! Leaves first: [`primitive`] (little-endian scalar codec and the
//! affine scaled-integer conversion), [`presence`] (bitmask-gated optional
//! fields), [`address`], [`header`] (the common 16-byte header),
//! [`event_limit`] (the tagged-variant event/feature-class limit type),
//! then [`messages`] (the per-schema codec family) and [`lmh`] (the
//! fragmentation/reassembly state machine).
//!
//! # Reserved fields
//! When constructing messages, leave reserved fields at zero. Be
//! conservative in what you send; this decoder does not reject reserved
//! bits set to unexpected values on receive.

mod address;
mod command_code;
mod config;
mod error;
mod event_limit;
mod header;
mod lmh;
mod messages;
mod presence;
mod primitive;

pub use address::Address;
pub use command_code as codes;
pub use config::*;
pub use error::{Error, Result};
pub use event_limit::{EventLimit, FeatureClassAttribute};
pub use header::{DataFlag, Header};
pub use lmh::{Delivery, Lmh, Transport};
pub use messages::{
	Command, CreateEvent, JausMessage, Message, QueryEvents, QueryPlatformSpecifications,
	QueryWrenchEffort, RawMessage, ReportIdentification, ReportServices, ReportVelocityState,
	ReportWaypointCount, RequestComponentControl, ServiceEntry, SetWrenchEffort,
};
pub use presence::{PresenceVector1, PresenceVector2, PresenceVector4};
pub use primitive::{ScaledInteger, WireRead, WireWrite};

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn header_round_trips_through_a_message() {
		let m = JausMessage::create(Message::RequestComponentControl(RequestComponentControl {
			authority_code: 200,
		}));
		let bytes = m.to_buffer().unwrap();
		assert_eq!(bytes.len(), m.size_bytes());
		let decoded = JausMessage::from_buffer(&bytes, codes::REQUEST_COMPONENT_CONTROL).unwrap();
		assert_eq!(decoded, m);
	}

	#[test]
	fn udp_framing_round_trips() {
		let m = JausMessage::create(Message::ReportWaypointCount(ReportWaypointCount {
			waypoint_count: 12,
		}));
		let framed = m.udp_to_buffer().unwrap();
		assert_eq!(&framed[..4], b"JAUS");
		let decoded = JausMessage::udp_from_buffer(&framed, codes::REPORT_WAYPOINT_COUNT).unwrap();
		assert_eq!(decoded, m);
	}

	#[test]
	fn fragmentation_and_reassembly_share_the_same_lmh() {
		struct VecTransport(Vec<RawMessage>);
		impl Transport for VecTransport {
			fn send_one(&mut self, frag: RawMessage) {
				self.0.push(frag);
			}
		}

		let services = ReportServices {
			services: (0..255u16)
				.map(|i| ServiceEntry {
					service_type: i,
					input_commands: vec![
						Command {
							command_code: i,
							presence_vector: 0,
						};
						3
					],
					output_commands: vec![
						Command {
							command_code: i,
							presence_vector: 0xFF,
						};
						2
					],
				})
				.collect(),
		};
		let m = JausMessage::create(Message::ReportServices(services));
		let raw = RawMessage {
			header: m.header,
			payload: m.message.pack_payload().unwrap(),
		};

		let lmh = Lmh::new();
		let mut transport = VecTransport(Vec::new());
		lmh.send(&raw, &mut transport);
		assert!(transport.0.len() > 1, "payload should have needed fragmenting");

		let mut lmh = Lmh::new();
		let mut delivered = None;
		let mut sink = |d: Delivery| delivered = Some(d);
		for frag in transport.0 {
			lmh.receive_fragment(frag, &mut sink);
		}
		match delivered.unwrap() {
			Delivery::ReceiveQueue(assembled) => assert_eq!(assembled.payload, raw.payload),
			_ => panic!("expected receive queue delivery"),
		}
	}
}
