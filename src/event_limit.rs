//! Event Limit: a tagged variant whose wire footprint depends on a
//! discriminator byte supplied by the surrounding message (`CreateEvent`'s
//! `limit_data_type` field). The feature-class attribute used by
//! world-model messages (grounded in `jausWorldModelFeatureClass.c`) shares
//! the identical 11-value discriminator table, so it's a type alias rather
//! than a second enum.

use std::io::Cursor;

use crate::error::{Error, Result};
use crate::primitive::{read_exact, WireRead, WireWrite};

#[derive(Debug, Clone, PartialEq)]
pub enum EventLimit {
	Byte(i8),
	Short(i16),
	Int(i32),
	Long(i64),
	UnsignedShort(u16),
	UnsignedInt(u32),
	UnsignedLong(u64),
	Float(f32),
	Double(f64),
	JausString(String),
	Rgb([u8; 3]),
}

/// Same shape, same discriminator table — used by world-model messages.
pub type FeatureClassAttribute = EventLimit;

pub const TAG_BYTE: u8 = 0;
pub const TAG_SHORT: u8 = 1;
pub const TAG_INT: u8 = 2;
pub const TAG_LONG: u8 = 3;
pub const TAG_USHORT: u8 = 4;
pub const TAG_UINT: u8 = 5;
pub const TAG_ULONG: u8 = 6;
pub const TAG_FLOAT: u8 = 7;
pub const TAG_DOUBLE: u8 = 8;
pub const TAG_STRING: u8 = 9;
pub const TAG_RGB: u8 = 10;

impl EventLimit {
	pub fn discriminant(&self) -> u8 {
		match self {
			EventLimit::Byte(_) => TAG_BYTE,
			EventLimit::Short(_) => TAG_SHORT,
			EventLimit::Int(_) => TAG_INT,
			EventLimit::Long(_) => TAG_LONG,
			EventLimit::UnsignedShort(_) => TAG_USHORT,
			EventLimit::UnsignedInt(_) => TAG_UINT,
			EventLimit::UnsignedLong(_) => TAG_ULONG,
			EventLimit::Float(_) => TAG_FLOAT,
			EventLimit::Double(_) => TAG_DOUBLE,
			EventLimit::JausString(_) => TAG_STRING,
			EventLimit::Rgb(_) => TAG_RGB,
		}
	}

	/// Total encoded size for a given tag: the 1-byte discriminator plus
	/// the value's fixed width. Returns 0 for the variable-length string
	/// tag (whose total size depends on its length prefix, not the tag
	/// alone) and for unknown discriminators.
	pub fn encoded_size(tag: u8) -> usize {
		match tag {
			TAG_BYTE => 1 + 1,
			TAG_SHORT => 1 + 2,
			TAG_INT => 1 + 4,
			TAG_LONG => 1 + 8,
			TAG_USHORT => 1 + 2,
			TAG_UINT => 1 + 4,
			TAG_ULONG => 1 + 8,
			TAG_FLOAT => 1 + 4,
			TAG_DOUBLE => 1 + 8,
			TAG_RGB => 1 + 3,
			_ => 0,
		}
	}

	/// Writes `[tag, value...]`.
	pub fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
		buf.write_val(self.discriminant())?;
		match self {
			EventLimit::Byte(v) => buf.write_val(*v)?,
			EventLimit::Short(v) => buf.write_val(*v)?,
			EventLimit::Int(v) => buf.write_val(*v)?,
			EventLimit::Long(v) => buf.write_val(*v)?,
			EventLimit::UnsignedShort(v) => buf.write_val(*v)?,
			EventLimit::UnsignedInt(v) => buf.write_val(*v)?,
			EventLimit::UnsignedLong(v) => buf.write_val(*v)?,
			EventLimit::Float(v) => buf.write_val(*v)?,
			EventLimit::Double(v) => buf.write_val(*v)?,
			EventLimit::JausString(s) => {
				let bytes = s.as_bytes();
				buf.write_val(bytes.len() as u8)?;
				buf.extend_from_slice(bytes);
			}
			EventLimit::Rgb([r, g, b]) => {
				buf.write_val(*r)?;
				buf.write_val(*g)?;
				buf.write_val(*b)?;
			}
		}
		Ok(())
	}

	/// Reads the discriminator byte, verifies it matches `expected_tag`,
	/// then reads the value in that tag's width.
	pub fn decode(cur: &mut Cursor<&[u8]>, expected_tag: u8) -> Result<Self> {
		let tag: u8 = cur.read_val()?;
		if tag != expected_tag {
			return Err(Error::ProtocolError(format!(
				"event limit tag mismatch: expected {expected_tag}, got {tag}"
			)));
		}
		match tag {
			TAG_BYTE => Ok(EventLimit::Byte(cur.read_val()?)),
			TAG_SHORT => Ok(EventLimit::Short(cur.read_val()?)),
			TAG_INT => Ok(EventLimit::Int(cur.read_val()?)),
			TAG_LONG => Ok(EventLimit::Long(cur.read_val()?)),
			TAG_USHORT => Ok(EventLimit::UnsignedShort(cur.read_val()?)),
			TAG_UINT => Ok(EventLimit::UnsignedInt(cur.read_val()?)),
			TAG_ULONG => Ok(EventLimit::UnsignedLong(cur.read_val()?)),
			TAG_FLOAT => Ok(EventLimit::Float(cur.read_val()?)),
			TAG_DOUBLE => Ok(EventLimit::Double(cur.read_val()?)),
			TAG_STRING => {
				let len: u8 = cur.read_val()?;
				let bytes = read_exact(cur, len as usize)?;
				let s = String::from_utf8(bytes)
					.map_err(|e| Error::ProtocolError(format!("invalid event limit string: {e}")))?;
				Ok(EventLimit::JausString(s))
			}
			TAG_RGB => {
				let r: u8 = cur.read_val()?;
				let g: u8 = cur.read_val()?;
				let b: u8 = cur.read_val()?;
				Ok(EventLimit::Rgb([r, g, b]))
			}
			other => Err(Error::UnknownVariant(other)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_every_fixed_width_variant() {
		let samples = vec![
			EventLimit::Byte(-5),
			EventLimit::Short(-1000),
			EventLimit::Int(123_456),
			EventLimit::Long(-1),
			EventLimit::UnsignedShort(65000),
			EventLimit::UnsignedInt(4_000_000_000),
			EventLimit::UnsignedLong(u64::MAX),
			EventLimit::Float(1.5),
			EventLimit::Double(2.25),
			EventLimit::Rgb([10, 20, 30]),
		];
		for sample in samples {
			let mut buf = Vec::new();
			sample.encode(&mut buf).unwrap();
			let mut cur = Cursor::new(buf.as_slice());
			let decoded = EventLimit::decode(&mut cur, sample.discriminant()).unwrap();
			assert_eq!(sample, decoded);
		}
	}

	#[test]
	fn string_variant_is_length_prefixed() {
		let sample = EventLimit::JausString("hello".to_string());
		let mut buf = Vec::new();
		sample.encode(&mut buf).unwrap();
		assert_eq!(buf, vec![TAG_STRING, 5, b'h', b'e', b'l', b'l', b'o']);
	}

	#[test]
	fn tag_mismatch_errors() {
		let sample = EventLimit::Byte(1);
		let mut buf = Vec::new();
		sample.encode(&mut buf).unwrap();
		let mut cur = Cursor::new(buf.as_slice());
		assert!(EventLimit::decode(&mut cur, TAG_SHORT).is_err());
	}

	#[test]
	fn unknown_tag_errors() {
		assert_eq!(EventLimit::encoded_size(200), 0);
		let buf = vec![200u8, 0];
		let mut cur = Cursor::new(buf.as_slice());
		let err = EventLimit::decode(&mut cur, 200).unwrap_err();
		assert!(matches!(err, Error::UnknownVariant(200)));
	}
}
