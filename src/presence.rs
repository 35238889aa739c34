//! Presence vectors: 1/2/4-byte bitmasks gating optional message fields.
//!
//! Bit 0 is the LSB, matching `jausShortPresenceVectorIsBitSet`'s bit order
//! in `setWrenchEffortMessage.c`.

use std::io::Cursor;

use crate::error::Result;
use crate::primitive::{WireRead, WireWrite};

macro_rules! presence_vector {
	($name:ident, $t:ty) => {
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
		pub struct $name(pub $t);

		impl $name {
			pub fn new() -> Self {
				Self(0)
			}

			pub fn set(&mut self, bit: u32) {
				self.0 |= 1 << bit;
			}

			pub fn clear(&mut self, bit: u32) {
				self.0 &= !(1 << bit);
			}

			pub fn is_set(&self, bit: u32) -> bool {
				(self.0 >> bit) & 1 == 1
			}

			pub fn decode(cur: &mut Cursor<&[u8]>) -> Result<Self> {
				Ok(Self(cur.read_val()?))
			}

			pub fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
				buf.write_val(self.0)
			}
		}
	};
}

presence_vector!(PresenceVector1, u8);
presence_vector!(PresenceVector2, u16);
presence_vector!(PresenceVector4, u32);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn set_and_clear_round_trip() {
		let mut pv = PresenceVector2::new();
		assert!(!pv.is_set(3));
		pv.set(3);
		assert!(pv.is_set(3));
		pv.clear(3);
		assert!(!pv.is_set(3));
	}

	#[test]
	fn bit_zero_is_lsb() {
		let mut pv = PresenceVector1::new();
		pv.set(0);
		assert_eq!(pv.0, 0b0000_0001);
	}

	#[test]
	fn encode_decode_round_trip() {
		let mut pv = PresenceVector4::new();
		pv.set(0);
		pv.set(17);
		let mut buf = Vec::new();
		pv.encode(&mut buf).unwrap();
		let mut cur = Cursor::new(buf.as_slice());
		let back = PresenceVector4::decode(&mut cur).unwrap();
		assert_eq!(pv, back);
	}
}
