//! Logical JAUS endpoint address: `(subsystem, node, component, instance)`.
//!
//! Wire layout packs instance at the lowest byte offset and subsystem at
//! the highest, confirmed by `setWrenchEffortMessage.c`'s
//! `headerToBuffer`/`headerFromBuffer` (buffer offsets 4-7 and 8-11 write
//! instance first, subsystem last).

use std::io::Cursor;

use crate::error::Result;
use crate::primitive::{WireRead, WireWrite};

/// Wildcard value meaning "all" in any address field.
pub const BROADCAST: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Address {
	pub subsystem: u8,
	pub node: u8,
	pub component: u8,
	pub instance: u8,
}

impl Address {
	pub fn new(subsystem: u8, node: u8, component: u8, instance: u8) -> Self {
		Self {
			subsystem,
			node,
			component,
			instance,
		}
	}

	pub fn broadcast() -> Self {
		Self::new(BROADCAST, BROADCAST, BROADCAST, BROADCAST)
	}

	/// True when every field is 0 — constructible as an intermediate
	/// value, but not a valid send target.
	pub fn is_unassigned(&self) -> bool {
		self.subsystem == 0 && self.node == 0 && self.component == 0 && self.instance == 0
	}

	pub fn to_u32(self) -> u32 {
		u32::from_le_bytes([self.instance, self.component, self.node, self.subsystem])
	}

	pub fn from_u32(v: u32) -> Self {
		let [instance, component, node, subsystem] = v.to_le_bytes();
		Self {
			subsystem,
			node,
			component,
			instance,
		}
	}

	pub fn decode(cur: &mut Cursor<&[u8]>) -> Result<Self> {
		let raw: u32 = cur.read_val()?;
		Ok(Self::from_u32(raw))
	}

	pub fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
		buf.write_val(self.to_u32())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn instance_first_subsystem_last() {
		let addr = Address::new(0x11, 0x22, 0x33, 0x44);
		let mut buf = Vec::new();
		addr.encode(&mut buf).unwrap();
		assert_eq!(buf, vec![0x44, 0x33, 0x22, 0x11]);
	}

	#[test]
	fn round_trips_through_u32() {
		let addr = Address::new(1, 2, 3, 4);
		assert_eq!(Address::from_u32(addr.to_u32()), addr);
	}

	#[test]
	fn all_zero_is_unassigned_but_broadcast_is_not() {
		assert!(Address::default().is_unassigned());
		assert!(!Address::broadcast().is_unassigned());
	}
}
