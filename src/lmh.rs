//! Large Message Handler: fragmentation on send, reassembly on receive.
//!
//! `Lmh` holds no internal locks — `receive_fragment`/`send` are ordinary
//! synchronous `&mut self` methods, the same single-threaded-core-plus-
//! caller-supplied-locking split as `lifx-core::udp::Manager`, which wraps
//! its own `HashMap<u64, Bulb>` in `Arc<Mutex<_>>` one layer above this
//! kind of core rather than locking inside it.

use std::collections::HashMap;

use crate::config::MAX_DATAGRAM_PAYLOAD;
use crate::header::DataFlag;
use crate::messages::RawMessage;

/// Where an assembled message should go: the service-connection manager,
/// or the plain receive queue. The LMH only needs this boolean-shaped
/// choice — it never depends on an actual SC-manager type.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
	ServiceConnection(RawMessage),
	ReceiveQueue(RawMessage),
}

/// The interface the LMH consumes from the excluded node-manager/transport
/// layer: one outbound datagram at a time.
pub trait Transport {
	fn send_one(&mut self, frag: RawMessage);
}

/// Per-reassembly-context state: `(commandCode, source)` identity plus the
/// fragments received so far, keyed by `sequenceNumber`.
#[derive(Debug, Default)]
struct LargeMessageList {
	fragments: HashMap<u16, RawMessage>,
}

/// A set of [`LargeMessageList`]s keyed by `(commandCode, source)`. Not
/// shared across threads without external locking — see module docs.
#[derive(Debug, Default)]
pub struct Lmh {
	lists: HashMap<(u16, u32), LargeMessageList>,
}

impl Lmh {
	pub fn new() -> Self {
		Self::default()
	}

	/// Ingests one incoming fragment, applying the per-`dataFlag` state
	/// machine. Calls `sink` once, with the assembled message, whenever a
	/// LAST fragment completes an assembly. Never returns an error: a
	/// malformed or out-of-sequence fragment is logged and dropped, never
	/// surfaced to the caller.
	pub fn receive_fragment(&mut self, msg: RawMessage, sink: &mut impl FnMut(Delivery)) {
		let key = (msg.header.command_code, msg.header.source.to_u32());
		let seq = msg.header.sequence_number;

		match msg.header.data_flag {
			DataFlag::Single => {
				sink(deliver(msg));
			}
			DataFlag::First => {
				if seq != 0 {
					log::error!(
						"LMH: dropping FIRST fragment with nonzero sequence {seq} for command {:#06x}",
						key.0
					);
					return;
				}
				// A fresh FIRST always supersedes any in-progress assembly
				// for this identity, per spec: the prior LML is discarded.
				let mut list = LargeMessageList::default();
				list.fragments.insert(0, msg);
				self.lists.insert(key, list);
			}
			DataFlag::Normal => {
				let Some(list) = self.lists.get_mut(&key) else {
					log::error!(
						"LMH: dropping NORMAL fragment (seq {seq}) for command {:#06x} — never received FIRST",
						key.0
					);
					return;
				};
				if list.fragments.contains_key(&seq) {
					log::warn!(
						"LMH: dropping duplicate NORMAL fragment (seq {seq}) for command {:#06x}",
						key.0
					);
					return;
				}
				list.fragments.insert(seq, msg);
			}
			DataFlag::Retransmitted => {
				let Some(list) = self.lists.get_mut(&key) else {
					log::error!(
						"LMH: dropping RETRANSMITTED fragment (seq {seq}) for command {:#06x} — never received FIRST",
						key.0
					);
					return;
				};
				list.fragments.insert(seq, msg);
			}
			DataFlag::Last => {
				let Some(mut list) = self.lists.remove(&key) else {
					log::error!(
						"LMH: dropping LAST fragment (seq {seq}) for command {:#06x} — never received FIRST",
						key.0
					);
					return;
				};
				list.fragments.insert(seq, msg);
				match assemble(list, seq) {
					Ok(assembled) => sink(deliver(assembled)),
					Err(e) => log::error!("LMH: assembly failed for command {:#06x}: {e}", key.0),
				}
			}
		}
	}

	/// Fragments an outgoing message if its payload exceeds
	/// `MAX_DATAGRAM_PAYLOAD`, handing each resulting datagram to
	/// `transport.send_one` in sequence order. Passes the input through
	/// unchanged as a single `SINGLE` datagram when it already fits —
	/// this short-circuit is part of the contract, not an optimization.
	pub fn send(&self, msg: &RawMessage, transport: &mut impl Transport) {
		let total = msg.payload.len();
		if total <= MAX_DATAGRAM_PAYLOAD {
			transport.send_one(msg.clone());
			return;
		}

		let k = (total + MAX_DATAGRAM_PAYLOAD - 1) / MAX_DATAGRAM_PAYLOAD;
		for i in 0..k {
			let start = i * MAX_DATAGRAM_PAYLOAD;
			let end = if i == k - 1 {
				total
			} else {
				start + MAX_DATAGRAM_PAYLOAD
			};
			let mut header = msg.header;
			header.sequence_number = i as u16;
			header.data_flag = if i == 0 {
				DataFlag::First
			} else if i == k - 1 {
				DataFlag::Last
			} else {
				DataFlag::Normal
			};
			let payload = msg.payload[start..end].to_vec();
			header.data_size = payload.len() as u16;
			transport.send_one(RawMessage { header, payload });
		}
	}
}

/// Sums fragment payloads in strict sequence order `0..=seq_last`, failing
/// if any sequence number in that range is missing.
fn assemble(list: LargeMessageList, seq_last: u16) -> Result<RawMessage, String> {
	let mut payload = Vec::new();
	for s in 0..=seq_last {
		let frag = list
			.fragments
			.get(&s)
			.ok_or_else(|| format!("improper sequence of messages: missing fragment {s}"))?;
		payload.extend_from_slice(&frag.payload);
	}

	let last = list.fragments.get(&seq_last).expect("seq_last present by construction");
	let mut header = last.header;
	header.data_flag = DataFlag::Single;
	header.data_size = payload.len() as u16;
	Ok(RawMessage { header, payload })
}

fn deliver(msg: RawMessage) -> Delivery {
	if msg.header.sc_flag {
		Delivery::ServiceConnection(msg)
	} else {
		Delivery::ReceiveQueue(msg)
	}
}
