//! Protocol-wide constants.
//!
//! Mirrors the way `lifx-core::protocol` inlines its wire version check and
//! `winpipe::wire` exposes `HEADER_SIZE`/`MAX_MESSAGE_SIZE` as `pub const`s:
//! the handful of values the source leaves implementation-defined collected
//! in one place instead of scattered magic numbers.

/// Size of the common message header, in bytes.
pub const HEADER_SIZE_BYTES: usize = 16;

/// Size of the UDP-framing marker that may precede a header.
pub const UDP_HEADER_SIZE_BYTES: usize = 4;

/// The UDP-framing marker itself.
pub const UDP_MARKER: [u8; UDP_HEADER_SIZE_BYTES] = *b"JAUS";

/// Per-fragment payload cap used by the Large Message Handler when
/// splitting an outbound message, chosen so header + payload fits a
/// common UDP MTU.
pub const MAX_DATAGRAM_PAYLOAD: usize = 4080;

/// Default header priority for newly created messages.
pub const DEFAULT_PRIORITY: u8 = 6;

/// `ackNak` value meaning "no acknowledgement requested".
pub const ACK_NAK_NOT_REQUIRED: u8 = 0;

/// JAUS version encoded in the header's `version` bitfield.
pub const VERSION_3_2: u8 = 0x02;
