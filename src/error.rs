use std::io;
use thiserror::Error;

/// Errors produced by the codec and message layers.
///
/// Large Message Handler failures (duplicate/out-of-sequence/missing-FIRST
/// fragments) never surface here — they are logged and the fragment is
/// dropped, per the handler's silent-drop contract.
#[derive(Error, Debug)]
pub enum Error {
	#[error("buffer too small: needed {needed} bytes, had {available}")]
	BufferTooSmall { needed: usize, available: usize },

	#[error("wrong message type: expected command code {expected}, got {actual}")]
	WrongType { expected: u16, actual: u16 },

	#[error("length mismatch: header declared {declared} bytes, decoder consumed {consumed}")]
	LengthMismatch { declared: usize, consumed: usize },

	#[error("unknown discriminator byte: `{0}`")]
	UnknownVariant(u8),

	/// This error means one of the message fields contains an invalid or unsupported value.
	#[error("protocol error: {0}")]
	ProtocolError(String),

	#[error("i/o error")]
	Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
