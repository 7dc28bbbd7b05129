//! Error types.
//!
//! Each error is represented by a unique type that implements [`std::error::Error`].
//! APIs that can fail in more than one way return one of the higher level
//! [enums](#enums), [`FieldError`] or [`Error`]. The error types are
//! convertible to the higher level enums, allowing them to be used with `?`:
//!
//! ```
//! use grobot_msg::{error::Error, Message};
//!
//! fn first_field(message: &Message) -> Result<u32, Box<dyn std::error::Error>> {
//!     let field = message.read_field(0).map_err(Error::from)?;
//!     Ok(field.parse()?)
//! }
//! ```
//!
//! The enums can be converted back into the specific error types with
//! [`TryFrom`]:
//!
//! ```
//! # use grobot_msg::{error::{FieldError, FieldOutOfRangeError}, Message};
//! let message = Message::new();
//! let error: FieldError = message.read_field(7).unwrap_err();
//! let error = FieldOutOfRangeError::try_from(error).unwrap();
//! assert_eq!(error.index(), 7);
//! ```

use crate::message::State;
use std::io;

/// Implement Error and Display traits for the specified type.
///
/// After the type define the format string and any arguments it should
/// reference after `self =>` (to abide by macro hygiene rules).
macro_rules! impl_error_display {
	(
		$name:path,
		$self:ident =>
		$display:literal
		$(,
			$($arg:expr),+
		)?
	) => {
		impl std::error::Error for $name {}

		impl std::fmt::Display for $name {
			fn fmt(&$self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				write!(
					f,
					$display
					$(,
						$($arg),+
					)?
				)
			}
		}
	};
}

/// Define error enums that contain concrete error types (not other error enums).
///
/// From and TryFrom traits will be implemented for the enum and it's underlying
/// errors. The enum's Display implementation will defer to the underlying errors'
/// Display implementations.
///
/// Simple implementations of From and TryFrom with other error enums can be
/// added by appending a succinct impl block, which assumes that:
///   * it is being implemented for this error enum,
///   * each variant has a single tuple value, and can be converted to the value
///     in this enum with its own From implementation.
macro_rules! error_enum {
	(
		$(#[$attr:meta])*
		pub enum $name:ident {
			$(
				$variant:ident($inner:path)
			),+
			$(,)?
		}
		$(
			impl From<$from_t:ident>
			{
				$($from_variant:ident => $to_variant:ident),+
				$(,)?
			}
		)*
	) => {
		$(
			#[$attr]
		)*
		#[allow(missing_docs)]
		pub enum $name {
			$(
				$variant($inner)
			),+
		}

		impl std::error::Error for $name {}

		// Defer the display to the inner error type
		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				match self {
					$(
						$name::$variant(e) => std::fmt::Display::fmt(e, f)
					),+
				}
			}
		}

		impl From<std::convert::Infallible> for $name {
			fn from(_: std::convert::Infallible) -> Self {
				unreachable!();
			}
		}

		$(
			impl From<$inner> for $name {
				fn from(other: $inner) -> Self {
					$name::$variant(other)
				}
			}

			impl TryFrom<$name> for $inner {
				type Error = $name;
				fn try_from(other: $name) -> Result<Self, Self::Error> {
					match other {
						$name::$variant(value) => Ok(value),
						#[allow(unreachable_patterns)]
						value => Err(value)
					}
				}
			}
		)+

		$(
			impl From<$from_t> for $name {
				fn from(other: $from_t) -> Self {
					match other {
						$($from_t::$from_variant(e) => $name::$to_variant(From::from(e))),+
					}
				}
			}

			impl TryFrom<$name> for $from_t {
				type Error = $name;
				fn try_from(other: $name) -> Result<Self, Self::Error> {
					match other {
						$(
							$name::$to_variant(e) => Ok($from_t::$from_variant(From::from(e))),
						)+
						_ => Err(other)
					}
				}
			}
		)*
	};
}

/// A field index past the last field of a message was requested.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FieldOutOfRangeError(usize);

impl FieldOutOfRangeError {
	pub(crate) fn new(index: usize) -> Self {
		FieldOutOfRangeError(index)
	}

	/// The index that was requested.
	pub fn index(&self) -> usize {
		self.0
	}
}

impl_error_display! {
	FieldOutOfRangeError,
	self => "field index {} is out of range, messages have {} fields", self.0, crate::message::NUM_FIELDS
}

/// The contents of a field are not valid UTF-8.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldNotUtf8Error {
	index: usize,
	source: std::str::Utf8Error,
}

impl FieldNotUtf8Error {
	pub(crate) fn new(index: usize, source: std::str::Utf8Error) -> Self {
		FieldNotUtf8Error { index, source }
	}

	/// The index of the offending field.
	pub fn index(&self) -> usize {
		self.index
	}

	/// The underlying UTF-8 decoding error.
	pub fn utf8_error(&self) -> std::str::Utf8Error {
		self.source
	}
}

impl_error_display! {
	FieldNotUtf8Error,
	self => "field {} is not valid UTF-8: {}", self.index, self.source
}

error_enum! {
	/// A field could not be read from a message.
	#[derive(Debug, Copy, Clone, PartialEq, Eq)]
	#[non_exhaustive]
	pub enum FieldError {
		OutOfRange(FieldOutOfRangeError),
		NotUtf8(FieldNotUtf8Error),
	}
}

/// Two or more of the start, separator, and end bytes are the same.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DelimitersNotDistinctError {
	start: u8,
	separator: u8,
	end: u8,
}

impl DelimitersNotDistinctError {
	pub(crate) fn new(start: u8, separator: u8, end: u8) -> Self {
		DelimitersNotDistinctError {
			start,
			separator,
			end,
		}
	}
}

impl_error_display! {
	DelimitersNotDistinctError,
	self => "delimiters must be distinct: start = 0x{:02X}, separator = 0x{:02X}, end = 0x{:02X}",
		self.start, self.separator, self.end
}

/// The port stopped receiving bytes part way through a message.
///
/// The partially parsed message has been discarded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PartialMessageError(State);

impl PartialMessageError {
	pub(crate) fn new(state: State) -> Self {
		PartialMessageError(state)
	}

	/// The state the parser was in when the message was abandoned.
	pub fn state(&self) -> State {
		self.0
	}
}

impl_error_display! {
	PartialMessageError,
	self => "timed out waiting for the rest of a message (parser was {:?})", self.0
}

/// The specified device is either disconnected or already in use by another process.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SerialDeviceInUseOrDisconnectedError(Box<str>);

impl_error_display! {
	SerialDeviceInUseOrDisconnectedError,
	self => "the specified device is either disconnected or already in use by another process: {}", self.0
}

error_enum! {
	/// Any error returned by this crate.
	#[derive(Debug)]
	#[non_exhaustive]
	pub enum Error {
		Io(io::Error),
		SerialDeviceInUseOrDisconnected(SerialDeviceInUseOrDisconnectedError),
		PartialMessage(PartialMessageError),
		DelimitersNotDistinct(DelimitersNotDistinctError),
		FieldOutOfRange(FieldOutOfRangeError),
		FieldNotUtf8(FieldNotUtf8Error),
	}

	impl From<FieldError> {
		OutOfRange => FieldOutOfRange,
		NotUtf8 => FieldNotUtf8,
	}
}

impl Error {
	/// A convenience function for determining if the error is due to the
	/// port timing out, whether or not a message was in progress.
	pub fn is_timeout(&self) -> bool {
		match self {
			Error::Io(e) => is_timeout_kind(e.kind()),
			Error::PartialMessage(_) => true,
			_ => false,
		}
	}

	/// A convenience function for determining if the error is an I/O error.
	pub fn is_io(&self) -> bool {
		matches!(self, Error::Io(_))
	}
}

/// Whether an I/O error of `kind` means a read timed out.
///
/// `TcpStream` reports a read timeout as `WouldBlock` on unix and `TimedOut`
/// on windows.
pub(crate) fn is_timeout_kind(kind: io::ErrorKind) -> bool {
	matches!(kind, io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

impl From<serialport::Error> for Error {
	fn from(other: serialport::Error) -> Self {
		match other.kind() {
			serialport::ErrorKind::NoDevice => Error::SerialDeviceInUseOrDisconnected(
				SerialDeviceInUseOrDisconnectedError(other.description.into_boxed_str()),
			),
			serialport::ErrorKind::InvalidInput => Error::Io(io::Error::new(
				io::ErrorKind::InvalidInput,
				other.description,
			)),
			serialport::ErrorKind::Unknown => {
				Error::Io(io::Error::new(io::ErrorKind::Other, other.description))
			}
			serialport::ErrorKind::Io(kind) => Error::Io(io::Error::new(kind, other.description)),
		}
	}
}
