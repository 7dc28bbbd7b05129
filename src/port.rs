//! Types for receiving messages from a serial port or TCP stream.

mod options;
#[cfg(test)]
mod test;

#[cfg(any(test, feature = "mock"))]
use crate::backend::Mock;
use crate::backend::{Backend, Serial, UNKNOWN_BACKEND_NAME};
use crate::error::{is_timeout_kind, Error, PartialMessageError};
use crate::message::{Delimiters, Message, State};
pub use options::*;
use std::{
	io,
	net::{TcpStream, ToSocketAddrs},
	time::Duration,
};

/// A port that receives messages.
///
/// The port feeds bytes from its [`Backend`] into a single in-flight
/// [`Message`], one byte at a time, so it never reads past the end of the
/// frame it is parsing and never holds more than one message.
///
/// The parser has no notion of time. The port supplies it: if the backend's
/// read times out while a frame is partially parsed, the partial frame is
/// dropped and [`Error::PartialMessage`] is returned. Use
/// [`Error::is_timeout`] to treat both kinds of timeout the same.
///
/// ## Example
///
/// ```rust
/// # use grobot_msg::{port::Port, backend::Backend, error::Error};
/// # fn wrapper<B: Backend>(mut port: Port<B>) -> Result<(), Error> {
/// loop {
///     match port.read_message() {
///         Ok(message) => println!("{message}"),
///         Err(e) if e.is_timeout() => continue,
///         Err(e) => return Err(e),
///     }
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct Port<B> {
	/// The backend to receive bytes from.
	backend: B,
	/// The message currently being parsed.
	message: Message,
}

impl Port<Serial> {
	/// Open the serial port at the specified path using the default options.
	///
	/// Alternatively, use [`Port::open_serial_options`] to customize how the port is opened.
	///
	/// ## Example
	///
	/// ```rust
	/// # use grobot_msg::port::Port;
	/// # fn wrapper() -> Result<(), Box<dyn std::error::Error>> {
	/// let mut port = Port::open_serial("/dev/ttyUSB0")?;
	/// # Ok(())
	/// # }
	/// ```
	pub fn open_serial(path: &str) -> Result<Port<Serial>, Error> {
		OpenSerialOptions::new().open(path)
	}

	/// Return an [`OpenSerialOptions`] to customize how a serial port is opened.
	pub fn open_serial_options() -> OpenSerialOptions {
		OpenSerialOptions::new()
	}
}

impl Port<TcpStream> {
	/// Open a TCP port at the specified address using the default options.
	///
	/// Alternatively, use [`Port::open_tcp_options`] to customize how the port is opened.
	pub fn open_tcp<A: ToSocketAddrs>(address: A) -> Result<Port<TcpStream>, io::Error> {
		OpenTcpOptions::new().open(address)
	}

	/// Return an [`OpenTcpOptions`] to customize how a TCP port is opened.
	pub fn open_tcp_options() -> OpenTcpOptions {
		OpenTcpOptions::new()
	}
}

#[cfg(any(test, feature = "mock"))]
impl Port<Mock> {
	/// Open a port backed by a [`Mock`], using the default delimiters.
	pub fn open_mock() -> Port<Mock> {
		Port::from_backend(Mock::new(), Delimiters::DEFAULT)
	}
}

impl<B: Backend> Port<B> {
	/// Create a port that reads from `backend` and parses frames delimited by `delimiters`.
	pub fn from_backend(backend: B, delimiters: Delimiters) -> Port<B> {
		Port {
			backend,
			message: Message::with_delimiters(delimiters),
		}
	}

	/// Receive the next complete message.
	///
	/// Bytes before the start of a frame are discarded. If the backend times
	/// out or fails part way through a frame, the partial frame is discarded
	/// and the next call starts from scratch.
	///
	/// ## Example
	///
	/// ```rust
	/// # use grobot_msg::{port::Port, backend::Backend, error::Error};
	/// # fn wrapper<B: Backend>(mut port: Port<B>) -> Result<(), Error> {
	/// let message = port.read_message()?;
	/// let speed: f32 = message.read_field(0)?.parse().unwrap_or_default();
	/// # Ok(())
	/// # }
	/// ```
	pub fn read_message(&mut self) -> Result<Message, Error> {
		let mut byte = [0u8; 1];
		loop {
			match io::Read::read(&mut self.backend, &mut byte) {
				Ok(0) => {
					return Err(self.abandon(io::Error::new(
						io::ErrorKind::UnexpectedEof,
						"backend closed",
					)))
				}
				Ok(_) => {
					if self.message.parse_byte(byte[0]) {
						let message = self.message.take();
						log::debug!("{} RECV: {}", self.backend_name(), message);
						return Ok(message);
					}
				}
				Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
				Err(e) => return Err(self.abandon(e)),
			}
		}
	}

	/// Reset the in-flight message after `err` and return the error to report.
	fn abandon(&mut self, err: io::Error) -> Error {
		let state = self.message.state();
		self.message.init();
		if state == State::ReadingStart {
			return err.into();
		}
		log::debug!(
			"{} dropping partial message while {:?}: {}",
			self.backend_name(),
			state,
			err
		);
		if is_timeout_kind(err.kind()) {
			PartialMessageError::new(state).into()
		} else {
			err.into()
		}
	}

	fn backend_name(&self) -> String {
		self.backend
			.name()
			.unwrap_or_else(|| UNKNOWN_BACKEND_NAME.to_string())
	}

	/// Return the state of the message currently being parsed.
	///
	/// This is [`State::ReadingStart`] between messages.
	pub fn state(&self) -> State {
		self.message.state()
	}

	/// Return the delimiters used to parse messages.
	pub fn delimiters(&self) -> Delimiters {
		self.message.delimiters()
	}

	/// Set the port's read timeout and return the previous one.
	///
	/// This bounds how long [`read_message`](Port::read_message) waits for
	/// each byte. If timeout is `None`, reads will block indefinitely.
	pub fn set_read_timeout(
		&mut self,
		timeout: Option<Duration>,
	) -> Result<Option<Duration>, io::Error> {
		let previous = self.backend.read_timeout()?;
		self.backend.set_read_timeout(timeout)?;
		Ok(previous)
	}

	/// Get the port's read timeout.
	pub fn read_timeout(&self) -> Result<Option<Duration>, io::Error> {
		self.backend.read_timeout()
	}

	/// Get the name of the underlying backend.
	pub fn name(&self) -> Option<String> {
		self.backend.name()
	}

	/// Get a reference to the underlying backend.
	pub fn backend(&self) -> &B {
		&self.backend
	}

	/// Get a mutable reference to the underlying backend.
	pub fn backend_mut(&mut self) -> &mut B {
		&mut self.backend
	}

	/// Consume the port and return the underlying backend.
	///
	/// Any partially parsed message is lost.
	pub fn into_backend(self) -> B {
		self.backend
	}
}
