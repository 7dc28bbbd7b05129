//! Types defining the different options when opening a port.

use super::Port;
use crate::{
	backend::{Backend, Serial},
	error::Error,
	message::Delimiters,
};
use serialport as sp;
use std::{
	io,
	net::{TcpStream, ToSocketAddrs},
	time::Duration,
};

/// The read timeout used unless configured otherwise.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Options for configuring and opening a serial port.
///
/// ## Example
///
/// ```rust
/// # use grobot_msg::port::OpenSerialOptions;
/// # use std::time::Duration;
/// # fn wrapper() -> Result<(), Box<dyn std::error::Error>> {
/// let mut port = OpenSerialOptions::new()
///     .baud_rate(9_600)
///     .timeout(Some(Duration::from_millis(50)))
///     .open("/dev/ttyUSB0")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OpenSerialOptions {
	/// The custom baud rate
	baud_rate: u32,
	/// The custom timeout
	timeout: Option<Duration>,
	/// The markers that frame messages on this port.
	delimiters: Delimiters,
}

impl OpenSerialOptions {
	/// The default baud rate of the control network: 115,200.
	pub const DEFAULT_BAUD_RATE: u32 = 115_200;

	/// Create a blank set of options ready for configuration.
	///
	/// The default baud rate and read timeout are 115,200 and 3 seconds,
	/// respectively. Messages are framed with [`Delimiters::DEFAULT`].
	///
	/// Equivalent to [`default`](OpenSerialOptions::default).
	pub fn new() -> Self {
		OpenSerialOptions {
			baud_rate: OpenSerialOptions::DEFAULT_BAUD_RATE,
			timeout: Some(DEFAULT_TIMEOUT),
			delimiters: Delimiters::DEFAULT,
		}
	}

	/// Set a custom baud rate.
	///
	/// The default is 115,200.
	pub fn baud_rate(&mut self, baud_rate: u32) -> &mut Self {
		self.baud_rate = baud_rate;
		self
	}

	/// Set a custom read timeout.
	///
	/// This is also how long a partially received message may stall before it
	/// is dropped. If duration is `None`, reads will block indefinitely. The
	/// default is 3 seconds.
	pub fn timeout(&mut self, duration: Option<Duration>) -> &mut Self {
		self.timeout = duration;
		self
	}

	/// Set the delimiters used to frame messages.
	///
	/// The default is [`Delimiters::DEFAULT`].
	pub fn delimiters(&mut self, delimiters: Delimiters) -> &mut Self {
		self.delimiters = delimiters;
		self
	}

	/// Open a [`Serial`] port at the specified path.
	fn open_serial_port(&self, path: &str) -> Result<Serial, Error> {
		// The baud rate passed to `new` is ignored by some platforms, so it is
		// set again with the `baud_rate` method below.
		sp::new(path, OpenSerialOptions::DEFAULT_BAUD_RATE)
			.data_bits(sp::DataBits::Eight)
			.parity(sp::Parity::None)
			.flow_control(sp::FlowControl::None)
			.stop_bits(sp::StopBits::One)
			// serialport has no infinite timeout. The largest duration is close enough.
			.timeout(self.timeout.unwrap_or(Duration::MAX))
			.baud_rate(self.baud_rate)
			.open_native()
			.map(Serial)
			.map_err(Into::into)
	}

	/// Open the port at the specified path with the custom options.
	pub fn open(&self, path: &str) -> Result<Port<Serial>, Error> {
		let serial = self.open_serial_port(path)?;
		log::debug!("opened serial port {} at {} baud", path, self.baud_rate);
		Ok(Port::from_backend(serial, self.delimiters))
	}

	/// Open the port at the specified path with the custom options.
	///
	/// The type of the underlying backend is erased via dynamic dispatch,
	/// which does have runtime overhead. [`OpenSerialOptions::open`] should
	/// generally be used instead, except when the type of the underlying
	/// backend may not be known at compile time.
	pub fn open_dyn(&self, path: &str) -> Result<Port<Box<dyn Backend>>, Error> {
		Ok(Port::from_backend(
			Box::new(self.open_serial_port(path)?),
			self.delimiters,
		))
	}
}

impl Default for OpenSerialOptions {
	fn default() -> Self {
		OpenSerialOptions::new()
	}
}

/// Options for configuring and opening a TCP port.
///
/// This is useful when the network is bridged onto TCP, for example by a
/// serial device server.
///
/// ## Example
///
/// ```rust
/// # use grobot_msg::port::OpenTcpOptions;
/// # use std::time::Duration;
/// # fn wrapper() -> Result<(), Box<dyn std::error::Error>> {
/// let mut port = OpenTcpOptions::new()
///     .timeout(Some(Duration::from_millis(50)))
///     .open("192.168.0.1:4001")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OpenTcpOptions {
	/// The custom timeout
	timeout: Option<Duration>,
	/// The markers that frame messages on this port.
	delimiters: Delimiters,
}

impl OpenTcpOptions {
	/// Create a blank set of options ready for configuration.
	///
	/// The default read timeout is 3 seconds. Messages are framed with
	/// [`Delimiters::DEFAULT`].
	///
	/// Equivalent to [`default`](OpenTcpOptions::default).
	pub fn new() -> Self {
		OpenTcpOptions {
			timeout: Some(DEFAULT_TIMEOUT),
			delimiters: Delimiters::DEFAULT,
		}
	}

	/// Set a custom read timeout.
	///
	/// If duration is `None`, reads will block indefinitely. The default is 3 seconds.
	pub fn timeout(&mut self, duration: Option<Duration>) -> &mut Self {
		self.timeout = duration;
		self
	}

	/// Set the delimiters used to frame messages.
	///
	/// The default is [`Delimiters::DEFAULT`].
	pub fn delimiters(&mut self, delimiters: Delimiters) -> &mut Self {
		self.delimiters = delimiters;
		self
	}

	/// Open a [`TcpStream`] at the specified address.
	fn open_tcp_stream<A: ToSocketAddrs>(&self, address: A) -> io::Result<TcpStream> {
		let stream = TcpStream::connect(address)?;
		stream.set_read_timeout(self.timeout)?;
		Ok(stream)
	}

	/// Open the port at the specified address with the custom options.
	pub fn open<A: ToSocketAddrs>(&self, address: A) -> io::Result<Port<TcpStream>> {
		Ok(Port::from_backend(
			self.open_tcp_stream(address)?,
			self.delimiters,
		))
	}

	/// Open the port at the specified address with the custom options.
	///
	/// The type of the underlying backend is erased via dynamic dispatch,
	/// which does have runtime overhead. [`OpenTcpOptions::open`] should
	/// generally be used instead, except when the type of the underlying
	/// backend may not be known at compile time.
	pub fn open_dyn<A: ToSocketAddrs>(&self, address: A) -> io::Result<Port<Box<dyn Backend>>> {
		Ok(Port::from_backend(
			Box::new(self.open_tcp_stream(address)?),
			self.delimiters,
		))
	}
}

impl Default for OpenTcpOptions {
	fn default() -> Self {
		OpenTcpOptions::new()
	}
}
