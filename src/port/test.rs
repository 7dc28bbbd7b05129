use std::io;
use std::time::Duration;

use crate::{
	backend::{Backend as _, Mock},
	error::*,
	message::{Delimiters, State},
	port::Port,
};
use static_assertions::assert_impl_all;

assert_impl_all!(Port<Mock>: Send, std::fmt::Debug);

/// Generate code to check which error `read_message` returns for some input.
///
/// The syntax is `<port>, <case>...` where each `<case>` is
/// `<bytes_to_append> => <expected_error_type>,`. After each case the port
/// must be back between messages.
macro_rules! check_errors {
    ($port:ident, $bytes:literal => $err_type:ty, $($rest:tt)*) => {
        $port.backend.clear_buffer();
        $port.backend.append_data($bytes);
        match $port.read_message() {
            Err(e) => {
                if let Err(e) = <$err_type>::try_from(e) {
                    panic!("unexpected error when reading {}:\n\texpected:\t{}\n\tgot:\t\t{}\n\t\t\t{:?}\n",
                        stringify!($bytes),
                        stringify!($err_type),
                        e,
                        e);
                }
            }
            Ok(m) => panic!("unexpected Ok({}) when reading {}", m, stringify!($bytes)),
        }
        assert_eq!($port.state(), State::ReadingStart, "after {}", stringify!($bytes));
        check_errors!($port, $($rest)*)
    };

    ($port:ident, ) => {};
}

#[test]
fn successive_messages() {
	let mut port = Port::open_mock();
	port.backend
		.append_data(b"<MOVE|1|5|10|20|><STOP|2|0|||>noise<PING|1|3|||>");

	let message = port.read_message().unwrap();
	assert_eq!(message.command(), "MOVE");
	assert_eq!(message.read_field(1).unwrap(), "20");
	// Only the first frame has been read.
	assert_eq!(port.backend.remaining(), 31);

	assert_eq!(port.read_message().unwrap().command(), "STOP");
	assert_eq!(port.read_message().unwrap().command(), "PING");
	assert!(port.backend.is_empty());
	assert_eq!(port.state(), State::ReadingStart);
}

#[test]
fn errors() {
	let mut port = Port::open_mock();
	check_errors!(
		port,
		// Nothing at all
		b"" => io::Error,
		// Nothing but noise
		b"MOVE|1|5|10|20|>" => io::Error,
		// Frames cut short at every stage
		b"<" => PartialMessageError,
		b"<MOV" => PartialMessageError,
		b"<MOVE|1" => PartialMessageError,
		b"<MOVE|1|5" => PartialMessageError,
		b"<MOVE|1|5|10|20" => PartialMessageError,
		// A frame that lost a separator never completes
		b"<MOVE|1|5|10|20>" => PartialMessageError,
	);
}

#[test]
fn timeouts() {
	let mut port = Port::open_mock();

	let err = port.read_message().unwrap_err();
	assert!(err.is_timeout());
	assert!(matches!(err, Error::Io(_)));

	port.backend.append_data(b"junk<MOVE|1|5|");
	match port.read_message() {
		Err(Error::PartialMessage(e)) => assert_eq!(e.state(), State::ReadingField),
		other => panic!("unexpected result: {other:?}"),
	}

	// The partial frame was dropped, so the rest of it is noise.
	port.backend.append_data(b"10|20|><GO|1|3|||>");
	let message = port.read_message().unwrap();
	assert_eq!(message.command(), "GO");
	assert_eq!(message.read_field(0).unwrap(), "");
}

#[test]
fn read_errors_reset_the_message() {
	let mut port = Port::open_mock();
	port.backend.append_data(b"<MOVE|1|");
	port.backend.max_read(1);
	// Stop part way through the frame.
	for _ in 0..3 {
		let mut byte = [0];
		io::Read::read(&mut port.backend, &mut byte).unwrap();
		port.message.parse_byte(byte[0]);
	}
	assert_eq!(port.state(), State::ReadingCommand);

	port.backend
		.read_error(Some(io::Error::from(io::ErrorKind::BrokenPipe)));
	match port.read_message() {
		Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
		other => panic!("unexpected result: {other:?}"),
	}
	assert_eq!(port.state(), State::ReadingStart);
}

#[test]
fn interrupted_reads_are_retried() {
	let mut port = Port::open_mock();
	port.backend.append_data(b"<A|1|2|x|y|z>");
	port.backend
		.read_error(Some(io::Error::from(io::ErrorKind::Interrupted)));
	assert_eq!(port.read_message().unwrap().read_field(2).unwrap(), "z");
}

#[test]
fn trickling_data() {
	let mut port = Port::open_mock();
	port.backend.max_read(1);
	port.backend.append_data(b"<SET|1|4|a|b|c|d>");
	let message = port.read_message().unwrap();
	assert_eq!(message.command(), "SET");
	assert_eq!(message.dest(), 4);
	assert_eq!(message.read_field(2).unwrap(), "c");
}

#[test]
fn custom_delimiters() {
	let delimiters = Delimiters::new(0x02, b',', 0x03).unwrap();
	let mut port = Port::from_backend(Mock::new(), delimiters);
	port.backend.append_data(b"<A|1|2|||>\x02HELLO,2,1,a|b,,\x03");
	assert_eq!(port.delimiters(), delimiters);
	let message = port.read_message().unwrap();
	assert_eq!(message.command(), "HELLO");
	assert_eq!(message.read_field(0).unwrap(), "a|b");
	assert_eq!(message.delimiters(), delimiters);
}

#[test]
fn read_timeout() {
	let mut port = Port::open_mock();
	let previous = port
		.set_read_timeout(Some(Duration::from_millis(100)))
		.unwrap();
	assert_eq!(previous, Some(Duration::ZERO));
	assert_eq!(
		port.read_timeout().unwrap(),
		Some(Duration::from_millis(100))
	);

	port.backend_mut()
		.set_read_timeout_error(Some(io::Error::from(io::ErrorKind::Other)));
	assert!(port.set_read_timeout(None).is_err());
	assert_eq!(
		port.read_timeout().unwrap(),
		Some(Duration::from_millis(100))
	);
}

#[test]
fn backend_access() {
	let mut port = Port::open_mock();
	assert!(port.name().unwrap().starts_with("<mock"));
	port.backend_mut().append_data(b"<A|1|2|||>");
	assert_eq!(port.backend().remaining(), 10);
	let backend = port.into_backend();
	assert_eq!(backend.remaining(), 10);
}

#[test]
fn borrowed_backend() {
	let mut mock = Mock::new();
	mock.append_data(b"<A|1|2|||><B|2|1|||>");
	{
		let mut port = Port::from_backend(&mut mock, Delimiters::DEFAULT);
		assert_eq!(port.read_message().unwrap().command(), "A");
		port.set_read_timeout(Some(Duration::from_secs(1))).unwrap();
		assert!(port.name().unwrap().starts_with("<mock"));
	}
	// The port only read the first frame from the borrowed backend.
	assert_eq!(mock.remaining(), 10);
	assert_eq!(mock.read_timeout().unwrap(), Some(Duration::from_secs(1)));

	let mut port = Port::from_backend(&mut mock, Delimiters::DEFAULT);
	assert_eq!(port.read_message().unwrap().command(), "B");
}
