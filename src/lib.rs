//! An allocation-free parser for the messages exchanged between the prime,
//! base system, and module controllers.
//!
//! Messages are parsed one byte at a time into a fixed-size [`Message`]
//! which never holds more than one frame:
//!
//! ```
//! use grobot_msg::message::Message;
//!
//! let mut message = Message::new();
//! let mut done = false;
//! for byte in b"garbage<MOVE|1|5|10|20|>" {
//!     done = message.parse_byte(*byte);
//! }
//! assert!(done);
//! assert_eq!(message.command(), "MOVE");
//! assert_eq!((message.source(), message.dest()), (1, 5));
//! assert_eq!(message.read_field(0).unwrap(), "10");
//! assert_eq!(message.read_field(1).unwrap(), "20");
//! assert_eq!(message.read_field(2).unwrap(), "");
//! assert!(message.read_field(3).is_err());
//!
//! // The parser never resets itself.
//! message.init();
//! ```
//!
//! When the bytes come from a serial line or TCP stream, a [`Port`](port::Port)
//! drives the parser and owns the timeout policy for frames that never
//! complete:
//!
//! ```rust
//! # use grobot_msg::{port::Port, error::Error};
//! # fn wrapper() -> Result<(), Error> {
//! let mut port = Port::open_serial("/dev/ttyUSB0")?;
//! let message = port.read_message()?;
//! println!("{} from {:?}", message.command(), message.source_address());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(missing_debug_implementations)]

pub mod backend;
pub mod error;
pub mod message;
pub mod port;

pub use message::Message;
