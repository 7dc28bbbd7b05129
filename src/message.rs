//! Parsing messages from the message-passing system, one byte at a time.
//!
//! A frame on the wire looks like
//!
//! ```text
//! <START> command <SEP> source <SEP> dest <SEP> field0 <SEP> field1 <SEP> field2 <END>
//! ```
//!
//! where `source` and `dest` are decimal addresses (see [`Address`]) and the
//! marker bytes are given by [`Delimiters`]. With the [default](Delimiters::DEFAULT)
//! delimiters a `MOVE` command from the prime controller to the third module
//! controller reads `<MOVE|1|5|10|20|>`.
//!
//! A [`Message`] holds exactly one frame in fixed-size buffers: the command is
//! truncated to [`COMMAND_LENGTH`] bytes, each field to [`FIELD_LENGTH`] bytes,
//! and fields after the [`NUM_FIELDS`]th are dropped. None of this is reported
//! as an error; the message still completes when the end marker arrives.
//!
//! The parser has no timeouts. A frame that loses one of its separators will
//! never complete, and it is up to the caller to [`init`](Message::init) the
//! message after waiting long enough. [`Port`](crate::port::Port) does this
//! using the read timeout of its backend.

mod address;
mod text;

pub use address::Address;
pub use text::Text;

use crate::error::{
	DelimitersNotDistinctError, FieldError, FieldNotUtf8Error, FieldOutOfRangeError,
};
use std::fmt;

/// Maximum length of a command ID.
pub const COMMAND_LENGTH: usize = 8;

/// Maximum number of command fields.
pub const NUM_FIELDS: usize = 3;

/// Maximum length of command fields.
pub const FIELD_LENGTH: usize = 32;

/// Where the parser is within a frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum State {
	/// Looking for the start marker. Everything else is discarded.
	ReadingStart,
	/// Reading the command.
	ReadingCommand,
	/// Reading the source address.
	ReadingSource,
	/// Reading the destination address.
	ReadingDest,
	/// Reading the fields.
	ReadingField,
	/// Done reading the message.
	Done,
}

/// The marker bytes that delimit a frame and its parts.
///
/// The sender and receiver must agree on these. The three bytes must differ
/// from each other, and cannot appear inside a command or field.
///
/// ```
/// # use grobot_msg::message::Delimiters;
/// let stx_etx = Delimiters::new(0x02, b',', 0x03).unwrap();
/// assert_eq!(stx_etx.separator(), b',');
/// assert!(Delimiters::new(b',', b',', 0x03).is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Delimiters {
	start: u8,
	separator: u8,
	end: u8,
}

/// How the parser treats a byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ByteKind {
	Start,
	Separator,
	End,
	Content,
}

impl Delimiters {
	/// The delimiters used unless configured otherwise: `<`, `|`, and `>`.
	pub const DEFAULT: Delimiters = Delimiters {
		start: b'<',
		separator: b'|',
		end: b'>',
	};

	/// Create a set of delimiters.
	pub fn new(start: u8, separator: u8, end: u8) -> Result<Self, DelimitersNotDistinctError> {
		if start == separator || start == end || separator == end {
			return Err(DelimitersNotDistinctError::new(start, separator, end));
		}
		Ok(Delimiters {
			start,
			separator,
			end,
		})
	}

	/// The byte that begins a frame.
	pub fn start(&self) -> u8 {
		self.start
	}

	/// The byte between the parts of a frame.
	pub fn separator(&self) -> u8 {
		self.separator
	}

	/// The byte that ends a frame.
	pub fn end(&self) -> u8 {
		self.end
	}

	fn classify(&self, byte: u8) -> ByteKind {
		if byte == self.start {
			ByteKind::Start
		} else if byte == self.separator {
			ByteKind::Separator
		} else if byte == self.end {
			ByteKind::End
		} else {
			ByteKind::Content
		}
	}
}

impl Default for Delimiters {
	fn default() -> Self {
		Delimiters::DEFAULT
	}
}

/// A parsed message.
///
/// A `Message` is fed bytes with [`parse_byte`](Message::parse_byte) until it
/// reports that it is complete. It must then be reinitialized with
/// [`init`](Message::init) (or swapped out with [`take`](Message::take))
/// before the next frame; the parser never resets itself.
///
/// ## Examples
///
/// ```
/// # use grobot_msg::message::{Address, Message, State};
/// let mut message = Message::new();
/// assert_eq!(message.parse_bytes(b"<STOP|2|0|||>"), 13);
/// assert_eq!(message.state(), State::Done);
/// assert_eq!(message.command(), "STOP");
/// assert_eq!(message.source_address(), Address::BaseSystem);
/// assert!(message.dest_address().is_broadcast());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message {
	/// The command associated with the message.
	command: Text<COMMAND_LENGTH>,
	/// The raw source address.
	source: u8,
	/// The raw destination address.
	dest: u8,
	/// The fields associated with the message.
	fields: [Text<FIELD_LENGTH>; NUM_FIELDS],

	state: State,
	/// The field currently being written.
	write_field: u8,
	/// Set once more than `NUM_FIELDS` fields have been seen.
	discarding: bool,
	delimiters: Delimiters,
}

impl Message {
	/// Create an empty message using the [default](Delimiters::DEFAULT) delimiters.
	pub const fn new() -> Self {
		Message::with_delimiters(Delimiters::DEFAULT)
	}

	/// Create an empty message that will be parsed with `delimiters`.
	pub const fn with_delimiters(delimiters: Delimiters) -> Self {
		Message {
			command: Text::EMPTY,
			source: 0,
			dest: 0,
			fields: [Text::EMPTY; NUM_FIELDS],
			state: State::ReadingStart,
			write_field: 0,
			discarding: false,
			delimiters,
		}
	}

	/// Reset the message so it is ready to parse a new frame.
	///
	/// This can be called in any state, and returns the message to the state
	/// of a newly constructed one (with the same delimiters).
	pub fn init(&mut self) {
		self.clear_contents();
		self.state = State::ReadingStart;
	}

	/// Move the message out, leaving a freshly initialized one in its place.
	pub fn take(&mut self) -> Message {
		std::mem::replace(self, Message::with_delimiters(self.delimiters))
	}

	/// Parse a byte that was read from the input.
	///
	/// Returns `true` if the message is now complete, `false` if more still
	/// has to be read. Once complete, all further bytes are ignored (and
	/// `true` returned) until the message is reinitialized.
	pub fn parse_byte(&mut self, byte: u8) -> bool {
		if self.state == State::Done {
			return true;
		}
		match self.delimiters.classify(byte) {
			ByteKind::Start => {
				if self.state != State::ReadingStart {
					log::debug!(
						"start marker while {:?}, dropping partial {:?} message",
						self.state,
						self.command
					);
				}
				self.clear_contents();
				self.state = State::ReadingCommand;
			}
			ByteKind::Separator => self.separator(),
			ByteKind::End => self.end(),
			ByteKind::Content => self.content(byte),
		}
		self.state == State::Done
	}

	/// Parse bytes until the message is complete.
	///
	/// Returns the number of bytes consumed, which is all of them unless the
	/// message completed before the end of `bytes`. Nothing is consumed if the
	/// message was already complete.
	pub fn parse_bytes(&mut self, bytes: &[u8]) -> usize {
		if self.is_complete() {
			return 0;
		}
		for (i, byte) in bytes.iter().enumerate() {
			if self.parse_byte(*byte) {
				return i + 1;
			}
		}
		bytes.len()
	}

	fn separator(&mut self) {
		self.state = match self.state {
			State::ReadingCommand => State::ReadingSource,
			State::ReadingSource => State::ReadingDest,
			State::ReadingDest => {
				self.write_field = 0;
				State::ReadingField
			}
			State::ReadingField => {
				if usize::from(self.write_field) < NUM_FIELDS - 1 {
					self.write_field += 1;
				} else if !self.discarding {
					log::trace!("more than {} fields, discarding the rest", NUM_FIELDS);
					self.discarding = true;
				}
				State::ReadingField
			}
			state @ (State::ReadingStart | State::Done) => state,
		};
	}

	fn end(&mut self) {
		match self.state {
			State::ReadingField if usize::from(self.write_field) == NUM_FIELDS - 1 => {
				self.state = State::Done;
			}
			State::ReadingStart | State::Done => {}
			state => log::trace!(
				"ignoring end marker while {:?} (field {})",
				state,
				self.write_field
			),
		}
	}

	fn content(&mut self, byte: u8) {
		let stored = match self.state {
			State::ReadingStart | State::Done => true,
			State::ReadingCommand => self.command.push(byte),
			State::ReadingSource => accumulate_digit(&mut self.source, byte),
			State::ReadingDest => accumulate_digit(&mut self.dest, byte),
			State::ReadingField => {
				self.discarding || self.fields[usize::from(self.write_field)].push(byte)
			}
		};
		if !stored {
			log::trace!("dropping byte 0x{:02X} while {:?}", byte, self.state);
		}
	}

	fn clear_contents(&mut self) {
		self.command.clear();
		self.source = 0;
		self.dest = 0;
		for field in &mut self.fields {
			field.clear();
		}
		self.write_field = 0;
		self.discarding = false;
	}

	/// Return where the parser is within the frame.
	pub fn state(&self) -> State {
		self.state
	}

	/// Whether a complete frame has been parsed.
	pub fn is_complete(&self) -> bool {
		self.state == State::Done
	}

	/// Return the delimiters the message is parsed with.
	pub fn delimiters(&self) -> Delimiters {
		self.delimiters
	}

	/// Return the command, truncated to [`COMMAND_LENGTH`] bytes.
	pub fn command(&self) -> &Text<COMMAND_LENGTH> {
		&self.command
	}

	/// Return the raw source address.
	pub fn source(&self) -> u8 {
		self.source
	}

	/// Return the raw destination address.
	pub fn dest(&self) -> u8 {
		self.dest
	}

	/// Return the source address.
	pub fn source_address(&self) -> Address {
		self.source.into()
	}

	/// Return the destination address.
	pub fn dest_address(&self) -> Address {
		self.dest.into()
	}

	/// Return all of the fields.
	pub fn fields(&self) -> &[Text<FIELD_LENGTH>; NUM_FIELDS] {
		&self.fields
	}

	/// Return the field at `index`, which must be less than [`NUM_FIELDS`].
	pub fn field(&self, index: usize) -> Result<&Text<FIELD_LENGTH>, FieldOutOfRangeError> {
		self.fields
			.get(index)
			.ok_or_else(|| FieldOutOfRangeError::new(index))
	}

	/// Return the contents of the field at `index` as a `str`.
	///
	/// Fails if `index` is not less than [`NUM_FIELDS`] or if the field is
	/// not valid UTF-8. The value is at most [`FIELD_LENGTH`] bytes long.
	pub fn read_field(&self, index: usize) -> Result<&str, FieldError> {
		let field = self.field(index)?;
		field
			.to_str()
			.map_err(|e| FieldNotUtf8Error::new(index, e).into())
	}
}

impl Default for Message {
	fn default() -> Self {
		Message::new()
	}
}

impl fmt::Display for Message {
	/// Write the message back out in its wire form.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let separator = char::from(self.delimiters.separator);
		write!(
			f,
			"{}{}{separator}{}{separator}{}",
			char::from(self.delimiters.start),
			self.command,
			self.source,
			self.dest
		)?;
		for field in &self.fields {
			write!(f, "{separator}{field}")?;
		}
		write!(f, "{}", char::from(self.delimiters.end))
	}
}

/// Append a decimal digit to an address, saturating at 255.
///
/// Returns `false` if `byte` is not a digit.
fn accumulate_digit(address: &mut u8, byte: u8) -> bool {
	if !byte.is_ascii_digit() {
		return false;
	}
	*address = address.saturating_mul(10).saturating_add(byte - b'0');
	true
}
