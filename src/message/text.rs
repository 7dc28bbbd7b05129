use std::fmt;

/// A fixed-capacity text buffer holding at most `N` bytes.
///
/// Bytes pushed past the capacity are dropped rather than stored, so a `Text`
/// never allocates or grows. The contents are opaque bytes; use
/// [`to_str`](Text::to_str) to view them as UTF-8.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Text<const N: usize> {
	bytes: [u8; N],
	/// Number of bytes written so far, also the write cursor.
	len: u8,
}

impl<const N: usize> Text<N> {
	/// Fails to compile for a capacity that `len` cannot count up to.
	const CAPACITY_FITS: () = assert!(N <= u8::MAX as usize, "Text capacity must be at most 255");

	/// An empty buffer.
	pub const EMPTY: Self = {
		#[allow(clippy::let_unit_value)]
		let () = Self::CAPACITY_FITS;
		Text {
			bytes: [0; N],
			len: 0,
		}
	};

	/// The maximum number of bytes the buffer can hold.
	pub const fn capacity(&self) -> usize {
		N
	}

	/// The number of bytes stored.
	pub const fn len(&self) -> usize {
		self.len as usize
	}

	/// Whether no bytes are stored.
	pub const fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Whether the buffer is at capacity.
	pub const fn is_full(&self) -> bool {
		self.len() >= N
	}

	/// The stored bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes[..self.len()]
	}

	/// The stored bytes as a `str`, if they are valid UTF-8.
	pub fn to_str(&self) -> Result<&str, std::str::Utf8Error> {
		std::str::from_utf8(self.as_bytes())
	}

	/// Append a byte. Returns `false`, and drops the byte, if the buffer is full.
	pub(crate) fn push(&mut self, byte: u8) -> bool {
		if self.is_full() {
			return false;
		}
		self.bytes[self.len()] = byte;
		self.len += 1;
		true
	}

	/// Zero-fill the buffer and rewind the cursor.
	pub(crate) fn clear(&mut self) {
		*self = Self::EMPTY;
	}
}

impl<const N: usize> Default for Text<N> {
	fn default() -> Self {
		Self::EMPTY
	}
}

impl<const N: usize> AsRef<[u8]> for Text<N> {
	fn as_ref(&self) -> &[u8] {
		self.as_bytes()
	}
}

impl<const N: usize> PartialEq<str> for Text<N> {
	fn eq(&self, other: &str) -> bool {
		self.as_bytes() == other.as_bytes()
	}
}

impl<const N: usize> PartialEq<&str> for Text<N> {
	fn eq(&self, other: &&str) -> bool {
		self.as_bytes() == other.as_bytes()
	}
}

impl<const N: usize> PartialEq<[u8]> for Text<N> {
	fn eq(&self, other: &[u8]) -> bool {
		self.as_bytes() == other
	}
}

/// Call `write` with each valid UTF-8 run of `bytes`, and with U+FFFD in
/// place of each invalid sequence, without allocating.
fn for_each_lossy_chunk(
	mut bytes: &[u8],
	mut write: impl FnMut(&str) -> fmt::Result,
) -> fmt::Result {
	loop {
		match std::str::from_utf8(bytes) {
			Ok(valid) => return write(valid),
			Err(e) => {
				let (valid, rest) = bytes.split_at(e.valid_up_to());
				write(std::str::from_utf8(valid).unwrap_or_default())?;
				write("\u{FFFD}")?;
				bytes = &rest[e.error_len().unwrap_or(rest.len())..];
			}
		}
	}
}

impl<const N: usize> fmt::Display for Text<N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for_each_lossy_chunk(self.as_bytes(), |chunk| f.write_str(chunk))
	}
}

impl<const N: usize> fmt::Debug for Text<N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("\"")?;
		for_each_lossy_chunk(self.as_bytes(), |chunk| {
			write!(f, "{}", chunk.escape_debug())
		})?;
		f.write_str("\"")
	}
}
