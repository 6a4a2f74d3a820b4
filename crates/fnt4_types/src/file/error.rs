//! Error types for file format parsing and manipulation.

use thiserror::Error;

use crate::file::fnt4::GlyphId;

/// Reasons an LZ77 stream can fail to decode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamCorruption {
	/// A back-reference points before the start of the output
	#[error(
		"back-reference at input offset {position} reaches {distance} bytes back, but only {available} bytes were decoded"
	)]
	BackReferenceUnderflow {
		/// Input offset of the back-reference code
		position: usize,
		/// Distance encoded in the back-reference
		distance: usize,
		/// Number of bytes decoded so far
		available: usize,
	},

	/// The input ends in the middle of a back-reference code
	#[error("back-reference at input offset {position} needs {width} bytes, only {remaining} left")]
	TruncatedReference {
		/// Input offset of the back-reference code
		position: usize,
		/// Width of a back-reference code in bytes
		width: usize,
		/// Bytes left in the input
		remaining: usize,
	},

	/// The decoded payload does not have the size the glyph header implies
	#[error("decoded {actual} bytes, expected {expected}")]
	LengthMismatch {
		/// Size computed from the glyph header
		expected: usize,
		/// Size actually decoded
		actual: usize,
	},
}

/// Errors that can occur when parsing, decoding or building FNT4 fonts
#[derive(Debug, Error)]
pub enum Fnt4Error {
	/// Not enough data to parse
	#[error("Insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Invalid magic number
	#[error("Invalid magic number: {0:02X?}")]
	BadMagic([u8; 4]),

	/// Header matches neither the version 0 nor the version 1 layout
	#[error(
		"Unsupported FNT4 layout: version field {version_field:#010X}, padding field {padding_field:#010X}"
	)]
	UnsupportedVersion {
		/// 32-bit little-endian value at offset 4
		version_field: u32,
		/// 32-bit little-endian value at offset 12
		padding_field: u32,
	},

	/// Declared file size differs from the buffer length
	#[error("File size mismatch: header declares {declared} bytes, buffer holds {actual} bytes")]
	SizeMismatch {
		/// Size stored in the header
		declared: u32,
		/// Actual buffer length
		actual: usize,
	},

	/// A reserved byte that must be zero is not
	#[error("Malformed header at offset {offset:#X}: `{field}` must be 0, found {value:#04X}")]
	MalformedHeader {
		/// Byte offset of the record in the file
		offset: usize,
		/// Name of the reserved field
		field: &'static str,
		/// Value found
		value: u8,
	},

	/// A character table entry does not point at a glyph record inside the file
	#[error("Character {character:#06X} points at invalid glyph offset {offset:#X}")]
	InvalidOffset {
		/// Character table index
		character: usize,
		/// Offset stored in the table
		offset: u32,
	},

	/// LZ77 payload could not be decoded
	#[error("Corrupt LZ77 stream: {0}")]
	CorruptStream(#[from] StreamCorruption),

	/// The encoder produced a back-reference the format cannot represent
	#[error(
		"Encoder produced back-reference (length {length}, distance {distance}) outside {min_length}..={max_length} / 1..={max_distance}"
	)]
	EncodeConstraintViolation {
		/// Match length
		length: usize,
		/// Match distance
		distance: usize,
		/// Smallest representable length
		min_length: usize,
		/// Largest representable length
		max_length: usize,
		/// Largest representable distance
		max_distance: usize,
	},

	/// No glyph with this id
	#[error("Glyph {0} not found")]
	GlyphNotFound(GlyphId),

	/// A glyph cannot be serialized with the target format version
	#[error("Glyph {glyph} cannot be written: {reason}")]
	InvalidGlyph {
		/// Id of the rejected glyph
		glyph: GlyphId,
		/// What is wrong with it
		reason: String,
	},

	/// Offsets of the serialized font would not fit in 32 bits
	#[error("Font of {0} bytes exceeds the 32-bit offset range")]
	FileTooLarge(usize),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl Fnt4Error {
	/// Shorthand for [`Fnt4Error::InsufficientData`]
	pub fn insufficient_data(expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			expected,
			actual,
		}
	}
}
