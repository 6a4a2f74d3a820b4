//! LZ77 variant used to pack FNT4 glyph bitmaps.
//!
//! ## Stream Format
//!
//! The stream is a sequence of groups. Each group starts with a control byte whose bits,
//! read from LSB to MSB, tell the decoder what each of the following (up to 8) items is:
//!
//! - `0`: a literal byte, copied to the output as-is
//! - `1`: a back-reference code of [`Layout::code_width`] bytes, big-endian
//!
//! A group may end early when the input runs out, so the final control byte can describe
//! fewer than 8 items.
//!
//! ## Back-Reference Codes
//!
//! | Layout             | Width | High bits                | Low bits                 |
//! |--------------------|-------|--------------------------|--------------------------|
//! | [`Layout::FNT4_V0`]| 1     | distance - 1 (5 bits)    | length - 2 (3 bits)      |
//! | [`Layout::FNT4_V1`]| 2     | length - 3 (6 bits)      | distance - 1 (10 bits)   |
//!
//! A reference copies `length` bytes, one at a time, from `distance` bytes behind the current
//! end of the output. Because every copied byte is appended before the next one is read,
//! `distance < length` repeats the last `distance` bytes periodically:
//!
//! ```
//! use fnt4_types::file::lz77::{Layout, decompress};
//!
//! // literal 'a', then (length 5, distance 1)
//! let stream = [0b0000_0010, b'a', 0x08, 0x00];
//! assert_eq!(decompress(&stream, Layout::FNT4_V1).unwrap(), b"aaaaaa");
//! ```

mod decode;
mod encode;

pub use decode::{decompress, decompress_exact};
pub use encode::compress;

use crate::file::Fnt4Error;

/// Width of a back-reference code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeWidth {
	/// One byte, distance in the high bits
	Byte,

	/// Two big-endian bytes, length in the high bits
	Word,
}

impl CodeWidth {
	/// Number of bytes a code occupies in the stream
	pub const fn bytes(self) -> usize {
		match self {
			CodeWidth::Byte => 1,
			CodeWidth::Word => 2,
		}
	}

	const fn bits(self) -> u32 {
		self.bytes() as u32 * 8
	}
}

/// Bit layout of back-reference codes.
///
/// For [`CodeWidth::Byte`] the low bits hold the length, for [`CodeWidth::Word`] they hold
/// the distance, matching the two FNT4 versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout {
	width: CodeWidth,
	low_bits: u32,
}

impl Layout {
	/// FNT4 version 0: one-byte codes, 3 length bits
	pub const FNT4_V0: Self = Self {
		width: CodeWidth::Byte,
		low_bits: 3,
	};

	/// FNT4 version 1: two-byte codes, 10 distance bits
	pub const FNT4_V1: Self = Self {
		width: CodeWidth::Word,
		low_bits: 10,
	};

	/// One-byte layout with `length_bits` low bits of length (1..=7).
	pub const fn short(length_bits: u32) -> Option<Self> {
		if length_bits == 0 || length_bits >= 8 {
			return None;
		}
		Some(Self {
			width: CodeWidth::Byte,
			low_bits: length_bits,
		})
	}

	/// Two-byte layout with `offset_bits` low bits of distance (1..=15).
	pub const fn long(offset_bits: u32) -> Option<Self> {
		if offset_bits == 0 || offset_bits >= 16 {
			return None;
		}
		Some(Self {
			width: CodeWidth::Word,
			low_bits: offset_bits,
		})
	}

	/// Width of a back-reference code
	pub const fn width(&self) -> CodeWidth {
		self.width
	}

	/// Number of bytes a back-reference code occupies
	pub const fn code_width(&self) -> usize {
		self.width.bytes()
	}

	const fn length_bits(&self) -> u32 {
		match self.width {
			CodeWidth::Byte => self.low_bits,
			CodeWidth::Word => CodeWidth::Word.bits() - self.low_bits,
		}
	}

	const fn distance_bits(&self) -> u32 {
		match self.width {
			CodeWidth::Byte => CodeWidth::Byte.bits() - self.low_bits,
			CodeWidth::Word => self.low_bits,
		}
	}

	/// Shortest match a code can express
	pub const fn min_length(&self) -> usize {
		match self.width {
			CodeWidth::Byte => 2,
			CodeWidth::Word => 3,
		}
	}

	/// Longest match a code can express
	pub const fn max_length(&self) -> usize {
		(1 << self.length_bits()) - 1 + self.min_length()
	}

	/// Farthest distance a code can reach back
	pub const fn max_distance(&self) -> usize {
		1 << self.distance_bits()
	}

	/// Splits a code into `(length, distance)`.
	pub const fn unpack(&self, code: u16) -> (usize, usize) {
		let code = code as usize;
		let low_mask = (1 << self.low_bits) - 1;
		let (length, distance) = match self.width {
			CodeWidth::Byte => (code & low_mask, code >> self.low_bits),
			CodeWidth::Word => (code >> self.low_bits, code & low_mask),
		};
		(length + self.min_length(), distance + 1)
	}

	/// Builds the code for a back-reference.
	///
	/// # Errors
	///
	/// Returns [`Fnt4Error::EncodeConstraintViolation`] if `length` or `distance` is outside
	/// the representable range.
	pub fn pack(&self, length: usize, distance: usize) -> Result<u16, Fnt4Error> {
		if !(self.min_length()..=self.max_length()).contains(&length)
			|| !(1..=self.max_distance()).contains(&distance)
		{
			return Err(Fnt4Error::EncodeConstraintViolation {
				length,
				distance,
				min_length: self.min_length(),
				max_length: self.max_length(),
				max_distance: self.max_distance(),
			});
		}

		let length = length - self.min_length();
		let distance = distance - 1;
		let code = match self.width {
			CodeWidth::Byte => (distance << self.low_bits) | length,
			CodeWidth::Word => (length << self.low_bits) | distance,
		};
		Ok(code as u16)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_preset_limits() {
		assert_eq!(Layout::FNT4_V1.code_width(), 2);
		assert_eq!(Layout::FNT4_V1.min_length(), 3);
		assert_eq!(Layout::FNT4_V1.max_length(), 66);
		assert_eq!(Layout::FNT4_V1.max_distance(), 1024);

		assert_eq!(Layout::FNT4_V0.code_width(), 1);
		assert_eq!(Layout::FNT4_V0.min_length(), 2);
		assert_eq!(Layout::FNT4_V0.max_length(), 9);
		assert_eq!(Layout::FNT4_V0.max_distance(), 32);
	}

	#[test]
	fn test_custom_layouts() {
		assert_eq!(Layout::long(10), Some(Layout::FNT4_V1));
		assert_eq!(Layout::short(3), Some(Layout::FNT4_V0));
		assert_eq!(Layout::long(12).map(|l| l.max_length()), Some(18));
		assert_eq!(Layout::long(12).map(|l| l.max_distance()), Some(4096));
		assert!(Layout::long(0).is_none());
		assert!(Layout::long(16).is_none());
		assert!(Layout::short(8).is_none());
	}

	#[test]
	fn test_unpack_v1() {
		// length bits 0b000010, distance bits 0
		assert_eq!(Layout::FNT4_V1.unpack(0x0800), (5, 1));
		assert_eq!(Layout::FNT4_V1.unpack(0x0000), (3, 1));
		assert_eq!(Layout::FNT4_V1.unpack(0xFFFF), (66, 1024));
	}

	#[test]
	fn test_unpack_v0() {
		assert_eq!(Layout::FNT4_V0.unpack(0x00), (2, 1));
		// distance - 1 = 0b00011, length - 2 = 0b101
		assert_eq!(Layout::FNT4_V0.unpack(0b0001_1101), (7, 4));
		assert_eq!(Layout::FNT4_V0.unpack(0xFF), (9, 32));
	}

	#[test]
	fn test_pack_inverts_unpack() {
		for layout in [Layout::FNT4_V0, Layout::FNT4_V1] {
			for length in [layout.min_length(), layout.max_length()] {
				for distance in [1, layout.max_distance()] {
					let code = layout.pack(length, distance).unwrap();
					assert_eq!(layout.unpack(code), (length, distance));
				}
			}
		}
	}

	#[test]
	fn test_pack_rejects_out_of_range() {
		let layout = Layout::FNT4_V1;
		for (length, distance) in [(2, 1), (67, 1), (3, 0), (3, 1025)] {
			match layout.pack(length, distance) {
				Err(Fnt4Error::EncodeConstraintViolation {
					length: l,
					distance: d,
					..
				}) => {
					assert_eq!((l, d), (length, distance));
				}
				other => panic!("Expected EncodeConstraintViolation, got {other:?}"),
			}
		}
		assert!(Layout::FNT4_V0.pack(10, 1).is_err());
		assert!(Layout::FNT4_V0.pack(2, 33).is_err());
	}
}
