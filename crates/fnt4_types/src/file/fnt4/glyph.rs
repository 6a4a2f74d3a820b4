//! Glyph records of FNT4 files.
//!
//! Every distinct character table offset points at a glyph record: a small header followed
//! by the (usually LZ77-compressed) texture payload. A `compressed_size` of 0 means the
//! payload is stored raw and its size follows from the header dimensions.
//!
//! ## Version 1 record (10-byte header)
//!
//! | Offset | Type | Field             |
//! |--------|------|-------------------|
//! | 0x00   | i8   | `bearing_x`       |
//! | 0x01   | i8   | `bearing_y`       |
//! | 0x02   | u8   | `actual_width`    |
//! | 0x03   | u8   | `actual_height`   |
//! | 0x04   | u8   | `advance_width`   |
//! | 0x05   | u8   | unused, always 0  |
//! | 0x06   | u8   | `texture_width`   |
//! | 0x07   | u8   | `texture_height`  |
//! | 0x08   | u16  | `compressed_size` |
//!
//! ## Version 0 record (8-byte header)
//!
//! Same as version 1 up to offset 0x06, where `compressed_size` (u16) follows directly.

use std::fmt::Display;

use bytes::{Buf, BufMut, Bytes};
use serde::Serialize;

use crate::file::{Fnt4Error, lz77};

use super::{
	FormatVersion,
	constants,
	sjis,
	texture::{self, Bitmap, MipLevel},
};

/// Version 0 glyph record header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphHeaderV0 {
	/// Pen to left edge of the bitmap
	pub bearing_x: i8,
	/// Baseline to top edge of the bitmap
	pub bearing_y: i8,
	/// Bitmap width
	pub actual_width: u8,
	/// Bitmap height
	pub actual_height: u8,
	/// Horizontal pen movement after drawing
	pub advance_width: u8,
	/// Reserved, must be 0
	pub unknown: u8,
	/// Payload size, 0 for raw payloads
	pub compressed_size: u16,
}

impl GlyphHeaderV0 {
	/// Header size in bytes
	pub const SIZE: usize = constants::V0_GLYPH_HEADER_SIZE;

	fn read(reader: &mut impl Buf) -> Self {
		Self {
			bearing_x: reader.get_i8(),
			bearing_y: reader.get_i8(),
			actual_width: reader.get_u8(),
			actual_height: reader.get_u8(),
			advance_width: reader.get_u8(),
			unknown: reader.get_u8(),
			compressed_size: reader.get_u16_le(),
		}
	}

	fn write(&self, writer: &mut impl BufMut) {
		writer.put_i8(self.bearing_x);
		writer.put_i8(self.bearing_y);
		writer.put_u8(self.actual_width);
		writer.put_u8(self.actual_height);
		writer.put_u8(self.advance_width);
		writer.put_u8(self.unknown);
		writer.put_u16_le(self.compressed_size);
	}

	/// Size of the decoded payload: `ceil(actual_width / 2) * actual_height`
	pub fn uncompressed_size(&self) -> usize {
		usize::from(self.actual_width).div_ceil(2) * usize::from(self.actual_height)
	}
}

/// Version 1 glyph record header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphHeaderV1 {
	/// Pen to left edge of the bitmap
	pub bearing_x: i8,
	/// Baseline to top edge of the bitmap
	pub bearing_y: i8,
	/// Width of the visible part of the texture
	pub actual_width: u8,
	/// Height of the visible part of the texture
	pub actual_height: u8,
	/// Horizontal pen movement after drawing
	pub advance_width: u8,
	/// Reserved, must be 0
	pub unused: u8,
	/// Level 0 texture width, normally a power of two
	pub texture_width: u8,
	/// Level 0 texture height, normally a power of two
	pub texture_height: u8,
	/// Payload size, 0 for raw payloads
	pub compressed_size: u16,
}

impl GlyphHeaderV1 {
	/// Header size in bytes
	pub const SIZE: usize = constants::V1_GLYPH_HEADER_SIZE;

	fn read(reader: &mut impl Buf) -> Self {
		Self {
			bearing_x: reader.get_i8(),
			bearing_y: reader.get_i8(),
			actual_width: reader.get_u8(),
			actual_height: reader.get_u8(),
			advance_width: reader.get_u8(),
			unused: reader.get_u8(),
			texture_width: reader.get_u8(),
			texture_height: reader.get_u8(),
			compressed_size: reader.get_u16_le(),
		}
	}

	fn write(&self, writer: &mut impl BufMut) {
		writer.put_i8(self.bearing_x);
		writer.put_i8(self.bearing_y);
		writer.put_u8(self.actual_width);
		writer.put_u8(self.actual_height);
		writer.put_u8(self.advance_width);
		writer.put_u8(self.unused);
		writer.put_u8(self.texture_width);
		writer.put_u8(self.texture_height);
		writer.put_u16_le(self.compressed_size);
	}

	/// Size of a raw payload: `w*h + w*h/4 + w*h/16 + w*h/64` for the level 0 texture.
	///
	/// Equal to the sum of the four mip planes when both texture sides are powers of two.
	pub fn uncompressed_size(&self) -> usize {
		let area = usize::from(self.texture_width) * usize::from(self.texture_height);
		area + area / 4 + area / 16 + area / 64
	}
}

/// Glyph record header of either version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphHeader {
	/// Version 0 record
	V0(GlyphHeaderV0),
	/// Version 1 record
	V1(GlyphHeaderV1),
}

impl GlyphHeader {
	/// Parses the record header at `offset` of `data`.
	///
	/// # Errors
	///
	/// - [`Fnt4Error::InsufficientData`] if the header runs past the end of `data`
	/// - [`Fnt4Error::MalformedHeader`] if the reserved byte is not 0
	pub fn parse(data: &[u8], offset: usize, version: FormatVersion) -> Result<Self, Fnt4Error> {
		let size = version.glyph_header_size();
		let end = offset.saturating_add(size);
		if end > data.len() {
			return Err(Fnt4Error::insufficient_data(end, data.len()));
		}

		let mut reader = &data[offset..end];
		let header = match version {
			FormatVersion::V0 => GlyphHeader::V0(GlyphHeaderV0::read(&mut reader)),
			FormatVersion::V1 => GlyphHeader::V1(GlyphHeaderV1::read(&mut reader)),
		};

		let (field, value) = match header {
			GlyphHeader::V0(h) => ("unknown", h.unknown),
			GlyphHeader::V1(h) => ("unused", h.unused),
		};
		if value != 0 {
			return Err(Fnt4Error::MalformedHeader {
				offset: offset + 5,
				field,
				value,
			});
		}

		Ok(header)
	}

	/// Serializes the header.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut buffer = Vec::with_capacity(self.version().glyph_header_size());
		match self {
			GlyphHeader::V0(h) => h.write(&mut buffer),
			GlyphHeader::V1(h) => h.write(&mut buffer),
		}
		buffer
	}

	/// Format version of the record
	pub fn version(&self) -> FormatVersion {
		match self {
			GlyphHeader::V0(_) => FormatVersion::V0,
			GlyphHeader::V1(_) => FormatVersion::V1,
		}
	}

	/// Stored `compressed_size`
	pub fn compressed_size(&self) -> u16 {
		match self {
			GlyphHeader::V0(h) => h.compressed_size,
			GlyphHeader::V1(h) => h.compressed_size,
		}
	}

	/// Copy of the header with a different `compressed_size`
	pub fn with_compressed_size(self, compressed_size: u16) -> Self {
		match self {
			GlyphHeader::V0(h) => GlyphHeader::V0(GlyphHeaderV0 {
				compressed_size,
				..h
			}),
			GlyphHeader::V1(h) => GlyphHeader::V1(GlyphHeaderV1 {
				compressed_size,
				..h
			}),
		}
	}

	/// Whether the payload is LZ77-compressed
	pub fn is_compressed(&self) -> bool {
		self.compressed_size() != 0
	}

	/// Size of the raw payload implied by the header dimensions
	pub fn uncompressed_size(&self) -> usize {
		match self {
			GlyphHeader::V0(h) => h.uncompressed_size(),
			GlyphHeader::V1(h) => h.uncompressed_size(),
		}
	}

	/// Number of payload bytes following the header
	pub fn payload_size(&self) -> usize {
		if self.is_compressed() {
			usize::from(self.compressed_size())
		} else {
			self.uncompressed_size()
		}
	}

	/// Metrics of the record, attributed to `character`
	pub fn info(&self, character: Character) -> GlyphInfo {
		match *self {
			GlyphHeader::V0(h) => GlyphInfo {
				bearing_x: h.bearing_x,
				bearing_y: h.bearing_y,
				actual_width: h.actual_width,
				actual_height: h.actual_height,
				advance_width: h.advance_width,
				texture: None,
				character,
			},
			GlyphHeader::V1(h) => GlyphInfo {
				bearing_x: h.bearing_x,
				bearing_y: h.bearing_y,
				actual_width: h.actual_width,
				actual_height: h.actual_height,
				advance_width: h.advance_width,
				texture: Some((h.texture_width, h.texture_height)),
				character,
			},
		}
	}
}

/// Identity of a character table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Character {
	/// Version 1: the table index is the Unicode code point
	Unicode(u32),

	/// Version 0: the table index numbers Shift-JIS codes, see [`sjis`]
	ShiftJis {
		/// Character table index
		index: u32,
		/// Shift-JIS code, if the index is inside the numbering
		code: Option<u16>,
	},
}

impl Character {
	/// Identity of table entry `index` in a file of the given version.
	pub fn from_index(version: FormatVersion, index: u32) -> Self {
		match version {
			FormatVersion::V1 => Character::Unicode(index),
			FormatVersion::V0 => Character::ShiftJis {
				index,
				code: sjis::map_sjis(index),
			},
		}
	}

	/// Character table index
	pub fn index(&self) -> u32 {
		match *self {
			Character::Unicode(index)
			| Character::ShiftJis {
				index,
				..
			} => index,
		}
	}

	/// The character itself, if it is representable
	pub fn to_char(&self) -> Option<char> {
		match *self {
			Character::Unicode(code_point) => char::from_u32(code_point),
			Character::ShiftJis {
				code,
				..
			} => code.and_then(sjis::decode_char),
		}
	}
}

impl Display for Character {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Character::Unicode(code_point) => write!(f, "U+{code_point:04X}"),
			Character::ShiftJis {
				code: Some(code),
				..
			} => write!(f, "SJIS {code:04X}"),
			Character::ShiftJis {
				index,
				code: None,
			} => write!(f, "#{index}"),
		}
	}
}

/// Glyph metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GlyphInfo {
	/// Distance from the pen position to the left edge of the bitmap
	pub bearing_x: i8,
	/// Distance from the baseline to the top edge of the bitmap
	pub bearing_y: i8,
	/// Visible bitmap width
	pub actual_width: u8,
	/// Visible bitmap height
	pub actual_height: u8,
	/// Horizontal pen movement after drawing
	pub advance_width: u8,
	/// Level 0 texture size, version 1 only
	pub texture: Option<(u8, u8)>,
	/// Character of the first table entry pointing at the glyph
	pub character: Character,
}

impl GlyphInfo {
	/// `(actual_width, actual_height)`
	pub fn actual_size(&self) -> (u32, u32) {
		(u32::from(self.actual_width), u32::from(self.actual_height))
	}

	/// `(texture_width, texture_height)`, version 1 only
	pub fn texture_size(&self) -> Option<(u32, u32)> {
		self.texture.map(|(w, h)| (u32::from(w), u32::from(h)))
	}

	/// Visible size as a fraction of the texture size.
	///
	/// `None` for version 0 glyphs and for empty textures.
	pub fn actual_size_normalized(&self) -> Option<(f32, f32)> {
		let (texture_width, texture_height) = self.texture_size()?;
		if texture_width == 0 || texture_height == 0 {
			return None;
		}
		Some((
			f32::from(self.actual_width) / texture_width as f32,
			f32::from(self.actual_height) / texture_height as f32,
		))
	}

	/// Bearing in screen space, where Y grows downwards.
	pub fn bearing_screenspace(&self) -> (f32, f32) {
		(f32::from(self.bearing_x), -f32::from(self.bearing_y))
	}
}

/// Glyph payload as stored in the file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphData {
	bytes: Bytes,
	is_compressed: bool,
}

impl GlyphData {
	/// Wraps payload bytes.
	pub fn new(bytes: Bytes, is_compressed: bool) -> Self {
		Self {
			bytes,
			is_compressed,
		}
	}

	/// Stored bytes
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Whether the bytes are an LZ77 stream
	pub fn is_compressed(&self) -> bool {
		self.is_compressed
	}

	/// Number of stored bytes
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Whether nothing is stored
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Decoded payload: the LZ77 stream expanded, or a copy of the raw bytes.
	///
	/// # Errors
	///
	/// Returns [`Fnt4Error::CorruptStream`] if the stream cannot be decoded.
	pub fn decompress(&self, layout: lz77::Layout) -> Result<Vec<u8>, Fnt4Error> {
		if self.is_compressed {
			lz77::decompress(&self.bytes, layout)
		} else {
			Ok(self.bytes.to_vec())
		}
	}
}

/// A glyph record whose payload has not been decoded yet.
///
/// Holds a cheap slice of the file buffer, so it can be sent to other threads and decoded
/// there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyGlyph {
	offset: usize,
	header: GlyphHeader,
	info: GlyphInfo,
	data: GlyphData,
}

impl LazyGlyph {
	/// Reads the record at `offset` of `buffer`.
	///
	/// # Errors
	///
	/// - [`Fnt4Error::InsufficientData`] if the header or payload runs past the end of the buffer
	/// - [`Fnt4Error::MalformedHeader`] if the reserved header byte is not 0
	pub fn read(
		buffer: &Bytes,
		offset: usize,
		version: FormatVersion,
		character: Character,
	) -> Result<Self, Fnt4Error> {
		let header = GlyphHeader::parse(buffer, offset, version)?;

		let start = offset + version.glyph_header_size();
		let end = start + header.payload_size();
		if end > buffer.len() {
			return Err(Fnt4Error::insufficient_data(end, buffer.len()));
		}

		Ok(Self {
			offset,
			header,
			info: header.info(character),
			data: GlyphData::new(buffer.slice(start..end), header.is_compressed()),
		})
	}

	/// Offset of the record in the file
	pub fn offset(&self) -> usize {
		self.offset
	}

	/// Record header
	pub fn header(&self) -> &GlyphHeader {
		&self.header
	}

	/// Glyph metrics
	pub fn info(&self) -> &GlyphInfo {
		&self.info
	}

	/// Stored payload
	pub fn data(&self) -> &GlyphData {
		&self.data
	}

	/// Decodes the payload into bitmaps.
	///
	/// # Errors
	///
	/// Returns [`Fnt4Error::CorruptStream`] if the payload cannot be decoded or does not have
	/// the size the header implies.
	pub fn decompress(&self) -> Result<Glyph, Fnt4Error> {
		let raw = self.data.decompress(self.header.version().lz_layout())?;
		let mip_levels = match &self.header {
			GlyphHeader::V0(h) => vec![texture::unpack_v0(h, &raw)?],
			GlyphHeader::V1(h) => texture::unpack_v1(h, &raw)?,
		};
		Ok(Glyph::new(self.info, mip_levels))
	}
}

/// A decoded glyph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Glyph {
	info: GlyphInfo,
	mip_levels: Vec<Bitmap>,
}

impl Glyph {
	/// Creates a glyph from metrics and bitmaps, largest level first.
	pub fn new(info: GlyphInfo, mip_levels: Vec<Bitmap>) -> Self {
		Self {
			info,
			mip_levels,
		}
	}

	/// Glyph metrics
	pub fn info(&self) -> &GlyphInfo {
		&self.info
	}

	/// Bitmap of a mip level. Version 0 glyphs only have [`MipLevel::Level0`].
	pub fn mip_level(&self, level: MipLevel) -> Option<&Bitmap> {
		self.mip_levels.get(level.index())
	}

	/// All bitmaps, largest first
	pub fn mip_levels(&self) -> &[Bitmap] {
		&self.mip_levels
	}

	/// Full resolution bitmap
	pub fn bitmap(&self) -> Option<&Bitmap> {
		self.mip_level(MipLevel::Level0)
	}

	/// Consumes the glyph, returning its bitmaps.
	pub fn into_mip_levels(self) -> Vec<Bitmap> {
		self.mip_levels
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const V1_RECORD: [u8; 12] = [0x01, 0x0B, 0x01, 0x01, 0x02, 0x00, 0x01, 0x01, 0x02, 0x00, 0x00, 0xFF];

	#[test]
	fn test_parse_v1_header() {
		let header = GlyphHeader::parse(&V1_RECORD, 0, FormatVersion::V1).unwrap();
		let GlyphHeader::V1(h) = header else {
			panic!("Expected version 1 header");
		};
		assert_eq!(h.bearing_x, 1);
		assert_eq!(h.bearing_y, 11);
		assert_eq!(h.advance_width, 2);
		assert_eq!((h.texture_width, h.texture_height), (1, 1));
		assert_eq!(header.payload_size(), 2);
		assert_eq!(header.to_bytes(), V1_RECORD[..10]);
	}

	#[test]
	fn test_parse_v0_header() {
		let record = [0xFE, 0x0E, 0x05, 0x0E, 0x06, 0x00, 0x00, 0x00];
		let header = GlyphHeader::parse(&record, 0, FormatVersion::V0).unwrap();
		let GlyphHeader::V0(h) = header else {
			panic!("Expected version 0 header");
		};
		assert_eq!(h.bearing_x, -2);
		assert!(!header.is_compressed());
		// 3 bytes per row, 14 rows
		assert_eq!(header.payload_size(), 42);
	}

	#[test]
	fn test_reserved_byte() {
		let mut record = V1_RECORD;
		record[5] = 0x7F;
		match GlyphHeader::parse(&record, 0, FormatVersion::V1) {
			Err(Fnt4Error::MalformedHeader {
				offset,
				field,
				value,
			}) => {
				assert_eq!(offset, 5);
				assert_eq!(field, "unused");
				assert_eq!(value, 0x7F);
			}
			other => panic!("Expected MalformedHeader, got {other:?}"),
		}
	}

	#[test]
	fn test_uncompressed_size_v1() {
		let header = GlyphHeaderV1 {
			bearing_x: 0,
			bearing_y: 0,
			actual_width: 7,
			actual_height: 8,
			advance_width: 8,
			unused: 0,
			texture_width: 8,
			texture_height: 8,
			compressed_size: 0,
		};
		assert_eq!(header.uncompressed_size(), 85);
	}

	#[test]
	fn test_lazy_glyph_truncated_payload() {
		let buffer = Bytes::copy_from_slice(&V1_RECORD[..11]);
		assert!(matches!(
			LazyGlyph::read(&buffer, 0, FormatVersion::V1, Character::Unicode(0)),
			Err(Fnt4Error::InsufficientData {
				expected: 12,
				actual: 11,
			})
		));
	}

	#[test]
	fn test_lazy_glyph_decompress() {
		let buffer = Bytes::copy_from_slice(&V1_RECORD);
		let lazy = LazyGlyph::read(&buffer, 0, FormatVersion::V1, Character::Unicode(0x41)).unwrap();
		assert!(lazy.data().is_compressed());

		let glyph = lazy.decompress().unwrap();
		assert_eq!(glyph.bitmap().map(Bitmap::pixels), Some(&[0xFF][..]));
		assert_eq!(glyph.mip_levels().len(), 4);
		assert_eq!(glyph.info().character.to_char(), Some('A'));
	}

	#[test]
	fn test_glyph_info_helpers() {
		let info = GlyphInfo {
			bearing_x: -1,
			bearing_y: 12,
			actual_width: 12,
			actual_height: 8,
			advance_width: 14,
			texture: Some((16, 16)),
			character: Character::Unicode(0x3042),
		};
		assert_eq!(info.actual_size(), (12, 8));
		assert_eq!(info.texture_size(), Some((16, 16)));
		assert_eq!(info.actual_size_normalized(), Some((0.75, 0.5)));
		assert_eq!(info.bearing_screenspace(), (-1.0, -12.0));
		assert_eq!(info.character.to_char(), Some('あ'));

		let v0 = GlyphInfo {
			texture: None,
			..info
		};
		assert_eq!(v0.actual_size_normalized(), None);
	}

	#[test]
	fn test_character_identity() {
		assert_eq!(Character::from_index(FormatVersion::V1, 0x41), Character::Unicode(0x41));
		assert_eq!(
			Character::from_index(FormatVersion::V0, 0x41),
			Character::ShiftJis {
				index: 0x41,
				code: Some(0x41),
			}
		);
		assert_eq!(Character::Unicode(0xD800).to_char(), None);
		assert_eq!(Character::Unicode(0x41).to_string(), "U+0041");
		assert_eq!(Character::from_index(FormatVersion::V0, 0x41).to_string(), "SJIS 0041");
	}
}
