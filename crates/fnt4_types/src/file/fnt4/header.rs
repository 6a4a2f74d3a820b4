//! FNT4 file header.
//!
//! Both versions use a 16-byte little-endian header starting with `"FNT4"`, but lay out the
//! remaining fields differently:
//!
//! | Offset | Version 1          | Version 0          |
//! |--------|--------------------|--------------------|
//! | 0x00   | magic `"FNT4"`     | magic `"FNT4"`     |
//! | 0x04   | version (u32, = 1) | file size (u32)    |
//! | 0x08   | file size (u32)    | ascent (u16)       |
//! | 0x0A   |                    | descent (u16)      |
//! | 0x0C   | ascent (u16)       | padding (u32, = 0) |
//! | 0x0E   | descent (u16)      |                    |
//!
//! The version is not stored in version 0 files, so it is inferred by probing: a version 1
//! field is tried first, then the version 0 padding.

use std::{fmt::Display, io::Read};

use bytes::{Buf, BufMut};
use serde::Serialize;

use crate::file::{Fnt4Error, lz77::Layout};

use super::constants;

/// Container format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u32)]
pub enum FormatVersion {
	/// Older layout: Shift-JIS indexed characters, 4bpp single-level glyphs
	V0 = 0,

	/// Newer layout: Unicode indexed characters, 8bpp glyphs with 4 mip levels
	V1 = 1,
}

impl FormatVersion {
	/// LZ77 code layout used by glyph payloads of this version
	pub const fn lz_layout(self) -> Layout {
		match self {
			FormatVersion::V0 => Layout::FNT4_V0,
			FormatVersion::V1 => Layout::FNT4_V1,
		}
	}

	/// Size of a glyph record header in bytes
	pub const fn glyph_header_size(self) -> usize {
		match self {
			FormatVersion::V0 => constants::V0_GLYPH_HEADER_SIZE,
			FormatVersion::V1 => constants::V1_GLYPH_HEADER_SIZE,
		}
	}

	/// Number of mip levels stored per glyph
	pub const fn mip_levels(self) -> usize {
		match self {
			FormatVersion::V0 => 1,
			FormatVersion::V1 => constants::MIP_LEVELS,
		}
	}
}

impl Display for FormatVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "v{}", *self as u32)
	}
}

/// FNT4 file header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Header {
	version: FormatVersion,
	file_size: u32,
	ascent: u16,
	descent: u16,
}

impl Header {
	/// Header size in bytes
	pub const SIZE: usize = constants::HEADER_SIZE;

	/// Creates a header. `file_size` must be the size of the whole serialized file.
	pub fn new(version: FormatVersion, file_size: u32, ascent: u16, descent: u16) -> Self {
		Self {
			version,
			file_size,
			ascent,
			descent,
		}
	}

	/// Parses a header from the start of `data`.
	///
	/// Only the header itself is read; the declared file size is not compared with
	/// `data.len()`, see [`Header::check_file_size`].
	///
	/// # Errors
	///
	/// - [`Fnt4Error::InsufficientData`] if `data` is shorter than 16 bytes
	/// - [`Fnt4Error::BadMagic`] if `data` does not start with `"FNT4"`
	/// - [`Fnt4Error::UnsupportedVersion`] if the header matches neither layout
	pub fn from_bytes(data: &[u8]) -> Result<Self, Fnt4Error> {
		if data.len() < Self::SIZE {
			return Err(Fnt4Error::insufficient_data(Self::SIZE, data.len()));
		}

		let mut reader = &data[..Self::SIZE];
		let mut magic = [0u8; 4];
		reader.copy_to_slice(&mut magic);
		if &magic != constants::MAGIC {
			return Err(Fnt4Error::BadMagic(magic));
		}

		let version_field = (&data[4..8]).get_u32_le();
		let padding_field = (&data[12..16]).get_u32_le();

		let header = if version_field == FormatVersion::V1 as u32 {
			reader.advance(4);
			Self {
				version: FormatVersion::V1,
				file_size: reader.get_u32_le(),
				ascent: reader.get_u16_le(),
				descent: reader.get_u16_le(),
			}
		} else if padding_field == 0 {
			Self {
				version: FormatVersion::V0,
				file_size: reader.get_u32_le(),
				ascent: reader.get_u16_le(),
				descent: reader.get_u16_le(),
			}
		} else {
			return Err(Fnt4Error::UnsupportedVersion {
				version_field,
				padding_field,
			});
		};

		Ok(header)
	}

	/// Reads a header from a reader.
	///
	/// # Errors
	///
	/// Returns an error if reading fails or the header is invalid, see [`Header::from_bytes`].
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, Fnt4Error> {
		let mut buffer = [0u8; Self::SIZE];
		reader.read_exact(&mut buffer)?;
		Self::from_bytes(&buffer)
	}

	/// Serializes the header in the layout of its version.
	pub fn to_bytes(&self) -> [u8; Self::SIZE] {
		let mut buffer = [0u8; Self::SIZE];
		let mut writer = &mut buffer[..];
		writer.put_slice(constants::MAGIC);
		match self.version {
			FormatVersion::V1 => {
				writer.put_u32_le(FormatVersion::V1 as u32);
				writer.put_u32_le(self.file_size);
				writer.put_u16_le(self.ascent);
				writer.put_u16_le(self.descent);
			}
			FormatVersion::V0 => {
				writer.put_u32_le(self.file_size);
				writer.put_u16_le(self.ascent);
				writer.put_u16_le(self.descent);
				writer.put_u32_le(0);
			}
		}
		buffer
	}

	/// Checks the declared file size against the actual buffer length.
	///
	/// # Errors
	///
	/// Returns [`Fnt4Error::SizeMismatch`] if they differ.
	pub fn check_file_size(&self, actual: usize) -> Result<(), Fnt4Error> {
		if self.file_size as usize != actual {
			return Err(Fnt4Error::SizeMismatch {
				declared: self.file_size,
				actual,
			});
		}
		Ok(())
	}

	/// Format version
	pub fn version(&self) -> FormatVersion {
		self.version
	}

	/// Declared size of the whole file in bytes
	pub fn file_size(&self) -> u32 {
		self.file_size
	}

	/// Font ascent in pixels
	pub fn ascent(&self) -> u16 {
		self.ascent
	}

	/// Font descent in pixels
	pub fn descent(&self) -> u16 {
		self.descent
	}

	/// Sum of ascent and descent
	pub fn line_height(&self) -> u32 {
		u32::from(self.ascent) + u32::from(self.descent)
	}
}

impl Display for Header {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "FNT4 Header:")?;
		writeln!(f, "  Version:   {}", self.version)?;
		writeln!(f, "  File size: {} bytes", self.file_size)?;
		writeln!(f, "  Ascent:    {}", self.ascent)?;
		write!(f, "  Descent:   {}", self.descent)
	}
}
