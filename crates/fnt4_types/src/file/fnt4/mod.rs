//! FNT4 bitmap font support.
//!
//! FNT4 fonts ship with visual novels built on the same engine in two versions. Both are a
//! 16-byte [`Header`], a dense character table and a heap of glyph records:
//!
//! ```text
//! +--------+-------------------------+-------------------------------------------+
//! | header | character table         | glyph records                             |
//! | 16 B   | N x u32 glyph offsets   | header + payload, shared between entries  |
//! +--------+-------------------------+-------------------------------------------+
//! ```
//!
//! The table has no stored length: it ends where the first glyph record begins, so
//! `N = (first_offset - 16) / 4`. Entries pointing at the same offset share one glyph, which
//! gets a single [`GlyphId`]; ids are handed out in table order.
//!
//! Table indices are Unicode code points in version 1 and numbered Shift-JIS codes in
//! version 0 (see [`sjis`]).
//!
//! # Examples
//!
//! ```no_run
//! use fnt4_types::file::fnt4::{File, MipLevel};
//!
//! let font = File::open("font.fnt")?;
//! println!("{} characters, {} glyphs", font.character_count(), font.glyph_count());
//!
//! if let Some(glyph) = font.glyph_for_char('A') {
//!     let decoded = glyph.decompress()?;
//!     if let Some(bitmap) = decoded.mip_level(MipLevel::Level0) {
//!         print!("{}", bitmap.to_ascii_art());
//!     }
//! }
//! # Ok::<(), fnt4_types::file::Fnt4Error>(())
//! ```
//!
//! Glyphs are decoded on demand and [`LazyGlyph`] is `Send + Sync`, so a whole font can be
//! decoded in parallel:
//!
//! ```no_run
//! use fnt4_types::file::fnt4::File;
//!
//! let font = File::open("font.fnt")?;
//! std::thread::scope(|scope| {
//!     for (_, glyph) in font.glyphs() {
//!         scope.spawn(move || glyph.decompress());
//!     }
//! });
//! # Ok::<(), fnt4_types::file::Fnt4Error>(())
//! ```

use std::{
	collections::{HashMap, hash_map::Entry},
	fmt::Display,
	io::Read,
	path::Path,
};

use bytes::{Buf, Bytes};
use crc::{CRC_32_ISO_HDLC, Crc};
use log::{debug, trace};
use serde::Serialize;

use crate::file::Fnt4Error;

mod builder;
mod glyph;
mod header;
pub mod sjis;
mod texture;

pub use builder::FileBuilder;
pub use glyph::{
	Character, Glyph, GlyphData, GlyphHeader, GlyphHeaderV0, GlyphHeaderV1, GlyphInfo, LazyGlyph,
};
pub use header::{FormatVersion, Header};
pub use texture::{Bitmap, MipLevel};

/// FNT4 layout constants.
pub mod constants {
	/// File magic
	pub const MAGIC: &[u8; 4] = b"FNT4";

	/// Size of the file header in bytes
	pub const HEADER_SIZE: usize = 16;

	/// Size of a character table entry in bytes
	pub const TABLE_ENTRY_SIZE: usize = 4;

	/// Size of a version 0 glyph record header in bytes
	pub const V0_GLYPH_HEADER_SIZE: usize = 8;

	/// Size of a version 1 glyph record header in bytes
	pub const V1_GLYPH_HEADER_SIZE: usize = 10;

	/// Number of mip levels in a version 1 glyph payload
	pub const MIP_LEVELS: usize = 4;
}

const CHARACTER_TABLE_CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Index of a distinct glyph record, in order of first appearance in the character table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct GlyphId(pub u32);

impl GlyphId {
	/// The id as a `usize` index
	pub const fn index(self) -> usize {
		self.0 as usize
	}
}

impl Display for GlyphId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:04}", self.0)
	}
}

/// Number of character table entries implied by the offset of the first glyph record.
///
/// Returns `None` when the offset leaves no room for a single entry.
pub fn infer_character_count(first_offset: u32) -> Option<usize> {
	let table_size = (first_offset as usize).checked_sub(constants::HEADER_SIZE)?;
	match table_size / constants::TABLE_ENTRY_SIZE {
		0 => None,
		count => Some(count),
	}
}

/// A parsed FNT4 font.
///
/// Owns the file buffer; glyph payloads are slices of it and are only decoded on request.
#[derive(Debug, Clone)]
pub struct File {
	header: Header,
	character_table: Vec<u32>,
	character_table_crc: u32,
	characters: Vec<GlyphId>,
	glyphs: Vec<LazyGlyph>,
}

impl File {
	/// Opens and parses a font file.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or is not a valid font, see
	/// [`File::from_buffer`].
	pub fn open(path: impl AsRef<Path>) -> Result<Self, Fnt4Error> {
		let data = std::fs::read(path)?;
		Self::from_buffer(Bytes::from(data))
	}

	/// Reads and parses a font from a reader.
	///
	/// # Errors
	///
	/// Returns an error if reading fails or the font is invalid, see [`File::from_buffer`].
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, Fnt4Error> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_buffer(Bytes::from(data))
	}

	/// Parses a font from a byte slice, copying it.
	///
	/// # Errors
	///
	/// See [`File::from_buffer`].
	pub fn from_bytes(data: &[u8]) -> Result<Self, Fnt4Error> {
		Self::from_buffer(Bytes::copy_from_slice(data))
	}

	/// Parses a font, taking ownership of the buffer.
	///
	/// Every glyph record header is validated here; payloads are only bounds-checked.
	///
	/// # Errors
	///
	/// - [`Fnt4Error::InsufficientData`] if the buffer ends inside the header, the table or a
	///   glyph record
	/// - [`Fnt4Error::BadMagic`] / [`Fnt4Error::UnsupportedVersion`] for an invalid header
	/// - [`Fnt4Error::SizeMismatch`] if the declared size differs from the buffer length
	/// - [`Fnt4Error::InvalidOffset`] if a table entry does not point past the table
	/// - [`Fnt4Error::MalformedHeader`] if a glyph record has a nonzero reserved byte
	pub fn from_buffer(data: Bytes) -> Result<Self, Fnt4Error> {
		let header = Header::from_bytes(&data)?;
		header.check_file_size(data.len())?;

		let character_table = read_character_table(&data)?;
		let table_end = constants::HEADER_SIZE + character_table.len() * constants::TABLE_ENTRY_SIZE;
		let character_table_crc = CHARACTER_TABLE_CRC.checksum(&data[constants::HEADER_SIZE..table_end]);

		let (characters, glyphs) = catalog_glyphs(&data, header.version(), &character_table)?;

		debug!(
			"FNT4 {}: {} characters, {} glyphs, table CRC {:08X}",
			header.version(),
			character_table.len(),
			glyphs.len(),
			character_table_crc
		);

		Ok(Self {
			header,
			character_table,
			character_table_crc,
			characters,
			glyphs,
		})
	}

	/// File header
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Format version
	pub fn version(&self) -> FormatVersion {
		self.header.version()
	}

	/// Font ascent in pixels
	pub fn ascent(&self) -> u16 {
		self.header.ascent()
	}

	/// Font descent in pixels
	pub fn descent(&self) -> u16 {
		self.header.descent()
	}

	/// Sum of ascent and descent
	pub fn line_height(&self) -> u32 {
		self.header.line_height()
	}

	/// Size of the file in bytes
	pub fn file_size(&self) -> u32 {
		self.header.file_size()
	}

	/// CRC-32 of the raw character table bytes
	pub fn character_table_crc(&self) -> u32 {
		self.character_table_crc
	}

	/// Number of character table entries
	pub fn character_count(&self) -> usize {
		self.characters.len()
	}

	/// Raw glyph offsets of the character table
	pub fn character_table(&self) -> &[u32] {
		&self.character_table
	}

	/// Glyph id of every character table entry
	pub fn character_mapping(&self) -> &[GlyphId] {
		&self.characters
	}

	/// Glyph id for a character table index.
	pub fn glyph_id(&self, index: u32) -> Option<GlyphId> {
		self.characters.get(index as usize).copied()
	}

	/// Glyph id for a character.
	///
	/// Version 1 tables are indexed by code point; version 0 characters are looked up through
	/// their Shift-JIS code.
	pub fn glyph_id_for_char(&self, c: char) -> Option<GlyphId> {
		let index = match self.version() {
			FormatVersion::V1 => u32::from(c),
			FormatVersion::V0 => sjis::encode_char(c).and_then(sjis::sjis_index)?,
		};
		self.glyph_id(index)
	}

	/// Number of distinct glyphs
	pub fn glyph_count(&self) -> usize {
		self.glyphs.len()
	}

	/// Glyph by id.
	pub fn glyph(&self, id: GlyphId) -> Option<&LazyGlyph> {
		self.glyphs.get(id.index())
	}

	/// Glyph for a character table index.
	pub fn glyph_for_character(&self, index: u32) -> Option<&LazyGlyph> {
		self.glyph_id(index).and_then(|id| self.glyph(id))
	}

	/// Glyph for a character, see [`File::glyph_id_for_char`].
	pub fn glyph_for_char(&self, c: char) -> Option<&LazyGlyph> {
		self.glyph_id_for_char(c).and_then(|id| self.glyph(id))
	}

	/// Iterates over all glyphs in id order.
	pub fn glyphs(&self) -> impl ExactSizeIterator<Item = (GlyphId, &LazyGlyph)> {
		self.glyphs.iter().enumerate().map(|(id, glyph)| (GlyphId(id as u32), glyph))
	}

	/// Decodes a glyph.
	///
	/// # Errors
	///
	/// - [`Fnt4Error::GlyphNotFound`] if there is no glyph with this id
	/// - [`Fnt4Error::CorruptStream`] if the payload cannot be decoded
	pub fn decompress_glyph(&self, id: GlyphId) -> Result<Glyph, Fnt4Error> {
		self.glyph(id).ok_or(Fnt4Error::GlyphNotFound(id))?.decompress()
	}
}

/// Reads the character table following the header.
fn read_character_table(data: &[u8]) -> Result<Vec<u32>, Fnt4Error> {
	let first_entry_end = constants::HEADER_SIZE + constants::TABLE_ENTRY_SIZE;
	if data.len() < first_entry_end {
		return Err(Fnt4Error::insufficient_data(first_entry_end, data.len()));
	}

	let first_offset = (&data[constants::HEADER_SIZE..]).get_u32_le();
	let count = infer_character_count(first_offset).ok_or(Fnt4Error::InvalidOffset {
		character: 0,
		offset: first_offset,
	})?;

	let table_end = constants::HEADER_SIZE + count * constants::TABLE_ENTRY_SIZE;
	if data.len() < table_end {
		return Err(Fnt4Error::insufficient_data(table_end, data.len()));
	}

	let mut reader = &data[constants::HEADER_SIZE..table_end];
	let table: Vec<u32> = (0..count).map(|_| reader.get_u32_le()).collect();
	trace!("fnt4: character table of {count} entries ends at {table_end:#X}");
	Ok(table)
}

/// Assigns glyph ids to table offsets and reads every distinct glyph record.
fn catalog_glyphs(
	data: &Bytes,
	version: FormatVersion,
	table: &[u32],
) -> Result<(Vec<GlyphId>, Vec<LazyGlyph>), Fnt4Error> {
	let table_end = constants::HEADER_SIZE + table.len() * constants::TABLE_ENTRY_SIZE;
	let record_limit = data.len().saturating_sub(version.glyph_header_size());

	let mut known: HashMap<u32, GlyphId> = HashMap::new();
	let mut characters = Vec::with_capacity(table.len());
	let mut glyphs = Vec::new();

	for (index, &offset) in table.iter().enumerate() {
		let id = match known.entry(offset) {
			Entry::Occupied(entry) => *entry.get(),
			Entry::Vacant(entry) => {
				let position = offset as usize;
				if position < table_end || position > record_limit {
					return Err(Fnt4Error::InvalidOffset {
						character: index,
						offset,
					});
				}

				let character = Character::from_index(version, index as u32);
				glyphs.push(LazyGlyph::read(data, position, version, character)?);
				*entry.insert(GlyphId(glyphs.len() as u32 - 1))
			}
		};
		characters.push(id);
	}

	Ok((characters, glyphs))
}

impl TryFrom<&[u8]> for File {
	type Error = Fnt4Error;

	fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
		Self::from_bytes(value)
	}
}

impl TryFrom<Vec<u8>> for File {
	type Error = Fnt4Error;

	fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
		Self::from_buffer(Bytes::from(value))
	}
}

impl TryFrom<Bytes> for File {
	type Error = Fnt4Error;

	fn try_from(value: Bytes) -> Result<Self, Self::Error> {
		Self::from_buffer(value)
	}
}
