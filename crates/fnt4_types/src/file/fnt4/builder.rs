//! Serializing FNT4 fonts.

use bytes::BufMut;
use log::{debug, trace};

use crate::file::{Fnt4Error, lz77};

use super::{
	File, FormatVersion, GlyphId, Header, constants,
	glyph::{Glyph, GlyphHeader, GlyphHeaderV0, GlyphHeaderV1},
	texture::{self, MipLevel},
};

/// Builder for FNT4 font files.
///
/// Glyphs are added first, then character table entries are pointed at them. The written
/// table is dense up to the highest mapped index; unmapped entries point at glyph 0.
///
/// # Examples
///
/// ```
/// use fnt4_types::file::fnt4::{
///     Bitmap, Character, File, FileBuilder, FormatVersion, Glyph, GlyphInfo,
/// };
///
/// let info = GlyphInfo {
///     bearing_x: 0,
///     bearing_y: 2,
///     actual_width: 2,
///     actual_height: 2,
///     advance_width: 3,
///     texture: None,
///     character: Character::Unicode(0),
/// };
/// let bitmap = Bitmap::from_raw(2, 2, vec![0xF0, 0x00, 0x00, 0xF0]).unwrap();
///
/// let mut builder = FileBuilder::new(FormatVersion::V0, 2, 0);
/// let id = builder.add_glyph(Glyph::new(info, vec![bitmap]));
/// builder.map_character(0x41, id)?;
///
/// let font = File::from_bytes(&builder.build()?)?;
/// assert_eq!(font.glyph_id_for_char('A'), Some(id));
/// # Ok::<(), fnt4_types::file::Fnt4Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileBuilder {
	version: FormatVersion,
	ascent: u16,
	descent: u16,
	glyphs: Vec<Glyph>,
	characters: Vec<Option<GlyphId>>,
}

impl FileBuilder {
	/// Creates an empty builder.
	pub fn new(version: FormatVersion, ascent: u16, descent: u16) -> Self {
		Self {
			version,
			ascent,
			descent,
			glyphs: Vec::new(),
			characters: Vec::new(),
		}
	}

	/// Creates a builder holding every glyph and mapping of `file`, decoded.
	///
	/// # Errors
	///
	/// Returns [`Fnt4Error::CorruptStream`] if a glyph cannot be decoded.
	pub fn from_file(file: &File) -> Result<Self, Fnt4Error> {
		let mut builder = Self::new(file.version(), file.ascent(), file.descent());
		for (_, glyph) in file.glyphs() {
			builder.add_glyph(glyph.decompress()?);
		}
		builder.characters = file.character_mapping().iter().copied().map(Some).collect();
		Ok(builder)
	}

	/// Target format version
	pub fn version(&self) -> FormatVersion {
		self.version
	}

	/// Number of glyphs added so far
	pub fn glyph_count(&self) -> usize {
		self.glyphs.len()
	}

	/// Length of the character table to be written
	pub fn character_count(&self) -> usize {
		self.characters.len().max(1)
	}

	/// Adds a glyph, returning its id.
	///
	/// Glyphs are validated against the target version when the font is built.
	pub fn add_glyph(&mut self, glyph: Glyph) -> GlyphId {
		self.glyphs.push(glyph);
		GlyphId(self.glyphs.len() as u32 - 1)
	}

	/// Points character table entry `index` at `glyph`.
	///
	/// # Errors
	///
	/// Returns [`Fnt4Error::GlyphNotFound`] if `glyph` was not added to this builder.
	pub fn map_character(&mut self, index: u32, glyph: GlyphId) -> Result<(), Fnt4Error> {
		if glyph.index() >= self.glyphs.len() {
			return Err(Fnt4Error::GlyphNotFound(glyph));
		}

		let index = index as usize;
		if index >= self.characters.len() {
			self.characters.resize(index + 1, None);
		}
		self.characters[index] = Some(glyph);
		Ok(())
	}

	/// Serializes the font.
	///
	/// Glyph records are written in order of first reference from the table; glyphs no entry
	/// points at are left out. Each payload is LZ77-compressed when that makes it smaller.
	///
	/// # Errors
	///
	/// - [`Fnt4Error::GlyphNotFound`] if no glyph was added
	/// - [`Fnt4Error::InvalidGlyph`] if a glyph does not fit the target version
	/// - [`Fnt4Error::FileTooLarge`] if offsets would overflow 32 bits
	pub fn build(&self) -> Result<Vec<u8>, Fnt4Error> {
		if self.glyphs.is_empty() {
			return Err(Fnt4Error::GlyphNotFound(GlyphId(0)));
		}

		let table: Vec<GlyphId> = if self.characters.is_empty() {
			vec![GlyphId(0)]
		} else {
			self.characters.iter().map(|id| id.unwrap_or_default()).collect()
		};

		let mut seen = vec![false; self.glyphs.len()];
		let order: Vec<GlyphId> = table
			.iter()
			.copied()
			.filter(|id| !std::mem::replace(&mut seen[id.index()], true))
			.collect();

		let table_end = constants::HEADER_SIZE + table.len() * constants::TABLE_ENTRY_SIZE;
		let mut offsets = vec![0u32; self.glyphs.len()];
		let mut records = Vec::new();
		for &id in &order {
			offsets[id.index()] = to_offset(table_end + records.len())?;
			records.extend(self.encode_record(id)?);
		}

		let file_size = table_end + records.len();
		let header = Header::new(self.version, to_offset(file_size)?, self.ascent, self.descent);

		let mut output = Vec::with_capacity(file_size);
		output.put_slice(&header.to_bytes());
		for id in &table {
			output.put_u32_le(offsets[id.index()]);
		}
		output.put_slice(&records);

		debug!(
			"FNT4 {}: wrote {} characters, {} of {} glyphs, {} bytes",
			self.version,
			table.len(),
			order.len(),
			self.glyphs.len(),
			output.len()
		);
		Ok(output)
	}

	/// Serializes one glyph record: header followed by payload.
	fn encode_record(&self, id: GlyphId) -> Result<Vec<u8>, Fnt4Error> {
		let glyph = &self.glyphs[id.index()];
		let info = glyph.info();
		let invalid = |reason: String| Fnt4Error::InvalidGlyph {
			glyph: id,
			reason,
		};

		let (header, payload) = match self.version {
			FormatVersion::V1 => {
				let (texture_width, texture_height) =
					info.texture.ok_or_else(|| invalid("version 1 glyphs need a texture size".into()))?;

				let levels = glyph.mip_levels();
				if levels.len() != constants::MIP_LEVELS {
					return Err(invalid(format!(
						"expected {} mip levels, got {}",
						constants::MIP_LEVELS,
						levels.len()
					)));
				}
				for (level, bitmap) in MipLevel::ALL.iter().zip(levels) {
					let expected = (
						u32::from(texture_width) >> level.index(),
						u32::from(texture_height) >> level.index(),
					);
					if bitmap.dimensions() != expected {
						return Err(invalid(format!(
							"mip level {level} is {}x{}, expected {}x{}",
							bitmap.width(),
							bitmap.height(),
							expected.0,
							expected.1
						)));
					}
				}

				let header = GlyphHeader::V1(GlyphHeaderV1 {
					bearing_x: info.bearing_x,
					bearing_y: info.bearing_y,
					actual_width: info.actual_width,
					actual_height: info.actual_height,
					advance_width: info.advance_width,
					unused: 0,
					texture_width,
					texture_height,
					compressed_size: 0,
				});
				(header, texture::pack_v1(levels))
			}
			FormatVersion::V0 => {
				let [bitmap] = glyph.mip_levels() else {
					return Err(invalid(format!(
						"expected 1 mip level, got {}",
						glyph.mip_levels().len()
					)));
				};
				if bitmap.dimensions() != info.actual_size() {
					return Err(invalid(format!(
						"bitmap is {}x{}, metrics say {}x{}",
						bitmap.width(),
						bitmap.height(),
						info.actual_width,
						info.actual_height
					)));
				}

				let header = GlyphHeader::V0(GlyphHeaderV0 {
					bearing_x: info.bearing_x,
					bearing_y: info.bearing_y,
					actual_width: info.actual_width,
					actual_height: info.actual_height,
					advance_width: info.advance_width,
					unknown: 0,
					compressed_size: 0,
				});
				(header, texture::pack_v0(bitmap))
			}
		};

		// a raw payload is only readable back if its size matches the header formula
		let raw_fits = header.uncompressed_size() == payload.len();
		let compressed = lz77::compress(&payload, self.version.lz_layout())?;
		let compressed_size = match u16::try_from(compressed.len()) {
			Ok(size) if size > 0 && (compressed.len() < payload.len() || !raw_fits) => Some(size),
			_ => None,
		};

		let (header, body) = match compressed_size {
			Some(size) => (header.with_compressed_size(size), compressed),
			None if raw_fits => (header, payload),
			None => {
				return Err(invalid(format!(
					"{} byte payload fits neither a raw nor a compressed record",
					payload.len()
				)));
			}
		};
		trace!("fnt4: glyph {id}: {} payload bytes, compressed: {}", body.len(), header.is_compressed());

		let mut record = header.to_bytes();
		record.extend_from_slice(&body);
		Ok(record)
	}
}

fn to_offset(position: usize) -> Result<u32, Fnt4Error> {
	u32::try_from(position).map_err(|_| Fnt4Error::FileTooLarge(position))
}
