//! End-to-end tests for FNT4 fonts through the public `fnt4-rs` API

use fnt4_rs::{
	Fnt4Error, Fnt4File, Fnt4FileBuilder, FormatVersion, GlyphId,
	fnt4_types::file::fnt4::{Bitmap, Character, Glyph, GlyphInfo, MipLevel},
	prelude::Fnt4Header,
};

fn info(width: u8, height: u8, texture: Option<(u8, u8)>) -> GlyphInfo {
	GlyphInfo {
		bearing_x: 0,
		bearing_y: height as i8,
		actual_width: width,
		actual_height: height,
		advance_width: width + 1,
		texture,
		character: Character::Unicode(0),
	}
}

/// Diagonal stroke with its mip chain
fn diagonal_glyph(size: u32) -> Glyph {
	let levels = MipLevel::ALL
		.iter()
		.map(|level| {
			let side = size >> level.index();
			let mut bitmap = Bitmap::blank(side, side);
			for i in 0..side {
				bitmap.put_pixel(i, i, 0xFF);
			}
			bitmap
		})
		.collect();
	Glyph::new(info(size as u8, size as u8, Some((size as u8, size as u8))), levels)
}

fn v1_font() -> anyhow::Result<Vec<u8>> {
	let mut builder = Fnt4FileBuilder::new(FormatVersion::V1, 28, 4);
	let space = builder.add_glyph(Glyph::new(info(0, 0, Some((0, 0))), vec![Bitmap::default(); 4]));
	let stroke = builder.add_glyph(diagonal_glyph(32));
	builder.map_character(u32::from(' '), space)?;
	for c in ['/', '\\', 'あ'] {
		builder.map_character(u32::from(c), stroke)?;
	}
	Ok(builder.build()?)
}

#[test]
fn test_v1_file_roundtrip() -> anyhow::Result<()> {
	let data = v1_font()?;
	let path = std::env::temp_dir().join(format!("fnt4-roundtrip-{}.fnt", std::process::id()));
	std::fs::write(&path, &data)?;
	let font = Fnt4File::open(&path);
	std::fs::remove_file(&path)?;
	let font = font?;

	assert_eq!(font.version(), FormatVersion::V1);
	assert_eq!(font.line_height(), 32);
	assert_eq!(font.character_count(), 'あ' as usize + 1);
	assert_eq!(font.glyph_count(), 2);
	assert_eq!(font.glyph_id_for_char('あ'), font.glyph_id_for_char('/'));

	let glyph = font.glyph_for_char('あ').map(|g| g.decompress()).transpose()?;
	let glyph = glyph.ok_or_else(|| anyhow::anyhow!("missing glyph"))?;
	let level2 =
		glyph.mip_level(MipLevel::Level2).ok_or_else(|| anyhow::anyhow!("missing level"))?;
	assert_eq!(level2.dimensions(), (8, 8));
	assert_eq!(level2.get_pixel(3, 3), Some(0xFF));
	assert_eq!(level2.get_pixel(3, 4), Some(0x00));
	Ok(())
}

#[test]
fn test_v0_shift_jis_lookup() -> anyhow::Result<()> {
	let bitmap = Bitmap::from_raw(4, 1, vec![0x10, 0x20, 0x30, 0x40])
		.ok_or_else(|| anyhow::anyhow!("bad bitmap"))?;
	let mut builder = Fnt4FileBuilder::new(FormatVersion::V0, 14, 2);
	let id = builder.add_glyph(Glyph::new(info(4, 1, None), vec![bitmap.clone()]));

	let index = fnt4_rs::fnt4_types::file::fnt4::sjis::sjis_index(0x82A0)
		.ok_or_else(|| anyhow::anyhow!("unmapped"))?;
	builder.map_character(index, id)?;

	let font = Fnt4File::try_from(builder.build()?)?;
	assert_eq!(font.glyph_id_for_char('あ'), Some(id));
	assert_eq!(font.glyph_id_for_char('\u{1F600}'), None);

	let glyph = font.decompress_glyph(id)?;
	assert_eq!(glyph.bitmap(), Some(&bitmap));
	Ok(())
}

#[test]
fn test_every_glyph_decodes() -> anyhow::Result<()> {
	let font = Fnt4File::from_bytes(&v1_font()?)?;
	for (id, glyph) in font.glyphs() {
		let decoded = glyph.decompress()?;
		assert_eq!(decoded.mip_levels().len(), 4, "glyph {id}");
	}
	assert!(matches!(font.decompress_glyph(GlyphId(9)), Err(Fnt4Error::GlyphNotFound(_))));
	Ok(())
}

#[test]
fn test_metadata_serializes() -> anyhow::Result<()> {
	let font = Fnt4File::from_bytes(&v1_font()?)?;

	let header: &Fnt4Header = font.header();
	let json = serde_json::to_value(header)?;
	assert_eq!(json["version"], "V1");
	assert_eq!(json["ascent"], 28);
	assert_eq!(json["descent"], 4);

	let glyph = font.glyph(GlyphId(1)).ok_or_else(|| anyhow::anyhow!("missing glyph"))?;
	let json = serde_json::to_value(glyph.info())?;
	assert_eq!(json["advance_width"], 33);
	assert_eq!(json["character"]["Unicode"], u32::from('/'));

	assert_eq!(serde_json::to_string(&font.character_mapping()[..2])?, "[0,0]");
	Ok(())
}

#[test]
fn test_truncated_file_is_rejected() -> anyhow::Result<()> {
	let data = v1_font()?;
	let result = Fnt4File::from_bytes(&data[..data.len() - 1]);
	assert!(matches!(result, Err(Fnt4Error::SizeMismatch { .. })));
	Ok(())
}
