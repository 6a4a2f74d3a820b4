//! Benchmark helper utilities for fnt4-rs
//!
//! This module provides generators for synthetic glyph textures and whole fonts, so the
//! benchmarks run without game assets.

use fnt4_types::file::fnt4::{
	Bitmap, Character, FileBuilder, FormatVersion, Glyph, GlyphInfo, MipLevel,
};

/// Generates one coverage plane resembling a rendered glyph.
///
/// The plane is mostly empty with an anti-aliased ring whose radius depends on `seed`, which
/// gives the long zero runs and short repeats real glyph textures have.
pub fn generate_glyph_plane(size: u32, seed: u32) -> Vec<u8> {
	let center = size as f32 / 2.0;
	let radius = center * (0.5 + (seed % 7) as f32 / 16.0);
	let thickness = 1.0 + (seed % 3) as f32;

	(0..size * size)
		.map(|i| {
			let (x, y) = ((i % size) as f32 + 0.5, (i / size) as f32 + 0.5);
			let distance = ((x - center).powi(2) + (y - center).powi(2)).sqrt();
			let edge = (distance - radius).abs() - thickness;
			if edge <= 0.0 {
				0xFF
			} else if edge < 1.0 {
				((1.0 - edge) * 255.0) as u8
			} else {
				0
			}
		})
		.collect()
}

/// Generates a version 1 glyph with a `size x size` texture and its mip chain.
pub fn generate_glyph(size: u8, seed: u32) -> Glyph {
	let levels = MipLevel::ALL
		.iter()
		.map(|level| {
			let side = u32::from(size) >> level.index();
			Bitmap::from_raw(side, side, generate_glyph_plane(side, seed))
				.expect("plane matches its dimensions")
		})
		.collect();

	let info = GlyphInfo {
		bearing_x: 1,
		bearing_y: size as i8,
		actual_width: size,
		actual_height: size,
		advance_width: size,
		texture: Some((size, size)),
		character: Character::Unicode(seed),
	};
	Glyph::new(info, levels)
}

/// Generates a serialized version 1 font of `glyph_count` distinct glyphs, one per
/// character starting at U+0020.
pub fn generate_test_font(glyph_count: u32, glyph_size: u8) -> Vec<u8> {
	let mut builder = FileBuilder::new(FormatVersion::V1, u16::from(glyph_size), 4);
	for seed in 0..glyph_count {
		let id = builder.add_glyph(generate_glyph(glyph_size, seed));
		builder.map_character(0x20 + seed, id).expect("glyph was just added");
	}
	builder.build().expect("synthetic glyphs fit version 1")
}

/// Common benchmark sizes for synthetic test data
pub mod sizes {
	/// Small glyph texture: 16x16
	pub const SMALL_GLYPH: u8 = 16;
	/// Typical glyph texture: 32x32
	pub const GLYPH: u8 = 32;
	/// Large glyph texture: 64x64
	pub const LARGE_GLYPH: u8 = 64;
	/// Glyph count of a small font (ASCII)
	pub const ASCII_FONT: u32 = 95;
	/// Glyph count of a large font (kana and common kanji)
	pub const CJK_FONT: u32 = 2048;
}

#[cfg(test)]
mod tests {
	use super::*;
	use fnt4_types::file::fnt4::File;

	#[test]
	fn test_generate_glyph_plane() {
		let plane = generate_glyph_plane(32, 0);
		assert_eq!(plane.len(), 32 * 32);
		assert!(plane.contains(&0xFF));
		assert_eq!(plane[0], 0);
	}

	#[test]
	fn test_generate_test_font() {
		let data = generate_test_font(10, sizes::SMALL_GLYPH);
		let font = File::from_bytes(&data).unwrap();
		assert_eq!(font.glyph_count(), 10);
		assert_eq!(font.character_count(), 0x20 + 10);
		for (_, glyph) in font.glyphs() {
			assert!(glyph.decompress().is_ok());
		}
	}
}
