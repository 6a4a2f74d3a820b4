//! Glyph texture layouts.
//!
//! A decoded glyph payload is turned into one or more [`Bitmap`]s of 8-bit coverage:
//!
//! - **Version 1**: four mip levels stored back to back. Level `i` is
//!   `(texture_width >> i) x (texture_height >> i)` bytes, row-major, one byte per pixel.
//! - **Version 0**: a single level of `actual_width x actual_height` pixels packed two per
//!   byte. The high nibble is the left pixel; each row starts on a byte boundary, so an odd
//!   width leaves the low nibble of the last byte of every row unused. A nibble `n` expands
//!   to `n << 4`.

use std::fmt::Display;

use serde::Serialize;

use crate::file::{Fnt4Error, StreamCorruption};

use super::{
	constants,
	glyph::{GlyphHeaderV0, GlyphHeaderV1},
};

/// Mip level of a glyph texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(u8)]
pub enum MipLevel {
	/// Full resolution
	Level0 = 0,

	/// Half resolution
	Level1 = 1,

	/// Quarter resolution
	Level2 = 2,

	/// Eighth resolution
	Level3 = 3,
}

impl MipLevel {
	/// All levels, largest first
	pub const ALL: [MipLevel; constants::MIP_LEVELS] =
		[MipLevel::Level0, MipLevel::Level1, MipLevel::Level2, MipLevel::Level3];

	/// Position of the level in the payload
	pub const fn index(self) -> usize {
		self as usize
	}

	/// Returns the level for a payload position.
	pub fn from_index(index: usize) -> Option<Self> {
		Self::ALL.get(index).copied()
	}
}

impl Display for MipLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.index())
	}
}

/// 8-bit coverage bitmap, row-major
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bitmap {
	width: u32,
	height: u32,
	pixels: Vec<u8>,
}

impl Bitmap {
	/// Wraps `pixels`, returning `None` unless it holds exactly `width * height` bytes.
	pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
		if pixels.len() != width as usize * height as usize {
			return None;
		}
		Some(Self {
			width,
			height,
			pixels,
		})
	}

	/// Creates a bitmap with every pixel set to 0.
	pub fn blank(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
			pixels: vec![0; width as usize * height as usize],
		}
	}

	/// Width in pixels
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height in pixels
	pub fn height(&self) -> u32 {
		self.height
	}

	/// `(width, height)`
	pub fn dimensions(&self) -> (u32, u32) {
		(self.width, self.height)
	}

	/// Row-major pixel data
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Consumes the bitmap, returning its pixel data.
	pub fn into_pixels(self) -> Vec<u8> {
		self.pixels
	}

	/// Whether the bitmap has no pixels
	pub fn is_empty(&self) -> bool {
		self.pixels.is_empty()
	}

	/// Gets the pixel at (x, y), or `None` outside the bitmap.
	pub fn get_pixel(&self, x: u32, y: u32) -> Option<u8> {
		if x >= self.width || y >= self.height {
			return None;
		}
		self.pixels.get(y as usize * self.width as usize + x as usize).copied()
	}

	/// Sets the pixel at (x, y). Coordinates outside the bitmap are ignored.
	pub fn put_pixel(&mut self, x: u32, y: u32, value: u8) {
		if x >= self.width || y >= self.height {
			return;
		}
		let index = y as usize * self.width as usize + x as usize;
		self.pixels[index] = value;
	}

	/// Iterates over the rows of the bitmap.
	pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
		// chunks(0) panics, an empty bitmap has no rows anyway
		self.pixels.chunks(self.width.max(1) as usize)
	}

	/// Renders the bitmap with a 10-step character ramp, darkest first.
	pub fn to_ascii_art(&self) -> String {
		const RAMP: &[u8; 10] = b" .:-=+*#%@";

		let mut art = String::with_capacity((self.width as usize + 1) * self.height as usize);
		for row in self.rows() {
			for &pixel in row {
				art.push(RAMP[pixel as usize * (RAMP.len() - 1) / 255] as char);
			}
			art.push('\n');
		}
		art
	}
}

/// Slices a decoded version 1 payload into its four mip levels.
///
/// # Errors
///
/// Returns [`StreamCorruption::LengthMismatch`] unless `raw` holds exactly the four planes.
pub fn unpack_v1(header: &GlyphHeaderV1, raw: &[u8]) -> Result<Vec<Bitmap>, Fnt4Error> {
	let (width, height) = (u32::from(header.texture_width), u32::from(header.texture_height));
	let planes = MipLevel::ALL.map(|level| (width >> level.index(), height >> level.index()));

	let expected: usize = planes.iter().map(|&(w, h)| w as usize * h as usize).sum();
	if raw.len() != expected {
		return Err(StreamCorruption::LengthMismatch {
			expected,
			actual: raw.len(),
		}
		.into());
	}

	let mut rest = raw;
	let levels = planes
		.into_iter()
		.map(|(w, h)| {
			let (plane, tail) = rest.split_at(w as usize * h as usize);
			rest = tail;
			Bitmap {
				width: w,
				height: h,
				pixels: plane.to_vec(),
			}
		})
		.collect();

	Ok(levels)
}

/// Expands a decoded version 0 payload of packed nibbles.
///
/// # Errors
///
/// Returns [`StreamCorruption::LengthMismatch`] unless `raw` holds exactly
/// `ceil(actual_width / 2) * actual_height` bytes.
pub fn unpack_v0(header: &GlyphHeaderV0, raw: &[u8]) -> Result<Bitmap, Fnt4Error> {
	let width = usize::from(header.actual_width);
	let height = usize::from(header.actual_height);
	let stride = width.div_ceil(2);

	let expected = stride * height;
	if raw.len() != expected {
		return Err(StreamCorruption::LengthMismatch {
			expected,
			actual: raw.len(),
		}
		.into());
	}

	let mut pixels = Vec::with_capacity(width * height);
	if stride > 0 {
		for row in raw.chunks_exact(stride) {
			pixels.extend((0..width).map(|x| {
				let byte = row[x / 2];
				if x % 2 == 0 {
					byte & 0xF0
				} else {
					(byte & 0x0F) << 4
				}
			}));
		}
	}

	Ok(Bitmap {
		width: width as u32,
		height: height as u32,
		pixels,
	})
}

/// Concatenates mip levels into a version 1 payload.
pub fn pack_v1(levels: &[Bitmap]) -> Vec<u8> {
	levels.iter().flat_map(|level| level.pixels.iter().copied()).collect()
}

/// Packs a bitmap into version 0 nibbles, keeping the high 4 bits of every pixel.
pub fn pack_v0(bitmap: &Bitmap) -> Vec<u8> {
	let stride = (bitmap.width as usize).div_ceil(2);
	let mut packed = Vec::with_capacity(stride * bitmap.height as usize);
	for row in bitmap.rows() {
		packed.extend(row.chunks(2).map(|pair| match *pair {
			[left, right] => (left & 0xF0) | (right >> 4),
			[left] => left & 0xF0,
			_ => 0,
		}));
	}
	packed
}
