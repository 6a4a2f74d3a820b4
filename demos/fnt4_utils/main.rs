//! FNT4 (Font) CLI Utility
//!
//! A command-line tool for inspecting, extracting and repacking FNT4 bitmap fonts.
//!
//! # Features
//!
//! - **info**: Display header, table and glyph statistics, optionally as JSON
//! - **extract**: Write `metadata.txt` and one RGBA PNG per glyph
//! - **repack**: Decode every glyph, rebuild the font and verify the result
//!
//! # Usage Examples
//!
//! ```bash
//! # Display font information
//! cargo run --example fnt4_utils -- info font.fnt
//!
//! # Machine-readable metadata
//! cargo run --example fnt4_utils -- info font.fnt --json > font.json
//!
//! # Extract glyphs (output directory may also come from FNT4_OUTPUT_DIR)
//! cargo run --example fnt4_utils -- extract font.fnt -o glyphs/
//!
//! # Rebuild a font with the bundled encoder
//! cargo run --example fnt4_utils -- repack font.fnt -o font_repacked.fnt
//! ```

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use fnt4_rs::{
	Fnt4File, Fnt4FileBuilder, GlyphId,
	fnt4_types::file::fnt4::{Bitmap, Glyph, GlyphInfo, MipLevel},
};
use image::{Rgba, RgbaImage};
use log::{debug, info, warn};
use serde_json::json;
use std::{
	fmt::Write,
	fs,
	path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(name = "fnt4_utils")]
#[command(author = "fnt4-rs project")]
#[command(version = "1.0")]
#[command(about = "FNT4 font utility - inspect, extract and repack bitmap fonts", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Display font file information
	Info {
		/// Input FNT4 file path
		#[arg(value_name = "INPUT_FNT")]
		input: PathBuf,

		/// Print metadata as JSON instead of text
		#[arg(long)]
		json: bool,

		/// Print the first glyphs as ASCII art
		#[arg(short, long, value_name = "COUNT")]
		preview: Option<usize>,
	},

	/// Extract metadata and glyph textures
	Extract {
		/// Input FNT4 file path
		#[arg(value_name = "INPUT_FNT")]
		input: PathBuf,

		/// Output directory
		#[arg(short, long, value_name = "OUTPUT_DIR", env = "FNT4_OUTPUT_DIR", default_value = "fnt4_out")]
		output: PathBuf,

		/// Write every mip level instead of level 0 only
		#[arg(long)]
		all_levels: bool,
	},

	/// Rebuild a font from its decoded glyphs
	Repack {
		/// Input FNT4 file path
		#[arg(value_name = "INPUT_FNT")]
		input: PathBuf,

		/// Output FNT4 file path (defaults to `input_repacked.fnt`)
		#[arg(short, long, value_name = "OUTPUT_FNT")]
		output: Option<PathBuf>,
	},
}

fn open_font(input: &Path) -> anyhow::Result<Fnt4File> {
	debug!("Loading font file: {}", input.display());
	Fnt4File::open(input).with_context(|| format!("Failed to load font file {}", input.display()))
}

/// Handles the 'info' command
fn handle_info(input: &Path, as_json: bool, preview: Option<usize>) -> anyhow::Result<()> {
	let font = open_font(input)?;

	if as_json {
		let glyphs: Vec<_> = font
			.glyphs()
			.map(|(id, glyph)| json!({ "id": id, "offset": glyph.offset(), "info": glyph.info() }))
			.collect();
		let metadata = json!({
			"header": font.header(),
			"character_table_crc": font.character_table_crc(),
			"characters": font.character_mapping(),
			"glyphs": glyphs,
		});
		println!("{}", serde_json::to_string_pretty(&metadata)?);
		return Ok(());
	}

	let compressed = font.glyphs().filter(|(_, glyph)| glyph.data().is_compressed()).count();
	let payload: usize = font.glyphs().map(|(_, glyph)| glyph.data().len()).sum();

	println!("\n=== Font Information ===");
	println!("File: {}", input.display());
	println!("{}", font.header());
	println!("Line height: {}", font.line_height());
	println!("Characters: {}", font.character_count());
	println!("Glyphs: {} ({} compressed)", font.glyph_count(), compressed);
	println!("Payload bytes: {}", payload);
	println!("Character table CRC-32: {:08X}", font.character_table_crc());

	if let Some(count) = preview {
		println!("\n=== Sample Glyphs ===");
		for (id, lazy) in font.glyphs().take(count) {
			let glyph = lazy.decompress().with_context(|| format!("Failed to decode glyph {id}"))?;
			println!("\nGlyph {id} ({}):", lazy.info().character);
			if let Some(bitmap) = glyph.bitmap() {
				println!("{}", bitmap.to_ascii_art());
			}
		}
	}

	Ok(())
}

/// Writes the `metadata.txt` dump
fn write_metadata(out: &mut impl Write, font: &Fnt4File) -> std::fmt::Result {
	writeln!(out, "ascent: {}", font.ascent())?;
	writeln!(out, "descent: {}", font.descent())?;
	writeln!(out, "characters:")?;
	for (index, id) in font.character_mapping().iter().enumerate() {
		writeln!(out, "  {index:04x}: {id}")?;
	}
	writeln!(out, "glyphs:")?;
	for (id, glyph) in font.glyphs() {
		let info = glyph.info();
		writeln!(out, "  {id}")?;
		writeln!(out, "    bearing_y: {}", info.bearing_y)?;
		writeln!(out, "    bearing_x: {}", info.bearing_x)?;
		writeln!(out, "    advance  : {}", info.advance_width)?;
	}
	Ok(())
}

/// Converts coverage to black RGBA with coverage as alpha, cropped to the visible size
fn to_rgba(bitmap: &Bitmap, info: &GlyphInfo, level: MipLevel) -> RgbaImage {
	let (actual_width, actual_height) = info.actual_size();
	let width = (actual_width >> level.index()).min(bitmap.width());
	let height = (actual_height >> level.index()).min(bitmap.height());

	RgbaImage::from_fn(width, height, |x, y| Rgba([0, 0, 0, bitmap.get_pixel(x, y).unwrap_or(0)]))
}

fn save_glyph(output: &Path, id: GlyphId, glyph: &Glyph, all_levels: bool) -> anyhow::Result<usize> {
	let info = glyph.info();
	let levels = if all_levels {
		&MipLevel::ALL[..]
	} else {
		&MipLevel::ALL[..1]
	};

	let mut written = 0;
	for &level in levels {
		let Some(bitmap) = glyph.mip_level(level) else {
			continue;
		};
		let image = to_rgba(bitmap, info, level);
		if image.width() == 0 || image.height() == 0 {
			continue;
		}

		let name = format!("{id}_{:04x}_{level}.png", info.character.index());
		image.save(output.join(&name)).with_context(|| format!("Failed to save {name}"))?;
		written += 1;
	}
	Ok(written)
}

/// Handles the 'extract' command
fn handle_extract(input: &Path, output: &Path, all_levels: bool) -> anyhow::Result<()> {
	let font = open_font(input)?;
	fs::create_dir_all(output)
		.with_context(|| format!("Failed to create output directory {}", output.display()))?;

	let mut metadata = String::new();
	write_metadata(&mut metadata, &font)?;
	fs::write(output.join("metadata.txt"), metadata)?;
	info!("Wrote metadata for {} characters", font.character_count());

	let mut images = 0;
	let mut failed = 0;
	for (id, lazy) in font.glyphs() {
		match lazy.decompress() {
			Ok(glyph) => images += save_glyph(output, id, &glyph, all_levels)?,
			Err(e) => {
				warn!("Skipping glyph {id}: {e}");
				failed += 1;
			}
		}
	}

	info!("Extracted {images} images of {} glyphs to {}", font.glyph_count(), output.display());
	if failed > 0 {
		warn!("{failed} glyphs could not be decoded");
	}
	Ok(())
}

/// Handles the 'repack' command
fn handle_repack(input: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
	let font = open_font(input)?;
	let output = output.unwrap_or_else(|| {
		let stem = input.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
		input.with_file_name(format!("{stem}_repacked.fnt"))
	});

	let builder = Fnt4FileBuilder::from_file(&font).context("Failed to decode glyphs")?;
	let data = builder.build().context("Failed to rebuild font")?;

	// the rebuilt font must decode to the same bitmaps
	let rebuilt = Fnt4File::from_bytes(&data).context("Rebuilt font does not parse")?;
	if rebuilt.character_mapping() != font.character_mapping() {
		bail!("Character mapping changed while repacking");
	}
	for (id, lazy) in font.glyphs() {
		let original = lazy.decompress()?;
		let repacked = rebuilt.decompress_glyph(id)?;
		if original.mip_levels() != repacked.mip_levels() {
			bail!("Glyph {id} differs after repacking");
		}
	}

	fs::write(&output, &data).with_context(|| format!("Failed to write {}", output.display()))?;
	info!(
		"Repacked {} glyphs: {} -> {} bytes ({})",
		font.glyph_count(),
		font.file_size(),
		data.len(),
		output.display()
	);
	Ok(())
}

fn main() -> anyhow::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Commands::Info {
			input,
			json,
			preview,
		} => handle_info(&input, json, preview),
		Commands::Extract {
			input,
			output,
			all_levels,
		} => handle_extract(&input, &output, all_levels),
		Commands::Repack {
			input,
			output,
		} => handle_repack(&input, output),
	}
}
