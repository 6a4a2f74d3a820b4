//! File type support for the `fnt4-rs` project.

mod error;

pub mod fnt4;
pub mod lz77;

// Re-export unified error types
pub use error::{Fnt4Error, StreamCorruption};

// Re-export main file types
pub use fnt4::{
	Bitmap, Character, File as Fnt4File, FileBuilder as Fnt4FileBuilder, FormatVersion, Glyph,
	GlyphId, GlyphInfo, Header as Fnt4Header, LazyGlyph, MipLevel,
};
