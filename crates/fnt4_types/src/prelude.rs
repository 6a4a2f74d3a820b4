//! Prelude module for `fnt4_types`.
//!
//! This module provides a convenient way to import commonly used types.
//!
//! # Examples
//!
//! ```no_run
//! use fnt4_types::prelude::*;
//!
//! let font = Fnt4File::open("font.fnt")?;
//! let glyph = font.decompress_glyph(GlyphId(0))?;
//! # Ok::<(), Fnt4Error>(())
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// FNT4 types
	Bitmap,
	Character,
	// Errors
	Fnt4Error,
	Fnt4File,
	Fnt4FileBuilder,
	Fnt4Header,
	FormatVersion,
	Glyph,
	GlyphId,
	GlyphInfo,
	LazyGlyph,
	MipLevel,
	StreamCorruption,
};

// Codec
#[doc(inline)]
pub use crate::file::lz77::{Layout as Lz77Layout, compress as lz77_compress, decompress as lz77_decompress};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
