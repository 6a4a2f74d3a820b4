//! This crate provides core data types and file format support for the `fnt4-rs` project.
//!
//! # File Formats
//!
//! - **FNT4**: Bitmap fonts with a character table and LZ77-compressed glyph textures, in
//!   version 0 (4bpp, Shift-JIS indexed) and version 1 (8bpp mip chains, Unicode indexed)
//! - **LZ77**: The bit-packed back-reference codec used for glyph payloads
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use fnt4_types::prelude::*;
//!
//! let font = Fnt4File::open("font.fnt")?;
//! for (id, glyph) in font.glyphs() {
//!     let decoded = glyph.decompress()?;
//!     println!("{id}: {:?}", decoded.bitmap().map(Bitmap::dimensions));
//! }
//! # Ok::<(), Fnt4Error>(())
//! ```
//!
//! Or use explicit paths:
//!
//! ```
//! use fnt4_types::file::lz77::{Layout, compress, decompress};
//!
//! let data = b"abcabcabcabc";
//! let packed = compress(data, Layout::FNT4_V1)?;
//! assert_eq!(decompress(&packed, Layout::FNT4_V1)?, data);
//! # Ok::<(), fnt4_types::file::Fnt4Error>(())
//! ```

pub mod file;

/// `use fnt4_types::prelude::*;` to import commonly used items.
pub mod prelude;
