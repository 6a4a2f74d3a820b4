//! Prelude module for `fnt4_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use fnt4_internal::prelude::*;
//!
//! let builder = Fnt4FileBuilder::new(FormatVersion::V1, 14, 2);
//! assert_eq!(builder.glyph_count(), 0);
//!
//! let packed = lz77_compress(&[0u8; 100], Lz77Layout::FNT4_V1).unwrap();
//! assert_eq!(lz77_decompress(&packed, Lz77Layout::FNT4_V1).unwrap(), [0u8; 100]);
//! ```

// Re-export everything from fnt4_types::prelude
#[doc(inline)]
pub use fnt4_types::prelude::*;

// Re-export the entire fnt4_types module for advanced usage
#[doc(inline)]
pub use fnt4_types;
