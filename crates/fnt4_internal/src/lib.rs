//! This module is separated into its own crate to enable simple dynamic linking for `fnt4`, and should not be used directly.

/// `use fnt4::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export fnt4_types for convenience
pub use fnt4_types;

// Re-export commonly used types at crate root
pub use fnt4_types::file::{
	Fnt4Error, Fnt4File, Fnt4FileBuilder, FormatVersion, GlyphId, StreamCorruption, lz77,
};
