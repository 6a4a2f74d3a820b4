#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `fnt4-rs` reads, decodes and writes FNT4 bitmap fonts and the LZ77 variant their glyph
//! textures are packed with.
//!
pub use fnt4_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use fnt4_dylib;
