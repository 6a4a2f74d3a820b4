//! Forces `fnt4_internal` to be linked dynamically when the `dynamic_linking` feature is enabled.
//!
//! This keeps incremental rebuilds of tools and demos fast, and should not be used directly.

#[allow(unused_imports)]
#[doc(hidden)]
pub use fnt4_internal::*;
