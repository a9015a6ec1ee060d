//! Kernel utilities shared across the AutoIMS slices.
//!
//! Keeps the cross-cutting pieces in one place: config loading, URL-safe ids,
//! JWT issuance and verification, the axum state, the JSON error type and
//! the request extractors every handler uses.
//!
//! ## ID generation
//! ```rust
//! # use autoims_kernel::safe_nanoid;
//! let id = safe_nanoid!();
//! assert_eq!(id.len(), 12);
//! ```
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(feature = "server")]
pub mod prelude;
#[cfg(feature = "server")]
pub mod security;
#[cfg(feature = "server")]
pub mod server;

// Alphabet excludes visually ambiguous characters (I, O, l, 0, 1).
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f',
    'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

pub use autoims_domain as domain;
pub use nanoid::nanoid;

/// Generates an unambiguous `NanoID`; 12 characters unless a size is given.
#[macro_export]
macro_rules! safe_nanoid {
    () => {
        $crate::nanoid!(12, $crate::SAFE_ALPHABET)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}
