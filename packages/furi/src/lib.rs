//! fURI: the identifier every fhatos object, type and instruction is addressed by.
//!
//! A fURI is a URI with a few extras: a `::` component separator, a `$` cardinality coefficient
//! and MQTT-style `+`/`#` wildcards. This crate parses, renders, composes, resolves and matches
//! them.
//!
//! ```rust
//! use fhatos_furi::{furi, Furi};
//!
//! let base = furi!("/mmadt/int/");
//! assert_eq!(base.resolve(&furi!("plus")).unwrap(), furi!("/mmadt/int/plus"));
//! assert!(furi!("/mmadt/int").matches(&furi!("/mmadt/+")));
//! ```

pub mod coefficient;
mod compose;
pub mod error;
mod furi;
pub mod id;
mod matching;
pub mod parse;
pub mod string_helper;

pub use coefficient::{Coefficient, DomainRange};
pub use error::FuriError;
pub use furi::{Furi, COMPONENT_SEPARATOR};
pub use id::{Id, Pattern};

/// Parse a fURI literal, panicking on malformed text.
#[macro_export]
macro_rules! furi {
    ($text:expr) => {
        $crate::Furi::parse($text).expect("invalid fURI literal")
    };
    ($($args:tt),*) => {
        compile_error!("Expected 1 argument, got something else")
    };
}

/// Parse an [`Id`] literal, panicking on malformed text or wildcards.
#[macro_export]
macro_rules! id {
    ($text:expr) => {
        $crate::Id::parse($text).expect("invalid id literal")
    };
    ($($args:tt),*) => {
        compile_error!("Expected 1 argument, got something else")
    };
}

/// Parse a [`Pattern`] literal, panicking on malformed text.
#[macro_export]
macro_rules! pattern {
    ($text:expr) => {
        $crate::Pattern::parse($text).expect("invalid pattern literal")
    };
    ($($args:tt),*) => {
        compile_error!("Expected 1 argument, got something else")
    };
}
