//! egress-export: Pure format serializers (sans-IO)
//!
//! Converts assembled grids into output formats. Currently supports the
//! simulation engine's whitespace-separated text format.

pub mod text;

pub use text::{TextGridError, parse_text, to_text};
