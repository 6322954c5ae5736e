//! Digest formatting for the two delivery modes.
//!
//! - [`html`]: one HTML document for the inline mail body
//! - [`csv`]: the CSV file sent as an attachment

pub mod csv;
pub mod html;
