//! Structured site operations reports rendered as paginated PDF documents.
//!
//! [`model`] holds the report data, [`wizard`] the step flow that fills it
//! in, [`layout`] turns a finished report into pages of positioned draw
//! commands, and [`render`] serializes those pages to a PDF and names the
//! output file.

pub mod layout;
pub mod model;
pub mod render;
pub mod wizard;

mod fonts;
