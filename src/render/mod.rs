//! Rendering of outlines and reports.

mod json;

pub use json::{to_json, JsonFormat};
