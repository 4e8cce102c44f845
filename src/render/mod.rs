//! Output rendering for style reports.
//!
//! # Example
//!
//! ```no_run
//! use docstyle::inspect::{inspect_file, InspectOptions};
//! use docstyle::render::{to_json, to_text, JsonFormat};
//!
//! let report = inspect_file("document.docx", &InspectOptions::default())?;
//!
//! // Human-readable listing
//! print!("{}", to_text(&report));
//!
//! // Machine-readable
//! let json = to_json(&report, JsonFormat::Pretty)?;
//! # Ok::<(), docstyle::Error>(())
//! ```

mod json;
mod text;

pub use json::{to_json, JsonFormat};
pub use text::{to_text, rule, HEAVY_RULE_WIDTH, LIGHT_RULE_WIDTH};
