//! WordprocessingML styles part.
//!
//! `styles` parses the catalog into typed definitions; `stylesheet` edits the
//! part's XML text in place.

mod styles;
mod stylesheet;

pub use styles::{ui_name, ParagraphProps, RunProps, Style, StyleMap, StyleType};
pub use stylesheet::StyleSheet;
