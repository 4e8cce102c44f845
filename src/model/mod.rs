//! Report model for style inspection and template application.
//!
//! Parsers fill these structures from `styles.xml`; renderers turn them into
//! text or JSON.

mod report;
mod style;

pub use report::*;
pub use style::*;
