//! # docstyle
//!
//! Inspect and transplant style definitions in Word (.docx) documents.
//!
//! The library reads the styles part of an OOXML package, reports on its
//! catalog (types, inheritance, formatting, structural issues) and copies
//! `w:style` definitions from a template package into a target package.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docstyle::{apply_template, inspect_file, ApplyOptions, InspectOptions};
//!
//! // List styles and issues
//! let report = inspect_file("document.docx", &InspectOptions::default())?;
//! print!("{}", docstyle::render::to_text(&report));
//!
//! // Copy headings from a template, replacing the target's versions
//! let options = ApplyOptions::new()
//!     .with_style_list("Heading 1, Heading 2")
//!     .with_overwrite(true);
//! let result = apply_template("template.docx", "document.docx", &options)?;
//! println!("replaced {}", result.replaced().len());
//! # Ok::<(), docstyle::Error>(())
//! ```
//!
//! ## Lower-level APIs
//!
//! ```no_run
//! use docstyle::container::OoxmlContainer;
//! use docstyle::docx::{StyleMap, StyleSheet};
//!
//! let package = OoxmlContainer::open("document.docx")?;
//! let xml = package.read_xml(&package.styles_part_path())?;
//!
//! // Typed catalog
//! let styles = StyleMap::parse(&xml)?;
//! println!("{} styles", styles.len());
//!
//! // Verbatim element access
//! let sheet = StyleSheet::parse(xml)?;
//! println!("{:?}", sheet.element("Heading1"));
//! # Ok::<(), docstyle::Error>(())
//! ```

pub mod analysis;
pub mod apply;
pub mod container;
pub mod docx;
pub mod error;
pub mod inspect;
pub mod model;
pub mod render;

// Re-exports
pub use analysis::{find_issues, inheritance_depth, Depth};
pub use apply::{apply_template, ApplyOptions};
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use docx::{Style, StyleMap, StyleSheet, StyleType};
pub use error::{Error, Result};
pub use inspect::{inspect_bytes, inspect_file, InspectOptions};
pub use model::{
    ApplyReport, Issue, IssueKind, PropertyMap, PropertyValue, StyleAction, StyleInfo,
    StyleOutcome, StyleReport,
};
