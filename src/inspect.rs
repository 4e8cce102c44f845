//! Style catalog inspection.

use crate::analysis::find_issues;
use crate::container::OoxmlContainer;
use crate::docx::{ParagraphProps, RunProps, Style, StyleMap, StyleType};
use crate::error::Result;
use crate::model::{PropertyMap, StyleInfo, StyleReport};
use std::path::Path;

/// Filters applied to the listed styles.
///
/// Issues are always computed over the whole catalog.
#[derive(Debug, Clone, Default)]
pub struct InspectOptions {
    /// Only list styles of this type
    pub type_filter: Option<StyleType>,
    /// Only list styles whose UI name contains this text (case-insensitive)
    pub name_filter: Option<String>,
}

impl InspectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type_filter(mut self, style_type: StyleType) -> Self {
        self.type_filter = Some(style_type);
        self
    }

    pub fn with_name_filter(mut self, name: impl Into<String>) -> Self {
        self.name_filter = Some(name.into());
        self
    }

    /// Whether a style passes the filters.
    pub fn accepts(&self, style: &Style) -> bool {
        if let Some(wanted) = self.type_filter {
            if style.kind() != wanted {
                return false;
            }
        }
        if let Some(ref needle) = self.name_filter {
            let name = style.display_name().to_lowercase();
            if !name.contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Inspect the styles of a document on disk.
///
/// # Example
///
/// ```no_run
/// use docstyle::inspect::{inspect_file, InspectOptions};
/// use docstyle::StyleType;
///
/// let options = InspectOptions::new().with_type_filter(StyleType::Paragraph);
/// let report = inspect_file("report.docx", &options)?;
/// println!("{} paragraph styles", report.style_count);
/// # Ok::<(), docstyle::Error>(())
/// ```
pub fn inspect_file(path: impl AsRef<Path>, options: &InspectOptions) -> Result<StyleReport> {
    let path = path.as_ref();
    let container = OoxmlContainer::open(path)?;
    inspect_container(&container, &path.display().to_string(), options)
}

/// Inspect the styles of an in-memory document.
pub fn inspect_bytes(data: &[u8], label: &str, options: &InspectOptions) -> Result<StyleReport> {
    let container = OoxmlContainer::from_bytes(data.to_vec())?;
    inspect_container(&container, label, options)
}

/// Inspect the styles part of an opened package.
pub fn inspect_container(
    container: &OoxmlContainer,
    label: &str,
    options: &InspectOptions,
) -> Result<StyleReport> {
    let part = container.styles_part_path();
    let xml = container.read_xml(&part)?;
    let styles = StyleMap::parse(&xml)?;
    tracing::debug!("{}: {} styles in {}", label, styles.len(), part);
    Ok(build_report(&styles, label, options))
}

/// Build the report for a parsed catalog.
pub fn build_report(styles: &StyleMap, label: &str, options: &InspectOptions) -> StyleReport {
    let infos: Vec<StyleInfo> = styles
        .iter()
        .filter(|s| options.accepts(s))
        .map(|s| style_info(s, styles))
        .collect();

    StyleReport {
        document: label.to_string(),
        style_count: infos.len(),
        styles: infos,
        issues: find_issues(styles),
    }
}

/// Summarize one style.
pub fn style_info(style: &Style, styles: &StyleMap) -> StyleInfo {
    let kind = style.kind();

    let based_on = style
        .based_on
        .as_deref()
        .and_then(|id| styles.name_of(id));
    let next_style = style
        .next
        .as_deref()
        .filter(|id| *id != style.id)
        .and_then(|id| styles.name_of(id));

    let font = match kind {
        StyleType::Paragraph | StyleType::Character => font_properties(&style.run_props),
        _ => PropertyMap::new(),
    };
    let paragraph = match kind {
        StyleType::Paragraph => paragraph_properties(&style.paragraph_props),
        _ => PropertyMap::new(),
    };

    StyleInfo {
        name: style.display_name(),
        style_id: style.id.clone(),
        style_type: kind,
        builtin: style.builtin(),
        hidden: style.semi_hidden,
        quick_style: style.quick_format,
        priority: style.priority,
        based_on,
        next_style,
        font,
        paragraph,
    }
}

fn font_properties(run: &RunProps) -> PropertyMap {
    let mut props = PropertyMap::new();

    if let Some(ref name) = run.font_name {
        props.insert("font_name", name.as_str());
    }
    if let Some(size) = run.font_size {
        props.insert("font_size", format_points(size as f64 / 2.0));
    }
    if let Some(bold) = run.bold {
        props.insert("bold", bold);
    }
    if let Some(italic) = run.italic {
        props.insert("italic", italic);
    }
    if let Some(ref underline) = run.underline {
        match underline.as_str() {
            "single" => props.insert("underline", true),
            "none" => props.insert("underline", false),
            other => props.insert("underline", screaming_snake(other)),
        }
    }
    if let Some(strike) = run.strike {
        props.insert("strike", strike);
    }
    if let Some(caps) = run.all_caps {
        props.insert("all_caps", caps);
    }
    if let Some(small_caps) = run.small_caps {
        props.insert("small_caps", small_caps);
    }
    if let Some(ref rgb) = run.color {
        props.insert("color", format!("#{}", rgb.to_uppercase()));
    } else if let Some(ref theme) = run.theme_color {
        props.insert("color", format!("theme:{}", theme));
    }
    if let Some(ref highlight) = run.highlight {
        props.insert("highlight", screaming_snake(highlight));
    }

    props
}

fn paragraph_properties(para: &ParagraphProps) -> PropertyMap {
    let mut props = PropertyMap::new();

    if let Some(before) = para.spacing_before {
        props.insert("space_before", format_twips(before));
    }
    if let Some(after) = para.spacing_after {
        props.insert("space_after", format_twips(after));
    }
    if let Some(line) = para.line_spacing {
        props.insert("line_spacing", format_line_spacing(line, para.line_rule.as_deref()));
    }

    if let Some(left) = para.indent_left {
        props.insert("left_indent", format_twips(left));
    }
    if let Some(right) = para.indent_right {
        props.insert("right_indent", format_twips(right));
    }
    // A hanging indent is a negative first-line indent
    let first_line = para
        .indent_hanging
        .map(|h| -h)
        .or(para.indent_first_line);
    if let Some(first_line) = first_line {
        props.insert("first_line_indent", format_twips(first_line));
    }

    if let Some(ref jc) = para.justification {
        props.insert("alignment", alignment_name(jc));
    }

    if para.keep_lines == Some(true) {
        props.insert("keep_together", true);
    }
    if para.keep_next == Some(true) {
        props.insert("keep_with_next", true);
    }
    if para.page_break_before == Some(true) {
        props.insert("page_break_before", true);
    }
    if let Some(widow) = para.widow_control {
        props.insert("widow_control", widow);
    }

    props
}

/// Format a point value: `12pt`, or one decimal when fractional (`10.5pt`).
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{}pt", points as i64)
    } else {
        format!("{:.1}pt", points)
    }
}

/// Format a length given in twentieths of a point.
pub fn format_twips(twips: i32) -> String {
    format_points(twips as f64 / 20.0)
}

/// Format `w:spacing/@w:line` with its rule.
///
/// `auto` lines are in 240ths of a line and render as a multiple; `exact`
/// and `atLeast` lines are lengths.
fn format_line_spacing(line: i32, rule: Option<&str>) -> String {
    match rule {
        Some("exact") => format!("{} (exactly)", format_twips(line)),
        Some("atLeast") => format!("{} (at least)", format_twips(line)),
        _ => {
            let multiple = line as f64 / 240.0;
            let label = match line {
                240 => "single",
                360 => "1.5 lines",
                480 => "double",
                _ => "multiple",
            };
            if multiple.fract() == 0.0 {
                format!("{:.1} ({})", multiple, label)
            } else {
                format!("{} ({})", (multiple * 100.0).round() / 100.0, label)
            }
        }
    }
}

fn alignment_name(jc: &str) -> String {
    match jc {
        "left" | "start" => "LEFT".to_string(),
        "center" => "CENTER".to_string(),
        "right" | "end" => "RIGHT".to_string(),
        "both" => "JUSTIFY".to_string(),
        other => screaming_snake(other),
    }
}

/// `darkBlue` -> `DARK_BLUE`
fn screaming_snake(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for (i, c) in value.chars().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}
