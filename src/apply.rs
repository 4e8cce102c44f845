//! Copy style definitions from a template document into a target document.

use crate::container::OoxmlContainer;
use crate::docx::{StyleMap, StyleSheet};
use crate::error::{Error, Result};
use crate::model::{ApplyReport, StyleAction};
use std::path::{Path, PathBuf};

/// Options for applying a style template.
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Style names to copy; every template style when empty
    pub styles: Vec<String>,
    /// Replace styles that already exist in the target
    pub overwrite: bool,
    /// Write here instead of modifying the target in place
    pub output: Option<PathBuf>,
    /// Classify styles without writing anything
    pub dry_run: bool,
}

impl ApplyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the copy to the given style names (matched case-insensitively).
    pub fn with_styles<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.styles = names.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a comma-separated list such as `"Heading 1, Title"`.
    pub fn with_style_list(self, list: &str) -> Self {
        self.with_styles(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        )
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Copy styles from `template` into `target` according to `options`.
///
/// # Example
///
/// ```no_run
/// use docstyle::apply::{apply_template, ApplyOptions};
///
/// let options = ApplyOptions::new()
///     .with_style_list("Heading 1, Title")
///     .with_overwrite(true)
///     .with_output("styled.docx");
/// let report = apply_template("template.docx", "draft.docx", &options)?;
/// println!("added {}", report.added().len());
/// # Ok::<(), docstyle::Error>(())
/// ```
pub fn apply_template(
    template: impl AsRef<Path>,
    target: impl AsRef<Path>,
    options: &ApplyOptions,
) -> Result<ApplyReport> {
    let template = template.as_ref();
    let target = target.as_ref();

    let template_pkg = OoxmlContainer::open(template)?;
    let target_pkg = OoxmlContainer::open(target)?;

    let mut report = ApplyReport::new(template, target, options.dry_run);
    let merged = merge_styles(&template_pkg, &target_pkg, options, &mut report)?;

    if let Some((part, xml)) = merged {
        let dest = options.output.clone().unwrap_or_else(|| target.to_path_buf());
        target_pkg.write_with_replaced_part(&part, xml.as_bytes(), &dest)?;
        tracing::debug!("wrote {}", dest.display());
        report.output = Some(dest);
    }

    Ok(report)
}

/// Merge template styles into the target's styles part.
///
/// Fills `report` and returns the target styles part path with its new XML,
/// or `None` when nothing should be written (dry run or no changes).
pub fn merge_styles(
    template: &OoxmlContainer,
    target: &OoxmlContainer,
    options: &ApplyOptions,
    report: &mut ApplyReport,
) -> Result<Option<(String, String)>> {
    let template_part = template.styles_part_path();
    let target_part = target.styles_part_path();
    let template_xml = template.read_xml(&template_part)?;
    let target_xml = target.read_xml(&target_part)?;

    let template_styles = StyleMap::parse(&template_xml)?;
    let target_styles = StyleMap::parse(&target_xml)?;
    let template_sheet = StyleSheet::parse(template_xml)?;
    let mut target_sheet = StyleSheet::parse(target_xml)?;

    let selected = select_styles(&template_styles, &options.styles, report);
    report.processed = selected.len();
    if selected.is_empty() {
        return Ok(None);
    }

    let mut namespaces_declared = false;
    for id in &selected {
        let style = template_styles
            .get(id)
            .ok_or_else(|| Error::StyleNotFound(id.clone()))?;
        let name = style.display_name();
        let exists = target_styles.contains(id) || target_sheet.contains(id);

        if exists && !options.overwrite {
            tracing::debug!("skipping existing style '{}'", id);
            report.record(name, id.as_str(), StyleAction::Skipped);
            continue;
        }

        if options.dry_run {
            let action = if exists {
                StyleAction::Replaced
            } else {
                StyleAction::Added
            };
            report.record(name, id.as_str(), action);
            continue;
        }

        let element = template_sheet
            .element(id)
            .ok_or_else(|| Error::StyleNotFound(id.clone()))?;
        if !namespaces_declared {
            let added = target_sheet.declare_namespaces(template_sheet.namespaces())?;
            if added > 0 {
                tracing::debug!("declared {} template namespaces on target", added);
            }
            namespaces_declared = true;
        }
        let action = target_sheet.upsert(id, element)?;
        report.record(name, id.as_str(), action);
    }

    if options.dry_run || !report.has_changes() {
        return Ok(None);
    }
    Ok(Some((target_part, target_sheet.into_string())))
}

/// Resolve the requested names to template style IDs.
///
/// An empty request selects every template style. Unknown names become
/// warnings; repeated names are selected once.
fn select_styles(
    template: &StyleMap,
    requested: &[String],
    report: &mut ApplyReport,
) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();

    if requested.is_empty() {
        for style in template.iter() {
            if !selected.contains(&style.id) {
                selected.push(style.id.clone());
            }
        }
        return selected;
    }

    for name in requested {
        match template.find_by_name(name) {
            Some(style) => {
                if !selected.contains(&style.id) {
                    selected.push(style.id.clone());
                }
            }
            None => {
                tracing::warn!("style '{}' not found in template", name);
                report
                    .warnings
                    .push(format!("Style '{}' not found in template", name));
            }
        }
    }

    selected
}
