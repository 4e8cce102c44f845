//! Inspection and application reports.

use super::StyleInfo;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of structural problem found in a style catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Inheritance chain longer than the recommended maximum
    DeepInheritance,
    /// `basedOn` chain loops back on itself
    CircularInheritance,
    /// `basedOn` references a style that does not exist
    OrphanedBase,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::DeepInheritance => "deep_inheritance",
            IssueKind::CircularInheritance => "circular_inheritance",
            IssueKind::OrphanedBase => "orphaned_base",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural problem attached to one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// UI name of the affected style
    pub style: String,
    pub issue: IssueKind,
    pub message: String,
}

/// Result of inspecting a document's styles.
#[derive(Debug, Clone, Serialize)]
pub struct StyleReport {
    /// Path (or label) of the inspected document
    pub document: String,
    /// Number of styles that passed the filters
    pub style_count: usize,
    pub styles: Vec<StyleInfo>,
    /// Issues across the whole catalog, regardless of filters
    pub issues: Vec<Issue>,
}

/// What happened (or would happen) to one template style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleAction {
    Added,
    Replaced,
    Skipped,
}

impl StyleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleAction::Added => "added",
            StyleAction::Replaced => "replaced",
            StyleAction::Skipped => "skipped",
        }
    }
}

/// Outcome for a single style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleOutcome {
    /// UI name from the template
    pub name: String,
    pub style_id: String,
    pub action: StyleAction,
}

/// Result of copying styles from a template into a target.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    pub template: PathBuf,
    pub target: PathBuf,
    /// File that was written; `None` when nothing was written
    pub output: Option<PathBuf>,
    /// Number of template styles selected for processing
    pub processed: usize,
    pub outcomes: Vec<StyleOutcome>,
    /// Requested names that did not match any template style
    pub warnings: Vec<String>,
    pub dry_run: bool,
}

impl ApplyReport {
    pub fn new(template: impl AsRef<Path>, target: impl AsRef<Path>, dry_run: bool) -> Self {
        Self {
            template: template.as_ref().to_path_buf(),
            target: target.as_ref().to_path_buf(),
            output: None,
            processed: 0,
            outcomes: Vec::new(),
            warnings: Vec::new(),
            dry_run,
        }
    }

    /// Record the outcome for one style.
    pub fn record(&mut self, name: impl Into<String>, style_id: impl Into<String>, action: StyleAction) {
        self.outcomes.push(StyleOutcome {
            name: name.into(),
            style_id: style_id.into(),
            action,
        });
    }

    /// Names of the styles with the given outcome, in processing order.
    pub fn names(&self, action: StyleAction) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.action == action)
            .map(|o| o.name.as_str())
            .collect()
    }

    pub fn added(&self) -> Vec<&str> {
        self.names(StyleAction::Added)
    }

    pub fn replaced(&self) -> Vec<&str> {
        self.names(StyleAction::Replaced)
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.names(StyleAction::Skipped)
    }

    /// Whether the target's styles changed (or would change in a dry run).
    pub fn has_changes(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| o.action != StyleAction::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_report_accessors() {
        let mut report = ApplyReport::new("t.docx", "d.docx", false);
        assert!(!report.has_changes());

        report.record("Heading 1", "Heading1", StyleAction::Replaced);
        report.record("Title", "Title", StyleAction::Added);
        report.record("Normal", "Normal", StyleAction::Skipped);

        assert_eq!(report.added(), ["Title"]);
        assert_eq!(report.replaced(), ["Heading 1"]);
        assert_eq!(report.skipped(), ["Normal"]);
        assert!(report.has_changes());
    }

    #[test]
    fn test_issue_serialization() {
        let issue = Issue {
            style: "Heading 1".to_string(),
            issue: IssueKind::OrphanedBase,
            message: "Base style 'Missing' not found".to_string(),
        };
        let json = serde_json::to_string(&issue).unwrap();
        assert_eq!(
            json,
            r#"{"style":"Heading 1","issue":"orphaned_base","message":"Base style 'Missing' not found"}"#
        );
    }
}
