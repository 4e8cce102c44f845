//! Inheritance analysis over a style catalog.

use crate::docx::StyleMap;
use crate::model::{Issue, IssueKind};
use std::collections::HashSet;

/// Recommended maximum length of a `basedOn` chain.
pub const MAX_RECOMMENDED_DEPTH: usize = 3;

/// Length of a style's inheritance chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Number of resolved `basedOn` links
    Levels(usize),
    /// The chain revisits a style
    Circular,
}

/// Walk the `basedOn` chain starting at `id`.
///
/// A missing base ends the chain without counting the dangling link.
pub fn inheritance_depth(styles: &StyleMap, id: &str) -> Depth {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut depth = 0;
    let mut current = match styles.get(id) {
        Some(style) => style,
        None => return Depth::Levels(0),
    };

    loop {
        if !visited.insert(current.id.as_str()) {
            return Depth::Circular;
        }
        let base = current
            .based_on
            .as_deref()
            .and_then(|base_id| styles.get(base_id));
        match base {
            Some(base) => {
                depth += 1;
                current = base;
            }
            None => return Depth::Levels(depth),
        }
    }
}

/// Find structural problems in every style of the catalog.
pub fn find_issues(styles: &StyleMap) -> Vec<Issue> {
    let mut issues = Vec::new();

    for style in styles.iter() {
        let name = style.display_name();

        match inheritance_depth(styles, &style.id) {
            Depth::Levels(depth) if depth > MAX_RECOMMENDED_DEPTH => issues.push(Issue {
                style: name.clone(),
                issue: IssueKind::DeepInheritance,
                message: format!(
                    "Inheritance depth of {} (recommended max: {})",
                    depth, MAX_RECOMMENDED_DEPTH
                ),
            }),
            Depth::Circular => issues.push(Issue {
                style: name.clone(),
                issue: IssueKind::CircularInheritance,
                message: "Circular inheritance detected".to_string(),
            }),
            Depth::Levels(_) => {}
        }

        if let Some(base_id) = style.based_on.as_deref() {
            if !styles.contains(base_id) {
                issues.push(Issue {
                    style: name,
                    issue: IssueKind::OrphanedBase,
                    message: format!("Base style '{}' not found", base_id),
                });
            }
        }
    }

    issues
}
