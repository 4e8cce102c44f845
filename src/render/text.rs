//! Plain text renderer implementation.

use crate::docx::StyleType;
use crate::model::{StyleInfo, StyleReport};
use std::fmt::Write;

/// Width of the `=` rule separating report blocks.
pub const HEAVY_RULE_WIDTH: usize = 60;

/// Width of the `-` rule under headings.
pub const LIGHT_RULE_WIDTH: usize = 40;

/// A horizontal rule of `width` copies of `ch`.
pub fn rule(ch: char, width: usize) -> String {
    std::iter::repeat(ch).take(width).collect()
}

/// Convert a StyleReport to a human-readable listing.
///
/// Styles are grouped by type (paragraph, character, table, list) and ordered
/// by UI priority inside each group.
pub fn to_text(report: &StyleReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Document: {}", report.document);
    let _ = writeln!(output, "Total styles: {}", report.style_count);
    let _ = writeln!(output, "{}", rule('=', HEAVY_RULE_WIDTH));

    for style_type in StyleType::ORDERED {
        let mut group: Vec<&StyleInfo> = report
            .styles
            .iter()
            .filter(|s| s.style_type == style_type)
            .collect();
        if group.is_empty() {
            continue;
        }
        // stable: ties keep document order
        group.sort_by_key(|s| s.sort_priority());

        let _ = writeln!(
            output,
            "\n{} STYLES ({})",
            style_type.as_str().to_uppercase(),
            group.len()
        );
        let _ = writeln!(output, "{}", rule('-', LIGHT_RULE_WIDTH));

        for info in group {
            render_style(&mut output, info);
        }
    }

    if !report.issues.is_empty() {
        let _ = writeln!(output, "\n{}", rule('=', HEAVY_RULE_WIDTH));
        let _ = writeln!(output, "ISSUES DETECTED");
        let _ = writeln!(output, "{}", rule('-', LIGHT_RULE_WIDTH));
        for issue in &report.issues {
            let _ = writeln!(output, "  [{}] {}: {}", issue.issue, issue.style, issue.message);
        }
    }

    output
}

fn render_style(output: &mut String, info: &StyleInfo) {
    let _ = writeln!(output, "\n  {} (id: {})", info.name, info.style_id);

    if let Some(ref base) = info.based_on {
        let _ = writeln!(output, "    Based on: {}", base);
    }
    if let Some(ref next) = info.next_style {
        let _ = writeln!(output, "    Next: {}", next);
    }
    if !info.font.is_empty() {
        let _ = writeln!(output, "    Font: {}", info.font);
    }
    if !info.paragraph.is_empty() {
        let _ = writeln!(output, "    Paragraph: {}", info.paragraph);
    }

    let flags = info.flags();
    if !flags.is_empty() {
        let _ = writeln!(output, "    Flags: {}", flags.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::StyleMap;
    use crate::inspect::{build_report, InspectOptions};

    const STYLES: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:style w:type="character" w:customStyle="1" w:styleId="Code"><w:name w:val="Code"/><w:rPr><w:rFonts w:ascii="Consolas"/></w:rPr></w:style>
    <w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="10"/><w:qFormat/></w:style>
    <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:uiPriority w:val="0"/><w:pPr><w:spacing w:after="120"/></w:pPr></w:style>
    <w:style w:type="paragraph" w:customStyle="1" w:styleId="Loop"><w:name w:val="Loop"/><w:basedOn w:val="Loop"/></w:style>
</w:styles>"#;

    fn report() -> StyleReport {
        let map = StyleMap::parse(STYLES).unwrap();
        build_report(&map, "sample.docx", &InspectOptions::new())
    }

    #[test]
    fn test_text_layout() {
        let text = to_text(&report());
        let expected = format!(
            "Document: sample.docx
Total styles: 4
{heavy}

PARAGRAPH STYLES (3)
{light}

  Normal (id: Normal)
    Paragraph: space_after=6pt
    Flags: builtin

  Title (id: Title)
    Based on: Normal
    Next: Normal
    Flags: builtin, quick

  Loop (id: Loop)
    Based on: Loop

CHARACTER STYLES (1)
{light}

  Code (id: Code)
    Font: font_name=Consolas

{heavy}
ISSUES DETECTED
{light}
  [circular_inheritance] Loop: Circular inheritance detected
",
            heavy = rule('=', 60),
            light = rule('-', 40)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_no_issue_block_when_clean() {
        let map = StyleMap::parse(STYLES).unwrap();
        let mut report = build_report(&map, "x.docx", &InspectOptions::new());
        report.issues.clear();
        let text = to_text(&report);
        assert!(!text.contains("ISSUES DETECTED"));
        assert!(!text.contains("TABLE STYLES"));
    }
}
