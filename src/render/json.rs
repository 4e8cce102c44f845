//! JSON renderer implementation.

use crate::error::Result;
use crate::model::StyleReport;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a StyleReport to JSON.
pub fn to_json(report: &StyleReport, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(report)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(report)?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::StyleMap;
    use crate::inspect::{build_report, InspectOptions};

    const STYLES: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:style w:type="paragraph" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
    <w:style w:type="paragraph" w:styleId="Quote"><w:name w:val="Quote"/><w:basedOn w:val="Gone"/><w:rPr><w:i/></w:rPr></w:style>
</w:styles>"#;

    fn report() -> StyleReport {
        let map = StyleMap::parse(STYLES).unwrap();
        build_report(&map, "sample.docx", &InspectOptions::new())
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&report(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"document\": \"sample.docx\""));
        assert!(json.contains("\"style_count\": 2"));
        assert!(json.contains("\n  \"styles\": ["));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["styles"][1]["font"]["italic"], true);
        assert_eq!(value["issues"][0]["issue"], "orphaned_base");
        assert_eq!(value["issues"][0]["style"], "Quote");
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&report(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with("{\"document\":\"sample.docx\",\"style_count\":2,"));
    }
}
