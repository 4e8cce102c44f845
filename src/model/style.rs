//! Per-style report entries.

use crate::docx::StyleType;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// A single formatting property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Text(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Bool(b) => serializer.serialize_bool(*b),
            PropertyValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

/// Insertion-ordered property map, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    entries: Vec<(&'static str, PropertyValue)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value for the same key.
    pub fn insert(&mut self, key: &'static str, value: impl Into<PropertyValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for PropertyMap {
    /// `key=value, key=value`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

impl Serialize for PropertyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Summary of one style as reported by the inspector.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StyleInfo {
    /// UI name
    pub name: String,
    pub style_id: String,
    #[serde(rename = "type")]
    pub style_type: StyleType,
    pub builtin: bool,
    pub hidden: bool,
    pub quick_style: bool,
    pub priority: Option<u32>,

    /// UI name of the base style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub based_on: Option<String>,

    /// UI name of the style applied to the following paragraph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_style: Option<String>,

    #[serde(skip_serializing_if = "PropertyMap::is_empty")]
    pub font: PropertyMap,

    #[serde(skip_serializing_if = "PropertyMap::is_empty")]
    pub paragraph: PropertyMap,
}

impl StyleInfo {
    /// Flags shown in the text report.
    pub fn flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.builtin {
            flags.push("builtin");
        }
        if self.hidden {
            flags.push("hidden");
        }
        if self.quick_style {
            flags.push("quick");
        }
        flags
    }

    /// Sort key within a type group; unprioritized styles sort as 99.
    pub fn sort_priority(&self) -> u32 {
        self.priority.unwrap_or(99)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_map_order_and_display() {
        let mut map = PropertyMap::new();
        map.insert("font_name", "Calibri");
        map.insert("bold", true);
        map.insert("font_size", "11pt");
        map.insert("bold", false);

        assert_eq!(map.len(), 3);
        assert_eq!(map.get("bold"), Some(&PropertyValue::Bool(false)));
        assert_eq!(map.to_string(), "font_name=Calibri, bold=false, font_size=11pt");

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"font_name":"Calibri","bold":false,"font_size":"11pt"}"#);
    }

    #[test]
    fn test_style_info_serialization_skips_empty() {
        let info = StyleInfo {
            name: "Normal".to_string(),
            style_id: "Normal".to_string(),
            style_type: StyleType::Paragraph,
            builtin: true,
            hidden: false,
            quick_style: true,
            priority: None,
            based_on: None,
            next_style: None,
            font: PropertyMap::new(),
            paragraph: PropertyMap::new(),
        };

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["type"], "paragraph");
        assert!(value["priority"].is_null());
        assert!(value.get("based_on").is_none());
        assert!(value.get("font").is_none());
        assert_eq!(info.flags(), ["builtin", "quick"]);
        assert_eq!(info.sort_priority(), 99);
    }
}
