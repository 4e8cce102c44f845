//! Style catalog parsing for `styles.xml`.

use crate::error::{Error, Result};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Style type (paragraph, character, table, list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleType {
    Paragraph,
    Character,
    Table,
    /// Numbering styles (`w:type="numbering"`)
    List,
    Unknown,
}

impl StyleType {
    /// Report order of the known style types.
    pub const ORDERED: [StyleType; 4] = [
        StyleType::Paragraph,
        StyleType::Character,
        StyleType::Table,
        StyleType::List,
    ];

    /// Map a `w:type` attribute value. An absent attribute means paragraph.
    pub fn from_xml(value: Option<&str>) -> Self {
        match value {
            None | Some("paragraph") => StyleType::Paragraph,
            Some("character") => StyleType::Character,
            Some("table") => StyleType::Table,
            Some("numbering") => StyleType::List,
            Some(other) => {
                tracing::warn!("unknown style type '{}'", other);
                StyleType::Unknown
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleType::Paragraph => "paragraph",
            StyleType::Character => "character",
            StyleType::Table => "table",
            StyleType::List => "list",
            StyleType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StyleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paragraph-level properties from a style's `w:pPr`.
///
/// Lengths are kept in twentieths of a point, as stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProps {
    pub justification: Option<String>,
    pub spacing_before: Option<i32>,
    pub spacing_after: Option<i32>,
    pub line_spacing: Option<i32>,
    pub line_rule: Option<String>,
    pub indent_left: Option<i32>,
    pub indent_right: Option<i32>,
    pub indent_first_line: Option<i32>,
    pub indent_hanging: Option<i32>,
    pub keep_lines: Option<bool>,
    pub keep_next: Option<bool>,
    pub page_break_before: Option<bool>,
    pub widow_control: Option<bool>,
    pub outline_level: Option<u8>,
}

/// Run-level (character) properties from a style's `w:rPr`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProps {
    pub font_name: Option<String>,
    /// Size in half-points (`w:sz`)
    pub font_size: Option<u32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Raw `w:u/@w:val`; `single` when the attribute is absent
    pub underline: Option<String>,
    pub strike: Option<bool>,
    pub all_caps: Option<bool>,
    pub small_caps: Option<bool>,
    /// Hex RGB without `#`, never `auto`
    pub color: Option<String>,
    pub theme_color: Option<String>,
    pub highlight: Option<String>,
}

/// A parsed style definition.
#[derive(Debug, Clone, Default)]
pub struct Style {
    /// Style ID (e.g., "Heading1")
    pub id: String,
    /// Stored style name (e.g., "heading 1"); the id when `w:name` is absent
    pub name: String,
    pub style_type: Option<StyleType>,
    pub based_on: Option<String>,
    pub next: Option<String>,
    /// `w:customStyle="1"`
    pub custom: bool,
    pub semi_hidden: bool,
    pub quick_format: bool,
    pub priority: Option<u32>,
    pub paragraph_props: ParagraphProps,
    pub run_props: RunProps,
}

impl Style {
    /// Style type, paragraph when unspecified.
    pub fn kind(&self) -> StyleType {
        self.style_type.unwrap_or(StyleType::Paragraph)
    }

    /// Name as shown in Word's UI.
    pub fn display_name(&self) -> String {
        ui_name(&self.name)
    }

    /// Whether Word ships this style (not flagged as custom).
    pub fn builtin(&self) -> bool {
        !self.custom
    }

    /// Case-insensitive match against either the stored or the UI name.
    pub fn matches_name(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.name.to_lowercase() == wanted || self.display_name().to_lowercase() == wanted
    }
}

/// Built-in styles whose stored names are lowercase, unlike their UI names.
const LOWERCASE_BUILTINS: &[&str] = &[
    "annotation reference",
    "annotation subject",
    "annotation text",
    "balloon text",
    "caption",
    "endnote reference",
    "endnote text",
    "envelope address",
    "envelope return",
    "footer",
    "footnote reference",
    "footnote text",
    "header",
    "index heading",
    "line number",
    "macro",
    "normal indent",
    "page number",
    "table of authorities",
    "table of figures",
    "toa heading",
];

/// Numbered built-in families (`heading 1` .. `heading 9`).
const NUMBERED_BUILTINS: &[&str] = &["heading", "index", "toc"];

/// Translate a stored style name to the name Word displays.
pub fn ui_name(stored: &str) -> String {
    let is_numbered = stored.rsplit_once(' ').is_some_and(|(family, level)| {
        NUMBERED_BUILTINS.contains(&family)
            && level.len() == 1
            && level.chars().all(|c| ('1'..='9').contains(&c))
    });

    if !is_numbered && !LOWERCASE_BUILTINS.contains(&stored) {
        return stored.to_string();
    }

    stored
        .split(' ')
        .map(|word| match word {
            "toc" | "toa" => word.to_uppercase(),
            "of" => word.to_string(),
            _ => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered collection of styles from styles.xml.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    /// Styles in document order
    pub styles: Vec<Style>,
    index: HashMap<String, usize>,
}

/// Where the parser currently is inside a `w:style` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Style,
    ParagraphProps,
    RunProps,
    Other,
}

impl StyleMap {
    /// Parse styles from XML content.
    pub fn parse(xml: &str) -> Result<Self> {
        if xml.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut map = StyleMap::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut current_style: Option<Style> = None;
        // Elements open inside the current w:style
        let mut stack: Vec<Scope> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let local = e.local_name();
                    match current_style.as_mut() {
                        None if local.as_ref() == b"style" => {
                            current_style = Some(style_from_attributes(&e));
                            stack.clear();
                        }
                        None => {}
                        Some(style) => {
                            let scope = scope_of(&stack);
                            apply_property(style, scope, &e);
                            let child = match (scope, local.as_ref()) {
                                (Scope::Style, b"pPr") => Scope::ParagraphProps,
                                (Scope::Style, b"rPr") => Scope::RunProps,
                                _ => Scope::Other,
                            };
                            stack.push(child);
                        }
                    }
                }
                Ok(Event::Empty(e)) => match current_style.as_mut() {
                    None if e.local_name().as_ref() == b"style" => {
                        map.insert(style_from_attributes(&e));
                    }
                    None => {}
                    Some(style) => apply_property(style, scope_of(&stack), &e),
                },
                Ok(Event::End(_)) if current_style.is_some() => {
                    if stack.pop().is_none() {
                        if let Some(style) = current_style.take() {
                            map.insert(style);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(map)
    }

    fn insert(&mut self, style: Style) {
        if style.id.is_empty() {
            tracing::debug!("ignoring style without w:styleId ({})", style.name);
            return;
        }
        if self.index.contains_key(&style.id) {
            tracing::warn!("duplicate style id '{}', keeping the first", style.id);
            return;
        }
        self.index.insert(style.id.clone(), self.styles.len());
        self.styles.push(style);
    }

    /// Get a style by ID.
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.index.get(id).map(|&i| &self.styles[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// First style whose stored or UI name matches `name`, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.matches_name(name))
    }

    /// UI name of the style with the given ID.
    pub fn name_of(&self, id: &str) -> Option<String> {
        self.get(id).map(Style::display_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.styles.iter()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

fn scope_of(stack: &[Scope]) -> Scope {
    match stack.last() {
        None => Scope::Style,
        Some(&Scope::Style) => Scope::Style,
        Some(&scope) if stack.len() == 1 => scope,
        Some(_) => Scope::Other,
    }
}

fn style_from_attributes(e: &BytesStart) -> Style {
    let mut style = Style::default();
    let mut style_type = None;
    for attr in e.attributes().flatten() {
        let value = attr_value(&attr);
        match attr.key.local_name().as_ref() {
            b"styleId" => style.id = value,
            b"type" => style_type = Some(value),
            b"customStyle" => style.custom = is_on(&value),
            _ => {}
        }
    }
    style.style_type = Some(StyleType::from_xml(style_type.as_deref()));
    style.name = style.id.clone();
    style
}

/// Record a property element found directly under `w:style`, `w:pPr` or `w:rPr`.
fn apply_property(style: &mut Style, scope: Scope, e: &BytesStart) {
    let local = e.local_name();
    match scope {
        Scope::Style => match local.as_ref() {
            b"name" => {
                if let Some(val) = get_attr(e, b"val") {
                    style.name = val;
                }
            }
            b"basedOn" => style.based_on = get_attr(e, b"val"),
            b"next" => style.next = get_attr(e, b"val"),
            b"uiPriority" => style.priority = get_attr(e, b"val").and_then(|v| v.parse().ok()),
            b"qFormat" => style.quick_format = get_bool_attr(e).unwrap_or(true),
            b"semiHidden" => style.semi_hidden = get_bool_attr(e).unwrap_or(true),
            _ => {}
        },
        Scope::ParagraphProps => {
            let props = &mut style.paragraph_props;
            match local.as_ref() {
                b"jc" => props.justification = get_attr(e, b"val"),
                b"spacing" => {
                    props.spacing_before = get_int_attr(e, b"before");
                    props.spacing_after = get_int_attr(e, b"after");
                    props.line_spacing = get_int_attr(e, b"line");
                    props.line_rule = get_attr(e, b"lineRule");
                }
                b"ind" => {
                    props.indent_left =
                        get_int_attr(e, b"left").or_else(|| get_int_attr(e, b"start"));
                    props.indent_right =
                        get_int_attr(e, b"right").or_else(|| get_int_attr(e, b"end"));
                    props.indent_first_line = get_int_attr(e, b"firstLine");
                    props.indent_hanging = get_int_attr(e, b"hanging");
                }
                b"keepLines" => props.keep_lines = Some(get_bool_attr(e).unwrap_or(true)),
                b"keepNext" => props.keep_next = Some(get_bool_attr(e).unwrap_or(true)),
                b"pageBreakBefore" => {
                    props.page_break_before = Some(get_bool_attr(e).unwrap_or(true))
                }
                b"widowControl" => props.widow_control = Some(get_bool_attr(e).unwrap_or(true)),
                b"outlineLvl" => {
                    props.outline_level = get_attr(e, b"val").and_then(|v| v.parse().ok())
                }
                _ => {}
            }
        }
        Scope::RunProps => {
            let props = &mut style.run_props;
            match local.as_ref() {
                b"rFonts" => props.font_name = get_attr(e, b"ascii"),
                b"sz" => props.font_size = get_attr(e, b"val").and_then(|v| v.parse().ok()),
                b"b" => props.bold = Some(get_bool_attr(e).unwrap_or(true)),
                b"i" => props.italic = Some(get_bool_attr(e).unwrap_or(true)),
                b"u" => {
                    props.underline =
                        Some(get_attr(e, b"val").unwrap_or_else(|| "single".to_string()))
                }
                b"strike" => props.strike = Some(get_bool_attr(e).unwrap_or(true)),
                b"caps" => props.all_caps = Some(get_bool_attr(e).unwrap_or(true)),
                b"smallCaps" => props.small_caps = Some(get_bool_attr(e).unwrap_or(true)),
                b"color" => {
                    props.color = get_attr(e, b"val").filter(|v| !v.eq_ignore_ascii_case("auto"));
                    props.theme_color = get_attr(e, b"themeColor");
                }
                b"highlight" => props.highlight = get_attr(e, b"val"),
                _ => {}
            }
        }
        Scope::Other => {}
    }
}

/// OOXML on/off value; anything but an explicit off spelling is on.
fn is_on(value: &str) -> bool {
    !matches!(value, "0" | "false" | "off")
}

/// Get an attribute by local name (`w:val` and `val` both match `val`).
fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .map(|attr| attr_value(&attr))
}

/// Attribute value with entity and character references resolved.
pub(crate) fn attr_value(attr: &Attribute) -> String {
    match attr.unescape_value() {
        Ok(value) => value.into_owned(),
        Err(e) => {
            tracing::debug!("keeping raw attribute value: {}", e);
            String::from_utf8_lossy(&attr.value).into_owned()
        }
    }
}

fn get_int_attr(e: &BytesStart, key: &[u8]) -> Option<i32> {
    get_attr(e, key).and_then(|v| v.trim().parse().ok())
}

/// Helper to get the boolean `w:val` of an on/off element.
fn get_bool_attr(e: &BytesStart) -> Option<bool> {
    get_attr(e, b"val").map(|v| is_on(&v))
}
