//! Verbatim editing of `styles.xml`.
//!
//! `StyleMap` reads properties; `StyleSheet` keeps the source text and the
//! byte ranges of every top-level `w:style` so whole elements can be copied
//! between documents without re-serializing anything around them.

use super::styles::attr_value;
use crate::error::{Error, Result};
use crate::model::StyleAction;
use quick_xml::events::{BytesStart, Event};
use std::ops::Range;

/// A `w:style` element located in the source text.
#[derive(Debug, Clone)]
struct StyleSpan {
    id: String,
    range: Range<usize>,
}

/// The `w:styles` root element.
#[derive(Debug, Clone)]
struct RootTag {
    /// Qualified name as written, e.g. `w:styles`
    qname: String,
    /// Byte range of the start (or empty) tag
    start_tag: Range<usize>,
    /// Byte range of the end tag; `None` for `<w:styles/>`
    end_tag: Option<Range<usize>>,
    /// `(prefix, uri)` declarations; the default namespace has an empty prefix
    namespaces: Vec<(String, String)>,
}

/// Editable styles part.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    xml: String,
    root: RootTag,
    styles: Vec<StyleSpan>,
}

impl StyleSheet {
    /// Locate the root and every top-level `w:style` in `xml`.
    pub fn parse(xml: impl Into<String>) -> Result<Self> {
        let xml = xml.into();
        let (root, styles) = scan(&xml)?;
        Ok(Self { xml, root, styles })
    }

    /// The current XML text.
    pub fn as_str(&self) -> &str {
        &self.xml
    }

    pub fn into_string(self) -> String {
        self.xml
    }

    /// Style IDs in document order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(|s| s.id.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.span(id).is_some()
    }

    /// The verbatim `w:style` element with the given ID.
    pub fn element(&self, id: &str) -> Option<&str> {
        self.span(id).map(|s| &self.xml[s.range.clone()])
    }

    /// Namespace declarations on the root element.
    pub fn namespaces(&self) -> &[(String, String)] {
        &self.root.namespaces
    }

    /// Replace the style with the same ID, or append `element` as the last
    /// child of the root.
    pub fn upsert(&mut self, id: &str, element: &str) -> Result<StyleAction> {
        let (edited, action) = match self.span(id) {
            Some(span) => {
                let mut xml = String::with_capacity(self.xml.len() + element.len());
                xml.push_str(&self.xml[..span.range.start]);
                xml.push_str(element);
                xml.push_str(&self.xml[span.range.end..]);
                (xml, StyleAction::Replaced)
            }
            None => (self.appended(element), StyleAction::Added),
        };

        self.reload(edited)?;
        tracing::debug!("{} style '{}'", action.as_str(), id);
        Ok(action)
    }

    /// Declare on the root every namespace from `namespaces` whose prefix is
    /// not declared yet. Returns how many declarations were added.
    pub fn declare_namespaces(&mut self, namespaces: &[(String, String)]) -> Result<usize> {
        let mut missing: Vec<&(String, String)> = Vec::new();
        for declaration in namespaces {
            let (prefix, uri) = declaration;
            match self.root.namespaces.iter().find(|(p, _)| p == prefix) {
                None => missing.push(declaration),
                Some((_, existing)) if existing != uri => tracing::warn!(
                    "namespace prefix '{}' stays bound to {} (source uses {})",
                    prefix,
                    existing,
                    uri
                ),
                Some(_) => {}
            }
        }
        if missing.is_empty() {
            return Ok(0);
        }

        let mut declarations = String::new();
        for (prefix, uri) in &missing {
            tracing::debug!("declaring namespace {}={}", prefix, uri);
            if prefix.is_empty() {
                declarations.push_str(&format!(" xmlns=\"{}\"", uri));
            } else {
                declarations.push_str(&format!(" xmlns:{}=\"{}\"", prefix, uri));
            }
        }

        let tag = &self.xml[self.root.start_tag.clone()];
        let insert_at = self.root.start_tag.start + attributes_end(tag);
        let mut xml = String::with_capacity(self.xml.len() + declarations.len());
        xml.push_str(&self.xml[..insert_at]);
        xml.push_str(&declarations);
        xml.push_str(&self.xml[insert_at..]);

        self.reload(xml)?;
        Ok(missing.len())
    }

    fn span(&self, id: &str) -> Option<&StyleSpan> {
        self.styles.iter().find(|s| s.id == id)
    }

    fn reload(&mut self, xml: String) -> Result<()> {
        let (root, styles) = scan(&xml)?;
        self.xml = xml;
        self.root = root;
        self.styles = styles;
        Ok(())
    }

    fn appended(&self, element: &str) -> String {
        let mut xml = String::with_capacity(self.xml.len() + element.len() + 16);
        match &self.root.end_tag {
            Some(end_tag) => {
                xml.push_str(&self.xml[..end_tag.start]);
                xml.push_str(element);
                xml.push_str(&self.xml[end_tag.start..]);
            }
            None => {
                // <w:styles .../> becomes <w:styles ...>element</w:styles>
                let tag = &self.xml[self.root.start_tag.clone()];
                xml.push_str(&self.xml[..self.root.start_tag.start]);
                xml.push_str(&tag[..attributes_end(tag)]);
                xml.push('>');
                xml.push_str(element);
                xml.push_str(&format!("</{}>", self.root.qname));
                xml.push_str(&self.xml[self.root.start_tag.end..]);
            }
        }
        xml
    }
}

/// Offset within a start tag where attributes end (before `>` or `/>`).
fn attributes_end(tag: &str) -> usize {
    let body = tag.strip_suffix('>').unwrap_or(tag);
    let body = body.strip_suffix('/').unwrap_or(body);
    body.trim_end().len()
}

fn scan(xml: &str) -> Result<(RootTag, Vec<StyleSpan>)> {
    let mut reader = quick_xml::Reader::from_str(xml);

    let mut root: Option<RootTag> = None;
    let mut styles = Vec::new();
    let mut depth = 0usize;
    // Start offset and id of the w:style currently open
    let mut open_style: Option<(usize, String)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::XmlParse(e.to_string()))?;
        let end = reader.buffer_position() as usize;
        let start = tag_start(xml, end);

        match event {
            Event::Start(e) => {
                if depth == 0 && root.is_none() {
                    root = Some(root_tag(&e, start..end)?);
                } else if depth == 1 && e.local_name().as_ref() == b"style" {
                    open_style = Some((start, style_id(&e)?));
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if depth == 0 && root.is_none() {
                    root = Some(root_tag(&e, start..end)?);
                } else if depth == 1 && e.local_name().as_ref() == b"style" {
                    push_span(&mut styles, style_id(&e)?, start..end);
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    if let Some((style_start, id)) = open_style.take() {
                        push_span(&mut styles, id, style_start..end);
                    }
                } else if depth == 0 {
                    if let Some(root) = root.as_mut() {
                        if root.end_tag.is_none() {
                            root.end_tag = Some(start..end);
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let root = root.ok_or_else(|| Error::MissingComponent("w:styles".to_string()))?;
    Ok((root, styles))
}

/// Start offset of the tag that ends at `end`.
///
/// Markup cannot contain a literal `<`, so the last one before `end` opens
/// the tag just read.
fn tag_start(xml: &str, end: usize) -> usize {
    xml[..end].rfind('<').unwrap_or(end)
}

fn push_span(styles: &mut Vec<StyleSpan>, id: String, range: Range<usize>) {
    if id.is_empty() {
        return;
    }
    styles.push(StyleSpan { id, range });
}

fn root_tag(e: &BytesStart, start_tag: Range<usize>) -> Result<RootTag> {
    if e.local_name().as_ref() != b"styles" {
        return Err(Error::MissingComponent("w:styles".to_string()));
    }

    let mut namespaces = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = attr.key.as_ref();
        let prefix = if key == b"xmlns" {
            String::new()
        } else if let Some(prefix) = key.strip_prefix(b"xmlns:") {
            String::from_utf8_lossy(prefix).to_string()
        } else {
            continue;
        };
        namespaces.push((prefix, String::from_utf8_lossy(&attr.value).to_string()));
    }

    Ok(RootTag {
        qname: String::from_utf8_lossy(e.name().as_ref()).to_string(),
        start_tag,
        end_tag: None,
        namespaces,
    })
}

fn style_id(e: &BytesStart) -> Result<String> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"styleId" {
            return Ok(attr_value(&attr));
        }
    }
    Ok(String::new())
}
