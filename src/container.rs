//! ZIP container abstraction for OOXML documents.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;

/// Default location of the main document part.
pub const DEFAULT_DOCUMENT_PART: &str = "word/document.xml";

/// Default location of the styles part.
pub const DEFAULT_STYLES_PART: &str = "word/styles.xml";

const OFFICE_DOCUMENT_REL_SUFFIX: &str = "/officeDocument";
const STYLES_REL_SUFFIX: &str = "/styles";

/// A relationship entry from a .rels file.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

/// Collection of relationships parsed from a .rels file.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Map from relationship ID to relationship data
    pub by_id: HashMap<String, Relationship>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the first internal relationship whose type URI ends with `suffix`.
    ///
    /// Transitional and Strict OOXML use different namespace prefixes for the
    /// same relationship kinds, so matching on the trailing segment covers both.
    pub fn find_by_type_suffix(&self, suffix: &str) -> Option<&Relationship> {
        let mut matches: Vec<&Relationship> = self
            .by_id
            .values()
            .filter(|r| !r.external && r.rel_type.ends_with(suffix))
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        matches.into_iter().next()
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        self.by_id.insert(rel.id.clone(), rel);
    }
}

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// Once UTF-16 XML has been decoded into a Rust String, the declaration still
/// claims UTF-16, which makes quick-xml misread the already-decoded text.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
///
/// Word writes UTF-8, but packages produced by other tools occasionally
/// carry UTF-16 parts.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        return String::from_utf8(bytes[3..].to_vec())
            .map_err(|e| Error::InvalidData(format!("invalid UTF-8 after BOM: {}", e)));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        let content = decode_utf16_le(&bytes[2..])?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let content = decode_utf16_be(&bytes[2..])?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // BOM-less UTF-16: ASCII markup leaves a zero in every other byte
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16_le(bytes).map(|s| fix_xml_encoding_declaration(&s))
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16_be(bytes).map(|s| fix_xml_encoding_declaration(&s))
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

fn decode_utf16_le(bytes: &[u8]) -> Result<String> {
    let len = bytes.len() & !1;

    let u16_iter = (0..len)
        .step_by(2)
        .map(|i| u16::from_le_bytes([bytes[i], bytes[i + 1]]));

    char::decode_utf16(u16_iter)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::InvalidData(format!("invalid UTF-16: {}", e)))
}

fn decode_utf16_be(bytes: &[u8]) -> Result<String> {
    let len = bytes.len() & !1;

    let u16_iter = (0..len)
        .step_by(2)
        .map(|i| u16::from_be_bytes([bytes[i], bytes[i + 1]]));

    char::decode_utf16(u16_iter)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::InvalidData(format!("invalid UTF-16: {}", e)))
}

/// OOXML container abstraction over a ZIP archive.
///
/// The whole package is held in memory, so a container opened from a path can
/// be written back over that same path.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Open an OOXML container from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docstyle::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("document.docx")?;
    /// println!("{}", container.styles_part_path());
    /// # Ok::<(), docstyle::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cursor = Cursor::new(data);
        let archive = zip::ZipArchive::new(cursor)?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Create an OOXML container from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Read an XML part from the archive as a string.
    ///
    /// Handles UTF-8 (with or without BOM) and UTF-16 in either byte order.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a binary part from the archive.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let result = archive.file_names().any(|n| n == path);
        result
    }

    /// List all entries in the archive, in central directory order.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        let count = archive.len();
        (0..count)
            .filter_map(|i| archive.name_for_index(i).map(String::from))
            .collect()
    }

    /// Read and parse the relationships of a part.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        let rels_path = if part_path.is_empty() || part_path == "/" {
            "_rels/.rels".to_string()
        } else {
            let path = Path::new(part_path);
            let parent = path.parent().unwrap_or(Path::new(""));
            let filename = path.file_name().unwrap_or_default().to_string_lossy();
            if parent.as_os_str().is_empty() {
                format!("_rels/{}.rels", filename)
            } else {
                format!("{}/_rels/{}.rels", parent.display(), filename)
            }
        };

        self.parse_relationships(&rels_path)
    }

    /// Read package-level relationships (_rels/.rels).
    pub fn read_package_relationships(&self) -> Result<Relationships> {
        self.parse_relationships("_rels/.rels")
    }

    /// Locate the main document part through the package relationships.
    pub fn main_document_path(&self) -> String {
        match self.read_package_relationships() {
            Ok(rels) => match rels.find_by_type_suffix(OFFICE_DOCUMENT_REL_SUFFIX) {
                Some(rel) => Self::resolve_path("", &rel.target),
                None => DEFAULT_DOCUMENT_PART.to_string(),
            },
            Err(e) => {
                tracing::warn!("unreadable package relationships: {}", e);
                DEFAULT_DOCUMENT_PART.to_string()
            }
        }
    }

    /// Locate the styles part.
    ///
    /// Follows the main document's `styles` relationship and falls back to
    /// `word/styles.xml` when the relationship is missing or dangling.
    pub fn styles_part_path(&self) -> String {
        let document = self.main_document_path();
        let resolved = match self.read_relationships(&document) {
            Ok(rels) => rels
                .find_by_type_suffix(STYLES_REL_SUFFIX)
                .map(|rel| Self::resolve_path(&document, &rel.target)),
            Err(e) => {
                tracing::warn!("unreadable relationships for {}: {}", document, e);
                None
            }
        };

        match resolved {
            Some(path) if self.exists(&path) => {
                tracing::debug!("styles part resolved to {}", path);
                path
            }
            Some(path) => {
                tracing::warn!(
                    "styles relationship points to missing part {}, using {}",
                    path,
                    DEFAULT_STYLES_PART
                );
                DEFAULT_STYLES_PART.to_string()
            }
            None => DEFAULT_STYLES_PART.to_string(),
        }
    }

    /// Write the package to `dest` with the content of `part` replaced.
    ///
    /// All other entries are copied unchanged and in their original order.
    /// The archive is assembled in a temporary file next to `dest` and moved
    /// into place once complete, so `dest` may be the file this container was
    /// opened from.
    pub fn write_with_replaced_part(
        &self,
        part: &str,
        content: &[u8],
        dest: impl AsRef<Path>,
    ) -> Result<()> {
        let dest = dest.as_ref();
        let dir = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(".docstyle-")
            .suffix(".docx")
            .tempfile_in(dir)?;
        self.write_package(part, content, tmp.as_file_mut())?;
        tmp.as_file_mut().flush()?;
        tmp.persist(dest).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("wrote {} with replaced {}", dest.display(), part);
        Ok(())
    }

    /// Serialize the package into `writer` with the content of `part` replaced.
    pub fn write_package<W: Write + Seek>(
        &self,
        part: &str,
        content: &[u8],
        writer: W,
    ) -> Result<()> {
        let mut archive = self.archive.borrow_mut();
        let mut zip = zip::ZipWriter::new(writer);
        let mut replaced = false;

        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i)?;
            if entry.name() != part {
                zip.raw_copy_file(entry)?;
                continue;
            }

            let method = match entry.compression() {
                zip::CompressionMethod::Stored => zip::CompressionMethod::Stored,
                _ => zip::CompressionMethod::Deflated,
            };
            let options = zip::write::SimpleFileOptions::default().compression_method(method);
            let name = entry.name().to_string();
            drop(entry);

            zip.start_file(name, options)?;
            zip.write_all(content)?;
            replaced = true;
        }

        if !replaced {
            return Err(Error::MissingComponent(part.to_string()));
        }

        zip.finish()?;
        Ok(())
    }

    /// Parse a relationships file.
    fn parse_relationships(&self, rels_path: &str) -> Result<Relationships> {
        let content = match self.read_xml(rels_path) {
            Ok(c) => c,
            Err(_) => return Ok(Relationships::new()),
        };

        if content.trim().is_empty() {
            return Ok(Relationships::new());
        }

        let mut rels = Relationships::new();
        let mut reader = quick_xml::Reader::from_str(&content);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = String::new();
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                            b"Type" => rel_type = String::from_utf8_lossy(&attr.value).to_string(),
                            b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                            b"TargetMode" => {
                                external = String::from_utf8_lossy(&attr.value).to_lowercase()
                                    == "external"
                            }
                            _ => {}
                        }
                    }

                    if !id.is_empty() {
                        rels.add(Relationship {
                            id,
                            rel_type,
                            target,
                            external,
                        });
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Resolve a relative path from a base path.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_path = Path::new(base);
        let base_dir = base_path.parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.list_files().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_package(entries: &[(&str, &str, zip::CompressionMethod)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            for (name, body, method) in entries {
                let options = SimpleFileOptions::default().compression_method(*method);
                zip.start_file(*name, options).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            OoxmlContainer::resolve_path("word/document.xml", "../media/image1.png"),
            "media/image1.png"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("word/document.xml", "styles.xml"),
            "word/styles.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("", "word/document.xml"),
            "word/document.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("word/document.xml", "/word/theme/styles.xml"),
            "word/theme/styles.xml"
        );
    }

    #[test]
    fn test_relationships_suffix_lookup() {
        let mut rels = Relationships::new();
        rels.add(Relationship {
            id: "rId2".to_string(),
            rel_type: "http://purl.oclc.org/ooxml/officeDocument/relationships/styles"
                .to_string(),
            target: "styles.xml".to_string(),
            external: false,
        });
        rels.add(Relationship {
            id: "rId1".to_string(),
            rel_type: "http://example.com/hyperlink".to_string(),
            target: "https://example.com/styles".to_string(),
            external: true,
        });

        let found = rels.find_by_type_suffix("/styles").unwrap();
        assert_eq!(found.id, "rId2");
        assert!(rels.find_by_type_suffix("/numbering").is_none());
    }

    #[test]
    fn test_styles_part_from_relationships() {
        let doc_rels = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="custom/styles2.xml"/>
</Relationships>"#;
        let data = build_package(&[
            ("_rels/.rels", PACKAGE_RELS, zip::CompressionMethod::Deflated),
            ("word/document.xml", "<w:document/>", zip::CompressionMethod::Deflated),
            ("word/_rels/document.xml.rels", doc_rels, zip::CompressionMethod::Deflated),
            ("word/custom/styles2.xml", "<w:styles/>", zip::CompressionMethod::Deflated),
        ]);

        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert_eq!(container.main_document_path(), "word/document.xml");
        assert_eq!(container.styles_part_path(), "word/custom/styles2.xml");
    }

    #[test]
    fn test_styles_part_fallback() {
        let data = build_package(&[
            ("word/document.xml", "<w:document/>", zip::CompressionMethod::Deflated),
            ("word/styles.xml", "<w:styles/>", zip::CompressionMethod::Deflated),
        ]);

        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert_eq!(container.styles_part_path(), DEFAULT_STYLES_PART);
    }

    #[test]
    fn test_missing_part() {
        let data = build_package(&[("word/document.xml", "<w:document/>", zip::CompressionMethod::Stored)]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        let err = container.read_xml("word/styles.xml").unwrap_err();
        assert!(matches!(err, Error::MissingComponent(p) if p == "word/styles.xml"));
    }

    #[test]
    fn test_write_package_replaces_only_target_part() {
        let data = build_package(&[
            ("[Content_Types].xml", "<Types/>", zip::CompressionMethod::Deflated),
            ("word/styles.xml", "<w:styles/>", zip::CompressionMethod::Deflated),
            ("word/media/image1.png", "PNGDATA", zip::CompressionMethod::Stored),
        ]);
        let container = OoxmlContainer::from_bytes(data).unwrap();

        let mut out = Cursor::new(Vec::new());
        container
            .write_package("word/styles.xml", b"<w:styles>new</w:styles>", &mut out)
            .unwrap();

        let rewritten = OoxmlContainer::from_bytes(out.into_inner()).unwrap();
        assert_eq!(
            rewritten.list_files(),
            vec!["[Content_Types].xml", "word/styles.xml", "word/media/image1.png"]
        );
        assert_eq!(
            rewritten.read_xml("word/styles.xml").unwrap(),
            "<w:styles>new</w:styles>"
        );
        assert_eq!(rewritten.read_binary("word/media/image1.png").unwrap(), b"PNGDATA");
    }

    #[test]
    fn test_write_package_missing_part() {
        let data = build_package(&[("word/document.xml", "<w:document/>", zip::CompressionMethod::Deflated)]);
        let container = OoxmlContainer::from_bytes(data).unwrap();
        let mut out = Cursor::new(Vec::new());
        let err = container
            .write_package("word/styles.xml", b"", &mut out)
            .unwrap_err();
        assert!(matches!(err, Error::MissingComponent(_)));
    }

    #[test]
    fn test_utf16_decoding_function() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        let result = decode_xml_bytes(utf16_le).expect("Should decode UTF-16 LE");
        assert_eq!(result, "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        let result = decode_xml_bytes(utf16_be).expect("Should decode UTF-16 BE");
        assert_eq!(result, "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        let result = decode_xml_bytes(utf8_bom).expect("Should decode UTF-8 with BOM");
        assert_eq!(result, "<?xml>");

        let utf8_plain = b"<?xml>";
        let result = decode_xml_bytes(utf8_plain).expect("Should decode UTF-8 without BOM");
        assert_eq!(result, "<?xml>");
    }

    #[test]
    fn test_utf16_declaration_rewritten() {
        let text = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><a/>";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let decoded = decode_xml_bytes(&bytes).unwrap();
        assert_eq!(decoded, "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>");
    }

    #[test]
    fn test_undecodable_text_is_invalid_data() {
        let err = decode_xml_bytes(b"\xEF\xBB\xBF<a>\xFF</a>").unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));

        // Lone surrogate in UTF-16 LE
        let err = decode_xml_bytes(b"\xFF\xFE<\0\x00\xD8>\0").unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }
}
