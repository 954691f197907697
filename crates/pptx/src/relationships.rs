//! Resolving embedded font resources to their typeface names.
//!
//! `ppt/presentation.xml` declares each embedded font with its typeface and
//! a relationship id per style; `ppt/_rels/presentation.xml.rels` maps those
//! ids to the font parts under `ppt/fonts/`.

use crate::archive::{entry_file_name, FontPackage};
use pptfont_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};

/// Path of the presentation descriptor inside the package.
pub const PRESENTATION_PATH: &str = "ppt/presentation.xml";

/// Path of the presentation's relationship index inside the package.
pub const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// Relationship types that point at embedded font parts.
pub const FONT_RELATIONSHIP_TYPES: &[&str] = &[
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/font",
    "http://purl.oclc.org/ooxml/officeDocument/relationships/font",
];

/// One `p:embeddedFont` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedFontDecl {
    /// Typeface from `p:font/@typeface`.
    pub typeface: String,
    /// Relationship id of the regular style.
    pub regular: Option<String>,
    /// Relationship id of the bold style.
    pub bold: Option<String>,
    /// Relationship id of the italic style.
    pub italic: Option<String>,
    /// Relationship id of the bold italic style.
    pub bold_italic: Option<String>,
}

/// A font relationship from the relationship index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRelationship {
    /// Relationship id (`rId5`).
    pub id: String,
    /// Target path, relative to `ppt/` (`fonts/font1.fntdata`).
    pub target: String,
}

/// The font declarations and font relationships of one package.
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    /// Embedded font declarations, in document order.
    pub declarations: Vec<EmbeddedFontDecl>,
    /// Relationships of the font type, in document order.
    pub relationships: Vec<FontRelationship>,
}

impl RelationshipGraph {
    /// Build the graph from a package's descriptors.
    ///
    /// Fails with [`Error::MissingDescriptor`] if either descriptor is absent
    /// or cannot be parsed.
    pub fn load<R: Read + Seek>(package: &mut FontPackage<R>) -> Result<Self> {
        let presentation = read_descriptor(package, PRESENTATION_PATH)?;
        let rels = read_descriptor(package, PRESENTATION_RELS_PATH)?;

        let declarations = parse_embedded_fonts(&presentation).map_err(|e| {
            log::debug!("{}: {}", PRESENTATION_PATH, e);
            Error::MissingDescriptor(PRESENTATION_PATH.to_string())
        })?;
        let relationships = parse_font_relationships(&rels).map_err(|e| {
            log::debug!("{}: {}", PRESENTATION_RELS_PATH, e);
            Error::MissingDescriptor(PRESENTATION_RELS_PATH.to_string())
        })?;

        Ok(Self {
            declarations,
            relationships,
        })
    }

    /// Map each font part's file name to its typeface name.
    ///
    /// Only the regular style slot is consulted. Relationships with no
    /// matching declaration are left out.
    pub fn typeface_names(&self) -> HashMap<String, String> {
        let mut names = HashMap::new();

        for rel in &self.relationships {
            let decl = self
                .declarations
                .iter()
                .find(|d| d.regular.as_deref() == Some(rel.id.as_str()));

            match decl {
                Some(decl) => {
                    names.insert(entry_file_name(&rel.target).to_string(), decl.typeface.clone());
                }
                None => {
                    log::debug!(
                        "Font relationship {} ({}) has no regular-style declaration",
                        rel.id,
                        rel.target
                    );
                }
            }
        }

        names
    }
}

/// Map each embedded font file name to its typeface name.
///
/// Never fails: packages without font metadata yield an empty map, and the
/// fonts are then extracted under their raw file names.
pub fn resolve_typeface_names<R: Read + Seek>(
    package: &mut FontPackage<R>,
) -> HashMap<String, String> {
    match RelationshipGraph::load(package) {
        Ok(graph) => graph.typeface_names(),
        Err(e) => {
            log::warn!("No typeface names for {}: {}", package.name(), e);
            HashMap::new()
        }
    }
}

fn read_descriptor<R: Read + Seek>(package: &mut FontPackage<R>, path: &str) -> Result<String> {
    match package.read_text(path) {
        Ok(Some(content)) => Ok(content),
        Ok(None) => Err(Error::MissingDescriptor(path.to_string())),
        Err(e) => {
            log::debug!("{}: {}", path, e);
            Err(Error::MissingDescriptor(path.to_string()))
        }
    }
}

/// Parse the `p:embeddedFontLst` of a presentation descriptor.
pub fn parse_embedded_fonts(xml: &str) -> Result<Vec<EmbeddedFontDecl>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut fonts = Vec::new();
    let mut current: Option<EmbeddedFontDecl> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"embeddedFont" => {
                current = Some(EmbeddedFontDecl::default());
            }
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if let Some(ref mut decl) = current {
                    let name = e.name();
                    match local_name(name.as_ref()) {
                        b"font" => {
                            if let Some(typeface) = attribute(e, b"typeface")? {
                                decl.typeface = typeface;
                            }
                        }
                        b"regular" => decl.regular = attribute(e, b"id")?,
                        b"bold" => decl.bold = attribute(e, b"id")?,
                        b"italic" => decl.italic = attribute(e, b"id")?,
                        b"boldItalic" => decl.bold_italic = attribute(e, b"id")?,
                        _ => {}
                    }
                }
            }
            Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"embeddedFont" => {
                if let Some(decl) = current.take() {
                    fonts.push(decl);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing embedded fonts: {}", e)));
            }
            _ => {}
        }
    }

    Ok(fonts)
}

/// Parse the font relationships out of a relationship index.
pub fn parse_font_relationships(xml: &str) -> Result<Vec<FontRelationship>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut relationships = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let rel_type = attribute(e, b"Type")?.unwrap_or_default();
                if !FONT_RELATIONSHIP_TYPES.contains(&rel_type.as_str()) {
                    continue;
                }

                match (attribute(e, b"Id")?, attribute(e, b"Target")?) {
                    (Some(id), Some(target)) => relationships.push(FontRelationship { id, target }),
                    (id, target) => {
                        log::debug!(
                            "Skipping incomplete font relationship {:?} -> {:?}",
                            id,
                            target
                        );
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Error parsing relationships: {}", e)));
            }
            _ => {}
        }
    }

    Ok(relationships)
}

/// Value of the attribute whose local name is `key`, unescaped.
fn attribute(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        if local_name(attr.key.as_ref()) == key {
            let value = attr
                .unescape_value()
                .map_err(|err| Error::Xml(format!("Bad attribute value: {}", err)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Extract the local name from a potentially namespaced XML name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
