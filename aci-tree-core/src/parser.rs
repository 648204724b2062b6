use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::error::Category;
use thiserror::Error;

use crate::tree::{AciNode, Attributes, Document};

/// Files larger than this are decoded straight from the file handle.
pub const DEFAULT_STREAM_THRESHOLD: u64 = 8 * 1024 * 1024;

/// Errors that can occur while loading an export into a [`Document`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The byte source could not be read.
    #[error("failed to read export: {0}")]
    Io(#[from] std::io::Error),
    /// The bytes are not an export envelope.
    #[error("malformed export: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Io => LoadError::Io(err.into()),
            _ => LoadError::Malformed(err.to_string()),
        }
    }
}

/// Controls how files are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// File size in bytes above which the file is decoded incrementally.
    pub stream_threshold: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            stream_threshold: DEFAULT_STREAM_THRESHOLD,
        }
    }
}

/// Decode an export incrementally from `reader`.
///
/// Objects are built as they are decoded; the raw text is never held in
/// memory as a whole.
pub fn load<R: Read>(reader: R) -> Result<Document, LoadError> {
    let reader = BufReader::new(reader);
    Ok(serde_json::from_reader(reader)?)
}

/// Decode an export held in memory.
pub fn parse(bytes: &[u8]) -> Result<Document, LoadError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Load an export file with default [`LoadOptions`].
pub fn parse_file(path: &Path) -> Result<Document, LoadError> {
    parse_file_with_options(path, &LoadOptions::default())
}

/// Load an export file, streaming it when it exceeds the configured threshold.
pub fn parse_file_with_options(path: &Path, opts: &LoadOptions) -> Result<Document, LoadError> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    if len > opts.stream_threshold {
        return load(file);
    }

    let mut bytes = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
    file.read_to_end(&mut bytes)?;
    parse(&bytes)
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an export object with `totalCount` and `imdata`")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Document, A::Error> {
        let mut total_count: Option<usize> = None;
        let mut imdata: Option<Vec<AciNode>> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "totalCount" => total_count = Some(map.next_value::<TotalCount>()?.0),
                "imdata" => imdata = Some(map.next_value::<NodeList>()?.0),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        let imdata = imdata.ok_or_else(|| de::Error::missing_field("imdata"))?;
        Ok(Document::with_declared_count(imdata, total_count))
    }
}

struct TotalCount(usize);

impl<'de> Deserialize<'de> for TotalCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TotalCountVisitor)
    }
}

struct TotalCountVisitor;

impl<'de> Visitor<'de> for TotalCountVisitor {
    type Value = TotalCount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("`totalCount` as a decimal string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<TotalCount, E> {
        v.trim()
            .parse::<usize>()
            .map(TotalCount)
            .map_err(|_| E::custom(format!("totalCount is not numeric: '{v}'")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<TotalCount, E> {
        usize::try_from(v)
            .map(TotalCount)
            .map_err(|_| E::custom(format!("totalCount out of range: {v}")))
    }
}

struct NodeList(Vec<AciNode>);

impl<'de> Deserialize<'de> for NodeList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(NodeListVisitor)
    }
}

struct NodeListVisitor;

impl<'de> Visitor<'de> for NodeListVisitor {
    type Value = NodeList;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of objects")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<NodeList, A::Error> {
        let mut nodes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(node) = seq.next_element::<AciNode>()? {
            nodes.push(node);
        }
        Ok(NodeList(nodes))
    }
}

impl<'de> Deserialize<'de> for AciNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = AciNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object keyed by its class name")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<AciNode, A::Error> {
        let class_name = map
            .next_key::<String>()?
            .ok_or_else(|| de::Error::custom("object entry has no class name"))?;
        if class_name.is_empty() {
            return Err(de::Error::custom("object class name is empty"));
        }

        let body = map.next_value::<NodeBody>()?;
        if map.next_key::<IgnoredAny>()?.is_some() {
            return Err(de::Error::custom(format!(
                "object `{class_name}` has more than one class key"
            )));
        }
        if body.attributes.is_none() && body.children.is_none() {
            return Err(de::Error::custom(format!(
                "object `{class_name}` has neither attributes nor children"
            )));
        }

        Ok(AciNode {
            class_name,
            attributes: body.attributes.unwrap_or_default(),
            children: body.children.map(|list| list.0).unwrap_or_default(),
        })
    }
}

struct NodeBody {
    attributes: Option<Attributes>,
    children: Option<NodeList>,
}

impl<'de> Deserialize<'de> for NodeBody {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NodeBodyVisitor)
    }
}

struct NodeBodyVisitor;

impl<'de> Visitor<'de> for NodeBodyVisitor {
    type Value = NodeBody;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object body with `attributes` and/or `children`")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<NodeBody, A::Error> {
        let mut body = NodeBody {
            attributes: None,
            children: None,
        };
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "attributes" => body.attributes = Some(map.next_value()?),
                "children" => body.children = Some(map.next_value()?),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(body)
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttributesVisitor)
    }
}

struct AttributesVisitor;

impl<'de> Visitor<'de> for AttributesVisitor {
    type Value = Attributes;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of string attributes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Attributes, A::Error> {
        let mut attrs = Attributes::new();
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value::<String>()?;
            attrs.insert(key, value);
        }
        Ok(attrs)
    }
}
