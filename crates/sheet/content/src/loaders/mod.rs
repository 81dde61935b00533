//! Versioned list files.
//!
//! Every file is a JSON object `{ "type", "version", ... }`. Lists carry their
//! entities as nested `rows`; an ancestry file carries its fields inline.
//! Loading checks the discriminator and version, migrates legacy row shapes
//! in place on the raw JSON, then deserializes into sheet-core types. Saving
//! writes the current discriminator and version, plus a derived `calc` block
//! on rows that have one.

pub mod ancestry;
pub mod migrate;
pub mod modifiers;
pub mod notes;
pub mod traits;

pub use ancestry::{load_ancestry, save_ancestry};
pub use modifiers::{load_trait_modifiers, save_trait_modifiers};
pub use notes::{load_notes, save_notes};
pub use traits::{load_traits, save_traits};

use std::path::Path;

use serde::Serialize;
use serde::de::{DeserializeOwned, Error as _};
use serde_json::{Map, Value, json};
use sheet_core::{Node, NodeId, NodeTree};

use crate::error::{LoadError, SaveError};
use crate::source::DataSource;

/// Oldest data version still readable.
pub const MIN_DATA_VERSION: i64 = 2;
/// Version written by every save.
pub const CURRENT_DATA_VERSION: i64 = 5;

/// Common result type for loaders.
pub type LoadResult<T> = Result<T, LoadError>;
/// Common result type for savers.
pub type SaveResult = Result<(), SaveError>;

/// Discriminator of a list file.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ListFormat {
    pub type_key: &'static str,
    /// Older name still accepted on load.
    pub legacy_type_key: Option<&'static str>,
}

pub(crate) fn check_version(version: i64) -> LoadResult<()> {
    if (MIN_DATA_VERSION..=CURRENT_DATA_VERSION).contains(&version) {
        Ok(())
    } else {
        Err(LoadError::UnsupportedVersion {
            found: version,
            min: MIN_DATA_VERSION,
            max: CURRENT_DATA_VERSION,
        })
    }
}

fn invalid_data(path: &Path, message: &str) -> LoadError {
    LoadError::InvalidFileData {
        path: path.to_path_buf(),
        source: serde_json::Error::custom(message),
    }
}

/// Reads `path` as a JSON object.
pub(crate) fn read_document(source: &dyn DataSource, path: &Path) -> LoadResult<Map<String, Value>> {
    let text = source.read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| LoadError::InvalidFileData {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(fields) => Ok(fields),
        _ => Err(invalid_data(path, "expected a JSON object")),
    }
}

/// `type` and `version` of a document; missing values read as empty and 0.
pub(crate) fn header(document: &Map<String, Value>) -> (String, i64) {
    let file_type = document
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    let version = document.get("version").and_then(Value::as_i64).unwrap_or(0);
    (file_type, version)
}

pub(crate) fn expect_type(found: &str, expected: &'static str) -> LoadResult<()> {
    if found == expected {
        Ok(())
    } else {
        Err(LoadError::UnexpectedFileType {
            expected,
            found: found.to_owned(),
        })
    }
}

/// Reads a list file and returns its raw rows after the header checks.
pub(crate) fn read_rows(source: &dyn DataSource, path: &Path, format: ListFormat) -> LoadResult<Vec<Value>> {
    let mut document = read_document(source, path)?;
    let (mut file_type, version) = header(&document);
    if format.legacy_type_key == Some(file_type.as_str()) {
        file_type = format.type_key.to_owned();
    }
    expect_type(&file_type, format.type_key)?;
    check_version(version)?;
    match document.remove("rows") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(rows)) => Ok(rows),
        Some(_) => Err(invalid_data(path, "`rows` is not an array")),
    }
}

/// Deserializes migrated rows into a tree, normalizing container-only and
/// leaf-only fields.
pub(crate) fn decode_rows<T>(path: &Path, rows: Vec<Value>) -> LoadResult<NodeTree<T>>
where
    T: Node + DeserializeOwned,
{
    let mut tree: NodeTree<T> =
        serde_json::from_value(Value::Array(rows)).map_err(|source| LoadError::InvalidFileData {
            path: path.to_path_buf(),
            source,
        })?;
    tree.clear_unused_fields();
    tracing::debug!(path = %path.display(), nodes = tree.len(), "loaded list");
    Ok(tree)
}

/// Serializes a tree to its row list.
pub(crate) fn encode_rows<T>(path: &Path, tree: &NodeTree<T>) -> Result<Vec<Value>, SaveError>
where
    T: Node + Serialize,
{
    match serde_json::to_value(tree) {
        Ok(Value::Array(rows)) => Ok(rows),
        Ok(_) => Ok(Vec::new()),
        Err(source) => Err(SaveError::Serialize {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Adds a `calc` object to every row for which `calc` returns one. `rows`
/// must be the encoding of the nodes in `ids`, in order.
pub(crate) fn attach_calc<T, F>(tree: &NodeTree<T>, ids: &[NodeId], rows: &mut [Value], calc: &F)
where
    T: Node,
    F: Fn(NodeId) -> Option<Map<String, Value>>,
{
    for (&id, row) in ids.iter().zip(rows.iter_mut()) {
        let Value::Object(fields) = row else {
            continue;
        };
        if let Some(Value::Array(children)) = fields.get_mut("children") {
            attach_calc(tree, tree.children(id), children, calc);
        }
        if let Some(block) = calc(id) {
            fields.insert("calc".to_owned(), Value::Object(block));
        }
    }
}

/// Kind of data a file holds, from its `type` discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    Traits,
    TraitModifiers,
    Notes,
    Ancestry,
}

impl FileKind {
    /// Reads only far enough to classify `path`.
    pub fn detect(source: &dyn DataSource, path: &Path) -> LoadResult<Self> {
        let document = read_document(source, path)?;
        let (file_type, version) = header(&document);
        let kind = [
            (traits::TRAIT_LIST, Self::Traits),
            (modifiers::MODIFIER_LIST, Self::TraitModifiers),
            (notes::NOTE_LIST, Self::Notes),
        ]
        .into_iter()
        .find(|(format, _)| {
            format.type_key == file_type || format.legacy_type_key == Some(file_type.as_str())
        })
        .map(|(_, kind)| kind);
        match kind {
            Some(kind) => Ok(kind),
            None if file_type == ancestry::ANCESTRY_TYPE_KEY || (file_type.is_empty() && version == 0) => {
                Ok(Self::Ancestry)
            }
            None => Err(LoadError::UnexpectedFileType {
                expected: "a sheet list",
                found: file_type,
            }),
        }
    }
}

/// Writes a document with the current version.
pub(crate) fn write_document(
    source: &dyn DataSource,
    path: &Path,
    type_key: &str,
    body: Map<String, Value>,
) -> SaveResult {
    let mut document = Map::new();
    document.insert("type".to_owned(), json!(type_key));
    document.insert("version".to_owned(), json!(CURRENT_DATA_VERSION));
    document.extend(body);
    let bytes = serde_json::to_vec_pretty(&Value::Object(document)).map_err(|source| SaveError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    source.write(path, &bytes).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), type_key, "saved");
    Ok(())
}

/// Writes a list document around `rows`.
pub(crate) fn write_rows(source: &dyn DataSource, path: &Path, type_key: &str, rows: Vec<Value>) -> SaveResult {
    let mut body = Map::new();
    body.insert("rows".to_owned(), Value::Array(rows));
    write_document(source, path, type_key, body)
}
