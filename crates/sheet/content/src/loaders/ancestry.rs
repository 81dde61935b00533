//! Ancestry files (`ancestry`).
//!
//! Unlike lists, an ancestry file carries its fields next to `type` and
//! `version`. Very old files have neither and are read as current.

use std::path::Path;

use serde_json::Value;
use sheet_core::Ancestry;

use crate::error::{LoadError, SaveError};
use crate::loaders::{
    CURRENT_DATA_VERSION, LoadResult, SaveResult, check_version, expect_type, header, read_document,
    write_document,
};
use crate::source::DataSource;

pub const ANCESTRY_TYPE_KEY: &str = "ancestry";

/// Loads an ancestry; an unnamed one takes the file's base name.
pub fn load_ancestry(source: &dyn DataSource, path: &Path) -> LoadResult<Ancestry> {
    let mut document = read_document(source, path)?;
    let (mut file_type, mut version) = header(&document);
    if file_type.is_empty() && version == 0 {
        tracing::debug!(path = %path.display(), "reading untyped ancestry as current");
        file_type = ANCESTRY_TYPE_KEY.to_owned();
        version = CURRENT_DATA_VERSION;
    }
    expect_type(&file_type, ANCESTRY_TYPE_KEY)?;
    check_version(version)?;

    document.remove("type");
    document.remove("version");
    let mut ancestry: Ancestry =
        serde_json::from_value(Value::Object(document)).map_err(|source| LoadError::InvalidFileData {
            path: path.to_path_buf(),
            source,
        })?;
    if ancestry.name.is_empty() {
        ancestry.name = base_name(path);
    }
    Ok(ancestry)
}

pub fn save_ancestry(source: &dyn DataSource, path: &Path, ancestry: &Ancestry) -> SaveResult {
    let body = match serde_json::to_value(ancestry) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => Default::default(),
        Err(source) => {
            return Err(SaveError::Serialize {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    write_document(source, path, ANCESTRY_TYPE_KEY, body)
}

/// File name without directories or extension.
fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    #[test]
    fn untyped_files_are_current_and_named_after_the_file() {
        let source = MemorySource::new().with_file(
            "Ancestry/Elf.ancestry",
            r#"{"common_options":{"height_formula":"64"}}"#,
        );
        let elf = load_ancestry(&source, Path::new("Ancestry/Elf.ancestry")).unwrap();
        assert_eq!(elf.name, "Elf");
        assert_eq!(elf.common_options.unwrap().height_formula, "64");
    }

    #[test]
    fn typed_files_are_checked() {
        let source = MemorySource::new()
            .with_file("old.ancestry", r#"{"type":"ancestry","version":1}"#)
            .with_file("list.ancestry", r#"{"type":"trait_list","version":5}"#);
        assert!(matches!(
            load_ancestry(&source, Path::new("old.ancestry")),
            Err(LoadError::UnsupportedVersion { found: 1, .. })
        ));
        assert!(matches!(
            load_ancestry(&source, Path::new("list.ancestry")),
            Err(LoadError::UnexpectedFileType { .. })
        ));
    }

    #[test]
    fn save_writes_header_next_to_fields() {
        let source = MemorySource::new();
        let dwarf = Ancestry {
            name: "Dwarf".into(),
            ..Ancestry::default()
        };
        save_ancestry(&source, Path::new("d.ancestry"), &dwarf).unwrap();
        let saved: Value = serde_json::from_str(&source.get(Path::new("d.ancestry")).unwrap()).unwrap();
        assert_eq!(saved["type"], "ancestry");
        assert_eq!(saved["version"], CURRENT_DATA_VERSION);
        assert_eq!(saved["name"], "Dwarf");
        assert_eq!(load_ancestry(&source, Path::new("d.ancestry")).unwrap(), dwarf);
    }
}
