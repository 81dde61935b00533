//! Note list files (`note_list`).

use std::path::Path;

use serde_json::{Map, Value, json};
use sheet_core::{KindFamily, Note, NodeId, NodeTree};

use crate::loaders::migrate::migrate_rows;
use crate::loaders::{
    ListFormat, LoadResult, SaveResult, attach_calc, decode_rows, encode_rows, read_rows, write_rows,
};
use crate::source::DataSource;

pub(crate) const NOTE_LIST: ListFormat = ListFormat {
    type_key: "note_list",
    legacy_type_key: None,
};

pub fn load_notes(source: &dyn DataSource, path: &Path) -> LoadResult<NodeTree<Note>> {
    let mut rows = read_rows(source, path, NOTE_LIST)?;
    migrate_rows(KindFamily::Note, &mut rows)?;
    decode_rows(path, rows)
}

/// Saves a note list; rows whose text holds embedded expressions get a
/// `calc.resolved_text`.
pub fn save_notes(source: &dyn DataSource, path: &Path, notes: &NodeTree<Note>) -> SaveResult {
    let mut written = notes.clone();
    written.clear_unused_fields();
    let mut rows = encode_rows(path, &written)?;
    attach_calc(&written, written.roots(), &mut rows, &|id| note_calc(&written, id));
    write_rows(source, path, NOTE_LIST.type_key, rows)
}

fn note_calc(notes: &NodeTree<Note>, id: NodeId) -> Option<Map<String, Value>> {
    let note = notes.get(id)?;
    let text = note.resolved_text();
    if text == note.text {
        return None;
    }
    let mut calc = Map::new();
    calc.insert("resolved_text".to_owned(), json!(text));
    Some(calc)
}
