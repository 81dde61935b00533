use std::path::Path;

use serde_json::{Value, json};
use sheet_content::{
    FsSource, LoadError, MemorySource, load_notes, load_traits, save_notes, save_traits,
};
use sheet_core::{
    Affects, ContainerType, Fxp, NameableKeys, Node, SheetError, StudyHoursNeeded, Traversal,
};

/// Removes every `calc` block, at any depth.
fn strip_calc(value: &mut Value) {
    match value {
        Value::Object(fields) => {
            fields.remove("calc");
            fields.values_mut().for_each(strip_calc);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_calc),
        _ => {}
    }
}

fn current_trait_list() -> Value {
    json!({
        "type": "trait_list",
        "version": 5,
        "rows": [
            {
                "id": "TAbCdEfGhIjKlMnOp",
                "name": "Night Vision",
                "reference": "B71",
                "tags": ["Advantage", "Physical"],
                "levels": 3,
                "points_per_level": 1,
                "can_level": true,
                "modifiers": [
                    {"id": "Mabcdefghijklmnop", "name": "Extended", "cost": 50},
                    {"id": "MABCDEFGHIJKLMNOP", "name": "Unused", "cost": -10, "disabled": true}
                ],
                "third_party": {"vtt": {"icon": "eye"}},
                "calc": {"points": 999}
            },
            {
                "id": "tZyXwVuTsRqPoNmLk",
                "name": "Abilities",
                "container_type": "alternative_abilities",
                "open": true,
                "children": [
                    {"id": "T0123456789ABCDEF", "name": "Blast", "base_points": 10},
                    {"id": "T0123456789abcdef", "name": "Ray", "base_points": 5, "cr": 12}
                ]
            }
        ]
    })
}

#[test]
fn save_after_load_reproduces_the_file_apart_from_calc() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let source = FsSource::rooted(dir.path());
    let mut original = current_trait_list();
    std::fs::write(dir.path().join("in.adq"), original.to_string()).expect("input should be written");

    let traits = load_traits(&source, Path::new("in.adq")).expect("current file should load");
    save_traits(&source, Path::new("out.adq"), &traits).expect("save should succeed");

    let text = std::fs::read_to_string(dir.path().join("out.adq")).expect("output should exist");
    let mut saved: Value = serde_json::from_str(&text).expect("output should be JSON");

    // The file's stale calc is replaced by freshly computed values:
    // 3 levels × 1 point × 1.5 = 4.5 → 5, and 10 + 5 × 20% = 11.
    assert_eq!(saved["rows"][0]["calc"]["points"], 5);
    assert_eq!(saved["rows"][1]["calc"]["points"], 11);

    strip_calc(&mut saved);
    strip_calc(&mut original);
    assert_eq!(saved, original);
}

#[test]
fn legacy_advantage_list_migrates_to_trait_list() {
    let source = MemorySource::new().with_file(
        "legacy.adq",
        json!({
            "type": "advantage_list",
            "version": 2,
            "rows": [
                {
                    "type": "advantage",
                    "id": "5b1e2c2a-0d3e-4a8b-9c77-2f1f0e6c9a11",
                    "name": "Combat Reflexes",
                    "supernatural": false,
                    "physical": true,
                    "mental": true,
                    "base_points": 15
                },
                {
                    "type": "advantage_container",
                    "name": "Racial",
                    "container_type": "race",
                    "ancestry": "Elf",
                    "children": [
                        {"type": "advantage", "name": "Magery", "levels": 1, "points_per_level": 10}
                    ]
                }
            ]
        })
        .to_string(),
    );

    let traits = load_traits(&source, Path::new("legacy.adq")).expect("legacy file should load");
    assert_eq!(traits.len(), 3);
    // 15 + 10 × 1
    assert_eq!(traits.total_points(), Fxp::from_int(25));

    save_traits(&source, Path::new("legacy.adq"), &traits).expect("save should succeed");
    let saved: Value =
        serde_json::from_str(&source.get(Path::new("legacy.adq")).unwrap()).expect("saved JSON");
    assert_eq!(saved["type"], "trait_list");
    assert_eq!(saved["version"], 5);

    let reflexes = &saved["rows"][0];
    assert_eq!(reflexes["tags"], json!(["Mental", "Physical"]));
    assert!(reflexes.get("type").is_none());
    assert!(reflexes["id"].as_str().unwrap().starts_with('T'));

    let racial = &saved["rows"][1];
    assert!(racial["id"].as_str().unwrap().starts_with('t'));
    assert_eq!(racial["container_type"], "ancestry");
    assert_eq!(racial["children"][0]["can_level"], true);
}

#[test]
fn malformed_files_are_rejected_with_specific_errors() {
    let source = MemorySource::new()
        .with_file("v1.adq", r#"{"type":"trait_list","version":1,"rows":[]}"#)
        .with_file("v6.adq", r#"{"type":"trait_list","version":6,"rows":[]}"#)
        .with_file("notes.adq", r#"{"type":"note_list","version":5,"rows":[]}"#)
        .with_file("garbage.adq", "{ rows: ")
        .with_file(
            "bad_id.adq",
            r#"{"type":"trait_list","version":5,"rows":[{"id":"nope","name":"?"}]}"#,
        );

    let load = |name: &str| load_traits(&source, Path::new(name)).unwrap_err();

    assert!(matches!(load("v1.adq"), LoadError::UnsupportedVersion { found: 1, .. }));
    assert!(matches!(load("v6.adq"), LoadError::UnsupportedVersion { found: 6, .. }));
    assert!(matches!(load("notes.adq"), LoadError::UnexpectedFileType { .. }));
    assert!(matches!(load("garbage.adq"), LoadError::InvalidFileData { .. }));
    let err = load("bad_id.adq");
    assert!(matches!(err, LoadError::InvalidIdentifier { row: 0, .. }));
    assert_eq!(err.error_code(), "LOAD_INVALID_IDENTIFIER");
}

#[test]
fn unknown_keys_in_one_row_do_not_fail_the_list() {
    let source = MemorySource::new().with_file(
        "mixed.adq",
        json!({
            "type": "trait_list",
            "version": 5,
            "rows": [
                {"id": "TAbCdEfGhIjKlMnOp", "name": "Luck", "base_points": 15},
                {
                    "id": "TZyXwVuTsRqPoNmLk",
                    "name": "Odd",
                    "base_points": 10,
                    "study_hours_needed": "100",
                    "cr_adj": "future_adjustment",
                    "modifiers": [{"id": "Mabcdefghijklmnop", "name": "Weird", "cost": 50, "affects": "weird"}]
                },
                {"id": "tZyXwVuTsRqPoNmLk", "name": "Future", "container_type": "future_kind"}
            ]
        })
        .to_string(),
    );

    let traits = load_traits(&source, Path::new("mixed.adq")).expect("unknown keys should fall back");
    assert_eq!(traits.len(), 3);
    let rows: Vec<_> = traits.walk(Traversal::empty()).map(|(_, t)| t).collect();
    assert_eq!(rows[1].leaf.study_hours_needed, StudyHoursNeeded::Standard);
    assert!(rows[1].cr_adj.is_none());
    let (_, weird) = rows[1].modifiers.walk(Traversal::empty()).next().expect("modifier kept");
    assert_eq!(weird.leaf.affects, Affects::Total);
    assert_eq!(rows[2].container.container_type, ContainerType::Group);
    // 15 + (10 + 50%)
    assert_eq!(traits.total_points(), Fxp::from_int(30));
}

#[test]
fn numbers_beyond_the_fixed_point_range_are_rejected() {
    let source = MemorySource::new().with_file(
        "huge.adq",
        r#"{"type":"trait_list","version":5,"rows":[{"id":"TAbCdEfGhIjKlMnOp","base_points":1e300}]}"#,
    );
    let err = load_traits(&source, Path::new("huge.adq")).unwrap_err();
    assert!(matches!(err, LoadError::InvalidFileData { .. }));
}

#[test]
fn nameable_keys_with_default_values_change_nothing() {
    let source = MemorySource::new().with_file(
        "keys.adq",
        json!({
            "type": "trait_list",
            "version": 5,
            "rows": [{
                "id": "TAbCdEfGhIjKlMnOp",
                "name": "Enemy (@Who@)",
                "notes": "Hunts you every @Frequency@",
                "modifiers": [{"id": "Mabcdefghijklmnop", "name": "@Who@ is powerful", "cost": 50}]
            }]
        })
        .to_string(),
    );
    let mut traits = load_traits(&source, Path::new("keys.adq")).expect("file should load");
    let before = serde_json::to_value(&traits).expect("tree should serialize");

    let mut keys = NameableKeys::new();
    traits.fill_with_nameable_keys(&mut keys);
    assert_eq!(keys.keys().map(String::as_str).collect::<Vec<_>>(), ["Frequency", "Who"]);

    traits.apply_nameable_keys(&keys);
    assert_eq!(serde_json::to_value(&traits).expect("tree should serialize"), before);

    keys.insert("Who".into(), "The Mob".into());
    traits.apply_nameable_keys(&keys);
    let (_, enemy) = traits.walk(Traversal::empty()).next().unwrap();
    assert_eq!(enemy.name, "Enemy (The Mob)");
    let (_, modifier) = enemy.modifiers.walk(Traversal::empty()).next().unwrap();
    assert_eq!(modifier.name, "The Mob is powerful");
}

#[test]
fn note_lists_survive_a_round_trip_on_disk() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let source = FsSource::rooted(dir.path());
    let original = json!({
        "type": "note_list",
        "version": 5,
        "rows": [
            {"id": "nAbCdEfGhIjKlMnOp", "text": "Session log", "open": true, "children": [
                {"id": "NAbCdEfGhIjKlMnOp", "text": "Met the **baron**", "reference": "p12"}
            ]}
        ]
    });
    std::fs::write(dir.path().join("n.not"), original.to_string()).expect("input should be written");

    let notes = load_notes(&source, Path::new("n.not")).expect("notes should load");
    let root = notes.roots()[0];
    assert!(notes.node(root).expect("root exists").is_container());
    save_notes(&source, Path::new("n.not"), &notes).expect("save should succeed");

    let saved: Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("n.not")).expect("output should exist"),
    )
    .expect("output should be JSON");
    assert_eq!(saved, original);
}
