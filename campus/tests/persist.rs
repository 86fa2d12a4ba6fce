//! Map files and configuration on disk.

use std::fs;
use std::path::Path;

use campus::config::{load_config, load_config_or_default, Config, DEFAULT_MAP_DIR};
use campus::geometry::limits;
use campus::{list_maps, with_map_extension, CampusMap, Error, Tolerances, Vec2};
use serde_json::json;
use tempfile::tempdir;

fn sample_map() -> CampusMap {
    let mut m = CampusMap::new();
    let a = m.add_building(
        "Library",
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(12.0, 5.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ],
        Vec2::new(10.0, 5.0),
    );
    let b = m.add_building(
        "Gym",
        vec![
            Vec2::new(70.0, 0.0),
            Vec2::new(80.0, 0.0),
            Vec2::new(80.0, 10.0),
            Vec2::new(70.0, 10.0),
        ],
        Vec2::new(70.0, 5.0),
    );
    // 30-40-50 triangles keep every length exact
    let j = m.add_junction(Vec2::new(40.0, 45.0));
    m.add_road(&a, &j).unwrap();
    m.add_road(&j, &b).unwrap();
    m
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let m = sample_map();
    let written = m.save(&dir.path().join("campus")).unwrap();
    assert_eq!(written, dir.path().join("campus.map"));

    let back = CampusMap::load(&written).unwrap();
    assert_eq!(back.nodes().collect::<Vec<_>>(), m.nodes().collect::<Vec<_>>());
    assert_eq!(back.edges(), m.edges());
    assert_eq!(back.edges()[0].length, 50.0);
    assert_eq!(back.route_between_buildings("Library", "Gym").len(), 3);
    let shape = back.node("B_Library").and_then(|n| n.shape()).unwrap();
    assert_eq!(shape.len(), 5);
}

#[test]
fn loaded_map_continues_edge_ids() {
    let m = sample_map();
    let mut back = CampusMap::from_json_value(m.to_json_value().unwrap()).unwrap();
    let used: Vec<u32> = back.edges().iter().map(|e| e.id).collect();
    let e = back.add_road("B_Library", "B_Gym").unwrap();
    assert!(!used.contains(&e));
}

#[test]
fn extension_is_appended_once() {
    assert_eq!(with_map_extension(Path::new("a/b")), Path::new("a/b.map"));
    assert_eq!(with_map_extension(Path::new("a/b.map")), Path::new("a/b.map"));
    assert_eq!(with_map_extension(Path::new("a/b.txt")), Path::new("a/b.txt.map"));
}

#[test]
fn lists_only_map_files_sorted() {
    let dir = tempdir().unwrap();
    sample_map().save(&dir.path().join("zeta")).unwrap();
    sample_map().save(&dir.path().join("alpha")).unwrap();
    fs::write(dir.path().join("notes.txt"), "x").unwrap();
    fs::create_dir(dir.path().join("folder.map")).unwrap();
    assert_eq!(list_maps(dir.path()).unwrap(), vec!["alpha".to_string(), "zeta".to_string()]);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = CampusMap::load(&dir.path().join("nope.map")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert_eq!(err.code(), "io");
}

#[test]
fn garbage_is_a_json_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.map");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(CampusMap::load(&path), Err(Error::Json(_))));
}

#[test]
fn dangling_and_duplicate_edges_are_skipped() {
    let doc = json!({
        "version": 1,
        "nodes": [
            { "id": "J_a", "x": 0.0, "y": 0.0 },
            { "id": "J_b", "x": 3.0, "y": 4.0 }
        ],
        "edges": [
            { "id": 0, "from": "J_a", "to": "J_b", "length": 5.0 },
            { "id": 1, "from": "J_b", "to": "J_a", "length": 5.0 },
            { "id": 2, "from": "J_a", "to": "J_missing", "length": 1.0 },
            { "id": 3, "from": "J_a", "to": "J_a", "length": 0.0 }
        ]
    });
    let m = CampusMap::from_json_value(doc).unwrap();
    assert_eq!(m.edge_count(), 1);
    assert_eq!(m.edges()[0].id, 0);
    assert_eq!(m.edges()[0].rank, 0);
    // next id continues past the highest kept id even without next_edge_id
    let mut m = m;
    let j = m.add_junction(Vec2::new(9.0, 9.0));
    assert_eq!(m.add_road("J_a", &j), Some(1));
}

#[test]
fn half_building_is_rejected() {
    let doc = json!({
        "version": 1,
        "nodes": [{ "id": "B_x", "x": 0.0, "y": 0.0, "shape": [{ "x": 0.0, "y": 0.0 }] }],
        "edges": []
    });
    assert!(matches!(CampusMap::from_json_value(doc), Err(Error::Invalid(_))));
}

#[test]
fn duplicate_node_ids_are_rejected() {
    let doc = json!({
        "version": 1,
        "nodes": [
            { "id": "J_a", "x": 0.0, "y": 0.0 },
            { "id": "J_a", "x": 1.0, "y": 1.0 }
        ],
        "edges": []
    });
    assert!(matches!(CampusMap::from_json_value(doc), Err(Error::Invalid(_))));
}

#[test]
fn unknown_version_is_rejected() {
    let doc = json!({ "version": 7, "nodes": [], "edges": [] });
    assert!(matches!(CampusMap::from_json_value(doc), Err(Error::Invalid(_))));
}

#[test]
fn ingest_limits() {
    let far = json!({
        "version": 1,
        "nodes": [{ "id": "J_far", "x": limits::COORD_MAX * 2.0, "y": 0.0 }],
        "edges": []
    });
    assert!(matches!(CampusMap::from_json_value(far), Err(Error::Limit(_))));

    let big_shape: Vec<_> = (0..=limits::MAX_SHAPE_VERTICES)
        .map(|i| json!({ "x": i as f32, "y": 0.0 }))
        .collect();
    let doc = json!({
        "version": 1,
        "nodes": [{ "id": "B_big", "x": 0.0, "y": 0.0, "shape": big_shape, "connection": { "x": 0.0, "y": 0.0 } }],
        "edges": []
    });
    assert!(matches!(CampusMap::from_json_value(doc), Err(Error::Limit(_))));

    let long_id = "J_".to_string() + &"x".repeat(limits::MAX_ID_LEN);
    let doc = json!({ "version": 1, "nodes": [{ "id": long_id, "x": 0.0, "y": 0.0 }], "edges": [] });
    assert!(CampusMap::from_json_value(doc).is_err());
}

#[test]
fn config_from_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("campus.toml");
    fs::write(
        &path,
        "map_directory = \"/srv/maps\"\n\n[tolerances]\nnode_px = 20.0\n",
    )
    .unwrap();
    let c = load_config(&path).unwrap();
    assert_eq!(c.tolerances.node_px, 20.0);
    assert_eq!(c.tolerances.edge_px, Tolerances::default().edge_px);
    if std::env::var(campus::config::MAP_DIR_ENV).is_err() {
        assert_eq!(c.map_directory, Path::new("/srv/maps"));
    }
}

#[test]
fn bad_config_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("campus.toml");
    fs::write(&path, "map_directory = [").unwrap();
    assert!(matches!(load_config(&path), Err(Error::Toml(_))));
    let c = load_config_or_default(Some(&path));
    assert_eq!(c.tolerances, Tolerances::default());

    fs::write(&path, "[tolerances]\nedge_px = -1.0\n").unwrap();
    assert!(matches!(load_config(&path), Err(Error::Invalid(_))));
}

#[test]
fn map_directory_is_created() {
    let dir = tempdir().unwrap();
    let config = Config {
        map_directory: dir.path().join("nested").join("maps"),
        ..Config::default()
    };
    let made = config.ensure_map_directory().unwrap();
    assert!(made.is_dir());
    assert_eq!(made, config.map_directory);
    assert!(config.list_maps().unwrap().is_empty());
    sample_map().save(&config.map_path("demo")).unwrap();
    assert_eq!(config.list_maps().unwrap(), vec!["demo".to_string()]);
    assert_eq!(Config::default().map_directory, Path::new(DEFAULT_MAP_DIR));
}

#[test]
fn exhausted_edge_ids() {
    let nodes = json!([
        { "id": "J_a", "x": 0.0, "y": 0.0 },
        { "id": "J_b", "x": 3.0, "y": 4.0 },
        { "id": "J_c", "x": 6.0, "y": 8.0 }
    ]);
    let doc = json!({ "version": 1, "next_edge_id": u32::MAX, "nodes": nodes, "edges": [] });
    assert!(matches!(CampusMap::from_json_value(doc), Err(Error::Limit(_))));
    let doc = json!({
        "version": 1,
        "nodes": nodes,
        "edges": [{ "id": u32::MAX, "from": "J_a", "to": "J_b", "length": 5.0 }]
    });
    assert!(matches!(CampusMap::from_json_value(doc), Err(Error::Limit(_))));

    // the last usable id is handed out once, then the counter is spent
    let doc = json!({ "version": 1, "next_edge_id": u32::MAX - 1, "nodes": nodes, "edges": [] });
    let mut m = CampusMap::from_json_value(doc).unwrap();
    assert_eq!(m.add_road("J_a", "J_b"), Some(u32::MAX - 1));
    let version = m.version();
    assert_eq!(m.add_road("J_b", "J_c"), None);
    assert_eq!(m.edge_count(), 1);
    assert_eq!(m.version(), version);
    assert_eq!(m.edge(u32::MAX - 1).map(|e| e.from.as_str()), Some("J_a"));
}

#[test]
fn unsavable_coordinates_fail_before_writing() {
    let dir = tempdir().unwrap();
    let mut m = sample_map();
    m.add_junction(Vec2::new(f32::NAN, 0.0));
    assert!(matches!(m.to_json_value(), Err(Error::Invalid(_))));

    let path = dir.path().join("broken.map");
    assert!(matches!(m.save(&path), Err(Error::Invalid(_))));
    assert!(!path.exists());

    // an existing file is left alone
    sample_map().save(&path).unwrap();
    assert!(m.save(&path).is_err());
    assert_eq!(CampusMap::load(&path).unwrap().node_count(), 3);
}
