use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::geometry::limits;
use crate::model::{Edge, Footprint, Node, Vec2};
use crate::CampusMap;

pub const FORMAT_VERSION: u32 = 1;
pub const MAP_EXTENSION: &str = "map";

/// Encode the map. Anything the loader would refuse (non-finite or
/// out-of-range coordinates) fails here instead of producing an unreadable file.
pub fn to_json_impl(m: &CampusMap) -> Result<Value> {
    #[derive(Serialize)]
    struct NodeSer<'a> {
        id: &'a str,
        x: f32,
        y: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        shape: Option<&'a [Vec2]>,
        #[serde(skip_serializing_if = "Option::is_none")]
        connection: Option<Vec2>,
    }
    #[derive(Serialize)]
    struct EdgeSer<'a> {
        id: u32,
        from: &'a str,
        to: &'a str,
        length: f32,
    }
    #[derive(Serialize)]
    struct Doc<'a> {
        version: u32,
        next_edge_id: u32,
        nodes: Vec<NodeSer<'a>>,
        edges: Vec<EdgeSer<'a>>,
    }
    let in_bounds = |p: Vec2| limits::in_coord_bounds(p.x) && limits::in_coord_bounds(p.y);
    for n in m.nodes.values() {
        let shape_ok = n.shape().map_or(true, |s| s.iter().all(|&p| in_bounds(p)));
        if !in_bounds(n.position) || !shape_ok {
            return Err(Error::Invalid(format!("node {} has an unsavable coordinate", n.id)));
        }
    }
    let nodes = m
        .nodes
        .values()
        .map(|n| NodeSer {
            id: &n.id,
            x: n.position.x,
            y: n.position.y,
            shape: n.shape(),
            connection: n.connection_point(),
        })
        .collect();
    let edges = m
        .edges
        .iter()
        .map(|e| EdgeSer {
            id: e.id,
            from: &e.from,
            to: &e.to,
            length: e.length,
        })
        .collect();
    let doc = Doc {
        version: FORMAT_VERSION,
        next_edge_id: m.next_edge_id,
        nodes,
        edges,
    };
    Ok(serde_json::to_value(doc)?)
}

/// Decode and validate a map document into a fresh map.
///
/// Structural problems (bad version, ingest caps, half-specified buildings,
/// duplicate node ids) fail the whole load. Edges that cannot be attached
/// (missing endpoint, self loop, repeated pair or id) are dropped with a
/// warning so a partly damaged file still opens.
pub fn from_json_impl(v: Value) -> Result<CampusMap> {
    #[derive(Deserialize)]
    struct NodeDe {
        id: String,
        x: f32,
        y: f32,
        #[serde(default)]
        shape: Option<Vec<Vec2>>,
        #[serde(default)]
        connection: Option<Vec2>,
    }
    #[derive(Deserialize)]
    struct EdgeDe {
        id: u32,
        from: String,
        to: String,
        length: f32,
    }
    #[derive(Deserialize)]
    struct Doc {
        version: u32,
        #[serde(default)]
        next_edge_id: Option<u32>,
        #[serde(default)]
        nodes: Vec<NodeDe>,
        #[serde(default)]
        edges: Vec<EdgeDe>,
    }

    let doc: Doc = serde_json::from_value(v)?;
    if doc.version != FORMAT_VERSION {
        return Err(Error::Invalid(format!("unsupported version {}", doc.version)));
    }
    if doc.nodes.len() > limits::MAX_NODES {
        return Err(Error::Limit("too many nodes"));
    }
    if doc.edges.len() > limits::MAX_EDGES {
        return Err(Error::Limit("too many edges"));
    }
    // u32::MAX is never handed out, the counter would have nowhere to go
    if doc.next_edge_id == Some(u32::MAX) || doc.edges.iter().any(|e| e.id == u32::MAX) {
        return Err(Error::Limit("edge id out of range"));
    }

    let mut m = CampusMap::new();
    let mut shape_total = 0usize;
    for n in doc.nodes {
        if n.id.is_empty() || n.id.len() > limits::MAX_ID_LEN {
            return Err(Error::Invalid(format!("bad node id {:?}", n.id)));
        }
        if !limits::in_coord_bounds(n.x) || !limits::in_coord_bounds(n.y) {
            return Err(Error::Limit("node coordinate out of bounds"));
        }
        let footprint = match (n.shape, n.connection) {
            (Some(shape), Some(connection)) => {
                if shape.len() > limits::MAX_SHAPE_VERTICES {
                    return Err(Error::Limit("too many vertices in one shape"));
                }
                shape_total += shape.len();
                if shape_total > limits::MAX_SHAPE_VERTICES_TOTAL {
                    return Err(Error::Limit("too many shape vertices"));
                }
                let in_bounds = |p: &Vec2| limits::in_coord_bounds(p.x) && limits::in_coord_bounds(p.y);
                if !shape.iter().all(in_bounds) || !in_bounds(&connection) {
                    return Err(Error::Limit("shape coordinate out of bounds"));
                }
                Some(Footprint { shape, connection })
            }
            (None, None) => None,
            _ => {
                return Err(Error::Invalid(format!(
                    "node {} has only one of shape and connection",
                    n.id
                )))
            }
        };
        if m.nodes.contains_key(&n.id) {
            return Err(Error::Invalid(format!("duplicate node id {}", n.id)));
        }
        // buildings sit at their connection point
        let position = footprint
            .as_ref()
            .map_or(Vec2::new(n.x, n.y), |f| f.connection);
        m.adjacency.entry(n.id.clone()).or_default();
        m.nodes.insert(
            n.id.clone(),
            Node {
                id: n.id,
                position,
                footprint,
            },
        );
    }

    let mut seen_ids = HashSet::new();
    let mut skipped = 0usize;
    let mut max_id = None;
    for e in doc.edges {
        if !limits::valid_length(e.length) {
            return Err(Error::Invalid(format!("edge {} has invalid length", e.id)));
        }
        let attachable = e.from != e.to
            && m.nodes.contains_key(&e.from)
            && m.nodes.contains_key(&e.to)
            && !m.adjacency.get(&e.from).map_or(false, |n| n.contains_key(&e.to))
            && seen_ids.insert(e.id);
        if !attachable {
            skipped += 1;
            continue;
        }
        max_id = max_id.max(Some(e.id));
        m.link(Edge {
            id: e.id,
            from: e.from,
            to: e.to,
            length: e.length,
            rank: 0,
        });
    }
    if skipped > 0 {
        warn!("skipped {} unattachable edges while loading map", skipped);
    }
    let after_max = max_id.map_or(0, |id: u32| id.saturating_add(1));
    m.next_edge_id = doc.next_edge_id.unwrap_or(0).max(after_max);
    m.recompute_edge_weights();
    Ok(m)
}

/// `path` with `.map` appended unless it already ends in it.
pub fn with_map_extension(path: &Path) -> PathBuf {
    if path.extension().map_or(false, |ext| ext == MAP_EXTENSION) {
        return path.to_path_buf();
    }
    let mut s = path.as_os_str().to_owned();
    s.push(".");
    s.push(MAP_EXTENSION);
    PathBuf::from(s)
}

pub fn save_map_impl(m: &CampusMap, path: &Path) -> Result<PathBuf> {
    let path = with_map_extension(path);
    let doc = to_json_impl(m)?;
    let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, &doc)?;
    w.flush().map_err(|e| Error::io(&path, e))?;
    info!(
        "saved map with {} nodes and {} roads to {}",
        m.node_count(),
        m.edge_count(),
        path.display()
    );
    Ok(path)
}

pub fn load_map_impl(path: &Path) -> Result<CampusMap> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let v: Value = serde_json::from_reader(BufReader::new(file))?;
    let m = from_json_impl(v)?;
    info!(
        "loaded map with {} nodes and {} roads from {}",
        m.node_count(),
        m.edge_count(),
        path.display()
    );
    Ok(m)
}

/// Sorted file stems of the `.map` files directly inside `dir`.
pub fn list_maps(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != MAP_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}
