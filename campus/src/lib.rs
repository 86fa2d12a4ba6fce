pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod view;
pub mod geometry {
    pub mod limits;
    pub mod math;
    pub mod polygon;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod picking;
    pub mod route;
    pub mod winding;
}
mod json;

pub use algorithms::picking::Pick;
pub use editor::{EditingSession, Effect, Mode, Outcome, Rejection};
pub use error::{Error, Result};
pub use geometry::tolerance::Tolerances;
pub use json::{list_maps, with_map_extension, FORMAT_VERSION, MAP_EXTENSION};
pub use model::{Edge, Footprint, Node, Selection, ShapeKind, Vec2};
pub use view::Viewport;

use geometry::math::distance;
use log::{debug, warn};
use model::{building_id, JUNCTION_PREFIX};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Buildings, waypoints and the roads between them.
///
/// `edges` is the source of truth for ranking: after every structural
/// mutation it is stably sorted by length and each edge's rank is set to its
/// position. `adjacency` is a derived index (node id → neighbor id → edge id)
/// and `edge_slots` maps edge ids to positions in `edges`.
#[derive(Clone, Debug, Default)]
pub struct CampusMap {
    pub(crate) nodes: BTreeMap<String, Node>,
    pub(crate) adjacency: BTreeMap<String, BTreeMap<String, u32>>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) edge_slots: HashMap<u32, usize>,
    pub(crate) next_edge_id: u32,
    pub(crate) version: u64,
}

impl CampusMap {
    pub fn new() -> Self {
        CampusMap::default()
    }

    /// Monotonic version; increments on every successful mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    // Nodes
    /// Insert building `B_<name>`. An existing building with the same id is
    /// replaced; its roads stay attached.
    pub fn add_building(&mut self, name: &str, shape: Vec<Vec2>, connection: Vec2) -> String {
        let id = building_id(name);
        if self.nodes.contains_key(&id) {
            warn!("building {} already exists and is being overwritten", id);
        }
        self.nodes.insert(
            id.clone(),
            Node {
                id: id.clone(),
                position: connection,
                footprint: Some(Footprint { shape, connection }),
            },
        );
        self.adjacency.entry(id.clone()).or_default();
        debug!("added building {} at ({}, {})", id, connection.x, connection.y);
        self.bump();
        id
    }

    pub fn add_junction(&mut self, position: Vec2) -> String {
        let id = format!("{}{}", JUNCTION_PREFIX, uuid::Uuid::new_v4().simple());
        self.nodes.insert(
            id.clone(),
            Node {
                id: id.clone(),
                position,
                footprint: None,
            },
        );
        self.adjacency.entry(id.clone()).or_default();
        debug!("added junction {} at ({}, {})", id, position.x, position.y);
        self.bump();
        id
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn buildings(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.is_building())
    }

    /// Building names without the id prefix, sorted; what selection lists show.
    pub fn building_names(&self) -> Vec<String> {
        self.buildings()
            .filter_map(|n| n.building_name().map(str::to_string))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Remove a node and every road touching it. Unknown ids are a no-op.
    pub fn delete_node(&mut self, id: &str) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(id));
        self.adjacency.remove(id);
        for neighbors in self.adjacency.values_mut() {
            neighbors.remove(id);
        }
        self.nodes.remove(id);
        self.recompute_edge_weights();
        debug!("deleted node {} and {} incident roads", id, before - self.edges.len());
        self.bump();
        true
    }

    // Edges
    /// Connect two existing nodes. Returns the new edge id, the existing
    /// one if the pair is already connected, or `None` for unknown ids,
    /// self loops and an exhausted id counter.
    pub fn add_road(&mut self, from: &str, to: &str) -> Option<u32> {
        if from == to {
            return None;
        }
        let a = self.nodes.get(from)?.position;
        let b = self.nodes.get(to)?.position;
        if let Some(&existing) = self.adjacency.get(from).and_then(|n| n.get(to)) {
            return Some(existing);
        }
        let id = self.next_edge_id;
        let Some(next) = id.checked_add(1) else {
            warn!("edge ids exhausted, cannot connect {} and {}", from, to);
            return None;
        };
        self.next_edge_id = next;
        let length = distance(a, b);
        self.link(Edge {
            id,
            from: from.to_string(),
            to: to.to_string(),
            length,
            rank: 0,
        });
        self.recompute_edge_weights();
        debug!("added road {} between {} and {} (length {})", id, from, to, length);
        self.bump();
        Some(id)
    }

    fn link(&mut self, edge: Edge) {
        self.adjacency
            .entry(edge.from.clone())
            .or_default()
            .insert(edge.to.clone(), edge.id);
        self.adjacency
            .entry(edge.to.clone())
            .or_default()
            .insert(edge.from.clone(), edge.id);
        self.edges.push(edge);
    }

    pub fn delete_edge(&mut self, id: u32) -> bool {
        let Some(slot) = self.edge_slots.get(&id).copied() else {
            return false;
        };
        let edge = self.edges.remove(slot);
        if let Some(neighbors) = self.adjacency.get_mut(&edge.from) {
            neighbors.remove(&edge.to);
        }
        if let Some(neighbors) = self.adjacency.get_mut(&edge.to) {
            neighbors.remove(&edge.from);
        }
        self.recompute_edge_weights();
        debug!("deleted road {} between {} and {}", id, edge.from, edge.to);
        self.bump();
        true
    }

    pub fn edge(&self, id: u32) -> Option<&Edge> {
        self.edge_slots.get(&id).and_then(|&slot| self.edges.get(slot))
    }

    pub fn edge_between(&self, a: &str, b: &str) -> Option<&Edge> {
        let id = *self.adjacency.get(a)?.get(b)?;
        self.edge(id)
    }

    /// Flat edge list, ordered by rank.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Neighbors of `id` with the connecting edge, in id order.
    pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = (&'a str, &'a Edge)> + 'a {
        self.adjacency
            .get(id)
            .into_iter()
            .flat_map(|m| m.iter())
            .filter_map(move |(n, &eid)| self.edge(eid).map(|e| (n.as_str(), e)))
    }

    // Full re-rank: stable sort by length, rank = position.
    fn recompute_edge_weights(&mut self) {
        self.edges.sort_by(|a, b| a.length.total_cmp(&b.length));
        self.edge_slots.clear();
        for (i, e) in self.edges.iter_mut().enumerate() {
            e.rank = i;
            self.edge_slots.insert(e.id, i);
        }
    }

    // Routing
    /// Rank-weighted shortest path; empty when either id is unknown or the
    /// target is unreachable.
    pub fn find_shortest_path(&self, start: &str, end: &str) -> Vec<String> {
        algorithms::route::shortest_path(self, start, end)
    }

    /// Shortest path between two buildings given by display name.
    pub fn route_between_buildings(&self, start_name: &str, end_name: &str) -> Vec<String> {
        self.find_shortest_path(&building_id(start_name), &building_id(end_name))
    }

    // Picking
    pub fn pick(&self, p: Vec2, tol: &Tolerances) -> Option<Pick> {
        algorithms::picking::pick_impl(self, p, tol)
    }

    // JSON
    /// Fails when a coordinate could not be read back, e.g. NaN.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        json::to_json_impl(self)
    }
    pub fn from_json_value(v: serde_json::Value) -> Result<CampusMap> {
        json::from_json_impl(v)
    }

    // Files
    /// Write the map as a `.map` document; returns the path actually written.
    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        json::save_map_impl(self, path)
    }
    /// Read a map document into a fresh map.
    pub fn load(path: &Path) -> Result<CampusMap> {
        json::load_map_impl(path)
    }

    // Clear
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.adjacency.clear();
        self.edges.clear();
        self.edge_slots.clear();
        self.next_edge_id = 0;
        self.bump();
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
