use serde::Serialize;

use crate::geometry::math::{distance_sq, seg_distance_sq};
use crate::geometry::polygon::contains_or_on_contour;
use crate::geometry::tolerance::Tolerances;
use crate::model::{Edge, Node, Vec2};
use crate::CampusMap;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Pick {
    Building { id: String },
    Node { id: String, dist: f32 },
    Edge { id: u32, t: f32, dist: f32 },
}

/// Nearest node strictly within `radius` of `p`.
pub fn find_node_at(map: &CampusMap, p: Vec2, radius: f32) -> Option<&Node> {
    let r2 = radius * radius;
    let mut best: Option<(&Node, f32)> = None;
    for n in map.nodes.values() {
        let d2 = distance_sq(n.position, p);
        if d2 < r2 && best.map_or(true, |(_, bd)| d2 < bd) {
            best = Some((n, d2));
        }
    }
    best.map(|(n, _)| n)
}

/// First building (id order) whose outline contains `p` or passes within `eps`.
pub fn find_building_at(map: &CampusMap, p: Vec2, eps: f32) -> Option<&Node> {
    map.nodes.values().find(|n| {
        n.shape()
            .map_or(false, |shape| contains_or_on_contour(shape, p, eps))
    })
}

/// Nearest road strictly within `eps`, with its projection parameter and distance.
pub fn find_edge_at(map: &CampusMap, p: Vec2, eps: f32) -> Option<(&Edge, f32, f32)> {
    let eps2 = eps * eps;
    let mut best: Option<(&Edge, f32, f32)> = None;
    for e in &map.edges {
        let (Some(a), Some(b)) = (map.nodes.get(&e.from), map.nodes.get(&e.to)) else {
            continue;
        };
        let (d2, t) = seg_distance_sq(p, a.position, b.position);
        if d2 < eps2 && best.map_or(true, |(_, _, bd)| d2 < bd) {
            best = Some((e, t, d2));
        }
    }
    best.map(|(e, t, d2)| (e, t, d2.sqrt()))
}

/// Whether a road point at `p` would land on or inside a building.
///
/// Points at a building's connection point are always allowed, so a road can
/// run right up to an entrance even when the entrance sits on another
/// building's outline.
pub fn is_blocked_by_building(map: &CampusMap, p: Vec2, tol: &Tolerances) -> bool {
    let at_entrance = map.nodes.values().any(|n| {
        n.connection_point().map_or(false, |c| {
            (c.x - p.x).abs() < tol.vertex_px && (c.y - p.y).abs() < tol.vertex_px
        })
    });
    !at_entrance && find_building_at(map, p, tol.edge_px).is_some()
}

/// Selection hit test: buildings first, then nodes, then roads.
pub fn pick_impl(map: &CampusMap, p: Vec2, tol: &Tolerances) -> Option<Pick> {
    if let Some(b) = find_building_at(map, p, tol.edge_px) {
        return Some(Pick::Building { id: b.id.clone() });
    }
    if let Some(n) = find_node_at(map, p, tol.node_px) {
        let dist = distance_sq(n.position, p).sqrt();
        return Some(Pick::Node { id: n.id.clone(), dist });
    }
    find_edge_at(map, p, tol.edge_px).map(|(e, t, dist)| Pick::Edge { id: e.id, t, dist })
}
