//! Interactive editing state machine.
//!
//! An [`EditingSession`] turns pointer gestures in device space into graph
//! mutations. It owns only ephemeral state (mode, scratch geometry, selection,
//! the highlighted route, the viewport) and borrows the [`CampusMap`] for the
//! duration of each gesture.
//!
//! Every gesture returns `Result<Effect, Rejection>`. A rejection carries the
//! message to show the user and leaves both the session and the map as they
//! were.

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::algorithms::picking::{find_node_at, is_blocked_by_building, Pick};
use crate::geometry::math::distance;
use crate::geometry::polygon::{
    approximate_polygon, insert_vertex, is_on_contour, pick_segment, pick_vertex,
    rectangle_from_corners, CIRCLE_SEGMENTS,
};
use crate::geometry::tolerance::Tolerances;
use crate::model::{Selection, ShapeKind, Vec2};
use crate::view::Viewport;
use crate::CampusMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Idle,
    DrawingBuildingShape,
    EditingBuildingVertices,
    SelectingConnectionPoint,
    DrawingRoad,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Enter a building name!")]
    EmptyName,
    #[error("Complete the shape first!")]
    ShapeIncomplete,
    #[error("Please click on the building contour!")]
    OffContour,
    #[error("Click on a building entry point or junction!")]
    NoRoadStart,
    #[error("Cannot place road point on or inside a building!")]
    InsideBuilding,
    #[error("Cannot end road on or inside a building!")]
    EndInsideBuilding,
    #[error("Select a different point to end the road!")]
    SameEndpoint,
    #[error("Select a building, junction or road first!")]
    NothingSelected,
    #[error("No path found between the selected buildings!")]
    NoRoute,
}

impl Rejection {
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::EmptyName => "empty_name",
            Rejection::ShapeIncomplete => "shape_incomplete",
            Rejection::OffContour => "off_contour",
            Rejection::NoRoadStart => "no_road_start",
            Rejection::InsideBuilding => "inside_building",
            Rejection::EndInsideBuilding => "end_inside_building",
            Rejection::SameEndpoint => "same_endpoint",
            Rejection::NothingSelected => "nothing_selected",
            Rejection::NoRoute => "no_route",
        }
    }
}

/// What a gesture changed, for the renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Nothing happened (edit mode off, or the gesture means nothing here).
    Ignored,
    /// Session state the renderer draws changed; the map did not.
    Redraw,
    /// The primitive was materialized and its vertices are now editable.
    ShapeReady,
    BuildingAdded(String),
    RoadStarted(String),
    /// A junction was placed and the road continues from it.
    RoadExtended { edge: Option<u32>, waypoint: String },
    RoadFinished { edge: Option<u32>, end: String },
    Selected(Selection),
    Deleted(Selection),
}

pub type Outcome = Result<Effect, Rejection>;

#[derive(Clone, Debug)]
pub struct EditingSession {
    mode: Mode,
    edit_enabled: bool,
    building_name: String,
    shape_kind: ShapeKind,
    anchor: Option<Vec2>,
    pointer: Option<Vec2>,
    scratch_polygon: Vec<Vec2>,
    scratch_path: Vec<Vec2>,
    road_start: Option<String>,
    dragging_vertex: Option<usize>,
    selection: Selection,
    current_route: Vec<String>,
    viewport: Viewport,
    tolerances: Tolerances,
}

impl Default for EditingSession {
    fn default() -> Self {
        EditingSession::new(Tolerances::default())
    }
}

impl EditingSession {
    pub fn new(tolerances: Tolerances) -> Self {
        EditingSession {
            mode: Mode::Idle,
            edit_enabled: true,
            building_name: String::new(),
            shape_kind: ShapeKind::Rectangle,
            anchor: None,
            pointer: None,
            scratch_polygon: Vec::new(),
            scratch_path: Vec::new(),
            road_start: None,
            dragging_vertex: None,
            selection: Selection::None,
            current_route: Vec::new(),
            viewport: Viewport::default(),
            tolerances,
        }
    }

    // Workflow state is discarded; route, viewport and edit mode survive.
    fn reset(&mut self) {
        self.mode = Mode::Idle;
        self.building_name.clear();
        self.shape_kind = ShapeKind::Rectangle;
        self.anchor = None;
        self.pointer = None;
        self.scratch_polygon.clear();
        self.scratch_path.clear();
        self.road_start = None;
        self.dragging_vertex = None;
        self.selection = Selection::None;
    }

    fn enter(&mut self, mode: Mode) {
        debug!("editor: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    /// Forget everything tied to the current map, e.g. after loading another one.
    pub fn reset_all(&mut self) {
        self.reset();
        self.current_route.clear();
    }

    fn model_point(&self, device: Vec2) -> Vec2 {
        self.viewport.to_model(device)
    }

    fn tol(&self) -> Tolerances {
        self.viewport.tolerances(&self.tolerances)
    }

    // Workflows
    pub fn start_building(&mut self, name: &str, kind: ShapeKind) -> Outcome {
        if !self.edit_enabled {
            return Ok(Effect::Ignored);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(Rejection::EmptyName);
        }
        self.reset();
        self.building_name = name.to_string();
        self.shape_kind = kind;
        self.enter(Mode::DrawingBuildingShape);
        Ok(Effect::Redraw)
    }

    pub fn start_road(&mut self) -> Outcome {
        if !self.edit_enabled {
            return Ok(Effect::Ignored);
        }
        self.reset();
        self.enter(Mode::DrawingRoad);
        Ok(Effect::Redraw)
    }

    pub fn finish_building(&mut self) -> Outcome {
        if self.mode != Mode::EditingBuildingVertices || self.scratch_polygon.is_empty() {
            return Err(Rejection::ShapeIncomplete);
        }
        self.dragging_vertex = None;
        self.enter(Mode::SelectingConnectionPoint);
        Ok(Effect::Redraw)
    }

    pub fn cancel(&mut self) -> Effect {
        if self.mode == Mode::Idle && self.selection.is_none() {
            return Effect::Ignored;
        }
        self.reset();
        debug!("editor: cancelled");
        Effect::Redraw
    }

    // Pointer gestures
    pub fn press(&mut self, device: Vec2) -> Effect {
        if !self.edit_enabled {
            return Effect::Ignored;
        }
        let p = self.model_point(device);
        match self.mode {
            Mode::DrawingBuildingShape => {
                self.anchor = Some(p);
                self.pointer = Some(p);
                Effect::Redraw
            }
            Mode::EditingBuildingVertices => {
                self.dragging_vertex = pick_vertex(&self.scratch_polygon, p, self.tol().vertex_px);
                if self.dragging_vertex.is_some() {
                    Effect::Redraw
                } else {
                    Effect::Ignored
                }
            }
            _ => Effect::Ignored,
        }
    }

    pub fn drag(&mut self, device: Vec2) -> Effect {
        if !self.edit_enabled {
            return Effect::Ignored;
        }
        let p = self.model_point(device);
        match self.mode {
            Mode::DrawingBuildingShape if self.anchor.is_some() => {
                self.pointer = Some(p);
                Effect::Redraw
            }
            Mode::EditingBuildingVertices => {
                match self.dragging_vertex.and_then(|i| self.scratch_polygon.get_mut(i)) {
                    Some(v) => {
                        *v = p;
                        Effect::Redraw
                    }
                    None => Effect::Ignored,
                }
            }
            _ => Effect::Ignored,
        }
    }

    pub fn release(&mut self, device: Vec2) -> Effect {
        if !self.edit_enabled {
            return Effect::Ignored;
        }
        let p = self.model_point(device);
        match (self.mode, self.anchor) {
            (Mode::DrawingBuildingShape, Some(anchor)) => {
                self.scratch_polygon = primitive(self.shape_kind, anchor, p);
                self.anchor = None;
                self.pointer = None;
                self.enter(Mode::EditingBuildingVertices);
                Effect::ShapeReady
            }
            (Mode::EditingBuildingVertices, _) if self.dragging_vertex.is_some() => {
                self.dragging_vertex = None;
                Effect::Redraw
            }
            _ => Effect::Ignored,
        }
    }

    /// A click; `count` is 2 for a double click, which arrives on its own
    /// rather than after a single click at the same point.
    pub fn click(&mut self, map: &mut CampusMap, device: Vec2, count: u32) -> Outcome {
        if !self.edit_enabled {
            return Ok(Effect::Ignored);
        }
        let p = self.model_point(device);
        match self.mode {
            Mode::Idle => Ok(self.select(map, p)),
            Mode::DrawingBuildingShape => Ok(Effect::Ignored),
            Mode::EditingBuildingVertices if count >= 2 => Ok(self.split_segment(p)),
            Mode::EditingBuildingVertices => Ok(Effect::Ignored),
            Mode::SelectingConnectionPoint => self.place_connection(map, p),
            Mode::DrawingRoad => match self.road_start.clone() {
                None => self.begin_road(map, p),
                Some(start) if count >= 2 => self.finish_road(map, &start, p),
                Some(start) => self.extend_road(map, &start, p),
            },
        }
    }

    fn split_segment(&mut self, p: Vec2) -> Effect {
        let eps = self.tol().edge_px;
        match pick_segment(&self.scratch_polygon, p, eps) {
            Some(seg) if insert_vertex(&mut self.scratch_polygon, seg, p) => Effect::Redraw,
            _ => Effect::Ignored,
        }
    }

    fn place_connection(&mut self, map: &mut CampusMap, p: Vec2) -> Outcome {
        if !is_on_contour(&self.scratch_polygon, p, self.tol().edge_px) {
            return Err(Rejection::OffContour);
        }
        let shape = std::mem::take(&mut self.scratch_polygon);
        let id = map.add_building(&self.building_name, shape, p);
        self.enter(Mode::Idle);
        self.reset();
        Ok(Effect::BuildingAdded(id))
    }

    fn begin_road(&mut self, map: &CampusMap, p: Vec2) -> Outcome {
        let node = find_node_at(map, p, self.tol().node_px).ok_or(Rejection::NoRoadStart)?;
        self.scratch_path = vec![node.position];
        self.road_start = Some(node.id.clone());
        debug!("editor: road starts at {}", node.id);
        Ok(Effect::RoadStarted(node.id.clone()))
    }

    fn extend_road(&mut self, map: &mut CampusMap, start: &str, p: Vec2) -> Outcome {
        let tol = self.tol();
        let target = find_node_at(map, p, tol.node_px)
            .filter(|n| n.id != start)
            .map(|n| n.id.clone());
        if let Some(end) = target {
            let edge = map.add_road(start, &end);
            self.reset();
            return Ok(Effect::RoadFinished { edge, end });
        }
        if is_blocked_by_building(map, p, &tol) {
            return Err(Rejection::InsideBuilding);
        }
        let waypoint = map.add_junction(p);
        let edge = map.add_road(start, &waypoint);
        self.scratch_path.push(p);
        self.road_start = Some(waypoint.clone());
        Ok(Effect::RoadExtended { edge, waypoint })
    }

    fn finish_road(&mut self, map: &mut CampusMap, start: &str, p: Vec2) -> Outcome {
        let tol = self.tol();
        let hit = find_node_at(map, p, tol.node_px).map(|n| n.id.clone());
        let end = match hit {
            Some(id) if id == start => return Err(Rejection::SameEndpoint),
            Some(id) => id,
            None if is_blocked_by_building(map, p, &tol) => {
                return Err(Rejection::EndInsideBuilding)
            }
            None => map.add_junction(p),
        };
        let edge = map.add_road(start, &end);
        self.reset();
        Ok(Effect::RoadFinished { edge, end })
    }

    fn select(&mut self, map: &CampusMap, p: Vec2) -> Effect {
        self.current_route.clear();
        self.selection = match map.pick(p, &self.tol()) {
            Some(Pick::Building { id }) | Some(Pick::Node { id, .. }) => Selection::Node(id),
            Some(Pick::Edge { id, .. }) => Selection::Edge(id),
            None => Selection::None,
        };
        Effect::Selected(self.selection.clone())
    }

    // Commands
    pub fn delete_selected(&mut self, map: &mut CampusMap) -> Outcome {
        match &self.selection {
            Selection::None => return Err(Rejection::NothingSelected),
            Selection::Node(id) => {
                map.delete_node(id);
            }
            Selection::Edge(id) => {
                map.delete_edge(*id);
            }
        }
        self.current_route.clear();
        Ok(Effect::Deleted(std::mem::take(&mut self.selection)))
    }

    /// Route between two buildings by display name; the result stays
    /// highlighted until the next selection or deletion.
    pub fn find_route(&mut self, map: &CampusMap, start_name: &str, end_name: &str) -> Result<&[String], Rejection> {
        self.current_route = map.route_between_buildings(start_name, end_name);
        if self.current_route.is_empty() {
            return Err(Rejection::NoRoute);
        }
        Ok(&self.current_route)
    }

    pub fn clear_route(&mut self) {
        self.current_route.clear();
    }

    // View
    pub fn scroll(&mut self, device: Vec2, notches: i32) -> Effect {
        if self.viewport.zoom_at(device, notches) {
            Effect::Redraw
        } else {
            Effect::Ignored
        }
    }

    pub fn reset_zoom(&mut self) -> Effect {
        if !self.viewport.is_zoomed() {
            return Effect::Ignored;
        }
        self.viewport.reset();
        Effect::Redraw
    }

    pub fn set_edit_mode(&mut self, enabled: bool) {
        if !enabled {
            self.reset();
        }
        self.edit_enabled = enabled;
    }

    pub fn set_tolerances(&mut self, tolerances: Tolerances) {
        self.tolerances = tolerances;
    }

    // Read state
    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn is_edit_mode(&self) -> bool {
        self.edit_enabled
    }
    pub fn selection(&self) -> &Selection {
        &self.selection
    }
    pub fn current_route(&self) -> &[String] {
        &self.current_route
    }
    pub fn scratch_polygon(&self) -> &[Vec2] {
        &self.scratch_polygon
    }
    pub fn scratch_path(&self) -> &[Vec2] {
        &self.scratch_path
    }
    pub fn road_start(&self) -> Option<&str> {
        self.road_start.as_deref()
    }
    pub fn building_name(&self) -> &str {
        &self.building_name
    }
    pub fn shape_kind(&self) -> ShapeKind {
        self.shape_kind
    }
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }
    pub fn can_delete(&self) -> bool {
        self.edit_enabled && !self.selection.is_none()
    }

    /// Anchor and radius of the primitive being dragged out.
    pub fn preview_circle(&self) -> Option<(Vec2, f32)> {
        match (self.mode, self.anchor, self.pointer) {
            (Mode::DrawingBuildingShape, Some(a), Some(p)) => Some((a, distance(a, p))),
            _ => None,
        }
    }

    /// Outline the current press-drag would produce on release.
    pub fn preview(&self) -> Option<Vec<Vec2>> {
        match (self.mode, self.anchor, self.pointer) {
            (Mode::DrawingBuildingShape, Some(a), Some(p)) => Some(primitive(self.shape_kind, a, p)),
            _ => None,
        }
    }
}

fn primitive(kind: ShapeKind, anchor: Vec2, pointer: Vec2) -> Vec<Vec2> {
    match kind {
        ShapeKind::Rectangle => rectangle_from_corners(anchor, pointer),
        ShapeKind::Circle => approximate_polygon(anchor, distance(anchor, pointer), CIRCLE_SEGMENTS),
    }
}
