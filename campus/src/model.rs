use serde::{Deserialize, Serialize};

pub const BUILDING_PREFIX: &str = "B_";
pub const JUNCTION_PREFIX: &str = "J_";

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Vec2 { x, y }
    }
}

/// Outline of a building plus the single contour point roads attach to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub shape: Vec<Vec2>,
    pub connection: Vec2,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub position: Vec2,
    pub footprint: Option<Footprint>,
}

impl Node {
    pub fn is_building(&self) -> bool {
        self.footprint.is_some()
    }

    pub fn shape(&self) -> Option<&[Vec2]> {
        self.footprint.as_ref().map(|f| f.shape.as_slice())
    }

    pub fn connection_point(&self) -> Option<Vec2> {
        self.footprint.as_ref().map(|f| f.connection)
    }

    /// Building name without the id prefix; `None` for waypoints.
    pub fn building_name(&self) -> Option<&str> {
        if self.is_building() {
            self.id.strip_prefix(BUILDING_PREFIX)
        } else {
            None
        }
    }
}

pub fn building_id(name: &str) -> String {
    format!("{}{}", BUILDING_PREFIX, name)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: u32,
    pub from: String,
    pub to: String,
    pub length: f32,
    pub rank: usize,
}

impl Edge {
    pub fn touches(&self, node: &str) -> bool {
        self.from == node || self.to == node
    }

    /// The endpoint across from `node`, if `node` is one of the endpoints.
    pub fn other(&self, node: &str) -> Option<&str> {
        if self.from == node {
            Some(&self.to)
        } else if self.to == node {
            Some(&self.from)
        } else {
            None
        }
    }
}

/// What the user currently has selected for deletion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Selection {
    #[default]
    None,
    Node(String),
    Edge(u32),
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
}
