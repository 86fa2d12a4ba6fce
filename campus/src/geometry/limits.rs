// Centralized ingestion limits to harden against untrusted map files

// Scene size caps
pub const MAX_NODES: usize = 200_000;
pub const MAX_EDGES: usize = 300_000;

// Building outlines
pub const MAX_SHAPE_VERTICES: usize = 8_000;
pub const MAX_SHAPE_VERTICES_TOTAL: usize = 2_000_000;

// Building names end up in ids and selection lists
pub const MAX_ID_LEN: usize = 256;

// Numeric bounds
pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 =  10_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn valid_length(l: f32) -> bool { l.is_finite() && l >= 0.0 }
