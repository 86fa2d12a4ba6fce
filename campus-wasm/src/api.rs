use crate::Editor;
use crate::interop::{effect_js, new_obj, points_f32, selection_js, set_kv};
use campus::{CampusMap, Outcome, ShapeKind, Tolerances, Vec2};
use js_sys::Float32Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;
use crate::error;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn outcome(o: Outcome) -> JsValue {
    match o {
        Ok(effect) => error::ok(effect_js(&effect)),
        Err(r) => error::rejected(&r),
    }
}

fn finite(x: f32, y: f32) -> Result<Vec2, JsValue> {
    if !x.is_finite() {
        return Err(error::non_finite("x"));
    }
    if !y.is_finite() {
        return Err(error::non_finite("y"));
    }
    Ok(Vec2::new(x, y))
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Editor {
        crate::Editor::rs_new()
    }
    pub fn version(&self) -> u64 {
        self.rs_version()
    }

    // Workflows
    pub fn start_building_res(&mut self, name: &str, kind: &str) -> JsValue {
        let kind = match kind {
            "rectangle" => ShapeKind::Rectangle,
            "circle" => ShapeKind::Circle,
            other => return error::invalid_shape_kind(other),
        };
        outcome(self.session.start_building(name, kind))
    }
    pub fn start_road_res(&mut self) -> JsValue {
        outcome(self.session.start_road())
    }
    pub fn finish_building_res(&mut self) -> JsValue {
        outcome(self.session.finish_building())
    }
    pub fn cancel(&mut self) -> JsValue {
        effect_js(&self.session.cancel())
    }

    // Pointer gestures, device coordinates
    pub fn press_res(&mut self, x: f32, y: f32) -> JsValue {
        match finite(x, y) {
            Ok(p) => error::ok(effect_js(&self.session.press(p))),
            Err(e) => e,
        }
    }
    pub fn drag_res(&mut self, x: f32, y: f32) -> JsValue {
        match finite(x, y) {
            Ok(p) => error::ok(effect_js(&self.session.drag(p))),
            Err(e) => e,
        }
    }
    pub fn release_res(&mut self, x: f32, y: f32) -> JsValue {
        match finite(x, y) {
            Ok(p) => error::ok(effect_js(&self.session.release(p))),
            Err(e) => e,
        }
    }
    pub fn click_res(&mut self, x: f32, y: f32, count: u32) -> JsValue {
        match finite(x, y) {
            Ok(p) => outcome(self.session.click(&mut self.map, p, count)),
            Err(e) => e,
        }
    }

    // View
    pub fn scroll_res(&mut self, x: f32, y: f32, notches: i32) -> JsValue {
        match finite(x, y) {
            Ok(p) => error::ok(effect_js(&self.session.scroll(p, notches))),
            Err(e) => e,
        }
    }
    pub fn reset_zoom(&mut self) -> JsValue {
        effect_js(&self.session.reset_zoom())
    }
    pub fn viewport(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.session.viewport()).unwrap_or(JsValue::NULL)
    }
    pub fn set_edit_mode(&mut self, enabled: bool) {
        self.session.set_edit_mode(enabled)
    }
    pub fn is_edit_mode(&self) -> bool {
        self.session.is_edit_mode()
    }
    /// Pick radii in screen pixels; each must be positive.
    pub fn set_tolerances_res(&mut self, node_px: f32, edge_px: f32, vertex_px: f32) -> JsValue {
        for (name, v) in [("node_px", node_px), ("edge_px", edge_px), ("vertex_px", vertex_px)] {
            if !v.is_finite() {
                return error::non_finite(name);
            }
            if v <= 0.0 {
                return error::err("invalid_tolerance", format!("{} must be positive", name), None);
            }
        }
        self.session.set_tolerances(Tolerances { node_px, edge_px, vertex_px });
        error::ok(JsValue::from_bool(true))
    }

    // Commands
    pub fn delete_selected_res(&mut self) -> JsValue {
        outcome(self.session.delete_selected(&mut self.map))
    }
    pub fn find_route_res(&mut self, start: &str, end: &str) -> JsValue {
        match self.session.find_route(&self.map, start, end) {
            Ok(path) => error::ok(serde_wasm_bindgen::to_value(path).unwrap_or(JsValue::NULL)),
            Err(r) => error::rejected(&r),
        }
    }
    pub fn clear_route(&mut self) {
        self.session.clear_route()
    }
    pub fn can_delete(&self) -> bool {
        self.session.can_delete()
    }

    // Read state
    pub fn mode(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.session.mode()).unwrap_or(JsValue::NULL)
    }
    pub fn selection(&self) -> JsValue {
        selection_js(self.session.selection())
    }
    pub fn current_route(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.session.current_route()).unwrap_or(JsValue::NULL)
    }
    pub fn scratch_polygon(&self) -> Float32Array {
        points_f32(self.session.scratch_polygon())
    }
    pub fn scratch_path(&self) -> Float32Array {
        points_f32(self.session.scratch_path())
    }
    pub fn road_start(&self) -> Option<String> {
        self.session.road_start().map(str::to_string)
    }
    /// `{ x, y, radius }` while a circle is being dragged out.
    pub fn preview_circle(&self) -> JsValue {
        match self.session.preview_circle() {
            Some((c, r)) if self.session.shape_kind() == ShapeKind::Circle => {
                let o = new_obj();
                set_kv(&o, "x", &JsValue::from_f64(c.x as f64));
                set_kv(&o, "y", &JsValue::from_f64(c.y as f64));
                set_kv(&o, "radius", &JsValue::from_f64(r as f64));
                o.into()
            }
            _ => JsValue::NULL,
        }
    }
    pub fn preview(&self) -> JsValue {
        self.session
            .preview()
            .map_or(JsValue::NULL, |pts| points_f32(&pts).into())
    }
    pub fn building_names(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.map.building_names()).unwrap_or(JsValue::NULL)
    }
    pub fn node_count(&self) -> u32 {
        self.map.node_count() as u32
    }
    pub fn edge_count(&self) -> u32 {
        self.map.edge_count() as u32
    }

    /// `[{ id, x, y, building }]` in id order.
    pub fn nodes(&self) -> JsValue {
        let arr = js_sys::Array::new();
        for n in self.map.nodes() {
            let o = new_obj();
            set_kv(&o, "id", &JsValue::from_str(&n.id));
            set_kv(&o, "x", &JsValue::from_f64(n.position.x as f64));
            set_kv(&o, "y", &JsValue::from_f64(n.position.y as f64));
            set_kv(&o, "building", &JsValue::from_bool(n.is_building()));
            arr.push(&o);
        }
        arr.into()
    }
    /// `[{ id, from, to, length, rank }]` in rank order.
    pub fn edges(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.map.edges()).unwrap_or(JsValue::NULL)
    }
    pub fn building_shape_res(&self, id: &str) -> JsValue {
        match self.map.node(id).and_then(|n| n.shape()) {
            Some(shape) => error::ok(points_f32(shape).into()),
            None => error::invalid_id("building", id),
        }
    }

    // Persistence
    pub fn to_json_res(&self) -> JsValue {
        let doc = match self.map.to_json_value() {
            Ok(doc) => doc,
            Err(e) => return error::map_error(&e),
        };
        // plain objects rather than JS Maps, so JSON.stringify works on the result
        let ser = serde_wasm_bindgen::Serializer::json_compatible();
        match doc.serialize(&ser) {
            Ok(v) => error::ok(v),
            Err(e) => error::err("json", e.to_string(), None),
        }
    }
    pub fn from_json_res(&mut self, v: JsValue) -> JsValue {
        let val: serde_json::Value = match serde_wasm_bindgen::from_value(v) {
            Ok(val) => val,
            Err(e) => return error::err("json", e.to_string(), None),
        };
        match CampusMap::from_json_value(val) {
            Ok(map) => {
                self.map = map;
                self.session.reset_all();
                error::ok(JsValue::from_bool(true))
            }
            Err(e) => error::map_error(&e),
        }
    }
    pub fn clear(&mut self) {
        self.map.clear();
        self.session.reset_all();
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
