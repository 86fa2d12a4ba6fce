use campus::{Effect, Selection, Vec2};
use js_sys::{Float32Array, Object, Reflect};
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_f32(slice: &[f32]) -> Float32Array {
    let arr = Float32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}

/// Points as a flat `[x0, y0, x1, y1, ...]` array.
pub fn points_f32(points: &[Vec2]) -> Float32Array {
    let flat: Vec<f32> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    arr_f32(&flat)
}

pub fn selection_js(sel: &Selection) -> JsValue {
    serde_wasm_bindgen::to_value(sel).unwrap_or(JsValue::NULL)
}

fn edge_js(edge: Option<u32>) -> JsValue {
    edge.map_or(JsValue::NULL, |e| JsValue::from_f64(e as f64))
}

/// `{ kind, ... }` object describing what a gesture did.
pub fn effect_js(effect: &Effect) -> JsValue {
    let o = new_obj();
    let kind = match effect {
        Effect::Ignored => "ignored",
        Effect::Redraw => "redraw",
        Effect::ShapeReady => "shape_ready",
        Effect::BuildingAdded(id) => {
            set_kv(&o, "id", &JsValue::from_str(id));
            "building_added"
        }
        Effect::RoadStarted(id) => {
            set_kv(&o, "id", &JsValue::from_str(id));
            "road_started"
        }
        Effect::RoadExtended { edge, waypoint } => {
            set_kv(&o, "edge", &edge_js(*edge));
            set_kv(&o, "id", &JsValue::from_str(waypoint));
            "road_extended"
        }
        Effect::RoadFinished { edge, end } => {
            set_kv(&o, "edge", &edge_js(*edge));
            set_kv(&o, "id", &JsValue::from_str(end));
            "road_finished"
        }
        Effect::Selected(sel) => {
            set_kv(&o, "selection", &selection_js(sel));
            "selected"
        }
        Effect::Deleted(sel) => {
            set_kv(&o, "selection", &selection_js(sel));
            "deleted"
        }
    };
    set_kv(&o, "kind", &JsValue::from_str(kind));
    o.into()
}
