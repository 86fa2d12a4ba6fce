use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

/// A campus map plus the editing session driving it from the browser.
#[wasm_bindgen]
pub struct Editor {
    pub(crate) map: campus::CampusMap,
    pub(crate) session: campus::EditingSession,
}

impl Editor {
    pub fn rs_new() -> Editor {
        Editor { map: campus::CampusMap::new(), session: campus::EditingSession::default() }
    }
    pub fn rs_version(&self) -> u64 { self.map.version() }
}
