//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger setup
//! - Wall-clock time and run seeds
//! - Locating the drawing surface

use crate::GameError;
use crate::sim::Playfield;

/// Install the platform's log backend
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
}

/// Install the platform's log backend
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    // Ignore a second init from tests or embedding hosts
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Milliseconds since an arbitrary epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since an arbitrary epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Seed for a new world
pub fn time_seed() -> u64 {
    now_ms() as u64
}

/// Size of the canvas with the given element id
#[cfg(target_arch = "wasm32")]
pub fn canvas_playfield(id: &str) -> Result<Playfield, GameError> {
    use wasm_bindgen::JsCast;
    use web_sys::HtmlCanvasElement;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| GameError::MissingElement("document".to_string()))?;
    let canvas = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or_else(|| GameError::MissingCanvas(id.to_string()))?;
    Playfield::new(canvas.width() as f32, canvas.height() as f32)
}

/// Stretch the canvas over the window and return its new size
#[cfg(target_arch = "wasm32")]
pub fn fit_canvas(id: &str) -> Result<Playfield, GameError> {
    use wasm_bindgen::JsCast;
    use web_sys::HtmlCanvasElement;

    let window = web_sys::window().ok_or_else(|| GameError::MissingElement("window".to_string()))?;
    let canvas = window
        .document()
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or_else(|| GameError::MissingCanvas(id.to_string()))?;
    let size = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32
    };
    canvas.set_width(size(window.inner_width()));
    canvas.set_height(size(window.inner_height()));
    Playfield::new(canvas.width() as f32, canvas.height() as f32)
}

/// Fail with the first element id missing from the page
#[cfg(target_arch = "wasm32")]
pub fn require_elements(ids: &[&str]) -> Result<(), GameError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| GameError::MissingElement("document".to_string()))?;
    let missing: Vec<&str> = ids
        .iter()
        .copied()
        .filter(|id| document.get_element_by_id(id).is_none())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        for id in &missing {
            log::error!("Missing UI element: {}", id);
        }
        Err(GameError::MissingElement(missing.join(", ")))
    }
}

/// Headless builds have no page to check
#[cfg(not(target_arch = "wasm32"))]
pub fn require_elements(_ids: &[&str]) -> Result<(), GameError> {
    Ok(())
}

/// Headless builds draw into a fixed virtual canvas
#[cfg(not(target_arch = "wasm32"))]
pub fn canvas_playfield(_id: &str) -> Result<Playfield, GameError> {
    Ok(Playfield::default())
}
