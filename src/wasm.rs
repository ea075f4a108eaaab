use crate::types::{GraphSnapshot, LayoutParams};
use crate::view::{View, ViewKind};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn wasm_init() {
    console_error_panic_hook::set_once();
}

/// One visualization instance held by the host widget. All payloads cross
/// the boundary as JSON strings.
#[wasm_bindgen]
pub struct WasmView {
    inner: View,
}

#[wasm_bindgen]
impl WasmView {
    #[wasm_bindgen(constructor)]
    pub fn new(kind: &str, snapshot_json: &str) -> Result<WasmView, JsValue> {
        let kind = ViewKind::parse(kind)
            .ok_or_else(|| JsValue::from_str(&format!("unknown view kind: {kind}")))?;
        let snapshot: GraphSnapshot = serde_json::from_str(snapshot_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid snapshot JSON: {e}")))?;
        let inner = View::new(kind, snapshot).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmView { inner })
    }

    /// Lays out (first call) or rescales (resize) and returns render props.
    pub fn render(&mut self, width: f64, height: f64) -> Result<String, JsValue> {
        self.inner.render(LayoutParams::new(width, height));
        self.props()
    }

    /// Feeds one controller message in; returns the outbound events it
    /// produced, drained as a JSON array.
    pub fn process_message(&mut self, message_json: &str) -> Result<String, JsValue> {
        self.inner
            .process_message(message_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.outbound()
    }

    /// Answers a pending domain split; pass `null` for "use default split".
    pub fn resolve_split(&mut self, choice_json: &str) -> Result<String, JsValue> {
        let choice: Option<Vec<String>> = serde_json::from_str(choice_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid choice JSON: {e}")))?;
        self.inner
            .resolve_split(choice)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.outbound()
    }

    /// The domain offered by an unanswered split request, or `null`.
    pub fn pending_split(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.pending_split())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn click(&mut self, id: &str) -> Result<String, JsValue> {
        self.inner
            .click(id)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.outbound()
    }

    pub fn fine_step(&mut self) -> Result<String, JsValue> {
        self.inner.fine_step();
        self.outbound()
    }

    pub fn step(&mut self) -> Result<String, JsValue> {
        self.inner.step();
        self.outbound()
    }

    pub fn auto_step(&mut self) -> Result<String, JsValue> {
        self.inner.auto_step();
        self.outbound()
    }

    pub fn props(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.render_props())
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize props: {e}")))
    }

    pub fn status(&self) -> String {
        self.inner.status().to_string()
    }

    pub fn reset(&mut self, snapshot_json: &str) -> Result<(), JsValue> {
        let snapshot: GraphSnapshot = serde_json::from_str(snapshot_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid snapshot JSON: {e}")))?;
        self.inner
            .reset(snapshot)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    fn outbound(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.take_outbound())
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize events: {e}")))
    }
}

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
