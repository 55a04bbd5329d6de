use js_sys::JSON;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use pranav_playback_core::{
    parse_manifest, Catalog, Config, Inputs, ManifestKind, Outputs, PlayFailure, Session,
    SessionInput,
};

#[wasm_bindgen]
pub struct PranavSession {
    core: Session,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Stringify a JS object so the core JSON parsers can validate it.
fn stringify(what: &str, value: &JsValue) -> Result<String, JsError> {
    JSON::stringify(value)
        .map_err(|e| JsError::new(&format!("{what} stringify error: {:?}", e)))?
        .as_string()
        .ok_or_else(|| JsError::new(&format!("{what}: stringify produced non-string")))
}

fn parse_first_time(v: &JsValue) -> Option<bool> {
    if jsvalue_is_undefined_or_null(v) {
        None
    } else {
        v.as_bool()
    }
}

#[wasm_bindgen]
impl PranavSession {
    /// Create a session. Each argument may be undefined/null:
    ///   new PranavSession(config?, catalog?, isFirstTime?)
    /// An unknown visitor flag keeps the guidance track in the sequence.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: JsValue,
        catalog: JsValue,
        is_first_time: JsValue,
    ) -> Result<PranavSession, JsError> {
        #[cfg(feature = "console_error")]
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let catalog = if jsvalue_is_undefined_or_null(&catalog) {
            Catalog::default()
        } else {
            Catalog::from_json(&stringify("catalog", &catalog)?)
                .map_err(|e| JsError::new(&format!("catalog error: {e}")))?
        };
        let core = Session::new(cfg, catalog, parse_first_time(&is_first_time))
            .map_err(|e| JsError::new(&format!("session error: {e}")))?;
        Ok(PranavSession { core })
    }

    /// Session id (uuid string) for correlating host logs.
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> String {
        self.core.id().to_string()
    }

    /// Step the session by dt (seconds) with `{ events: [...] }`. Returns Outputs JSON.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f64, inputs_json: JsValue) -> Result<JsValue, JsError> {
        let inputs: Inputs = if jsvalue_is_undefined_or_null(&inputs_json) {
            Inputs::default()
        } else {
            swb::from_value(inputs_json).map_err(|e| JsError::new(&format!("inputs error: {e}")))?
        };
        let out: &Outputs = self.core.update(dt, inputs);
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Convenience wrapper: parse a fetched media manifest and feed it in as a
    /// `manifest_loaded` input. A malformed listing becomes `manifest_failed`
    /// so the session keeps running on whatever pool it already has.
    #[wasm_bindgen(js_name = load_manifest)]
    pub fn load_manifest(
        &mut self,
        kind: JsValue,
        manifest: JsValue,
    ) -> Result<JsValue, JsError> {
        let kind: ManifestKind =
            swb::from_value(kind).map_err(|e| JsError::new(&format!("manifest kind error: {e}")))?;
        let input = match parse_manifest(&stringify("manifest", &manifest)?) {
            Ok(manifest) => SessionInput::ManifestLoaded { kind, manifest },
            Err(e) => SessionInput::ManifestFailed {
                kind,
                reason: e.to_string(),
            },
        };
        let out: &Outputs = self.core.update(0.0, Inputs::one(input));
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    #[wasm_bindgen]
    pub fn playlist(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.playlist().items())
            .map_err(|e| JsError::new(&format!("playlist error: {e}")))
    }

    #[wasm_bindgen(js_name = active_item)]
    pub fn active_item(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.active_item())
            .map_err(|e| JsError::new(&format!("active item error: {e}")))
    }

    #[wasm_bindgen(js_name = transport_view)]
    pub fn transport_view(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.transport_view())
            .map_err(|e| JsError::new(&format!("transport view error: {e}")))
    }

    #[wasm_bindgen(js_name = library_entries)]
    pub fn library_entries(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.library_entries())
            .map_err(|e| JsError::new(&format!("library error: {e}")))
    }

    #[wasm_bindgen(js_name = intro_phase)]
    pub fn intro_phase(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.intro().phase())
            .map_err(|e| JsError::new(&format!("intro phase error: {e}")))
    }
}

/// Map a rejected `play()` DOMException name to the `failure` field of a
/// `play_failed` input.
#[wasm_bindgen]
pub fn classify_play_error(name: &str) -> Result<JsValue, JsError> {
    swb::to_value(&PlayFailure::from_dom_name(name))
        .map_err(|e| JsError::new(&format!("classify error: {e}")))
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
