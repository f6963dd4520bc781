//! Address bar access for the shareable playback parameters.

use shared::QueryStore;
use wasm_bindgen::JsValue;
use web_sys::UrlSearchParams;

/// [`QueryStore`] backed by `window.location` and `window.history`.
///
/// Writes replace the current history entry, so playback does not flood the
/// back button with one entry per year.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserQueryStore;

impl QueryStore for BrowserQueryStore {
    fn read_param(&self, name: &str) -> Option<String> {
        let search = web_sys::window()?.location().search().ok()?;
        UrlSearchParams::new_with_str(&search).ok()?.get(name)
    }

    fn write_param(&mut self, name: &str, value: &str) {
        if let Err(error) = replace_param(name, value) {
            zoon::eprintln!("Failed to write '{}={}' to the address bar: {:?}", name, value, error);
        }
    }
}

fn replace_param(name: &str, value: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is not available"))?;
    let location = window.location();

    let params = UrlSearchParams::new_with_str(&location.search()?)?;
    params.set(name, value);
    let query = String::from(params.to_string());

    let url = if query.is_empty() {
        format!("{}{}", location.pathname()?, location.hash()?)
    } else {
        format!("{}?{}{}", location.pathname()?, query, location.hash()?)
    };
    window
        .history()?
        .replace_state_with_url(&JsValue::NULL, "", Some(&url))
}
