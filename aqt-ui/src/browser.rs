//! Thin wrappers over the browser: query string, history, localStorage,
//! file downloads and the current time.
//!
//! Every call is best-effort. A missing `window` or a storage quota error is
//! logged and otherwise ignored, never surfaced to the page.

use aqt_core::store::KeyValueStore;
use log::warn;
use wasm_bindgen::JsValue;

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('tracking JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

pub fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

/// Current `location.search`, including the leading `?` when present.
pub fn location_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// Rewrite the query string in place without adding a history entry.
pub fn replace_query(query: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let path = window.location().pathname().unwrap_or_default();
    let url = if query.is_empty() {
        path
    } else {
        format!("{path}?{query}")
    };
    let result = window
        .history()
        .and_then(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(&url)));
    if let Err(e) = result {
        warn!("history.replaceState failed: {:?}", e);
    }
}

/// `window.localStorage` as a [`KeyValueStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.set_item(key, value) {
                warn!("localStorage.setItem({}) failed: {:?}", key, e);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.remove_item(key) {
                warn!("localStorage.removeItem({}) failed: {:?}", key, e);
            }
        }
    }
}

/// Offer `body` to the user as a file download.
pub fn download_text(file_name: &str, mime: &str, body: &str) {
    call_js(&download_script(file_name, mime, body));
}

fn download_script(file_name: &str, mime: &str, body: &str) -> String {
    let quote = |s: &str| serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        r#"(function() {{
            var blob = new Blob([{body}], {{ type: {mime} }});
            var url = URL.createObjectURL(blob);
            var a = document.createElement('a');
            a.href = url;
            a.download = {name};
            document.body.appendChild(a);
            a.click();
            document.body.removeChild(a);
            URL.revokeObjectURL(url);
        }})();"#,
        body = quote(body),
        mime = quote(mime),
        name = quote(file_name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_script_quotes_payload() {
        let script = download_script("a.csv", "text/csv", "label,\"x\"\n'1',2");
        assert!(script.contains(r#"new Blob(["label,\"x\"\n'1',2"]"#));
        assert!(script.contains(r#"a.download = "a.csv";"#));
    }
}
