//! `navigator.geolocation` behind the [`Geolocator`] trait.
//!
//! The callback API is wrapped in a Promise built through `js_sys::eval`, so
//! no geolocation-specific `web-sys` bindings are needed. The Promise always
//! resolves, either with `{ lat, lon }` or with `{ error, message }`.

use aqt_client::nearby::{Geolocator, LocateOptions};
use aqt_client::GeoError;
use aqt_core::geo::GeoPoint;
use js_sys::{Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserGeolocator;

fn locate_script(options: LocateOptions) -> String {
    format!(
        r#"new Promise(function(resolve) {{
            if (!navigator.geolocation) {{ resolve({{ error: 'unsupported' }}); return; }}
            navigator.geolocation.getCurrentPosition(
                function(p) {{ resolve({{ lat: p.coords.latitude, lon: p.coords.longitude }}); }},
                function(e) {{
                    var kind = e.code === 1 ? 'denied' : (e.code === 3 ? 'timeout' : 'unavailable');
                    resolve({{ error: kind, message: e.message }});
                }},
                {{ enableHighAccuracy: {high}, timeout: {timeout}, maximumAge: 0 }}
            );
        }})"#,
        high = options.high_accuracy,
        timeout = options.timeout.as_millis(),
    )
}

fn field(value: &JsValue, name: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED)
}

fn to_geo_error(value: &JsValue) -> GeoError {
    match field(value, "error").as_string().as_deref() {
        Some("unsupported") => GeoError::Unsupported,
        Some("denied") => GeoError::PermissionDenied,
        Some("timeout") => GeoError::Timeout,
        _ => GeoError::Unavailable(
            field(value, "message")
                .as_string()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Unable to get location".to_string()),
        ),
    }
}

impl Geolocator for BrowserGeolocator {
    async fn locate(&self, options: LocateOptions) -> Result<GeoPoint, GeoError> {
        let promise: Promise = js_sys::eval(&locate_script(options))
            .ok()
            .and_then(|v| v.dyn_into().ok())
            .ok_or(GeoError::Unsupported)?;
        let value = JsFuture::from(promise)
            .await
            .map_err(|e| GeoError::Unavailable(format!("{:?}", e)))?;

        match (field(&value, "lat").as_f64(), field(&value, "lon").as_f64()) {
            (Some(lat), Some(lon)) => Ok(GeoPoint::new(lat, lon)),
            _ => Err(to_geo_error(&value)),
        }
    }
}
