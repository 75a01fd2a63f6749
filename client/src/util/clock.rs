//! Wall-clock time in milliseconds since the Unix epoch.

/// Current time for history timestamps. Returns `0` during SSR.
#[must_use]
pub fn now_millis() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let millis = js_sys::Date::now() as i64;
        millis
    }
    #[cfg(not(feature = "hydrate"))]
    {
        0
    }
}

/// `time · date` in the browser's locale and time zone, or `None` during SSR.
#[must_use]
pub fn local_label(millis: i64) -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_precision_loss)]
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(millis as f64));
        if date.get_time().is_nan() {
            return None;
        }
        let time = String::from(date.to_locale_time_string("default"));
        let day = String::from(date.to_locale_date_string("default", &wasm_bindgen::JsValue::UNDEFINED));
        Some(format!("{time} · {day}"))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = millis;
        None
    }
}
