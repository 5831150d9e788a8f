//! Parameter records read from anchor attributes.
//!
//! Every effect unit accepts an optional `data-fx-config` attribute holding a
//! JSON object. Missing fields keep their defaults, malformed JSON falls back
//! to the defaults entirely.

use serde::de::DeserializeOwned;

use crate::error::Result;

/// Attribute carrying a JSON parameter record.
pub const CONFIG_ATTR: &str = "data-fx-config";

/// Parses a parameter record, falling back to `T::default()` when `raw` is
/// absent or malformed.
pub fn params_or_default<T>(raw: Option<&str>) -> T
where
    T: DeserializeOwned + Default,
{
    match raw.map(parse_params::<T>) {
        Some(Ok(params)) => params,
        Some(Err(err)) => {
            log::warn!("ignoring {CONFIG_ATTR}: {err}");
            T::default()
        }
        None => T::default(),
    }
}

pub fn parse_params<T: DeserializeOwned>(raw: &str) -> Result<T> {
    Ok(serde_json::from_str(raw)?)
}

/// Reads a single numeric attribute; absent, non-numeric and non-finite
/// values yield `default`.
pub fn numeric_attr(raw: Option<&str>, default: f32) -> f32 {
    raw.and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Device pixel ratio used for surface sizing.
pub fn clamp_pixel_ratio(dpr: f64) -> f64 {
    if dpr.is_finite() {
        dpr.clamp(1.0, 2.0)
    } else {
        1.0
    }
}

/// Backing-store size for a CSS box at the given pixel ratio (never zero).
pub fn surface_size(css_width: f64, css_height: f64, dpr: f64) -> (u32, u32) {
    let dpr = clamp_pixel_ratio(dpr);
    let w = (css_width * dpr).round().max(1.0) as u32;
    let h = (css_height * dpr).round().max(1.0) as u32;
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default)]
    struct Knobs {
        speed: f32,
        count: u32,
    }

    impl Default for Knobs {
        fn default() -> Self {
            Self { speed: 0.5, count: 8 }
        }
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let k: Knobs = params_or_default(Some(r#"{"count": 3, "other": true}"#));
        assert_eq!(k, Knobs { speed: 0.5, count: 3 });
    }

    #[test]
    fn malformed_json_falls_back() {
        let k: Knobs = params_or_default(Some("{count"));
        assert_eq!(k, Knobs::default());
        let k: Knobs = params_or_default(None);
        assert_eq!(k, Knobs::default());
    }

    #[test]
    fn numeric_attr_fallbacks() {
        assert_eq!(numeric_attr(Some(" 0.25 "), 1.0), 0.25);
        assert_eq!(numeric_attr(Some("wide"), 1.0), 1.0);
        assert_eq!(numeric_attr(Some("NaN"), 1.0), 1.0);
        assert_eq!(numeric_attr(Some("inf"), 1.0), 1.0);
        assert_eq!(numeric_attr(None, 1.0), 1.0);
    }

    #[test]
    fn surfaces_are_never_empty() {
        assert_eq!(surface_size(0.0, 0.0, 1.0), (1, 1));
        assert_eq!(surface_size(100.0, 50.0, 3.0), (200, 100));
        assert_eq!(surface_size(100.0, 50.0, 0.5), (100, 50));
        assert_eq!(clamp_pixel_ratio(f64::NAN), 1.0);
    }
}
