use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while wiring an effect unit to the page.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("no {0} in this environment")]
    Missing(&'static str),
    #[error("WebGL2 not supported")]
    NoContext,
    #[error("shader compile failed: {0}")]
    ShaderCompile(String),
    #[error("program link failed: {0}")]
    ProgramLink(String),
    #[error("framebuffer incomplete (status {0:#x})")]
    FramebufferIncomplete(u32),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("js: {0}")]
    Js(String),
}

impl From<FxError> for JsValue {
    fn from(err: FxError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<JsValue> for FxError {
    fn from(value: JsValue) -> Self {
        FxError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

pub type Result<T, E = FxError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(FxError::NoContext.to_string(), "WebGL2 not supported");
        assert_eq!(
            FxError::FramebufferIncomplete(0x8cd6).to_string(),
            "framebuffer incomplete (status 0x8cd6)"
        );
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(FxError::from(bad).to_string().starts_with("invalid config"));
    }
}
