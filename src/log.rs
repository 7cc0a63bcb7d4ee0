//! Console logging routed through `web_sys::console`
//!
//! Off `wasm32` the sink is silent so native tests never touch browser imports.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Write one prefixed line to the browser console
pub fn emit(level: Level, scope: &str, message: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        let line = wasm_bindgen::JsValue::from_str(&format!("[{}] {}", scope, message));
        match level {
            Level::Info => web_sys::console::log_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Error => web_sys::console::error_1(&line),
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (level, scope, message);
    }
}

/// Debug logging for the reveal engine, gated on `RevealConfig::debug`
macro_rules! reveal_log {
    ($config:expr, $($arg:tt)*) => {
        if $config.debug {
            $crate::log::emit($crate::log::Level::Info, "ScrollReveal", &format!($($arg)*));
        }
    };
}

/// Always-on logging for the contact form submitter
macro_rules! form_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::log::emit($crate::log::Level::$level, "form", &format!($($arg)*))
    };
}
