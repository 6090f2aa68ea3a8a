use std::rc::Rc;

use nepal_map_shared::{DiagnosticSink, MapError};

/// Reports map diagnostics on the browser console.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn report(&self, error: &MapError) {
        web_sys::console::error_1(&format!("Error: {error}").into());
    }
}

/// Console in the browser; `tracing` everywhere else.
pub fn default_sink() -> Rc<dyn DiagnosticSink> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(ConsoleSink)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(nepal_map_shared::TracingSink)
    }
}
