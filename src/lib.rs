//! erdrop - ER diagram drag and drop playground
//!
//! A canvas-drawn entity-relationship diagram whose tables can be dragged
//! into tool drop zones, built with Leptos and WebAssembly.

#![recursion_limit = "4096"]

pub mod app;
pub mod core;
pub mod ui;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    use crate::core::AppConfig;
    use leptos::prelude::*;

    console_error_panic_hook::set_once();

    // Конфигурация, отданная сервером в атрибуте body
    let config = leptos::web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
        .and_then(|body| body.get_attribute(CONFIG_ATTR))
        .and_then(|raw| serde_json::from_str::<AppConfig>(&raw).ok())
        .unwrap_or_default();

    leptos::mount::hydrate_body(move || {
        provide_context(config);
        view! { <App/> }
    });
}
