//! Recap Wizard WASM Frontend
//!
//! Pure Rust + WASM client for the recap video service: phone sign-in,
//! SMS verification, render settings, job polling, download. Each
//! concern lives in its own module.

pub mod api;
pub mod dom;
pub mod download;
pub mod error;
pub mod events;
pub mod notify;
pub mod otp;
pub mod otp_autofill;
pub mod phone;
pub mod processing;
pub mod router;
pub mod settings;
pub mod store;

use recap_core::api::RecapApi;
use wasm_bindgen::prelude::*;

const SERVER_DOWN_MESSAGE: &str = "The server seems down. Please try again later!";

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init().await
}

/// Main initialisation sequence.
async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    // Restore whatever the last visit saved, then build the UI on it.
    store::init();
    router::init(&els);
    phone::populate(&els);
    settings::populate(&els);
    events::bind_events(&els);

    // Paint the stage the URL points at. Deep links into a stage the
    // restored state cannot back are bounced by the stage itself.
    router::render(router::current_stage());

    // Background health probe; a dead service is worth a toast up front.
    let els2 = els.clone();
    wasm_bindgen_futures::spawn_local(async move {
        match api::HttpApi.server_status().await {
            Ok(status) => {
                if !status.version.is_empty() {
                    dom::set_text(&els2.footer_version, &format!("v{}", status.version));
                }
            }
            Err(failure) => {
                gloo_console::warn!(format!("status probe failed: {failure:?}"));
                notify::error(SERVER_DOWN_MESSAGE);
            }
        }
    });

    Ok(())
}
