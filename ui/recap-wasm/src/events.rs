//! Event binding.
//!
//! Wires all UI event listeners. Inputs write through to the form
//! store as they change, so progress survives a reload mid-step. To
//! add new events, add closures here and (if async) spawn via
//! `wasm_bindgen_futures::spawn_local`.

use crate::dom::{self, Elements};
use crate::{download, otp, phone, router, settings, store};
use recap_core::options::{self, YEAR_WINDOW};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Helper: attach async click handler to an HtmlElement.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Helper: attach sync click handler.
macro_rules! on_click {
    ($el:expr, $cb:expr) => {{
        let cb = Closure::wrap(Box::new($cb) as Box<dyn FnMut(web_sys::MouseEvent)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) {
    // ── Submits ──
    on_click_async!(els.phone_submit, els, phone::on_submit);
    on_click_async!(els.otp_submit, els, otp::on_submit);
    on_click_async!(els.settings_submit, els, settings::on_submit);
    on_click!(els.download_btn, move |_: web_sys::MouseEvent| {
        download::on_download_click();
    });

    // ── Write-through inputs ──
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let raw = dom::get_input_value(&els2.phone_input);
            store::form().set_phone_number(phone::digits(&raw));
        }) as Box<dyn FnMut(_)>);
        els.phone_input
            .add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            store::form().set_country_code(dom::get_select_value(&els2.country_select));
        }) as Box<dyn FnMut(_)>);
        els.country_select
            .add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            store::form().set_otp_code(dom::get_input_value(&els2.otp_input));
        }) as Box<dyn FnMut(_)>);
        els.otp_input
            .add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let years = options::year_options(store::today(), YEAR_WINDOW);
            let value = dom::get_select_value(&els2.year_select);
            store::form().set_year(options::find_by_value(&years, &value));
        }) as Box<dyn FnMut(_)>);
        els.year_select
            .add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let modes = options::mode_options();
            let value = dom::get_select_value(&els2.mode_select);
            store::form().set_mode(options::find_by_value(&modes, &value));
        }) as Box<dyn FnMut(_)>);
        els.mode_select
            .add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            store::form().set_disable_music(els2.music_checkbox.checked());
        }) as Box<dyn FnMut(_)>);
        els.music_checkbox
            .add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            store::form().set_display_date(els2.date_checkbox.checked());
        }) as Box<dyn FnMut(_)>);
        els.date_checkbox
            .add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            settings::on_file_change(&els2);
        }) as Box<dyn FnMut(_)>);
        els.file_input
            .add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // ── Enter submits the code ──
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |ev: web_sys::KeyboardEvent| {
            if ev.key() == "Enter" {
                let els3 = els2.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    otp::on_submit(&els3).await;
                });
            }
        }) as Box<dyn FnMut(_)>);
        els.otp_input
            .add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    // ── History ──
    {
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            router::render(router::current_stage());
        }) as Box<dyn FnMut(_)>);
        dom::window()
            .add_event_listener_with_callback("popstate", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
}
