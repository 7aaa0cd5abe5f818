//! Toast notifications.
//!
//! Repeated identical messages inside the throttle window are dropped,
//! so a flapping endpoint does not stack the screen with toasts.

use crate::dom;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

/// Identical messages inside this window are shown once.
const THROTTLE_MS: f64 = 5_000.0;
/// How long a toast stays on screen.
const DISMISS_MS: i32 = 6_000;

#[derive(Clone, Copy)]
enum Level {
    Error,
    Warning,
}

impl Level {
    fn class(self) -> &'static str {
        match self {
            Level::Error => "toast-error",
            Level::Warning => "toast-warning",
        }
    }
}

thread_local! {
    static LAST: RefCell<Option<(String, f64)>> = RefCell::new(None);
}

pub fn error(message: &str) {
    show(Level::Error, message);
}

pub fn warning(message: &str) {
    show(Level::Warning, message);
}

fn show(level: Level, message: &str) {
    let now = js_sys::Date::now();
    let repeat = LAST.with(|last| {
        let mut last = last.borrow_mut();
        let repeat = matches!(
            &*last,
            Some((prev, at)) if prev == message && now - at < THROTTLE_MS
        );
        if !repeat {
            *last = Some((message.to_owned(), now));
        }
        repeat
    });
    if !repeat {
        render(level, message);
    }
}

fn container() -> Element {
    if let Some(el) = dom::by_id("toasts") {
        return el;
    }
    let el = dom::create_element("div");
    el.set_id("toasts");
    if let Some(body) = dom::document().body() {
        let _ = body.append_child(&el);
    }
    el
}

fn render(level: Level, message: &str) {
    let toast = dom::create_element("div");
    dom::add_class(&toast, "toast");
    dom::add_class(&toast, level.class());
    dom::set_text(&toast, message);
    let _ = container().append_child(&toast);

    let dismiss = Closure::once(move || toast.remove());
    let _ = dom::window().set_timeout_with_callback_and_timeout_and_arguments_0(
        dismiss.as_ref().unchecked_ref(),
        DISMISS_MS,
    );
    dismiss.forget();
}
