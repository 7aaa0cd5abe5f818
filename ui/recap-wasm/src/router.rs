//! Stage routing.
//!
//! One stage panel is visible at a time; the URL path tracks it so
//! reload and back/forward land on the right step. Every render bumps
//! an epoch counter. Background work spawned for a stage captures the
//! epoch at spawn time and stands down once it no longer matches, so
//! polls and autofill from an abandoned stage cannot touch the page.

use crate::dom::{self, Elements};
use crate::{download, otp, otp_autofill, phone, processing, settings};
use recap_core::stage::Stage;
use std::cell::{Cell, RefCell};
use wasm_bindgen::JsValue;

thread_local! {
    static ELEMENTS: RefCell<Option<Elements>> = RefCell::new(None);
    static EPOCH: Cell<u64> = Cell::new(0);
}

pub fn init(els: &Elements) {
    ELEMENTS.with(|slot| *slot.borrow_mut() = Some(els.clone()));
}

fn elements() -> Elements {
    ELEMENTS.with(|slot| slot.borrow().as_ref().unwrap().clone())
}

pub fn current_epoch() -> u64 {
    EPOCH.with(|epoch| epoch.get())
}

fn next_epoch() -> u64 {
    EPOCH.with(|epoch| {
        let next = epoch.get() + 1;
        epoch.set(next);
        next
    })
}

/// Stage for the current URL. Unknown paths fall back to the start.
pub fn current_stage() -> Stage {
    let path = dom::window()
        .location()
        .pathname()
        .unwrap_or_else(|_| "/".to_owned());
    Stage::from_path(&path).unwrap_or(Stage::PhoneInput)
}

/// Push the stage onto the history stack and show it.
pub fn navigate(stage: Stage) {
    if let Ok(history) = dom::window().history() {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(stage.path()));
    }
    render(stage);
}

/// Show a stage without touching history. Used for the initial paint
/// and for popstate, where the browser already moved the URL.
pub fn render(stage: Stage) {
    let epoch = next_epoch();
    otp_autofill::cancel();

    let els = elements();
    for candidate in Stage::ALL {
        dom::toggle_class(els.panel(candidate), "active", candidate == stage);
    }

    match stage {
        Stage::PhoneInput => phone::on_enter(&els),
        Stage::OtpInput => otp::on_enter(&els, epoch),
        Stage::Settings => settings::on_enter(&els),
        Stage::Processing => processing::on_enter(&els, epoch),
        Stage::Download => download::on_enter(&els, epoch),
    }
}
