//! Error surfacing.
//!
//! One failure is on record at a time; every submit path clears it
//! before talking to the service. Failures land in the toast layer,
//! local validation text additionally shows inline next to its input.

use crate::{notify, router};
use gloo_timers::future::TimeoutFuture;
use recap_core::error::{ErrorSlot, Failure};
use recap_core::stage::Stage;
use std::cell::RefCell;
use wasm_bindgen_futures::spawn_local;

/// Navigation trails the toast so the message survives the repaint.
const NAVIGATE_DELAY_MS: u32 = 100;

thread_local! {
    static SLOT: RefCell<ErrorSlot> = RefCell::new(ErrorSlot::default());
}

pub fn clear() {
    SLOT.with(|slot| slot.borrow_mut().clear());
}

/// Validation text for inline display. API failures stay toast-only.
pub fn inline_message() -> Option<String> {
    SLOT.with(|slot| match slot.borrow().current() {
        Some(Failure::Message(text)) => Some(text.clone()),
        _ => None,
    })
}

/// Record a failure and toast its user-facing form.
pub fn set(failure: Failure, fallback: &str) {
    gloo_console::error!(format!("{failure:?}"));
    let message = failure.user_message(fallback);
    SLOT.with(|slot| slot.borrow_mut().set(failure));
    notify::error(&message);
}

/// Record a failure, then move the wizard to `target`.
pub fn set_and_navigate(failure: Failure, fallback: &str, target: Stage) {
    set(failure, fallback);
    spawn_local(async move {
        TimeoutFuture::new(NAVIGATE_DELAY_MS).await;
        router::navigate(target);
    });
}
