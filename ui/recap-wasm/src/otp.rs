//! Verification code stage.
//!
//! The only stage with a hard submit lock: a second tap while the
//! service is still validating would burn the one-shot session.

use crate::api::HttpApi;
use crate::dom::{self, Elements};
use crate::{error, otp_autofill, router, store};
use recap_core::stage;
use std::cell::Cell;

const VALIDATE_FAILED: &str = "Couldn't verify your code. Please try again.";

thread_local! {
    static LOADING: Cell<bool> = Cell::new(false);
}

pub fn on_enter(els: &Elements, epoch: u64) {
    let state = store::form().state();
    dom::set_input_value(&els.otp_input, &state.otp_code);
    set_inline(els, None);
    otp_autofill::arm(els, epoch);
}

pub async fn on_submit(els: &Elements) {
    if LOADING.with(|flag| flag.get()) {
        return;
    }
    LOADING.with(|flag| flag.set(true));
    let _ = els.otp_submit.set_attribute("disabled", "");

    error::clear();
    set_inline(els, None);
    let form = store::form();
    form.set_otp_code(dom::get_input_value(&els.otp_input));

    let outcome = stage::submit_otp(form.as_ref(), &HttpApi).await;

    LOADING.with(|flag| flag.set(false));
    let _ = els.otp_submit.remove_attribute("disabled");

    match outcome {
        Ok(next) => router::navigate(next),
        Err(failure) => {
            error::set(failure, VALIDATE_FAILED);
            set_inline(els, error::inline_message().as_deref());
        }
    }
}

fn set_inline(els: &Elements, message: Option<&str>) {
    match message {
        Some(text) => {
            dom::set_text(&els.otp_error, text);
            dom::remove_class(&els.otp_error, "hidden");
        }
        None => {
            dom::set_text(&els.otp_error, "");
            dom::add_class(&els.otp_error, "hidden");
        }
    }
}
