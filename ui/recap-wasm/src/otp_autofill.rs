//! WebOTP autofill.
//!
//! On mobile browsers that expose `OTPCredential`, arms a listener for
//! the incoming SMS and submits the code without a keystroke. The
//! binding goes through `Reflect` because the API is still uneven
//! across browsers. Desktop browsers skip all of this.

use crate::dom::{self, Elements};
use crate::{notify, otp, router, store};
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{AbortController, CredentialRequestOptions};

pub const AUTOFILL_WARNING: &str =
    "Couldn't paste your verification code automatically. Enter it manually.";

const MOBILE_MARKERS: [&str; 7] = [
    "Android",
    "iPhone",
    "iPad",
    "iPod",
    "webOS",
    "BlackBerry",
    "Windows Phone",
];

thread_local! {
    static CONTROLLER: RefCell<Option<AbortController>> = RefCell::new(None);
}

fn is_mobile() -> bool {
    let ua = dom::window().navigator().user_agent().unwrap_or_default();
    MOBILE_MARKERS.iter().any(|marker| ua.contains(marker))
}

fn supported() -> bool {
    if !is_mobile() {
        return false;
    }
    let win: JsValue = dom::window().into();
    js_sys::Reflect::has(&win, &JsValue::from_str("OTPCredential")).unwrap_or(false)
}

/// Start listening for an SMS code. Replaces any listener already armed.
pub fn arm(els: &Elements, epoch: u64) {
    if !supported() {
        return;
    }
    cancel();

    let Ok(controller) = AbortController::new() else {
        return;
    };
    CONTROLLER.with(|slot| *slot.borrow_mut() = Some(controller.clone()));

    let els = els.clone();
    spawn_local(async move {
        let outcome = request_code(&controller).await;
        if router::current_epoch() != epoch {
            // Stage changed while we waited; an abort rejection lands here too.
            return;
        }
        match outcome {
            Ok(Some(code)) => {
                store::form().set_otp_code(&code);
                dom::set_input_value(&els.otp_input, &code);
                otp::on_submit(&els).await;
            }
            Ok(None) => {}
            Err(err) => {
                gloo_console::warn!(format!("otp autofill failed: {err:?}"));
                notify::warning(AUTOFILL_WARNING);
            }
        }
    });
}

async fn request_code(controller: &AbortController) -> Result<Option<String>, JsValue> {
    let otp = js_sys::Object::new();
    let transports = js_sys::Array::of1(&JsValue::from_str("sms"));
    js_sys::Reflect::set(&otp, &JsValue::from_str("transport"), &transports)?;

    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &JsValue::from_str("otp"), &otp)?;
    js_sys::Reflect::set(&options, &JsValue::from_str("signal"), &controller.signal())?;

    let request: &CredentialRequestOptions = options.unchecked_ref();
    let promise = dom::window()
        .navigator()
        .credentials()
        .get_with_options(request)?;
    let credential = JsFuture::from(promise).await?;
    if credential.is_null() || credential.is_undefined() {
        return Ok(None);
    }
    Ok(js_sys::Reflect::get(&credential, &JsValue::from_str("code"))?.as_string())
}

/// Abort the armed listener, if any. Safe to call when none is armed.
pub fn cancel() {
    if let Some(controller) = CONTROLLER.with(|slot| slot.borrow_mut().take()) {
        controller.abort();
    }
}
