//! Phone entry stage.

use crate::api::HttpApi;
use crate::dom::{self, Elements};
use crate::{error, router, store};
use recap_core::stage;

const SEND_FAILED: &str = "Couldn't send a verification code. Please try again.";

/// Calling codes offered in the country dropdown.
const CALLING_CODES: [(&str, &str); 16] = [
    ("1", "United States / Canada (+1)"),
    ("33", "France (+33)"),
    ("44", "United Kingdom (+44)"),
    ("49", "Germany (+49)"),
    ("34", "Spain (+34)"),
    ("39", "Italy (+39)"),
    ("31", "Netherlands (+31)"),
    ("32", "Belgium (+32)"),
    ("351", "Portugal (+351)"),
    ("353", "Ireland (+353)"),
    ("41", "Switzerland (+41)"),
    ("46", "Sweden (+46)"),
    ("48", "Poland (+48)"),
    ("61", "Australia (+61)"),
    ("81", "Japan (+81)"),
    ("91", "India (+91)"),
];

/// Keep only the digits of whatever the user typed or pasted.
pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Fill the country dropdown. Runs once at startup.
pub fn populate(els: &Elements) {
    let state = store::form().state();
    let selected = if state.country_code.is_empty() {
        "1"
    } else {
        &state.country_code
    };
    for (code, label) in CALLING_CODES {
        let option = dom::create_option(code, label, code == selected);
        let _ = els.country_select.append_child(&option);
    }
}

pub fn on_enter(els: &Elements) {
    let state = store::form().state();
    if !state.country_code.is_empty() {
        dom::set_select_value(&els.country_select, &state.country_code);
    }
    dom::set_input_value(&els.phone_input, &state.phone_number);
}

fn sync(els: &Elements) {
    let form = store::form();
    form.set_country_code(dom::get_select_value(&els.country_select));
    form.set_phone_number(digits(&dom::get_input_value(&els.phone_input)));
}

pub async fn on_submit(els: &Elements) {
    error::clear();
    sync(els);
    let form = store::form();
    match stage::submit_phone(form.as_ref(), &HttpApi).await {
        Ok(next) => router::navigate(next),
        Err(failure) => error::set(failure, SEND_FAILED),
    }
}
