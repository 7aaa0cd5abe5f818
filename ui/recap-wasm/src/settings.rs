//! Render settings stage.

use crate::api::HttpApi;
use crate::dom::{self, Elements};
use crate::{error, router, store};
use recap_core::options::{self, YEAR_WINDOW};
use recap_core::stage;

const CREATE_FAILED: &str = "Couldn't start your video. Please try again later.";

/// Fill the year and mode dropdowns. Runs once at startup.
pub fn populate(els: &Elements) {
    let state = store::form().state();

    let selected_year = state.year.as_ref().map(|y| y.value.clone());
    for year in options::year_options(store::today(), YEAR_WINDOW) {
        let chosen = selected_year.as_deref() == Some(year.value.as_str());
        let option = dom::create_option(&year.value, &year.label, chosen);
        let _ = els.year_select.append_child(&option);
    }

    let selected_mode = state.mode.as_ref().map(|m| m.value.clone());
    for mode in options::mode_options() {
        let chosen = selected_mode.as_deref() == Some(mode.value.as_str());
        let option = dom::create_option(&mode.value, &mode.label, chosen);
        let _ = els.mode_select.append_child(&option);
    }
}

pub fn on_enter(els: &Elements) {
    let state = store::form().state();
    if let Some(year) = &state.year {
        dom::set_select_value(&els.year_select, &year.value);
    }
    if let Some(mode) = &state.mode {
        dom::set_select_value(&els.mode_select, &mode.value);
    }
    els.music_checkbox.set_checked(state.disable_music);
    els.date_checkbox.set_checked(state.display_date);
}

fn sync(els: &Elements) {
    let form = store::form();
    let years = options::year_options(store::today(), YEAR_WINDOW);
    form.set_year(options::find_by_value(
        &years,
        &dom::get_select_value(&els.year_select),
    ));
    let modes = options::mode_options();
    form.set_mode(options::find_by_value(
        &modes,
        &dom::get_select_value(&els.mode_select),
    ));
    form.set_disable_music(els.music_checkbox.checked());
    form.set_display_date(els.date_checkbox.checked());
}

/// Mirror the picked file into state. Clearing the picker clears it.
pub fn on_file_change(els: &Elements) {
    let file = els.file_input.files().and_then(|list| list.get(0));
    store::set_audio(file);
}

pub async fn on_submit(els: &Elements) {
    error::clear();
    sync(els);
    let form = store::form();
    match stage::submit_settings(form.as_ref(), &HttpApi).await {
        Ok(next) => router::navigate(next),
        Err(failure) => error::set(failure, CREATE_FAILED),
    }
}
