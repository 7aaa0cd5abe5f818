//! DOM element bindings.
//!
//! All references are resolved once at startup. To add new UI elements,
//! add a field here and bind it in `Elements::bind()`.

use recap_core::stage::Stage;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement};

// ── Helpers ──

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_input_value(el: &HtmlInputElement, val: &str) {
    el.set_value(val);
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn get_select_value(el: &HtmlSelectElement) -> String {
    el.value()
}

pub fn set_select_value(el: &HtmlSelectElement, val: &str) {
    el.set_value(val);
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn create_element(tag: &str) -> Element {
    doc().create_element(tag).unwrap()
}

pub fn create_option(value: &str, text: &str, selected: bool) -> HtmlOptionElement {
    let opt: HtmlOptionElement = create_element("option").dyn_into().unwrap();
    opt.set_value(value);
    opt.set_text_content(Some(text));
    opt.set_selected(selected);
    opt
}

pub fn document() -> Document {
    doc()
}

pub fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

// ── Elements struct ──

/// All DOM references the wizard touches.
/// Clone-friendly (inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Stage panels, one per screen
    pub phone_stage: Element,
    pub otp_stage: Element,
    pub settings_stage: Element,
    pub processing_stage: Element,
    pub download_stage: Element,

    // Phone entry
    pub country_select: HtmlSelectElement,
    pub phone_input: HtmlInputElement,
    pub phone_submit: HtmlElement,

    // Verification code
    pub otp_input: HtmlInputElement,
    pub otp_error: Element,
    pub otp_submit: HtmlElement,

    // Render settings
    pub year_select: HtmlSelectElement,
    pub mode_select: HtmlSelectElement,
    pub music_checkbox: HtmlInputElement,
    pub date_checkbox: HtmlInputElement,
    pub file_input: HtmlInputElement,
    pub settings_submit: HtmlElement,

    // Progress + result
    pub processing_note: Element,
    pub video_preview: Element,
    pub download_btn: HtmlElement,

    // Footer
    pub footer_version: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_select {
    ($id:expr) => {
        by_id_typed::<HtmlSelectElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing select #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            phone_stage: get_el!("phoneStage"),
            otp_stage: get_el!("otpStage"),
            settings_stage: get_el!("settingsStage"),
            processing_stage: get_el!("processingStage"),
            download_stage: get_el!("downloadStage"),

            country_select: get_select!("countryCode"),
            phone_input: get_input!("phoneNumber"),
            phone_submit: get_html!("phoneSubmitBtn"),

            otp_input: get_input!("otpCode"),
            otp_error: get_el!("otpError"),
            otp_submit: get_html!("otpSubmitBtn"),

            year_select: get_select!("yearSelect"),
            mode_select: get_select!("modeSelect"),
            music_checkbox: get_input!("disableMusic"),
            date_checkbox: get_input!("displayDate"),
            file_input: get_input!("audioFile"),
            settings_submit: get_html!("settingsSubmitBtn"),

            processing_note: get_el!("processingNote"),
            video_preview: get_el!("videoPreview"),
            download_btn: get_html!("downloadBtn"),

            footer_version: get_el!("footerVersion"),
        })
    }

    pub fn panel(&self, stage: Stage) -> &Element {
        match stage {
            Stage::PhoneInput => &self.phone_stage,
            Stage::OtpInput => &self.otp_stage,
            Stage::Settings => &self.settings_stage,
            Stage::Processing => &self.processing_stage,
            Stage::Download => &self.download_stage,
        }
    }
}
