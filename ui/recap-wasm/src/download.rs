//! Download stage: preview the finished video and hand it over.

use crate::api::{self, HttpApi};
use crate::dom::{self, Elements};
use crate::{error, router, store};
use recap_core::api::JobQuery;
use recap_core::stage::{self, Stage};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlElement;

const DOWNLOAD_NAME: &str = "recap.mp4";

fn current_video_url() -> String {
    let state = store::form().state();
    let query = JobQuery {
        phone: state.full_phone(),
        bereal_token: state.bereal_token.clone(),
    };
    api::video_url(&state.video_filename, &query)
}

pub fn on_enter(els: &Elements, epoch: u64) {
    render_preview(els, &current_video_url());

    // Confirm the file still answers; expired sessions bounce home.
    spawn_local(async move {
        let form = store::form();
        if let Err(failure) = stage::verify_download(form.as_ref(), &HttpApi).await {
            if router::current_epoch() == epoch {
                error::set_and_navigate(failure, stage::DOWNLOAD_FAILED_MESSAGE, Stage::PhoneInput);
            }
        }
    });
}

fn render_preview(els: &Elements, url: &str) {
    els.video_preview.set_inner_html("");

    let video = dom::create_element("video");
    let _ = video.set_attribute("controls", "");
    let _ = video.set_attribute("playsinline", "");
    let _ = video.set_attribute("preload", "metadata");

    let source = dom::create_element("source");
    let _ = source.set_attribute("src", url);
    let _ = source.set_attribute("type", "video/mp4");

    let _ = video.append_child(&source);
    let _ = els.video_preview.append_child(&video);
}

/// Trigger the browser's download flow via a transient anchor.
pub fn on_download_click() {
    let anchor = dom::create_element("a");
    let _ = anchor.set_attribute("href", &current_video_url());
    let _ = anchor.set_attribute("download", DOWNLOAD_NAME);

    if let Some(body) = dom::document().body() {
        let _ = body.append_child(&anchor);
        anchor.unchecked_ref::<HtmlElement>().click();
        let _ = body.remove_child(&anchor);
    }
}
