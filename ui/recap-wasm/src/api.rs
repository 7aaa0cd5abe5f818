//! HTTP client for the recap service.
//!
//! Wraps `fetch` and classifies what went wrong: did the service answer
//! with an error status, did nothing come back, or did the request
//! never leave. `base_url()` picks the backend at startup.

use crate::dom;
use crate::store;
use async_trait::async_trait;
use gloo_console::warn;
use recap_api_types::{
    ApiErrorBody, CreateVideoResponse, JobStatusResponse, RequestOtpRequest, RequestOtpResponse,
    ServerStatus, ValidateOtpRequest, ValidateOtpResponse,
};
use recap_core::api::{ApiResult, JobQuery, RecapApi, VideoJobFields};
use recap_core::error::ApiFailure;
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, Request, RequestInit, RequestMode, Response};

pub const PROD_BASE_URL: &str = "https://api.bereal.michaeldemar.co";
pub const DEV_BASE_URL: &str = "http://localhost:5000";

/// Determine the API base URL.
///
/// Priority: compile-time `RECAP_API_BASE` override → local dev server
/// when served from localhost → production.
pub fn base_url() -> String {
    if let Some(base) = option_env!("RECAP_API_BASE") {
        let base = base.trim().trim_end_matches('/');
        if !base.is_empty() {
            return base.to_owned();
        }
    }

    let host = dom::window().location().hostname().unwrap_or_default();
    if host == "localhost" || host == "127.0.0.1" {
        DEV_BASE_URL.to_owned()
    } else {
        PROD_BASE_URL.to_owned()
    }
}

fn enc(value: &str) -> String {
    js_sys::encode_uri_component(value).into()
}

// Query string shared by the credentialed GET endpoints.
fn job_query(query: &JobQuery) -> String {
    format!(
        "phone={}&berealToken={}",
        enc(&query.phone),
        enc(&query.bereal_token)
    )
}

/// Absolute URL of a rendered video, credentials included. The download
/// stage links this straight into the page.
pub fn video_url(filename: &str, query: &JobQuery) -> String {
    format!("{}/video/{}?{}", base_url(), enc(filename), job_query(query))
}

async fn send(url: &str, opts: &RequestInit) -> ApiResult<Response> {
    let request = Request::new_with_str_and_init(url, opts).map_err(|err| {
        warn!(format!("recap api: bad request: {err:?}"));
        ApiFailure::Dispatch
    })?;

    let resp_value = JsFuture::from(dom::window().fetch_with_request(&request))
        .await
        .map_err(|err| {
            warn!(format!("recap api: fetch failed: {err:?}"));
            ApiFailure::NoResponse
        })?;

    resp_value
        .dyn_into::<Response>()
        .map_err(|_| ApiFailure::NoResponse)
}

async fn body_text(resp: &Response) -> Option<String> {
    let promise = resp.text().ok()?;
    JsFuture::from(promise).await.ok()?.as_string()
}

/// Pull the service's error body, if any, off a failed response. The
/// service puts human-readable text under `message` or `error`.
async fn failure_of(resp: &Response) -> ApiFailure {
    let message = match body_text(resp).await {
        Some(raw) => serde_json::from_str::<ApiErrorBody>(&raw)
            .ok()
            .and_then(|body| body.message.or(body.error)),
        None => None,
    };
    let failure = ApiFailure::Response {
        status: resp.status(),
        message,
    };
    warn!(format!("recap api: {failure:?}"));
    failure
}

async fn decode<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
    if !resp.ok() {
        return Err(failure_of(&resp).await);
    }
    let raw = body_text(&resp).await.unwrap_or_default();
    serde_json::from_str(&raw).map_err(|err| {
        warn!(format!("recap api: undecodable body: {err}"));
        ApiFailure::Response {
            status: resp.status(),
            message: None,
        }
    })
}

fn get_opts() -> RequestInit {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);
    opts
}

async fn get_json<T: DeserializeOwned>(path: &str) -> ApiResult<T> {
    let resp = send(&format!("{}{}", base_url(), path), &get_opts()).await?;
    decode(resp).await
}

async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> ApiResult<T> {
    let raw = serde_json::to_string(body).map_err(|_| ApiFailure::Dispatch)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    let headers = Headers::new().map_err(|_| ApiFailure::Dispatch)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|_| ApiFailure::Dispatch)?;
    opts.set_headers(&headers);
    opts.set_body(&JsValue::from_str(&raw));

    let resp = send(&format!("{}{}", base_url(), path), &opts).await?;
    decode(resp).await
}

async fn post_form<T: DeserializeOwned>(path: &str, form: &FormData) -> ApiResult<T> {
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    // No Content-Type header: the browser writes the multipart boundary.
    opts.set_body(form.as_ref());

    let resp = send(&format!("{}{}", base_url(), path), &opts).await?;
    decode(resp).await
}

/// Fetch-backed client for the live service.
pub struct HttpApi;

#[async_trait(?Send)]
impl RecapApi for HttpApi {
    async fn server_status(&self) -> ApiResult<ServerStatus> {
        get_json("/status").await
    }

    async fn request_otp(&self, phone: &str) -> ApiResult<RequestOtpResponse> {
        let body = RequestOtpRequest {
            phone: phone.to_owned(),
        };
        post_json("/request-otp", &body).await
    }

    async fn validate_otp(&self, req: &ValidateOtpRequest) -> ApiResult<ValidateOtpResponse> {
        post_json("/validate-otp", req).await
    }

    async fn create_video(&self, job: &VideoJobFields) -> ApiResult<CreateVideoResponse> {
        let form = FormData::new().map_err(|_| ApiFailure::Dispatch)?;
        let append = |name: &str, value: &str| {
            form.append_with_str(name, value)
                .map_err(|_| ApiFailure::Dispatch)
        };
        append("phone", &job.phone)?;
        append("token", &job.token)?;
        append("year", &job.year)?;
        append("mode", &job.mode)?;
        append("disableMusic", if job.disable_music { "true" } else { "false" })?;
        append("displayDate", if job.display_date { "true" } else { "false" })?;
        if let Some(meta) = &job.audio {
            if let Some(file) = store::audio_file() {
                form.append_with_blob_and_filename("file", &file, &meta.name)
                    .map_err(|_| ApiFailure::Dispatch)?;
            }
        }
        post_form("/video", &form).await
    }

    async fn job_status(&self, task_id: &str, query: &JobQuery) -> ApiResult<JobStatusResponse> {
        let path = format!("/status/{}?{}", enc(task_id), job_query(query));
        get_json(&path).await
    }

    async fn probe_video(&self, filename: &str, query: &JobQuery) -> ApiResult<()> {
        // Headers are enough here; nobody reads the body.
        let resp = send(&video_url(filename, query), &get_opts()).await?;
        if !resp.ok() {
            return Err(failure_of(&resp).await);
        }
        Ok(())
    }
}
