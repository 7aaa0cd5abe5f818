use crate::error::ApiFailure;
use crate::form::AudioFileMeta;
use async_trait::async_trait;
use recap_api_types::{
    CreateVideoResponse, JobStatusResponse, RequestOtpResponse, ServerStatus, ValidateOtpRequest,
    ValidateOtpResponse,
};

pub type ApiResult<T> = Result<T, ApiFailure>;

/// Fields of the render-job submission. The audio blob itself stays
/// with the caller; only its metadata rides along.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoJobFields {
    pub phone: String,
    pub token: String,
    pub year: String,
    pub mode: String,
    pub disable_music: bool,
    pub display_date: bool,
    pub audio: Option<AudioFileMeta>,
}

/// Credentials the job-status and download endpoints expect as query
/// parameters next to the task id or filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub phone: String,
    pub bereal_token: String,
}

/// The remote recap service as the wizard sees it. Browser futures are
/// not Send, hence `?Send`.
#[async_trait(?Send)]
pub trait RecapApi {
    async fn server_status(&self) -> ApiResult<ServerStatus>;
    async fn request_otp(&self, phone: &str) -> ApiResult<RequestOtpResponse>;
    async fn validate_otp(&self, req: &ValidateOtpRequest) -> ApiResult<ValidateOtpResponse>;
    async fn create_video(&self, job: &VideoJobFields) -> ApiResult<CreateVideoResponse>;
    async fn job_status(&self, task_id: &str, query: &JobQuery) -> ApiResult<JobStatusResponse>;
    async fn probe_video(&self, filename: &str, query: &JobQuery) -> ApiResult<()>;
}
