use crate::api::{ApiResult, JobQuery, RecapApi, VideoJobFields};
use async_trait::async_trait;
use recap_api_types::{
    CreateVideoResponse, JobStatusResponse, RequestOtpResponse, ServerStatus, ValidateOtpRequest,
    ValidateOtpResponse,
};
use std::cell::RefCell;

type Script<T> = RefCell<Vec<ApiResult<T>>>;

/// Mock service: tests queue responses per endpoint and inspect the
/// recorded requests afterwards. Popping an empty script panics, which
/// doubles as a call-count assertion.
#[derive(Default)]
pub struct ScriptedApi {
    pub otp_requests: RefCell<Vec<String>>,
    pub otp_responses: Script<RequestOtpResponse>,
    pub validate_requests: RefCell<Vec<ValidateOtpRequest>>,
    pub validate_responses: Script<ValidateOtpResponse>,
    pub video_requests: RefCell<Vec<VideoJobFields>>,
    pub video_responses: Script<CreateVideoResponse>,
    pub status_requests: RefCell<Vec<(String, JobQuery)>>,
    pub status_responses: Script<JobStatusResponse>,
    pub probe_requests: RefCell<Vec<(String, JobQuery)>>,
    pub probe_responses: Script<()>,
}

impl ScriptedApi {
    fn next<T>(script: &Script<T>, endpoint: &str) -> ApiResult<T> {
        let mut queue = script.borrow_mut();
        if queue.is_empty() {
            panic!("unexpected call to {endpoint}: script exhausted");
        }
        queue.remove(0)
    }
}

#[async_trait(?Send)]
impl RecapApi for ScriptedApi {
    async fn server_status(&self) -> ApiResult<ServerStatus> {
        panic!("server_status is not scripted");
    }

    async fn request_otp(&self, phone: &str) -> ApiResult<RequestOtpResponse> {
        self.otp_requests.borrow_mut().push(phone.to_owned());
        Self::next(&self.otp_responses, "request_otp")
    }

    async fn validate_otp(&self, req: &ValidateOtpRequest) -> ApiResult<ValidateOtpResponse> {
        self.validate_requests.borrow_mut().push(req.clone());
        Self::next(&self.validate_responses, "validate_otp")
    }

    async fn create_video(&self, job: &VideoJobFields) -> ApiResult<CreateVideoResponse> {
        self.video_requests.borrow_mut().push(job.clone());
        Self::next(&self.video_responses, "create_video")
    }

    async fn job_status(&self, task_id: &str, query: &JobQuery) -> ApiResult<JobStatusResponse> {
        self.status_requests
            .borrow_mut()
            .push((task_id.to_owned(), query.clone()));
        Self::next(&self.status_responses, "job_status")
    }

    async fn probe_video(&self, filename: &str, query: &JobQuery) -> ApiResult<()> {
        self.probe_requests
            .borrow_mut()
            .push((filename.to_owned(), query.clone()));
        Self::next(&self.probe_responses, "probe_video")
    }
}
