use serde::{Deserialize, Serialize};

// Wire names mirror the recap service verbatim; the casing is mixed on
// purpose (camelCase and snake_case both appear in its JSON).

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestOtpRequest {
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestOtpResponse {
    #[serde(rename = "otpSession")]
    pub otp_session: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOtpRequest {
    pub otp_session: String,
    pub otp_code: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOtpResponse {
    pub token: String,
    // Older service builds return only `token`.
    #[serde(default)]
    pub bereal_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVideoResponse {
    #[serde(rename = "taskId")]
    pub task_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    InProgress,
    Success,
    Failure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<String>,
}

impl JobStatusResponse {
    /// Any status other than the two terminal markers means the job is
    /// still running.
    pub fn state(&self) -> JobState {
        match self.status.as_str() {
            "SUCCESS" => JobState::Success,
            "FAILURE" => JobState::Failure,
            _ => JobState::InProgress,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_request_wire_names() {
        let req = ValidateOtpRequest {
            otp_session: "sess".into(),
            otp_code: "123456".into(),
            phone: "15551234567".into(),
        };
        let raw = serde_json::to_string(&req).unwrap();
        assert!(raw.contains("\"otp_session\""));
        assert!(raw.contains("\"otp_code\""));
        assert!(raw.contains("\"phone\""));
    }

    #[test]
    fn otp_session_is_camel_case_in_responses() {
        let resp: RequestOtpResponse =
            serde_json::from_str(r#"{"otpSession":"abc"}"#).unwrap();
        assert_eq!(resp.otp_session, "abc");
    }

    #[test]
    fn validate_response_tolerates_missing_bereal_token() {
        let resp: ValidateOtpResponse =
            serde_json::from_str(r#"{"token":"t1"}"#).unwrap();
        assert_eq!(resp.token, "t1");
        assert_eq!(resp.bereal_token, "");
    }

    #[test]
    fn task_id_is_camel_case() {
        let resp: CreateVideoResponse =
            serde_json::from_str(r#"{"taskId":"55"}"#).unwrap();
        assert_eq!(resp.task_id, "55");
    }

    #[test]
    fn job_status_classifies_terminal_states() {
        let running: JobStatusResponse =
            serde_json::from_str(r#"{"status":"PENDING"}"#).unwrap();
        assert_eq!(running.state(), JobState::InProgress);
        assert_eq!(running.result, None);

        let done: JobStatusResponse =
            serde_json::from_str(r#"{"status":"SUCCESS","result":"out.mp4"}"#).unwrap();
        assert_eq!(done.state(), JobState::Success);
        assert_eq!(done.result.as_deref(), Some("out.mp4"));

        let failed: JobStatusResponse =
            serde_json::from_str(r#"{"status":"FAILURE"}"#).unwrap();
        assert_eq!(failed.state(), JobState::Failure);
    }

    #[test]
    fn error_body_fields_are_optional() {
        let body: ApiErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.error, None);
        assert_eq!(body.message, None);

        let body: ApiErrorBody =
            serde_json::from_str(r#"{"error":"boom","message":"Try later."}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("Try later."));
    }
}
