use crate::api::{JobQuery, RecapApi, VideoJobFields};
use crate::error::Failure;
use crate::form::{FormState, FormStore, SnapshotStore};
use crate::options::{self, MAX_AUDIO_BYTES};
use recap_api_types::ValidateOtpRequest;

pub const PHONE_INVALID_MESSAGE: &str = "Enter your country code and phone number.";
pub const OTP_LENGTH_MESSAGE: &str = "Verification code must be 6 digits long.";
pub const YEAR_REQUIRED_MESSAGE: &str = "Pick a year for your recap.";
pub const AUDIO_TOO_LARGE_MESSAGE: &str = "Audio file must be 100MB or less.";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download video. Try again later.";

/// One wizard screen; each maps to one URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PhoneInput,
    OtpInput,
    Settings,
    Processing,
    Download,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::PhoneInput,
        Stage::OtpInput,
        Stage::Settings,
        Stage::Processing,
        Stage::Download,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Stage::PhoneInput => "/",
            Stage::OtpInput => "/otp",
            Stage::Settings => "/settings",
            Stage::Processing => "/processing",
            Stage::Download => "/download",
        }
    }

    pub fn from_path(path: &str) -> Option<Stage> {
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        Stage::ALL.into_iter().find(|stage| stage.path() == path)
    }
}

pub fn valid_phone(country_code: &str, phone_number: &str) -> bool {
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(country_code) && digits(phone_number)
}

/// Phone submit: validate locally, request a verification code, hold on
/// to the session it opens.
pub async fn submit_phone<A, S>(store: &FormStore<S>, api: &A) -> Result<Stage, Failure>
where
    A: RecapApi + ?Sized,
    S: SnapshotStore,
{
    let state = store.state();
    if !valid_phone(&state.country_code, &state.phone_number) {
        return Err(Failure::message(PHONE_INVALID_MESSAGE));
    }

    let resp = api.request_otp(&state.full_phone()).await?;
    store.set_otp_session(resp.otp_session);
    Ok(Stage::OtpInput)
}

/// OTP submit: six digits or no network call at all.
pub async fn submit_otp<A, S>(store: &FormStore<S>, api: &A) -> Result<Stage, Failure>
where
    A: RecapApi + ?Sized,
    S: SnapshotStore,
{
    let state = store.state();
    if state.otp_code.chars().count() != 6 {
        return Err(Failure::message(OTP_LENGTH_MESSAGE));
    }

    let req = ValidateOtpRequest {
        otp_session: state.otp_session.clone(),
        otp_code: state.otp_code.clone(),
        phone: state.full_phone(),
    };
    let resp = api.validate_otp(&req).await?;
    store.set_token(resp.token);
    store.set_bereal_token(resp.bereal_token);
    Ok(Stage::Settings)
}

/// Settings submit: kick off the render job and keep its task id.
/// An absent mode falls back to classic, matching the service default.
pub async fn submit_settings<A, S>(store: &FormStore<S>, api: &A) -> Result<Stage, Failure>
where
    A: RecapApi + ?Sized,
    S: SnapshotStore,
{
    let state = store.state();
    let Some(year) = state.year.as_ref() else {
        return Err(Failure::message(YEAR_REQUIRED_MESSAGE));
    };
    if let Some(file) = &state.file {
        if file.size > MAX_AUDIO_BYTES {
            return Err(Failure::message(AUDIO_TOO_LARGE_MESSAGE));
        }
    }

    let job = VideoJobFields {
        phone: state.full_phone(),
        token: state.token.clone(),
        year: year.value.clone(),
        mode: state
            .mode
            .as_ref()
            .map(|mode| mode.value.clone())
            .unwrap_or_else(|| options::MODE_CLASSIC.to_owned()),
        disable_music: state.disable_music,
        display_date: state.display_date,
        audio: state.file.clone(),
    };
    let resp = api.create_video(&job).await?;
    store.set_task_id(resp.task_id);
    Ok(Stage::Processing)
}

/// Deep links into `/processing` without a job in flight bounce home
/// before any network traffic happens.
pub fn processing_guard(state: &FormState) -> Option<Stage> {
    if state.task_id.is_empty() {
        Some(Stage::PhoneInput)
    } else {
        None
    }
}

/// Download entry: confirm the rendered file actually answers before
/// offering it. A dead file ends the session the way a failed render
/// does.
pub async fn verify_download<A, S>(store: &FormStore<S>, api: &A) -> Result<(), Failure>
where
    A: RecapApi + ?Sized,
    S: SnapshotStore,
{
    let state = store.state();
    let query = JobQuery {
        phone: state.full_phone(),
        bereal_token: state.bereal_token.clone(),
    };
    if api.probe_video(&state.video_filename, &query).await.is_err() {
        store.reset();
        return Err(Failure::message(DOWNLOAD_FAILED_MESSAGE));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiFailure;
    use crate::form::{AudioFileMeta, FormStore, MemoryStore};
    use crate::options::CivilDate;
    use crate::testutil::ScriptedApi;
    use recap_api_types::{CreateVideoResponse, RequestOtpResponse, ValidateOtpResponse};

    fn store() -> FormStore<MemoryStore> {
        FormStore::open(MemoryStore::default(), CivilDate::new(2026, 8))
    }

    #[test]
    fn paths_round_trip_and_tolerate_trailing_slashes() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_path(stage.path()), Some(stage));
        }
        assert_eq!(Stage::from_path("/otp/"), Some(Stage::OtpInput));
        assert_eq!(Stage::from_path("/nope"), None);
    }

    #[tokio::test]
    async fn phone_submit_sends_one_concatenated_number() {
        let store = store();
        store.set_country_code("1");
        store.set_phone_number("5551234567");

        let api = ScriptedApi::default();
        api.otp_responses.borrow_mut().push(Ok(RequestOtpResponse {
            otp_session: "sess-1".into(),
        }));

        let next = submit_phone(&store, &api).await.unwrap();
        assert_eq!(next, Stage::OtpInput);
        assert_eq!(api.otp_requests.borrow().as_slice(), ["15551234567"]);
        assert_eq!(store.state().otp_session, "sess-1");
    }

    #[tokio::test]
    async fn phone_submit_rejects_bad_input_without_network() {
        let store = store();
        store.set_country_code("1");
        store.set_phone_number("555-123");

        let api = ScriptedApi::default();
        let err = submit_phone(&store, &api).await.unwrap_err();
        assert_eq!(err, Failure::message(PHONE_INVALID_MESSAGE));
        assert!(api.otp_requests.borrow().is_empty());

        store.set_phone_number("");
        store.set_country_code("44");
        let err = submit_phone(&store, &api).await.unwrap_err();
        assert_eq!(err, Failure::message(PHONE_INVALID_MESSAGE));
        assert!(api.otp_requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn phone_submit_failure_keeps_the_stage_and_session() {
        let store = store();
        store.set_country_code("1");
        store.set_phone_number("5551234567");

        let api = ScriptedApi::default();
        api.otp_responses.borrow_mut().push(Err(ApiFailure::Response {
            status: 400,
            message: Some("Invalid phone number.".into()),
        }));

        let err = submit_phone(&store, &api).await.unwrap_err();
        assert!(matches!(err, Failure::Api(ApiFailure::Response { status: 400, .. })));
        assert_eq!(store.state().otp_session, "");
    }

    #[tokio::test]
    async fn otp_submit_requires_six_digits_locally() {
        let store = store();
        store.set_otp_code("1234");

        let api = ScriptedApi::default();
        let err = submit_otp(&store, &api).await.unwrap_err();
        assert_eq!(err, Failure::message(OTP_LENGTH_MESSAGE));
        assert!(api.validate_requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn otp_submit_stores_both_tokens() {
        let store = store();
        store.set_country_code("1");
        store.set_phone_number("5551234567");
        store.set_otp_session("sess-1");
        store.set_otp_code("123456");

        let api = ScriptedApi::default();
        api.validate_responses
            .borrow_mut()
            .push(Ok(ValidateOtpResponse {
                token: "tok".into(),
                bereal_token: "brt".into(),
            }));

        let next = submit_otp(&store, &api).await.unwrap();
        assert_eq!(next, Stage::Settings);

        let sent = api.validate_requests.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].otp_session, "sess-1");
        assert_eq!(sent[0].otp_code, "123456");
        assert_eq!(sent[0].phone, "15551234567");

        let state = store.state();
        assert_eq!(state.token, "tok");
        assert_eq!(state.bereal_token, "brt");
    }

    #[tokio::test]
    async fn settings_submit_carries_every_job_field() {
        let store = store();
        store.set_country_code("1");
        store.set_phone_number("5551234567");
        store.set_token("tok");
        store.set_disable_music(true);
        store.set_file(Some(AudioFileMeta {
            name: "track.mp3".into(),
            size: 2048,
        }));

        let api = ScriptedApi::default();
        api.video_responses.borrow_mut().push(Ok(CreateVideoResponse {
            task_id: "task-9".into(),
        }));

        let next = submit_settings(&store, &api).await.unwrap();
        assert_eq!(next, Stage::Processing);
        assert_eq!(store.state().task_id, "task-9");

        let sent = api.video_requests.borrow();
        assert_eq!(sent.len(), 1);
        let job = &sent[0];
        assert_eq!(job.phone, "15551234567");
        assert_eq!(job.token, "tok");
        assert_eq!(job.year, "2026");
        assert_eq!(job.mode, options::MODE_CLASSIC);
        assert!(job.disable_music);
        assert!(!job.display_date);
        assert_eq!(job.audio.as_ref().unwrap().name, "track.mp3");
    }

    #[tokio::test]
    async fn settings_submit_defaults_a_missing_mode_to_classic() {
        let store = store();
        store.set_country_code("1");
        store.set_phone_number("5551234567");
        store.set_mode(None);

        let api = ScriptedApi::default();
        api.video_responses.borrow_mut().push(Ok(CreateVideoResponse {
            task_id: "task-1".into(),
        }));

        submit_settings(&store, &api).await.unwrap();
        assert_eq!(api.video_requests.borrow()[0].mode, options::MODE_CLASSIC);
    }

    #[tokio::test]
    async fn settings_submit_requires_a_year() {
        let store = store();
        store.set_year(None);

        let api = ScriptedApi::default();
        let err = submit_settings(&store, &api).await.unwrap_err();
        assert_eq!(err, Failure::message(YEAR_REQUIRED_MESSAGE));
        assert!(api.video_requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn settings_submit_rejects_oversized_audio() {
        let store = store();
        store.set_file(Some(AudioFileMeta {
            name: "huge.mp3".into(),
            size: MAX_AUDIO_BYTES + 1,
        }));

        let api = ScriptedApi::default();
        let err = submit_settings(&store, &api).await.unwrap_err();
        assert_eq!(err, Failure::message(AUDIO_TOO_LARGE_MESSAGE));
        assert!(api.video_requests.borrow().is_empty());
    }

    #[test]
    fn processing_guard_blocks_entry_without_a_task() {
        let store = store();
        assert_eq!(processing_guard(&store.state()), Some(Stage::PhoneInput));

        store.set_task_id("task-9");
        assert_eq!(processing_guard(&store.state()), None);
    }

    #[tokio::test]
    async fn download_verification_passes_credentials_through() {
        let store = store();
        store.set_country_code("1");
        store.set_phone_number("5551234567");
        store.set_bereal_token("brt");
        store.set_video_filename("out.mp4");

        let api = ScriptedApi::default();
        api.probe_responses.borrow_mut().push(Ok(()));

        verify_download(&store, &api).await.unwrap();

        let sent = api.probe_requests.borrow();
        assert_eq!(sent[0].0, "out.mp4");
        assert_eq!(sent[0].1.phone, "15551234567");
        assert_eq!(sent[0].1.bereal_token, "brt");
        assert_eq!(store.state().video_filename, "out.mp4");
    }

    #[tokio::test]
    async fn failed_download_probe_resets_the_session() {
        let store = store();
        store.set_video_filename("out.mp4");
        store.set_task_id("task-9");

        let api = ScriptedApi::default();
        api.probe_responses.borrow_mut().push(Err(ApiFailure::Response {
            status: 404,
            message: None,
        }));

        let err = verify_download(&store, &api).await.unwrap_err();
        assert_eq!(err, Failure::message(DOWNLOAD_FAILED_MESSAGE));

        let state = store.state();
        assert_eq!(state.video_filename, "");
        assert_eq!(state.task_id, "");
    }
}
