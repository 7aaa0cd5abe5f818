use crate::api::{JobQuery, RecapApi};
use crate::error::{ApiFailure, Failure};
use crate::form::{FormStore, SnapshotStore};
use crate::stage::Stage;
use recap_api_types::JobState;

pub const POLL_INTERVAL_MS: u32 = 60_000;
pub const MAX_CONSECUTIVE_ERRORS: u32 = 3;

pub const VIDEO_FAILED_MESSAGE: &str = "Failed to generate video. Try again later.";

/// Counts consecutive error statuses from the job endpoint. A healthy
/// response resets it; transport blips leave it untouched.
#[derive(Debug, Default)]
pub struct PollTracker {
    consecutive_errors: u32,
}

impl PollTracker {
    /// True once the error bound is reached.
    pub fn record_error(&mut self) -> bool {
        self.consecutive_errors += 1;
        self.consecutive_errors >= MAX_CONSECUTIVE_ERRORS
    }

    pub fn record_ok(&mut self) {
        self.consecutive_errors = 0;
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }
}

/// What the processing screen should do after one status probe.
#[derive(Debug, Clone, PartialEq)]
pub enum PollTick {
    /// Still rendering, or a failure worth retrying. Probe again next
    /// interval.
    Continue,
    /// Result filename stored; move along.
    Finished(Stage),
    /// Session reset; surface the failure and start over.
    Abort { failure: Failure, target: Stage },
}

fn abort() -> PollTick {
    PollTick::Abort {
        failure: Failure::message(VIDEO_FAILED_MESSAGE),
        target: Stage::PhoneInput,
    }
}

pub async fn poll_job<A, S>(store: &FormStore<S>, api: &A, tracker: &mut PollTracker) -> PollTick
where
    A: RecapApi + ?Sized,
    S: SnapshotStore,
{
    let state = store.state();
    let query = JobQuery {
        phone: state.full_phone(),
        bereal_token: state.bereal_token.clone(),
    };

    let resp = match api.job_status(&state.task_id, &query).await {
        Ok(resp) => resp,
        Err(ApiFailure::Response { .. }) => {
            if tracker.record_error() {
                store.reset();
                return abort();
            }
            return PollTick::Continue;
        }
        // Dropped connections are not the service saying no; retry
        // without touching the counter.
        Err(_) => return PollTick::Continue,
    };

    tracker.record_ok();
    match resp.state() {
        JobState::InProgress => PollTick::Continue,
        JobState::Success => {
            store.set_video_filename(resp.result.unwrap_or_default());
            PollTick::Finished(Stage::Download)
        }
        JobState::Failure => {
            store.reset();
            abort()
        }
    }
}
