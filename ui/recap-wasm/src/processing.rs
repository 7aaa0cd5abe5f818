//! Processing stage: poll the render job until it settles.

use crate::api::HttpApi;
use crate::dom::{self, Elements};
use crate::{error, router, store};
use gloo_timers::future::TimeoutFuture;
use recap_core::poll::{self, PollTick, PollTracker};
use recap_core::stage;
use wasm_bindgen_futures::spawn_local;

const PROCESSING_NOTE: &str = "Hang tight, this can take a few minutes.";

pub fn on_enter(els: &Elements, epoch: u64) {
    // Landing here without a job (deep link, stale reload) goes back
    // to the start instead of polling nothing.
    if let Some(target) = stage::processing_guard(&store::form().state()) {
        router::navigate(target);
        return;
    }
    dom::set_text(&els.processing_note, PROCESSING_NOTE);
    spawn_local(run(epoch));
}

async fn run(epoch: u64) {
    let mut tracker = PollTracker::default();
    loop {
        if router::current_epoch() != epoch {
            return;
        }
        let form = store::form();
        let tick = poll::poll_job(form.as_ref(), &HttpApi, &mut tracker).await;
        if router::current_epoch() != epoch {
            return;
        }
        match tick {
            PollTick::Continue => {}
            PollTick::Finished(next) => {
                router::navigate(next);
                return;
            }
            PollTick::Abort { failure, target } => {
                error::set_and_navigate(failure, poll::VIDEO_FAILED_MESSAGE, target);
                return;
            }
        }
        TimeoutFuture::new(poll::POLL_INTERVAL_MS).await;
    }
}
