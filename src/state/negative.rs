//! Negative-prompt enhancement state.
//!
//! Two triggers share the same dispatch path: the debounce timer that runs
//! one second after the prompt stops changing, and the manual Regenerate
//! button. Requests are not deduplicated, so several may be in flight at
//! once. Each dispatch carries a sequence number and a completion is only
//! applied when its number beats every previously applied one; responses
//! that lose the race are discarded instead of overwriting newer text.

use std::time::{Duration, Instant};

use eframe::egui;
use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::backend::{BackendClient, BackendError};
use crate::debounce::Debouncer;
use crate::state::{BackendStatus, StateEvent};

/// Quiet period between the last prompt edit and the automatic request
const DEBOUNCE_QUIET: Duration = Duration::from_millis(1000);

/// Negative-prompt field state
pub struct NegativePromptState {
    /// Current field text; either user-edited or backend-suggested
    pub text: String,
    /// Whether any request is still in flight
    pub loading: bool,
    /// Field-level error from the last settled request
    pub error: Option<String>,
    /// Timer driving the automatic trigger
    debouncer: Debouncer,
    /// Sequence number handed to the next dispatch
    next_seq: u64,
    /// Highest sequence number applied so far
    applied_seq: Option<u64>,
    /// In-flight requests, each tagged with its sequence number
    tasks: Vec<JoinHandle<(u64, Result<String, BackendError>)>>,
}

impl Default for NegativePromptState {
    fn default() -> Self {
        Self {
            text: String::new(),
            loading: false,
            error: None,
            debouncer: Debouncer::new(DEBOUNCE_QUIET),
            next_seq: 0,
            applied_seq: None,
            tasks: Vec::new(),
        }
    }
}

impl NegativePromptState {
    /// Called on every prompt edit. An empty prompt disarms the timer;
    /// anything else (re)arms it.
    pub fn on_prompt_edited(&mut self, prompt: &str, now: Instant) {
        if prompt.trim().is_empty() {
            self.debouncer.cancel();
        } else {
            self.debouncer.schedule(now);
        }
    }

    /// Fire the debounced request if the quiet period has elapsed.
    ///
    /// Gated on `Offline` only: a prompt typed while the health probe is
    /// still resolving triggers optimistically, matching the submission
    /// behavior users see in practice (the request simply fails if the
    /// backend turns out to be down).
    pub fn maybe_fire(
        &mut self,
        prompt: &str,
        status: BackendStatus,
        client: &BackendClient,
        now: Instant,
    ) -> Option<StateEvent> {
        if !self.debouncer.ready(now) {
            return None;
        }
        if prompt.trim().is_empty() || status == BackendStatus::Offline {
            return None;
        }
        Some(self.dispatch(prompt, client))
    }

    /// Whether the debounce timer is armed
    pub fn debounce_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Dispatch a request for the given prompt (debounce and Regenerate
    /// both land here)
    pub fn dispatch(&mut self, prompt: &str, client: &BackendClient) -> StateEvent {
        let seq = self.begin();

        let prompt = prompt.to_string();
        let client = client.clone();
        self.tasks.push(tokio::spawn(async move {
            (seq, client.generate_negative_prompt(&prompt).await)
        }));

        StateEvent::StatusMessage("Generating negative prompt...".to_string())
    }

    /// Allocate the next sequence number and mark the field loading
    fn begin(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.loading = true;
        self.error = None;
        seq
    }

    /// Fold one settled request into the field. Returns an event when the
    /// result was applied, None when it was stale.
    fn apply(&mut self, seq: u64, result: Result<String, BackendError>) -> Option<StateEvent> {
        if self.applied_seq.is_some_and(|applied| seq <= applied) {
            tracing::debug!("Discarding stale negative-prompt response (seq {})", seq);
            return None;
        }
        self.applied_seq = Some(seq);

        match result {
            Ok(text) => {
                self.text = text;
                self.error = None;
                Some(StateEvent::LogInfo("Negative prompt updated".to_string()))
            }
            Err(e) => {
                let msg = e.to_string();
                self.error = Some(msg.clone());
                Some(StateEvent::LogError(format!(
                    "Negative prompt generation failed: {}",
                    msg
                )))
            }
        }
    }

    /// Poll in-flight requests for completion
    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();

        let mut pending = Vec::new();
        for mut task in std::mem::take(&mut self.tasks) {
            if !task.is_finished() {
                pending.push(task);
                continue;
            }
            match (&mut task).now_or_never() {
                Some(Ok((seq, result))) => {
                    if let Some(event) = self.apply(seq, result) {
                        events.push(event);
                    }
                }
                Some(Err(e)) => {
                    events.push(StateEvent::LogError(format!(
                        "Negative prompt task panicked: {}",
                        e
                    )));
                }
                None => {
                    tracing::warn!("Task not ready despite is_finished()");
                    pending.push(task);
                }
            }
        }
        self.tasks = pending;

        if self.tasks.is_empty() {
            self.loading = false;
        } else {
            ctx.request_repaint();
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_the_latest_result() {
        let mut state = NegativePromptState::default();
        let seq = state.begin();

        let event = state.apply(seq, Ok("blurry, extra limbs".to_string()));
        assert!(event.is_some());
        assert_eq!(state.text, "blurry, extra limbs");
        assert!(state.error.is_none());
    }

    #[test]
    fn discards_stale_results() {
        // Two requests in flight; the newer one settles first
        let mut state = NegativePromptState::default();
        let first = state.begin();
        let second = state.begin();

        state.apply(second, Ok("newer".to_string()));
        let event = state.apply(first, Ok("older".to_string()));

        assert!(event.is_none());
        assert_eq!(state.text, "newer");
    }

    #[test]
    fn stale_error_does_not_clobber_applied_text() {
        let mut state = NegativePromptState::default();
        let first = state.begin();
        let second = state.begin();

        state.apply(second, Ok("kept".to_string()));
        state.apply(first, Err(BackendError::NotJson));

        assert_eq!(state.text, "kept");
        assert!(state.error.is_none());
    }

    #[test]
    fn failed_request_surfaces_field_error() {
        let mut state = NegativePromptState::default();
        let seq = state.begin();

        state.apply(seq, Err(BackendError::Rejected("boom".to_string())));

        assert_eq!(state.error.as_deref(), Some("boom"));
        assert!(state.text.is_empty());
    }

    #[test]
    fn empty_prompt_disarms_the_timer() {
        let mut state = NegativePromptState::default();
        let now = Instant::now();

        state.on_prompt_edited("a fox", now);
        state.on_prompt_edited("   ", now + Duration::from_millis(100));

        // Even well past the quiet period nothing is ready
        let client = BackendClient::new("http://localhost:8000").unwrap();
        let fired = state.maybe_fire(
            "   ",
            BackendStatus::Online,
            &client,
            now + Duration::from_secs(10),
        );
        assert!(fired.is_none());
    }

    #[test]
    fn offline_backend_suppresses_the_trigger() {
        let mut state = NegativePromptState::default();
        let now = Instant::now();

        state.on_prompt_edited("a fox", now);
        let fired = state.maybe_fire(
            "a fox",
            BackendStatus::Offline,
            &client_for_tests(),
            now + Duration::from_secs(2),
        );
        assert!(fired.is_none());
        // The timer has fired and disarmed; it must not trigger later either
        let fired = state.maybe_fire(
            "a fox",
            BackendStatus::Online,
            &client_for_tests(),
            now + Duration::from_secs(3),
        );
        assert!(fired.is_none());
    }

    fn client_for_tests() -> BackendClient {
        BackendClient::new("http://localhost:8000").unwrap()
    }
}
