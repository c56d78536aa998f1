//! Backend availability state

use eframe::egui;
use tokio::task::JoinHandle;

use crate::backend::BackendClient;
use crate::state::StateEvent;
use crate::task::{PollResult, poll_task};

/// Availability of the backend as last observed.
///
/// Transitions once per probe: `Checking` to either `Online` or `Offline`.
/// There is no periodic re-check; the status stays put until the user
/// retries from the offline banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Checking,
    Online,
    Offline,
}

/// Health probe state
pub struct HealthState {
    /// Last observed backend availability
    pub status: BackendStatus,
    /// In-flight probe task
    task: Option<JoinHandle<bool>>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            status: BackendStatus::Checking,
            task: None,
        }
    }
}

impl HealthState {
    /// Start a probe. A probe already in flight is left alone.
    pub fn start(&mut self, client: &BackendClient) -> Option<StateEvent> {
        if self.task.is_some() {
            return None;
        }

        self.status = BackendStatus::Checking;

        let base_url = client.base_url().to_string();
        let client = client.clone();
        self.task = Some(tokio::spawn(async move { client.check_health().await }));

        Some(StateEvent::StatusMessage(format!(
            "Checking backend at {}...",
            base_url
        )))
    }

    /// Poll the probe task for completion
    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();

        match poll_task(&mut self.task) {
            PollResult::Complete(Ok(true)) => {
                self.status = BackendStatus::Online;
                events.push(StateEvent::LogInfo("Backend is online".to_string()));
                events.push(StateEvent::StatusMessage("Backend online".to_string()));
            }
            PollResult::Complete(Ok(false)) => {
                self.status = BackendStatus::Offline;
                events.push(StateEvent::LogError("Backend health check failed".to_string()));
                events.push(StateEvent::StatusMessage("Backend offline".to_string()));
            }
            PollResult::Complete(Err(e)) => {
                self.status = BackendStatus::Offline;
                events.push(StateEvent::LogError(format!("Health probe panicked: {}", e)));
            }
            PollResult::Pending => ctx.request_repaint(),
            PollResult::NoTask => {}
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_checking_state() {
        let state = HealthState::default();
        assert_eq!(state.status, BackendStatus::Checking);
    }

    #[tokio::test]
    async fn probe_against_dead_server_resolves_offline() {
        // Free port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = BackendClient::new(base).unwrap();
        let mut state = HealthState::default();
        state.start(&client);

        // Wait for the spawned probe to settle, then poll
        for _ in 0..200 {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            let ctx = egui::Context::default();
            state.poll(&ctx);
            if state.status != BackendStatus::Checking {
                break;
            }
        }
        assert_eq!(state.status, BackendStatus::Offline);
    }
}
