//! Polling helper for tokio tasks driven from the frame loop.

use futures::FutureExt;
use tokio::task::JoinHandle;

/// Result of polling a task slot
pub enum PollResult<T> {
    /// The slot holds no task
    NoTask,
    /// Task is still running
    Pending,
    /// Task finished; the inner result is Err on panic/cancellation
    Complete(Result<T, tokio::task::JoinError>),
}

/// Poll an optional task handle, taking ownership of the handle once it
/// has finished. The GUI thread never blocks: a finished task yields its
/// value via `now_or_never()`.
pub fn poll_task<T>(task: &mut Option<JoinHandle<T>>) -> PollResult<T> {
    let Some(handle) = task else {
        return PollResult::NoTask;
    };

    if !handle.is_finished() {
        return PollResult::Pending;
    }

    let handle = task.take().unwrap();
    match handle.now_or_never() {
        Some(result) => PollResult::Complete(result),
        None => {
            // Shouldn't happen since we checked is_finished()
            tracing::warn!("Task not ready despite is_finished()");
            PollResult::Pending
        }
    }
}
