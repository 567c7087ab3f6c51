//! The task contract.

use crate::envelope::Envelope;
use crate::status::StatusCode;

/// A discrete unit of work driven by the [`TaskManager`](crate::TaskManager).
///
/// These methods are never called by user code; they are callback hooks the
/// manager invokes at fixed points of the lifecycle:
///
/// - `on_start` — exactly once, before any other hook.
/// - `on_execute` — repeatedly while the task is running.
/// - `is_finished` — polled each tick to decide termination.
/// - `on_pause` / `on_resume` — once per externally requested edge.
/// - `on_complete` — exactly once, as the terminal hook; `interrupted`
///   distinguishes an abort from natural completion.
///
/// Hooks must not block: the runtime is cooperative and assumes every hook
/// returns quickly. A task that wants a deadline enforces it inside
/// `on_execute`.
///
/// The defaults make a task that finishes immediately with an empty result:
/// a unit of work that is all `on_start`. Override `is_finished` (and
/// usually `on_execute` and `on_complete`) for anything longer-lived.
pub trait Task {
    /// Initialize the task. Called exactly once before any other hook.
    fn on_start(&mut self) {}

    /// Execute one increment of work. Called repeatedly while running.
    fn on_execute(&mut self) {}

    /// Decide whether the task has finished its work.
    fn is_finished(&mut self) -> bool {
        true
    }

    /// Finalize the task and produce its result.
    ///
    /// `interrupted` is true when termination came from an abort request
    /// rather than `is_finished`.
    fn on_complete(&mut self, interrupted: bool) -> (Envelope, StatusCode) {
        let _ = interrupted;
        (Envelope::empty(), StatusCode::OK)
    }

    /// React to an externally requested pause.
    fn on_pause(&mut self) {}

    /// React to resuming after a pause.
    fn on_resume(&mut self) {}
}
