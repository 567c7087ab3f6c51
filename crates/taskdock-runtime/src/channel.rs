//! Result delivery channels.
//!
//! A channel decouples task execution from result handling: the manager
//! calls [`Channel::on_result`] when a task terminates, and never calls it
//! twice for the same task. Where the result goes (over a link, or into an
//! in-process queue) is the channel's business.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use taskdock_wire::Uid;

use crate::envelope::Envelope;
use crate::status::StatusCode;

/// A sink for task results.
pub trait Channel<U: Uid> {
    /// Receive the final result of a task.
    ///
    /// Called by the manager on the tick the task terminates, normally or
    /// by abort, before the task record is destroyed. `initiator_id` is the
    /// device that requested the task, for routing the result back.
    fn on_result(&mut self, initiator_id: u8, uid: U, result: Envelope, code: StatusCode);
}

/// Shared single-threaded handle to a channel.
///
/// The runtime is cooperative and single-threaded, so channels are shared
/// as `Rc<RefCell<..>>` owned by the application's composition root; the
/// manager only holds handles.
pub type ChannelHandle<U> = Rc<RefCell<dyn Channel<U>>>;

/// One delivered task result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult<U> {
    /// Device that initiated the task.
    pub initiator_id: u8,
    /// UID of the task type that produced the result.
    pub uid: U,
    /// The task's result payload.
    pub result: Envelope,
    /// Outcome code reported by the task.
    pub code: StatusCode,
}

/// A channel that buffers results in process.
///
/// The counterpart of the external bridge for locally initiated tasks: the
/// application registers tasks against a `LocalChannel` and drains the
/// buffered results from its main loop.
#[derive(Debug)]
pub struct LocalChannel<U> {
    results: VecDeque<TaskResult<U>>,
}

impl<U: Uid> Default for LocalChannel<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: Uid> LocalChannel<U> {
    /// An empty buffer.
    pub fn new() -> Self {
        Self {
            results: VecDeque::new(),
        }
    }

    /// A shareable handle to a fresh channel.
    pub fn handle() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Number of buffered results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True when nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Pop the oldest buffered result.
    pub fn pop(&mut self) -> Option<TaskResult<U>> {
        self.results.pop_front()
    }

    /// Drain all buffered results, oldest first.
    pub fn drain(&mut self) -> Vec<TaskResult<U>> {
        self.results.drain(..).collect()
    }
}

impl<U: Uid> Channel<U> for LocalChannel<U> {
    fn on_result(&mut self, initiator_id: u8, uid: U, result: Envelope, code: StatusCode) {
        self.results.push_back(TaskResult {
            initiator_id,
            uid,
            result,
            code,
        });
    }
}
