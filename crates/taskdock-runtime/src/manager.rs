//! The task manager: registration, state transitions, and the update tick.

use tracing::{debug, trace};

use taskdock_wire::Uid;

use crate::channel::ChannelHandle;
use crate::envelope::EnvelopeView;
use crate::registry::TaskRegistry;
use crate::state::State;
use crate::status::StatusCode;
use crate::task::Task;

/// Everything the manager needs to drive one task and deliver its result.
struct TaskRecord<U: Uid> {
    task: Box<dyn Task>,
    state: State,
    /// Device that initiated the task; results route back to it.
    initiator_id: u8,
    uid: U,
    channel: ChannelHandle<U>,
}

/// Orchestrates task lifecycles over a frozen [`TaskRegistry`].
///
/// The manager owns every live task from registration until the tick that
/// delivers its final result. Public operations return a [`StatusCode`]
/// synchronously and never touch the channel; only task outcomes ride the
/// channel. One [`update`](TaskManager::update) call advances every task by
/// at most one lifecycle step, in registration order, then reaps terminated
/// records.
pub struct TaskManager<U: Uid> {
    registry: TaskRegistry<U>,
    tasks: Vec<TaskRecord<U>>,
    max_tasks: Option<usize>,
}

impl<U: Uid> TaskManager<U> {
    /// Build a manager over `registry`, freezing it if it is not yet frozen.
    pub fn new(registry: TaskRegistry<U>) -> Self {
        Self::with_capacity(registry, None)
    }

    /// Build a manager with a cap on concurrently live tasks.
    ///
    /// Registration beyond the cap returns
    /// [`StatusCode::TASK_LIMIT_REACHED`]. `None` means unbounded.
    pub fn with_capacity(mut registry: TaskRegistry<U>, max_tasks: Option<usize>) -> Self {
        registry.freeze();
        Self {
            registry,
            tasks: Vec::new(),
            max_tasks,
        }
    }

    /// Number of currently live tasks.
    pub fn active_len(&self) -> usize {
        self.tasks.len()
    }

    /// True when a live task with this UID exists.
    pub fn is_registered(&self, uid: U) -> bool {
        self.tasks.iter().any(|record| record.uid == uid)
    }

    /// Instantiate a task and enroll it for execution.
    ///
    /// `origin` receives the task's final result; `initiator_id` is echoed
    /// back with it. The new record starts idle and takes its first
    /// lifecycle step on the next tick.
    pub fn register_task(
        &mut self,
        origin: ChannelHandle<U>,
        initiator_id: u8,
        uid: U,
        params: EnvelopeView<'_>,
    ) -> StatusCode {
        if self.is_registered(uid) {
            return StatusCode::DUPLICATE_TASK;
        }
        let Some(make) = self.registry.find(uid.to_wire()) else {
            return StatusCode::TASK_UNKNOWN;
        };
        if let Some(max) = self.max_tasks {
            if self.tasks.len() >= max {
                return StatusCode::TASK_LIMIT_REACHED;
            }
        }

        debug!(uid = uid.to_wire(), initiator_id, "registering task");
        self.tasks.push(TaskRecord {
            task: make(params),
            state: State::default(),
            initiator_id,
            uid,
            channel: origin,
        });
        StatusCode::OK
    }

    /// Request a pause of the named task.
    pub fn pause_task(&mut self, uid: U) -> StatusCode {
        let Some(record) = self.find_mut(uid) else {
            return StatusCode::TASK_NOT_REGISTERED;
        };
        if record.state.is_finished() {
            return StatusCode::TASK_ALREADY_FINISHED;
        }
        if record.state.is_aborted() {
            return StatusCode::TASK_ALREADY_ABORTED;
        }
        if record.state.is_paused() {
            return StatusCode::TASK_ALREADY_PAUSED;
        }
        if !record.state.is_started() {
            return StatusCode::TASK_NOT_RUNNING;
        }
        record.state.set_paused();
        StatusCode::OK
    }

    /// Request a resume of the named task.
    pub fn resume_task(&mut self, uid: U) -> StatusCode {
        let Some(record) = self.find_mut(uid) else {
            return StatusCode::TASK_NOT_REGISTERED;
        };
        if record.state.is_finished() {
            return StatusCode::TASK_ALREADY_FINISHED;
        }
        if record.state.is_aborted() {
            return StatusCode::TASK_ALREADY_ABORTED;
        }
        if !record.state.is_paused() {
            if record.state.is_resumed() {
                return StatusCode::TASK_ALREADY_RESUMED;
            }
            return StatusCode::TASK_ALREADY_RUNNING;
        }
        record.state.set_resumed();
        StatusCode::OK
    }

    /// Request an abort of the named task.
    ///
    /// Sticky and cooperative: the task keeps existing until the next tick
    /// runs its completion hook with `interrupted = true`.
    pub fn abort_task(&mut self, uid: U) -> StatusCode {
        let Some(record) = self.find_mut(uid) else {
            return StatusCode::TASK_NOT_REGISTERED;
        };
        if record.state.is_finished() {
            return StatusCode::TASK_ALREADY_FINISHED;
        }
        if record.state.is_aborted() {
            return StatusCode::TASK_ALREADY_ABORTED;
        }
        record.state.set_aborted();
        StatusCode::OK
    }

    /// Advance every task by one lifecycle step and reap terminated records.
    ///
    /// Per record, the first matching clause applies:
    /// 1. just registered — start (falls through to the termination checks,
    ///    so a single-shot task starts and completes in one tick, with no
    ///    `on_execute` in between);
    /// 2. aborted — complete interrupted, deliver, reap;
    /// 3. finished — complete, deliver, reap;
    /// 4. pause edge — `on_pause`, go dormant;
    /// 5. resume edge — `on_resume`, go active;
    /// 6. running — `on_execute`.
    pub fn update(&mut self) {
        let mut reap = vec![false; self.tasks.len()];

        for (index, record) in self.tasks.iter_mut().enumerate() {
            // A just-registered record starts here and falls through only to
            // the termination checks: a single-shot task completes in this
            // same tick, without an on_execute in between.
            let fresh = record.state.is_idle() && !record.state.is_started();
            if fresh {
                record.state.set_running().set_started();
                record.task.on_start();
            }

            if record.state.is_aborted() {
                trace!(uid = record.uid.to_wire(), "task aborted");
                Self::complete(record, true);
                reap[index] = true;
                continue;
            }
            if record.task.is_finished() {
                trace!(uid = record.uid.to_wire(), "task finished");
                record.state.set_finished();
                Self::complete(record, false);
                reap[index] = true;
                continue;
            }
            if fresh {
                continue;
            }

            if record.state.is_paused() && record.state.is_running() {
                record.task.on_pause();
                record.state.set_idle();
                continue;
            }
            if record.state.is_resumed() && record.state.is_idle() {
                record.task.on_resume();
                record.state.set_running();
                continue;
            }
            if record.state.is_running() {
                record.task.on_execute();
            }
        }

        let mut index = 0;
        self.tasks.retain(|_| {
            let keep = !reap[index];
            index += 1;
            keep
        });
    }

    /// Run the terminal hook and deliver the result to the originating
    /// channel. Called at most once per record.
    fn complete(record: &mut TaskRecord<U>, interrupted: bool) {
        let (result, code) = record.task.on_complete(interrupted);
        debug!(
            uid = record.uid.to_wire(),
            initiator_id = record.initiator_id,
            code = code.as_u8(),
            interrupted,
            "delivering task result"
        );
        record
            .channel
            .borrow_mut()
            .on_result(record.initiator_id, record.uid, result, code);
    }

    fn find_mut(&mut self, uid: U) -> Option<&mut TaskRecord<U>> {
        self.tasks.iter_mut().find(|record| record.uid == uid)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::channel::{LocalChannel, TaskResult};
    use crate::envelope::Envelope;

    use super::*;

    // Hook journal shared through a thread-local so fn-pointer constructors
    // can reach it.
    thread_local! {
        static EVENTS: RefCell<Vec<(u64, &'static str)>> = const { RefCell::new(Vec::new()) };
    }

    fn log(uid: u64, event: &'static str) {
        EVENTS.with(|events| events.borrow_mut().push((uid, event)));
    }

    fn take_events() -> Vec<(u64, &'static str)> {
        EVENTS.with(|events| events.borrow_mut().drain(..).collect())
    }

    fn events_for(uid: u64) -> Vec<&'static str> {
        EVENTS.with(|events| {
            events
                .borrow()
                .iter()
                .filter(|(id, _)| *id == uid)
                .map(|(_, event)| *event)
                .collect()
        })
    }

    /// Runs until aborted; journals every hook.
    struct Probe {
        uid: u64,
    }

    impl Task for Probe {
        fn on_start(&mut self) {
            log(self.uid, "start");
        }

        fn on_execute(&mut self) {
            log(self.uid, "execute");
        }

        fn is_finished(&mut self) -> bool {
            false
        }

        fn on_complete(&mut self, interrupted: bool) -> (Envelope, StatusCode) {
            log(self.uid, if interrupted { "complete_interrupted" } else { "complete" });
            (
                Envelope::from(vec![0xAA]),
                if interrupted {
                    StatusCode::TASK_ABORTED
                } else {
                    StatusCode::TASK_FINISHED
                },
            )
        }

        fn on_pause(&mut self) {
            log(self.uid, "pause");
        }

        fn on_resume(&mut self) {
            log(self.uid, "resume");
        }
    }

    /// Finishes on the first poll.
    struct OneShot;

    impl Task for OneShot {
        fn on_start(&mut self) {
            log(ONESHOT_UID as u64, "start");
        }

        fn on_execute(&mut self) {
            log(ONESHOT_UID as u64, "execute");
        }

        fn on_complete(&mut self, _interrupted: bool) -> (Envelope, StatusCode) {
            log(ONESHOT_UID as u64, "complete");
            (Envelope::from(vec![1, 2]), StatusCode::TASK_FINISHED)
        }
    }

    /// Finishes after as many executes as the first parameter byte.
    struct Countdown {
        remaining: u8,
    }

    impl Task for Countdown {
        fn on_execute(&mut self) {
            self.remaining = self.remaining.saturating_sub(1);
        }

        fn is_finished(&mut self) -> bool {
            self.remaining == 0
        }

        fn on_complete(&mut self, _interrupted: bool) -> (Envelope, StatusCode) {
            (Envelope::empty(), StatusCode::TASK_FINISHED)
        }
    }

    const PROBE_UID: u8 = 0x01;
    const ONESHOT_UID: u8 = 0x02;
    const COUNTDOWN_UID: u8 = 0x03;

    fn registry() -> TaskRegistry<u8> {
        let mut registry = TaskRegistry::new();
        registry
            .register(PROBE_UID, |_params| {
                Box::new(Probe {
                    uid: PROBE_UID as u64,
                })
            })
            .unwrap();
        registry
            .register(ONESHOT_UID, |_params| Box::new(OneShot))
            .unwrap();
        registry
            .register(COUNTDOWN_UID, |params| {
                Box::new(Countdown {
                    remaining: params.data().first().copied().unwrap_or(0),
                })
            })
            .unwrap();
        registry
    }

    fn manager() -> (TaskManager<u8>, Rc<RefCell<LocalChannel<u8>>>) {
        take_events();
        (TaskManager::new(registry()), LocalChannel::handle())
    }

    fn register(
        manager: &mut TaskManager<u8>,
        channel: &Rc<RefCell<LocalChannel<u8>>>,
        uid: u8,
        params: &[u8],
    ) -> StatusCode {
        manager.register_task(channel.clone(), 0x7A, uid, EnvelopeView::new(params))
    }

    fn results(channel: &Rc<RefCell<LocalChannel<u8>>>) -> Vec<TaskResult<u8>> {
        channel.borrow_mut().drain()
    }

    #[test]
    fn unknown_uid_is_rejected() {
        let (mut manager, channel) = manager();
        let code = register(&mut manager, &channel, 0x7F, &[]);
        assert_eq!(code, StatusCode::TASK_UNKNOWN);
        assert_eq!(manager.active_len(), 0);
    }

    #[test]
    fn one_shot_task_starts_and_completes_in_one_tick() {
        let (mut manager, channel) = manager();
        assert_eq!(register(&mut manager, &channel, ONESHOT_UID, &[]), StatusCode::OK);
        assert_eq!(manager.active_len(), 1);

        manager.update();

        // No on_execute on a same-tick finish.
        assert_eq!(events_for(ONESHOT_UID as u64), vec!["start", "complete"]);
        assert_eq!(manager.active_len(), 0);

        let delivered = results(&channel);
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].initiator_id, 0x7A);
        assert_eq!(delivered[0].uid, ONESHOT_UID);
        assert_eq!(delivered[0].code, StatusCode::TASK_FINISHED);
        assert_eq!(delivered[0].result.data(), &[1, 2]);
    }

    #[test]
    fn long_running_task_executes_every_tick() {
        let (mut manager, channel) = manager();
        register(&mut manager, &channel, PROBE_UID, &[]);

        manager.update();
        manager.update();
        manager.update();

        assert_eq!(
            events_for(PROBE_UID as u64),
            vec!["start", "execute", "execute"]
        );
        assert!(results(&channel).is_empty());
    }

    #[test]
    fn countdown_finishes_after_its_budget() {
        let (mut manager, channel) = manager();
        register(&mut manager, &channel, COUNTDOWN_UID, &[2]);

        manager.update(); // start; no execute on the start tick
        assert_eq!(manager.active_len(), 1);
        manager.update(); // execute (2 -> 1)
        manager.update(); // execute (1 -> 0)
        assert_eq!(manager.active_len(), 1);
        manager.update(); // observed finished
        assert_eq!(manager.active_len(), 0);

        let delivered = results(&channel);
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].code, StatusCode::TASK_FINISHED);
    }

    #[test]
    fn duplicate_registration_makes_no_observable_change() {
        let (mut manager, channel) = manager();
        assert_eq!(register(&mut manager, &channel, PROBE_UID, &[]), StatusCode::OK);
        assert_eq!(
            register(&mut manager, &channel, PROBE_UID, &[]),
            StatusCode::DUPLICATE_TASK
        );
        assert_eq!(manager.active_len(), 1);

        manager.update();
        assert_eq!(events_for(PROBE_UID as u64), vec!["start"]);
    }

    #[test]
    fn capacity_cap_rejects_registration() {
        take_events();
        let mut manager = TaskManager::with_capacity(registry(), Some(1));
        let channel = LocalChannel::handle();

        assert_eq!(register(&mut manager, &channel, PROBE_UID, &[]), StatusCode::OK);
        assert_eq!(
            register(&mut manager, &channel, COUNTDOWN_UID, &[1]),
            StatusCode::TASK_LIMIT_REACHED
        );
        assert_eq!(manager.active_len(), 1);

        // An unknown uid is reported as such even at capacity.
        assert_eq!(
            register(&mut manager, &channel, 0x7F, &[]),
            StatusCode::TASK_UNKNOWN
        );

        // Reaping frees capacity.
        manager.abort_task(PROBE_UID);
        manager.update();
        assert_eq!(
            register(&mut manager, &channel, COUNTDOWN_UID, &[1]),
            StatusCode::OK
        );
    }

    #[test]
    fn abort_completes_interrupted_on_next_tick() {
        let (mut manager, channel) = manager();
        register(&mut manager, &channel, PROBE_UID, &[]);
        manager.update(); // start
        manager.update(); // execute

        assert_eq!(manager.abort_task(PROBE_UID), StatusCode::OK);
        assert_eq!(manager.active_len(), 1); // cooperative: still resident

        manager.update();
        assert_eq!(manager.active_len(), 0);
        assert_eq!(
            events_for(PROBE_UID as u64),
            vec!["start", "execute", "complete_interrupted"]
        );

        let delivered = results(&channel);
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].code, StatusCode::TASK_ABORTED);
    }

    #[test]
    fn abort_before_first_tick_still_starts_the_task() {
        let (mut manager, channel) = manager();
        register(&mut manager, &channel, PROBE_UID, &[]);
        assert_eq!(manager.abort_task(PROBE_UID), StatusCode::OK);

        manager.update();

        // on_start precedes the interrupted completion; no execute between.
        assert_eq!(
            events_for(PROBE_UID as u64),
            vec!["start", "complete_interrupted"]
        );
        assert_eq!(results(&channel).len(), 1);
    }

    #[test]
    fn pause_and_resume_edges_fire_once_each() {
        let (mut manager, channel) = manager();
        register(&mut manager, &channel, PROBE_UID, &[]);
        manager.update(); // start
        manager.update(); // execute

        assert_eq!(manager.pause_task(PROBE_UID), StatusCode::OK);
        manager.update(); // pause edge
        manager.update(); // dormant
        manager.update(); // dormant

        assert_eq!(manager.resume_task(PROBE_UID), StatusCode::OK);
        manager.update(); // resume edge
        manager.update(); // executing again

        assert_eq!(
            events_for(PROBE_UID as u64),
            vec!["start", "execute", "pause", "resume", "execute"]
        );
    }

    #[test]
    fn pause_rejections() {
        let (mut manager, channel) = manager();
        assert_eq!(manager.pause_task(PROBE_UID), StatusCode::TASK_NOT_REGISTERED);

        register(&mut manager, &channel, PROBE_UID, &[]);
        // Never started yet.
        assert_eq!(manager.pause_task(PROBE_UID), StatusCode::TASK_NOT_RUNNING);

        manager.update();
        assert_eq!(manager.pause_task(PROBE_UID), StatusCode::OK);
        assert_eq!(manager.pause_task(PROBE_UID), StatusCode::TASK_ALREADY_PAUSED);

        // Pause on an aborted-but-unreaped task.
        manager.update();
        assert_eq!(manager.resume_task(PROBE_UID), StatusCode::OK);
        assert_eq!(manager.abort_task(PROBE_UID), StatusCode::OK);
        assert_eq!(manager.pause_task(PROBE_UID), StatusCode::TASK_ALREADY_ABORTED);
    }

    #[test]
    fn resume_rejections() {
        let (mut manager, channel) = manager();
        assert_eq!(manager.resume_task(PROBE_UID), StatusCode::TASK_NOT_REGISTERED);

        register(&mut manager, &channel, PROBE_UID, &[]);
        manager.update();

        // Running, never paused.
        assert_eq!(manager.resume_task(PROBE_UID), StatusCode::TASK_ALREADY_RUNNING);

        manager.pause_task(PROBE_UID);
        manager.update();
        assert_eq!(manager.resume_task(PROBE_UID), StatusCode::OK);
        assert_eq!(manager.resume_task(PROBE_UID), StatusCode::TASK_ALREADY_RESUMED);

        manager.abort_task(PROBE_UID);
        assert_eq!(manager.resume_task(PROBE_UID), StatusCode::TASK_ALREADY_ABORTED);
    }

    #[test]
    fn abort_rejections() {
        let (mut manager, channel) = manager();
        assert_eq!(manager.abort_task(PROBE_UID), StatusCode::TASK_NOT_REGISTERED);

        register(&mut manager, &channel, PROBE_UID, &[]);
        manager.update();
        assert_eq!(manager.abort_task(PROBE_UID), StatusCode::OK);
        assert_eq!(manager.abort_task(PROBE_UID), StatusCode::TASK_ALREADY_ABORTED);
    }

    #[test]
    fn paused_task_skips_execute_but_can_be_aborted() {
        let (mut manager, channel) = manager();
        register(&mut manager, &channel, PROBE_UID, &[]);
        manager.update(); // start
        manager.pause_task(PROBE_UID);
        manager.update(); // pause edge
        take_events();

        manager.update();
        manager.update();
        assert!(events_for(PROBE_UID as u64).is_empty()); // dormant

        manager.abort_task(PROBE_UID);
        manager.update();
        assert_eq!(events_for(PROBE_UID as u64), vec!["complete_interrupted"]);
        assert_eq!(results(&channel).len(), 1);
    }

    #[test]
    fn records_are_processed_in_insertion_order() {
        let (mut manager, channel) = manager();
        register(&mut manager, &channel, ONESHOT_UID, &[]);
        register(&mut manager, &channel, COUNTDOWN_UID, &[0]);

        manager.update();

        let delivered = results(&channel);
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0].uid, ONESHOT_UID);
        assert_eq!(delivered[1].uid, COUNTDOWN_UID);
    }

    #[test]
    fn live_uids_stay_distinct_under_churn() {
        let (mut manager, channel) = manager();
        register(&mut manager, &channel, PROBE_UID, &[]);
        register(&mut manager, &channel, COUNTDOWN_UID, &[3]);

        for _ in 0..5 {
            assert_eq!(
                register(&mut manager, &channel, PROBE_UID, &[]),
                StatusCode::DUPLICATE_TASK
            );
            manager.update();
        }

        // Countdown reaped; its slot is reusable, the probe's is not.
        assert!(manager.is_registered(PROBE_UID));
        assert!(!manager.is_registered(COUNTDOWN_UID));
        assert_eq!(register(&mut manager, &channel, COUNTDOWN_UID, &[1]), StatusCode::OK);
    }

    #[test]
    fn result_is_delivered_before_the_record_is_destroyed() {
        let (mut manager, channel) = manager();
        register(&mut manager, &channel, ONESHOT_UID, &[]);
        manager.update();

        // Exactly one delivery, never a second.
        manager.update();
        manager.update();
        assert_eq!(results(&channel).len(), 1);
    }
}
