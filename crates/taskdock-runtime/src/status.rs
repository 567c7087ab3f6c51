//! The unified status space used in packets and API returns.
//!
//! A status is one byte, partitioned by range: manager/API codes in
//! `0x00..=0x1F`, task/runtime codes in `0x20..=0x6F`, and user-defined
//! codes from [`StatusCode::CUSTOM_BASE`] up. The open-ended custom range is
//! why this is a newtype over `u8` rather than a closed enum: any byte off
//! the wire is a representable status.

/// One-byte status code.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u8);

impl StatusCode {
    // Manager/API status codes (0x00..=0x1F).

    /// General success.
    pub const OK: StatusCode = StatusCode(0x00);
    /// Operated on a task that is not registered.
    pub const TASK_NOT_REGISTERED: StatusCode = StatusCode(0x01);
    /// Start/resume requested but the task is already running.
    pub const TASK_ALREADY_RUNNING: StatusCode = StatusCode(0x02);
    /// Pause requested but the task is already paused.
    pub const TASK_ALREADY_PAUSED: StatusCode = StatusCode(0x03);
    /// Resume requested but the task is already marked resumed.
    pub const TASK_ALREADY_RESUMED: StatusCode = StatusCode(0x04);
    /// Resume requested but the task is not paused.
    pub const TASK_NOT_PAUSED: StatusCode = StatusCode(0x05);
    /// Pause requested but the task is not running.
    pub const TASK_NOT_RUNNING: StatusCode = StatusCode(0x06);
    /// Illegal state change for the current task state.
    pub const INVALID_STATE_TRANSITION: StatusCode = StatusCode(0x07);
    /// Operation invalid: the task already finished.
    pub const TASK_ALREADY_FINISHED: StatusCode = StatusCode(0x08);
    /// Operation invalid: the task was already aborted.
    pub const TASK_ALREADY_ABORTED: StatusCode = StatusCode(0x09);
    /// Initiator not authorized for this operation.
    pub const PERMISSION_DENIED: StatusCode = StatusCode(0x0A);
    /// Unsafe or forbidden in the current context.
    pub const WOULD_BLOCK: StatusCode = StatusCode(0x0B);
    /// Manager API called while an update tick is active.
    pub const REENTRANCY_CONFLICT: StatusCode = StatusCode(0x0C);
    /// No channel provided for result delivery.
    pub const CHANNEL_NULL: StatusCode = StatusCode(0x0D);
    /// The delivery channel failed.
    pub const CHANNEL_ERROR: StatusCode = StatusCode(0x0E);
    /// Registry knows the UID but has no constructible entry.
    pub const CONSTRUCTOR_NOT_FOUND: StatusCode = StatusCode(0x0F);
    /// Parameter envelope invalid for this task type.
    pub const INVALID_PARAMS: StatusCode = StatusCode(0x10);
    /// Allocation failure while constructing the task.
    pub const OUT_OF_MEMORY: StatusCode = StatusCode(0x11);
    /// Manager concurrency cap reached.
    pub const TASK_LIMIT_REACHED: StatusCode = StatusCode(0x12);
    /// A live task with this UID already exists.
    pub const DUPLICATE_TASK: StatusCode = StatusCode(0x13);
    /// The task type UID is unknown to the registry.
    pub const TASK_UNKNOWN: StatusCode = StatusCode(0x14);
    /// Unexpected manager fault.
    pub const INTERNAL_ERROR: StatusCode = StatusCode(0x1F);

    // Task/runtime status codes (0x20..=0x6F).

    /// Task completed successfully (normal termination).
    pub const TASK_FINISHED: StatusCode = StatusCode(0x20);
    /// Task terminated early by an abort request.
    pub const TASK_ABORTED: StatusCode = StatusCode(0x21);
    /// Task exceeded its time budget.
    pub const TASK_TIMEOUT: StatusCode = StatusCode(0x22);
    /// Task I/O or subsystem failure.
    pub const TASK_IO_ERROR: StatusCode = StatusCode(0x23);
    /// Task rejected its inputs at runtime.
    pub const TASK_VALIDATION_FAILED: StatusCode = StatusCode(0x24);
    /// A dependency or service the task requires is unavailable.
    pub const TASK_DEPENDENCY_MISSING: StatusCode = StatusCode(0x25);
    /// Task refused the action due to its own constraints.
    pub const TASK_BUSY: StatusCode = StatusCode(0x26);

    /// Base of the user-defined range (0x70..=0xFF).
    pub const CUSTOM_BASE: StatusCode = StatusCode(0x70);

    /// The raw byte value.
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// True for codes in the manager/API range (`0x00..=0x1F`).
    pub const fn is_manager_status(self) -> bool {
        self.0 < 0x20
    }

    /// True for codes in the task/runtime range (`0x20..=0x6F`).
    pub const fn is_task_status(self) -> bool {
        self.0 >= 0x20 && self.0 < Self::CUSTOM_BASE.0
    }

    /// True for codes in the user-defined range (`0x70..=0xFF`).
    pub const fn is_custom_status(self) -> bool {
        self.0 >= Self::CUSTOM_BASE.0
    }
}

impl From<u8> for StatusCode {
    fn from(raw: u8) -> Self {
        StatusCode(raw)
    }
}

impl From<StatusCode> for u8 {
    fn from(code: StatusCode) -> Self {
        code.0
    }
}

impl std::fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match *self {
            StatusCode::OK => "ok",
            StatusCode::TASK_NOT_REGISTERED => "task_not_registered",
            StatusCode::TASK_ALREADY_RUNNING => "task_already_running",
            StatusCode::TASK_ALREADY_PAUSED => "task_already_paused",
            StatusCode::TASK_ALREADY_RESUMED => "task_already_resumed",
            StatusCode::TASK_NOT_PAUSED => "task_not_paused",
            StatusCode::TASK_NOT_RUNNING => "task_not_running",
            StatusCode::INVALID_STATE_TRANSITION => "invalid_state_transition",
            StatusCode::TASK_ALREADY_FINISHED => "task_already_finished",
            StatusCode::TASK_ALREADY_ABORTED => "task_already_aborted",
            StatusCode::PERMISSION_DENIED => "permission_denied",
            StatusCode::WOULD_BLOCK => "would_block",
            StatusCode::REENTRANCY_CONFLICT => "reentrancy_conflict",
            StatusCode::CHANNEL_NULL => "channel_null",
            StatusCode::CHANNEL_ERROR => "channel_error",
            StatusCode::CONSTRUCTOR_NOT_FOUND => "constructor_not_found",
            StatusCode::INVALID_PARAMS => "invalid_params",
            StatusCode::OUT_OF_MEMORY => "out_of_memory",
            StatusCode::TASK_LIMIT_REACHED => "task_limit_reached",
            StatusCode::DUPLICATE_TASK => "duplicate_task",
            StatusCode::TASK_UNKNOWN => "task_unknown",
            StatusCode::INTERNAL_ERROR => "internal_error",
            StatusCode::TASK_FINISHED => "task_finished",
            StatusCode::TASK_ABORTED => "task_aborted",
            StatusCode::TASK_TIMEOUT => "task_timeout",
            StatusCode::TASK_IO_ERROR => "task_io_error",
            StatusCode::TASK_VALIDATION_FAILED => "task_validation_failed",
            StatusCode::TASK_DEPENDENCY_MISSING => "task_dependency_missing",
            StatusCode::TASK_BUSY => "task_busy",
            StatusCode(raw) => return write!(f, "StatusCode({raw:#04x})"),
        };
        write!(f, "StatusCode({name})")
    }
}
