/// Errors that can occur while building a task registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A task type with the same normalized UID is already registered.
    #[error("duplicate task uid {0:#x}")]
    DuplicateUid(u64),

    /// The registry has been frozen; no further registrations are accepted.
    #[error("registry is frozen")]
    Frozen,
}

pub type Result<T> = std::result::Result<T, RegistryError>;
