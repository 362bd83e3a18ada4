//! Kernel error taxonomy.
//!
//! Deliberately minimal: the only recoverable condition is the platform
//! shim being used before it has been initialized. `create_task`'s
//! capacity exhaustion is reported through the invalid task handle
//! instead, not through this type.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum KernelError {
    /// `read_sp`/`write_sp`/`pend_switch` reached before `tick_init` ran.
    PlatformUnavailable,
}

pub type KernelResult<T> = Result<T, KernelError>;
