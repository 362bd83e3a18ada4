//! Compile-time configuration for the kernel.
//!
//! Timing is expressed in microseconds and hertz rather than milliseconds
//! and megahertz, and includes the heartbeat toggle as a standalone
//! setting alongside the task/stack sizing constants.
//!
//! Adjust these to match the target MCU and application. `TOTAL_TASKS`
//! must include the mandatory idle task (slot 0).

/// Maximum number of user-created tasks (excludes idle).
pub const MAX_USER_TASKS: usize = 4;

/// Total TCB slots: user tasks plus the mandatory idle task at index 0.
pub const TOTAL_TASKS: usize = MAX_USER_TASKS + 1;

/// Index of the idle task's TCB. Always priority 0, always READY/RUNNING.
pub const IDLE_TASK_INDEX: usize = 0;

/// Priority assigned to the idle task. Lower than any user task.
pub const IDLE_PRIORITY: u8 = 0;

/// Per-task stack size, in 32-bit words.
pub const STACK_WORDS: usize = 256;

/// Kernel tick period, in microseconds.
pub const TICK_PERIOD_US: u32 = 1_000;

/// CPU core frequency, in hertz (used to compute the SysTick reload value).
pub const CORE_CLOCK_HZ: u32 = 16_000_000;

/// Whether the is-alive heartbeat collaborator is compiled in.
pub const HEARTBEAT_ENABLED: bool = true;

/// Sub-multiple of the tick at which the heartbeat toggles, in ticks.
pub const HEARTBEAT_PERIOD_TICKS: u32 = 500;

/// Default xPSR value for a freshly seeded stack frame (Thumb bit set).
pub const DUMMY_XPSR: u32 = 0x0100_0000;

/// LR value written into a freshly seeded frame: return to thread mode,
/// use PSP, no floating-point context.
pub const INITIAL_EXC_RETURN: u32 = 0xFFFF_FFF9;
