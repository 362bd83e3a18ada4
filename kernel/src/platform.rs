//! Platform shim contract.
//!
//! Modeled as a trait so the dispatcher/switch/tick logic can run against
//! `MockPlatform` in host tests (see `kernel/src/tests.rs`) and against
//! `CortexM4Platform` (`kernel/src/platform_cortex_m4.rs`) on target.

use crate::error::KernelResult;

/// The kernel's only coupling to timer and interrupt hardware.
pub trait Platform {
    /// Configure a periodic decrementing tick source that raises an
    /// interrupt on reload. Idempotent; must be called exactly once
    /// before `start_scheduler` returns.
    fn tick_init(&mut self, period_us: u32, cpu_hz: u32) -> KernelResult<()>;

    /// Rearm the tick for the next period.
    fn tick_reload(&mut self);

    /// Request the lowest-priority software interrupt (deferred-switch
    /// slot).
    fn pend_switch(&mut self);

    /// Clear the deferred-switch pending bit. Called on entry to the
    /// deferred-switch handler.
    fn clear_switch_pending(&mut self);

    /// Read the CPU's active stack pointer. Used only inside handlers.
    ///
    /// # Safety
    /// Must only be called from within a handler executing on the stack
    /// whose pointer is being captured.
    unsafe fn read_sp(&self) -> u32;

    /// Install `addr` as the CPU's active stack pointer. Used only inside
    /// the deferred-switch handler, immediately before exception return.
    ///
    /// # Safety
    /// `addr` must reference a valid exception frame for the incoming
    /// task, or the subsequent exception return corrupts the CPU state.
    unsafe fn write_sp(&mut self, addr: u32);
}
