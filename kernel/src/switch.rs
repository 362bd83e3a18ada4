//! Two-phase context-switch protocol.
//!
//! Phase 1 (the caller phase) runs inline inside whichever API call or
//! tick handler decided a switch is needed; Phase 2 runs from the
//! deferred-switch exception, via the platform shim's register accessors
//! rather than a hand-written assembly object file.

use crate::platform::Platform;
use crate::tcb::TcbStore;

/// Which context the caller phase is running in, selecting the SP-capture
/// bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchOrigin {
    /// An API call from thread context.
    NormalExec,
    /// The tick handler.
    Interrupt,
}

/// Observed-SP-to-outgoing-task-SP bias for `SwitchOrigin::NormalExec`.
/// Calibrated against the API function's compiler-emitted prologue; part
/// of the platform contract, not a tunable.
pub const OUTGOING_SP_BIAS_NORMAL: i32 = -9 * 4;

/// Observed-SP-to-outgoing-task-SP bias for `SwitchOrigin::Interrupt`.
pub const OUTGOING_SP_BIAS_INTERRUPT: i32 = 9 * 4;

/// Phase 1 (caller phase): runs inline at the end of the dispatcher call.
/// Captures the outgoing task's stack pointer (unless this is the very
/// first switch), adopts `next_task` as `current_task`, and requests the
/// deferred-switch interrupt. Phase 2 (`platform_cortex_m4::PendSV`, or
/// the test harness's simulated equivalent) performs the actual SP swap.
pub fn begin_switch<P: Platform>(store: &mut TcbStore, platform: &mut P, origin: SwitchOrigin) {
    let outgoing = store.current_task();

    // The caller (delay/suspend/activate) already moved the outgoing task
    // to WAITING/SUSPENDED when it blocks itself; a task preempted purely
    // by the tick handler never gets that chance, so it is still marked
    // RUNNING here and must be demoted back to READY itself.
    if let Some(tcb) = store.task_mut(outgoing) {
        if tcb.state == crate::tcb::TaskState::Running {
            tcb.state = crate::tcb::TaskState::Ready;
        }
    }

    if !store.first_switch {
        let bias = match origin {
            SwitchOrigin::NormalExec => OUTGOING_SP_BIAS_NORMAL,
            SwitchOrigin::Interrupt => OUTGOING_SP_BIAS_INTERRUPT,
        };
        // SAFETY: called only from within the dispatcher's caller (an API
        // function or the tick handler), on the outgoing task's own stack.
        let observed_sp = unsafe { platform.read_sp() } as i32;
        let biased_sp = (observed_sp + bias) as u32;
        if let Some(tcb) = store.task_mut(outgoing) {
            tcb.stack_pointer = biased_sp;
        }
    }
    store.first_switch = false;

    let incoming = store.next_task();
    store.set_current_task(incoming);
    if let Some(tcb) = store.task_mut(incoming) {
        tcb.state = crate::tcb::TaskState::Running;
    }

    platform.pend_switch();
}

/// Phase 2 (deferred-switch handler): installs the incoming task's
/// recorded stack pointer as the active CPU stack pointer. The hardware's
/// exception-return then consumes that frame. On the very first switch
/// this bootstraps the first task from its pre-seeded initial frame.
///
/// # Safety
/// Must only be called from the deferred-switch exception handler, about
/// to return from that exception.
pub unsafe fn finish_switch<P: Platform>(store: &TcbStore, platform: &mut P) {
    platform.clear_switch_pending();
    let incoming = store.current_task();
    if let Some(tcb) = store.task(incoming) {
        let sp = tcb.stack_pointer;
        unsafe {
            platform.write_sp(sp);
        }
    }
}
