//! Tick-driven delay / wake-up engine.
//!
//! Every WAITING task carries its own countdown, decremented once per
//! tick and promoted to READY at zero, independent of every other task's
//! countdown.

use crate::tcb::{TaskState, TcbStore};

/// Advances the global tick and promotes any `WAITING` task whose local
/// tick reaches zero to `READY`. Does not invoke the dispatcher — the
/// caller (the registered tick handler) does that afterward with
/// `SwitchOrigin::Interrupt`.
pub fn advance(store: &mut TcbStore) -> u32 {
    let tick = store.advance_tick();

    for (index, tcb) in store.tasks_mut().iter_mut().enumerate() {
        if tcb.state == TaskState::Waiting {
            // `delay(0)` leaves local_tick at 0 rather than decrementing
            // it further; every other waiter has local_tick >= 1 by
            // construction and decrements normally.
            if tcb.local_tick > 0 {
                tcb.local_tick -= 1;
            }
            if tcb.local_tick == 0 {
                tcb.state = TaskState::Ready;
                #[cfg(feature = "defmt")]
                defmt::trace!("tick {}: task {} woke up", tick, index);
            }
        }
    }

    tick
}
