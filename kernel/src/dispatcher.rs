//! Fixed-priority dispatcher.
//!
//! A single forward scan from index 0 picks the highest-priority
//! READY/RUNNING task, with ties going to the lowest index — a
//! deterministic scan, not a round-robin continuation from
//! `current_task + 1`. See DESIGN.md for the reasoning behind that
//! choice.

use crate::platform::Platform;
use crate::switch::{self, SwitchOrigin};
use crate::tcb::{TaskHandle, TaskState, Tcb, TcbStore};

/// Scans `tasks` for the highest-priority READY or RUNNING task. On ties,
/// the lowest index wins. Every kernel configuration has at least the
/// idle task at index 0 in one of those two states, so this never
/// returns `TaskHandle::INVALID` once the idle task has been installed.
pub fn select_next(tasks: &[Tcb]) -> TaskHandle {
    let mut winner: Option<usize> = None;
    let mut winner_priority = 0u8;

    for (index, tcb) in tasks.iter().enumerate() {
        if matches!(tcb.state, TaskState::Ready | TaskState::Running) {
            if winner.is_none() || tcb.priority > winner_priority {
                winner = Some(index);
                winner_priority = tcb.priority;
            }
        }
    }

    match winner {
        Some(index) => TaskHandle::new(index),
        None => TaskHandle::INVALID,
    }
}

/// Selects the next task and, if it differs from the current one, hands
/// off to the context-switch protocol. If the winner is already current,
/// returns without side effects.
pub fn dispatch<P: Platform>(store: &mut TcbStore, platform: &mut P, origin: SwitchOrigin) {
    let next = select_next(store.tasks());
    if next != store.current_task() {
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "dispatch: switching {} -> {}",
            store.current_task(),
            next
        );
        store.set_next_task(next);
        switch::begin_switch(store, platform, origin);
    }
}
