//! Public API.
//!
//! Every mutation of the shared kernel state goes through
//! `critical_section::Mutex<RefCell<_>>` rather than a bare `static mut`
//! guarded ad hoc at each call site, so every entry point (task-side API
//! calls, the tick handler, the deferred-switch handler) shares one
//! consistent locking discipline.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config;
use crate::dispatcher;
use crate::heartbeat;
use crate::platform::Platform;
use crate::switch::SwitchOrigin;
use crate::tcb::{AutoStart, TaskEntry, TaskHandle, TaskState, TcbStore};

/// Process-global kernel instance: one TCB store, one platform shim.
/// Static lifetime, single instance.
pub struct Kernel<P: Platform> {
    store: Mutex<RefCell<TcbStore>>,
    platform: Mutex<RefCell<P>>,
}

impl<P: Platform> Kernel<P> {
    pub const fn new(platform: P) -> Self {
        Kernel {
            store: Mutex::new(RefCell::new(TcbStore::new())),
            platform: Mutex::new(RefCell::new(platform)),
        }
    }

    /// Creates a new task. Must be called before `start_scheduler`.
    pub fn create_task(&self, entry: TaskEntry, priority: u8, autostart: AutoStart) -> TaskHandle {
        critical_section::with(|cs| {
            self.store
                .borrow(cs)
                .borrow_mut()
                .create_task(entry, priority, autostart)
        })
    }

    /// Registers the idle task, enables the tick, and performs the first
    /// context switch. Returns instead of diverging so host tests can
    /// drive the rest of the scenario; [`Kernel::start_scheduler`] is the
    /// `-> !` wrapper real firmware calls.
    fn bootstrap(&self, idle_entry: TaskEntry) {
        critical_section::with(|cs| {
            let mut store = self.store.borrow(cs).borrow_mut();
            store.install_idle(idle_entry);

            let mut platform = self.platform.borrow(cs).borrow_mut();
            platform
                .tick_init(config::TICK_PERIOD_US, config::CORE_CLOCK_HZ)
                .expect("platform tick_init failed");

            dispatcher::dispatch(&mut store, &mut *platform, SwitchOrigin::NormalExec);
        });
    }

    /// Registers the idle task, enables the tick, and performs the first
    /// context switch. Never returns.
    pub fn start_scheduler(&self, idle_entry: TaskEntry) -> ! {
        self.bootstrap(idle_entry);

        // On target, the deferred-switch exception fires the instant
        // `bootstrap`'s critical section is exited and this function
        // never actually reaches the loop. Present only to satisfy `-> !`.
        loop {
            core::hint::spin_loop();
        }
    }

    /// Returns the global tick count.
    pub fn get_clock(&self) -> u32 {
        critical_section::with(|cs| self.store.borrow(cs).borrow().tick())
    }

    /// Suspends the calling task for at least `ticks` ticks. Must be
    /// called from the RUNNING task.
    pub fn delay(&self, ticks: u32) {
        critical_section::with(|cs| {
            let mut store = self.store.borrow(cs).borrow_mut();
            let current = store.current_task();
            if let Some(tcb) = store.task_mut(current) {
                tcb.state = TaskState::Waiting;
                tcb.local_tick = ticks;
            }

            let mut platform = self.platform.borrow(cs).borrow_mut();
            dispatcher::dispatch(&mut store, &mut *platform, SwitchOrigin::NormalExec);
        });
    }

    /// Suspends the calling task until externally activated. Must be
    /// called from the RUNNING task.
    pub fn suspend(&self) {
        critical_section::with(|cs| {
            let mut store = self.store.borrow(cs).borrow_mut();
            let current = store.current_task();
            if let Some(tcb) = store.task_mut(current) {
                tcb.state = TaskState::Suspended;
            }

            let mut platform = self.platform.borrow(cs).borrow_mut();
            dispatcher::dispatch(&mut store, &mut *platform, SwitchOrigin::NormalExec);
        });
    }

    /// Makes `handle`'s task READY. No-op unless the target is SUSPENDED
    /// or WAITING.
    pub fn activate(&self, handle: TaskHandle) {
        critical_section::with(|cs| {
            let mut store = self.store.borrow(cs).borrow_mut();
            if let Some(tcb) = store.task_mut(handle) {
                if matches!(tcb.state, TaskState::Suspended | TaskState::Waiting) {
                    tcb.state = TaskState::Ready;
                }
            }

            let mut platform = self.platform.borrow(cs).borrow_mut();
            dispatcher::dispatch(&mut store, &mut *platform, SwitchOrigin::NormalExec);
        });
    }

    /// Runs the full tick-interrupt sequence: advance the clock, wake
    /// expired waiters, dispatch, invoke the heartbeat collaborator, rearm.
    /// Called from the registered `SysTick` handler.
    pub fn on_tick(&self) {
        critical_section::with(|cs| {
            let mut store = self.store.borrow(cs).borrow_mut();
            crate::tick::advance(&mut store);

            let mut platform = self.platform.borrow(cs).borrow_mut();
            dispatcher::dispatch(&mut store, &mut *platform, SwitchOrigin::Interrupt);

            if config::HEARTBEAT_ENABLED {
                heartbeat::tick();
            }

            platform.tick_reload();
        });
    }

    /// Runs Phase 2 of the context-switch protocol. Called from the
    /// registered deferred-switch (`PendSV`) handler.
    pub fn on_switch(&self) {
        critical_section::with(|cs| {
            let store = self.store.borrow(cs).borrow();
            let mut platform = self.platform.borrow(cs).borrow_mut();
            // SAFETY: only ever invoked from the deferred-switch exception
            // handler, immediately before that exception returns.
            unsafe {
                crate::switch::finish_switch(&store, &mut *platform);
            }
        });
    }

    /// Test-only: runs `bootstrap` without diverging, and exposes the
    /// current task handle, so `kernel/src/tests.rs` can drive a scenario
    /// step by step against a fresh, non-global `Kernel` instance.
    #[cfg(test)]
    pub(crate) fn test_start(&self, idle_entry: TaskEntry) {
        self.bootstrap(idle_entry);
    }

    #[cfg(test)]
    pub(crate) fn current_task(&self) -> TaskHandle {
        critical_section::with(|cs| self.store.borrow(cs).borrow().current_task())
    }

    #[cfg(test)]
    pub(crate) fn task_state(&self, handle: TaskHandle) -> Option<TaskState> {
        critical_section::with(|cs| {
            self.store
                .borrow(cs)
                .borrow()
                .task(handle)
                .map(|tcb| tcb.state)
        })
    }

    #[cfg(test)]
    pub(crate) fn task_stack_ok(&self, handle: TaskHandle) -> bool {
        critical_section::with(|cs| {
            self.store
                .borrow(cs)
                .borrow()
                .task(handle)
                .map(|tcb| tcb.stack_pointer_in_bounds())
                .unwrap_or(false)
        })
    }
}

#[cfg(not(test))]
type ActivePlatform = crate::platform_cortex_m4::CortexM4Platform;

#[cfg(test)]
type ActivePlatform = crate::platform_mock::MockPlatform;

static KERNEL: Kernel<ActivePlatform> = Kernel::new(ActivePlatform::new());

/// Creates a new task. Returns `TaskHandle::INVALID` when capacity is
/// exhausted. Must be called before `start_scheduler`.
pub fn create_task(entry: TaskEntry, priority: u8, autostart: AutoStart) -> TaskHandle {
    KERNEL.create_task(entry, priority, autostart)
}

/// Registers the idle task, enables the tick, and performs the first
/// context switch. Never returns.
pub fn start_scheduler(idle_entry: TaskEntry) -> ! {
    KERNEL.start_scheduler(idle_entry)
}

/// Returns the global tick count.
pub fn get_clock() -> u32 {
    KERNEL.get_clock()
}

/// Suspends the calling task for at least `ticks` ticks. `delay(0)` is an
/// explicit yield.
pub fn delay(ticks: u32) {
    KERNEL.delay(ticks);
}

/// Suspends the calling task until externally `activate`d.
pub fn suspend() {
    KERNEL.suspend();
}

/// Makes `handle`'s task READY, if it was SUSPENDED or WAITING.
pub fn activate(handle: TaskHandle) {
    KERNEL.activate(handle);
}

#[cfg(not(test))]
mod handlers {
    use super::KERNEL;
    use cortex_m_rt::exception;

    #[exception]
    fn SysTick() {
        KERNEL.on_tick();
    }

    #[exception]
    fn PendSV() {
        KERNEL.on_switch();
    }
}
