//! Host unit tests for the scheduler core.
//!
//! Each test builds its own `Kernel<MockPlatform>` instance (never the
//! global singleton in `api`), so tests can run in parallel without
//! interfering with each other.
//!
//! Task bodies are never actually executed: each test drives a scenario
//! by calling the API functions a real task would have called at that
//! point in its own execution, and asserting on
//! `current_task()`/`task_state()` after each step.

use crate::api::Kernel;
use crate::platform_mock::MockPlatform;
use crate::tcb::{AutoStart, TaskHandle, TaskState};

fn body() -> ! {
    loop {}
}

fn new_kernel() -> Kernel<MockPlatform> {
    Kernel::new(MockPlatform::new())
}

const IDLE: TaskHandle = TaskHandle::new(0);

#[test]
fn create_task_before_start_returns_distinct_handles() {
    let kernel = new_kernel();
    let a = kernel.create_task(body, 1, AutoStart::AutoStart);
    let b = kernel.create_task(body, 1, AutoStart::AutoStart);
    assert!(a.is_valid());
    assert!(b.is_valid());
    assert_ne!(a, b);
}

#[test]
fn capacity_exhaustion_returns_invalid_handle() {
    // MAX_USER_TASKS is 4 in this build's config, so the fifth user task
    // must fail; exercise exhaustion by filling every user slot and
    // confirming the next call is rejected.
    let kernel = new_kernel();
    let mut handles = alloc_handles(&kernel, crate::config::MAX_USER_TASKS);
    assert!(handles.iter().all(|h| h.is_valid()));

    let overflow = kernel.create_task(body, 1, AutoStart::AutoStart);
    assert_eq!(overflow, TaskHandle::INVALID);

    // idle, registered at start_scheduler, still succeeds: it occupies
    // the slot reserved for it, not one of the user slots just exhausted.
    kernel.test_start(body);
    assert!(kernel.current_task().is_valid());

    handles.clear();
}

fn alloc_handles(kernel: &Kernel<MockPlatform>, n: usize) -> alloc_shim::Handles {
    let mut handles = alloc_shim::Handles::new();
    for _ in 0..n {
        handles.push(kernel.create_task(body, 1, AutoStart::AutoStart));
    }
    handles
}

/// A tiny fixed-capacity stand-in for `Vec` so this test module needs no
/// `alloc` dependency just to collect a handful of handles.
mod alloc_shim {
    use crate::tcb::TaskHandle;

    pub struct Handles {
        buf: [TaskHandle; 16],
        len: usize,
    }

    impl Handles {
        pub fn new() -> Self {
            Handles {
                buf: [TaskHandle::INVALID; 16],
                len: 0,
            }
        }

        pub fn push(&mut self, handle: TaskHandle) {
            self.buf[self.len] = handle;
            self.len += 1;
        }

        pub fn iter(&self) -> impl Iterator<Item = &TaskHandle> {
            self.buf[..self.len].iter()
        }

        pub fn clear(&mut self) {
            self.len = 0;
        }
    }
}

#[test]
fn two_task_round_robin_by_delay() {
    // A and B, both priority 2, body `loop { delay(1) }`.
    //
    // At bootstrap, and again every time A's wait expires, A and B tie for
    // top priority and the dispatcher's lowest-index-wins rule hands the
    // CPU to A; A's own next action is always to delay(1) again, handing
    // it straight back to B. The pair settles into a stable two-phase
    // cycle.
    let kernel = new_kernel();
    let a = kernel.create_task(body, 2, AutoStart::AutoStart);
    let b = kernel.create_task(body, 2, AutoStart::AutoStart);
    kernel.test_start(body);

    assert_eq!(kernel.current_task(), a);

    kernel.delay(1);
    assert_eq!(kernel.current_task(), b);

    for _ in 0..10 {
        kernel.on_tick();
        assert_eq!(kernel.current_task(), a);

        kernel.delay(1);
        assert_eq!(kernel.current_task(), b);
    }
}

#[test]
fn priority_preemption_on_wake() {
    // H (prio 3) delays 5 ticks then loops; L (prio 1) loops forever.
    // From tick 0..5, L runs (H is WAITING). At tick 5, H preempts L.
    let kernel = new_kernel();
    let h = kernel.create_task(body, 3, AutoStart::AutoStart);
    let l = kernel.create_task(body, 1, AutoStart::AutoStart);
    kernel.test_start(body);

    // H has the highest priority among READY tasks at bootstrap.
    assert_eq!(kernel.current_task(), h);
    kernel.delay(5);
    assert_eq!(kernel.current_task(), l);

    for _ in 0..4 {
        kernel.on_tick();
        assert_eq!(kernel.current_task(), l);
    }

    kernel.on_tick();
    assert_eq!(kernel.current_task(), h);
    assert_eq!(kernel.task_state(h), Some(TaskState::Running));
    assert_eq!(kernel.task_state(l), Some(TaskState::Ready));
}

#[test]
fn suspend_and_activate() {
    // S (prio 2) suspends itself; A (prio 1) activates S then delays 3
    // ticks.
    let kernel = new_kernel();
    let s = kernel.create_task(body, 2, AutoStart::AutoStart);
    let a = kernel.create_task(body, 1, AutoStart::AutoStart);
    kernel.test_start(body);

    assert_eq!(kernel.current_task(), s);
    kernel.suspend();
    assert_eq!(kernel.task_state(s), Some(TaskState::Suspended));
    assert_eq!(kernel.current_task(), a);

    kernel.activate(s);
    assert_eq!(kernel.current_task(), s);
    kernel.suspend();
    assert_eq!(kernel.current_task(), a);

    kernel.delay(3);
    for _ in 0..2 {
        kernel.on_tick();
        assert_eq!(kernel.current_task(), IDLE);
    }
    kernel.on_tick();
    assert_eq!(kernel.current_task(), a);
}

#[test]
fn delay_zero_is_a_yield() {
    // X and Y, both priority 2, `loop { delay(0) }`. A WAITING task with
    // local_tick already 0 is promoted to READY on the very next tick
    // without any further decrement (tick.rs), so each `delay(0)` call
    // costs exactly one tick before the task is eligible again; the
    // tie-break settles into the same stable cycle as
    // `two_task_round_robin_by_delay`.
    let kernel = new_kernel();
    let x = kernel.create_task(body, 2, AutoStart::AutoStart);
    let y = kernel.create_task(body, 2, AutoStart::AutoStart);
    kernel.test_start(body);

    assert_eq!(kernel.current_task(), x);
    kernel.delay(0);
    assert_eq!(kernel.current_task(), y);

    for _ in 0..10 {
        kernel.on_tick();
        assert_eq!(kernel.current_task(), x);

        kernel.delay(0);
        assert_eq!(kernel.current_task(), y);
    }
}

#[test]
fn idle_runs_while_all_user_tasks_are_blocked() {
    // W (prio 5) delays 1000 ticks then loops. Idle runs for the first
    // 1000 ticks; at tick 1000, W preempts idle.
    let kernel = new_kernel();
    let w = kernel.create_task(body, 5, AutoStart::AutoStart);
    kernel.test_start(body);

    assert_eq!(kernel.current_task(), w);
    kernel.delay(1000);
    assert_eq!(kernel.current_task(), IDLE);

    for _ in 0..999 {
        kernel.on_tick();
        assert_eq!(kernel.current_task(), IDLE);
    }
    kernel.on_tick();
    assert_eq!(kernel.current_task(), w);
}

#[test]
fn get_clock_is_monotonic_and_increments_by_one() {
    let kernel = new_kernel();
    kernel.test_start(body);
    assert_eq!(kernel.get_clock(), 0);
    for expected in 1..=50u32 {
        kernel.on_tick();
        assert_eq!(kernel.get_clock(), expected);
    }
}

#[test]
fn at_most_one_task_is_running_after_every_step() {
    let kernel = new_kernel();
    let a = kernel.create_task(body, 2, AutoStart::AutoStart);
    let b = kernel.create_task(body, 1, AutoStart::AutoStart);
    kernel.test_start(body);

    let assert_single_running = |kernel: &Kernel<MockPlatform>| {
        let running = [IDLE, a, b]
            .into_iter()
            .filter(|h| kernel.task_state(*h) == Some(TaskState::Running))
            .count();
        assert_eq!(running, 1);
    };

    assert_single_running(&kernel);
    kernel.delay(1);
    assert_single_running(&kernel);
    kernel.on_tick();
    assert_single_running(&kernel);
    kernel.suspend();
    assert_single_running(&kernel);
}

#[test]
fn stack_pointer_stays_within_its_own_region_after_a_switch_each_way() {
    // `MockPlatform::read_sp` just replays whatever was last written by
    // `write_sp`, with no real push/pop activity in between — unlike real
    // hardware, repeatedly biasing the same stale value in one direction
    // would walk it out of the stack region after a few dozen iterations
    // (a mock-fidelity limit, not a kernel bug). One capture of each
    // origin, from a freshly seeded stack, is what's actually confirmable
    // here: both biases land well inside a 256-word stack.
    let kernel = new_kernel();
    let a = kernel.create_task(body, 2, AutoStart::AutoStart);
    let b = kernel.create_task(body, 2, AutoStart::AutoStart);
    kernel.test_start(body);
    kernel.on_switch();
    assert!(kernel.task_stack_ok(IDLE));
    assert!(kernel.task_stack_ok(a));

    // NORMAL_EXEC-origin capture: a's own delay() call biases its SP by
    // the caller-phase offset.
    kernel.delay(1);
    assert!(kernel.task_stack_ok(a));
    kernel.on_switch();
    assert!(kernel.task_stack_ok(b));

    // INTERRUPT-origin capture: the tick handler biases the outgoing
    // (preempted) task's SP by the opposite offset.
    kernel.on_tick();
    assert!(kernel.task_stack_ok(b));
    assert!(kernel.task_stack_ok(a));
}

#[test]
fn start_suspended_task_is_not_scheduled_until_activated() {
    let kernel = new_kernel();
    let dormant = kernel.create_task(body, 9, AutoStart::StartSuspended);
    kernel.test_start(body);

    // `dormant` has the highest priority of all, but it starts SUSPENDED,
    // so the idle task (the only READY candidate) wins.
    assert_eq!(kernel.current_task(), IDLE);
    assert_eq!(kernel.task_state(dormant), Some(TaskState::Suspended));

    kernel.activate(dormant);
    assert_eq!(kernel.current_task(), dormant);
}

#[test]
fn dispatcher_picks_highest_priority_among_ready_or_running() {
    use crate::dispatcher::select_next;
    use crate::tcb::TcbStore;

    let mut store = TcbStore::new();
    store.install_idle(body);
    let low = store.create_task(body, 1, AutoStart::AutoStart);
    let high = store.create_task(body, 5, AutoStart::AutoStart);
    let _ = low;

    assert_eq!(select_next(store.tasks()), high);

    store.task_mut(high).unwrap().state = TaskState::Suspended;
    assert_eq!(select_next(store.tasks()), TaskHandle::new(1));
}

#[test]
fn ties_go_to_the_lowest_index() {
    use crate::dispatcher::select_next;
    use crate::tcb::TcbStore;

    let mut store = TcbStore::new();
    store.install_idle(body);
    let first = store.create_task(body, 4, AutoStart::AutoStart);
    let second = store.create_task(body, 4, AutoStart::AutoStart);
    let _ = second;

    assert_eq!(select_next(store.tasks()), first);
}
