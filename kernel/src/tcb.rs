//! Task control blocks and the fixed-capacity TCB store.
//!
//! Each task gets a fixed-size stack region and a four-state lifecycle
//! (READY, RUNNING, WAITING, SUSPENDED) rather than the simpler
//! always-READY round-robin model a plainer cooperative scheduler could
//! get away with.

use crate::config::{
    DUMMY_XPSR, IDLE_PRIORITY, IDLE_TASK_INDEX, INITIAL_EXC_RETURN, STACK_WORDS, TOTAL_TASKS,
};

/// A task handle: a non-negative index into the TCB store, or the invalid
/// sentinel. Kept as a signed, C-shaped integer (rather than
/// `Option<usize>`) because the initial stack frame and any future FFI
/// collaborator expect a plain integer handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskHandle(i16);

impl TaskHandle {
    pub const INVALID: TaskHandle = TaskHandle(-1);

    pub(crate) const fn new(index: usize) -> Self {
        TaskHandle(index as i16)
    }

    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }

    pub(crate) fn index(&self) -> Option<usize> {
        if self.0 >= 0 {
            Some(self.0 as usize)
        } else {
            None
        }
    }
}

/// Task execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TaskState {
    Ready,
    Running,
    Waiting,
    Suspended,
}

/// Requested initial state for a newly created task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AutoStart {
    AutoStart,
    StartSuspended,
}

/// A task body: never returns, takes no arguments, captures no
/// environment.
pub type TaskEntry = fn() -> !;

/// One task's control block and private stack region.
pub struct Tcb {
    pub(crate) priority: u8,
    pub(crate) state: TaskState,
    pub(crate) stack_pointer: u32,
    pub(crate) entry: TaskEntry,
    pub(crate) local_tick: u32,
    pub(crate) stack: [u32; STACK_WORDS],
}

impl Tcb {
    const fn empty() -> Self {
        Tcb {
            priority: 0,
            state: TaskState::Suspended,
            stack_pointer: 0,
            entry: idle_placeholder,
            local_tick: 0,
            stack: [0u32; STACK_WORDS],
        }
    }

    /// Address one past the top of this task's private stack region.
    fn stack_top(&self) -> *mut u32 {
        unsafe { self.stack.as_ptr().add(STACK_WORDS) as *mut u32 }
    }

    /// Returns true iff `stack_pointer` lies strictly inside this task's
    /// own stack region.
    pub fn stack_pointer_in_bounds(&self) -> bool {
        let base = self.stack.as_ptr() as u32;
        let top = self.stack_top() as u32;
        self.stack_pointer > base && self.stack_pointer < top
    }

    /// Pre-seed the top of the stack with an initial exception frame so
    /// that the hardware's exception-return mechanism enters `entry`
    /// with the Thumb bit set and zeroed registers. Run per task at
    /// creation time rather than in one pass over every slot, since tasks
    /// may be created incrementally.
    fn seed_initial_frame(&mut self) {
        unsafe {
            let mut p = self.stack_top();

            p = p.offset(-1);
            p.write_volatile(DUMMY_XPSR);

            p = p.offset(-1);
            p.write_volatile(self.entry as usize as u32);

            p = p.offset(-1);
            p.write_volatile(INITIAL_EXC_RETURN);

            // R12, R3, R2, R1, R0
            for _ in 0..5 {
                p = p.offset(-1);
                p.write_volatile(0);
            }
            // R4-R11
            for _ in 0..8 {
                p = p.offset(-1);
                p.write_volatile(0);
            }

            self.stack_pointer = p as u32;
        }
    }
}

fn idle_placeholder() -> ! {
    loop {}
}

/// Fixed-capacity registry of every TCB plus the scheduler's bookkeeping.
/// Process-global, single instance, static lifetime. Mutation happens only
/// from thread context (API calls) and from the tick handler; see
/// `crate::api` and `crate::tick` for the critical-section discipline that
/// guards every access.
pub struct TcbStore {
    tasks: [Tcb; TOTAL_TASKS],
    // Starts at 1: slot IDLE_TASK_INDEX is reserved for the idle task from
    // construction, even though `install_idle` (called later, from
    // `start_scheduler`) hasn't written its real entry/priority into it
    // yet. User tasks, created earlier via `create_task`, must never be
    // handed that reserved slot.
    task_count: usize,
    idle_installed: bool,
    current_task: TaskHandle,
    next_task: TaskHandle,
    tick: u32,
    pub(crate) first_switch: bool,
}

impl TcbStore {
    pub const fn new() -> Self {
        TcbStore {
            tasks: [const { Tcb::empty() }; TOTAL_TASKS],
            task_count: IDLE_TASK_INDEX + 1,
            idle_installed: false,
            current_task: TaskHandle::INVALID,
            next_task: TaskHandle::INVALID,
            tick: 0,
            first_switch: true,
        }
    }

    pub fn task_count(&self) -> usize {
        self.task_count
    }

    pub fn tasks(&self) -> &[Tcb] {
        &self.tasks[..self.task_count]
    }

    pub fn tasks_mut(&mut self) -> &mut [Tcb] {
        &mut self.tasks[..self.task_count]
    }

    pub fn task(&self, handle: TaskHandle) -> Option<&Tcb> {
        handle.index().and_then(|i| self.tasks.get(i))
    }

    pub fn task_mut(&mut self, handle: TaskHandle) -> Option<&mut Tcb> {
        handle.index().and_then(|i| self.tasks.get_mut(i))
    }

    pub fn current_task(&self) -> TaskHandle {
        self.current_task
    }

    pub(crate) fn set_current_task(&mut self, handle: TaskHandle) {
        self.current_task = handle;
    }

    pub fn next_task(&self) -> TaskHandle {
        self.next_task
    }

    pub(crate) fn set_next_task(&mut self, handle: TaskHandle) {
        self.next_task = handle;
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub(crate) fn advance_tick(&mut self) -> u32 {
        self.tick = self.tick.wrapping_add(1);
        self.tick
    }

    /// Registers the mandatory idle task at slot 0. Called once from
    /// `start_scheduler`, after every user task has already been created
    /// (its slot was reserved from construction, so this never disturbs
    /// the indices already handed out by `create_task`).
    pub(crate) fn install_idle(&mut self, entry: TaskEntry) {
        debug_assert!(!self.idle_installed);
        let tcb = &mut self.tasks[IDLE_TASK_INDEX];
        tcb.priority = IDLE_PRIORITY;
        tcb.state = TaskState::Ready;
        tcb.entry = entry;
        tcb.local_tick = 0;
        tcb.seed_initial_frame();
        self.idle_installed = true;
    }

    /// Allocates a new TCB. Returns `TaskHandle::INVALID` when capacity is
    /// exhausted.
    pub(crate) fn create_task(
        &mut self,
        entry: TaskEntry,
        priority: u8,
        autostart: AutoStart,
    ) -> TaskHandle {
        if self.task_count >= TOTAL_TASKS {
            #[cfg(feature = "defmt")]
            defmt::warn!("create_task: capacity exhausted at {} tasks", TOTAL_TASKS);
            return TaskHandle::INVALID;
        }
        let index = self.task_count;
        let tcb = &mut self.tasks[index];
        tcb.priority = priority;
        tcb.state = match autostart {
            AutoStart::AutoStart => TaskState::Ready,
            AutoStart::StartSuspended => TaskState::Suspended,
        };
        tcb.entry = entry;
        tcb.local_tick = 0;
        tcb.seed_initial_frame();
        self.task_count = index + 1;
        TaskHandle::new(index)
    }
}

impl Default for TcbStore {
    fn default() -> Self {
        Self::new()
    }
}
