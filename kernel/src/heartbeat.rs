//! Is-alive heartbeat collaborator — named interface only.
//!
//! The kernel's only coupling to the board's heartbeat LED driver is this
//! one hook, invoked once per tick from the tick handler when
//! `config::HEARTBEAT_ENABLED` is set. The kernel does not toggle any GPIO
//! itself; that stays the board-specific collaborator's job (see
//! `drivers::gpio` / `app`'s demonstration implementation).

use core::cell::RefCell;

use critical_section::Mutex;

/// Implemented by the board-specific heartbeat driver.
pub trait HeartbeatSink {
    fn heartbeat_tick(&mut self);
}

/// At most one heartbeat collaborator per system, registered once at
/// startup before the tick interrupt is enabled.
static SINK: Mutex<RefCell<Option<&'static mut (dyn HeartbeatSink + Send)>>> =
    Mutex::new(RefCell::new(None));

/// Registers the heartbeat collaborator. Call once, before
/// `start_scheduler`.
pub fn register(sink: &'static mut (dyn HeartbeatSink + Send)) {
    critical_section::with(|cs| {
        *SINK.borrow(cs).borrow_mut() = Some(sink);
    });
}

/// Invokes the registered sink's `heartbeat_tick`, if any. Called from
/// the tick handler, once per tick, when the heartbeat feature is
/// enabled.
pub(crate) fn tick() {
    critical_section::with(|cs| {
        if let Some(sink) = SINK.borrow(cs).borrow_mut().as_deref_mut() {
            sink.heartbeat_tick();
        }
    });
}
