//! In-memory platform shim used by host unit tests.
//!
//! `MockPlatform` does not own real CPU registers: `read_sp`/`write_sp`
//! operate on a plain `u32` field, which is enough to exercise the ±9-word
//! bias arithmetic and the store's bookkeeping without real hardware.

#![cfg(test)]

use crate::error::KernelResult;
use crate::platform::Platform;

pub struct MockPlatform {
    sp: u32,
    pub tick_init_calls: u32,
    pub tick_reload_calls: u32,
    pub pend_switch_calls: u32,
    pub clear_switch_pending_calls: u32,
}

impl MockPlatform {
    pub const fn new() -> Self {
        MockPlatform {
            sp: 0,
            tick_init_calls: 0,
            tick_reload_calls: 0,
            pend_switch_calls: 0,
            clear_switch_pending_calls: 0,
        }
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for MockPlatform {
    fn tick_init(&mut self, _period_us: u32, _cpu_hz: u32) -> KernelResult<()> {
        self.tick_init_calls += 1;
        Ok(())
    }

    fn tick_reload(&mut self) {
        self.tick_reload_calls += 1;
    }

    fn pend_switch(&mut self) {
        self.pend_switch_calls += 1;
    }

    fn clear_switch_pending(&mut self) {
        self.clear_switch_pending_calls += 1;
    }

    unsafe fn read_sp(&self) -> u32 {
        self.sp
    }

    unsafe fn write_sp(&mut self, addr: u32) {
        self.sp = addr;
    }
}
