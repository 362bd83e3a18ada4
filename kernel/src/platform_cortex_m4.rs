//! Cortex-M4 implementation of the platform shim.
//!
//! SysTick is driven directly through its register block; PendSV is
//! pended through `SCB_ICSR` and prioritized through `SHPR3`. PSP
//! read/write goes through the `cortex-m` crate's register accessors
//! rather than raw pointer casts, since those are CPU-core registers
//! rather than MCU-peripheral ones.

#![cfg(not(test))]

use drivers::read_write::{read_register, write_register};
use drivers::stm32f407_registers::SYSTICK_BASE;

use crate::error::{KernelError, KernelResult};
use crate::platform::Platform;

const SYSTICK_CSR: *mut u32 = SYSTICK_BASE as *mut u32;
const SYSTICK_RVR: *mut u32 = (SYSTICK_BASE + 0x04) as *mut u32;
const SYSTICK_CVR: *mut u32 = (SYSTICK_BASE + 0x08) as *mut u32;
const SYSTICK_RVR_MAX: u32 = 0x00FF_FFFF;

const SYSTICK_CSR_ENABLE: u32 = 1 << 0;
const SYSTICK_CSR_TICKINT: u32 = 1 << 1;
const SYSTICK_CSR_CLKSOURCE: u32 = 1 << 2;

/// System Control Block ICSR: bit 28 is PENDSVSET.
const SCB_ICSR: *mut u32 = 0xE000_ED04 as *mut u32;
const ICSR_PENDSVSET: u32 = 1 << 28;

/// System Control Block SHPR3: PendSV priority in bits [23:16], SysTick
/// priority in bits [31:24].
const SCB_SHPR3: *mut u32 = 0xE000_ED20 as *mut u32;

/// Real hardware implementation of the platform shim, for STM32F407-class
/// Cortex-M4 parts (no FPU lazy stacking).
pub struct CortexM4Platform {
    tick_configured: bool,
}

impl CortexM4Platform {
    pub const fn new() -> Self {
        CortexM4Platform {
            tick_configured: false,
        }
    }

    fn require_configured(&self) -> KernelResult<()> {
        if self.tick_configured {
            Ok(())
        } else {
            Err(KernelError::PlatformUnavailable)
        }
    }
}

impl Default for CortexM4Platform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for CortexM4Platform {
    fn tick_init(&mut self, period_us: u32, cpu_hz: u32) -> KernelResult<()> {
        if self.tick_configured {
            return Ok(());
        }

        let ticks = (cpu_hz / 1_000_000).saturating_mul(period_us);

        unsafe {
            write_register(SYSTICK_CSR, 0);
            write_register(SYSTICK_RVR, ticks.saturating_sub(1) & SYSTICK_RVR_MAX);
            write_register(SYSTICK_CVR, 0);
            write_register(
                SYSTICK_CSR,
                SYSTICK_CSR_ENABLE | SYSTICK_CSR_CLKSOURCE | SYSTICK_CSR_TICKINT,
            );

            // PendSV at the lowest priority (0xFF), SysTick just above it
            // (0xF0), so the deferred-switch handler only ever runs once
            // everything else has drained.
            let mut shpr3 = read_register(SCB_SHPR3);
            shpr3 &= !((0xFFu32 << 16) | (0xFFu32 << 24));
            shpr3 |= (0xFFu32 << 16) | (0xF0u32 << 24);
            write_register(SCB_SHPR3, shpr3);
        }

        self.tick_configured = true;
        Ok(())
    }

    fn tick_reload(&mut self) {
        // SysTick free-runs and auto-reloads from RVR on every count-to-
        // zero; this is an explicit no-op, nothing needs reprogramming.
    }

    fn pend_switch(&mut self) {
        unsafe {
            write_register(SCB_ICSR, ICSR_PENDSVSET);
        }
    }

    fn clear_switch_pending(&mut self) {
        // The NVIC clears PENDSVSET automatically once the exception is
        // taken; nothing further to do on entry to the handler.
    }

    unsafe fn read_sp(&self) -> u32 {
        debug_assert!(
            self.require_configured().is_ok(),
            "read_sp called before tick_init"
        );
        cortex_m::register::psp::read()
    }

    unsafe fn write_sp(&mut self, addr: u32) {
        debug_assert!(
            self.require_configured().is_ok(),
            "write_sp called before tick_init"
        );
        unsafe {
            cortex_m::register::psp::write(addr);
        }
    }
}
