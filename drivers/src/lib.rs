#![no_std]

pub mod gpio;
pub mod stm32f407_registers;
pub mod read_write;
