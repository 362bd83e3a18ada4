
//declaring the registers

//RCC register
pub const RCC_BASE: u32 =    0x4002_3800;


//GPIO Registers
pub const GPIO_A_BASE: u32 = 0x4002_0000;
pub const GPIO_B_BASE: u32 = 0x4002_0400;
pub const GPIO_C_BASE: u32 = 0x4002_0800;
pub const GPIO_D_BASE: u32 = 0x4002_0C00;
pub const GPIO_E_BASE: u32 = 0x4002_1000;
pub const GPIO_F_BASE: u32 = 0x4002_1400;
pub const GPIO_G_BASE: u32 = 0x4002_1800;
pub const GPIO_H_BASE: u32 = 0x4002_1C00;
pub const GPIO_I_BASE: u32 = 0x4002_2000;


//Systic
pub const SYSTICK_BASE : u32 = 0xE000_E010;


