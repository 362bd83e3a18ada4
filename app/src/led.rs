//! Single GPIO LED used as the is-alive indicator.

use drivers::gpio::{gpio_configure_mode, gpio_output_type_configure, toggle_gpio};

const PORTD: u32 = 3;
const GPIO_MODE_GP_OUTPUT: u32 = 1;
const GPIO_OUTPUT_PUSH_PULL: u32 = 0;

const HEARTBEAT_PORT: u32 = PORTD;
const HEARTBEAT_PIN: u32 = 12;

pub fn init_heartbeat_led() {
    gpio_configure_mode(HEARTBEAT_PORT, HEARTBEAT_PIN, GPIO_MODE_GP_OUTPUT);
    gpio_output_type_configure(HEARTBEAT_PORT, HEARTBEAT_PIN, GPIO_OUTPUT_PUSH_PULL);
}

pub fn heartbeat_led_toggle() {
    toggle_gpio(HEARTBEAT_PORT, HEARTBEAT_PIN);
}
