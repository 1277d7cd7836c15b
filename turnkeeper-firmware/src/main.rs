//! Turnkeeper - Turn Tracking Firmware
//!
//! Firmware binary for RP2040 boards with an SSD1306 OLED on I2C0 and
//! two push buttons. Shows whose turn it is and how many turns they
//! have left, and keeps that across power loss in one flash sector.
//!
//! Pinout:
//! - GP4 / GP5: I2C0 SDA / SCL to the display (400 kHz)
//! - GP15: Take button (active low)
//! - GP14: Defer button (active low)
//! - GP25: status LED

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use turnkeeper_core::blink::startup_pulse;
use turnkeeper_core::input::Buttons;
use turnkeeper_core::storage::FlashStore;
use turnkeeper_core::RunMode;
use turnkeeper_ssd1306::Ssd1306;

mod config;
mod run;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// Flash chip size on the reference board (W25Q16)
const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Turn state lives in the last sector, away from the program image
const STATE_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

/// Display bus clock
const I2C_FREQUENCY: u32 = 400_000;

/// Status LED on-time at boot
const STARTUP_PULSE_MS: u32 = 100;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Turnkeeper firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let device = config::DEVICE;
    info!("Device config: {}", device);

    let mut delay = Delay;
    let mut led = Output::new(p.PIN_25, Level::Low);
    startup_pulse(&mut led, &mut delay, STARTUP_PULSE_MS).await;

    match device.mode {
        RunMode::Blink => {
            info!("Blink mode");
            run::blink_forever(led, delay, device.blink_interval_ms).await
        }
        RunMode::Turns => {
            info!(
                "Turn mode, {} participants",
                config::PARTICIPANTS.count()
            );

            let mut i2c_config = i2c::Config::default();
            i2c_config.frequency = I2C_FREQUENCY;
            let bus = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);
            let display = Ssd1306::new(bus);

            let flash = Flash::<_, Blocking, FLASH_SIZE>::new_blocking(p.FLASH);
            let store = FlashStore::new(flash, STATE_OFFSET);
            debug!("State sector at {=u32:#x}", store.offset());

            let buttons = Buttons::new(
                Input::new(p.PIN_15, Pull::Up),
                Input::new(p.PIN_14, Pull::Up),
            );

            run::track_turns(display, store, buttons, config::PARTICIPANTS, device, delay).await
        }
    }
}
