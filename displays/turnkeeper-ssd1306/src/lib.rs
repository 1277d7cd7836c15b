//! SSD1306 OLED Display Transport
//!
//! Pushes 128x64 frames to SSD1306-family controllers (SSD1306, SSD1315)
//! over I2C. Pixel handling lives in `turnkeeper_core::gfx`; this crate
//! only frames bytes for the controller.
//!
//! Every I2C transfer opens with a control byte telling the controller
//! how to read the rest: `0x00` for commands, `0x40` for display data.
//!
//! Bus errors are handed straight back. Nothing is retried here, since a
//! frame interrupted half way has no way to be rolled back.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

use embedded_hal_async::i2c::I2c;
use turnkeeper_core::gfx::{Framebuffer, PAGES, WIDTH};
use turnkeeper_core::traits::FrameSink;

/// Default I2C address (0x3D when the SA0 pad is pulled high)
pub const SSD1306_ADDR: u8 = 0x3C;

/// Control byte: command stream follows
const CONTROL_CMD: u8 = 0x00;

/// Control byte: display data stream follows
const CONTROL_DATA: u8 = 0x40;

/// Longest single command with parameters
const MAX_CMD_LEN: usize = 3;

/// SSD1306 commands
pub mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const ENTIRE_DISPLAY_RAM: u8 = 0xA4;
    pub const ENTIRE_DISPLAY_ON: u8 = 0xA5;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DESELECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_COLUMN_ADDR: u8 = 0x21;
    pub const SET_PAGE_ADDR: u8 = 0x22;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Memory addressing mode parameter: horizontal
const MEMORY_MODE_HORIZONTAL: u8 = 0x00;

/// Power-on sequence, one command (with its parameters) per transfer
pub const INIT_SEQUENCE: &[&[u8]] = &[
    &[cmd::DISPLAY_OFF],
    &[cmd::SET_CLOCK_DIV, 0x80], // Default clock
    &[cmd::SET_MUX_RATIO, 0x3F], // 64 lines
    &[cmd::SET_DISPLAY_OFFSET, 0x00],
    &[cmd::SET_START_LINE],   // Start line 0
    &[cmd::SET_CHARGE_PUMP, 0x14], // Enable charge pump
    &[cmd::SET_MEMORY_MODE, MEMORY_MODE_HORIZONTAL],
    &[cmd::SET_SEG_REMAP],    // Flip horizontally
    &[cmd::SET_COM_SCAN_DEC], // Flip vertically
    &[cmd::SET_COM_PINS, 0x12], // Alternative COM config
    &[cmd::SET_CONTRAST, 0xCF], // High contrast
    &[cmd::SET_PRECHARGE, 0xF1],
    &[cmd::SET_VCOM_DESELECT, 0x40],
    &[cmd::ENTIRE_DISPLAY_RAM],
    &[cmd::SET_NORMAL],
    &[cmd::DISPLAY_ON],
];

/// SSD1306 I2C transport
pub struct Ssd1306<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> Ssd1306<I2C>
where
    I2C: I2c,
{
    /// Create a transport at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, SSD1306_ADDR)
    }

    /// Create a transport at a specific 7-bit address
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Give back the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Initialize the display
    ///
    /// Stops at the first failed transfer.
    pub async fn init(&mut self) -> Result<(), I2C::Error> {
        for command in INIT_SEQUENCE {
            self.command(command).await?;
        }
        Ok(())
    }

    /// Send one command with its parameters
    async fn command(&mut self, bytes: &[u8]) -> Result<(), I2C::Error> {
        let mut buf = [CONTROL_CMD; MAX_CMD_LEN + 1];
        let len = bytes.len().min(MAX_CMD_LEN);
        buf[1..=len].copy_from_slice(&bytes[..len]);
        self.i2c.write(self.address, &buf[..=len]).await
    }

    /// Send the whole frame
    ///
    /// Sets the column and page window to the full panel, then streams
    /// the buffer one page per transfer.
    pub async fn flush(&mut self, frame: &Framebuffer) -> Result<(), I2C::Error> {
        self.command(&[cmd::SET_COLUMN_ADDR, 0, (WIDTH - 1) as u8])
            .await?;
        self.command(&[cmd::SET_PAGE_ADDR, 0, (PAGES - 1) as u8])
            .await?;

        let mut data = [0u8; WIDTH as usize + 1];
        data[0] = CONTROL_DATA;
        for page in (0..PAGES).filter_map(|p| frame.page(p)) {
            data[1..].copy_from_slice(page);
            self.i2c.write(self.address, &data).await?;
        }

        Ok(())
    }

    /// Set display contrast (0-255)
    pub async fn set_contrast(&mut self, contrast: u8) -> Result<(), I2C::Error> {
        self.command(&[cmd::SET_CONTRAST, contrast]).await
    }

    /// Turn display on/off
    pub async fn set_display_on(&mut self, on: bool) -> Result<(), I2C::Error> {
        if on {
            self.command(&[cmd::DISPLAY_ON]).await
        } else {
            self.command(&[cmd::DISPLAY_OFF]).await
        }
    }

    /// Invert display colors
    pub async fn set_inverted(&mut self, inverted: bool) -> Result<(), I2C::Error> {
        if inverted {
            self.command(&[cmd::SET_INVERSE]).await
        } else {
            self.command(&[cmd::SET_NORMAL]).await
        }
    }
}

impl<I2C> FrameSink for Ssd1306<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    async fn push(&mut self, frame: &Framebuffer) -> Result<(), Self::Error> {
        self.flush(frame).await
    }
}
