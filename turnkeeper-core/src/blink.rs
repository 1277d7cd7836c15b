//! Status LED routines
//!
//! A short pulse at boot shows the firmware is alive. `RunMode::Blink`
//! runs nothing but a steady blink, for boards where the display or
//! buttons are not fitted yet.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

/// Light the LED for `ms`, then turn it off
pub async fn startup_pulse<L, D>(led: &mut L, delay: &mut D, ms: u32)
where
    L: OutputPin,
    D: DelayNs,
{
    // LED failures are not worth reporting
    led.set_high().ok();
    delay.delay_ms(ms).await;
    led.set_low().ok();
}

/// Toggling LED for blink mode
pub struct Blinker<L> {
    led: L,
    lit: bool,
}

impl<L: OutputPin> Blinker<L> {
    /// Take the LED, starting dark
    pub fn new(mut led: L) -> Self {
        led.set_low().ok();
        Self { led, lit: false }
    }

    /// Toggle once and hold for `half_period_ms`
    ///
    /// Returns the new LED state.
    pub async fn step<D: DelayNs>(&mut self, delay: &mut D, half_period_ms: u32) -> bool {
        self.lit = !self.lit;
        self.led.set_state(self.lit.into()).ok();
        delay.delay_ms(half_period_ms).await;
        self.lit
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct LogLed {
        levels: Vec<bool>,
    }

    impl ErrorType for LogLed {
        type Error = Infallible;
    }

    impl OutputPin for LogLed {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.levels.push(true);
            Ok(())
        }
    }

    #[derive(Default)]
    struct LogDelay {
        waits: Vec<u32>,
    }

    impl DelayNs for LogDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.waits.push(ns / 1_000_000);
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.waits.push(ms);
        }
    }

    #[test]
    fn test_startup_pulse() {
        let mut led = LogLed::default();
        let mut delay = LogDelay::default();
        block_on(startup_pulse(&mut led, &mut delay, 100));
        assert_eq!(led.levels, vec![true, false]);
        assert_eq!(delay.waits, vec![100]);
    }

    #[test]
    fn test_blinker_toggles() {
        let mut blinker = Blinker::new(LogLed::default());
        let mut delay = LogDelay::default();
        assert!(!blinker.is_lit());

        assert!(block_on(blinker.step(&mut delay, 500)));
        assert!(!block_on(blinker.step(&mut delay, 500)));
        assert!(block_on(blinker.step(&mut delay, 500)));

        assert_eq!(blinker.led.levels, vec![false, true, false, true]);
        assert_eq!(delay.waits, vec![500, 500, 500]);
    }
}
