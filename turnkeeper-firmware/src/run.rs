//! Run modes
//!
//! Both modes run forever. Turn tracking logs every step report the
//! session hands back; nothing it reports stops the loop.

use defmt::*;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use turnkeeper_core::blink::Blinker;
use turnkeeper_core::config::Participants;
use turnkeeper_core::input::Buttons;
use turnkeeper_core::session::Redraw;
use turnkeeper_core::state::Transition;
use turnkeeper_core::traits::StateStore;
use turnkeeper_core::{DeviceConfig, StepReport, TurnSession};
use turnkeeper_ssd1306::Ssd1306;

/// Diagnostic mode: blink the status LED and nothing else
pub async fn blink_forever<L, D>(led: L, mut delay: D, half_period_ms: u32) -> !
where
    L: OutputPin,
    D: DelayNs,
{
    let mut blinker = Blinker::new(led);
    loop {
        blinker.step(&mut delay, half_period_ms).await;
    }
}

/// Turn tracking: bring up the display, restore state, then poll
pub async fn track_turns<B, P, T, U, D>(
    mut display: Ssd1306<B>,
    store: P,
    mut buttons: Buttons<T, U>,
    participants: Participants,
    device: DeviceConfig,
    mut delay: D,
) -> !
where
    B: I2c,
    B::Error: Format,
    P: StateStore,
    T: InputPin,
    U: InputPin,
    D: DelayNs,
{
    // Panel needs time after power up before it takes commands
    delay.delay_ms(device.power_up_delay_ms).await;

    match display.init().await {
        Ok(()) => info!("Display initialized"),
        Err(e) => warn!("Display init failed: {}", e),
    }
    if let Err(e) = display.set_contrast(device.contrast).await {
        warn!("Setting contrast failed: {}", e);
    }

    let mut session = TurnSession::new(display, store, delay, participants, device);

    let start = session.start().await;
    if start.restored {
        info!("Restored turn state {}", start.state);
    } else {
        info!("No saved turn state, starting at {}", start.state);
    }
    if let Err(e) = start.display {
        warn!("Display push failed: {}", e);
    }
    info!("Holder: {=str}", session.holder_name());

    loop {
        for report in session.poll(&mut buttons).await {
            log_step(&report, session.holder_name());
        }
    }
}

fn log_step<E: Format>(report: &StepReport<E>, holder: &str) {
    match report.transition {
        Transition::Ignored => trace!("Edge {} ignored", report.edge),
        Transition::Redraw => info!(
            "{=str} has {} turns",
            holder, report.state.remaining_turns
        ),
        Transition::Advance { from } => info!(
            "Turn passed from {} to {} ({=str})",
            from, report.state.holder_index, holder
        ),
    }

    match &report.redraw {
        Some(Redraw::Frame(Err(e))) => warn!("Display push failed: {}", e),
        Some(Redraw::Animated(animation)) if animation.skipped > 0 => {
            warn!("Transition dropped {} frames", animation.skipped)
        }
        _ => {}
    }

    if let Some(Err(e)) = report.saved {
        error!("Saving turn state failed: {}", e);
    }
}
