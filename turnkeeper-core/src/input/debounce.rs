//! Release-edge debouncing
//!
//! Each line keeps a "was pressed" latch. Comparing consecutive samples
//! gives at most one edge per line per poll. Bounce on the leading edge
//! only ever produces `Pressed` edges, which the controller ignores, so
//! no timing window is needed beyond the poll period itself.

use embedded_hal::digital::InputPin;
use heapless::Vec;

use crate::state::{EdgeKind, InputEdge, Source};

/// One edge per line per poll
pub const MAX_EDGES_PER_POLL: usize = 2;

/// Edge detector for a single line
#[derive(Debug, Clone, Default)]
pub struct ReleaseLatch {
    was_pressed: bool,
}

impl ReleaseLatch {
    pub const fn new() -> Self {
        Self { was_pressed: false }
    }

    /// Feed one sample, returning the edge it completes (if any)
    pub fn update(&mut self, pressed: bool) -> Option<EdgeKind> {
        let edge = match (self.was_pressed, pressed) {
            (false, true) => Some(EdgeKind::Pressed),
            (true, false) => Some(EdgeKind::Released),
            _ => None,
        };
        self.was_pressed = pressed;
        edge
    }

    /// Level seen at the last sample
    pub fn is_pressed(&self) -> bool {
        self.was_pressed
    }
}

/// Edge detection for the take and defer lines
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    take: ReleaseLatch,
    defer: ReleaseLatch,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            take: ReleaseLatch::new(),
            defer: ReleaseLatch::new(),
        }
    }

    /// Feed one sample of both lines (true = pressed)
    ///
    /// Take edges come before defer edges when both lines change in
    /// the same poll.
    pub fn sample(&mut self, take: bool, defer: bool) -> Vec<InputEdge, MAX_EDGES_PER_POLL> {
        let mut edges = Vec::new();
        if let Some(kind) = self.take.update(take) {
            // Capacity is one per line, cannot overflow
            let _ = edges.push(InputEdge {
                source: Source::Take,
                kind,
            });
        }
        if let Some(kind) = self.defer.update(defer) {
            let _ = edges.push(InputEdge {
                source: Source::Defer,
                kind,
            });
        }
        edges
    }
}

/// The two physical buttons (active low, pulled up)
pub struct Buttons<T, D> {
    take: T,
    defer: D,
    debouncer: Debouncer,
}

impl<T, D> Buttons<T, D>
where
    T: InputPin,
    D: InputPin,
{
    pub fn new(take: T, defer: D) -> Self {
        Self {
            take,
            defer,
            debouncer: Debouncer::new(),
        }
    }

    /// Sample both pins once
    pub fn poll(&mut self) -> Vec<InputEdge, MAX_EDGES_PER_POLL> {
        let take = is_pressed(&mut self.take);
        let defer = is_pressed(&mut self.defer);
        self.debouncer.sample(take, defer)
    }
}

/// Active low; a pin that cannot be read counts as released
fn is_pressed(pin: &mut impl InputPin) -> bool {
    pin.is_low().unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    const TAKE_UP: InputEdge = InputEdge::released(Source::Take);
    const DEFER_UP: InputEdge = InputEdge::released(Source::Defer);

    #[test]
    fn test_latch_sequence() {
        let mut latch = ReleaseLatch::new();
        assert_eq!(latch.update(false), None);
        assert_eq!(latch.update(true), Some(EdgeKind::Pressed));
        assert_eq!(latch.update(true), None);
        assert!(latch.is_pressed());
        assert_eq!(latch.update(false), Some(EdgeKind::Released));
        assert_eq!(latch.update(false), None);
    }

    #[test]
    fn test_bounce_yields_one_release_per_poll_transition() {
        let mut d = Debouncer::new();
        let samples = [true, false, true, true, false, false];
        let releases: usize = samples
            .iter()
            .map(|&s| d.sample(s, false).iter().filter(|e| e.is_release()).count())
            .sum();
        assert_eq!(releases, 2);
    }

    #[test]
    fn test_lines_are_independent() {
        let mut d = Debouncer::new();
        d.sample(true, false);
        let edges = d.sample(false, true);
        assert_eq!(edges.as_slice(), &[TAKE_UP, InputEdge::pressed(Source::Defer)]);
        let edges = d.sample(false, false);
        assert_eq!(edges.as_slice(), &[DEFER_UP]);
    }

    #[test]
    fn test_simultaneous_release_orders_take_first() {
        let mut d = Debouncer::new();
        d.sample(true, true);
        assert_eq!(d.sample(false, false).as_slice(), &[TAKE_UP, DEFER_UP]);
    }

    /// Pin driven from a scripted list of levels
    struct ScriptedPin {
        levels: &'static [bool],
        pos: usize,
    }

    impl ErrorType for ScriptedPin {
        type Error = Infallible;
    }

    impl InputPin for ScriptedPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            let level = self.levels.get(self.pos).copied().unwrap_or(true);
            self.pos += 1;
            Ok(level)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|h| !h)
        }
    }

    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = ErrorKind;
    }

    impl InputPin for BrokenPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Err(ErrorKind::Other)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    #[test]
    fn test_buttons_active_low() {
        let take = ScriptedPin {
            levels: &[true, false, false, true],
            pos: 0,
        };
        let defer = ScriptedPin {
            levels: &[true, true, true, true],
            pos: 0,
        };
        let mut buttons = Buttons::new(take, defer);

        assert!(buttons.poll().is_empty());
        assert_eq!(buttons.poll().as_slice(), &[InputEdge::pressed(Source::Take)]);
        assert!(buttons.poll().is_empty());
        assert_eq!(buttons.poll().as_slice(), &[TAKE_UP]);
    }

    #[test]
    fn test_unreadable_pin_never_fires() {
        let take = ScriptedPin {
            levels: &[true],
            pos: 0,
        };
        let mut buttons = Buttons::new(take, BrokenPin);
        for _ in 0..4 {
            assert!(buttons.poll().is_empty());
        }
    }
}
