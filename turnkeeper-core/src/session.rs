//! Turn tracking control loop
//!
//! `TurnSession` is the one owned context the firmware threads through
//! its loop: framebuffer, controller, display, store and delay. Each
//! poll runs sample -> mutate -> redraw -> persist for every edge before
//! the next sample is taken, then waits out the poll interval.
//!
//! Nothing here is fatal. Display and storage failures are returned in
//! the step report for the caller to log, and the loop carries on.

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use heapless::Vec;

use crate::config::{DeviceConfig, Participants};
use crate::gfx::Framebuffer;
use crate::input::{Buttons, MAX_EDGES_PER_POLL};
use crate::state::{InputEdge, Transition, TurnController, TurnState};
use crate::traits::{FrameSink, StateStore, StoreError};
use crate::ui::scene::compose_steady;
use crate::ui::{AnimationReport, HolderView, SlideTransition};

/// How the screen was updated for a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Redraw<E> {
    /// Single in-place frame
    Frame(Result<(), E>),
    /// Slide transition to a new holder
    Animated(AnimationReport),
}

/// Outcome of starting the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StartReport<E> {
    /// Whether stored state was found and accepted
    pub restored: bool,
    pub state: TurnState,
    pub display: Result<(), E>,
}

/// Outcome of handling one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport<E> {
    pub edge: InputEdge,
    pub transition: Transition,
    /// State after the edge
    pub state: TurnState,
    /// `None` when the edge was ignored
    pub redraw: Option<Redraw<E>>,
    /// `None` when the edge was ignored
    pub saved: Option<Result<(), StoreError>>,
}

/// Owned runtime context for turn tracking
pub struct TurnSession<S, P, D> {
    fb: Framebuffer,
    controller: TurnController,
    participants: Participants,
    transition: SlideTransition,
    config: DeviceConfig,
    display: S,
    store: P,
    delay: D,
}

impl<S, P, D> TurnSession<S, P, D>
where
    S: FrameSink,
    P: StateStore,
    D: DelayNs,
{
    /// Assemble a session; nothing is read or drawn until `start`
    pub fn new(
        display: S,
        store: P,
        delay: D,
        participants: Participants,
        config: DeviceConfig,
    ) -> Self {
        Self {
            fb: Framebuffer::new(),
            controller: TurnController::new(participants.count()),
            participants,
            transition: SlideTransition::new(config.transition_steps),
            config,
            display,
            store,
            delay,
        }
    }

    /// Restore saved state (or defaults) and show the holder
    pub async fn start(&mut self) -> StartReport<S::Error> {
        let saved = self.store.load();
        self.controller = TurnController::restore(self.participants.count(), saved);
        let state = self.controller.state();
        let restored = saved.is_some_and(|record| record.state() == state);

        let display = self.redraw_steady().await;
        StartReport {
            restored,
            state,
            display,
        }
    }

    /// Apply one edge: mutate, redraw, then persist
    pub async fn handle(&mut self, edge: InputEdge) -> StepReport<S::Error> {
        let before = self.controller.state();
        let transition = self.controller.handle(edge);
        let state = self.controller.state();

        let redraw = match transition {
            Transition::Ignored => None,
            Transition::Redraw => Some(Redraw::Frame(self.redraw_steady().await)),
            Transition::Advance { from } => {
                let outgoing = HolderView::new(self.participants.name(from), before.remaining_turns);
                let incoming = HolderView::new(
                    self.participants.name(state.holder_index),
                    state.remaining_turns,
                );
                let report = self
                    .transition
                    .play(
                        &mut self.fb,
                        &mut self.display,
                        &mut self.delay,
                        self.config.frame_delay_ms,
                        &outgoing,
                        &incoming,
                    )
                    .await;
                Some(Redraw::Animated(report))
            }
        };

        let saved = transition
            .is_accepted()
            .then(|| self.store.save(&state));

        StepReport {
            edge,
            transition,
            state,
            redraw,
            saved,
        }
    }

    /// One pass of the control loop
    ///
    /// Samples the buttons, handles every edge, then waits the poll
    /// interval. Edges arriving faster than the poll period coalesce.
    pub async fn poll<T, U>(
        &mut self,
        buttons: &mut Buttons<T, U>,
    ) -> Vec<StepReport<S::Error>, MAX_EDGES_PER_POLL>
    where
        T: InputPin,
        U: InputPin,
    {
        let mut reports = Vec::new();
        for edge in buttons.poll() {
            let report = self.handle(edge).await;
            // one report per edge, same capacity as the edge list
            let _ = reports.push(report);
        }
        self.delay.delay_ms(self.config.poll_interval_ms).await;
        reports
    }

    async fn redraw_steady(&mut self) -> Result<(), S::Error> {
        let state = self.controller.state();
        let view = HolderView::new(self.participants.name(state.holder_index), state.remaining_turns);
        compose_steady(&mut self.fb, &view);
        self.display.push(&self.fb).await
    }

    /// Current turn state
    pub fn state(&self) -> TurnState {
        self.controller.state()
    }

    /// Last composed frame
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Name of the current holder
    pub fn holder_name(&self) -> &'static str {
        self.participants.name(self.controller.state().holder_index)
    }

    /// Access the display, e.g. to change contrast
    pub fn display_mut(&mut self) -> &mut S {
        &mut self.display
    }

    /// Tear down into the owned parts
    pub fn into_parts(self) -> (S, P, D) {
        (self.display, self.store, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Source;
    use crate::storage::PersistedRecord;
    use crate::ui::scene::compose_steady;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use embedded_hal::digital::ErrorType;
    use std::rc::Rc;

    const NAMES: Participants = Participants::new(&["Maia", "Adalie"]);
    const TAKE: InputEdge = InputEdge::released(Source::Take);
    const DEFER: InputEdge = InputEdge::released(Source::Defer);

    /// Shared event log so ordering across mocks can be checked
    type Log = Rc<RefCell<std::vec::Vec<&'static str>>>;

    struct MockDisplay {
        log: Log,
        frames: std::vec::Vec<Framebuffer>,
        fail: bool,
    }

    impl FrameSink for MockDisplay {
        type Error = &'static str;

        async fn push(&mut self, frame: &Framebuffer) -> Result<(), Self::Error> {
            self.log.borrow_mut().push("push");
            if self.fail {
                return Err("nack");
            }
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    struct MockStore {
        log: Log,
        record: Option<PersistedRecord>,
        saves: usize,
        fail: bool,
    }

    impl StateStore for MockStore {
        fn load(&mut self) -> Option<PersistedRecord> {
            self.record
        }

        fn save(&mut self, state: &TurnState) -> Result<(), StoreError> {
            self.log.borrow_mut().push("save");
            self.saves += 1;
            if self.fail {
                return Err(StoreError::Program);
            }
            self.record = Some(PersistedRecord::from(*state));
            Ok(())
        }
    }

    struct MockDelay {
        log: Log,
    }

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, _ns: u32) {
            self.log.borrow_mut().push("delay");
        }

        async fn delay_ms(&mut self, _ms: u32) {
            self.log.borrow_mut().push("delay");
        }
    }

    fn session(
        record: Option<PersistedRecord>,
    ) -> (TurnSession<MockDisplay, MockStore, MockDelay>, Log) {
        let log: Log = Rc::new(RefCell::new(std::vec::Vec::new()));
        let display = MockDisplay {
            log: log.clone(),
            frames: std::vec::Vec::new(),
            fail: false,
        };
        let store = MockStore {
            log: log.clone(),
            record,
            saves: 0,
            fail: false,
        };
        let delay = MockDelay { log: log.clone() };
        let s = TurnSession::new(display, store, delay, NAMES, DeviceConfig::default());
        (s, log)
    }

    fn steady(name: &str, remaining: u8) -> Framebuffer {
        let mut fb = Framebuffer::new();
        compose_steady(&mut fb, &HolderView::new(name, remaining));
        fb
    }

    #[test]
    fn test_start_without_record_uses_defaults() {
        let (mut s, _) = session(None);
        let report = block_on(s.start());
        assert!(!report.restored);
        assert_eq!(report.state, TurnState::INITIAL);
        assert_eq!(report.display, Ok(()));
        assert_eq!(s.framebuffer(), &steady("Maia", 1));
    }

    #[test]
    fn test_start_restores_record() {
        let (mut s, _) = session(Some(PersistedRecord::new(1, 3)));
        let report = block_on(s.start());
        assert!(report.restored);
        assert_eq!(s.holder_name(), "Adalie");
        assert_eq!(s.framebuffer(), &steady("Adalie", 3));
    }

    #[test]
    fn test_start_rejects_out_of_range_record() {
        let (mut s, _) = session(Some(PersistedRecord::new(5, 2)));
        let report = block_on(s.start());
        assert!(!report.restored);
        assert_eq!(report.state, TurnState::INITIAL);
    }

    #[test]
    fn test_take_advances_with_animation_then_saves() {
        let (mut s, log) = session(None);
        block_on(s.start());
        log.borrow_mut().clear();

        let report = block_on(s.handle(TAKE));
        assert_eq!(report.transition, Transition::Advance { from: 0 });
        assert_eq!(
            report.state,
            TurnState {
                holder_index: 1,
                remaining_turns: 1
            }
        );
        assert_eq!(
            report.redraw,
            Some(Redraw::Animated(AnimationReport {
                pushed: 13,
                skipped: 0
            }))
        );
        assert_eq!(report.saved, Some(Ok(())));

        // redraw strictly before persistence
        let log = log.borrow();
        assert_eq!(log.last(), Some(&"save"));
        assert_eq!(log.iter().filter(|e| **e == "save").count(), 1);
        assert_eq!(log.iter().filter(|e| **e == "push").count(), 13);
        assert_eq!(s.framebuffer(), &steady("Adalie", 1));
    }

    #[test]
    fn test_defer_redraws_in_place_and_caps() {
        let (mut s, _) = session(None);
        block_on(s.start());

        for expected in [2, 3] {
            let report = block_on(s.handle(DEFER));
            assert_eq!(report.transition, Transition::Redraw);
            assert!(matches!(report.redraw, Some(Redraw::Frame(Ok(())))));
            assert_eq!(report.state.remaining_turns, expected);
        }

        let report = block_on(s.handle(DEFER));
        assert_eq!(report.transition, Transition::Ignored);
        assert_eq!(report.redraw, None);
        assert_eq!(report.saved, None);

        let (display, store, _) = s.into_parts();
        // start + two redraws
        assert_eq!(display.frames.len(), 3);
        assert_eq!(store.saves, 2);
        assert_eq!(store.record, Some(PersistedRecord::new(0, 3)));
    }

    #[test]
    fn test_display_failure_still_persists() {
        let (mut s, _) = session(None);
        block_on(s.start());
        s.display_mut().fail = true;

        let report = block_on(s.handle(DEFER));
        assert_eq!(report.redraw, Some(Redraw::Frame(Err("nack"))));
        assert_eq!(report.saved, Some(Ok(())));
        assert_eq!(report.state.remaining_turns, 2);
    }

    #[test]
    fn test_failed_animation_still_persists() {
        let (mut s, _) = session(None);
        block_on(s.start());
        s.display_mut().fail = true;

        // (0, 1) -> (1, 1)
        let report = block_on(s.handle(TAKE));
        assert_eq!(report.transition, Transition::Advance { from: 0 });
        assert_eq!(
            report.redraw,
            Some(Redraw::Animated(AnimationReport {
                pushed: 0,
                skipped: 13
            }))
        );
        assert_eq!(report.saved, Some(Ok(())));

        let (_, store, _) = s.into_parts();
        assert_eq!(store.record, Some(PersistedRecord::new(1, 1)));
    }

    #[test]
    fn test_store_failure_reported_and_loop_continues() {
        let (mut s, _) = session(None);
        block_on(s.start());
        let (display, mut store, delay) = s.into_parts();
        store.fail = true;
        let mut s = TurnSession::new(display, store, delay, NAMES, DeviceConfig::default());
        block_on(s.start());

        let report = block_on(s.handle(DEFER));
        assert_eq!(report.saved, Some(Err(StoreError::Program)));
        assert_eq!(report.state.remaining_turns, 2);
    }

    #[test]
    fn test_press_edge_does_nothing() {
        let (mut s, log) = session(None);
        block_on(s.start());
        log.borrow_mut().clear();

        let report = block_on(s.handle(InputEdge::pressed(Source::Take)));
        assert_eq!(report.transition, Transition::Ignored);
        assert!(log.borrow().is_empty());
    }

    /// Pin whose level is shared with the test body
    struct SharedPin(Rc<RefCell<bool>>);

    impl ErrorType for SharedPin {
        type Error = Infallible;
    }

    impl InputPin for SharedPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(*self.0.borrow())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!*self.0.borrow())
        }
    }

    #[test]
    fn test_poll_runs_full_cycle_then_waits() {
        let (mut s, log) = session(None);
        block_on(s.start());
        log.borrow_mut().clear();

        let take_level = Rc::new(RefCell::new(true));
        let defer_level = Rc::new(RefCell::new(true));
        let mut buttons = Buttons::new(
            SharedPin(take_level.clone()),
            SharedPin(defer_level.clone()),
        );

        // idle poll: only the wait
        assert!(block_on(s.poll(&mut buttons)).is_empty());
        assert_eq!(*log.borrow(), ["delay"]);
        log.borrow_mut().clear();

        // press defer: edge reported, nothing drawn
        *defer_level.borrow_mut() = false;
        let reports = block_on(s.poll(&mut buttons));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].transition, Transition::Ignored);
        log.borrow_mut().clear();

        // release defer: redraw, save, then wait
        *defer_level.borrow_mut() = true;
        let reports = block_on(s.poll(&mut buttons));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].transition, Transition::Redraw);
        assert_eq!(*log.borrow(), ["push", "save", "delay"]);
        assert_eq!(s.state().remaining_turns, 2);
    }
}
