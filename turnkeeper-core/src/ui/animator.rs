//! Slide transition between two holders
//!
//! The outgoing holder slides off to the left while the incoming one
//! slides in from the right edge, a constant `WIDTH / steps` pixels per
//! frame. Integer division leaves the last animated frame a few pixels
//! short of centre, so the sequence always ends with the exact steady
//! frame of the incoming holder.

use embedded_hal_async::delay::DelayNs;

use super::scene::{compose_steady, draw_border, draw_holder, HolderView};
use crate::gfx::{Framebuffer, WIDTH};
use crate::traits::FrameSink;

/// Frame counts from one transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationReport {
    /// Frames the sink accepted, including the final steady frame
    pub pushed: u8,
    /// Frames dropped because the sink failed
    pub skipped: u8,
}

impl AnimationReport {
    fn record<E>(&mut self, result: &Result<(), E>) {
        if result.is_ok() {
            self.pushed = self.pushed.saturating_add(1);
        } else {
            self.skipped = self.skipped.saturating_add(1);
        }
    }
}

/// Horizontal slide with a fixed frame count
#[derive(Debug, Clone, Copy)]
pub struct SlideTransition {
    steps: u8,
    step_px: i16,
}

impl SlideTransition {
    /// A transition of `steps` frames (at least one)
    pub fn new(steps: u8) -> Self {
        let steps = steps.max(1);
        Self {
            steps,
            step_px: WIDTH / steps as i16,
        }
    }

    pub fn steps(&self) -> u8 {
        self.steps
    }

    /// Pixels moved per frame
    pub fn step_px(&self) -> i16 {
        self.step_px
    }

    /// Distance slid after `step` frames
    pub fn offset(&self, step: u8) -> i16 {
        self.step_px * step as i16
    }

    /// Draw animated frame `step` (1-based) into `fb`
    pub fn compose(
        &self,
        fb: &mut Framebuffer,
        step: u8,
        outgoing: &HolderView<'_>,
        incoming: &HolderView<'_>,
    ) {
        let offset = self.offset(step);
        fb.clear(false);
        draw_border(fb);
        draw_holder(fb, outgoing, -offset);
        draw_holder(fb, incoming, WIDTH - offset);
    }

    /// Run the whole transition
    ///
    /// Each animated frame is followed by `frame_delay_ms`. A frame the
    /// sink rejects is skipped and the animation carries on; the final
    /// steady frame is always attempted.
    pub async fn play<S, D>(
        &self,
        fb: &mut Framebuffer,
        sink: &mut S,
        delay: &mut D,
        frame_delay_ms: u32,
        outgoing: &HolderView<'_>,
        incoming: &HolderView<'_>,
    ) -> AnimationReport
    where
        S: FrameSink,
        D: DelayNs,
    {
        let mut report = AnimationReport::default();

        for step in 1..=self.steps {
            self.compose(fb, step, outgoing, incoming);
            let result = sink.push(fb).await;
            report.record(&result);
            delay.delay_ms(frame_delay_ms).await;
        }

        compose_steady(fb, incoming);
        let result = sink.push(fb).await;
        report.record(&result);

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    /// Sink that keeps copies of every frame it accepts
    struct RecordingSink {
        frames: Vec<Framebuffer>,
        fail_on: Option<usize>,
        calls: usize,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                frames: Vec::new(),
                fail_on: None,
                calls: 0,
            }
        }
    }

    impl FrameSink for RecordingSink {
        type Error = ();

        async fn push(&mut self, frame: &Framebuffer) -> Result<(), ()> {
            let call = self.calls;
            self.calls += 1;
            if self.fail_on == Some(call) {
                return Err(());
            }
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        total_ms: u32,
        calls: u32,
    }

    impl DelayNs for CountingDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns / 1_000_000;
            self.calls += 1;
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
            self.calls += 1;
        }
    }

    const OUT: HolderView<'static> = HolderView {
        name: "Maia",
        remaining_turns: 1,
    };
    const IN: HolderView<'static> = HolderView {
        name: "Adalie",
        remaining_turns: 1,
    };

    #[test]
    fn test_reference_cadence() {
        let t = SlideTransition::new(12);
        assert_eq!(t.step_px(), 10);
        assert_eq!(t.offset(12), 120);
    }

    #[test]
    fn test_zero_steps_treated_as_one() {
        let t = SlideTransition::new(0);
        assert_eq!(t.steps(), 1);
        assert_eq!(t.step_px(), WIDTH);
    }

    #[test]
    fn test_play_pushes_steps_plus_final() {
        let t = SlideTransition::new(12);
        let mut fb = Framebuffer::new();
        let mut sink = RecordingSink::new();
        let mut delay = CountingDelay::default();

        let report = block_on(t.play(&mut fb, &mut sink, &mut delay, 20, &OUT, &IN));

        assert_eq!(report, AnimationReport { pushed: 13, skipped: 0 });
        assert_eq!(sink.frames.len(), 13);
        assert_eq!(delay.calls, 12);
        assert_eq!(delay.total_ms, 240);
    }

    #[test]
    fn test_final_frame_is_exact_steady_frame() {
        let t = SlideTransition::new(12);
        let mut fb = Framebuffer::new();
        let mut sink = RecordingSink::new();
        let mut delay = CountingDelay::default();
        block_on(t.play(&mut fb, &mut sink, &mut delay, 20, &OUT, &IN));

        let mut steady = Framebuffer::new();
        compose_steady(&mut steady, &IN);

        assert_eq!(sink.frames.last(), Some(&steady));
        // last animated frame is 8 px short of centre
        assert_ne!(sink.frames[11], steady);
    }

    #[test]
    fn test_intermediate_frames_are_composed_in_order() {
        let t = SlideTransition::new(4);
        let mut fb = Framebuffer::new();
        let mut sink = RecordingSink::new();
        let mut delay = CountingDelay::default();
        block_on(t.play(&mut fb, &mut sink, &mut delay, 0, &OUT, &IN));

        for step in 1..=4u8 {
            let mut expected = Framebuffer::new();
            t.compose(&mut expected, step, &OUT, &IN);
            assert_eq!(sink.frames[step as usize - 1], expected);
        }
    }

    #[test]
    fn test_first_frame_shows_outgoing_shifted_left() {
        let t = SlideTransition::new(12);
        let mut frame = Framebuffer::new();
        t.compose(&mut frame, 1, &OUT, &IN);

        let mut expected = Framebuffer::new();
        draw_border(&mut expected);
        draw_holder(&mut expected, &OUT, -10);
        draw_holder(&mut expected, &IN, WIDTH - 10);
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_failed_frame_is_skipped_not_retried() {
        let t = SlideTransition::new(12);
        let mut fb = Framebuffer::new();
        let mut sink = RecordingSink::new();
        sink.fail_on = Some(3);
        let mut delay = CountingDelay::default();

        let report = block_on(t.play(&mut fb, &mut sink, &mut delay, 20, &OUT, &IN));

        assert_eq!(report, AnimationReport { pushed: 12, skipped: 1 });
        assert_eq!(sink.calls, 13);
        assert_eq!(delay.calls, 12);
    }
}
