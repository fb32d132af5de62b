use log::warn;

use crate::config::Settings;
use crate::dom::UiNode;

/// Linear count-up from zero to a target, one step per animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    current: f64,
    target: f64,
    increment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterFrame {
    /// Keep scheduling frames; the value to show now.
    Running(u64),
    /// Terminal frame, always exactly the target.
    Finished(u64),
}

impl CounterFrame {
    pub fn value(self) -> u64 {
        match self {
            CounterFrame::Running(value) | CounterFrame::Finished(value) => value,
        }
    }
}

impl CounterAnimation {
    pub fn new(target: u64, settings: &Settings) -> Self {
        let frames = settings.counter_duration_ms / settings.counter_frame_ms;
        // Zero, negative or non-finite timings finish on the first frame.
        let frames = if frames.is_finite() && frames >= 1.0 { frames } else { 1.0 };
        let target = target as f64;
        Self {
            current: 0.0,
            target,
            increment: target / frames,
        }
    }

    pub fn tick(&mut self) -> CounterFrame {
        self.current += self.increment;
        if self.current < self.target {
            CounterFrame::Running(self.current.floor() as u64)
        } else {
            self.current = self.target;
            CounterFrame::Finished(self.target as u64)
        }
    }
}

/// At-most-once guard.
#[derive(Debug, Default)]
pub struct Latch {
    fired: bool,
}

impl Latch {
    /// `true` the first time only.
    pub fn try_fire(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }
}

/// Whether an intersection report shows enough of the stats section to start
/// counting. The observer's initial report can flag a barely visible section
/// as intersecting, so the ratio is checked too.
pub fn is_visible_enough(is_intersecting: bool, ratio: f64, threshold: f64) -> bool {
    is_intersecting && ratio >= threshold
}

/// A counter element on the page: its target and optional display suffix.
#[derive(Debug, Clone)]
pub struct Counter<N> {
    pub node: N,
    pub target: u64,
    pub suffix: String,
}

impl<N: UiNode> Counter<N> {
    /// Reads `data-target` and `data-suffix`. Elements with an unusable target are skipped.
    pub fn from_node(node: N) -> Option<Self> {
        let raw = node.attribute("data-target")?;
        match raw.trim().parse::<u64>() {
            Ok(target) => {
                let suffix = node.attribute("data-suffix").unwrap_or_default();
                Some(Self { node, target, suffix })
            }
            Err(e) => {
                warn!("Skipping counter with target {:?}: {}", raw, e);
                None
            }
        }
    }

    pub fn render(&self, frame: CounterFrame) {
        self.node.set_text(&format!("{}{}", frame.value(), self.suffix));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::fake::FakeNode;

    fn run_to_end(animation: &mut CounterAnimation) -> (Vec<u64>, u64) {
        let mut shown = Vec::new();
        loop {
            match animation.tick() {
                CounterFrame::Running(value) => shown.push(value),
                CounterFrame::Finished(value) => return (shown, value),
            }
        }
    }

    #[test]
    fn counts_to_exact_target_within_duration() {
        let settings = Settings::default();
        let mut animation = CounterAnimation::new(150, &settings);
        let (shown, last) = run_to_end(&mut animation);

        assert_eq!(last, 150);
        assert!(shown.iter().all(|value| *value < 150));
        assert!(shown.windows(2).all(|pair| pair[0] <= pair[1]));
        // 2000ms at 16ms per frame, plus at most one frame of float slack.
        assert!(shown.len() < 126);
    }

    #[test]
    fn zero_target_finishes_on_first_frame() {
        let mut animation = CounterAnimation::new(0, &Settings::default());
        assert_eq!(animation.tick(), CounterFrame::Finished(0));
    }

    #[test]
    fn latch_fires_once() {
        let mut latch = Latch::default();
        assert!(latch.try_fire());
        assert!(!latch.try_fire());
        assert!(!latch.try_fire());
    }

    #[test]
    fn partly_visible_section_does_not_start_counting() {
        let threshold = Settings::default().counter_threshold;
        assert!(!is_visible_enough(true, 0.2, threshold));
        assert!(!is_visible_enough(false, 0.0, threshold));
        assert!(is_visible_enough(true, 0.5, threshold));
        assert!(is_visible_enough(true, 0.9, threshold));
    }

    #[test]
    fn degenerate_timings_still_finish() {
        for (duration, frame) in [(2000.0, 0.0), (0.0, 16.0), (-5.0, 16.0), (2000.0, -1.0), (f64::NAN, 16.0)] {
            let settings = Settings {
                counter_duration_ms: duration,
                counter_frame_ms: frame,
                ..Settings::default()
            };
            let mut animation = CounterAnimation::new(150, &settings);
            assert_eq!(animation.tick(), CounterFrame::Finished(150), "duration {} frame {}", duration, frame);
        }
    }

    #[test]
    fn counter_reads_target_and_suffix() {
        let node = FakeNode::new().with_attr("data-target", "150").with_attr("data-suffix", "+");
        let counter = Counter::from_node(node.clone()).unwrap();
        assert_eq!(counter.target, 150);
        counter.render(CounterFrame::Finished(150));
        assert_eq!(node.text(), "150+");
    }

    #[test]
    fn unusable_targets_are_skipped() {
        assert!(Counter::from_node(FakeNode::new()).is_none());
        assert!(Counter::from_node(FakeNode::new().with_attr("data-target", "-5")).is_none());
        assert!(Counter::from_node(FakeNode::new().with_attr("data-target", "lots")).is_none());
    }
}
