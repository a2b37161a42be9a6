//! Dynamic sizing for the isolated rendering strategy.
//!
//! The isolated browsing context has no intrinsic size, and its content
//! keeps changing after the initial write: images finish loading, scripts
//! settle, accordions expand. The sizer owns the recompute schedule (an
//! immediate pass, fixed settle delays, and a bounded fallback poll) and
//! folds in the event-driven signals the shell forwards from its mutation
//! and resize observers. The shell applies the returned heights to the
//! frame element.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::RenderConfig;

/// A snapshot of the embedded document's measurable extents, in the shape
/// the shell forwards from its observers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentGeometry {
    pub scroll_height: f64,
    pub offset_height: f64,
    pub client_height: f64,
    /// Bounding-rectangle bottom of every element. Covers absolutely and
    /// fixed-positioned content that contributes nothing to scroll height.
    pub rect_bottoms: Vec<f64>,
}

impl DocumentGeometry {
    /// True content height: the maximum of the document heights and every
    /// element's rect bottom.
    pub fn content_height(&self) -> f64 {
        let mut height = self
            .scroll_height
            .max(self.offset_height)
            .max(self.client_height);
        for bottom in &self.rect_bottoms {
            height = height.max(*bottom);
        }
        height.max(0.0)
    }
}

/// Why a re-measure is happening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSignal {
    /// Right after the document write
    InitialWrite,
    /// A fixed delay after the write, catching late style/script settling
    SettleDelay,
    /// An image in the document finished loading
    ImageLoad,
    /// An image in the document failed to load
    ImageError,
    /// The isolated context's window fired its load event
    FrameLoad,
    /// The isolated context's window was resized
    FrameResize,
    /// A DOM mutation inside the document
    Mutation,
    /// The document body/root changed size
    BodyResize,
    /// Fallback poll tick, the safety net against missed observer signals
    PollTick,
}

/// Keeps a frame element's height equal to its content's true height.
#[derive(Debug)]
pub struct FrameSizer {
    settle_delays: Vec<Duration>,
    poll_interval: Duration,
    poll_budget: u32,
    deadlines: Vec<(Instant, SizeSignal)>,
    polls_fired: u32,
    current: Option<u32>,
    finished: bool,
}

impl FrameSizer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            settle_delays: config.settle_delays.clone(),
            poll_interval: config.poll_interval,
            poll_budget: config.poll_budget,
            deadlines: Vec::new(),
            polls_fired: 0,
            current: None,
            finished: false,
        }
    }

    /// Current applied height, if any measurement has landed.
    pub fn current_height(&self) -> Option<u32> {
        self.current
    }

    /// Establish the recompute schedule for a freshly written document.
    pub fn bootstrap(&mut self, now: Instant) {
        if self.finished {
            return;
        }
        self.deadlines.clear();
        self.polls_fired = 0;
        self.deadlines.push((now, SizeSignal::InitialWrite));
        for delay in &self.settle_delays {
            self.deadlines.push((now + *delay, SizeSignal::SettleDelay));
        }
        if self.poll_budget > 0 {
            self.deadlines
                .push((now + self.poll_interval, SizeSignal::PollTick));
        }
        self.deadlines.sort_by_key(|(at, _)| *at);
    }

    /// Drain the signals whose deadline has passed. Poll ticks reschedule
    /// themselves until the budget is spent.
    pub fn due(&mut self, now: Instant) -> Vec<SizeSignal> {
        if self.finished {
            return Vec::new();
        }
        let mut fired = Vec::new();
        let mut remaining = Vec::new();
        for (at, signal) in self.deadlines.drain(..) {
            if at <= now {
                if signal == SizeSignal::PollTick {
                    self.polls_fired += 1;
                    if self.polls_fired < self.poll_budget {
                        remaining.push((at + self.poll_interval, SizeSignal::PollTick));
                    }
                }
                fired.push(signal);
            } else {
                remaining.push((at, signal));
            }
        }
        remaining.sort_by_key(|(at, _)| *at);
        self.deadlines = remaining;
        fired
    }

    /// Fold in a measurement. Returns the new height only when it changed.
    pub fn observe(&mut self, signal: SizeSignal, geometry: &DocumentGeometry) -> Option<u32> {
        if self.finished {
            return None;
        }
        let height = geometry.content_height().ceil() as u32;
        if self.current == Some(height) {
            return None;
        }
        tracing::debug!(?signal, height, "frame height updated");
        self.current = Some(height);
        Some(height)
    }

    /// Cancel the schedule. After teardown no signal produces an update.
    pub fn teardown(&mut self) {
        self.finished = true;
        self.deadlines.clear();
    }

    pub fn finished(&self) -> bool {
        self.finished
    }
}
