use crate::session::domain::aggregator_config::{AggregatorConfig, ConfigError};
use crate::session::domain::label_tally::LabelTally;
use crate::session::domain::session_stats::SessionStats;
use crate::session::domain::trailing_window::TrailingWindow;

/// Per-session emotion state: smoothing window, smoothed-label counts and
/// frame counter, plus the Running/Stopped flag.
///
/// Pure in-memory and single-writer. Each session (UI client, batch run)
/// owns its own instance; nothing here is global.
///
/// A new aggregator starts Stopped. [`reset`](Self::reset) starts a session
/// from zero; [`stop`](Self::stop) freezes the counters until the next reset.
#[derive(Clone, Debug)]
pub struct SessionAggregator {
    config: AggregatorConfig,
    window: TrailingWindow,
    counts: LabelTally,
    frame_count: u64,
    running: bool,
}

impl SessionAggregator {
    pub fn new(config: AggregatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let window = TrailingWindow::new(config.window_capacity)?;
        Ok(Self {
            config,
            window,
            counts: LabelTally::new(),
            frame_count: 0,
            running: false,
        })
    }

    /// Start: clears all accumulated state and marks the session running.
    pub fn reset(&mut self) {
        self.window.clear();
        self.counts.clear();
        self.frame_count = 0;
        self.running = true;
        log::debug!("Session started (window capacity {})", self.window.capacity());
    }

    /// Stop: freezes the session. Accumulated state stays readable.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!(
                "Session stopped after {} frames, {} faces",
                self.frame_count,
                self.counts.total()
            );
        }
        self.running = false;
    }

    /// Counts one acquired frame, whether or not it contained faces.
    pub fn on_frame(&mut self) {
        if !self.running {
            log::trace!("Frame ignored: session stopped");
            return;
        }
        self.frame_count += 1;
    }

    /// Feeds one raw classifier label and returns the smoothed label.
    ///
    /// Never fails: any string, including the empty string and the unknown
    /// sentinel, is an opaque key. When stopped the state is left untouched
    /// and the returned label is what the window would vote for.
    pub fn push_raw_label(&mut self, label: &str) -> String {
        if !self.running {
            return self.window.preview(label);
        }
        let smoothed = self.window.push(label);
        self.counts.increment(&smoothed);
        log::trace!("Raw {label:?} smoothed to {smoothed:?}");
        smoothed
    }

    /// Most frequent smoothed label so far, or the empty sentinel.
    pub fn dominant_emotion(&self) -> String {
        self.counts
            .leader()
            .map_or_else(|| self.config.empty_label.clone(), |(l, _)| l.to_string())
    }

    pub fn summary(&self) -> SessionStats {
        SessionStats::from_counts(
            &self.counts,
            self.frame_count,
            self.running,
            &self.config.empty_label,
            self.config.percent_precision,
        )
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn counts(&self) -> &LabelTally {
        &self.counts
    }

    pub fn window(&self) -> &TrailingWindow {
        &self.window
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }
}

impl Default for SessionAggregator {
    fn default() -> Self {
        Self {
            config: AggregatorConfig::default(),
            window: TrailingWindow::default(),
            counts: LabelTally::new(),
            frame_count: 0,
            running: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn running() -> SessionAggregator {
        let mut agg = SessionAggregator::default();
        agg.reset();
        agg
    }

    fn with_capacity(capacity: usize) -> SessionAggregator {
        let mut agg = SessionAggregator::new(AggregatorConfig {
            window_capacity: capacity,
            ..Default::default()
        })
        .unwrap();
        agg.reset();
        agg
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    #[test]
    fn test_new_aggregator_is_stopped_and_empty() {
        let agg = SessionAggregator::default();
        assert!(!agg.is_running());
        assert_eq!(agg.frame_count(), 0);
        assert!(agg.counts().is_empty());
    }

    #[test]
    fn test_zero_capacity_config_rejected() {
        let result = SessionAggregator::new(AggregatorConfig {
            window_capacity: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidWindowCapacity(0))));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut agg = running();
        agg.on_frame();
        agg.push_raw_label("happy");
        agg.stop();

        agg.reset();
        assert!(agg.is_running());
        assert_eq!(agg.frame_count(), 0);
        assert!(agg.counts().is_empty());
        assert!(agg.window().is_empty());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut agg = running();
        agg.reset();
        agg.reset();
        assert!(agg.is_running());
        assert_eq!(agg.frame_count(), 0);
        assert!(agg.counts().is_empty());
    }

    #[test]
    fn test_stop_twice_equals_stop_once() {
        let mut agg = running();
        agg.on_frame();
        agg.push_raw_label("sad");

        agg.stop();
        let once = agg.summary();
        agg.stop();
        let twice = agg.summary();
        assert_eq!(once, twice);
        assert!(!agg.is_running());
    }

    #[test]
    fn test_stopped_session_is_frozen() {
        let mut agg = running();
        agg.on_frame();
        agg.push_raw_label("happy");
        agg.stop();

        agg.on_frame();
        let label = agg.push_raw_label("happy");
        assert_eq!(label, "happy");
        assert_eq!(agg.frame_count(), 1);
        assert_eq!(agg.counts().total(), 1);
        assert_eq!(agg.window().len(), 1);
    }

    // ── Frames ───────────────────────────────────────────────────────

    #[test]
    fn test_on_frame_counts_frames_without_faces() {
        let mut agg = running();
        for _ in 0..5 {
            agg.on_frame();
        }
        assert_eq!(agg.frame_count(), 5);
        assert_eq!(agg.summary().faces_analyzed, 0);
    }

    // ── Smoothing ────────────────────────────────────────────────────

    #[test]
    fn test_majority_vote() {
        let mut agg = running();
        agg.push_raw_label("happy");
        agg.push_raw_label("happy");
        assert_eq!(agg.push_raw_label("sad"), "happy");
    }

    #[test]
    fn test_tie_returns_earliest() {
        let mut agg = running();
        agg.push_raw_label("happy");
        assert_eq!(agg.push_raw_label("sad"), "happy");
    }

    #[test]
    fn test_counts_record_smoothed_not_raw_labels() {
        let mut agg = running();
        for label in ["happy", "happy", "sad"] {
            agg.push_raw_label(label);
        }
        assert_eq!(agg.counts().count("happy"), 3);
        assert_eq!(agg.counts().count("sad"), 0);
    }

    #[test]
    fn test_window_bounded_by_capacity() {
        let mut agg = with_capacity(3);
        for label in ["a", "b", "c", "d", "e", "f"] {
            agg.push_raw_label(label);
            assert!(agg.window().len() <= 3);
        }
        let contents: Vec<_> = agg.window().iter().collect();
        assert_eq!(contents, vec!["d", "e", "f"]);
    }

    #[test]
    fn test_unknown_sentinel_is_an_ordinary_label() {
        let mut agg = running();
        agg.push_raw_label("unknown");
        agg.push_raw_label("unknown");
        assert_eq!(agg.push_raw_label("happy"), "unknown");
        assert_eq!(agg.counts().count("unknown"), 3);
        assert_eq!(agg.dominant_emotion(), "unknown");
    }

    #[test]
    fn test_empty_string_label_accepted() {
        let mut agg = running();
        assert_eq!(agg.push_raw_label(""), "");
        assert_eq!(agg.counts().count(""), 1);
    }

    // ── Monotonic counters ───────────────────────────────────────────

    #[test]
    fn test_counters_never_decrease_while_running() {
        let mut agg = with_capacity(3);
        let labels = ["happy", "sad", "sad", "angry", "happy", "happy", "fear"];
        let mut prev_frames = 0;
        let mut prev_counts: Vec<(String, u64)> = Vec::new();

        for label in labels {
            agg.on_frame();
            agg.push_raw_label(label);

            assert!(agg.frame_count() > prev_frames);
            for (l, c) in &prev_counts {
                assert!(agg.counts().count(l) >= *c);
            }
            prev_frames = agg.frame_count();
            prev_counts = agg
                .counts()
                .iter()
                .map(|(l, c)| (l.to_string(), c))
                .collect();
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    #[test]
    fn test_empty_session_queries_do_not_fail() {
        let agg = SessionAggregator::default();
        assert_eq!(agg.dominant_emotion(), "N/A");
        let stats = agg.summary();
        assert_eq!(stats.faces_analyzed, 0);
        assert_eq!(stats.dominant_emotion, "N/A");
    }

    #[test]
    fn test_custom_empty_sentinel() {
        let agg = SessionAggregator::new(AggregatorConfig {
            empty_label: "none".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(agg.dominant_emotion(), "none");
    }

    #[test]
    fn test_summary_three_happy_one_sad() {
        // Capacity 1 disables smoothing so counts mirror the raw labels.
        let mut agg = with_capacity(1);
        for label in ["happy", "happy", "sad", "happy"] {
            agg.on_frame();
            agg.push_raw_label(label);
        }
        agg.stop();

        let stats = agg.summary();
        assert_eq!(stats.faces_analyzed, 4);
        assert_eq!(stats.frames_processed, 4);
        assert_eq!(stats.dominant_emotion, "happy");
        assert!(!stats.running);
        assert_relative_eq!(stats.percent_for("happy").unwrap(), 75.0);
        assert_relative_eq!(stats.percent_for("sad").unwrap(), 25.0);
    }

    #[test]
    fn test_summary_while_running_is_live_snapshot() {
        let mut agg = running();
        agg.on_frame();
        agg.push_raw_label("neutral");
        let stats = agg.summary();
        assert!(stats.running);
        assert_eq!(stats.faces_analyzed, 1);
    }

    #[test]
    fn test_dominant_tie_goes_to_first_counted() {
        let mut agg = with_capacity(1);
        for label in ["sad", "happy", "happy", "sad"] {
            agg.push_raw_label(label);
        }
        assert_eq!(agg.dominant_emotion(), "sad");
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = running();
        let mut b = running();
        a.push_raw_label("happy");
        b.push_raw_label("sad");
        assert_eq!(a.dominant_emotion(), "happy");
        assert_eq!(b.dominant_emotion(), "sad");
    }
}
