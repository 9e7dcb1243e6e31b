use std::collections::VecDeque;

use crate::session::domain::aggregator_config::ConfigError;
use crate::session::domain::label_tally::LabelTally;
use crate::shared::constants::DEFAULT_WINDOW_CAPACITY;

/// Fixed-capacity FIFO of the most recent raw labels.
///
/// The smoothed label is the majority vote over the window contents; on a
/// tie the label whose first occurrence in the window is oldest wins.
#[derive(Clone, Debug)]
pub struct TrailingWindow {
    capacity: usize,
    labels: VecDeque<String>,
}

impl TrailingWindow {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidWindowCapacity(capacity));
        }
        Ok(Self {
            capacity,
            labels: VecDeque::with_capacity(capacity),
        })
    }

    /// Appends `label`, evicting the oldest entry when full, and returns
    /// the majority label of the updated window.
    pub fn push(&mut self, label: &str) -> String {
        if self.labels.len() == self.capacity {
            if let Some(evicted) = self.labels.pop_front() {
                log::trace!("Window evicted {evicted:?}");
            }
        }
        self.labels.push_back(label.to_string());
        // Window holds at least the label just pushed.
        self.majority().unwrap_or_else(|| label.to_string())
    }

    /// The label [`push`](Self::push) would return, without modifying the window.
    pub fn preview(&self, label: &str) -> String {
        let skip = usize::from(self.labels.len() == self.capacity);
        let tally: LabelTally = self
            .labels
            .iter()
            .skip(skip)
            .map(String::as_str)
            .chain(std::iter::once(label))
            .collect();
        tally
            .leader()
            .map_or_else(|| label.to_string(), |(l, _)| l.to_string())
    }

    pub fn majority(&self) -> Option<String> {
        let tally: LabelTally = self.labels.iter().map(String::as_str).collect();
        tally.leader().map(|(l, _)| l.to_string())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}

impl Default for TrailingWindow {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_WINDOW_CAPACITY,
            labels: VecDeque::with_capacity(DEFAULT_WINDOW_CAPACITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn window(capacity: usize) -> TrailingWindow {
        TrailingWindow::new(capacity).unwrap()
    }

    fn push_all(w: &mut TrailingWindow, labels: &[&str]) -> String {
        let mut last = String::new();
        for l in labels {
            last = w.push(l);
        }
        last
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            TrailingWindow::new(0),
            Err(ConfigError::InvalidWindowCapacity(0))
        ));
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(TrailingWindow::default().capacity(), 10);
    }

    #[test]
    fn test_empty_window_has_no_majority() {
        assert!(window(3).majority().is_none());
    }

    #[test]
    fn test_single_push_returns_label() {
        let mut w = window(10);
        assert_eq!(w.push("happy"), "happy");
    }

    #[test]
    fn test_majority_wins() {
        let mut w = window(10);
        assert_eq!(push_all(&mut w, &["happy", "happy", "sad"]), "happy");
    }

    #[test]
    fn test_tie_goes_to_earliest_inserted() {
        let mut w = window(10);
        assert_eq!(push_all(&mut w, &["happy", "sad"]), "happy");
    }

    #[test]
    fn test_tie_not_alphabetical() {
        let mut w = window(10);
        assert_eq!(push_all(&mut w, &["sad", "angry"]), "sad");
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let mut w = window(3);
        for i in 0..20 {
            w.push(&format!("label{}", i % 4));
            assert!(w.len() <= 3);
        }
    }

    #[test]
    fn test_holds_most_recent_after_overflow() {
        let mut w = window(3);
        push_all(&mut w, &["a", "b", "c", "d", "e"]);
        let contents: Vec<_> = w.iter().collect();
        assert_eq!(contents, vec!["c", "d", "e"]);
    }

    #[test]
    fn test_eviction_changes_majority() {
        let mut w = window(3);
        push_all(&mut w, &["happy", "happy", "sad"]);
        // Evicts first "happy": window = [happy, sad, sad]
        assert_eq!(w.push("sad"), "sad");
    }

    #[test]
    fn test_tie_after_eviction_uses_window_order() {
        let mut w = window(2);
        push_all(&mut w, &["happy", "sad"]);
        // Window becomes [sad, happy]; sad is now the earliest.
        assert_eq!(w.push("happy"), "sad");
    }

    #[rstest]
    #[case::not_full(&["happy", "sad"], "sad", "sad")]
    #[case::full_with_eviction(&["happy", "happy", "sad"], "sad", "sad")]
    #[case::majority_kept(&["happy", "happy"], "sad", "happy")]
    fn test_preview_matches_push(
        #[case] history: &[&str],
        #[case] next: &str,
        #[case] expected: &str,
    ) {
        let mut w = window(3);
        push_all(&mut w, history);
        let before: Vec<String> = w.iter().map(str::to_string).collect();

        let previewed = w.preview(next);
        let after: Vec<String> = w.iter().map(str::to_string).collect();
        assert_eq!(before, after, "preview must not mutate");
        assert_eq!(previewed, expected);
        assert_eq!(w.push(next), expected);
    }

    #[test]
    fn test_clear() {
        let mut w = window(3);
        push_all(&mut w, &["a", "b"]);
        w.clear();
        assert!(w.is_empty());
        assert_eq!(w.capacity(), 3);
    }
}
