use serde::Serialize;

use crate::session::domain::label_tally::LabelTally;
use crate::shared::constants::{FACES_CARD_TITLE, FRAMES_CARD_TITLE, MOOD_CARD_TITLE};

/// One row of the emotion breakdown, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionShare {
    pub label: String,
    pub count: u64,
    /// `count / total × 100`, rounded; `None` when nothing was counted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
}

/// Snapshot of a session, derived from the aggregator's counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub running: bool,
    pub frames_processed: u64,
    pub faces_analyzed: u64,
    pub dominant_emotion: String,
    pub emotions: Vec<EmotionShare>,
    /// Decimal places the percentages were rounded to.
    #[serde(skip)]
    pub percent_precision: u32,
}

/// A dashboard metric: title, display value and progress-bar fill (0–100).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub fill_percent: f64,
}

impl SessionStats {
    pub fn from_counts(
        counts: &LabelTally,
        frames_processed: u64,
        running: bool,
        empty_label: &str,
        precision: u32,
    ) -> Self {
        let total = counts.total();
        let dominant_emotion = counts
            .leader()
            .map_or_else(|| empty_label.to_string(), |(l, _)| l.to_string());
        let emotions = counts
            .iter()
            .map(|(label, count)| EmotionShare {
                label: label.to_string(),
                count,
                percent: rounded_percent(count, total, precision),
            })
            .collect();

        Self {
            running,
            frames_processed,
            faces_analyzed: total,
            dominant_emotion,
            emotions,
            percent_precision: precision,
        }
    }

    pub fn count_for(&self, label: &str) -> u64 {
        self.emotions
            .iter()
            .find(|e| e.label == label)
            .map_or(0, |e| e.count)
    }

    pub fn percent_for(&self, label: &str) -> Option<f64> {
        self.emotions
            .iter()
            .find(|e| e.label == label)
            .and_then(|e| e.percent)
    }

    /// The three dashboard cards: faces, frames, overall mood.
    ///
    /// Faces and frames share a scale of `max(faces, frames, 1)` so the
    /// larger counter always shows a full bar.
    pub fn metric_cards(&self) -> [MetricCard; 3] {
        let faces = self.faces_analyzed;
        let frames = self.frames_processed;
        let max_ref = faces.max(frames).max(1) as f64;
        let fill = |v: u64| (v as f64 / max_ref * 100.0).min(100.0);

        [
            MetricCard {
                title: FACES_CARD_TITLE,
                value: faces.to_string(),
                fill_percent: fill(faces),
            },
            MetricCard {
                title: FRAMES_CARD_TITLE,
                value: frames.to_string(),
                fill_percent: fill(frames),
            },
            MetricCard {
                title: MOOD_CARD_TITLE,
                value: display_label(&self.dominant_emotion),
                fill_percent: 100.0,
            },
        ]
    }
}

/// Upper-cases the first character and lower-cases the rest.
pub fn display_label(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

fn rounded_percent(count: u64, total: u64, precision: u32) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let scale = 10f64.powi(precision as i32);
    let pct = count as f64 / total as f64 * 100.0;
    Some((pct * scale).round() / scale)
}
