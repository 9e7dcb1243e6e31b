use thiserror::Error;

use crate::shared::face_crop::FaceCrop;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("no facial features found in crop")]
    NoFaceFeatures,
    #[error("face crop is empty")]
    EmptyCrop,
    #[error("classifier backend failed: {0}")]
    Backend(String),
}

/// Domain interface for per-face emotion classification.
///
/// Returns the dominant emotion tag for one face crop. Implementations wrap
/// a pretrained model and may be stateful, hence `&mut self`.
pub trait EmotionClassifier: Send {
    fn classify(&mut self, face: &FaceCrop) -> Result<String, ClassificationError>;
}

/// Maps a classifier outcome to the label fed to the aggregator.
///
/// Failures become `unknown_label`. This is a normal outcome, logged at
/// info level, never an error.
pub fn label_or_unknown(result: Result<String, ClassificationError>, unknown_label: &str) -> String {
    match result {
        Ok(label) => label,
        Err(e) => {
            log::info!("Classifier failed ({e}); using {unknown_label:?}");
            unknown_label.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_success_passes_label_through() {
        assert_eq!(label_or_unknown(Ok("happy".into()), "unknown"), "happy");
    }

    #[rstest]
    #[case::no_features(ClassificationError::NoFaceFeatures)]
    #[case::empty(ClassificationError::EmptyCrop)]
    #[case::backend(ClassificationError::Backend("timeout".into()))]
    fn test_failure_maps_to_sentinel(#[case] err: ClassificationError) {
        assert_eq!(label_or_unknown(Err(err), "unknown"), "unknown");
    }

    #[test]
    fn test_custom_sentinel() {
        assert_eq!(
            label_or_unknown(Err(ClassificationError::EmptyCrop), "Unknown"),
            "Unknown"
        );
    }

    #[test]
    fn test_error_display() {
        let err = ClassificationError::Backend("model not loaded".into());
        assert_eq!(err.to_string(), "classifier backend failed: model not loaded");
    }
}
