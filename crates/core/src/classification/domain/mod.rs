pub mod emotion_classifier;
