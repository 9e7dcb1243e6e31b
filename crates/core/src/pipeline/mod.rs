pub mod emotion_session_use_case;
pub mod pipeline_logger;
