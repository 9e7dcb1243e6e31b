/// Number of recent raw labels kept for majority-vote smoothing.
pub const DEFAULT_WINDOW_CAPACITY: usize = 10;

/// Decimal places kept when rounding emotion percentages.
pub const DEFAULT_PERCENT_PRECISION: u32 = 1;

/// Upper bound on percentage precision; beyond this f64 rounding is noise.
pub const MAX_PERCENT_PRECISION: u32 = 6;

/// Label substituted when the classifier fails on a face crop.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Dominant-emotion placeholder for a session with no analysed faces.
pub const EMPTY_LABEL: &str = "N/A";

pub const FACES_CARD_TITLE: &str = "Faces Analyzed";
pub const FRAMES_CARD_TITLE: &str = "Frames Processed";
pub const MOOD_CARD_TITLE: &str = "Overall Mood";

/// Largest frame side accepted from a recording (16K video).
pub const MAX_FRAME_DIMENSION: u32 = 15360;

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "EmotionSession";
pub const CONFIG_FILE_NAME: &str = "aggregator.json";
