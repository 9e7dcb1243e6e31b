pub mod classification;
pub mod detection;
pub mod pipeline;
pub mod recording;
pub mod session;
pub mod shared;
pub mod video;
