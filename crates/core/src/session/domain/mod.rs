pub mod aggregator_config;
pub mod label_tally;
pub mod session_aggregator;
pub mod session_stats;
pub mod trailing_window;
