use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use emotion_session_core::pipeline::emotion_session_use_case::{
    EmotionSessionUseCase, FrameCallback, FrameReport,
};
use emotion_session_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use emotion_session_core::recording::infrastructure::jsonl_recording::{
    RecordedEmotionClassifier, RecordedFaceDetector, RecordedFrameSource, Recording,
};
use emotion_session_core::session::domain::aggregator_config::AggregatorConfig;
use emotion_session_core::session::domain::session_aggregator::SessionAggregator;
use emotion_session_core::session::domain::session_stats::{display_label, SessionStats};
use emotion_session_core::session::infrastructure::config_file::{self, ConfigFileError};

const BAR_WIDTH: usize = 20;

/// Replay a recorded face/emotion stream through a session aggregator.
#[derive(Parser)]
#[command(name = "emotion-session")]
struct Cli {
    /// JSON-Lines recording, one frame per line.
    recording: PathBuf,

    /// Aggregator config file (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Smoothing window size (recent labels considered per vote).
    #[arg(long)]
    window: Option<usize>,

    /// Decimal places for emotion percentages.
    #[arg(long)]
    precision: Option<u32>,

    /// Label recorded when the classifier fails on a face.
    #[arg(long)]
    unknown_label: Option<String>,

    /// Stop the session after this many frames.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_frames: Option<u64>,

    /// Print the session summary as JSON.
    #[arg(long)]
    json: bool,

    /// Log the smoothed label of every face as frames are processed.
    #[arg(long)]
    verbose_frames: bool,

    /// Write the effective config to this path before running.
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let stats = replay(&cli)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render_report(&stats));
    }
    Ok(())
}

/// Start → replay every frame (or until `--max-frames`) → stop.
fn replay(cli: &Cli) -> Result<SessionStats, Box<dyn std::error::Error>> {
    let config = build_config(cli)?;
    if let Some(path) = &cli.save_config {
        config_file::save(&config, path)?;
        log::info!("Config written to {}", path.display());
    }

    let recording = Arc::new(Recording::load(&cli.recording)?);
    let mut aggregator = SessionAggregator::new(config)?;

    let mut use_case = EmotionSessionUseCase::new(
        Box::new(RecordedFrameSource::new(Arc::clone(&recording))),
        Box::new(RecordedFaceDetector::new(Arc::clone(&recording))),
        Box::new(RecordedEmotionClassifier::new(Arc::clone(&recording))),
        Box::new(StdoutPipelineLogger::default()),
        Some(frame_callback(cli.max_frames, cli.verbose_frames)),
    );

    aggregator.reset();
    let frames = use_case.execute(&mut aggregator)?;
    aggregator.stop();

    log::info!("Replayed {frames} of {} recorded frames", recording.len());
    Ok(aggregator.summary())
}

fn build_config(cli: &Cli) -> Result<AggregatorConfig, ConfigFileError> {
    let mut config = config_file::load_or_default(cli.config.as_deref())?;
    if let Some(window) = cli.window {
        config.window_capacity = window;
    }
    if let Some(precision) = cli.precision {
        config.percent_precision = precision;
    }
    if let Some(label) = &cli.unknown_label {
        config.unknown_label = label.clone();
    }
    config.validate()?;
    Ok(config)
}

fn frame_callback(max_frames: Option<u64>, verbose: bool) -> FrameCallback {
    let mut seen = 0u64;
    Box::new(move |report: &FrameReport| {
        if verbose {
            for face in &report.faces {
                log::info!(
                    "frame {} face at ({}, {}): {} -> {}",
                    report.frame_index,
                    face.region.x,
                    face.region.y,
                    face.raw_label,
                    face.smoothed_label
                );
            }
        }
        seen += 1;
        max_frames.map_or(true, |max| seen < max)
    })
}

fn render_report(stats: &SessionStats) -> String {
    let mut out = String::new();
    for card in stats.metric_cards() {
        out.push_str(&format!(
            "{:<18}{:>8}  [{}] {:>3.0}%\n",
            card.title,
            card.value,
            bar(card.fill_percent),
            card.fill_percent
        ));
    }

    out.push_str("\nEmotion breakdown:\n");
    if stats.emotions.is_empty() {
        out.push_str("  No faces analyzed.\n");
        return out;
    }
    for emotion in &stats.emotions {
        let pct = emotion.percent.unwrap_or(0.0);
        out.push_str(&format!(
            "  {:<10}{:>6}  {:>6.*}%  {}\n",
            display_label(&emotion.label),
            emotion.count,
            stats.percent_precision as usize,
            pct,
            "#".repeat(filled_cells(pct))
        ));
    }
    out
}

fn bar(percent: f64) -> String {
    let filled = filled_cells(percent);
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn filled_cells(percent: f64) -> usize {
    ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize
}
