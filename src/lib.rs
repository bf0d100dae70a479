pub mod config;
pub mod critical;
pub mod decider;
pub mod deflation;
pub mod error;
pub mod metrics;
pub mod score;
pub mod snapshot;
pub mod stats;
pub mod threshold;
pub mod transport;

/// dimensional analysis types
pub type AttributeId = String;
pub type Probability = f64;
pub type Correlation = f64;
pub type Score = f64;
pub type Rate = f64;

// capacity and stream parameters
pub const DEFAULT_CAPACITY: usize = 1000;
pub const DEFAULT_TOTAL_PEOPLE: usize = 10_000;

/// progress bar, matching the look of a long-running stream consumer
pub fn progress(n: usize) -> indicatif::ProgressBar {
    let tick = std::time::Duration::from_millis(200);
    let style = "{spinner:.cyan} {elapsed} ~ {percent:>3}% {wide_bar:.cyan} {pos}/{len}";
    let style = indicatif::ProgressStyle::with_template(style).unwrap();
    let progress = indicatif::ProgressBar::new(n as u64);
    progress.set_style(style);
    progress.enable_steady_tick(tick);
    progress
}

/// initialize term + file logging
pub fn init_logging() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

pub use config::{Config, Preset, Tunables};
pub use decider::AdmissionDecider;
pub use error::{AdmissionError, Result};
pub use metrics::Metrics;
