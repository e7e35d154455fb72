mod app;

use anyhow::{Context, Result};
use app::WindowDisplay;
use clap::Parser;
use cogex_bench::{BenchConfig, BenchRunner, Report};
use cogex_render::{find_font, load_font_file, Display, LoadedFont, OffscreenDisplay};
use cogex_timing::HighPrecisionTimer;
use env_logger::{Builder, Env};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cogex-textbench")]
#[command(author, version, about = "Draw time comparison of two text stimulus renderers", long_about = None)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random text length in characters
    #[arg(long)]
    text_length: Option<usize>,

    /// Change text every N frames
    #[arg(long)]
    change_every: Option<usize>,

    #[arg(long)]
    max_flips: Option<usize>,

    /// Font family looked up among installed fonts
    #[arg(long)]
    font: Option<String>,

    #[arg(long)]
    font_file: Option<PathBuf>,

    /// Render offscreen instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Flip rate of the headless display
    #[arg(long)]
    refresh_hz: Option<f64>,

    /// Seed for the random text
    #[arg(long)]
    seed: Option<u64>,

    /// Also write the reports to this file as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => BenchConfig::default(),
        };

        if let Some(n) = self.text_length {
            config.text_length = n;
        }
        if let Some(n) = self.change_every {
            config.change_every = n;
        }
        if let Some(n) = self.max_flips {
            config.max_flips = n;
        }
        if let Some(font) = &self.font {
            config.font = font.clone();
        }
        if let Some(path) = &self.font_file {
            config.font_file = Some(path.clone());
        }
        if let Some(hz) = self.refresh_hz {
            config.refresh_hz = hz;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn load_font(config: &BenchConfig) -> Result<LoadedFont> {
    let font = match &config.font_file {
        Some(path) => load_font_file(path)?,
        None => find_font(&config.font)?,
    };
    log::info!("using font {}", font.name);
    Ok(font)
}

fn run<D: Display>(
    config: BenchConfig,
    display: D,
    timer: HighPrecisionTimer,
    font: &LoadedFont,
) -> Result<Vec<Report>> {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let mut runner = BenchRunner::new(config, display, timer, rng);
    let (mut pair, init) = runner.bootstrap(font).context("creating stimuli")?;
    let reports = runner
        .run_session(&mut pair, &init)
        .context("running benchmark")?;
    Ok(reports)
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .init();

    let args = Args::parse();
    let config = args.config()?;
    log::info!(
        "platform {} {}, {} flips, text change every {} frames",
        std::env::consts::OS,
        std::env::consts::ARCH,
        config.max_flips,
        config.change_every
    );

    let font = load_font(&config)?;
    let timer = HighPrecisionTimer::with_frame_capacity(config.buffer_capacity);

    let reports = if args.headless {
        let (width, height) = config.resolution;
        let display = OffscreenDisplay::new(width, height, timer.clone())?
            .with_refresh_rate(config.refresh_hz);
        run(config, display, timer, &font)?
    } else {
        #[cfg(target_os = "windows")]
        unsafe {
            windows::Win32::Media::timeBeginPeriod(1);
        }

        let result = WindowDisplay::new(config.resolution, config.fullscreen, timer.clone())
            .and_then(|display| run(config, display, timer, &font));

        #[cfg(target_os = "windows")]
        unsafe {
            windows::Win32::Media::timeEndPeriod(1);
        }

        result?
    };

    for report in &reports {
        println!("{report}");
    }

    if let Some(path) = &args.json {
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &reports)?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "cogex-textbench",
            "--max-flips",
            "30",
            "--change-every",
            "3",
            "--headless",
        ]);
        let config = args.config().unwrap();
        assert!(args.headless);
        assert_eq!(config.max_flips, 30);
        assert_eq!(config.change_every, 3);
        assert_eq!(config.text_length, 160);
    }

    #[test]
    fn invalid_flag_values_are_rejected() {
        let args = Args::parse_from(["cogex-textbench", "--change-every", "0"]);
        assert!(args.config().is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Args::parse_from(["cogex-textbench", "--config", "/no/such/config.json"]);
        assert!(args.config().is_err());
    }
}
