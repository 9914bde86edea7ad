use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use aethel::app::App;
use aethel::build_info;
use aethel::config::AppConfig;
use aethel::screen::ScreenId;
use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use winit::event_loop::{ControlFlow, EventLoop};

/// Aethel game shell
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration profile (defaults to APP_PROFILE, then the build profile)
    #[arg(long)]
    profile: Option<String>,

    /// Window width in logical pixels
    #[arg(long)]
    width: Option<f64>,

    /// Window height in logical pixels
    #[arg(long)]
    height: Option<f64>,

    /// Screen shown on launch
    #[arg(long, value_enum)]
    start: Option<ScreenId>,

    /// Directory assets are loaded from
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Directory the log file is written to
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.profile {
            Some(profile) => AppConfig::load(profile)
                .with_context(|| format!("failed to load profile '{profile}'"))?,
            None => AppConfig::load_from_env().context("failed to load configuration")?,
        };

        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if let Some(start) = self.start {
            config.screens.start = start;
        }
        if let Some(assets) = &self.assets {
            config.assets.dir = assets.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            config.logging.dir = Some(log_dir.clone());
        }

        Ok(config)
    }
}

/// Installs stderr logging plus, when `dir` is set, a plain-text log file
///
/// `RUST_LOG` takes precedence over the configured filter.
fn init_logging(filter: &str, dir: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let (file_layer, log_path) = match dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let path = dir.join(format!("{}.log", build_info::PKG_NAME));
            let file = File::create(&path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(log_path)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    let log_path = init_logging(&config.logging.filter, config.logging.dir.as_deref())?;
    build_info::log_build_info();
    if let Some(path) = &log_path {
        info!(path = %path.display(), "Logging to file");
    }
    if !config.assets.dir.is_dir() {
        warn!(dir = %config.assets.dir.display(), "Asset directory not found");
    }

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).context("event loop failed")?;

    if let Some(failure) = app.take_failure() {
        return Err(failure);
    }

    info!("Exited cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("aethel").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn test_flags_override_profile() {
        let cli = parse(&[
            "--profile",
            "debug",
            "--width",
            "800",
            "--height",
            "600",
            "--start",
            "options",
            "--assets",
            "/tmp/aethel-assets",
            "--log-dir",
            "/tmp/aethel-logs",
        ]);
        let config = cli.load_config().expect("load");

        assert_eq!(config.profile, "debug");
        assert_eq!(config.window.width, 800.0);
        assert_eq!(config.window.height, 600.0);
        assert_eq!(config.screens.start, ScreenId::Options);
        assert_eq!(config.assets.dir, PathBuf::from("/tmp/aethel-assets"));
        assert_eq!(config.logging.dir, Some(PathBuf::from("/tmp/aethel-logs")));
    }

    #[test]
    fn test_absent_flags_keep_profile_values() {
        let cli = parse(&["--profile", "debug"]);
        let baseline = AppConfig::load("debug").expect("load");
        let config = cli.load_config().expect("load");

        assert_eq!(config.window.width, baseline.window.width);
        assert_eq!(config.window.height, baseline.window.height);
        assert_eq!(config.screens.start, baseline.screens.start);
        assert_eq!(config.assets.dir, baseline.assets.dir);
        assert_eq!(config.logging.dir, baseline.logging.dir);
    }

    #[test]
    fn test_unknown_start_screen_is_rejected() {
        let result = Cli::try_parse_from(["aethel", "--start", "gameplay"]);
        assert!(result.is_err());
    }
}
