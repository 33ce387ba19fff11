use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const LOG_PREFIX: &str = "weekgold";
const MAX_LOG_FILES: usize = 5;

/// How the binary logs. Files always go to `<app dir>/logs` and rotate daily, stderr only gets a
/// copy in verbose mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub logs_dir: PathBuf,
    /// Overrides `RUST_LOG` when set.
    pub level: Option<LevelFilter>,
    pub echo_stderr: bool,
}

impl LogSettings {
    /// `--log` turns on trace level and the stderr copy.
    pub fn new(application_data_path: &Path, verbose: bool) -> Self {
        Self {
            logs_dir: application_data_path.join("logs"),
            level: verbose.then_some(LevelFilter::TRACE),
            echo_stderr: verbose,
        }
    }

    /// Filter directive limited to this crate, e.g. `weekgold=info`.
    pub fn directive(&self, rust_log: Option<&str>) -> String {
        let level = match (self.level, rust_log) {
            (Some(level), _) => level.to_string().to_lowercase(),
            (None, Some(level)) if !level.trim().is_empty() => level.trim().to_string(),
            (None, _) => "info".to_string(),
        };
        format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
    }

    pub fn init(&self) -> Result<()> {
        let appender = tracing_appender::rolling::Builder::new()
            .rotation(Rotation::DAILY)
            .max_log_files(MAX_LOG_FILES)
            .filename_prefix(LOG_PREFIX)
            .build(&self.logs_dir)?;

        let echo = self.echo_stderr;
        let stderr = std::io::stderr.with_filter(move |_| echo);
        let rust_log = std::env::var("RUST_LOG").ok();

        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(self.directive(rust_log.as_deref())))
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(stderr.and(appender))
            .with_ansi(echo)
            .pretty()
            .init();
        Ok(())
    }
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});
