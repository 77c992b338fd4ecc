use std::collections::VecDeque;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

static INIT: Once = Once::new();

/// Thin wrapper over `tracing` that prepends a stack of prefixes, e.g. the
/// panel a log line belongs to.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    prefixes: VecDeque<String>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            prefixes: VecDeque::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push_back(prefix.into());
        self
    }

    fn prefix(&self) -> String {
        self.prefixes.iter().map(|p| format!("{} ", p)).collect()
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}{}", self.prefix(), message);
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!("{}{}", self.prefix(), message);
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!("{}{}", self.prefix(), message);
    }
}

/// Installs the global fmt subscriber once. Later calls are no-ops.
pub fn init_logging<W>(level: Level, writer: W, ansi: bool) -> Logger
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    if !tracing::dispatcher::has_been_set() {
        INIT.call_once(|| {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(writer)
                .with_ansi(ansi)
                .init();
        });
    }
    Logger::new()
}
