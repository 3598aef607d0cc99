use log::Level;

/// Severity of a trace line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Warning,
    Error,
}

impl Severity {
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Debug => ":::Debug:::",
            Severity::Warning => ":::Warning:::",
            Severity::Error => ":::Error:::",
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Severity::Debug => Level::Debug,
            Severity::Warning => Level::Warn,
            Severity::Error => Level::Error,
        }
    }
}

/// Fire-and-forget sink for trace lines.
pub trait TraceSink: Send + Sync {
    fn write(&self, severity: Severity, type_name: &str, operation: &str, message: &str);
}

/// Forwards trace lines to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn write(&self, severity: Severity, type_name: &str, operation: &str, message: &str) {
        log::log!(
            target: "pgmap",
            severity.level(),
            "{} -> {}.{} -> {}",
            severity.tag(),
            type_name,
            operation,
            message
        );
    }
}
