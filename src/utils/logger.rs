use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line events.
    Compact,
    /// One JSON object per event, for hosts that index structured output.
    Json,
}

impl LogFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "platform_utils=debug,info"
    } else {
        "platform_utils=info"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `verbose`.
///
/// Events go to stderr; stdout is reserved for command output.
pub fn init_logger(format: LogFormat, verbose: bool) {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(env_filter(verbose));

    match format {
        LogFormat::Compact => registry.with(layer.compact()).init(),
        LogFormat::Json => registry.with(layer.json()).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for verbose in [false, true] {
            assert!(EnvFilter::try_new(default_directive(verbose)).is_ok());
        }
        assert!(default_directive(true).contains("platform_utils=debug"));
        assert!(!default_directive(false).contains("debug"));
    }

    #[test]
    fn test_format_from_flag() {
        assert_eq!(LogFormat::from_flag(true), LogFormat::Json);
        assert_eq!(LogFormat::from_flag(false), LogFormat::Compact);
    }
}
