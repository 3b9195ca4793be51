use clap::Parser;

/// Companion: a desktop avatar overlay.
#[derive(Parser, Debug)]
#[command(name = "companion", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Model file to load instead of `model.path` from the config.
    #[arg(long)]
    pub model: Option<String>,

    /// Log level override (trace, debug, info, warn, error) or a full
    /// filter directive.
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "companion",
            "--config",
            "/tmp/c.toml",
            "--model",
            "models/a/a.model3.json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.config.as_deref(), Some("/tmp/c.toml"));
        assert_eq!(args.model.as_deref(), Some("models/a/a.model3.json"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn everything_is_optional() {
        let args = Args::try_parse_from(["companion"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.model.is_none());
        assert!(args.log_level.is_none());
    }
}
