use crate::data::models::PlayerRange;
use crate::sync::DEFAULT_BATCH_SIZE;
use clap::{Parser, ValueEnum};

/// Sync MLB player team history from the MLB Stats API into PostgreSQL.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Inclusive player id range, e.g. `[110001,833238]`
    #[arg(long, value_name = "[START,END]")]
    pub player_range: PlayerRange,

    /// Number of players fetched per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, value_parser = parse_batch_size)]
    pub batch_size: usize,

    /// Log output format
    #[arg(long, value_enum, default_value_t = default_tracing_format())]
    pub tracing: TracingFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TracingFormat {
    /// Human-readable, one event per line
    Pretty,
    /// Newline-delimited JSON
    Json,
}

fn default_tracing_format() -> TracingFormat {
    if cfg!(debug_assertions) {
        TracingFormat::Pretty
    } else {
        TracingFormat::Json
    }
}

fn parse_batch_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("batch size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid batch size '{s}': {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::PlayerId;

    #[test]
    fn parses_required_range_with_defaults() {
        let args = Args::try_parse_from(["history-sync", "--player-range", "[110001,833238]"])
            .unwrap();
        assert_eq!(args.player_range.start, PlayerId(110001));
        assert_eq!(args.player_range.end, PlayerId(833238));
        assert_eq!(args.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn accepts_batch_size_and_format() {
        let args = Args::try_parse_from([
            "history-sync",
            "--player-range=[1,3]",
            "--batch-size",
            "25",
            "--tracing",
            "json",
        ])
        .unwrap();
        assert_eq!(args.batch_size, 25);
        assert_eq!(args.tracing, TracingFormat::Json);
    }

    #[test]
    fn range_is_required() {
        assert!(Args::try_parse_from(["history-sync"]).is_err());
    }

    #[test]
    fn malformed_range_is_rejected() {
        assert!(Args::try_parse_from(["history-sync", "--player-range", "[5,1]"]).is_err());
        assert!(Args::try_parse_from(["history-sync", "--player-range", "1-5"]).is_err());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let result =
            Args::try_parse_from(["history-sync", "--player-range", "[1,3]", "--batch-size", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
