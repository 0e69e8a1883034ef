//! Domain types shared by the loader, fetcher, coordinator and sink.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Maximum stored length of a transaction description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 255;

/// MLB player id (`mlb_player.player`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
pub struct PlayerId(pub i32);

/// MLB team id (`mlb_team.mlb_team`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
pub struct TeamId(pub i32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One row of `mlb_player_team_history`. Keyed by `(player, date)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub player: PlayerId,
    pub date: NaiveDate,
    pub team: TeamId,
    pub description: String,
}

impl TransactionRecord {
    pub fn key(&self) -> (PlayerId, NaiveDate) {
        (self.player, self.date)
    }
}

/// Trim surrounding whitespace and cap at [`MAX_DESCRIPTION_CHARS`] characters.
pub fn normalize_description(raw: &str) -> String {
    raw.trim().chars().take(MAX_DESCRIPTION_CHARS).collect()
}

/// Inclusive player id range, written on the command line as `[start,end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerRange {
    pub start: PlayerId,
    pub end: PlayerId,
}

impl PlayerRange {
    /// Number of ids the range covers, whether or not they exist in the store.
    pub fn id_count(&self) -> u64 {
        (i64::from(self.end.0) - i64::from(self.start.0) + 1) as u64
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.start <= player && player <= self.end
    }
}

impl fmt::Display for PlayerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.start, self.end)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RangeParseError {
    #[error("invalid player range '{0}', expected [start,end]")]
    Format(String),
    #[error("invalid player id '{0}'")]
    InvalidId(String),
    #[error("range start {start} is greater than end {end}")]
    Inverted { start: i32, end: i32 },
}

impl FromStr for PlayerRange {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s.trim().trim_start_matches('[').trim_end_matches(']');
        let (start, end) = inner
            .split_once(',')
            .ok_or_else(|| RangeParseError::Format(s.to_owned()))?;
        if end.contains(',') {
            return Err(RangeParseError::Format(s.to_owned()));
        }

        let parse_id = |part: &str| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| RangeParseError::InvalidId(part.trim().to_owned()))
        };
        let (start, end) = (parse_id(start)?, parse_id(end)?);

        if start > end {
            return Err(RangeParseError::Inverted { start, end });
        }

        Ok(Self {
            start: PlayerId(start),
            end: PlayerId(end),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bracketed_range() {
        let range: PlayerRange = "[110001,833238]".parse().unwrap();
        assert_eq!(range.start, PlayerId(110001));
        assert_eq!(range.end, PlayerId(833238));
        assert_eq!(range.id_count(), 723238);
    }

    #[test]
    fn tolerates_whitespace_and_missing_brackets() {
        let range: PlayerRange = " [ 1 , 3 ] ".parse().unwrap();
        assert_eq!((range.start, range.end), (PlayerId(1), PlayerId(3)));

        let range: PlayerRange = "5,5".parse().unwrap();
        assert_eq!(range.id_count(), 1);
        assert!(range.contains(PlayerId(5)));
        assert!(!range.contains(PlayerId(6)));
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(matches!(
            "[1;3]".parse::<PlayerRange>(),
            Err(RangeParseError::Format(_))
        ));
        assert!(matches!(
            "[1,2,3]".parse::<PlayerRange>(),
            Err(RangeParseError::Format(_))
        ));
        assert_eq!(
            "[a,3]".parse::<PlayerRange>(),
            Err(RangeParseError::InvalidId("a".to_owned()))
        );
        assert_eq!(
            "[9,3]".parse::<PlayerRange>(),
            Err(RangeParseError::Inverted { start: 9, end: 3 })
        );
    }

    #[test]
    fn short_descriptions_are_kept_verbatim() {
        let text = "Signed as a free agent.";
        assert_eq!(normalize_description(text), text);

        let exact = "x".repeat(MAX_DESCRIPTION_CHARS);
        assert_eq!(normalize_description(&exact), exact);
    }

    #[test]
    fn long_descriptions_are_truncated_to_limit() {
        let long = "y".repeat(MAX_DESCRIPTION_CHARS + 40);
        let normalized = normalize_description(&long);
        assert_eq!(normalized.chars().count(), MAX_DESCRIPTION_CHARS);
        assert!(long.starts_with(&normalized));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let long = "é".repeat(MAX_DESCRIPTION_CHARS + 1);
        assert_eq!(
            normalize_description(&long).chars().count(),
            MAX_DESCRIPTION_CHARS
        );
    }

    #[test]
    fn descriptions_are_trimmed() {
        assert_eq!(normalize_description("  Traded.\n"), "Traded.");
    }
}
