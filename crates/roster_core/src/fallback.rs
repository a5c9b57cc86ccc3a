use crate::{FetchError, Position};

/// Where the current position list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionsSource {
    #[default]
    NotLoaded,
    Remote,
    BuiltIn,
}

/// Resolved positions plus whether a warning must be surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionsOutcome {
    pub positions: Vec<Position>,
    pub source: PositionsSource,
    pub warning: Option<FetchError>,
}

/// What a failed user page does to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsersFallback {
    ClearAndBlock,
    KeepLoaded,
}

/// How a failed read is degraded, per data kind.
///
/// Positions are a convenience default and get substituted. The user list is
/// primary content and never is: its failures become an explicit error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FallbackPolicy;

impl FallbackPolicy {
    pub fn positions(&self, result: Result<Vec<Position>, FetchError>) -> PositionsOutcome {
        match result {
            Ok(positions) if !positions.is_empty() => PositionsOutcome {
                positions,
                source: PositionsSource::Remote,
                warning: None,
            },
            Ok(_) => Self::built_in(FetchError::Malformed("empty position list".to_owned())),
            Err(err) => Self::built_in(err),
        }
    }

    /// The user list has no substitute. A failed first page clears the list
    /// and blocks; a failed later page keeps what is already loaded.
    pub fn users(&self, page: u32) -> UsersFallback {
        if page <= 1 {
            UsersFallback::ClearAndBlock
        } else {
            UsersFallback::KeepLoaded
        }
    }

    fn built_in(reason: FetchError) -> PositionsOutcome {
        PositionsOutcome {
            positions: builtin_positions(),
            source: PositionsSource::BuiltIn,
            warning: Some(reason),
        }
    }
}

pub fn builtin_positions() -> Vec<Position> {
    vec![
        Position::new(1, "Frontend Developer"),
        Position::new(2, "Backend Developer"),
        Position::new(3, "Designer"),
    ]
}
