use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Catalog has no {collection}")]
    EmptyCatalog { collection: &'static str },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;

/// Reasons a single session ends early.
///
/// These are normal control flow, never propagated as `SimError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAbort {
    /// The chosen restaurant has no menu rows at all.
    EmptyRestaurantMenu,
    /// Fewer eligible items than the session minimum after filtering.
    InsufficientCandidates { eligible: usize },
    /// Too few uncarted items left to fill a slate; ends the round loop only.
    InsufficientRecommendationSlate { remaining: usize },
}

impl SessionAbort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyRestaurantMenu                  => "empty_restaurant_menu",
            Self::InsufficientCandidates { .. }        => "insufficient_candidates",
            Self::InsufficientRecommendationSlate { .. } => "insufficient_recommendation_slate",
        }
    }
}
