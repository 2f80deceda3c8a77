use reqwest::StatusCode;
use thiserror::Error;

use crate::category::Category;

/// The outbound request to the listing endpoint did not complete successfully.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {category} failed: {source}")]
    Transport {
        category: Category,
        #[source]
        source: reqwest::Error,
    },

    #[error("listing endpoint returned {status} for {category}")]
    Status {
        category: Category,
        status: StatusCode,
    },
}

impl FetchError {
    pub fn category(&self) -> Category {
        match self {
            FetchError::Transport { category, .. } | FetchError::Status { category, .. } => {
                *category
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Transport { source, .. } if source.is_timeout())
    }
}

/// The payload could not be read as a feed document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed {category} feed: {source}")]
    Malformed {
        category: Category,
        #[source]
        source: feed_rs::parser::ParseFeedError,
    },
}
