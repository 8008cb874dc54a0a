use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContributorsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
