//! Error type for the REST client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http transport: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("{method} {path} returned {status}")]
  Status {
    method: &'static str,
    path:   String,
    status: reqwest::StatusCode,
  },

  #[error("decoding response of {path}: {source}")]
  Decode {
    path:   String,
    #[source]
    source: reqwest::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
