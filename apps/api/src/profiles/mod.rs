// Profile persistence, feed projection and the creation draft.
// All remote row access goes through the `ProfileStore` port in store.rs.

pub mod draft;
pub mod feed;
pub mod gateway;
pub mod handlers;
pub mod store;

use thiserror::Error;

use crate::models::profile::RowShapeError;

pub use gateway::ProfileGateway;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store error (status {status}, code {code:?}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Invalid profile row: {0}")]
    InvalidRow(#[from] RowShapeError),
}
