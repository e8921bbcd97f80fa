//! Ask Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AskError {
    #[error("query is required")]
    MissingQuery,

    #[error("query must be a non-empty string")]
    EmptyQuery,

    #[error("model returned an empty answer")]
    EmptyAnswer,
}
