//! Audio Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AudioError {
    #[error("invalid audio file name: {0}")]
    InvalidName(String),
}
