use std::path::PathBuf;

use thiserror::Error;

use crate::models::RecordKind;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("{kind} record {id} not found")]
    NotFound { kind: RecordKind, id: u32 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} collection is empty")]
    EmptyCollection(RecordKind),

    #[error("file {} not found", .0.display())]
    ResourceMissing(PathBuf),

    #[error("cannot parse date {input:?}, expected dd-mm-yyyy")]
    DateParse {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("value overflow")]
    ValueOverflow,

    #[error("division by zero")]
    DivisionByZero,
}

