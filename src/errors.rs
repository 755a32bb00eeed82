use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrdError {
    #[error("invalid input: {0}")] Validation(String),
    #[error("configuration error: {0}")] Config(String),
    #[error("provider error: {0}")] Provider(String),
    #[error("storage error: {0}")] Storage(String),
}

pub type PrdResult<T> = std::result::Result<T, PrdError>;

/// Process exit code for rejected input.
pub const VALIDATION_EXIT_CODE: i32 = 2;

/// The user-facing message when `err` is a validation failure, wherever it
/// was raised in the chain.
pub fn validation_message(err: &anyhow::Error) -> Option<&str> {
    err.chain().find_map(|cause| match cause.downcast_ref::<PrdError>() {
        Some(PrdError::Validation(msg)) => Some(msg.as_str()),
        _ => None,
    })
}
