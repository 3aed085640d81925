//! Loading the feed document to enrich.
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tokio::io::AsyncReadExt;

/// Largest input document accepted (64 MiB).
pub const MAX_INPUT_SIZE: u64 = 64 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input too large: {0}")]
    TooLarge(String),

    #[error("No value at JSON pointer '{0}'")]
    PointerNotFound(String),
}

/// Reads and parses a JSON document from `path`, or from stdin when `None`.
///
/// Reads at most one byte past [`MAX_INPUT_SIZE`] so an oversized stream is
/// rejected without buffering all of it.
pub async fn read_document(path: Option<&Path>) -> Result<Value, InputError> {
    let bytes = match path {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            read_limited(file).await?
        }
        None => read_limited(tokio::io::stdin()).await?,
    };

    tracing::debug!(bytes = bytes.len(), "Read input document");
    Ok(serde_json::from_slice(&bytes)?)
}

async fn read_limited<R>(reader: R) -> Result<Vec<u8>, InputError>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader.take(MAX_INPUT_SIZE + 1).read_to_end(&mut bytes).await?;

    if bytes.len() as u64 > MAX_INPUT_SIZE {
        return Err(InputError::TooLarge(format!(
            "more than {MAX_INPUT_SIZE} bytes"
        )));
    }
    Ok(bytes)
}

/// Picks the item list out of a document with a JSON Pointer.
///
/// An empty pointer selects the whole document, so a bare array works as
/// input without configuration.
pub fn select_items<'a>(document: &'a Value, pointer: &str) -> Result<&'a Value, InputError> {
    if pointer.is_empty() {
        return Ok(document);
    }
    document
        .pointer(pointer)
        .ok_or_else(|| InputError::PointerNotFound(pointer.to_string()))
}
