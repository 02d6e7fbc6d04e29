//! Typed wrappers around the API endpoints.
//!
//! Every wrapper sends its request through [`crate::Client::execute`] and decodes
//! the body. Error statuses are turned into [`ErrorKind::Api`] if the body
//! describes the error, or [`ErrorKind::UnexpectedStatus`] otherwise.

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::{ErrorKind, Result, types::ErrorBody};

mod dns;
mod domains;

/// Read the body of a successful response and decode it as `T`.
///
/// Error statuses are mapped to an error before the body is decoded.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = ensure_success(response).await?;
    let bytes = response
        .bytes()
        .await
        .map_err(ErrorKind::ReadResponseBody)?;
    serde_json::from_slice(&bytes).map_err(ErrorKind::DecodeResponse)
}

/// Turn a response with an error status into an error
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let bytes = response
        .bytes()
        .await
        .map_err(ErrorKind::ReadResponseBody)?;
    match serde_json::from_slice::<ErrorBody>(&bytes) {
        Ok(ErrorBody { error }) => Err(ErrorKind::Api { status, error }),
        Err(e) => {
            log::debug!("Cannot decode error body of {status} response: {e}");
            Err(ErrorKind::UnexpectedStatus(status))
        }
    }
}
