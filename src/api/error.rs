use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::{debug, warn};
use warp::filters::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::{Rejection, reject};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (status, message) = if let Some(code) = err.find::<ApiErrorCode>() {
        (code.status(), code.to_string())
    } else if err.find::<BodyDeserializeError>().is_some()
        || err.find::<reject::UnsupportedMediaType>().is_some()
    {
        (StatusCode::UNPROCESSABLE_ENTITY, "invalid json".to_string())
    } else if err.find::<reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "content-length required".to_string())
    } else if err.find::<reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "payload too large".to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else {
        warn!("unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorCode::InternalError.to_string(),
        )
    };

    let json = warp::reply::json(&ErrorBody { message });
    Ok(warp::reply::with_status(json, status))
}

/// What a caller gets to see. Causes stay in the server log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<TokenError> for ApiErrorCode {
    fn from(error: TokenError) -> Self {
        if error.is_unauthorized() {
            debug!("rejecting credentials: {}", error);
            ApiErrorCode::InvalidCredentials
        } else {
            ApiErrorCode::internal(error)
        }
    }
}
