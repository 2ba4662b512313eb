use super::error::*;
use crate::application_port::*;
use crate::domain_model::SubjectId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::{self, reject};

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub id: String,
}

// No Debug: carries a plaintext refresh token.
#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub id: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        TokenResponse {
            access_token: pair.access_token.0,
            refresh_token: pair.refresh_token.0,
        }
    }
}

// An empty id can never name a subject; answer it like any unknown one.
fn parse_subject(id: String) -> Result<SubjectId, warp::Rejection> {
    SubjectId::new(id).map_err(|_| reject::custom(ApiErrorCode::InvalidCredentials))
}

pub async fn issue_token(
    body: TokenRequest,
    token_service: Arc<dyn TokenService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let subject_id = parse_subject(body.id)?;
    let pair = token_service
        .issue(&subject_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&TokenResponse::from(pair)))
}

pub async fn refresh_token(
    body: RefreshTokenRequest,
    token_service: Arc<dyn TokenService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let subject_id = parse_subject(body.id)?;
    let pair = token_service
        .rotate(&subject_id, &RefreshToken(body.refresh_token))
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&TokenResponse::from(pair)))
}
