use super::handler;
use crate::application_port::TokenService;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

const MAX_BODY_BYTES: u64 = 16 * 1024;

pub fn routes(
    token_service: Arc<dyn TokenService>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let issue = warp::post()
        .and(warp::path!("token"))
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with(token_service.clone()))
        .and_then(handler::issue_token);

    let refresh = warp::post()
        .and(warp::path!("token" / "refresh"))
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with(token_service))
        .and_then(handler::refresh_token);

    issue.or(refresh)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::recover_error;
    use crate::application_impl::test_support::*;
    use crate::domain_model::SubjectId;
    use serde_json::{Value, json};
    use warp::http::StatusCode;

    fn api(
        store: Arc<InMemoryCredentialStore>,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone {
        let service: Arc<dyn TokenService> = Arc::new(service_with(store));
        routes(service).recover(recover_error)
    }

    fn known() -> Arc<InMemoryCredentialStore> {
        Arc::new(InMemoryCredentialStore::with_subjects([
            SubjectId::new("u1").unwrap()
        ]))
    }

    fn body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn issue_then_refresh() {
        let api = api(known());

        let resp = warp::test::request()
            .method("POST")
            .path("/token")
            .json(&json!({"id": "u1"}))
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let issued = body(resp.body());
        let r1 = issued["refresh_token"].as_str().unwrap().to_string();
        assert!(issued["access_token"].as_str().is_some());

        let resp = warp::test::request()
            .method("POST")
            .path("/token/refresh")
            .json(&json!({"id": "u1", "refresh_token": r1}))
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let rotated = body(resp.body());
        assert_ne!(rotated["refresh_token"].as_str().unwrap(), r1);

        let resp = warp::test::request()
            .method("POST")
            .path("/token/refresh")
            .json(&json!({"id": "u1", "refresh_token": r1}))
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_subject_and_bad_token_look_the_same() {
        let api = api(known());

        let unknown = warp::test::request()
            .method("POST")
            .path("/token/refresh")
            .json(&json!({"id": "nobody", "refresh_token": "x"}))
            .reply(&api)
            .await;
        let bad_token = warp::test::request()
            .method("POST")
            .path("/token/refresh")
            .json(&json!({"id": "u1", "refresh_token": "x"}))
            .reply(&api)
            .await;
        let unknown_issue = warp::test::request()
            .method("POST")
            .path("/token")
            .json(&json!({"id": "nobody"}))
            .reply(&api)
            .await;

        for resp in [&unknown, &bad_token, &unknown_issue] {
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(unknown.body(), bad_token.body());
        assert_eq!(unknown.body(), unknown_issue.body());
        assert_eq!(body(unknown.body())["message"], "invalid credentials");
    }

    #[tokio::test]
    async fn empty_id_is_unauthorized() {
        let resp = warp::test::request()
            .method("POST")
            .path("/token")
            .json(&json!({"id": ""}))
            .reply(&api(known()))
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_json_is_unprocessable() {
        let resp = warp::test::request()
            .method("POST")
            .path("/token")
            .header("content-type", "application/json")
            .body("{not json")
            .reply(&api(known()))
            .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body(resp.body())["message"], "invalid json");

        let resp = warp::test::request()
            .method("POST")
            .path("/token/refresh")
            .json(&json!({"id": "u1"}))
            .reply(&api(known()))
            .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn store_failure_is_opaque_500() {
        let inner = known();
        let flaky = Arc::new(FlakyStore::new(inner));
        flaky.fail_writes(true);
        let service: Arc<dyn TokenService> = Arc::new(service_with(flaky));
        let api = routes(service).recover(recover_error);

        let resp = warp::test::request()
            .method("POST")
            .path("/token")
            .json(&json!({"id": "u1"}))
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let parsed = body(resp.body());
        assert_eq!(parsed["message"], "internal error");
        assert!(parsed.get("refresh_token").is_none());
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let resp = warp::test::request()
            .method("POST")
            .path("/tokens")
            .json(&json!({"id": "u1"}))
            .reply(&api(known()))
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
