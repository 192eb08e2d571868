//! Router-level tests. Only paths that are decided before any database call.

use axum::body::Body;
use axum::extract::FromRef;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use mealplan::app::build_app;
use mealplan::auth::services::JwtKeys;
use mealplan::nutrition::NutritionSnapshot;
use mealplan::recipe_api::{RecipeSource, RecipeSummary};
use mealplan::state::{fakes::FakeRecipes, AppState};
use std::sync::Arc;

fn access_token(state: &AppState) -> String {
    JwtKeys::from_ref(state)
        .sign_access(Uuid::new_v4())
        .expect("sign access")
}

async fn send(state: AppState, req: Request<Body>) -> Response {
    build_app(state).oneshot(req).await.expect("router responds")
}

fn authed(method: Method, uri: &str, token: &str, body: Option<&str>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    let req = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string())),
        None => builder.body(Body::empty()),
    };
    req.unwrap()
}

async fn body_json(res: Response) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_returns_ok() {
    let req = Request::get("/api/v1/health").body(Body::empty()).unwrap();
    let res = send(AppState::fake(), req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let req = Request::get("/api/v1/nope").body(Body::empty()).unwrap();
    let res = send(AppState::fake(), req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let req = Request::get("/api/v1/profile").body(Body::empty()).unwrap();
    let res = send(AppState::fake(), req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(res).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn garbage_bearer_is_401() {
    let req = authed(Method::GET, "/api/v1/meal-logs", "not-a-jwt", None);
    let res = send(AppState::fake(), req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_token_is_not_an_access_token() {
    let state = AppState::fake();
    let (_, refresh) = JwtKeys::from_ref(&state)
        .sign_pair(Uuid::new_v4())
        .unwrap();
    let req = authed(Method::GET, "/api/v1/shopping-list", &refresh, None);
    let res = send(state, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_rejects_invalid_email_and_short_password() {
    for body in [
        r#"{"email":"not-an-email","password":"long-enough-pw"}"#,
        r#"{"email":"cook@example.com","password":"short"}"#,
    ] {
        let req = Request::post("/api/v1/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let res = send(AppState::fake(), req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(body_json(res).await["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn recipe_search_validates_query_before_searching() {
    let state = AppState::fake();
    let token = access_token(&state);
    let req = authed(
        Method::GET,
        "/api/v1/recipes/search?minCalories=900&maxCalories=100",
        &token,
        None,
    );
    let res = send(state, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn meal_logs_reject_malformed_dates() {
    let state = AppState::fake();
    let token = access_token(&state);
    let req = authed(Method::GET, "/api/v1/meal-logs?date=03/09/2024", &token, None);
    let res = send(state.clone(), req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let req = authed(Method::GET, "/api/v1/meal-logs/weekly?end=yesterday", &token, None);
    let res = send(state, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_meal_type_is_rejected_by_the_json_extractor() {
    let state = AppState::fake();
    let token = access_token(&state);
    let req = authed(
        Method::POST,
        "/api/v1/ai/meal-recommendation",
        &token,
        Some(r#"{"mealType":"brunch"}"#),
    );
    let res = send(state, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn empty_shopping_batch_and_blank_comment_are_400() {
    let state = AppState::fake();
    let token = access_token(&state);

    let req = authed(Method::POST, "/api/v1/shopping-list", &token, Some(r#"{"items":[]}"#));
    let res = send(state.clone(), req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let req = authed(
        Method::POST,
        "/api/v1/recipes/716429/comments",
        &token,
        Some(r#"{"body":"   "}"#),
    );
    let res = send(state, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

fn external(id: &str) -> RecipeSummary {
    RecipeSummary {
        id: id.into(),
        source: RecipeSource::External,
        title: "Chickpea curry".into(),
        image: None,
        ready_in_minutes: Some(30),
        servings: Some(4),
        nutrition: NutritionSnapshot::default(),
    }
}

#[tokio::test]
async fn external_recipe_lookup_distinguishes_missing_from_outage() {
    let state = AppState::fake().with_recipes(Arc::new(FakeRecipes {
        results: vec![external("716429")],
        fail: false,
    }));
    let token = access_token(&state);

    let req = authed(Method::GET, "/api/v1/recipes/external/716429", &token, None);
    let res = send(state.clone(), req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["title"], "Chickpea curry");

    let req = authed(Method::GET, "/api/v1/recipes/external/999999999", &token, None);
    let res = send(state, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await["code"], "NOT_FOUND");

    let down = AppState::fake().with_recipes(Arc::new(FakeRecipes {
        results: vec![],
        fail: true,
    }));
    let token = access_token(&down);
    let req = authed(Method::GET, "/api/v1/recipes/external/716429", &token, None);
    let res = send(down, req).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(res).await["code"], "UPSTREAM_ERROR");
}
