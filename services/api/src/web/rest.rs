//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Every response body carries a `success` flag; failures add an `error`
//! message, matching what the browser front end expects.

use crate::web::bookmarks::{add_bookmark, bookmark_cookie, read_bookmarks, remove_bookmark};
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use quiz_core::{
    domain::{Category, Difficulty, GenerationRequest, Test, TestSummary},
    ports::PortError,
    scoring::{score, ScoreReport},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_test_handler,
        get_test_handler,
        list_tests_handler,
        list_my_tests_handler,
        remove_my_test_handler,
        score_test_handler,
    ),
    components(
        schemas(
            GenerateTestPayload,
            GenerateTestResponse,
            TestResponse,
            TestListResponse,
            ScorePayload,
            ScoreResponse,
            ErrorBody,
        )
    ),
    tags(
        (name = "Quiz Generator API", description = "Generate, list, take and score AI-written multiple-choice tests.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The form submitted by the generation page.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTestPayload {
    #[serde(default, alias = "name")]
    pub test_name: Option<String>,
    pub question_count: u32,
    #[schema(value_type = String, example = "medium")]
    pub difficulty: Difficulty,
    #[schema(value_type = String, example = "programming")]
    pub category: Category,
    pub specific_field: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTestResponse {
    success: bool,
    test_id: u32,
    message: String,
}

#[derive(Serialize, ToSchema)]
pub struct TestResponse {
    success: bool,
    #[schema(value_type = Object)]
    test: Test,
}

#[derive(Serialize, ToSchema)]
pub struct TestListResponse {
    success: bool,
    #[schema(value_type = Vec<Object>)]
    tests: Vec<TestSummary>,
}

/// One entry per question; `null` marks an unanswered question.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScorePayload {
    pub answers: Vec<Option<u8>>,
}

#[derive(Serialize, ToSchema)]
pub struct ScoreResponse {
    success: bool,
    #[schema(value_type = Object)]
    result: ScoreReport,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

type HandlerError = (StatusCode, Json<ErrorBody>);

fn fail(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorBody {
            success: false,
            error: message.into(),
        }),
    )
}

fn parse_test_id(raw: &str) -> Result<u32, HandlerError> {
    raw.parse::<u32>()
        .map_err(|_| fail(StatusCode::NOT_FOUND, "Test not found"))
}

fn port_failure(e: PortError, context: &str) -> HandlerError {
    match e {
        PortError::NotFound(_) => fail(StatusCode::NOT_FOUND, "Test not found"),
        PortError::Unexpected(_) => {
            error!("{}: {:?}", context, e);
            fail(StatusCode::INTERNAL_SERVER_ERROR, context)
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate a new test with the language model and store it.
///
/// On success the new id is also added to the `userGeneratedTests` cookie.
#[utoipa::path(
    post,
    path = "/generate-test",
    request_body = GenerateTestPayload,
    responses(
        (status = 200, description = "Test generated and saved", body = GenerateTestResponse),
        (status = 400, description = "Invalid request body", body = ErrorBody),
        (status = 502, description = "The language model did not produce a usable test", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn generate_test_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<GenerateTestPayload>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload.map_err(|e| fail(StatusCode::BAD_REQUEST, e.body_text()))?;
    info!(
        category = payload.category.as_str(),
        difficulty = payload.difficulty.as_str(),
        question_count = payload.question_count,
        "Received generation request"
    );

    let request = GenerationRequest::new(
        payload.test_name,
        payload.question_count,
        payload.difficulty,
        payload.category,
        payload.specific_field,
    )
    .map_err(|e| fail(StatusCode::BAD_REQUEST, e.to_string()))?;

    // Generation and persistence run on their own task so a client that gives
    // up does not cancel an attempt that is already in flight.
    let task_state = app_state.clone();
    let test = tokio::spawn(async move { generate_and_store(&task_state, &request).await })
        .await
        .map_err(|e| {
            error!("Generation task failed: {:?}", e);
            fail(StatusCode::INTERNAL_SERVER_ERROR, "Test generation failed")
        })??;

    let mut bookmarks = read_bookmarks(&headers);
    add_bookmark(&mut bookmarks, test.id);

    let response = GenerateTestResponse {
        success: true,
        test_id: test.id,
        message: "Test created and saved".to_string(),
    };
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, bookmark_cookie(&bookmarks))],
        Json(response),
    ))
}

async fn generate_and_store(
    app_state: &AppState,
    request: &GenerationRequest,
) -> Result<Test, HandlerError> {
    let test = app_state.generator.generate(request).await.map_err(|e| {
        error!("Test generation failed: {}", e);
        fail(
            StatusCode::BAD_GATEWAY,
            "Test generation failed, please try again",
        )
    })?;

    app_state
        .store
        .put(&test)
        .await
        .map_err(|e| port_failure(e, "Failed to save test"))?;

    Ok(test)
}

/// Fetch a stored test by id.
#[utoipa::path(
    get,
    path = "/test/{id}",
    params(("id" = u32, Path, description = "Six-digit test id")),
    responses(
        (status = 200, description = "The stored test", body = TestResponse),
        (status = 404, description = "No test with this id", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn get_test_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TestResponse>, HandlerError> {
    let id = parse_test_id(&id)?;
    let test = app_state
        .store
        .get(id)
        .await
        .map_err(|e| port_failure(e, "Failed to load test"))?;

    Ok(Json(TestResponse {
        success: true,
        test,
    }))
}

/// List summaries of every stored test, newest first.
#[utoipa::path(
    get,
    path = "/tests",
    responses(
        (status = 200, description = "All stored tests", body = TestListResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_tests_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<TestListResponse>, HandlerError> {
    let tests = app_state
        .store
        .list_all()
        .await
        .map_err(|e| port_failure(e, "Failed to list tests"))?;

    Ok(Json(TestListResponse {
        success: true,
        tests,
    }))
}

/// List the tests bookmarked in the caller's `userGeneratedTests` cookie.
#[utoipa::path(
    get,
    path = "/tests/mine",
    responses(
        (status = 200, description = "Bookmarked tests that still exist", body = TestListResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_my_tests_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TestListResponse>, HandlerError> {
    let mut tests = Vec::new();
    for id in read_bookmarks(&headers) {
        match app_state.store.get(id).await {
            Ok(test) => tests.push(test.summary()),
            Err(PortError::NotFound(_)) => warn!("Bookmarked test {} no longer exists", id),
            Err(e) => return Err(port_failure(e, "Failed to load bookmarked tests")),
        }
    }

    Ok(Json(TestListResponse {
        success: true,
        tests,
    }))
}

/// Remove a test id from the caller's bookmark cookie. The stored test is kept.
#[utoipa::path(
    delete,
    path = "/tests/mine/{id}",
    params(("id" = u32, Path, description = "Six-digit test id")),
    responses(
        (status = 204, description = "Bookmark removed"),
        (status = 404, description = "Malformed id", body = ErrorBody)
    )
)]
pub async fn remove_my_test_handler(
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_test_id(&id)?;
    let mut bookmarks = read_bookmarks(&headers);
    remove_bookmark(&mut bookmarks, id);

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, bookmark_cookie(&bookmarks))],
    ))
}

/// Grade a completed answer sheet against a stored test.
#[utoipa::path(
    post,
    path = "/test/{id}/score",
    params(("id" = u32, Path, description = "Six-digit test id")),
    request_body = ScorePayload,
    responses(
        (status = 200, description = "Graded result", body = ScoreResponse),
        (status = 400, description = "Answer sheet does not match the test", body = ErrorBody),
        (status = 404, description = "No test with this id", body = ErrorBody)
    )
)]
pub async fn score_test_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ScorePayload>, JsonRejection>,
) -> Result<Json<ScoreResponse>, HandlerError> {
    let id = parse_test_id(&id)?;
    let Json(payload) = payload.map_err(|e| fail(StatusCode::BAD_REQUEST, e.body_text()))?;

    let test = app_state
        .store
        .get(id)
        .await
        .map_err(|e| port_failure(e, "Failed to load test"))?;
    let result = score(&test, &payload.answers)
        .map_err(|e| fail(StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(ScoreResponse {
        success: true,
        result,
    }))
}
