use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{ApiResponse, CreateNoteRequest, NoteResponse, SearchParams, UpdateNoteRequest},
    service::NoteService,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        create_note,
        get_all_notes,
        get_note_by_id,
        search_notes,
        patch_note,
        delete_note
    ),
    components(schemas(
        NoteResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        ApiResponse<NoteResponse>,
        ApiResponse<Vec<NoteResponse>>
    )),
    tags(
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

pub fn router(service: Arc<NoteService>) -> Router {
    Router::new()
        .route("/notes", post(create_note))
        .route("/notes", get(get_all_notes))
        .route("/notes/search", get(search_notes))
        .route("/notes/{id}", get(get_note_by_id))
        .route("/notes/{id}", patch(patch_note))
        .route("/notes/{id}", delete(delete_note))
        .with_state(service)
}

fn is_blank(field: Option<&str>) -> bool {
    field.is_none_or(|value| value.trim().is_empty())
}

fn not_found(id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<NoteResponse>::message_only(format!(
            "Note with id of {id} not found"
        ))),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = ApiResponse<NoteResponse>),
        (status = 400, description = "Title missing or blank", body = ApiResponse<NoteResponse>),
        (status = 500, description = "Persistence failure", body = ApiResponse<NoteResponse>)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    Json(payload): Json<CreateNoteRequest>,
) -> Response {
    // Validate before touching the service so a rejected request has no side effects
    let Some(title) = payload.title.filter(|title| !title.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<NoteResponse>::message_only(
                "Title must be provided and non-blank",
            )),
        )
            .into_response();
    };

    match service.create_note(title, payload.content).await {
        Ok(note) => (
            StatusCode::CREATED,
            Json(ApiResponse::new("Note created successfully!", note)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to create note entry: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<NoteResponse>::message_only(
                    "Failed to create note",
                )),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "All notes, possibly empty", body = ApiResponse<Vec<NoteResponse>>)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    let notes = service.list_notes().await;

    let message = if notes.is_empty() {
        "No notes found"
    } else {
        "All notes retrieved!"
    };

    (StatusCode::OK, Json(ApiResponse::new(message, notes))).into_response()
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = ApiResponse<NoteResponse>),
        (status = 404, description = "Note not found", body = ApiResponse<NoteResponse>)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_note_by_id(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Response {
    match service.get_note(&id).await {
        Some(note) => (StatusCode::OK, Json(ApiResponse::new("Note found!", note))).into_response(),
        None => not_found(&id),
    }
}

#[utoipa::path(
    get,
    path = "/notes/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching notes, possibly empty", body = ApiResponse<Vec<NoteResponse>>),
        (status = 400, description = "No search parameter provided", body = ApiResponse<Vec<NoteResponse>>)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn search_notes(
    State(service): State<Arc<NoteService>>,
    Query(params): Query<SearchParams>,
) -> Response {
    if is_blank(params.title.as_deref()) && is_blank(params.content.as_deref()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Vec<NoteResponse>>::message_only(
                "At least one search parameter must be provided",
            )),
        )
            .into_response();
    }

    let notes = service
        .search_notes(params.title.as_deref(), params.content.as_deref())
        .await;

    let message = if notes.is_empty() {
        "No notes found that matches the title or content"
    } else {
        "Notes retrieved!"
    };

    (StatusCode::OK, Json(ApiResponse::new(message, notes))).into_response()
}

#[utoipa::path(
    patch,
    path = "/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated", body = ApiResponse<NoteResponse>),
        (status = 400, description = "No fields provided", body = ApiResponse<NoteResponse>),
        (status = 404, description = "Note not found", body = ApiResponse<NoteResponse>),
        (status = 500, description = "Update failure", body = ApiResponse<NoteResponse>)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn patch_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateNoteRequest>,
) -> Response {
    if payload.title.is_none() && payload.content.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<NoteResponse>::message_only(
                "No fields provided to update",
            )),
        )
            .into_response();
    }

    match service.update_note(&id, payload.title, payload.content).await {
        Ok(Some(note)) => {
            (StatusCode::OK, Json(ApiResponse::new("Note updated!", note))).into_response()
        }
        Ok(None) => not_found(&id),
        Err(e) => {
            tracing::error!("failed to update note entry: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<NoteResponse>::message_only(
                    "Failed to update note",
                )),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted", body = ApiResponse<NoteResponse>),
        (status = 404, description = "Note not found", body = ApiResponse<NoteResponse>),
        (status = 500, description = "Persistence failure", body = ApiResponse<NoteResponse>)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Response {
    match service.delete_note(&id).await {
        Ok(Some(note)) => (
            StatusCode::OK,
            Json(ApiResponse::new("Note deleted successfully!", note)),
        )
            .into_response(),
        Ok(None) => not_found(&id),
        Err(e) => {
            tracing::error!("failed to delete note entry: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<NoteResponse>::message_only(
                    "Failed to delete note",
                )),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::repository::Repository;
    use crate::service::{FaultInjector, NoFaults};

    struct AlwaysFail;

    impl FaultInjector for AlwaysFail {
        fn should_fail(&self) -> bool {
            true
        }
    }

    fn app_with(temp: &TempDir, faults: Box<dyn FaultInjector>) -> Router {
        let repo = Repository::new(temp.path().join("notes.json")).unwrap();
        let service = NoteService::new(Arc::new(tokio::sync::Mutex::new(repo)), faults);

        router(Arc::new(service))
    }

    fn app(temp: &TempDir) -> Router {
        app_with(temp, Box::new(NoFaults))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = match body {
            Some(body) => Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }

    #[tokio::test]
    async fn create_with_blank_title_is_rejected_without_side_effects() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        let (status, body) =
            send(&app, "POST", "/notes", Some(json!({"title": "   "}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"], Value::Null);
        assert!(
            !temp.path().join("notes.json").exists(),
            "rejected create must not touch storage"
        );
    }

    #[tokio::test]
    async fn create_with_missing_title_is_rejected() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        let (status, _) = send(&app, "POST", "/notes", Some(json!({"content": "C"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_then_get_round_trips_title_and_content() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        let (status, body) = send(
            &app,
            "POST",
            "/notes",
            Some(json!({"title": "T", "content": "C"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Note created successfully!");

        let id = body["data"]["id"].as_str().unwrap().to_string();
        let (status, body) = send(&app, "GET", &format!("/notes/{id}"), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Note found!");
        assert_eq!(body["data"]["title"], "T");
        assert_eq!(body["data"]["content"], "C");
    }

    #[tokio::test]
    async fn list_message_distinguishes_empty_from_populated() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        let (status, body) = send(&app, "GET", "/notes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "No notes found");
        assert_eq!(body["data"].as_array().unwrap().len(), 0);

        send(&app, "POST", "/notes", Some(json!({"title": "A"}))).await;

        let (_, body) = send(&app, "GET", "/notes", None).await;
        assert_eq!(body["message"], "All notes retrieved!");
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_of_unknown_id_is_not_found() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        let (status, body) = send(&app, "GET", "/notes/ghost", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Note with id of ghost not found");
        assert_eq!(body["data"], Value::Null);
    }

    #[tokio::test]
    async fn search_without_parameters_is_rejected() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        let (status, body) = send(&app, "GET", "/notes/search", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "At least one search parameter must be provided");
    }

    #[tokio::test]
    async fn search_matches_case_insensitive_substrings_only() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        send(
            &app,
            "POST",
            "/notes",
            Some(json!({"title": "Groceries", "content": "milk"})),
        )
        .await;
        send(
            &app,
            "POST",
            "/notes",
            Some(json!({"title": "Workout", "content": "legs"})),
        )
        .await;

        let (status, body) = send(&app, "GET", "/notes/search?title=GROC", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Notes retrieved!");

        let matches = body["data"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["title"], "Groceries");

        let (status, body) = send(&app, "GET", "/notes/search?content=yoga", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            "No notes found that matches the title or content"
        );
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn patch_without_fields_is_rejected_without_side_effects() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        let (_, body) = send(&app, "POST", "/notes", Some(json!({"title": "Keep"}))).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();
        let before = body["data"]["updatedAt"].as_i64().unwrap();

        let (status, body) =
            send(&app, "PATCH", &format!("/notes/{id}"), Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "No fields provided to update");

        let (_, body) = send(&app, "GET", &format!("/notes/{id}"), None).await;
        assert_eq!(body["data"]["title"], "Keep");
        assert_eq!(body["data"]["updatedAt"].as_i64().unwrap(), before);
    }

    #[tokio::test]
    async fn patch_with_one_field_merges_and_refreshes_updated_at() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        let (_, body) = send(
            &app,
            "POST",
            "/notes",
            Some(json!({"title": "Old", "content": "keep me"})),
        )
        .await;
        let id = body["data"]["id"].as_str().unwrap().to_string();
        let created_at = body["data"]["createdAt"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/notes/{id}"),
            Some(json!({"title": "New"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Note updated!");
        assert_eq!(body["data"]["title"], "New");
        assert_eq!(body["data"]["content"], "keep me");
        assert_eq!(body["data"]["createdAt"].as_i64().unwrap(), created_at);
        assert!(body["data"]["updatedAt"].as_i64().unwrap() >= created_at);
    }

    #[tokio::test]
    async fn patch_of_unknown_id_is_not_found() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        let (status, _) = send(
            &app,
            "PATCH",
            "/notes/ghost",
            Some(json!({"title": "New"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_twice_is_not_found_the_second_time() {
        let temp = TempDir::new().unwrap();
        let app = app(&temp);

        let (_, body) = send(&app, "POST", "/notes", Some(json!({"title": "Gone"}))).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, "DELETE", &format!("/notes/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Note deleted successfully!");

        let (status, _) = send(&app, "DELETE", &format!("/notes/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", &format!("/notes/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn injected_fault_surfaces_as_500_and_leaves_the_note_alone() {
        let temp = TempDir::new().unwrap();
        let app = app_with(&temp, Box::new(AlwaysFail));

        let (_, body) = send(&app, "POST", "/notes", Some(json!({"title": "Stable"}))).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/notes/{id}"),
            Some(json!({"title": "Mutated"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to update note");

        let (_, body) = send(&app, "GET", &format!("/notes/{id}"), None).await;
        assert_eq!(body["data"]["title"], "Stable");
    }
}
