/// Collection endpoints
///
/// Generic CRUD over the allow-listed collections (`clients`,
/// `subprojects`, `tasks`, `collaborators`, `events`). Any other name,
/// `users` included, answers 404.
///
/// | method | path                     | result                                  |
/// |--------|--------------------------|-----------------------------------------|
/// | GET    | `/api/:collection`       | all documents                           |
/// | POST   | `/api/:collection`       | 201 + stored document (id generated)    |
/// | PUT    | `/api/:collection/:id`   | merged document, 404 if missing         |
/// | DELETE | `/api/:collection/:id`   | `{"ok": true}`, even if nothing existed |
///
/// Bodies are validated against the collection's model; a mismatch is a 422
/// listing the serde error.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use overview_shared::{
    auth::middleware::SessionContext,
    models::{collection::Collection, generate_id},
};
use serde_json::{json, Value};
use tracing::info;

fn parse_collection(name: &str) -> ApiResult<Collection> {
    Ok(name.parse::<Collection>()?)
}

fn validate(collection: Collection, doc: Value) -> ApiResult<Value> {
    collection
        .validate(doc)
        .map_err(|e| ApiError::invalid(collection.as_str(), e.to_string()))
}

fn actor(session: &Option<Extension<SessionContext>>) -> &str {
    session
        .as_ref()
        .map(|Extension(ctx)| ctx.email.as_str())
        .unwrap_or("anonymous")
}

/// Lists a collection
pub async fn list_documents(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> ApiResult<Json<Vec<Value>>> {
    let collection = parse_collection(&collection)?;
    let docs = state.store.list(collection.as_str()).await?;
    Ok(Json(docs))
}

/// Creates a document
///
/// A missing, null or empty `id` is replaced by `<first letter>_<7 base36 chars>`.
pub async fn create_document(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    session: Option<Extension<SessionContext>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let collection = parse_collection(&collection)?;
    let Json(mut doc) = body?;

    let Some(fields) = doc.as_object_mut() else {
        return Err(ApiError::invalid("body", "Expected a JSON object"));
    };

    let has_id = match fields.get("id") {
        Some(Value::String(id)) => !id.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    };
    if !has_id {
        fields.insert(
            "id".to_string(),
            Value::String(generate_id(collection.id_prefix())),
        );
    }

    let doc = validate(collection, doc)?;
    let doc = state.store.insert(collection.as_str(), doc).await?;

    info!(
        collection = %collection,
        id = doc["id"].as_str().unwrap_or_default(),
        actor = actor(&session),
        "Created document"
    );

    Ok((StatusCode::CREATED, Json(doc)))
}

/// Updates a document by shallow-merging the body into it
///
/// The path id always wins over any `id` in the body.
pub async fn update_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    session: Option<Extension<SessionContext>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let collection = parse_collection(&collection)?;
    let Json(patch) = body?;

    let Value::Object(patch) = patch else {
        return Err(ApiError::invalid("body", "Expected a JSON object"));
    };

    let mut doc = state
        .store
        .get(collection.as_str(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No document '{}' in {}", id, collection)))?;

    if let Value::Object(fields) = &mut doc {
        fields.extend(patch);
        fields.insert("id".to_string(), Value::String(id.clone()));
    } else {
        return Err(ApiError::InternalError(format!(
            "Stored document '{}' in {} is not an object",
            id, collection
        )));
    }

    let doc = validate(collection, doc)?;

    if !state.store.replace(collection.as_str(), &id, doc.clone()).await? {
        return Err(ApiError::NotFound(format!("No document '{}' in {}", id, collection)));
    }

    info!(collection = %collection, id = %id, actor = actor(&session), "Updated document");

    Ok(Json(doc))
}

/// Deletes a document; succeeds whether or not it existed
pub async fn delete_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    session: Option<Extension<SessionContext>>,
) -> ApiResult<Json<Value>> {
    let collection = parse_collection(&collection)?;

    let deleted = state.store.delete(collection.as_str(), &id).await?;

    info!(
        collection = %collection,
        id = %id,
        deleted,
        actor = actor(&session),
        "Deleted document"
    );

    Ok(Json(json!({ "ok": true })))
}
