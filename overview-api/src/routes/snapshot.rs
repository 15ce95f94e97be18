/// Snapshot endpoints
///
/// - `GET /api/snapshot` - The whole store, reconciled. Legacy assignee
///   names found along the way are converted and saved before responding.
/// - `POST /api/snapshot?mode=replace|merge` - Imports a (possibly partial)
///   snapshot; `replace` is the default.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use overview_shared::{
    auth::middleware::SessionContext,
    models::snapshot::{PartialSnapshot, StoreSnapshot},
    store::snapshot::{import_snapshot as import_into_store, reconcile_store, ImportMode},
};
use serde::Deserialize;
use tracing::info;

/// Query string of the import endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ImportQuery {
    #[serde(default)]
    pub mode: ImportMode,
}

/// Exports the reconciled store
pub async fn export_snapshot(State(state): State<AppState>) -> ApiResult<Json<StoreSnapshot>> {
    let migrated = reconcile_store(state.store.as_ref()).await?;
    Ok(Json(migrated.snapshot))
}

/// Imports a snapshot and returns the resulting store
pub async fn import_snapshot(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
    session: Option<Extension<SessionContext>>,
    body: Result<Json<PartialSnapshot>, JsonRejection>,
) -> ApiResult<Json<StoreSnapshot>> {
    let Json(input) = body?;

    let migrated = import_into_store(state.store.as_ref(), input, query.mode).await?;

    info!(
        mode = ?query.mode,
        records = migrated.snapshot.len(),
        actor = session.as_ref().map(|Extension(ctx)| ctx.email.as_str()).unwrap_or("anonymous"),
        "Snapshot imported through the API"
    );

    Ok(Json(migrated.snapshot))
}
