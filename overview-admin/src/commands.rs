/// Admin commands
///
/// Each command takes the store it operates on and returns what it did;
/// printing is left to the binary.

use anyhow::{bail, Context};
use overview_shared::{
    auth::password::{hash_password, validate_new_password},
    migration::MigrationReport,
    models::{
        snapshot::{PartialSnapshot, StoreSnapshot},
        user::{normalize_email, PublicUser, UserRecord, USERS_COLLECTION, USER_ID_PREFIX},
    },
    store::{
        snapshot::{import_snapshot, reconcile_store, ImportMode},
        DocumentStore,
    },
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Account to create
#[derive(Debug, Validate)]
pub struct NewUser {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub password: String,

    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

impl NewUser {
    pub fn new(email: &str, password: impl Into<String>, name: Option<String>) -> Self {
        Self {
            email: normalize_email(email),
            password: password.into(),
            name: name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        }
    }
}

/// Creates a login account with an Argon2id password hash
pub async fn create_user(store: &dyn DocumentStore, new_user: NewUser) -> anyhow::Result<PublicUser> {
    new_user.validate().context("Invalid user")?;
    validate_new_password(&new_user.password)?;

    if store
        .find_by_field(USERS_COLLECTION, "email", &new_user.email)
        .await?
        .is_some()
    {
        bail!("A user with email {} already exists", new_user.email);
    }

    let id = format!("{}_{}", USER_ID_PREFIX, Uuid::new_v4().simple());
    let hash = hash_password(&new_user.password)?;
    let user = UserRecord::new(id, &new_user.email, hash, new_user.name);

    store
        .insert(USERS_COLLECTION, serde_json::to_value(&user)?)
        .await?;

    info!(user_id = %user.id, email = %user.email, "Created user");

    Ok(user.public())
}

/// Reconciles the store and renders it as pretty JSON
pub async fn export(store: &dyn DocumentStore) -> anyhow::Result<String> {
    let migrated = reconcile_store(store).await?;

    info!(
        records = migrated.snapshot.len(),
        created_collaborators = migrated.report.created_collaborators.len(),
        "Exported snapshot"
    );

    Ok(serde_json::to_string_pretty(&migrated.snapshot)?)
}

/// Imports a snapshot given as JSON text
pub async fn import(
    store: &dyn DocumentStore,
    json: &str,
    mode: ImportMode,
) -> anyhow::Result<StoreSnapshot> {
    let input: PartialSnapshot =
        serde_json::from_str(json).context("Snapshot file is not a valid snapshot")?;

    let migrated = import_snapshot(store, input, mode).await?;

    info!(
        mode = ?mode,
        records = migrated.snapshot.len(),
        relinked_tasks = migrated.report.relinked_tasks.len(),
        "Imported snapshot"
    );

    Ok(migrated.snapshot)
}

/// Runs the legacy assignee migration over the stored data
pub async fn migrate(store: &dyn DocumentStore) -> anyhow::Result<MigrationReport> {
    let migrated = reconcile_store(store).await?;

    if migrated.report.is_empty() {
        info!("Nothing to migrate");
    } else {
        info!(
            created_collaborators = migrated.report.created_collaborators.len(),
            relinked_tasks = migrated.report.relinked_tasks.len(),
            "Migrated legacy assignees"
        );
    }

    Ok(migrated.report)
}
