/// Dashboard records
///
/// Every record is a JSON document stored in a named collection. The typed
/// structs here validate documents on their way in and give the migration
/// code something better than raw `serde_json::Value` to work with. Unknown
/// fields are preserved in each struct's `extra` map, so documents written by
/// newer front-ends survive a round trip through older servers.
///
/// # Models
///
/// - `client`: Agency clients
/// - `subproject`: Projects within a client
/// - `task`: Work items, with the legacy `assignee` name and the `assigneeId` link
/// - `collaborator`: Team members and their area
/// - `event`: Timeline entries
/// - `user`: Login accounts (never served by the collection API)
/// - `collection`: The allow-list of collections and document validation
/// - `snapshot`: The whole store as one value
///
/// # Example
///
/// ```
/// use overview_shared::models::{collection::Collection, generate_id};
///
/// let id = generate_id(Collection::Tasks.id_prefix());
/// assert!(id.starts_with("t_"));
/// assert_eq!(id.len(), 9);
/// ```

pub mod client;
pub mod collaborator;
pub mod collection;
pub mod event;
pub mod snapshot;
pub mod subproject;
pub mod task;
pub mod user;

use rand::Rng;

/// Length of the random part of generated ids
pub const ID_SUFFIX_LEN: usize = 7;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A record addressable by its string id
pub trait Record {
    /// Record id
    fn id(&self) -> &str;
}

/// Generates `<prefix>_<7 base36 chars>`
pub fn generate_id(prefix: char) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("{prefix}_{suffix}")
}
