/// Legacy record normalization and snapshot merging
///
/// Older dashboards stored a task's assignee as free text. [`migrate_snapshot`]
/// turns every such name into a reference to a collaborator, creating the
/// collaborator when no one by that name exists yet. Names are matched after
/// trimming and lowercasing, so "maria " and "Maria" are the same person.
///
/// The migration is idempotent: tasks that already reference a collaborator
/// are left alone, so running it again on its own output changes nothing.
///
/// # Example
///
/// ```
/// use overview_shared::migration::migrate_snapshot;
/// use overview_shared::models::snapshot::PartialSnapshot;
///
/// let migrated = migrate_snapshot(PartialSnapshot::default());
/// assert!(migrated.snapshot.is_empty());
/// assert!(migrated.report.is_empty());
/// ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    collaborator::Collaborator,
    snapshot::{PartialSnapshot, StoreSnapshot},
    Record,
};

/// What a migration changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    /// Ids of collaborators synthesized from legacy names
    pub created_collaborators: Vec<String>,

    /// Ids of tasks that gained an `assigneeId`
    pub relinked_tasks: Vec<String>,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.created_collaborators.is_empty() && self.relinked_tasks.is_empty()
    }
}

/// A migrated snapshot and the changes that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Migrated {
    pub snapshot: StoreSnapshot,
    pub report: MigrationReport,
}

/// Lookup key for a person's name
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalizes a possibly partial snapshot
///
/// Absent collections become empty. Tasks without an `assigneeId` but with a
/// non-blank legacy `assignee` get linked to the collaborator of that name,
/// which is created (area `PROJETOS`) if needed. When several collaborators
/// share a name key, the last one wins.
pub fn migrate_snapshot(input: PartialSnapshot) -> Migrated {
    let mut snapshot = StoreSnapshot {
        clients: input.clients.unwrap_or_default(),
        subprojects: input.subprojects.unwrap_or_default(),
        tasks: input.tasks.unwrap_or_default(),
        collaborators: input.collaborators.unwrap_or_default(),
        events: input.events.unwrap_or_default(),
    };
    let mut report = MigrationReport::default();

    let mut by_name: HashMap<String, String> = snapshot
        .collaborators
        .iter()
        .map(|c| (name_key(&c.name), c.id.clone()))
        .collect();

    for task in snapshot.tasks.iter_mut() {
        if task.has_assignee() {
            continue;
        }

        let Some(name) = task.legacy_assignee().map(str::to_string) else {
            continue;
        };

        let key = name_key(&name);
        let collaborator_id = match by_name.get(&key) {
            Some(id) => id.clone(),
            None => {
                let collaborator = Collaborator::new(name);
                debug!(
                    collaborator_id = %collaborator.id,
                    name = %collaborator.name,
                    "Created collaborator from legacy assignee"
                );

                let id = collaborator.id.clone();
                by_name.insert(key, id.clone());
                report.created_collaborators.push(id.clone());
                snapshot.collaborators.push(collaborator);
                id
            }
        };

        task.assignee_id = Some(collaborator_id);
        report.relinked_tasks.push(task.id.clone());
    }

    Migrated { snapshot, report }
}

/// Overlays a partial snapshot on top of a full one, then migrates
///
/// Per collection, overlay records replace base records with the same id in
/// place and new ones are appended in overlay order. Collections absent from
/// the overlay are kept as they are.
pub fn merge_snapshots(base: StoreSnapshot, overlay: PartialSnapshot) -> Migrated {
    let merged = PartialSnapshot {
        clients: Some(merge_by_id(base.clients, overlay.clients)),
        subprojects: Some(merge_by_id(base.subprojects, overlay.subprojects)),
        tasks: Some(merge_by_id(base.tasks, overlay.tasks)),
        collaborators: Some(merge_by_id(base.collaborators, overlay.collaborators)),
        events: Some(merge_by_id(base.events, overlay.events)),
    };

    migrate_snapshot(merged)
}

fn merge_by_id<R: Record>(mut base: Vec<R>, overlay: Option<Vec<R>>) -> Vec<R> {
    let Some(overlay) = overlay else {
        return base;
    };

    let mut positions: HashMap<String, usize> = base
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id().to_string(), i))
        .collect();

    for record in overlay {
        match positions.get(record.id()) {
            Some(&i) => base[i] = record,
            None => {
                positions.insert(record.id().to_string(), base.len());
                base.push(record);
            }
        }
    }

    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{collaborator::Area, task::tests::task_doc, task::Task};
    use serde_json::json;

    fn task(id: &str, assignee: Option<&str>) -> Task {
        serde_json::from_value(task_doc(id, assignee)).unwrap()
    }

    fn collaborator(id: &str, name: &str) -> Collaborator {
        serde_json::from_value(json!({"id": id, "name": name, "area": "DEV"})).unwrap()
    }

    #[test]
    fn test_name_key() {
        assert_eq!(name_key("  Maria "), "maria");
        assert_eq!(name_key("JOÃO"), "joão");
    }

    #[test]
    fn test_unknown_name_creates_one_collaborator_and_is_idempotent() {
        let input = PartialSnapshot {
            tasks: Some(vec![task("t_1", Some("Maria")), task("t_2", Some(" maria"))]),
            ..Default::default()
        };

        let first = migrate_snapshot(input);
        assert_eq!(first.snapshot.collaborators.len(), 1);

        let maria = &first.snapshot.collaborators[0];
        assert_eq!(maria.name, "Maria");
        assert_eq!(maria.area, Area::Projects);
        assert!(maria.id.starts_with("u_"));

        for task in &first.snapshot.tasks {
            assert_eq!(task.assignee_id.as_deref(), Some(maria.id.as_str()));
        }
        assert_eq!(first.report.created_collaborators, vec![maria.id.clone()]);
        assert_eq!(first.report.relinked_tasks, vec!["t_1", "t_2"]);

        let second = migrate_snapshot(first.snapshot.clone().into());
        assert!(second.report.is_empty());
        assert_eq!(second.snapshot, first.snapshot);
    }

    #[test]
    fn test_existing_collaborator_is_matched_case_insensitively() {
        let input = PartialSnapshot {
            tasks: Some(vec![task("t_1", Some("maria"))]),
            collaborators: Some(vec![collaborator("u_maria01", "Maria")]),
            ..Default::default()
        };

        let migrated = migrate_snapshot(input);
        assert_eq!(migrated.snapshot.collaborators.len(), 1);
        assert_eq!(
            migrated.snapshot.tasks[0].assignee_id.as_deref(),
            Some("u_maria01")
        );
        assert!(migrated.report.created_collaborators.is_empty());
        assert_eq!(migrated.report.relinked_tasks, vec!["t_1"]);
    }

    #[test]
    fn test_tasks_with_assignee_id_or_blank_name_are_untouched() {
        let mut linked = task("t_1", Some("Somebody Else"));
        linked.assignee_id = Some("u_keep".to_string());

        let input = PartialSnapshot {
            tasks: Some(vec![linked.clone(), task("t_2", Some("   ")), task("t_3", None)]),
            ..Default::default()
        };

        let migrated = migrate_snapshot(input);
        assert!(migrated.report.is_empty());
        assert!(migrated.snapshot.collaborators.is_empty());
        assert_eq!(migrated.snapshot.tasks[0], linked);
        assert!(migrated.snapshot.tasks[1].assignee_id.is_none());
        assert!(migrated.snapshot.tasks[2].assignee_id.is_none());
    }

    #[test]
    fn test_last_collaborator_with_same_name_wins() {
        let input = PartialSnapshot {
            tasks: Some(vec![task("t_1", Some("Ana"))]),
            collaborators: Some(vec![collaborator("u_first", "Ana"), collaborator("u_last", "ana ")]),
            ..Default::default()
        };

        let migrated = migrate_snapshot(input);
        assert_eq!(migrated.snapshot.tasks[0].assignee_id.as_deref(), Some("u_last"));
    }

    #[test]
    fn test_absent_collections_default_to_empty() {
        let migrated = migrate_snapshot(PartialSnapshot::default());
        assert!(migrated.snapshot.events.is_empty());
        assert!(migrated.snapshot.clients.is_empty());
    }

    #[test]
    fn test_merge_replaces_in_place_and_appends() {
        let base = migrate_snapshot(PartialSnapshot {
            collaborators: Some(vec![collaborator("u_1", "Ana"), collaborator("u_2", "Bia")]),
            ..Default::default()
        })
        .snapshot;

        let overlay = PartialSnapshot {
            collaborators: Some(vec![collaborator("u_3", "Caio"), collaborator("u_1", "Ana Paula")]),
            tasks: Some(vec![task("t_1", Some("Bia"))]),
            ..Default::default()
        };

        let merged = merge_snapshots(base, overlay);
        let names: Vec<&str> = merged
            .snapshot
            .collaborators
            .iter()
            .map(|c| c.name.as_str())
            .collect();

        assert_eq!(names, vec!["Ana Paula", "Bia", "Caio"]);
        assert_eq!(merged.snapshot.tasks[0].assignee_id.as_deref(), Some("u_2"));
        assert!(merged.report.created_collaborators.is_empty());
    }

    #[test]
    fn test_merge_keeps_collections_missing_from_overlay() {
        let base = migrate_snapshot(PartialSnapshot {
            tasks: Some(vec![task("t_1", None)]),
            ..Default::default()
        })
        .snapshot;

        let merged = merge_snapshots(base.clone(), PartialSnapshot::default());
        assert_eq!(merged.snapshot, base);
    }
}
