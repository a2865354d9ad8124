//! Saved snapshots of the tracker: a newest-first history capped at
//! [`MAX_SNAPSHOTS`] entries, persisted as one JSON array.

use crate::models::{now_rfc3339, Snapshot, TaskStats, TasksByDay, WellnessRecord};

pub const MAX_SNAPSHOTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataAction {
    SaveData {
        tasks: TasksByDay,
        wellness: WellnessRecord,
        stats: TaskStats,
    },
    /// Replace the history with what was read from storage
    LoadSnapshots(Vec<Snapshot>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataState {
    pub is_saved: bool,
    pub last_saved: Option<String>,
    pub exported: Option<Snapshot>,
    pub snapshots: Vec<Snapshot>,
}

impl DataState {
    pub fn reduce(&mut self, action: DataAction) -> bool {
        match action {
            DataAction::SaveData { tasks, wellness, stats } => {
                let timestamp = self.next_timestamp();
                let snapshot = Snapshot {
                    id: timestamp.clone(),
                    timestamp: timestamp.clone(),
                    tasks,
                    wellness,
                    stats,
                };
                self.snapshots.insert(0, snapshot.clone());
                self.snapshots.truncate(MAX_SNAPSHOTS);
                self.last_saved = Some(timestamp);
                self.is_saved = true;
                self.exported = Some(snapshot);
                true
            }
            DataAction::LoadSnapshots(mut snapshots) => {
                snapshots.truncate(MAX_SNAPSHOTS);
                self.last_saved = snapshots.first().map(|s| s.timestamp.clone());
                self.snapshots = snapshots;
                true
            }
        }
    }

    /// Current time, nudged forward so ids stay unique across rapid saves
    fn next_timestamp(&self) -> String {
        let now = now_rfc3339();
        match self.snapshots.first() {
            Some(latest) if latest.timestamp >= now => {
                let bumped = chrono::DateTime::parse_from_rfc3339(&latest.timestamp)
                    .map(|t| t.with_timezone(&chrono::Utc) + chrono::Duration::milliseconds(1));
                match bumped {
                    Ok(t) => t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                    Err(_) => now,
                }
            }
            _ => now,
        }
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::empty_week;

    fn save(state: &mut DataState, steps: u32) {
        state.reduce(DataAction::SaveData {
            tasks: empty_week(),
            wellness: WellnessRecord { steps, ..Default::default() },
            stats: TaskStats::default(),
        });
    }

    #[test]
    fn history_is_capped_newest_first() {
        let mut state = DataState::default();
        for steps in 0..11 {
            save(&mut state, steps);
        }
        assert_eq!(state.snapshots.len(), MAX_SNAPSHOTS);
        assert_eq!(state.snapshots[0].wellness.steps, 10);
        assert!(state.snapshots.iter().all(|s| s.wellness.steps != 0));
    }

    #[test]
    fn rapid_saves_get_distinct_ids() {
        let mut state = DataState::default();
        for steps in 0..5 {
            save(&mut state, steps);
        }
        let mut ids: Vec<_> = state.snapshots.iter().map(|s| s.id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn save_sets_flags_and_export() {
        let mut state = DataState::default();
        save(&mut state, 42);
        assert!(state.is_saved);
        assert_eq!(state.last_saved.as_deref(), Some(state.snapshots[0].timestamp.as_str()));
        assert_eq!(state.exported.as_ref(), state.latest());
    }

    #[test]
    fn load_replaces_history_and_last_saved() {
        let mut source = DataState::default();
        save(&mut source, 1);
        save(&mut source, 2);

        let mut state = DataState::default();
        state.reduce(DataAction::LoadSnapshots(source.snapshots.clone()));
        assert_eq!(state.snapshots, source.snapshots);
        assert_eq!(state.last_saved, source.last_saved);
        assert!(!state.is_saved);
    }
}
