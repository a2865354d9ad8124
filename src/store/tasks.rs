use serde::{Deserialize, Serialize};

use crate::models::{empty_week, Task, TaskStats, TasksByDay, Weekday};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    SetActiveDay(Weekday),
    AddTask { day: Weekday, text: String },
    ToggleTask { day: Weekday, id: String },
    DeleteTask { day: Weekday, id: String },
}

impl TaskAction {
    /// Whether the action touches the persisted day map
    pub fn persists(&self) -> bool {
        !matches!(self, TaskAction::SetActiveDay(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksState {
    pub active_day: Weekday,
    pub by_day: TasksByDay,
}

impl Default for TasksState {
    fn default() -> Self {
        Self {
            active_day: Weekday::today(),
            by_day: empty_week(),
        }
    }
}

impl TasksState {
    /// Build state from a stored day map, filling in any missing days
    pub fn from_stored(mut by_day: TasksByDay) -> Self {
        for day in Weekday::ALL {
            by_day.entry(day).or_default();
        }
        Self {
            by_day,
            ..Self::default()
        }
    }

    /// Apply `action`; returns true when the state changed
    pub fn reduce(&mut self, action: TaskAction) -> bool {
        match action {
            TaskAction::SetActiveDay(day) => {
                let changed = self.active_day != day;
                self.active_day = day;
                changed
            }
            TaskAction::AddTask { day, text } => {
                let text = text.trim();
                if text.is_empty() {
                    return false;
                }
                let bucket = self.by_day.entry(day).or_default();
                let mut task = Task::new(text.to_string());
                while bucket.iter().any(|t| t.id == task.id) {
                    task.id = uuid::Uuid::new_v4().to_string();
                }
                bucket.push(task);
                true
            }
            TaskAction::ToggleTask { day, id } => {
                match self.by_day.get_mut(&day).and_then(|b| b.iter_mut().find(|t| t.id == id)) {
                    Some(task) => {
                        task.completed = !task.completed;
                        true
                    }
                    None => false,
                }
            }
            TaskAction::DeleteTask { day, id } => {
                let Some(bucket) = self.by_day.get_mut(&day) else {
                    return false;
                };
                let before = bucket.len();
                bucket.retain(|t| t.id != id);
                bucket.len() != before
            }
        }
    }

    pub fn tasks_for(&self, day: Weekday) -> &[Task] {
        self.by_day.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn active_day_tasks(&self) -> &[Task] {
        self.tasks_for(self.active_day)
    }

    /// Completion stats across all seven days
    pub fn stats(&self) -> TaskStats {
        let total = self.by_day.values().map(Vec::len).sum::<usize>();
        let completed = self
            .by_day
            .values()
            .flat_map(|tasks| tasks.iter())
            .filter(|t| t.completed)
            .count();
        TaskStats {
            completed_tasks_count: completed,
            total_tasks_count: total,
            completion_rate: completion_rate(completed, total),
        }
    }
}

/// Rounded integer percentage; 0 when there is nothing to complete
pub fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(state: &mut TasksState, day: Weekday, text: &str) -> String {
        assert!(state.reduce(TaskAction::AddTask { day, text: text.to_string() }));
        state.tasks_for(day).last().unwrap().id.clone()
    }

    #[test]
    fn add_grows_only_that_bucket_by_one() {
        for day in Weekday::ALL {
            let mut state = TasksState::default();
            add(&mut state, day, "walk");
            for other in Weekday::ALL {
                let expected = if other == day { 1 } else { 0 };
                assert_eq!(state.tasks_for(other).len(), expected);
            }
            assert!(!state.tasks_for(day)[0].completed);
        }
    }

    #[test]
    fn blank_text_is_ignored() {
        let mut state = TasksState::default();
        assert!(!state.reduce(TaskAction::AddTask { day: Weekday::Monday, text: "   ".into() }));
        assert!(state.tasks_for(Weekday::Monday).is_empty());
    }

    #[test]
    fn text_is_trimmed() {
        let mut state = TasksState::default();
        add(&mut state, Weekday::Friday, "  read  ");
        assert_eq!(state.tasks_for(Weekday::Friday)[0].text, "read");
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let mut state = TasksState::default();
        let id = add(&mut state, Weekday::Tuesday, "yoga");
        let toggle = TaskAction::ToggleTask { day: Weekday::Tuesday, id };
        assert!(state.reduce(toggle.clone()));
        assert!(state.tasks_for(Weekday::Tuesday)[0].completed);
        assert!(state.reduce(toggle));
        assert!(!state.tasks_for(Weekday::Tuesday)[0].completed);
    }

    #[test]
    fn toggle_and_delete_unknown_ids_are_noops() {
        let mut state = TasksState::default();
        add(&mut state, Weekday::Monday, "one");
        let before = state.clone();
        assert!(!state.reduce(TaskAction::ToggleTask { day: Weekday::Monday, id: "x".into() }));
        assert!(!state.reduce(TaskAction::DeleteTask { day: Weekday::Monday, id: "x".into() }));
        assert_eq!(state, before);
    }

    #[test]
    fn delete_removes_only_the_match() {
        let mut state = TasksState::default();
        let keep = add(&mut state, Weekday::Sunday, "keep");
        let drop = add(&mut state, Weekday::Sunday, "drop");
        assert!(state.reduce(TaskAction::DeleteTask { day: Weekday::Sunday, id: drop }));
        let remaining: Vec<_> = state.tasks_for(Weekday::Sunday).iter().map(|t| t.id.clone()).collect();
        assert_eq!(remaining, vec![keep]);
    }

    #[test]
    fn ids_are_unique_within_a_bucket() {
        let mut state = TasksState::default();
        for i in 0..50 {
            add(&mut state, Weekday::Wednesday, &format!("task {}", i));
        }
        let mut ids: Vec<_> = state.tasks_for(Weekday::Wednesday).iter().map(|t| &t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn stats_cover_all_days() {
        let mut state = TasksState::default();
        let a = add(&mut state, Weekday::Monday, "a");
        add(&mut state, Weekday::Tuesday, "b");
        add(&mut state, Weekday::Saturday, "c");
        state.reduce(TaskAction::ToggleTask { day: Weekday::Monday, id: a });
        let stats = state.stats();
        assert_eq!(stats.completed_tasks_count, 1);
        assert_eq!(stats.total_tasks_count, 3);
        assert_eq!(stats.completion_rate, 33);
    }

    #[test]
    fn completion_rate_rounds_and_handles_empty() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(3, 3), 100);
    }

    #[test]
    fn from_stored_fills_missing_days() {
        let mut partial = TasksByDay::new();
        partial.insert(Weekday::Monday, vec![Task::new("x".into())]);
        let state = TasksState::from_stored(partial);
        assert_eq!(state.by_day.len(), 7);
        assert_eq!(state.tasks_for(Weekday::Monday).len(), 1);
    }
}
