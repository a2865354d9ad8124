use ratatui::layout::Rect;
use ratatui::widgets::{ListItem, ListState};
use ratatui::Frame;

use crate::models::{Snapshot, Weekday};
use crate::store::MAX_SNAPSHOTS;
use crate::tui::widgets::{render_themed_list, truncate};
use crate::Config;

pub fn render_snapshot_list(
    f: &mut Frame,
    area: Rect,
    snapshots: &[Snapshot],
    list_state: &mut ListState,
    config: &Config,
) {
    let max_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = if snapshots.is_empty() {
        vec![ListItem::new(truncate("No snapshots saved", max_width))]
    } else {
        snapshots
            .iter()
            .map(|s| {
                ListItem::new(truncate(
                    &format!("{} · {}%", s.timestamp, s.stats.completion_rate),
                    max_width,
                ))
            })
            .collect()
    };
    let title = format!("Snapshots ({}/{})", snapshots.len(), MAX_SNAPSHOTS);
    render_themed_list(f, area, title, items, list_state, config);
}

pub fn snapshot_markdown(snapshot: &Snapshot) -> String {
    let stats = &snapshot.stats;
    let wellness = &snapshot.wellness;
    let mood = wellness
        .mood
        .map(|m| format!("{} {}", m.emoji(), m.name()))
        .unwrap_or_else(|| "not set".to_string());

    let mut content = format!("**Saved:** {}\n\n", snapshot.timestamp);
    content.push_str(&format!(
        "**Tasks:** {}/{} completed ({}%)\n\n",
        stats.completed_tasks_count, stats.total_tasks_count, stats.completion_rate
    ));
    content.push_str(&format!(
        "**Wellness:** mood {}, {} h sleep, {} steps, {} cups of water\n\n",
        mood, wellness.sleep_hours, wellness.steps, wellness.water_cups
    ));

    for day in Weekday::ALL {
        let tasks = snapshot.tasks.get(&day).map(Vec::as_slice).unwrap_or_default();
        if tasks.is_empty() {
            continue;
        }
        content.push_str(&format!("**{}**\n", day));
        for task in tasks {
            let marker = if task.completed { "✓" } else { "○" };
            content.push_str(&format!("* {} {}\n", marker, task.text));
        }
        content.push('\n');
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{empty_week, Mood, Task, TaskStats, WellnessRecord};

    #[test]
    fn summary_lists_only_days_with_tasks() {
        let mut tasks = empty_week();
        let mut done = Task::new("Run".to_string());
        done.completed = true;
        tasks.insert(Weekday::Tuesday, vec![done, Task::new("Read".to_string())]);

        let snapshot = Snapshot {
            id: "t".to_string(),
            timestamp: "2024-05-01T10:00:00.000Z".to_string(),
            tasks,
            wellness: WellnessRecord { mood: Some(Mood::Happy), sleep_hours: 7, steps: 8000, water_cups: 5 },
            stats: TaskStats { completed_tasks_count: 1, total_tasks_count: 2, completion_rate: 50 },
        };

        let md = snapshot_markdown(&snapshot);
        assert!(md.contains("**Tasks:** 1/2 completed (50%)"));
        assert!(md.contains("mood 😊 Happy, 7 h sleep, 8000 steps, 5 cups of water"));
        assert!(md.contains("**Tuesday**\n* ✓ Run\n* ○ Read\n"));
        assert!(!md.contains("Monday"));
    }
}
