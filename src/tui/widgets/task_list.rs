use ratatui::layout::Rect;
use ratatui::widgets::{ListItem, ListState};
use ratatui::Frame;

use crate::models::{Task, Weekday};
use crate::tui::widgets::{render_themed_list, truncate};
use crate::Config;

/// "✓ text" or "○ text", cut to `max_width`
pub fn task_line(task: &Task, max_width: usize) -> String {
    let marker = if task.completed { "✓" } else { "○" };
    truncate(&format!("{} {}", marker, task.text), max_width)
}

pub fn list_title(day: Weekday, tasks: &[Task]) -> String {
    let done = tasks.iter().filter(|t| t.completed).count();
    format!("{} ({}/{})", day, done, tasks.len())
}

pub fn render_task_list(
    f: &mut Frame,
    area: Rect,
    day: Weekday,
    tasks: &[Task],
    list_state: &mut ListState,
    config: &Config,
) {
    // borders, scrollbar and padding
    let max_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = if tasks.is_empty() {
        vec![ListItem::new(truncate("No tasks yet", max_width))]
    } else {
        tasks.iter().map(|task| ListItem::new(task_line(task, max_width))).collect()
    };

    render_themed_list(f, area, list_title(day, tasks), items, list_state, config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_shows_completion_marker() {
        let mut task = Task::new("Drink water".to_string());
        assert_eq!(task_line(&task, 40), "○ Drink water");
        task.completed = true;
        assert_eq!(task_line(&task, 40), "✓ Drink water");
        assert_eq!(task_line(&task, 8), "✓ Dri...");
    }

    #[test]
    fn title_counts_completed_tasks() {
        let mut tasks = vec![Task::new("a".to_string()), Task::new("b".to_string())];
        tasks[0].completed = true;
        assert_eq!(list_title(Weekday::Monday, &tasks), "Monday (1/2)");
    }
}
