use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;

use crate::models::{TaskStats, WellnessRecord};
use crate::store::wellness::{metrics, Metric};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;

pub fn mood_line(record: &WellnessRecord) -> String {
    match record.mood {
        Some(mood) => format!("Mood: {} {}", mood.emoji(), mood.name()),
        None => "Mood: not set".to_string(),
    }
}

pub fn metric_label(metric: &Metric) -> String {
    format!("{}: {} ({})", metric.label, metric.value, metric.rating.label())
}

pub fn completion_label(stats: &TaskStats) -> String {
    format!(
        "Tasks: {}/{} done ({}%)",
        stats.completed_tasks_count, stats.total_tasks_count, stats.completion_rate
    )
}

/// Wellness metrics for the tracker page, with the weekly task overview
/// underneath when `stats` is given
pub fn render_wellness(
    f: &mut Frame,
    area: Rect,
    record: &WellnessRecord,
    stats: Option<TaskStats>,
    config: &Config,
) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let gauge_style = Style::default().fg(highlight_bg).bg(bg_color);
    let label_style = Style::default().fg(get_contrast_text_color(highlight_bg));

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Wellness")
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend([Constraint::Length(2); 3]);
    if stats.is_some() {
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(2));
    }
    constraints.push(Constraint::Min(0));
    let rows = Layout::vertical(constraints).split(inner);

    f.render_widget(Paragraph::new(mood_line(record)), rows[0]);

    for (i, metric) in metrics(record).iter().enumerate() {
        let gauge = Gauge::default()
            .gauge_style(gauge_style)
            .ratio(metric.progress.clamp(0.0, 1.0))
            .label(ratatui::text::Span::styled(metric_label(metric), label_style));
        f.render_widget(gauge, first_line(rows[i + 1]));
    }

    if let Some(stats) = stats {
        f.render_widget(Paragraph::new("This week"), rows[4]);
        let gauge = Gauge::default()
            .gauge_style(gauge_style)
            .percent(stats.completion_rate.min(100) as u16)
            .label(ratatui::text::Span::styled(completion_label(&stats), label_style));
        f.render_widget(gauge, first_line(rows[5]));
    }
}

fn first_line(area: Rect) -> Rect {
    Rect { height: area.height.min(1), ..area }
}
