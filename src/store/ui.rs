#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    ToggleStats,
    SetShowStats(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiFlags {
    pub show_stats: bool,
}

impl Default for UiFlags {
    fn default() -> Self {
        Self { show_stats: true }
    }
}

impl UiFlags {
    pub fn reduce(&mut self, action: UiAction) -> bool {
        let before = self.show_stats;
        match action {
            UiAction::ToggleStats => self.show_stats = !self.show_stats,
            UiAction::SetShowStats(show) => self.show_stats = show,
        }
        before != self.show_stats
    }
}
