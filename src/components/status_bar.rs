use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Status bar widget: selection count, filter state, key hints, messages.
pub struct StatusBarWidget<'a> {
    selected_count: usize,
    total_count: usize,
    active_filter: Option<&'a str>,
    status_message: Option<&'a str>,
    panel_open: bool,
    theme: &'a ThemeColors,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(selected_count: usize, total_count: usize, theme: &'a ThemeColors) -> Self {
        Self {
            selected_count,
            total_count,
            active_filter: None,
            status_message: None,
            panel_open: false,
            theme,
        }
    }

    pub fn active_filter(mut self, term: Option<&'a str>) -> Self {
        self.active_filter = term;
        self
    }

    pub fn status_message(mut self, msg: Option<&'a str>) -> Self {
        self.status_message = msg;
        self
    }

    pub fn panel_open(mut self, open: bool) -> Self {
        self.panel_open = open;
        self
    }

    fn hints(&self) -> &'static str {
        if self.panel_open {
            "[Space] Toggle  [←→] Fold  [/] Search  [Ctrl+A] All  [Ctrl+R] Reset  [Esc] Close"
        } else {
            "[Enter] Open picker  [q] Quit"
        }
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        // A transient status message takes over the whole bar.
        if let Some(msg) = self.status_message {
            let line = Line::from(Span::styled(
                msg,
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let mut spans = vec![Span::styled(
            format!(" {}/{} selected", self.selected_count, self.total_count),
            Style::default().fg(self.theme.status_fg),
        )];
        if let Some(term) = self.active_filter {
            spans.push(Span::styled(
                format!("  filter: {}", term),
                Style::default().fg(self.theme.partial_fg),
            ));
        }
        spans.push(Span::styled(
            format!("  {}", self.hints()),
            Style::default().fg(self.theme.dim_fg),
        ));
        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
