use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::SearchBoxState;
use crate::theme::ThemeColors;

/// Toolbar widget: the search input bound to the debounced filter.
pub struct ToolbarWidget<'a> {
    state: &'a SearchBoxState,
    active_filter: Option<&'a str>,
    theme: &'a ThemeColors,
}

impl<'a> ToolbarWidget<'a> {
    pub fn new(state: &'a SearchBoxState, theme: &'a ThemeColors) -> Self {
        Self {
            state,
            active_filter: None,
            theme,
        }
    }

    /// Show the term currently applied to the tree, if any.
    pub fn active_filter(mut self, term: Option<&'a str>) -> Self {
        self.active_filter = term;
        self
    }
}

impl<'a> Widget for ToolbarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let query = &self.state.query;
        let cursor_pos = self.state.cursor_position;

        let (before, cursor_char, after) = if cursor_pos < query.len() {
            let next = query[cursor_pos..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(1);
            (
                &query[..cursor_pos],
                &query[cursor_pos..cursor_pos + next],
                &query[cursor_pos + next..],
            )
        } else {
            (query.as_str(), " ", "")
        };

        let prompt_style = if self.state.focused {
            Style::default()
                .fg(self.theme.accent_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.dim_fg)
        };
        let input_style = Style::default().fg(self.theme.toolbar_fg);
        let cursor_style = if self.state.focused {
            Style::default()
                .bg(self.theme.toolbar_fg)
                .fg(self.theme.tree_selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            input_style
        };

        let mut spans = vec![
            Span::styled("Search> ", prompt_style),
            Span::styled(before, input_style),
            Span::styled(cursor_char, cursor_style),
            Span::styled(after, input_style),
        ];
        if let Some(term) = self.active_filter {
            spans.push(Span::styled(
                format!("  (filtering: {})", term),
                Style::default().fg(self.theme.dim_fg),
            ));
        } else if query.is_empty() && !self.state.focused {
            spans.push(Span::styled(
                "  type / to search",
                Style::default().fg(self.theme.dim_fg),
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::dark_theme;

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    #[test]
    fn renders_prompt_and_hint_when_idle() {
        let state = SearchBoxState::default();
        let theme = dark_theme();
        let area = Rect::new(0, 0, 50, 1);
        let mut buf = Buffer::empty(area);
        ToolbarWidget::new(&state, &theme).render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("Search>"));
        assert!(content.contains("type / to search"));
    }

    #[test]
    fn renders_query_text() {
        let state = SearchBoxState {
            query: "1-00".into(),
            cursor_position: 4,
            focused: true,
        };
        let theme = dark_theme();
        let area = Rect::new(0, 0, 50, 1);
        let mut buf = Buffer::empty(area);
        ToolbarWidget::new(&state, &theme).render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).contains("1-00"));
    }

    #[test]
    fn shows_active_filter_term() {
        let state = SearchBoxState {
            query: "2-0".into(),
            cursor_position: 3,
            focused: false,
        };
        let theme = dark_theme();
        let area = Rect::new(0, 0, 50, 1);
        let mut buf = Buffer::empty(area);
        ToolbarWidget::new(&state, &theme)
            .active_filter(Some("2-0"))
            .render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).contains("filtering: 2-0"));
    }

    #[test]
    fn zero_area_no_panic() {
        let state = SearchBoxState::default();
        let theme = dark_theme();
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        ToolbarWidget::new(&state, &theme).render(area, &mut buf);
    }
}
