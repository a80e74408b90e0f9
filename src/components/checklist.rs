use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::RowView;
use crate::theme::ThemeColors;
use crate::tree::selection::CheckState;

/// Checklist widget that renders the flat tree rows with tri-state checkboxes.
pub struct ChecklistWidget<'a> {
    rows: &'a [RowView],
    cursor: usize,
    scroll_offset: usize,
    theme: &'a ThemeColors,
}

impl<'a> ChecklistWidget<'a> {
    pub fn new(
        rows: &'a [RowView],
        cursor: usize,
        scroll_offset: usize,
        theme: &'a ThemeColors,
    ) -> Self {
        Self {
            rows,
            cursor,
            scroll_offset,
            theme,
        }
    }

    /// Checkbox glyph for the row's aggregate state.
    fn checkbox(check: CheckState) -> &'static str {
        match check {
            CheckState::Checked => "[x]",
            CheckState::Partial => "[~]",
            CheckState::Unchecked => "[ ]",
        }
    }

    /// Expansion arrow for groups, spacing for leaves.
    fn arrow(row: &RowView) -> &'static str {
        if !row.expandable {
            "  "
        } else if row.expanded {
            "▾ "
        } else {
            "▸ "
        }
    }
}

impl<'a> Widget for ChecklistWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible_height = area.height as usize;
        if self.rows.is_empty() || visible_height == 0 {
            if area.height > 0 {
                let line = Line::from(Span::styled(
                    "  no matches",
                    Style::default().fg(self.theme.dim_fg),
                ));
                buf.set_line(area.x, area.y, &line, area.width);
            }
            return;
        }

        let visible_rows = self
            .rows
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(visible_height);

        for (i, (idx, row)) in visible_rows.enumerate() {
            let y = area.y + i as u16;
            if y >= area.y + area.height {
                break;
            }

            let is_cursor = idx == self.cursor;
            let row_style = if is_cursor {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else if row.expandable {
                Style::default()
                    .fg(self.theme.group_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.tree_fg)
            };
            let check_style = if is_cursor {
                row_style
            } else {
                match row.check {
                    CheckState::Checked => Style::default().fg(self.theme.checked_fg),
                    CheckState::Partial => Style::default().fg(self.theme.partial_fg),
                    CheckState::Unchecked => Style::default().fg(self.theme.dim_fg),
                }
            };

            let indent = "  ".repeat(row.level);
            let spans = vec![
                Span::styled(format!("{}{}", indent, Self::arrow(row)), row_style),
                Span::styled(Self::checkbox(row.check), check_style),
                Span::styled(format!(" {}", row.name), row_style),
            ];
            let line = Line::from(spans);
            buf.set_line(area.x, y, &line, area.width);
        }
    }
}
