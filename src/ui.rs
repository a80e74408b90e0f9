use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Clear, Padding},
    Frame,
};

use crate::app::App;
use crate::components::checklist::ChecklistWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::toolbar::ToolbarWidget;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    if area.height < 2 {
        return;
    }

    let status_area = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
    let body_area = Rect::new(area.x, area.y, area.width, area.height - 1);

    if app.panel_open {
        render_panel(app, frame, body_area);
    }

    let status_bar = StatusBarWidget::new(app.selection.len(), app.flat.len(), &app.theme)
        .active_filter(app.active_filter.as_deref())
        .status_message(app.status_message.as_ref().map(|(msg, _)| msg.as_str()))
        .panel_open(app.panel_open);
    frame.render_widget(status_bar, status_area);
}

/// Render the selection panel overlay: toolbar row on top, checklist below.
fn render_panel(app: &mut App, frame: &mut Frame, area: Rect) {
    let panel = panel_rect(area);

    // Mounting records the container rectangle for the click-outside contract.
    app.mount_panel(panel);

    frame.render_widget(Clear, panel);
    let block = Block::default()
        .title(" Pick items ")
        .borders(Borders::ALL)
        .border_style(ratatui::style::Style::default().fg(app.theme.panel_border_fg))
        .padding(Padding::horizontal(1));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let toolbar_area = Rect::new(inner.x, inner.y, inner.width, 1);
    let toolbar = ToolbarWidget::new(&app.search, &app.theme)
        .active_filter(app.active_filter.as_deref());
    frame.render_widget(toolbar, toolbar_area);

    if inner.height <= 1 {
        return;
    }
    let list_area = Rect::new(inner.x, inner.y + 1, inner.width, inner.height - 1);

    app.update_scroll(list_area.height as usize);
    let rows = app.row_views();
    let checklist = ChecklistWidget::new(&rows, app.cursor, app.scroll_offset, &app.theme);
    frame.render_widget(checklist, list_area);
}

/// Panel size: 60% x 70% of the body, clamped to a sane range. Percentages
/// are computed in u32 so very wide terminals cannot overflow u16.
fn panel_rect(area: Rect) -> Rect {
    let width = (u32::from(area.width) * 60 / 100).clamp(30, 70) as u16;
    let height = (u32::from(area.height) * 70 / 100).clamp(8, 24) as u16;
    centered_rect(width.min(area.width), height.min(area.height), area)
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
