use std::collections::HashSet;
use std::time::{Duration, Instant};

use ratatui::layout::{Position, Rect};
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::event::Event;
use crate::search::SearchDebouncer;
use crate::theme::{resolve_theme, ThemeColors};
use crate::tree::filter::{self, LeafMatchPolicy};
use crate::tree::flatten::{FlatId, Flattener};
use crate::tree::selection::{CheckState, SelectionCoordinator};
use crate::tree::store::{TreeNode, TreeStore};

/// State of the toolbar search box.
#[derive(Debug, Default)]
pub struct SearchBoxState {
    pub query: String,
    pub cursor_position: usize,
    pub focused: bool,
}

/// One visible checklist row, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub name: String,
    pub level: usize,
    pub expandable: bool,
    pub expanded: bool,
    pub check: CheckState,
}

/// Scoped click-outside subscription for the selection panel.
///
/// Acquired when the panel mounts (its screen rectangle becomes known) and
/// released when it unmounts; never a free-standing global handler.
#[derive(Debug, Clone, Copy)]
pub struct OutsideClick {
    container: Rect,
}

impl OutsideClick {
    pub fn acquire(container: Rect) -> Self {
        Self { container }
    }

    /// Containment contract: given an event target (column/row) and the
    /// container identity, report whether the target falls inside it.
    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.container.contains(Position::new(column, row))
    }
}

/// Main application state.
pub struct App {
    /// Canonical nested tree, the single source of truth.
    pub store: TreeStore,
    /// Independent deep copy used as the restore point for filtering.
    snapshot: Vec<TreeNode>,
    /// The nested tree currently rendered (snapshot or a pruned copy).
    rendered: Vec<TreeNode>,
    pub flattener: Flattener,
    pub selection: SelectionCoordinator,
    /// Current flat list, pre-order.
    pub flat: Vec<FlatId>,
    /// Expanded groups, keyed by flat identity.
    pub expanded: HashSet<FlatId>,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub search: SearchBoxState,
    pub debouncer: SearchDebouncer,
    /// The term currently applied to the rendered tree, if any.
    pub active_filter: Option<String>,
    leaf_policy: LeafMatchPolicy,
    min_search_len: usize,
    pub panel_open: bool,
    pub outside_click: Option<OutsideClick>,
    pub theme: ThemeColors,
    pub should_quit: bool,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(config: &AppConfig, event_tx: mpsc::UnboundedSender<Event>) -> Self {
        let leaf_policy = if config.compat_leaf_match() {
            LeafMatchPolicy::InteriorOnly
        } else {
            LeafMatchPolicy::Contains
        };
        Self {
            store: TreeStore::new(),
            snapshot: Vec::new(),
            rendered: Vec::new(),
            flattener: Flattener::new(),
            selection: SelectionCoordinator::new(true),
            flat: Vec::new(),
            expanded: HashSet::new(),
            cursor: 0,
            scroll_offset: 0,
            search: SearchBoxState::default(),
            debouncer: SearchDebouncer::new(
                event_tx,
                Duration::from_millis(config.debounce_ms()),
            ),
            active_filter: None,
            leaf_policy,
            min_search_len: config.min_search_len(),
            panel_open: config.panel_open(),
            outside_click: None,
            theme: resolve_theme(&config.theme),
            should_quit: false,
            status_message: None,
        }
    }

    /// React to a store publish: snapshot the tree, render it, expand all.
    pub fn on_tree_data(&mut self, data: Vec<TreeNode>) {
        self.snapshot = data.clone();
        self.rendered = data;
        self.reflatten();
        self.expand_all();
        self.clamp_cursor();
    }

    fn reflatten(&mut self) {
        self.flat = self.flattener.flatten(&self.rendered);
    }

    /// The nested tree currently on screen.
    pub fn rendered(&self) -> &[TreeNode] {
        &self.rendered
    }

    // ── Expansion ───────────────────────────────────────────────────────────

    pub fn is_expanded(&self, fid: FlatId) -> bool {
        self.expanded.contains(&fid)
    }

    pub fn expand_all(&mut self) {
        self.expanded = self
            .flat
            .iter()
            .copied()
            .filter(|&fid| self.flattener.is_expandable(fid))
            .collect();
    }

    /// Rows visible under the current expansion state: descendants of a
    /// collapsed group are skipped.
    pub fn visible_rows(&self) -> Vec<FlatId> {
        let mut rows = Vec::new();
        let mut hide_below: Option<usize> = None;
        for &fid in &self.flat {
            let level = self.flattener.level(fid);
            if let Some(threshold) = hide_below {
                if level > threshold {
                    continue;
                }
                hide_below = None;
            }
            rows.push(fid);
            if self.flattener.is_expandable(fid) && !self.is_expanded(fid) {
                hide_below = Some(level);
            }
        }
        rows
    }

    pub fn row_at_cursor(&self) -> Option<FlatId> {
        self.visible_rows().get(self.cursor).copied()
    }

    /// Expand or collapse the group under the cursor.
    pub fn toggle_expand_at_cursor(&mut self) {
        let Some(fid) = self.row_at_cursor() else {
            return;
        };
        if !self.flattener.is_expandable(fid) {
            return;
        }
        if !self.expanded.remove(&fid) {
            self.expanded.insert(fid);
        }
        self.clamp_cursor();
    }

    // ── Cursor & scroll ─────────────────────────────────────────────────────

    pub fn select_next(&mut self) {
        let len = self.visible_rows().len();
        if len > 0 && self.cursor < len - 1 {
            self.cursor += 1;
        }
    }

    pub fn select_previous(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    pub fn select_last(&mut self) {
        let len = self.visible_rows().len();
        if len > 0 {
            self.cursor = len - 1;
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    /// Update the scroll offset to ensure the cursor row is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + visible_height {
            self.scroll_offset = self.cursor - visible_height + 1;
        }
    }

    // ── Selection ───────────────────────────────────────────────────────────

    /// Toggle the checkbox under the cursor, cascading to descendants.
    pub fn toggle_selection_at_cursor(&mut self) {
        let Some(fid) = self.row_at_cursor() else {
            return;
        };
        let descendants = self.flattener.descendants(&self.flat, fid);
        self.selection.toggle(fid, &descendants);
    }

    pub fn select_all(&mut self) {
        let Self {
            selection,
            flattener,
            flat,
            ..
        } = self;
        selection.select_all(flat, |fid| flattener.descendants(flat, fid));
    }

    pub fn reset_selection(&mut self) {
        self.selection.clear();
    }

    /// Checkbox state of a row for rendering.
    pub fn check_state(&self, fid: FlatId) -> CheckState {
        let descendants = self.flattener.descendants(&self.flat, fid);
        self.selection.check_state(fid, &descendants)
    }

    /// Project the visible rows into render-ready views.
    pub fn row_views(&self) -> Vec<RowView> {
        self.visible_rows()
            .iter()
            .filter_map(|&fid| {
                let node = self.flattener.node(fid)?;
                Some(RowView {
                    name: node.name.clone(),
                    level: node.level,
                    expandable: node.expandable,
                    expanded: self.is_expanded(fid),
                    check: self.check_state(fid),
                })
            })
            .collect()
    }

    // ── Search & filter ─────────────────────────────────────────────────────

    /// Insert a character into the search box and restart the debounce timer.
    pub fn search_input_char(&mut self, c: char) {
        self.search.query.insert(self.search.cursor_position, c);
        self.search.cursor_position += c.len_utf8();
        self.debouncer.push(self.search.query.clone());
    }

    /// Delete the character before the search cursor (backspace).
    pub fn search_delete_char(&mut self) {
        let Some(prev_char) = self.search.query[..self.search.cursor_position]
            .chars()
            .next_back()
        else {
            return;
        };
        self.search.cursor_position -= prev_char.len_utf8();
        self.search.query.remove(self.search.cursor_position);
        self.debouncer.push(self.search.query.clone());
    }

    /// Clear the search box and restart the debounce timer.
    pub fn search_clear(&mut self) {
        self.search.query.clear();
        self.search.cursor_position = 0;
        self.debouncer.push(String::new());
    }

    /// Apply a debounced search emission: long enough terms filter, anything
    /// shorter falls through to a filter clear.
    pub fn apply_search(&mut self, value: &str) {
        if filter::term_is_searchable(value, self.min_search_len) {
            self.filter_by_name(value);
        } else {
            self.clear_filter();
        }
    }

    /// Replace the rendered tree with a pruned copy of the snapshot. The
    /// canonical tree is untouched; selection is re-affirmed and all groups
    /// re-expanded.
    pub fn filter_by_name(&mut self, term: &str) {
        self.rendered = filter::filter(term, &self.snapshot, self.leaf_policy);
        self.active_filter = Some(term.to_string());
        self.reflatten();
        self.selection.reaffirm();
        self.expand_all();
        self.clamp_cursor();
    }

    /// Discard the pruned view and republish the stored original snapshot.
    pub fn clear_filter(&mut self) {
        self.rendered = self.snapshot.clone();
        self.active_filter = None;
        self.reflatten();
        self.selection.reaffirm();
        self.expand_all();
        self.clamp_cursor();
    }

    // ── Selection panel ─────────────────────────────────────────────────────

    pub fn toggle_panel(&mut self) {
        if self.panel_open {
            self.close_panel();
        } else {
            self.panel_open = true;
        }
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
        self.outside_click = None;
        self.search.focused = false;
    }

    /// Record the panel's on-screen rectangle, acquiring the click-outside
    /// subscription. Called by the renderer while the panel is mounted.
    pub fn mount_panel(&mut self, area: Rect) {
        self.outside_click = Some(OutsideClick::acquire(area));
    }

    /// Close the panel when a press lands outside its container.
    pub fn handle_click(&mut self, column: u16, row: u16) {
        if !self.panel_open {
            return;
        }
        if let Some(outside) = self.outside_click {
            if !outside.contains(column, row) {
                self.close_panel();
            }
        }
    }

    // ── Status & lifecycle ──────────────────────────────────────────────────

    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message once it has been displayed for a few seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, created)) = &self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
