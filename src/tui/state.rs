use std::collections::VecDeque;

use crate::lists::model::AggregatedData;
use crate::lists::search::{parse_search_tokens, ProfileFilter};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    Search,
}

/// UI state over an `AggregatedData` snapshot. Rows are indices into
/// `AggregatedData::profiles`, so the snapshot stays the single source of
/// membership truth.
#[derive(Debug, Clone)]
pub struct AppState {
    pub user_handle: String,
    pub mode: InputMode,
    pub search_input: String,
    pub filter: ProfileFilter,
    /// Filtered profile indices, in display order.
    pub rows: Vec<usize>,
    /// How many of `rows` are revealed.
    pub revealed: usize,
    pub batch_size: usize,
    pub selected: usize,
    pub list_cursor: usize,
    pub busy: bool,
    pub status: Option<String>,
    pub logs: VecDeque<LogEntry>,
    pub log_focus: bool,
    pub log_scroll_offset: usize,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub message: String,
}

impl AppState {
    pub fn new(user_handle: &str, batch_size: usize, data: &AggregatedData) -> Self {
        let mut state = Self {
            user_handle: user_handle.to_string(),
            mode: InputMode::Browse,
            search_input: String::new(),
            filter: ProfileFilter::default(),
            rows: Vec::new(),
            revealed: 0,
            batch_size: batch_size.max(1),
            selected: 0,
            list_cursor: 0,
            busy: false,
            status: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            log_focus: false,
            log_scroll_offset: 0,
        };
        state.refilter(data);
        state
    }

    /// Recompute rows after the filter changed; resets scrolling.
    pub fn refilter(&mut self, data: &AggregatedData) {
        self.rows = self.filter.apply(&data.profiles);
        self.revealed = self.batch_size.min(self.rows.len());
        self.selected = 0;
    }

    pub fn set_search(&mut self, input: String, data: &AggregatedData) {
        self.filter.tokens = parse_search_tokens(&input);
        self.search_input = input;
        self.refilter(data);
    }

    pub fn toggle_not_in_list_only(&mut self, data: &AggregatedData) {
        self.filter.not_in_list_only = !self.filter.not_in_list_only;
        self.refilter(data);
    }

    /// Revealed rows.
    pub fn shown(&self) -> &[usize] {
        &self.rows[..self.revealed.min(self.rows.len())]
    }

    pub fn has_more(&self) -> bool {
        self.revealed < self.rows.len()
    }

    /// Index into `AggregatedData::profiles` of the selected row.
    pub fn selected_profile(&self) -> Option<usize> {
        self.shown().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        self.move_selection(1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn page_down(&mut self, page: usize) {
        self.move_selection(page.max(1));
    }

    pub fn page_up(&mut self, page: usize) {
        self.selected = self.selected.saturating_sub(page.max(1));
    }

    fn move_selection(&mut self, by: usize) {
        if self.rows.is_empty() {
            return;
        }
        let target = self.selected + by;
        while target >= self.revealed && self.has_more() {
            self.load_more();
        }
        self.selected = target.min(self.revealed.saturating_sub(1));
        // Reaching the last revealed row reveals the next batch.
        if self.selected + 1 == self.revealed {
            self.load_more();
        }
    }

    fn load_more(&mut self) {
        self.revealed = (self.revealed + self.batch_size).min(self.rows.len());
    }

    pub fn next_list(&mut self, list_count: usize) {
        if list_count > 0 {
            self.list_cursor = (self.list_cursor + 1) % list_count;
        }
    }

    pub fn prev_list(&mut self, list_count: usize) {
        if list_count > 0 {
            self.list_cursor = (self.list_cursor + list_count - 1) % list_count;
        }
    }

    pub fn push_log(&mut self, level: &str, message: String) {
        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        if self.logs.len() >= MAX_LOGS {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            time,
            level: level.to_string(),
            message,
        });
    }
}
