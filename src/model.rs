use std::time::{Duration, Instant};

use arboard::Clipboard;
use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, error, info, trace};

use crate::domain::{HELP_TEXT, Message, TVConfig, TabError};
use crate::engine::{Record, Row, TableEngine, TableViewData};
use crate::export;
use crate::inputter::{InputResult, Inputter};
use crate::loader::Dataset;

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modus {
    TABLE,
    RECORD,
    POPUP,
    SEARCH,
}

/// Field/value listing of a single row.
struct RecordView {
    record_idx: usize, // Snapshot index of the shown row
    header_data: Vec<String>,
    row_data: Vec<String>,
    curser_row: usize,
    curser_offset: usize,
}

impl RecordView {
    fn empty() -> Self {
        RecordView {
            record_idx: 0,
            header_data: Vec::new(),
            row_data: Vec::new(),
            curser_row: 0,
            curser_offset: 0,
        }
    }
}

/// Record view data handed to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordData {
    pub title: String,
    pub fields: Vec<(String, String)>,
    pub selected_row: usize,
}

/// Everything the UI needs for one frame.
pub struct UIData {
    pub name: String,
    pub modus: Modus,
    pub table: TableViewData,
    pub selected_row: usize,
    pub selected_column: usize,
    pub record: Option<RecordData>,
    pub show_popup: bool,
    pub popup_message: String,
    pub cmdinput: InputResult,
    pub active_cmdinput: bool,
    pub status_message: String,
    pub last_status_message_update: Instant,
}

pub struct Model {
    config: TVConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    name: String,
    engine: TableEngine<Record>,
    record_view: RecordView,
    curser_row: usize,
    curser_column: usize,
    ui_height: usize,
    clipboard: Option<Clipboard>,
    input: Inputter,
    last_input: InputResult,
    status_message: String,
    last_status_message_update: Instant,
}

impl Model {
    pub fn init(config: &TVConfig, dataset: Dataset) -> Result<Self, TabError> {
        if dataset.columns.is_empty() {
            return Err(TabError::EmptyDataset);
        }

        let searchable = config
            .search_fields
            .clone()
            .or(dataset.searchable_fields);
        let placeholder = config
            .placeholder
            .clone()
            .or(dataset.placeholder)
            .unwrap_or_else(|| crate::engine::DEFAULT_PLACEHOLDER.to_string());
        let page_size = dataset.page_size.unwrap_or(config.page_size);
        let nrows = dataset.rows.len();

        let mut engine = TableEngine::new(dataset.columns)
            .with_placeholder(placeholder)
            .with_page_size(page_size)
            .with_debounce(Duration::from_millis(config.debounce_ms));
        engine.set_searchable_fields(searchable);
        engine.set_rows(dataset.rows);

        let clipboard = match Clipboard::new() {
            Ok(c) => Some(c),
            Err(e) => {
                debug!("No clipboard available: {e:?}");
                None
            }
        };

        info!("Showing \"{}\" with {} rows", dataset.name, nrows);
        Ok(Self {
            config: config.clone(),
            status: Status::READY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            name: dataset.name,
            engine,
            record_view: RecordView::empty(),
            curser_row: 0,
            curser_column: 0,
            ui_height: 0,
            clipboard,
            input: Inputter::default(),
            last_input: InputResult::default(),
            status_message: format!("Loaded {nrows} rows"),
            last_status_message_update: Instant::now(),
        })
    }

    pub fn engine(&self) -> &TableEngine<Record> {
        &self.engine
    }

    pub fn modus(&self) -> Modus {
        self.modus
    }

    /// Controller should hand over raw keys while the search box is active.
    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::SEARCH
    }

    /// Time until a pending search must be applied.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.engine.search_remaining_at(Instant::now())
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.last_status_message_update = Instant::now();
    }

    pub fn get_uidata(&self) -> UIData {
        let table = self.engine.view();
        UIData {
            name: self.name.clone(),
            modus: self.modus,
            selected_row: self.curser_row,
            selected_column: self.curser_column,
            record: (self.modus == Modus::RECORD).then(|| self.record_data()),
            show_popup: self.modus == Modus::POPUP,
            popup_message: HELP_TEXT.to_string(),
            cmdinput: self.last_input.clone(),
            active_cmdinput: self.modus == Modus::SEARCH,
            status_message: self.status_message.clone(),
            last_status_message_update: self.last_status_message_update,
            table,
        }
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), TabError> {
        // Pending searches fire here, whether or not a key came in.
        if self.engine.tick() {
            self.on_search_applied();
        }

        if let Some(msg) = message {
            match self.modus {
                Modus::TABLE => match msg {
                    Message::Quit => self.quit(),
                    Message::MoveDown => self.move_table_selection_down(),
                    Message::MoveUp => self.move_table_selection_up(),
                    Message::MoveLeft => self.move_table_selection_left(),
                    Message::MoveRight => self.move_table_selection_right(),
                    Message::NextPage => self.change_page(|e| e.next_page()),
                    Message::PrevPage => self.change_page(|e| e.prev_page()),
                    Message::FirstPage => self.change_page(|e| e.first_page()),
                    Message::LastPage => self.change_page(|e| e.last_page()),
                    Message::ToggleSort => self.sort_current_column(),
                    Message::Search => self.enter_search_mode(),
                    Message::ToggleSelect => self.toggle_select(),
                    Message::SelectPage => {
                        self.engine.select_page();
                        self.set_status_message(format!("{} selected", self.engine.selection_len()));
                    }
                    Message::ClearSelection => {
                        self.engine.clear_selection();
                        self.set_status_message("Selection cleared");
                    }
                    Message::Enter => self.enter(),
                    Message::Exit => self.exit(),
                    Message::CopyCell => self.copy_table_cell(),
                    Message::CopyRow => self.copy_table_row(),
                    Message::Export => self.export(),
                    Message::Help => self.show_help(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    Message::RawKey(_) => (),
                },
                Modus::RECORD => match msg {
                    Message::Quit => self.quit(),
                    Message::MoveDown => self.move_record_selection_down(1),
                    Message::MoveUp => self.move_record_selection_up(1),
                    Message::MoveLeft => self.step_record(-1),
                    Message::MoveRight => self.step_record(1),
                    Message::CopyCell => self.copy_record_cell(),
                    Message::Help => self.show_help(),
                    Message::Exit => self.exit(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    _ => (),
                },
                Modus::POPUP => match msg {
                    Message::Quit => self.quit(),
                    Message::Exit | Message::Enter | Message::Help => self.exit(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    _ => (),
                },
                Modus::SEARCH => match msg {
                    Message::RawKey(key) => self.raw_input(key),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    _ => (),
                },
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------- //

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!("UI was resized! w:{width}, h:{}->{}", self.ui_height, height);
        self.ui_height = height;
    }

    fn clamp_cursor(&mut self) {
        let visible = self.engine.visible_len();
        self.curser_row = self.curser_row.min(visible.saturating_sub(1));
        self.curser_column = self
            .curser_column
            .min(self.engine.columns().len().saturating_sub(1));
    }

    fn on_search_applied(&mut self) {
        self.curser_row = 0;
        self.clamp_cursor();
        let query = self.engine.applied_query().to_string();
        if query.is_empty() {
            self.set_status_message(format!("{} rows", self.engine.total()));
        } else if self.engine.filtered_len() == 0 {
            self.set_status_message("Found no matches!");
        } else {
            self.set_status_message(format!(
                "Found {} results for \"{query}\"",
                self.engine.filtered_len()
            ));
        }
    }

    fn change_page(&mut self, f: impl FnOnce(&mut TableEngine<Record>)) {
        let before = self.engine.page_index();
        f(&mut self.engine);
        if self.engine.page_index() != before {
            self.curser_row = 0;
        }
        self.clamp_cursor();
    }

    fn enter_search_mode(&mut self) {
        trace!("Entering search mode ...");
        self.previous_modus = self.modus;
        self.modus = Modus::SEARCH;
        self.input.set(self.engine.search_text());
        self.input.resume();
        self.last_input = self.input.get();
    }

    fn raw_input(&mut self, key: KeyEvent) {
        self.last_input = self.input.read(key);
        if self.last_input.changed {
            self.engine.set_search_text(self.last_input.input.clone());
        }
        if self.last_input.finished {
            trace!("Search input finished: {:?}", self.last_input);
            if self.last_input.canceled {
                self.engine.set_search_text("");
            }
            if self.engine.flush_search() {
                self.on_search_applied();
            }
            self.modus = self.previous_modus;
            self.previous_modus = Modus::SEARCH;
        }
    }

    fn sort_current_column(&mut self) {
        let Some(column_id) = self
            .engine
            .columns()
            .get(self.curser_column)
            .map(|c| c.id().to_string())
        else {
            return;
        };
        if self.engine.toggle_sort(&column_id) {
            match self.engine.sort() {
                Some(s) => self.set_status_message(format!("Sorted by {s}")),
                None => self.set_status_message("Sort cleared"),
            }
        } else {
            self.set_status_message("Column is not sortable");
        }
    }

    fn toggle_select(&mut self) {
        if let Some(selected) = self.engine.toggle_selected(self.curser_row) {
            trace!("Row {} selected: {selected}", self.curser_row);
            self.set_status_message(format!("{} selected", self.engine.selection_len()));
        }
    }

    fn enter(&mut self) {
        if let Some((idx, _)) = self.engine.row_on_page(self.curser_row) {
            self.build_record_view(idx);
            self.previous_modus = self.modus;
            self.modus = Modus::RECORD;
        }
    }

    fn exit(&mut self) {
        match self.modus {
            Modus::TABLE => {
                // Esc in the table clears an applied search
                if !self.engine.search_text().is_empty() {
                    self.engine.set_search_text("");
                    if self.engine.flush_search() {
                        self.on_search_applied();
                    }
                }
            }
            Modus::RECORD => {
                // Land on the page that holds the record we looked at
                if let Some(pos) = self.engine.position_of(self.record_view.record_idx)
                    && self.engine.page_size() > 0
                {
                    let page_size = self.engine.page_size();
                    self.engine.request_page((pos / page_size) as i64);
                    self.curser_row = pos % page_size;
                }
                self.previous_modus = Modus::RECORD;
                self.modus = Modus::TABLE;
                self.clamp_cursor();
            }
            Modus::POPUP => {
                trace!("Close popup ...");
                self.modus = self.previous_modus;
                self.previous_modus = Modus::POPUP;
            }
            Modus::SEARCH => {}
        }
    }

    fn show_help(&mut self) {
        if self.modus != Modus::POPUP {
            self.previous_modus = self.modus;
            self.modus = Modus::POPUP;
        } else {
            self.exit();
        }
    }

    // -------------------- Table cursor ---------------------- //

    fn move_table_selection_up(&mut self) {
        if self.curser_row > 0 {
            self.curser_row -= 1;
        } else if self.engine.can_prev() {
            // Wrap onto the last row of the previous page
            self.engine.prev_page();
            self.curser_row = self.engine.visible_len().saturating_sub(1);
        }
    }

    fn move_table_selection_down(&mut self) {
        if self.curser_row + 1 < self.engine.visible_len() {
            self.curser_row += 1;
        } else if self.engine.can_next() {
            self.engine.next_page();
            self.curser_row = 0;
        }
    }

    fn move_table_selection_left(&mut self) {
        self.curser_column = self.curser_column.saturating_sub(1);
    }

    fn move_table_selection_right(&mut self) {
        if self.curser_column + 1 < self.engine.columns().len() {
            self.curser_column += 1;
        }
    }

    // -------------------- Record view ---------------------- //

    fn build_record_view(&mut self, record_idx: usize) {
        trace!("Building record view for {record_idx} ...");
        let Some(row) = self.engine.row(record_idx) else {
            error!("Trying to show unknown record {record_idx}!");
            return;
        };
        let record = &mut self.record_view;
        record.record_idx = record_idx;
        record.header_data = Vec::new();
        record.row_data = Vec::new();
        for (cidx, column) in self.engine.columns().iter().enumerate() {
            if !column.has_value() {
                continue;
            }
            let header = if column.header().is_empty() {
                column.id().to_string()
            } else {
                column.header().to_string()
            };
            record
                .header_data
                .push(header.chars().take(self.config.max_column_width).collect());
            record.row_data.push(self.engine.render_cell(row, cidx));
        }
        record.curser_row = 0;
        record.curser_offset = 0;
    }

    fn record_data(&self) -> RecordData {
        let record = &self.record_view;
        let title = self
            .engine
            .row(record.record_idx)
            .and_then(|r| r.row_id())
            .map(|id| format!("R[{}] #{id}", self.name))
            .unwrap_or_else(|| format!("R[{}] {}", self.name, record.record_idx + 1));
        RecordData {
            title,
            fields: record
                .header_data
                .iter()
                .cloned()
                .zip(record.row_data.iter().cloned())
                .skip(record.curser_offset)
                .collect(),
            selected_row: record.curser_row,
        }
    }

    fn record_height(&self) -> usize {
        // Borders and footer lines
        self.ui_height.saturating_sub(6).max(1)
    }

    fn move_record_selection_up(&mut self, size: usize) {
        let record = &mut self.record_view;
        if record.curser_row > 0 {
            record.curser_row = record.curser_row.saturating_sub(size);
        } else if record.curser_offset > 0 {
            record.curser_offset = record.curser_offset.saturating_sub(size);
        }
    }

    fn move_record_selection_down(&mut self, size: usize) {
        let height = self.record_height();
        let record = &mut self.record_view;
        let len = record.row_data.len();
        if record.curser_row + record.curser_offset + 1 < len {
            if record.curser_row + 1 < height {
                record.curser_row += size;
            } else {
                record.curser_offset += size;
            }
        }
    }

    /// Moves to the previous/next row in display order.
    fn step_record(&mut self, step: i64) {
        let Some(pos) = self.engine.position_of(self.record_view.record_idx) else {
            return;
        };
        let next = pos as i64 + step;
        if next < 0 || next as usize >= self.engine.filtered_len() {
            return;
        }
        if let Some(idx) = self.engine.index_at(next as usize) {
            let (row, offset) = (self.record_view.curser_row, self.record_view.curser_offset);
            self.build_record_view(idx);
            self.record_view.curser_row = row;
            self.record_view.curser_offset = offset;
        }
    }

    // -------------------- Output ---------------------- //

    fn set_clipboard(&mut self, text: String) {
        match self.clipboard.as_mut().map(|c| c.set_text(text)) {
            Some(Ok(_)) => {
                trace!("Copied content to clipboard.");
                self.set_status_message("Copied to clipboard");
            }
            Some(Err(e)) => {
                error!("Error copying to clipboard: {:?}", e);
                self.set_status_message("Copy failed!");
            }
            None => self.set_status_message("No clipboard available"),
        }
    }

    fn copy_table_cell(&mut self) {
        if let Some((_, row)) = self.engine.row_on_page(self.curser_row) {
            let cell = self.engine.render_cell(row, self.curser_column);
            trace!("Cell content: {}", cell);
            self.set_clipboard(cell);
        }
    }

    fn copy_table_row(&mut self) {
        if let Some((_, row)) = self.engine.row_on_page(self.curser_row) {
            let line = export::csv_line(row, self.engine.columns());
            self.set_clipboard(line);
        }
    }

    fn copy_record_cell(&mut self) {
        let record = &self.record_view;
        if let Some(cell) = record.row_data.get(record.curser_offset + record.curser_row) {
            let cell = cell.clone();
            self.set_clipboard(cell);
        }
    }

    fn export(&mut self) {
        let path = export::export_path(&self.config.export_dir, &self.name);
        let result = if self.engine.selection_len() > 0 {
            export::write_csv(&path, self.engine.columns(), self.engine.selected_rows())
        } else {
            export::write_csv(&path, self.engine.columns(), self.engine.ordered_rows())
        };
        match result {
            Ok(n) => self.set_status_message(format!("Exported {n} rows to {}", path.display())),
            Err(e) => {
                error!("Export failed: {e}");
                self.set_status_message(format!("Export failed: {e}"));
            }
        }
    }
}
