//! Client-side searchable, sortable and paginated table view.
//!
//! [`TableEngine`] owns the search text, the single active sort and the page
//! position over a snapshot of rows. Callers push rows and user intents in and
//! read a [`TableViewData`] back out for rendering. Nothing in here fails: bad page
//! requests are clamped and missing fields render as empty cells.

mod column;
mod debounce;
mod page;
mod row;
pub mod search;
mod selection;
pub mod sort;
mod value;
mod view;

use std::time::{Duration, Instant};

use tracing::{debug, trace};

pub use column::ColumnDef;
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use page::{DEFAULT_PAGE_SIZE, Pagination};
pub use row::{Record, Row, RowKey};
pub use selection::Selection;
pub use sort::{SortDirection, SortState};
pub use value::{Value, natural_cmp};
pub use view::{EMPTY_MESSAGE, HeaderView, RowView, TableViewData};

pub const DEFAULT_PLACEHOLDER: &str = "Search…";
pub const DEFAULT_ACTIONS: [&str; 2] = ["Export", "Create"];

pub struct TableEngine<T: Row> {
    rows: Vec<T>,
    columns: Vec<ColumnDef<T>>,
    searchable_fields: Option<Vec<String>>,
    placeholder: String,
    actions: Vec<String>,
    search_text: String,  // What the user typed
    query: String,        // Normalized query currently applied
    debouncer: Debouncer<String>,
    sort: Option<SortState>,
    pagination: Pagination,
    matched: Vec<usize>, // Snapshot indices matching the query, snapshot order
    order: Vec<usize>,   // `matched` after sorting
    selection: Selection,
}

impl<T: Row + Sync> TableEngine<T> {
    pub fn new(columns: Vec<ColumnDef<T>>) -> Self {
        Self {
            rows: Vec::new(),
            columns,
            searchable_fields: None,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            actions: DEFAULT_ACTIONS.iter().map(|s| s.to_string()).collect(),
            search_text: String::new(),
            query: String::new(),
            debouncer: Debouncer::default(),
            sort: None,
            pagination: Pagination::default(),
            matched: Vec::new(),
            order: Vec::new(),
            selection: Selection::default(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<T>) -> Self {
        self.set_rows(rows);
        self
    }

    pub fn with_searchable_fields<S: Into<String>>(
        mut self,
        fields: impl IntoIterator<Item = S>,
    ) -> Self {
        self.set_searchable_fields(Some(fields.into_iter().map(Into::into).collect()));
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    pub fn with_actions<S: Into<String>>(mut self, actions: impl IntoIterator<Item = S>) -> Self {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debouncer = Debouncer::new(delay);
        self
    }

    // -------------------------------------------------------------------------
    // Inputs
    // -------------------------------------------------------------------------

    /// Replaces the row snapshot. Search and sort are re-applied, the page index is
    /// kept where possible.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        debug!("New snapshot with {} rows", rows.len());
        self.rows = rows;
        self.selection.retain_existing(&self.rows);
        self.refilter();
    }

    pub fn set_columns(&mut self, columns: Vec<ColumnDef<T>>) {
        self.columns = columns;
        if let Some(s) = &self.sort
            && self.sortable_column(&s.column).is_none()
        {
            trace!("Dropping sort on vanished column {}", s.column);
            self.sort = None;
        }
        self.resort();
    }

    /// `None` searches the fields of the first row.
    pub fn set_searchable_fields(&mut self, fields: Option<Vec<String>>) {
        self.searchable_fields = fields;
        self.refilter();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination.set_page_size(page_size, self.order.len());
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.set_search_text_at(text, Instant::now());
    }

    /// Records the typed text and (re)starts the debounce interval at `now`.
    pub fn set_search_text_at(&mut self, text: impl Into<String>, now: Instant) {
        self.search_text = text.into();
        self.debouncer.schedule(self.search_text.clone(), now);
    }

    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// Applies the pending search text if its quiet interval has passed.
    /// Returns true if the view changed.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(text) => {
                self.apply_query(&text);
                true
            }
            None => false,
        }
    }

    /// Applies the pending search text immediately.
    pub fn flush_search(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(text) => {
                self.apply_query(&text);
                true
            }
            None => false,
        }
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Time left at `now` before the pending search text is applied.
    pub fn search_remaining_at(&self, now: Instant) -> Option<Duration> {
        self.debouncer.remaining(now)
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn applied_query(&self) -> &str {
        &self.query
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    fn apply_query(&mut self, text: &str) {
        self.query = search::normalize_query(text);
        self.refilter();
        self.pagination.reset();
        debug!(
            "Search \"{}\" matched {}/{} rows",
            self.query,
            self.matched.len(),
            self.rows.len()
        );
    }

    fn refilter(&mut self) {
        let fields = search::resolve_fields(self.searchable_fields.as_deref(), &self.rows);
        self.matched = search::filter_indices(&self.rows, &fields, &self.query);
        self.resort();
    }

    // -------------------------------------------------------------------------
    // Sort
    // -------------------------------------------------------------------------

    /// Header click on `column_id`. Unknown or unsortable columns are ignored.
    /// The page index is kept.
    pub fn toggle_sort(&mut self, column_id: &str) -> bool {
        if self.sortable_column(column_id).is_none() {
            trace!("Ignoring sort on column {column_id}");
            return false;
        }
        self.sort = sort::toggle(self.sort.as_ref(), column_id);
        trace!("Sort is now {:?}", self.sort);
        self.resort();
        true
    }

    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.sort = sort.filter(|s| self.sortable_column(&s.column).is_some());
        self.resort();
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    fn sortable_column(&self, column_id: &str) -> Option<&ColumnDef<T>> {
        self.columns
            .iter()
            .find(|c| c.id() == column_id && c.is_sortable())
    }

    fn resort(&mut self) {
        let mut order = self.matched.clone();
        if let Some(s) = &self.sort
            && let Some(column) = self.sortable_column(&s.column)
        {
            sort::sort_indices(&mut order, &self.rows, column, s.direction);
        }
        self.order = order;
        self.pagination.clamp(self.order.len());
    }

    // -------------------------------------------------------------------------
    // Paging
    // -------------------------------------------------------------------------

    pub fn request_page(&mut self, page: i64) {
        self.pagination.request(page, self.order.len());
    }

    pub fn next_page(&mut self) {
        self.request_page(self.pagination.page_index() as i64 + 1);
    }

    pub fn prev_page(&mut self) {
        self.request_page(self.pagination.page_index() as i64 - 1);
    }

    pub fn first_page(&mut self) {
        self.pagination.reset();
    }

    pub fn last_page(&mut self) {
        self.request_page(self.pagination.last_page(self.order.len()) as i64);
    }

    pub fn page_index(&self) -> usize {
        self.pagination.page_index()
    }

    pub fn page_size(&self) -> usize {
        self.pagination.page_size()
    }

    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.order.len())
    }

    pub fn can_prev(&self) -> bool {
        self.pagination.can_prev()
    }

    pub fn can_next(&self) -> bool {
        self.pagination.can_next(self.order.len())
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    pub fn columns(&self) -> &[ColumnDef<T>] {
        &self.columns
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn filtered_len(&self) -> usize {
        self.order.len()
    }

    /// All matching rows in display order, across every page.
    pub fn ordered_rows(&self) -> impl Iterator<Item = &T> {
        self.order.iter().map(move |&idx| &self.rows[idx])
    }

    /// `(snapshot index, row)` of the rows on the current page.
    pub fn visible_rows(&self) -> impl Iterator<Item = (usize, &T)> {
        let range = self.pagination.range(self.order.len());
        self.order[range].iter().map(move |&idx| (idx, &self.rows[idx]))
    }

    pub fn visible_len(&self) -> usize {
        self.pagination.range(self.order.len()).len()
    }

    /// Row at `position` on the current page.
    pub fn row_on_page(&self, position: usize) -> Option<(usize, &T)> {
        self.visible_rows().nth(position)
    }

    /// Position of snapshot row `index` in display order, if it matches the search.
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.order.iter().position(|&i| i == index)
    }

    /// Snapshot index of the row at `position` in display order.
    pub fn index_at(&self, position: usize) -> Option<usize> {
        self.order.get(position).copied()
    }

    pub fn row(&self, index: usize) -> Option<&T> {
        self.rows.get(index)
    }

    /// Cell text of `row` in column `column`; out of range columns render empty.
    pub fn render_cell(&self, row: &T, column: usize) -> String {
        self.columns
            .get(column)
            .map(|c| c.render(row))
            .unwrap_or_default()
    }

    pub fn view(&self) -> TableViewData {
        let headers = self
            .columns
            .iter()
            .map(|c| HeaderView {
                id: c.id().to_string(),
                label: c.header().to_string(),
                sortable: c.is_sortable(),
                direction: self
                    .sort
                    .as_ref()
                    .filter(|s| s.column == c.id())
                    .map(|s| s.direction),
            })
            .collect();

        let rows: Vec<RowView> = self
            .visible_rows()
            .map(|(idx, row)| {
                let key = Selection::key_of(row, idx);
                RowView {
                    source_index: idx,
                    selected: self.selection.contains(&key),
                    key,
                    cells: self.columns.iter().map(|c| c.render(row)).collect(),
                }
            })
            .collect();

        let len = self.order.len();
        TableViewData {
            headers,
            empty_message: rows.is_empty().then_some(EMPTY_MESSAGE),
            shown: rows.len(),
            rows,
            placeholder: self.placeholder.clone(),
            search_text: self.search_text.clone(),
            actions: self.actions.clone(),
            total: self.rows.len(),
            filtered: len,
            selected: self.selection.len(),
            page_index: self.pagination.page_index(),
            page_count: self.pagination.page_count(len),
            can_prev: self.pagination.can_prev(),
            can_next: self.pagination.can_next(len),
            summary: self.pagination.summary(len),
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Flips selection of the row at `position` on the current page.
    pub fn toggle_selected(&mut self, position: usize) -> Option<bool> {
        let key = self
            .row_on_page(position)
            .map(|(idx, row)| Selection::key_of(row, idx))?;
        Some(self.selection.toggle(key))
    }

    pub fn select_page(&mut self) {
        let keys: Vec<RowKey> = self
            .visible_rows()
            .map(|(idx, row)| Selection::key_of(row, idx))
            .collect();
        for key in keys {
            self.selection.insert(key);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.rows
            .get(index)
            .map(|row| self.selection.contains(&Selection::key_of(row, index)))
            .unwrap_or(false)
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// Selected rows that match the current search, in display order.
    pub fn selected_rows(&self) -> Vec<&T> {
        self.order
            .iter()
            .filter(|&&idx| self.is_selected(idx))
            .map(|&idx| &self.rows[idx])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(n: usize) -> Vec<Record> {
        (1..=n)
            .map(|i| {
                Record::from_pairs([
                    ("id", Value::from(i as i64)),
                    ("name", Value::from(format!("User {i}"))),
                ])
                .with_id_field("id")
            })
            .collect()
    }

    fn engine(n: usize) -> TableEngine<Record> {
        TableEngine::new(vec![
            ColumnDef::field("Name", "name"),
            ColumnDef::display("", "select", |_, _| "[ ]".to_string()),
        ])
        .with_rows(users(n))
        .with_searchable_fields(["name"])
    }

    fn names(view: &TableViewData) -> Vec<&str> {
        view.column_cells(0)
    }

    #[test]
    fn defaults() {
        let e = engine(3);
        assert_eq!(e.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(e.placeholder(), "Search…");
        assert_eq!(e.view().actions, vec!["Export", "Create"]);
    }

    #[test]
    fn search_waits_for_quiet_interval() {
        let t0 = Instant::now();
        let mut e = engine(25);
        e.set_search_text_at("user 1", t0);
        assert!(!e.tick_at(t0 + Duration::from_millis(100)));
        assert_eq!(e.filtered_len(), 25);
        e.set_search_text_at("user 12", t0 + Duration::from_millis(200));
        assert!(!e.tick_at(t0 + Duration::from_millis(300)));
        assert!(e.tick_at(t0 + Duration::from_millis(450)));
        assert_eq!(e.applied_query(), "user 12");
        assert_eq!(names(&e.view()), vec!["User 12"]);
    }

    #[test]
    fn unsortable_column_is_ignored() {
        let mut e = engine(3);
        assert!(!e.toggle_sort("select"));
        assert!(!e.toggle_sort("nope"));
        assert_eq!(e.sort(), None);
    }

    #[test]
    fn header_indicators_follow_sort() {
        let mut e = engine(3);
        e.toggle_sort("name");
        let v = e.view();
        assert_eq!(v.header_titles(), vec!["Name ↑", ""]);
        e.toggle_sort("name");
        assert_eq!(e.view().headers[0].title(), "Name ↓");
        e.toggle_sort("name");
        assert_eq!(e.view().headers[0].title(), "Name");
    }

    #[test]
    fn new_snapshot_reclamps_page() {
        let mut e = engine(25);
        e.last_page();
        assert_eq!(e.page_index(), 3);
        e.set_rows(users(10));
        assert_eq!(e.page_index(), 1);
        assert_eq!(e.view().summary, "Showing 9–10 of 10");
    }

    #[test]
    fn selection_survives_search_and_paging() {
        let t0 = Instant::now();
        let mut e = engine(25);
        e.next_page();
        assert_eq!(e.toggle_selected(0), Some(true)); // User 9
        e.set_search_text_at("user 9", t0);
        e.flush_search();
        let v = e.view();
        assert_eq!(v.rows.len(), 1);
        assert!(v.rows[0].selected);
        assert_eq!(e.selected_rows().len(), 1);
        e.clear_selection();
        assert_eq!(e.selection_len(), 0);
    }

    #[test]
    fn select_page_marks_visible_rows() {
        let mut e = engine(25);
        e.select_page();
        assert_eq!(e.selection_len(), 8);
        assert!(e.is_selected(7));
        assert!(!e.is_selected(8));
    }

    #[test]
    fn new_snapshot_keeps_only_id_selections() {
        let mut e = engine(10);
        e.toggle_selected(2); // User 3
        e.set_rows(users(5));
        assert!(e.is_selected(2));

        let anonymous: Vec<Record> = (1..=3)
            .map(|i| Record::from_pairs([("name", Value::from(format!("Guest {i}")))]))
            .collect();
        e.set_rows(anonymous.clone());
        e.toggle_selected(0);
        assert_eq!(e.selection_len(), 1);
        e.set_rows(anonymous);
        assert_eq!(e.selection_len(), 0);
        assert!(!e.is_selected(0));
    }

    #[test]
    fn set_columns_drops_stale_sort() {
        let mut e = engine(3);
        e.toggle_sort("name");
        e.set_columns(vec![ColumnDef::field("Id", "id")]);
        assert_eq!(e.sort(), None);
    }
}
