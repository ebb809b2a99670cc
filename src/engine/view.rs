use super::row::RowKey;
use super::sort::SortDirection;

pub const EMPTY_MESSAGE: &str = "No matching results";

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub id: String,
    pub label: String,
    pub sortable: bool,
    pub direction: Option<SortDirection>,
}

impl HeaderView {
    pub fn indicator(&self) -> &'static str {
        self.direction.map(|d| d.glyph()).unwrap_or("")
    }

    /// Label with the sort glyph appended.
    pub fn title(&self) -> String {
        format!("{}{}", self.label, self.indicator())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub source_index: usize, // Index into the row snapshot
    pub key: RowKey,
    pub cells: Vec<String>,
    pub selected: bool,
}

/// Everything a rendering surface needs to draw the current page.
#[derive(Debug, Clone, PartialEq)]
pub struct TableViewData {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub placeholder: String,
    pub search_text: String,
    pub actions: Vec<String>,
    pub total: usize,    // Rows in the snapshot
    pub filtered: usize, // Rows matching the search
    pub shown: usize,    // Rows on this page
    pub selected: usize,
    pub page_index: usize,
    pub page_count: usize,
    pub can_prev: bool,
    pub can_next: bool,
    pub summary: String,
    pub empty_message: Option<&'static str>,
}

impl TableViewData {
    pub fn header_titles(&self) -> Vec<String> {
        self.headers.iter().map(|h| h.title()).collect()
    }

    /// Cell text of column `column` for every visible row.
    pub fn column_cells(&self, column: usize) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| r.cells.get(column).map(String::as_str).unwrap_or(""))
            .collect()
    }
}
