use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Stylize},
    text::{Line, Span},
    widgets::{Block, Cell, Clear, Paragraph, Row, Table, Wrap},
};

use crate::context::ViewContext;
use crate::engine::TableViewData;
use crate::model::{Model, RecordData, UIData};

pub const TOOLBAR_HEIGHT: u16 = 3;
pub const FOOTER_HEIGHT: u16 = 1;
pub const CMDLINE_HEIGH: u16 = 1;
pub const COLUMN_WIDTH_MARGIN: usize = 2;
pub const SELECTION_MARK_WIDTH: u16 = 2;

pub struct TableUI<'a> {
    ctx: &'a ViewContext,
}

impl<'a> TableUI<'a> {
    pub fn new(ctx: &'a ViewContext) -> Self {
        Self { ctx }
    }

    pub fn draw(&self, model: &Model, frame: &mut Frame) {
        let ui = model.get_uidata();
        let [toolbar, body, footer, cmdline] = Layout::vertical([
            Constraint::Length(TOOLBAR_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(FOOTER_HEIGHT),
            Constraint::Length(CMDLINE_HEIGH),
        ])
        .areas(frame.area());

        self.render_toolbar(&ui, frame, toolbar);
        match &ui.record {
            Some(record) => self.render_record(record, frame, body),
            None => self.render_table(&ui, frame, body),
        }
        self.render_footer(&ui.table, frame, footer);
        self.render_cmdline(&ui, frame, cmdline);

        if ui.show_popup {
            self.render_popup(&ui.popup_message, frame);
        }
    }

    fn render_toolbar(&self, ui: &UIData, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title(Line::from(format!(" {} · {} ", self.ctx.title, ui.name)).bold())
            .border_style(self.ctx.muted());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let actions: Vec<Span> = ui
            .table
            .actions
            .iter()
            .flat_map(|a| [Span::styled(format!("[{a}]"), self.ctx.accent()), Span::raw(" ")])
            .collect();
        let actions_width = actions.iter().map(|s| s.width()).sum::<usize>() as u16;
        let [search, right] =
            Layout::horizontal([Constraint::Min(10), Constraint::Length(actions_width)])
                .areas(inner);

        let query = if ui.table.search_text.is_empty() {
            Span::styled(ui.table.placeholder.clone(), self.ctx.muted().italic())
        } else {
            Span::styled(ui.table.search_text.clone(), self.ctx.text())
        };
        frame.render_widget(Paragraph::new(Line::from(vec![Span::raw("⌕ "), query])), search);
        frame.render_widget(Paragraph::new(Line::from(actions)), right);
    }

    fn column_widths(&self, table: &TableViewData) -> Vec<Constraint> {
        let mut widths = vec![Constraint::Length(SELECTION_MARK_WIDTH)];
        for (cidx, header) in table.headers.iter().enumerate() {
            let content = table
                .rows
                .iter()
                .filter_map(|r| r.cells.get(cidx))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0);
            let width = std::cmp::max(header.title().chars().count(), content) + COLUMN_WIDTH_MARGIN;
            widths.push(Constraint::Length(width.min(self.ctx.max_column_width) as u16));
        }
        widths
    }

    fn render_table(&self, ui: &UIData, frame: &mut Frame, area: Rect) {
        let table = &ui.table;

        let header_cells = std::iter::once(Cell::from("")).chain(
            table.headers.iter().enumerate().map(|(cidx, h)| {
                let mut style = self.ctx.header();
                if cidx == ui.selected_column {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                if h.direction.is_some() {
                    style = style.patch(self.ctx.accent());
                }
                Cell::from(h.title()).style(style)
            }),
        );
        let header = Row::new(header_cells).height(1);

        let rows: Vec<Row> = if let Some(message) = table.empty_message {
            vec![Row::new(vec![
                Cell::from(""),
                Cell::from(message).style(self.ctx.muted().italic()),
            ])]
        } else {
            table
                .rows
                .iter()
                .enumerate()
                .map(|(ridx, r)| {
                    let mark = if r.selected { "● " } else { "  " };
                    let cells = std::iter::once(Cell::from(mark).style(self.ctx.selected()))
                        .chain(r.cells.iter().enumerate().map(|(cidx, c)| {
                            let cell = Cell::from(c.clone());
                            if ridx == ui.selected_row && cidx == ui.selected_column {
                                cell.add_modifier(Modifier::BOLD)
                            } else {
                                cell
                            }
                        }));
                    let mut row = Row::new(cells).style(self.ctx.text());
                    if ridx == ui.selected_row {
                        row = row.style(self.ctx.cursor());
                    }
                    row
                })
                .collect()
        };

        let widget = Table::new(rows, self.column_widths(table))
            .header(header)
            .column_spacing(1)
            .block(Block::bordered().border_style(self.ctx.muted()));
        frame.render_widget(widget, area);
    }

    fn render_record(&self, record: &RecordData, frame: &mut Frame, area: Rect) {
        let header_width = record
            .fields
            .iter()
            .map(|(h, _)| h.chars().count())
            .max()
            .unwrap_or(0) as u16;
        let rows: Vec<Row> = record
            .fields
            .iter()
            .enumerate()
            .map(|(ridx, (h, v))| {
                let row = Row::new(vec![
                    Cell::from(h.clone()).style(self.ctx.header()),
                    Cell::from(v.clone()),
                ]);
                if ridx == record.selected_row {
                    row.style(self.ctx.cursor())
                } else {
                    row.style(self.ctx.text())
                }
            })
            .collect();
        let widget = Table::new(rows, [Constraint::Length(header_width + 1), Constraint::Min(1)])
            .block(Block::bordered().title(Line::from(record.title.clone()).bold()));
        frame.render_widget(widget, area);
    }

    fn render_footer(&self, table: &TableViewData, frame: &mut Frame, area: Rect) {
        let mut left = vec![
            Span::styled(table.summary.clone(), self.ctx.muted()),
            Span::styled(
                format!("  page {}/{}", table.page_index + 1, table.page_count),
                self.ctx.muted(),
            ),
        ];
        if table.selected > 0 {
            left.push(Span::styled(format!("  {} selected", table.selected), self.ctx.accent()));
        }
        let button = |label: &'static str, enabled: bool| {
            if enabled {
                Span::styled(label, self.ctx.accent())
            } else {
                Span::styled(label, self.ctx.muted().add_modifier(Modifier::DIM))
            }
        };
        let right = Line::from(vec![
            button("[Prev]", table.can_prev),
            Span::raw(" "),
            button("[Next]", table.can_next),
        ]);

        let [l, r] = Layout::horizontal([Constraint::Min(10), Constraint::Length(14)]).areas(area);
        frame.render_widget(Paragraph::new(Line::from(left)), l);
        frame.render_widget(Paragraph::new(right.right_aligned()), r);
    }

    fn render_cmdline(&self, ui: &UIData, frame: &mut Frame, area: Rect) {
        if ui.active_cmdinput {
            let line = Line::from(vec![
                Span::styled("/", self.ctx.accent()),
                Span::raw(ui.cmdinput.input.clone()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            frame.set_cursor_position((area.x + 1 + ui.cmdinput.cursor_pos as u16, area.y));
        } else {
            frame.render_widget(
                Paragraph::new(Span::styled(ui.status_message.clone(), self.ctx.muted())),
                area,
            );
        }
    }

    fn render_popup(&self, message: &str, frame: &mut Frame) {
        let area = centered(frame.area(), 48, 28);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(message.to_string())
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(Line::from(" Help ").bold())),
            area,
        );
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
