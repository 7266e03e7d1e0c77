use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, Cell, Clear, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        Table, TableState, Tabs, Wrap,
    },
};

use crate::domain::DVConfig;
use crate::model::{Model, UIData};

pub const TABS_HEIGHT: usize = 1;
pub const VIEWLINE_HEIGHT: usize = 1;
pub const CMDLINE_HEIGH: usize = 1;
pub const TABLE_HEADER_HEIGHT: usize = 1;
pub const SCROLLBAR_WIDTH: usize = 1;
pub const COLUMN_SPACING: usize = 1;

#[derive(Debug)]
pub struct TableUI {
    status_timeout: Duration,
}

impl TableUI {
    pub fn new(config: &DVConfig) -> Self {
        Self {
            status_timeout: Duration::from_secs(config.status_message_timeout),
        }
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let uidata = model.get_uidata();

        let [tabs_area, views_area, table_area, cmd_area] = Layout::vertical([
            Constraint::Length(TABS_HEIGHT as u16),
            Constraint::Length(VIEWLINE_HEIGHT as u16),
            Constraint::Min(0),
            Constraint::Length(CMDLINE_HEIGH as u16),
        ])
        .areas(frame.area());

        self.render_tabs(uidata, frame, tabs_area);
        self.render_views(uidata, frame, views_area);
        match &uidata.load_error {
            Some(reason) => self.render_load_error(&uidata.name, reason, frame, table_area),
            None => self.render_table(uidata, frame, table_area),
        }
        self.render_cmdline(uidata, frame, cmd_area);

        if uidata.show_popup {
            self.render_popup(uidata, frame);
        }
    }

    fn render_tabs(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let tabs = Tabs::new(uidata.tabs.iter().map(|t| Line::from(t.as_str())))
            .select(uidata.selected_tab)
            .style(Style::new().fg(Color::Gray))
            .highlight_style(Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .divider("|");
        frame.render_widget(tabs, area);
    }

    fn render_views(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let mut spans: Vec<Span> = Vec::with_capacity(uidata.views.len() * 2 + 2);
        for (idx, title) in uidata.views.iter().enumerate() {
            if idx == uidata.selected_view {
                spans.push(Span::styled(format!(" {title} "), Style::new().reversed().bold()));
            } else {
                spans.push(Span::raw(format!(" {title} ")));
            }
        }
        if !uidata.filters.is_empty() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(uidata.filters.clone(), Style::new().fg(Color::Cyan)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_load_error(&self, name: &str, reason: &str, frame: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(format!("{name} could not be loaded")).bold(),
            Line::from(reason.to_string()).fg(Color::Red),
        ];
        let [centered] = Layout::vertical([Constraint::Length(2)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(
            Paragraph::new(text).centered().wrap(Wrap { trim: true }),
            centered,
        );
    }

    fn render_table(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let [table_area, scrollbar_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(SCROLLBAR_WIDTH as u16),
        ])
        .areas(area);

        let widths: Vec<Constraint> = uidata
            .table
            .iter()
            .map(|c| Constraint::Length(c.width as u16))
            .collect();
        let header = Row::new(uidata.table.iter().map(|c| Cell::from(c.name.as_str())))
            .style(Style::new().bold().underlined());
        let nrows = uidata.table.first().map(|c| c.data.len()).unwrap_or(0);
        let rows = (0..nrows).map(|ridx| {
            Row::new(
                uidata
                    .table
                    .iter()
                    .map(|c| Cell::from(c.data.get(ridx).map(String::as_str).unwrap_or(""))),
            )
        });

        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(COLUMN_SPACING as u16)
            .flex(Flex::Start)
            .row_highlight_style(Style::new().bg(Color::DarkGray))
            .cell_highlight_style(Style::new().reversed());

        let mut state = TableState::default()
            .with_selected(Some(uidata.selected_row))
            .with_selected_column(Some(uidata.selected_column));
        frame.render_stateful_widget(table, table_area, &mut state);

        let mut scrollbar_state = ScrollbarState::new(uidata.nrows).position(uidata.abs_selected_row);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }

    fn render_cmdline(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        if uidata.active_cmdinput {
            let input = &uidata.cmdinput;
            let line = Line::from(vec![
                Span::styled(input.prompt.clone(), Style::new().fg(Color::Yellow)),
                Span::raw(input.input.clone()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            let x = area.x + (input.prompt.chars().count() + input.curser_pos) as u16;
            frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(1)), area.y));
            return;
        }

        let position = if uidata.nrows == 0 {
            format!("0/{}", uidata.total_rows)
        } else {
            format!(
                "{}/{} ({})",
                uidata.abs_selected_row + 1,
                uidata.nrows,
                uidata.total_rows
            )
        };
        let right = format!("{}  sort: {} ", position, uidata.sort);
        let [left_area, right_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(right.chars().count() as u16),
        ])
        .areas(area);

        let message = if uidata.last_status_message_update.elapsed() < self.status_timeout {
            uidata.status_message.as_str()
        } else {
            ""
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" {} ", uidata.name), Style::new().bold()),
                Span::raw(message),
            ])),
            left_area,
        );
        frame.render_widget(
            Paragraph::new(Line::from(right).right_aligned().fg(Color::Gray)),
            right_area,
        );
    }

    fn render_popup(&self, uidata: &UIData, frame: &mut Frame) {
        let area = popup_area(frame.area(), 60, 80);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(uidata.popup_message.as_str())
                .block(Block::bordered().title(" Help ").title_bottom(" Esc to close ")),
            area,
        );
    }
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}
