use arboard::Clipboard;
use ratatui::crossterm::event::KeyEvent;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, trace, warn};

use crate::dataset::{Catalog, Row, ViewData};
use crate::domain::{CMDMode, DVConfig, DVError, HELP_TEXT, Message};
use crate::export;
use crate::filter;
use crate::inputter::{InputResult, Inputter};
use crate::ui::{
    CMDLINE_HEIGH, COLUMN_SPACING, SCROLLBAR_WIDTH, TABLE_HEADER_HEIGHT, TABS_HEIGHT,
    VIEWLINE_HEIGHT,
};
use crate::view::{FilterValue, Tab, ViewDef, ViewState};
use crate::column::FilterKind;

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    RECORD,
    POPUP,
    CMDINPUT,
}

#[derive(Clone, Debug, Default)]
pub struct ColumnView {
    pub name: String,
    pub width: usize,
    pub data: Vec<String>,
}

struct TableView {
    rows: Arc<Vec<usize>>, // Mapping of view row index to dataset row index
    widths: Vec<usize>,    // Render width of every column of the view
    visible_columns: Vec<usize>,
    curser_row: usize,
    curser_column: usize,
    offset_row: usize,
    offset_column: usize,
    data: Vec<ColumnView>,
    heigh: usize,
    width: usize,
}

impl TableView {
    fn empty() -> Self {
        TableView {
            rows: Arc::new(Vec::new()),
            widths: Vec::new(),
            visible_columns: Vec::new(),
            curser_row: 0,
            curser_column: 0,
            offset_row: 0,
            offset_column: 0,
            data: Vec::new(),
            heigh: 0,
            width: 0,
        }
    }

    fn selected_row(&self) -> usize {
        self.offset_row + self.curser_row
    }

    fn selected_column(&self) -> usize {
        self.offset_column + self.curser_column
    }
}

struct RecordView {
    header_data: Vec<String>,
    header_width: usize,
    header_view: ColumnView,
    row_data: Vec<String>,
    row_view: ColumnView,
    record_idx: usize, // Index into TableView.rows
    curser_row: usize,
    curser_offset: usize,
    height: usize,
}

impl RecordView {
    fn empty() -> Self {
        RecordView {
            header_data: Vec::new(),
            header_width: 0,
            header_view: ColumnView::default(),
            row_data: Vec::new(),
            row_view: ColumnView::default(),
            record_idx: 0,
            curser_row: 0,
            curser_offset: 0,
            height: 0,
        }
    }
}

pub struct UIData {
    pub tabs: Vec<String>,
    pub selected_tab: usize,
    pub views: Vec<String>, // Titles of the views in the selected tab
    pub selected_view: usize,
    pub name: String,
    pub filters: String,
    pub sort: String,
    pub table: Vec<ColumnView>,
    pub nrows: usize, // Rows after filtering
    pub total_rows: usize,
    pub selected_row: usize,
    pub selected_column: usize,
    pub abs_selected_row: usize,
    pub load_error: Option<String>,
    pub show_popup: bool,
    pub popup_message: String,
    pub layout: UILayout,
    pub cmdinput: InputResult,
    pub active_cmdinput: bool,
    pub status_message: String,
    pub last_status_message_update: Instant,
    pub last_update: Instant,
}

impl UIData {
    pub fn empty() -> Self {
        UIData {
            tabs: Vec::new(),
            selected_tab: 0,
            views: Vec::new(),
            selected_view: 0,
            name: String::new(),
            filters: String::new(),
            sort: String::new(),
            table: Vec::new(),
            nrows: 0,
            total_rows: 0,
            selected_row: 0,
            selected_column: 0,
            abs_selected_row: 0,
            load_error: None,
            show_popup: false,
            popup_message: String::new(),
            layout: UILayout::default(),
            cmdinput: InputResult::default(),
            active_cmdinput: false,
            status_message: String::new(),
            last_status_message_update: Instant::now(),
            last_update: Instant::now(),
        }
    }
}

#[derive(Default, Clone, Debug)]
pub struct UILayout {
    pub width: usize,
    pub height: usize,
    pub table_width: usize,
    pub table_height: usize,
    pub statusline_width: usize,
    pub statusline_height: usize,
}

impl UILayout {
    pub fn from_values(ui_width: usize, ui_height: usize) -> Self {
        let chrome = TABS_HEIGHT + VIEWLINE_HEIGHT + CMDLINE_HEIGH + TABLE_HEADER_HEIGHT;
        let layout = UILayout {
            width: ui_width,
            height: ui_height,
            table_width: ui_width.saturating_sub(SCROLLBAR_WIDTH),
            table_height: ui_height.saturating_sub(chrome),
            statusline_width: ui_width,
            statusline_height: CMDLINE_HEIGH,
        };
        trace!("Build UILayout: {:?}", layout);
        layout
    }
}

/// Moves a windowed cursor to `target`, scrolling the window as little as
/// possible.
fn scroll_to(target: usize, offset: &mut usize, curser: &mut usize, height: usize) {
    let height = height.max(1);
    if target < *offset {
        *offset = target;
    } else if target >= *offset + height {
        *offset = target + 1 - height;
    }
    *curser = target - *offset;
}

pub struct Model {
    config: DVConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    views: Vec<ViewDef>,
    catalog: Catalog,
    current_view: usize,
    state: ViewState,
    table: TableView,
    record_view: RecordView,
    uilayout: UILayout,
    uidata: UIData,
    clipboard: Option<Clipboard>,
    input: Inputter,
    cmd_mode: Option<CMDMode>,
    last_input: InputResult,
    active_cmdinput: bool,
    status_message: String,
    last_status_message_update: Instant,
}

impl Model {
    pub fn init(
        config: &DVConfig,
        views: Vec<ViewDef>,
        catalog: Catalog,
        ui_width: usize,
        ui_height: usize,
    ) -> Result<Self, DVError> {
        let Some(first) = views.first() else {
            return Err(DVError::InvalidArgument("no views to show".into()));
        };
        let state = ViewState::for_view(first);
        let mut model = Self {
            config: config.clone(),
            status: Status::READY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            views,
            catalog,
            current_view: 0,
            state,
            table: TableView::empty(),
            record_view: RecordView::empty(),
            uilayout: UILayout::from_values(ui_width, ui_height),
            uidata: UIData::empty(),
            // Created on first use, a missing display must not stop the viewer.
            clipboard: None,
            input: Inputter::default(),
            cmd_mode: None,
            last_input: InputResult::default(),
            active_cmdinput: false,
            status_message: String::new(),
            last_status_message_update: Instant::now(),
        };
        model.select_view(0);
        Ok(model)
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    pub fn raw_keyevents(&self) -> bool {
        self.active_cmdinput
    }

    pub fn current_view(&self) -> &ViewDef {
        &self.views[self.current_view]
    }

    pub fn view_state(&self) -> &ViewState {
        &self.state
    }

    /// Rows of the current view after filtering and sorting.
    pub fn visible_rows(&self) -> Vec<Row> {
        let rows = Self::rows_of(&self.catalog, &self.views[self.current_view].id);
        self.table.rows.iter().map(|&idx| rows[idx].clone()).collect()
    }

    pub fn select_view_by_id(&mut self, view_id: &str) -> Result<(), DVError> {
        let idx = self
            .views
            .iter()
            .position(|v| v.id == view_id)
            .ok_or_else(|| DVError::UnknownView(view_id.to_string()))?;
        self.select_view(idx);
        Ok(())
    }

    /// Replaces the filter and sort state of the current view.
    pub fn set_view_state(&mut self, state: ViewState) {
        self.state = state;
        self.apply_view_state();
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    fn rows_of<'a>(catalog: &'a Catalog, view_id: &str) -> &'a [Row] {
        match catalog.get(view_id).and_then(ViewData::dataset) {
            Some(dataset) => &dataset.rows,
            None => &[],
        }
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.last_status_message_update = Instant::now();
        self.uidata.status_message = self.status_message.clone();
        self.uidata.last_status_message_update = self.last_status_message_update;
        self.uidata.last_update = Instant::now();
    }

    // -------------------- View selection ---------------------------------- //

    fn select_view(&mut self, idx: usize) {
        self.current_view = idx;
        self.modus = Modus::TABLE;
        self.previous_modus = Modus::TABLE;

        let view = &self.views[idx];
        // View state does not survive switching views.
        self.state = ViewState::for_view(view);
        self.table = TableView::empty();

        let rows = Self::rows_of(&self.catalog, &view.id);
        self.table.widths = view
            .columns
            .iter()
            .map(|column| {
                let content = rows
                    .iter()
                    .map(|r| r.display(&column.field).chars().count())
                    .max()
                    .unwrap_or(0);
                // Room for the sort arrow next to the label.
                let label = column.label.chars().count() + 2;
                std::cmp::min(std::cmp::max(label, content), self.config.max_column_width)
            })
            .collect();

        let message = match self.catalog.get(&view.id) {
            Some(ViewData::Ready(dataset)) => format!("{}: {} rows", view.title, dataset.len()),
            Some(ViewData::Failed(_)) | None => format!("{}: failed to load", view.title),
        };
        info!("Selected view {}", view.id);
        self.apply_view_state();
        self.set_status_message(message);
    }

    fn views_in_tab(&self, tab: Tab) -> Vec<usize> {
        self.views
            .iter()
            .enumerate()
            .filter(|(_, v)| v.tab == tab)
            .map(|(idx, _)| idx)
            .collect()
    }

    fn current_tab_idx(&self) -> usize {
        let tab = self.views[self.current_view].tab;
        Tab::ALL.iter().position(|&t| t == tab).unwrap_or(0)
    }

    fn switch_tab(&mut self, step: isize) {
        let ntabs = Tab::ALL.len() as isize;
        let mut tab_idx = self.current_tab_idx() as isize;
        // Skip tabs without views.
        for _ in 0..ntabs {
            tab_idx = (tab_idx + step).rem_euclid(ntabs);
            if let Some(&first) = self.views_in_tab(Tab::ALL[tab_idx as usize]).first() {
                self.select_view(first);
                return;
            }
        }
    }

    fn switch_view(&mut self, step: isize) {
        let in_tab = self.views_in_tab(self.views[self.current_view].tab);
        let Some(pos) = in_tab.iter().position(|&idx| idx == self.current_view) else {
            return;
        };
        let next = (pos as isize + step).rem_euclid(in_tab.len() as isize) as usize;
        if in_tab[next] != self.current_view {
            self.select_view(in_tab[next]);
        }
    }

    // -------------------- Filtering and sorting ---------------------------- //

    fn apply_view_state(&mut self) {
        let start_time = Instant::now();
        let view = &self.views[self.current_view];
        let rows = Self::rows_of(&self.catalog, &view.id);
        self.table.rows = Arc::new(view.apply_mask(rows, &self.state));
        debug!(
            "{}: {}/{} rows after filtering in {}ms",
            view.id,
            self.table.rows.len(),
            rows.len(),
            start_time.elapsed().as_millis()
        );

        let nrows = self.table.rows.len();
        if nrows == 0 {
            self.table.offset_row = 0;
            self.table.curser_row = 0;
        } else {
            let target = std::cmp::min(self.table.selected_row(), nrows - 1);
            self.select_row(target);
        }
        self.update_table_data();
    }

    fn current_column_field(&self) -> Option<String> {
        self.views[self.current_view]
            .columns
            .get(self.table.selected_column())
            .map(|c| c.field.clone())
    }

    fn sort_current_column(&mut self) {
        let view = &self.views[self.current_view];
        let Some(column) = view.columns.get(self.table.selected_column()) else {
            return;
        };
        if !column.sortable {
            let message = format!("Column {} is not sortable", column.label);
            self.set_status_message(message);
            return;
        }
        let label = column.label.clone();
        self.state = self.state.toggle_sort(&column.field);
        let direction = self.state.sort.direction;
        self.apply_view_state();
        self.set_status_message(format!("Sorted by {label} {direction}"));
    }

    fn filter_current_column(&mut self, input: &str) {
        let Some(field) = self.current_column_field() else {
            return;
        };
        let view = &self.views[self.current_view];
        let Some(value) = view.parse_filter(&field, input) else {
            return;
        };
        let is_choice = matches!(value, FilterValue::Choice(_));
        self.state = self.state.with_filter(&field, value);
        self.apply_view_state();

        let nrows = self.table.rows.len();
        let total = Self::rows_of(&self.catalog, &self.views[self.current_view].id).len();
        if nrows == 0 && is_choice {
            let rows = Self::rows_of(&self.catalog, &self.views[self.current_view].id);
            let options = filter::distinct_values(rows, &field).join(", ");
            self.set_status_message(format!("No rows match, options: {options}"));
        } else {
            self.set_status_message(format!("{nrows} of {total} rows"));
        }
    }

    fn search(&mut self, text: &str) {
        if self.views[self.current_view].search.is_empty() {
            self.set_status_message("This view has no search fields");
            return;
        }
        self.state = self.state.with_search(text);
        self.apply_view_state();
        let nrows = self.table.rows.len();
        self.set_status_message(format!("Found {nrows} rows"));
    }

    fn cycle_mode(&mut self) {
        let view = &self.views[self.current_view];
        let Some(mode) = view.modes.first() else {
            self.set_status_message("No mode filter for this view");
            return;
        };
        let current = match self.state.filter(&mode.name) {
            Some(FilterValue::Mode(option)) => Some(option.as_str()),
            _ => mode.default_option(),
        };
        let Some(next) = current.and_then(|c| mode.next_option(c)) else {
            return;
        };
        let name = mode.name.clone();
        let next = next.to_string();
        self.state = if mode.default_option() == Some(next.as_str()) {
            self.state.without_filter(&name)
        } else {
            self.state.with_filter(&name, FilterValue::Mode(next.clone()))
        };
        self.apply_view_state();
        let nrows = self.table.rows.len();
        self.set_status_message(format!("{name}: {next} ({nrows} rows)"));
    }

    fn clear_filters(&mut self) {
        self.state = self.state.cleared();
        self.apply_view_state();
        self.set_status_message("Filters cleared");
    }

    fn export(&mut self) {
        let loaded = matches!(
            self.catalog.get(&self.views[self.current_view].id),
            Some(ViewData::Ready(_))
        );
        if !loaded {
            self.set_status_message("Nothing to export, the view failed to load");
            return;
        }
        let rows = self.visible_rows();
        let view = &self.views[self.current_view];
        match export::export_csv(&rows, &view.columns, &self.config.export_dir, &view.id) {
            Ok(path) => {
                let message = format!("Exported {} rows to {}", rows.len(), path.display());
                self.set_status_message(message);
            }
            Err(e) => {
                error!("Export of {} failed: {e}", view.id);
                self.set_status_message(e.to_string());
            }
        }
    }

    // -------------------- Clipboard --------------------------------------- //

    fn set_clipboard(&mut self, content: String) {
        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    let err = DVError::Clipboard(e.to_string());
                    warn!("{err}");
                    self.set_status_message(err.to_string());
                    return;
                }
            }
        }
        if let Some(clipboard) = self.clipboard.as_mut() {
            match clipboard.set_text(content) {
                Ok(_) => {
                    trace!("Copied content to clipboard.");
                    self.set_status_message("Copied to clipboard");
                }
                Err(e) => {
                    let err = DVError::Clipboard(e.to_string());
                    trace!("Error copying to clipboard: {err}");
                    self.set_status_message(err.to_string());
                }
            }
        }
    }

    fn table_cell_text(&self) -> Option<String> {
        let view = &self.views[self.current_view];
        let rows = Self::rows_of(&self.catalog, &view.id);
        let row = self.table.rows.get(self.table.selected_row())?;
        let column = view.columns.get(self.table.selected_column())?;
        Some(rows[*row].display(&column.field))
    }

    fn row_text(&self, row_idx: usize) -> Option<Result<String, DVError>> {
        let view = &self.views[self.current_view];
        let rows = Self::rows_of(&self.catalog, &view.id);
        let row = self.table.rows.get(row_idx)?;
        Some(export::render_csv_row(&rows[*row], &view.columns))
    }

    fn copy_cell(&mut self) {
        let cell = match self.modus {
            Modus::RECORD => {
                let record = &self.record_view;
                record
                    .row_data
                    .get(record.curser_offset + record.curser_row)
                    .cloned()
            }
            _ => self.table_cell_text(),
        };
        if let Some(cell) = cell {
            trace!("Cell content: {}", cell);
            self.set_clipboard(cell);
        }
    }

    fn copy_row(&mut self) {
        let row_idx = match self.modus {
            Modus::RECORD => self.record_view.record_idx,
            _ => self.table.selected_row(),
        };
        match self.row_text(row_idx) {
            Some(Ok(line)) => self.set_clipboard(line),
            Some(Err(e)) => self.set_status_message(e.to_string()),
            None => {}
        }
    }

    // -------------------- Table data -------------------------------------- //

    fn get_visible_name(name: &str, width: usize) -> String {
        if width < 3 {
            return String::new();
        }
        if name.chars().count() > width {
            let mut reduced: String = name.chars().take(width - 3).collect();
            reduced.push_str("...");
            reduced
        } else {
            name.to_string()
        }
    }

    fn update_table_data(&mut self) {
        let view = &self.views[self.current_view];
        let rows = Self::rows_of(&self.catalog, &view.id);
        let table = &mut self.table;

        table.width = self.uilayout.table_width;
        table.heigh = self.uilayout.table_height;

        let rbegin = std::cmp::min(table.offset_row, table.rows.len());
        let rend = std::cmp::min(rbegin + table.heigh, table.rows.len());

        trace!(
            "Table: Cr {}, Cc {}, Or {}, Oc {}, Rb {}, Re {}, tw: {}, th:{}",
            table.curser_row,
            table.curser_column,
            table.offset_row,
            table.offset_column,
            rbegin,
            rend,
            table.width,
            table.heigh,
        );

        // Columns that fit, the last one possibly cut short.
        table.visible_columns.clear();
        let mut render_widths = Vec::new();
        let mut visible_width = 0;
        for cidx in table.offset_column..view.columns.len() {
            let width = table.widths.get(cidx).copied().unwrap_or(0);
            if visible_width + width + COLUMN_SPACING <= table.width {
                table.visible_columns.push(cidx);
                render_widths.push(width);
                visible_width += width + COLUMN_SPACING;
            } else {
                if visible_width < table.width {
                    table.visible_columns.push(cidx);
                    render_widths.push(table.width - visible_width);
                }
                break;
            }
        }
        table.curser_column = std::cmp::min(
            table.curser_column,
            table.visible_columns.len().saturating_sub(1),
        );

        table.data = table
            .visible_columns
            .iter()
            .zip(render_widths)
            .map(|(&cidx, width)| {
                let column = &view.columns[cidx];
                let mut name = column.label.clone();
                if self.state.sort.field == column.field {
                    name.push(' ');
                    name.push_str(self.state.sort.direction.arrow());
                }
                let data = table.rows[rbegin..rend]
                    .iter()
                    .map(|&ridx| rows[ridx].display(&column.field).replace('\n', " ↵ "))
                    .collect();
                ColumnView {
                    name: Self::get_visible_name(&name, width),
                    width,
                    data,
                }
            })
            .collect();

        self.update_uidata_for_table();
    }

    fn base_uidata(&self) -> UIData {
        let view = &self.views[self.current_view];
        let in_tab = self.views_in_tab(view.tab);
        let load_error = match self.catalog.get(&view.id) {
            Some(ViewData::Failed(reason)) => Some(reason.clone()),
            Some(ViewData::Ready(_)) => None,
            None => Some(format!("no data loaded for {}", view.id)),
        };
        UIData {
            tabs: Tab::ALL.iter().map(|t| t.title().to_string()).collect(),
            selected_tab: self.current_tab_idx(),
            views: in_tab.iter().map(|&idx| self.views[idx].title.clone()).collect(),
            selected_view: in_tab
                .iter()
                .position(|&idx| idx == self.current_view)
                .unwrap_or(0),
            name: view.title.clone(),
            filters: self.state.describe(),
            sort: format!("{} {}", self.state.sort.field, self.state.sort.direction),
            table: Vec::new(),
            nrows: self.table.rows.len(),
            total_rows: Self::rows_of(&self.catalog, &view.id).len(),
            selected_row: 0,
            selected_column: 0,
            abs_selected_row: 0,
            load_error,
            show_popup: self.uidata.show_popup,
            popup_message: self.uidata.popup_message.clone(),
            layout: self.uilayout.clone(),
            cmdinput: self.last_input.clone(),
            active_cmdinput: self.active_cmdinput,
            status_message: self.status_message.clone(),
            last_status_message_update: self.last_status_message_update,
            last_update: Instant::now(),
        }
    }

    fn update_uidata_for_table(&mut self) {
        let mut uidata = self.base_uidata();
        uidata.table = self.table.data.clone();
        uidata.selected_row = self.table.curser_row;
        uidata.selected_column = self.table.curser_column;
        uidata.abs_selected_row = self.table.selected_row();
        self.uidata = uidata;
    }

    // -------------------- Record view ------------------------------------- //

    fn build_record_view(&mut self, record_idx: usize) {
        trace!("Building record view ...");
        let view = &self.views[self.current_view];
        let record = &mut self.record_view;
        record.header_data = view
            .columns
            .iter()
            .map(|c| c.label.chars().take(self.config.max_column_width).collect())
            .collect();
        record.header_width = record
            .header_data
            .iter()
            .map(|h| h.chars().count())
            .max()
            .unwrap_or(0);
        record.curser_offset = 0;
        record.curser_row = 0;
        record.record_idx = record_idx;

        self.update_record_data();
    }

    fn update_record_data(&mut self) {
        let view = &self.views[self.current_view];
        let rows = Self::rows_of(&self.catalog, &view.id);
        let record = &mut self.record_view;
        record.height = std::cmp::max(self.uilayout.table_height, 1);

        record.row_data = match self.table.rows.get(record.record_idx) {
            Some(&ridx) => view
                .columns
                .iter()
                .map(|c| rows[ridx].display(&c.field))
                .collect(),
            None => Vec::new(),
        };

        let rbegin = std::cmp::min(record.curser_offset, record.row_data.len());
        let rend = std::cmp::min(rbegin + record.height, record.row_data.len());
        record.header_view = ColumnView {
            name: "Field".to_string(),
            data: record.header_data[rbegin..rend].to_vec(),
            width: record.header_width,
        };
        record.row_view = ColumnView {
            name: "Value".to_string(),
            data: record.row_data[rbegin..rend].to_vec(),
            width: self
                .uilayout
                .table_width
                .saturating_sub(record.header_width + COLUMN_SPACING),
        };

        self.update_uidata_for_record();
    }

    fn update_uidata_for_record(&mut self) {
        let mut uidata = self.base_uidata();
        let record = &self.record_view;
        uidata.name = format!(
            "{} [record {}/{}]",
            uidata.name,
            record.record_idx + 1,
            self.table.rows.len()
        );
        uidata.table = vec![record.header_view.clone(), record.row_view.clone()];
        uidata.selected_row = record.curser_row;
        uidata.selected_column = 1;
        uidata.abs_selected_row = record.record_idx;
        self.uidata = uidata;
    }

    // -------------------- Message handling -------------------------------- //

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            self.uilayout.width, width, self.uilayout.height, height
        );
        self.uilayout = UILayout::from_values(width, height);
        if !self.table.rows.is_empty() {
            self.select_row(self.table.selected_row());
        }
        match self.modus {
            Modus::RECORD => self.update_record_data(),
            _ => self.update_table_data(),
        }
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), DVError> {
        if let Some(msg) = message {
            trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);
            match self.modus {
                Modus::TABLE => match msg {
                    Message::Quit => self.quit(),
                    Message::MoveDown => self.move_table_selection_down(1),
                    Message::MoveUp => self.move_table_selection_up(1),
                    Message::MoveLeft => self.move_table_selection_left(),
                    Message::MoveRight => self.move_table_selection_right(),
                    Message::MovePageUp => {
                        self.move_table_selection_up(self.uilayout.table_height.max(1))
                    }
                    Message::MovePageDown => {
                        self.move_table_selection_down(self.uilayout.table_height.max(1))
                    }
                    Message::MoveBeginning => self.move_table_selection_beginning(),
                    Message::MoveEnd => self.move_table_selection_end(),
                    Message::NextTab => self.switch_tab(1),
                    Message::PreviousTab => self.switch_tab(-1),
                    Message::NextView => self.switch_view(1),
                    Message::PreviousView => self.switch_view(-1),
                    Message::Sort => self.sort_current_column(),
                    Message::Filter => self.enter_cmd_mode(CMDMode::FilterColumn),
                    Message::Search => self.enter_cmd_mode(CMDMode::Search),
                    Message::CycleMode => self.cycle_mode(),
                    Message::ClearFilters => self.clear_filters(),
                    Message::Export => self.export(),
                    Message::CopyCell => self.copy_cell(),
                    Message::CopyRow => self.copy_row(),
                    Message::Enter => self.enter(),
                    Message::Exit => self.exit(),
                    Message::Help => self.show_help(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    Message::RawKey(_) => (),
                },
                Modus::RECORD => match msg {
                    Message::Quit => self.quit(),
                    Message::MoveDown => self.move_record_selection_down(1),
                    Message::MoveUp => self.move_record_selection_up(1),
                    Message::MoveLeft => self.previous_record(),
                    Message::MoveRight => self.next_record(),
                    Message::MovePageUp => self.move_record_selection_up(10),
                    Message::MovePageDown => self.move_record_selection_down(10),
                    Message::CopyCell => self.copy_cell(),
                    Message::CopyRow => self.copy_row(),
                    Message::Help => self.show_help(),
                    Message::Exit => self.exit(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    _ => (),
                },
                Modus::POPUP => match msg {
                    Message::Quit => self.quit(),
                    Message::Exit | Message::Help | Message::Enter => self.exit(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    _ => (),
                },
                Modus::CMDINPUT => match msg {
                    Message::RawKey(key) => self.raw_input(key),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    _ => (),
                },
            }
        }
        Ok(())
    }

    fn enter(&mut self) {
        if let Modus::TABLE = self.modus {
            if self.table.rows.is_empty() {
                self.set_status_message("No rows to show");
                return;
            }
            let record_idx = self.table.selected_row();
            self.previous_modus = Modus::TABLE;
            self.modus = Modus::RECORD;
            self.build_record_view(record_idx);
        }
    }

    fn exit(&mut self) {
        match self.modus {
            Modus::TABLE => {}
            Modus::RECORD => {
                // Back to the table, on the record that was shown last
                self.previous_modus = Modus::RECORD;
                self.modus = Modus::TABLE;
                self.select_row(self.record_view.record_idx);
                self.update_table_data();
            }
            Modus::POPUP => {
                trace!("Close popup ...");
                self.modus = self.previous_modus;
                self.previous_modus = Modus::POPUP;
                self.uidata.show_popup = false;
                self.uidata.last_update = Instant::now();
            }
            Modus::CMDINPUT => {}
        }
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
        self.uidata.popup_message = HELP_TEXT.to_string();
        self.uidata.show_popup = true;
        self.uidata.last_update = Instant::now();
    }

    fn raw_input(&mut self, key: KeyEvent) {
        if self.active_cmdinput {
            self.last_input = self.input.read(key);
            if self.last_input.finished {
                self.handle_cmd_input();
            }
            self.uidata.cmdinput = self.last_input.clone();
            self.uidata.active_cmdinput = self.active_cmdinput;
            self.uidata.last_update = Instant::now();
        }
    }

    /// Current filter of the selected column as the user would type it.
    fn current_filter_text(&self) -> String {
        let Some(field) = self.current_column_field() else {
            return String::new();
        };
        match self.state.filter(&field) {
            Some(FilterValue::Text(t)) | Some(FilterValue::Choice(t)) => t.clone(),
            Some(FilterValue::Range { from, to }) => format!("{from}..{to}"),
            Some(FilterValue::Mode(_)) | None => String::new(),
        }
    }

    fn enter_cmd_mode(&mut self, mode: CMDMode) {
        if mode == CMDMode::FilterColumn {
            let view = &self.views[self.current_view];
            let Some(column) = view.columns.get(self.table.selected_column()) else {
                return;
            };
            let hint = match column.default_filter() {
                FilterKind::Substring => "contains",
                FilterKind::Exact => "equals",
                FilterKind::Range => "range from..to",
            };
            let message = format!("Filter {} ({hint})", column.label);
            self.set_status_message(message);
        }
        trace!("Entering command mode ...");
        let initial = match mode {
            CMDMode::FilterColumn => self.current_filter_text(),
            CMDMode::Search => self.state.search.clone().unwrap_or_default(),
        };
        self.previous_modus = self.modus;
        self.modus = Modus::CMDINPUT;
        self.cmd_mode = Some(mode);
        self.active_cmdinput = true;
        self.last_input = self.input.start(mode, &initial);

        self.uidata.cmdinput = self.last_input.clone();
        self.uidata.active_cmdinput = self.active_cmdinput;
        self.uidata.last_update = Instant::now();
    }

    fn handle_cmd_input(&mut self) {
        trace!("Handle cmd input {}", self.last_input.input);

        self.active_cmdinput = false;
        self.modus = self.previous_modus;
        self.previous_modus = Modus::CMDINPUT;

        let cmd_input = self.last_input.input.clone();
        let mode = self.cmd_mode.take();
        if self.last_input.canceled {
            self.update_table_data();
            self.set_status_message("Canceled");
            return;
        }
        match mode {
            Some(CMDMode::FilterColumn) => self.filter_current_column(&cmd_input),
            Some(CMDMode::Search) => self.search(&cmd_input),
            None => info!("Cmd mode is none!"),
        }
    }

    // -------------------- Cursor movement --------------------------------- //

    fn select_row(&mut self, row: usize) {
        let table = &mut self.table;
        scroll_to(
            row,
            &mut table.offset_row,
            &mut table.curser_row,
            self.uilayout.table_height,
        );
    }

    fn move_table_selection_beginning(&mut self) {
        self.select_row(0);
        self.update_table_data();
    }

    fn move_table_selection_end(&mut self) {
        if let Some(last) = self.table.rows.len().checked_sub(1) {
            self.select_row(last);
            self.update_table_data();
        }
    }

    fn move_table_selection_up(&mut self, size: usize) {
        let target = self.table.selected_row().saturating_sub(size);
        self.select_row(target);
        self.update_table_data();
    }

    fn move_table_selection_down(&mut self, size: usize) {
        if let Some(last) = self.table.rows.len().checked_sub(1) {
            let target = std::cmp::min(self.table.selected_row() + size, last);
            self.select_row(target);
            self.update_table_data();
        }
    }

    fn move_table_selection_left(&mut self) {
        let table = &mut self.table;
        if table.curser_column > 0 {
            table.curser_column -= 1;
        } else if table.offset_column > 0 {
            table.offset_column -= 1;
        }
        self.update_table_data();
    }

    fn move_table_selection_right(&mut self) {
        let ncolumns = self.views[self.current_view].columns.len();
        let table = &mut self.table;
        if table.selected_column() + 1 < ncolumns {
            if table.curser_column + 1 < table.visible_columns.len() {
                table.curser_column += 1;
            } else {
                // At the right edge, shift the columns
                table.offset_column += 1;
            }
            self.update_table_data();
        }
    }

    fn move_record_selection_up(&mut self, size: usize) {
        let record = &mut self.record_view;
        let target = (record.curser_offset + record.curser_row).saturating_sub(size);
        scroll_to(target, &mut record.curser_offset, &mut record.curser_row, record.height);
        self.update_record_data();
    }

    fn move_record_selection_down(&mut self, size: usize) {
        let record = &mut self.record_view;
        if let Some(last) = record.row_data.len().checked_sub(1) {
            let target = std::cmp::min(record.curser_offset + record.curser_row + size, last);
            scroll_to(target, &mut record.curser_offset, &mut record.curser_row, record.height);
            self.update_record_data();
        }
    }

    fn previous_record(&mut self) {
        let record = &mut self.record_view;
        record.record_idx = record.record_idx.saturating_sub(1);
        self.update_record_data();
    }

    fn next_record(&mut self) {
        let record = &mut self.record_view;
        if record.record_idx + 1 < self.table.rows.len() {
            record.record_idx += 1;
        }
        self.update_record_data();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDef;
    use crate::dataset::Dataset;
    use crate::filter::{Comparison, FieldPredicate};
    use crate::sort::Direction;
    use crate::view::ModeFilter;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};
    use serde_json::json;

    fn payables() -> ViewDef {
        ViewDef::new("account-payables", "Account Payables", Tab::Finance, "finance.json", "/p")
            .columns(vec![
                ColumnDef::text("vendor", "Vendor").filter(FilterKind::Substring),
                ColumnDef::enumeration("status", "Status").filter(FilterKind::Exact),
                ColumnDef::integer("aging", "Aging"),
                ColumnDef::date("dueDate", "Due Date").filter(FilterKind::Range),
            ])
            .sorted_by("dueDate", Direction::Ascending)
            .search(&["vendor"])
            .mode(
                ModeFilter::new("late payments")
                    .option("all", vec![])
                    .option("overdue", vec![FieldPredicate::exact("status", "Overdue")])
                    .option("late", vec![FieldPredicate::threshold("aging", Comparison::Ge, 30.0)]),
            )
    }

    fn receivables() -> ViewDef {
        ViewDef::new("account-receivables", "Account Receivables", Tab::Finance, "finance.json", "/r")
            .columns(vec![ColumnDef::text("customer", "Customer")])
            .sorted_by("customer", Direction::Ascending)
    }

    fn quotes() -> ViewDef {
        ViewDef::new("quotes", "Quotes", Tab::Sales, "operations.json", "/quotes")
            .columns(vec![ColumnDef::text("quoteNbr", "Quote")])
            .sorted_by("quoteNbr", Direction::Ascending)
    }

    fn model() -> Model {
        let mut catalog = Catalog::default();
        catalog.insert(
            "account-payables",
            ViewData::Ready(Dataset::new(vec![
                Row::from(json!({"vendor": "Acme", "status": "Open", "aging": 10, "dueDate": "2024-02-01"})),
                Row::from(json!({"vendor": "Globex", "status": "Overdue", "aging": 40, "dueDate": "2024-01-01"})),
                Row::from(json!({"vendor": "Initech", "status": "Paid", "aging": 35, "dueDate": null})),
            ])),
        );
        catalog.insert(
            "account-receivables",
            ViewData::Ready(Dataset::new(vec![Row::from(json!({"customer": "Umbrella"}))])),
        );
        catalog.insert("quotes", ViewData::Failed("file not found".into()));
        let config = DVConfig::default();
        Model::init(&config, vec![payables(), receivables(), quotes()], catalog, 120, 30).unwrap()
    }

    fn vendors(model: &Model) -> Vec<String> {
        model.visible_rows().iter().map(|r| r.display("vendor")).collect()
    }

    fn type_line(model: &mut Model, text: &str) {
        for c in text.chars() {
            let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
            model.update(Some(Message::RawKey(key))).unwrap();
        }
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        model.update(Some(Message::RawKey(enter))).unwrap();
    }

    #[test]
    fn starts_on_first_view_with_default_sort() {
        let model = model();
        assert_eq!(model.current_view().id, "account-payables");
        assert_eq!(vendors(&model), vec!["Globex", "Acme", "Initech"]);
        let uidata = model.get_uidata();
        assert_eq!(uidata.nrows, 3);
        assert_eq!(uidata.table[3].name, "Due Date ▲");
        assert_eq!(uidata.tabs.len(), Tab::ALL.len());
    }

    #[test]
    fn sort_toggles_on_current_column() {
        let mut model = model();
        model.update(Some(Message::Sort)).unwrap();
        assert_eq!(vendors(&model), vec!["Acme", "Globex", "Initech"]);
        model.update(Some(Message::Sort)).unwrap();
        assert_eq!(vendors(&model), vec!["Initech", "Globex", "Acme"]);
    }

    #[test]
    fn filter_through_command_line() {
        let mut model = model();
        model.update(Some(Message::MoveRight)).unwrap();
        model.update(Some(Message::Filter)).unwrap();
        assert!(model.raw_keyevents());
        type_line(&mut model, "Paid");
        assert!(!model.raw_keyevents());
        assert_eq!(vendors(&model), vec!["Initech"]);
        assert_eq!(
            model.view_state().filter("status"),
            Some(&FilterValue::Choice("Paid".into()))
        );
    }

    #[test]
    fn unknown_choice_lists_options() {
        let mut model = model();
        model.update(Some(Message::MoveRight)).unwrap();
        model.update(Some(Message::Filter)).unwrap();
        type_line(&mut model, "Closed");
        assert!(vendors(&model).is_empty());
        assert!(model.get_uidata().status_message.contains("all, Open, Overdue, Paid"));
    }

    #[test]
    fn search_and_clear() {
        let mut model = model();
        model.update(Some(Message::Search)).unwrap();
        type_line(&mut model, "glo");
        assert_eq!(vendors(&model), vec!["Globex"]);
        model.update(Some(Message::ClearFilters)).unwrap();
        assert_eq!(vendors(&model).len(), 3);
    }

    #[test]
    fn canceled_input_changes_nothing() {
        let mut model = model();
        model.update(Some(Message::Search)).unwrap();
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        model.update(Some(Message::RawKey(key))).unwrap();
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        model.update(Some(Message::RawKey(esc))).unwrap();
        assert_eq!(model.view_state().search, None);
        assert_eq!(vendors(&model).len(), 3);
    }

    #[test]
    fn cycle_mode_filter() {
        let mut model = model();
        model.update(Some(Message::CycleMode)).unwrap();
        assert_eq!(vendors(&model), vec!["Globex"]);
        model.update(Some(Message::CycleMode)).unwrap();
        assert_eq!(vendors(&model), vec!["Globex", "Initech"]);
        model.update(Some(Message::CycleMode)).unwrap();
        assert_eq!(vendors(&model).len(), 3);
        assert!(model.view_state().filters.is_empty());
    }

    #[test]
    fn switching_views_resets_state() {
        let mut model = model();
        model.update(Some(Message::CycleMode)).unwrap();
        model.update(Some(Message::NextView)).unwrap();
        assert_eq!(model.current_view().id, "account-receivables");
        model.update(Some(Message::PreviousView)).unwrap();
        assert_eq!(model.current_view().id, "account-payables");
        assert!(model.view_state().filters.is_empty());
        assert_eq!(vendors(&model).len(), 3);
    }

    #[test]
    fn tabs_skip_categories_without_views() {
        let mut model = model();
        model.update(Some(Message::NextTab)).unwrap();
        assert_eq!(model.current_view().id, "quotes");
        model.update(Some(Message::PreviousTab)).unwrap();
        assert_eq!(model.current_view().id, "account-payables");
    }

    #[test]
    fn failed_view_shows_load_error() {
        let mut model = model();
        model.select_view_by_id("quotes").unwrap();
        let uidata = model.get_uidata();
        assert_eq!(uidata.load_error.as_deref(), Some("file not found"));
        assert_eq!(uidata.nrows, 0);
        model.update(Some(Message::MoveDown)).unwrap();
        model.update(Some(Message::MoveEnd)).unwrap();
        model.update(Some(Message::Enter)).unwrap();
        model.update(Some(Message::Export)).unwrap();
        assert!(model.get_uidata().status_message.starts_with("Nothing to export"));
        assert!(matches!(
            model.select_view_by_id("nope"),
            Err(DVError::UnknownView(_))
        ));
    }

    #[test]
    fn cursor_stays_within_rows() {
        let mut model = model();
        model.update(Some(Message::MovePageDown)).unwrap();
        assert_eq!(model.get_uidata().abs_selected_row, 2);
        model.update(Some(Message::MoveUp)).unwrap();
        assert_eq!(model.get_uidata().abs_selected_row, 1);
        model.update(Some(Message::MoveBeginning)).unwrap();
        model.update(Some(Message::MoveUp)).unwrap();
        assert_eq!(model.get_uidata().abs_selected_row, 0);
    }

    #[test]
    fn small_window_scrolls() {
        let mut model = model();
        // Two table rows fit next to the tab, view, header and command lines.
        model.update(Some(Message::Resize(80, 6))).unwrap();
        model.update(Some(Message::MoveEnd)).unwrap();
        let uidata = model.get_uidata();
        assert_eq!(uidata.abs_selected_row, 2);
        assert_eq!(uidata.selected_row, 1);
        assert_eq!(uidata.table[0].data, vec!["Acme", "Initech"]);
    }

    #[test]
    fn record_view_walks_rows() {
        let mut model = model();
        model.update(Some(Message::Enter)).unwrap();
        let uidata = model.get_uidata();
        assert_eq!(uidata.table.len(), 2);
        assert_eq!(uidata.table[1].data[0], "Globex");
        model.update(Some(Message::MoveRight)).unwrap();
        assert_eq!(model.get_uidata().table[1].data[0], "Acme");
        model.update(Some(Message::Exit)).unwrap();
        assert_eq!(model.get_uidata().abs_selected_row, 1);
    }

    #[test]
    fn help_popup_opens_and_closes() {
        let mut model = model();
        model.update(Some(Message::Help)).unwrap();
        assert!(model.get_uidata().show_popup);
        model.update(Some(Message::MoveDown)).unwrap();
        model.update(Some(Message::Exit)).unwrap();
        assert!(!model.get_uidata().show_popup);
        assert_eq!(model.get_uidata().abs_selected_row, 0);
    }

    #[test]
    fn export_writes_visible_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = model();
        model.config = model.config.clone().with_export_dir(dir.path().to_path_buf());
        model.update(Some(Message::CycleMode)).unwrap();
        model.update(Some(Message::Export)).unwrap();
        let content = std::fs::read_to_string(dir.path().join("account-payables.csv")).unwrap();
        assert_eq!(content, "Vendor,Status,Aging,Due Date\nGlobex,Overdue,40,2024-01-01\n");
    }

    #[test]
    fn row_text_is_a_csv_line() {
        let model = model();
        assert_eq!(model.row_text(0).unwrap().unwrap(), "Globex,Overdue,40,2024-01-01");
        assert_eq!(model.table_cell_text().as_deref(), Some("Globex"));
    }

    #[test]
    fn visible_names_are_shortened() {
        assert_eq!(Model::get_visible_name("Last Pay Date", 8), "Last ...");
        assert_eq!(Model::get_visible_name("Aging", 8), "Aging");
        assert_eq!(Model::get_visible_name("Aging", 2), "");
    }
}
