use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ratatui::DefaultTerminal;
use serde::Serialize;
use tracing::{error, info};

use dashview::column::ColumnDef;
use dashview::controller::Controller;
use dashview::dataset::{Catalog, ViewData};
use dashview::domain::{DVConfig, DVError};
use dashview::model::{Model, Status};
use dashview::sort::{Direction, SortSpec};
use dashview::ui::TableUI;
use dashview::view::{FilterValue, Tab, ViewDef, ViewState};
use dashview::{export, logging, views};

/// Browse, filter, sort and export the business dashboard tables.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory holding the dashboard JSON files
    #[arg(default_value = "./data")]
    data_dir: String,

    /// Start on (or with --export, export) this view
    #[arg(long)]
    view: Option<String>,

    /// Print the available views and their load status
    #[arg(long)]
    list: bool,

    /// With --list, print the views and their columns as JSON
    #[arg(long, requires = "list")]
    json: bool,

    /// Write the view as CSV without starting the terminal UI
    #[arg(long)]
    export: bool,

    /// Filter a column, ranges as FROM..TO (repeatable)
    #[arg(long = "filter", value_name = "FIELD=VALUE")]
    filters: Vec<String>,

    /// Search the view's search fields
    #[arg(long)]
    search: Option<String>,

    /// Select a mode filter option (repeatable)
    #[arg(long = "mode", value_name = "NAME=OPTION")]
    modes: Vec<String>,

    /// Sort column and direction
    #[arg(long, value_name = "FIELD[:asc|desc]")]
    sort: Option<String>,

    /// Directory CSV exports are written to
    #[arg(long, default_value = ".")]
    export_dir: String,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<String>,

    /// Event poll interval in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,

    /// Maximum rendered column width
    #[arg(long, default_value_t = 40)]
    max_column_width: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn expand(path: &str) -> Result<PathBuf, DVError> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| DVError::InvalidArgument(format!("{path}: {e}")))
}

fn split_pair<'a>(arg: &'a str, flag: &str) -> Result<(&'a str, &'a str), DVError> {
    arg.split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .ok_or_else(|| DVError::InvalidArgument(format!("{flag} expects KEY=VALUE, got '{arg}'")))
}

fn build_view_state(view: &ViewDef, args: &Args) -> Result<ViewState, DVError> {
    let mut state = ViewState::for_view(view);

    for filter in args.filters.iter() {
        let (field, input) = split_pair(filter, "--filter")?;
        let value = view.parse_filter(field, input).ok_or_else(|| {
            DVError::InvalidArgument(format!("{} has no column '{field}'", view.id))
        })?;
        state = state.with_filter(field, value);
    }

    for mode in args.modes.iter() {
        let (name, option) = split_pair(mode, "--mode")?;
        if view.mode_filter(name).and_then(|m| m.predicates(option)).is_none() {
            return Err(DVError::InvalidArgument(format!(
                "{} has no mode option {name}={option}",
                view.id
            )));
        }
        state = state.with_filter(name, FilterValue::Mode(option.to_string()));
    }

    if let Some(search) = &args.search {
        state = state.with_search(search);
    }

    if let Some(sort) = &args.sort {
        let (field, direction) = match sort.split_once(':') {
            Some((field, direction)) => (
                field,
                Direction::parse(direction).ok_or_else(|| {
                    DVError::InvalidArgument(format!("unknown sort direction '{direction}'"))
                })?,
            ),
            None => (sort.as_str(), Direction::Ascending),
        };
        if view.column(field).is_none() {
            return Err(DVError::InvalidArgument(format!(
                "{} has no column '{field}'",
                view.id
            )));
        }
        state = state.with_sort(SortSpec::new(field, direction));
    }
    Ok(state)
}

fn list_views(views: &[ViewDef], catalog: &Catalog) {
    for view in views {
        let status = match catalog.get(&view.id) {
            Some(ViewData::Ready(dataset)) => format!("{} rows", dataset.len()),
            Some(ViewData::Failed(reason)) => format!("error: {reason}"),
            None => "not loaded".to_string(),
        };
        println!(
            "{:<26} {:<11} {:<28} {}",
            view.id,
            view.tab.title(),
            view.source,
            status
        );
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewListing<'a> {
    id: &'a str,
    title: &'a str,
    tab: Tab,
    source: &'a str,
    default_sort: &'a SortSpec,
    search: &'a [String],
    modes: Vec<&'a str>,
    columns: &'a [ColumnDef],
    rows: Option<usize>,
    error: Option<&'a str>,
}

fn views_json(views: &[ViewDef], catalog: &Catalog) -> Result<String, DVError> {
    let listing: Vec<ViewListing> = views
        .iter()
        .map(|view| {
            let (rows, error) = match catalog.get(&view.id) {
                Some(ViewData::Ready(dataset)) => (Some(dataset.len()), None),
                Some(ViewData::Failed(reason)) => (None, Some(reason.as_str())),
                None => (None, None),
            };
            ViewListing {
                id: &view.id,
                title: &view.title,
                tab: view.tab,
                source: &view.source,
                default_sort: &view.default_sort,
                search: &view.search,
                modes: view.modes.iter().map(|m| m.name.as_str()).collect(),
                columns: &view.columns,
                rows,
                error,
            }
        })
        .collect();
    Ok(serde_json::to_string_pretty(&listing)?)
}

fn export_view(
    view: &ViewDef,
    catalog: &Catalog,
    state: &ViewState,
    config: &DVConfig,
) -> Result<PathBuf, DVError> {
    let dataset = match catalog.get(&view.id) {
        Some(ViewData::Ready(dataset)) => dataset,
        Some(ViewData::Failed(reason)) => {
            return Err(DVError::loading(config.data_dir.join(&view.source), reason.clone()));
        }
        None => return Err(DVError::UnknownView(view.id.clone())),
    };
    let rows = view.apply(&dataset.rows, state);
    export::export_csv(&rows, &view.columns, &config.export_dir, &view.id)
}

fn run(args: Args) -> Result<(), DVError> {
    let headless = args.list || args.export;
    let log_file = args.log_file.as_deref().map(expand).transpose()?;
    logging::init_tracing(log_file.as_deref(), headless)?;

    let config = DVConfig::default()
        .with_data_dir(expand(&args.data_dir)?)
        .with_export_dir(expand(&args.export_dir)?)
        .with_event_poll_time(args.poll_ms)
        .with_max_column_width(args.max_column_width);
    info!("Starting dashview with {:?}", config);

    let registry = views::registry();
    let start_view = match &args.view {
        Some(id) => Some(views::find(&registry, id).ok_or_else(|| DVError::UnknownView(id.clone()))?),
        None => None,
    };

    if args.export {
        let view = start_view
            .ok_or_else(|| DVError::InvalidArgument("--export needs --view".into()))?;
        let state = build_view_state(view, &args)?;
        let catalog = Catalog::load(&config.data_dir, std::slice::from_ref(view));
        let path = export_view(view, &catalog, &state, &config)?;
        println!("{}", path.display());
        return Ok(());
    }

    let catalog = Catalog::load(&config.data_dir, &registry);
    if args.list {
        if args.json {
            println!("{}", views_json(&registry, &catalog)?);
        } else {
            list_views(&registry, &catalog);
        }
        return Ok(());
    }

    let start = match start_view {
        Some(view) => Some((view.id.clone(), build_view_state(view, &args)?)),
        None => None,
    };

    let mut terminal = ratatui::init();
    let result = run_tui(&mut terminal, &config, registry, catalog, start);
    ratatui::restore();
    result
}

fn run_tui(
    terminal: &mut DefaultTerminal,
    config: &DVConfig,
    registry: Vec<ViewDef>,
    catalog: Catalog,
    start: Option<(String, ViewState)>,
) -> Result<(), DVError> {
    let size = terminal.size()?;
    let mut model = Model::init(
        config,
        registry,
        catalog,
        size.width as usize,
        size.height as usize,
    )?;
    if let Some((view_id, state)) = start {
        model.select_view_by_id(&view_id)?;
        model.set_view_state(state);
    }

    let mut ui = TableUI::new(config);
    let controller = Controller::new(config);

    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(&model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(&model)?;
        model.update(message)?;
    }
    info!("Bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["dashview", "--view", "account-payables"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    fn payables() -> ViewDef {
        views::find(&views::registry(), "account-payables").unwrap().clone()
    }

    #[test]
    fn defaults() {
        let args = Args::parse_from(["dashview"]);
        assert_eq!(args.data_dir, "./data");
        assert_eq!(args.export_dir, ".");
        assert_eq!(args.poll_ms, 100);
        assert!(!args.export);
    }

    #[test]
    fn state_from_arguments() {
        let args = args(&[
            "--filter", "status=Open",
            "--filter", "entryDate=2024-01-01..2024-06-30",
            "--mode", "late payments=late",
            "--search", "acme",
            "--sort", "amount:desc",
        ]);
        let state = build_view_state(&payables(), &args).unwrap();
        assert_eq!(state.filter("status"), Some(&FilterValue::Choice("Open".into())));
        assert_eq!(
            state.filter("entryDate"),
            Some(&FilterValue::Range { from: "2024-01-01".into(), to: "2024-06-30".into() })
        );
        assert_eq!(state.filter("late payments"), Some(&FilterValue::Mode("late".into())));
        assert_eq!(state.search.as_deref(), Some("acme"));
        assert_eq!(state.sort, SortSpec::new("amount", Direction::Descending));
    }

    #[test]
    fn json_listing() {
        let registry = views::registry();
        let mut catalog = Catalog::default();
        catalog.insert("account-payables", ViewData::Failed("file not found".into()));
        catalog.insert("account-receivables", ViewData::Ready(Default::default()));

        let listing: serde_json::Value =
            serde_json::from_str(&views_json(&registry, &catalog).unwrap()).unwrap();
        let listing = listing.as_array().unwrap();
        assert_eq!(listing.len(), registry.len());

        let payables = listing.iter().find(|v| v["id"] == "account-payables").unwrap();
        assert_eq!(payables["tab"], "finance");
        assert_eq!(payables["error"], "file not found");
        assert!(payables["rows"].is_null());
        assert_eq!(payables["defaultSort"]["field"], "dueDate");
        assert_eq!(payables["defaultSort"]["direction"], "ascending");
        assert_eq!(payables["modes"][0], "late payments");
        let status = payables["columns"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["field"] == "status")
            .unwrap();
        assert_eq!(status["semantic"], "enum");
        assert_eq!(status["filter"], "exact");

        let receivables = listing.iter().find(|v| v["id"] == "account-receivables").unwrap();
        assert_eq!(receivables["rows"], 0);
    }

    #[test]
    fn json_needs_list() {
        assert!(Args::try_parse_from(["dashview", "--json"]).is_err());
        assert!(Args::try_parse_from(["dashview", "--list", "--json"]).unwrap().json);
    }

    #[test]
    fn rejects_unknown_names() {
        let view = payables();
        assert!(build_view_state(&view, &args(&["--filter", "nope=1"])).is_err());
        assert!(build_view_state(&view, &args(&["--filter", "status"])).is_err());
        assert!(build_view_state(&view, &args(&["--mode", "late payments=never"])).is_err());
        assert!(build_view_state(&view, &args(&["--sort", "amount:sideways"])).is_err());
        assert!(build_view_state(&view, &args(&["--sort", "nope"])).is_err());
    }
}
