use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{info, warn};
use pagekeeper::{
    BoundsCache, Command, DocumentViewMode, Navigator, PageTree, ResidencyPlan, Settings, Size,
    ViewState,
};
use simplelog::{Config, LevelFilter, WriteLogger};

/// Simulate a scrolling session and print the engine's decisions
#[derive(Parser, Debug)]
#[command(name = "pagekeeper", version, about)]
struct Args {
    /// Settings file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of pages in the synthetic document
    #[arg(long, default_value_t = 50)]
    pages: usize,

    /// Natural page size, WxH
    #[arg(long, default_value = "612x792", value_parser = parse_size)]
    page_size: Size,

    /// Viewport size, WxH
    #[arg(long, default_value = "800x600", value_parser = parse_size)]
    view: Size,

    /// View mode, overrides the settings file
    #[arg(long, value_parser = parse_mode)]
    mode: Option<DocumentViewMode>,

    /// Zoom factor
    #[arg(long)]
    zoom: Option<f32>,

    /// Pages kept in memory, overrides the settings file
    #[arg(long)]
    budget: Option<usize>,

    /// Tile tree depth, derived from zoom when omitted
    #[arg(long)]
    depth: Option<u8>,

    /// Number of scroll steps to simulate
    #[arg(long, default_value_t = 5)]
    steps: usize,

    /// Scroll distance per step along the mode's axis
    #[arg(long, default_value_t = 400.0)]
    scroll: f32,

    /// Print one JSON object per step
    #[arg(long)]
    json: bool,

    #[arg(long, default_value = "pagekeeper.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "debug")]
    log_level: String,
}

fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {s:?}"))?;
    let width: f32 = w.trim().parse().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let height: f32 = h.trim().parse().map_err(|e| format!("bad height {h:?}: {e}"))?;
    let size = Size::new(width, height);
    if size.is_empty() {
        return Err(format!("size must be positive, got {s:?}"));
    }
    Ok(size)
}

fn parse_mode(s: &str) -> Result<DocumentViewMode, String> {
    match s {
        "vertical_scroll" | "vertical" => Ok(DocumentViewMode::VerticalScroll),
        "horizontal_scroll" | "horizontal" => Ok(DocumentViewMode::HorizontalScroll),
        "single_page" | "single" => Ok(DocumentViewMode::SinglePage),
        other => Err(format!("unknown view mode {other:?}")),
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path).with_context(|| format!("loading {path:?}"))?,
        None => match Settings::default_path() {
            Ok(path) if path.exists() => Settings::load_or_default(&path),
            Ok(_) => Settings::default(),
            Err(e) => {
                warn!("{e}, using default settings");
                Settings::default()
            }
        },
    };

    if let Some(budget) = args.budget {
        settings.app.pages_in_memory = budget;
    }
    let book = settings.book.get_or_insert_with(Default::default);
    if let Some(mode) = args.mode {
        book.view_mode = mode;
    }
    if let Some(zoom) = args.zoom {
        book.zoom = zoom;
    }
    Ok(settings)
}

fn trees_for(state: &ViewState, depth: Option<u8>) -> Vec<PageTree> {
    let depth = depth.unwrap_or_else(|| PageTree::depth_for_zoom(state.zoom));
    let mut indices: Vec<usize> = state
        .visible_pages()
        .chain(state.cached_pages())
        .map(|p| p.index)
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
        .into_iter()
        .map(|index| PageTree::new(index, depth))
        .collect()
}

fn report(step: usize, state: &ViewState, plan: &ResidencyPlan, json: bool) -> Result<()> {
    if json {
        let line = serde_json::json!({
            "step": step,
            "zoom": state.zoom,
            "view_rect": state.view_rect,
            "current": state.pages.current(),
            "first_visible": state.pages.first_visible(),
            "last_visible": state.pages.last_visible(),
            "first_cached": state.pages.first_cached(),
            "last_cached": state.pages.last_cached(),
            "tiles_kept": plan.keep.len(),
            "tiles_discarded": plan.discard.len(),
        });
        println!("{}", serde_json::to_string(&line)?);
    } else {
        println!(
            "step {step}: {state} | tiles keep {} discard {}",
            plan.keep.len(),
            plan.discard.len()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    better_panic::install();
    let args = Args::parse();

    let level: LevelFilter = args
        .log_level
        .parse()
        .map_err(|_| anyhow!("unknown log level {:?}", args.log_level))?;
    WriteLogger::init(
        level,
        Config::default(),
        File::create(&args.log_file).with_context(|| format!("creating {:?}", args.log_file))?,
    )?;

    info!("Starting pagekeeper simulation");

    let settings = load_settings(&args)?;
    let mut bounds_cache = BoundsCache::from_capacity(settings.app.bounds_cache_capacity);
    let mut navigator = Navigator::new(settings);

    for cmd in [
        Command::SetViewSize(args.view),
        Command::SetDocument(Some(vec![args.page_size; args.pages])),
    ] {
        let effects = navigator.apply(cmd);
        if let Some(cache) = bounds_cache.as_mut() {
            cache.apply_effects(&effects);
        }
    }

    let (dx, dy) = match navigator.mode() {
        DocumentViewMode::HorizontalScroll => (args.scroll, 0.0),
        DocumentViewMode::VerticalScroll => (0.0, args.scroll),
        DocumentViewMode::SinglePage => (0.0, 0.0),
    };

    for step in 0..=args.steps {
        if step > 0 {
            let effects = match navigator.mode() {
                DocumentViewMode::SinglePage => {
                    let next = navigator
                        .snapshot()
                        .pages
                        .current()
                        .map_or(0, |current| current + 1);
                    navigator.apply(Command::GoToPage(next))
                }
                _ => navigator.apply(Command::ScrollBy { dx, dy }),
            };
            if effects.is_empty() {
                info!("Reached the end of the document at step {step}");
                break;
            }
            if let Some(cache) = bounds_cache.as_mut() {
                cache.apply_effects(&effects);
            }
        }

        let state = navigator.snapshot();
        let trees = trees_for(&state, args.depth);
        let plan = match bounds_cache.as_mut() {
            Some(cache) => ResidencyPlan::sweep_cached(&state, &trees, cache),
            None => ResidencyPlan::sweep(&state, &trees),
        };
        report(step, &state, &plan, args.json)?;
    }

    info!("Shutting down pagekeeper");
    Ok(())
}
