use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use floorplan::cache::ScaleTable;
use floorplan::config::ViewerConfig;
use floorplan::engine::Viewer;
use floorplan::error::ViewerError;
use floorplan::geometry::{Point, Size};
use floorplan::hit::nearest_photo;
use floorplan::model::{Job, LevelIndex};
use floorplan::tour::{FloorExtent, Sweep, TourSnapshot};
use floorplan::transform::Transformer;
use floorplan::viewport::ViewportId;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum ProbeError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Viewer(#[from] ViewerError),
}

#[derive(Parser, Debug)]
#[command(name = "floorplan-probe", about = "Inspect a floor-plan job's coordinate frames and fits")]
struct Cli {
    /// Job JSON file.
    #[arg(long, env = "FLOORPLAN_JOB")]
    job: PathBuf,

    /// Tour JSON file with `sweeps` and per-floor `extents`.
    #[arg(long, env = "FLOORPLAN_TOUR")]
    tour: Option<PathBuf>,

    #[arg(long, default_value_t = 800.0)]
    width: f64,

    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Active level; defaults to the job's default level.
    #[arg(long)]
    level: Option<LevelIndex>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List levels with their boxes and world scales.
    Levels,
    /// Resolve a canvas point against the fitted viewport.
    Point { x: f64, y: f64 },
    /// Print the fit snapshot for the active level or the overview.
    Fit {
        #[arg(long)]
        all_levels: bool,
    },
}

#[derive(Debug, Default, Deserialize)]
struct TourFile {
    #[serde(default)]
    sweeps: Vec<Sweep>,
    #[serde(default)]
    extents: HashMap<usize, FloorExtent>,
}

fn read(path: &Path) -> Result<String, ProbeError> {
    fs::read_to_string(path).map_err(|source| ProbeError::Read { path: path.to_path_buf(), source })
}

fn load_tour(path: Option<&Path>) -> Result<TourSnapshot, ProbeError> {
    let file: TourFile = match path {
        Some(path) => serde_json::from_str(&read(path)?)?,
        None => TourFile::default(),
    };
    let mut tour = TourSnapshot::new();
    tour.sweeps = file.sweeps;
    tour.extents = file.extents;
    Ok(tour)
}

fn main() -> Result<(), ProbeError> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let job = Job::from_json(&read(&cli.job)?)?;
    let tour = load_tour(cli.tour.as_deref())?;
    tracing::info!(levels = job.levels.len(), photos = job.photos.len(), sweeps = tour.sweeps.len(), "job loaded");

    let mut viewer = Viewer::new(job, tour, ViewerConfig::from_env());
    let id = viewer.add_viewport(Size::new(cli.width, cli.height), false);
    viewer.init()?;
    if let Some(level) = cli.level {
        viewer.set_active_level(level)?;
    }

    let out = match cli.command {
        Command::Levels => levels(&viewer),
        Command::Point { x, y } => {
            settle(&mut viewer);
            point(&viewer, id, Point::new(x, y))
        }
        Command::Fit { all_levels } => {
            if all_levels {
                viewer.view_all_levels(false);
            }
            settle(&mut viewer);
            match viewer.viewport(id) {
                Some(v) => json!(v.snapshot()),
                None => Value::Null,
            }
        }
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Run one frame so pending fits land on the viewport.
fn settle(viewer: &mut Viewer<TourSnapshot>) {
    if let Some(frame) = viewer.tick_frame(true) {
        viewer.begin_frame(frame.id);
    }
}

fn levels(viewer: &Viewer<TourSnapshot>) -> Value {
    let job = viewer.job();
    let scales = ScaleTable::build(job);
    let t = Transformer::new(job, viewer.tour(), &scales, viewer.rotation(), viewer.state().active_level);
    let rows: Vec<Value> = job
        .levels
        .iter()
        .map(|l| {
            json!({
                "index": l.index,
                "title": l.title,
                "bounds": l.bounds,
                "world_scale": t.world_scale(l.index),
                "foot_k": t.foot_k(l.index),
                "tour_floor": job.tour_floor_for_level(l.index),
            })
        })
        .collect();
    json!({ "active_level": viewer.state().active_level, "levels": rows })
}

fn point(viewer: &Viewer<TourSnapshot>, id: ViewportId, canvas: Point) -> Value {
    let job = viewer.job();
    let Some(hpl) = viewer.hpl_at(id, canvas) else {
        return Value::Null;
    };
    let located = viewer.world_at(id, canvas);
    let scales = ScaleTable::build(job);
    let t = Transformer::new(job, viewer.tour(), &scales, viewer.rotation(), viewer.state().active_level);

    let (level, world, map, nearest) = match located {
        Some((level, world)) => {
            let map = t.hpl_to_map(t.active_to_own_hpl(hpl, level), level);
            let nearest = nearest_photo(job, level, world).map(|n| json!({ "id": n.photo.id, "distance": n.distance }));
            (Some(level), Some(world), map, nearest)
        }
        None => (None, None, None, None),
    };
    json!({
        "canvas": canvas,
        "hpl": hpl,
        "level": level,
        "world": world,
        "map": map,
        "nearest_photo": nearest,
    })
}
