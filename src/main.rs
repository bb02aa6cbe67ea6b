//! Facade Layout CLI
//!
//! Usage:
//!   facade-layout report <FILE> [--layer <ID>]
//!   facade-layout drag-edge <FILE> --face <A|B|C|D> --offset <METERS> [--layer <ID>]
//!   facade-layout drag-vertex <FILE> --vertex <0-3> --dx <METERS> --dz <METERS> [--snap] [--axis]
//!
//! Options:
//!   -v, --verbose  Log editor decisions (RUST_LOG overrides)
//!   -h, --help     Print help

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use facade_layout::footprint::{
    AngleSnap, AxisConstraint, DragHandle, DragModifiers, DragStatus, FootprintEditor,
};
use facade_layout::model::{FaceId, LayerId, Point2};
use facade_layout::{layout_report, BuildingConfig};

#[derive(Parser)]
#[command(name = "facade-layout")]
#[command(about = "Inspect and exercise footprint/facade layout constraints")]
struct Cli {
    /// Log editor decisions at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print per-face lengths and resolved minimum widths
    Report {
        /// Building file (TOML)
        file: PathBuf,

        /// Floor layer (defaults to the first one)
        #[arg(short, long)]
        layer: Option<String>,
    },

    /// Drag a face edge along its outward normal and print the result
    DragEdge {
        file: PathBuf,

        #[arg(short, long)]
        layer: Option<String>,

        #[arg(short, long, value_enum, ignore_case = true)]
        face: FaceArg,

        /// Outward displacement in meters (negative pulls inwards)
        #[arg(short, long, allow_hyphen_values = true)]
        offset: f64,
    },

    /// Drag a footprint vertex and print the result
    DragVertex {
        file: PathBuf,

        #[arg(short, long)]
        layer: Option<String>,

        /// Vertex index (0-3)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..4))]
        vertex: u8,

        #[arg(long, allow_hyphen_values = true)]
        dx: f64,

        #[arg(long, allow_hyphen_values = true)]
        dz: f64,

        /// Snap the corner to a right angle when close
        #[arg(long)]
        snap: bool,

        /// Slide along the closer adjacent edge
        #[arg(long)]
        axis: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FaceArg {
    A,
    B,
    C,
    D,
}

impl From<FaceArg> for FaceId {
    fn from(face: FaceArg) -> Self {
        match face {
            FaceArg::A => FaceId::A,
            FaceArg::B => FaceId::B,
            FaceArg::C => FaceId::C,
            FaceArg::D => FaceId::D,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Report { file, layer } => load(&file).and_then(|building| {
            let layer = pick_layer(&building, layer)?;
            print_report(&building, &layer, &[])
        }),
        Command::DragEdge {
            file,
            layer,
            face,
            offset,
        } => load(&file).and_then(|mut building| {
            let layer = pick_layer(&building, layer)?;
            let face = FaceId::from(face);
            let frame = building
                .layer(&layer)
                .and_then(|l| l.footprint.face_frame(face))
                .ok_or_else(|| format!("face {} has no length", face))?;
            let (a, b) = building
                .layer(&layer)
                .map(|l| l.footprint.edge(face))
                .ok_or_else(|| format!("unknown floor layer '{}'", layer))?;
            let start = a.midpoint(b);
            let hit = start + frame.outward_normal * offset;
            drag(
                &mut building,
                &layer,
                DragHandle::Edge(face),
                start,
                hit,
                DragModifiers::free(),
            )
        }),
        Command::DragVertex {
            file,
            layer,
            vertex,
            dx,
            dz,
            snap,
            axis,
        } => load(&file).and_then(|mut building| {
            let layer = pick_layer(&building, layer)?;
            let index = usize::from(vertex);
            let start = building
                .layer(&layer)
                .map(|l| l.footprint.point(index))
                .ok_or_else(|| format!("unknown floor layer '{}'", layer))?;
            let modifiers = DragModifiers::free()
                .with_axis(if axis {
                    AxisConstraint::AlongAdjacentEdge
                } else {
                    AxisConstraint::Free
                })
                .with_snap(if snap {
                    AngleSnap::RightAngle
                } else {
                    AngleSnap::Off
                });
            drag(
                &mut building,
                &layer,
                DragHandle::Vertex(index),
                start,
                start + Point2::new(dx, dz),
                modifiers,
            )
        }),
    };

    if let Err(message) = result {
        eprintln!("{}", message);
        process::exit(1);
    }
}

/// Load a building file, rendering parse errors with source context
fn load(path: &Path) -> Result<BuildingConfig, String> {
    let source = fs::read_to_string(path)
        .map_err(|e| format!("Error reading file '{}': {}", path.display(), e))?;
    BuildingConfig::from_toml_str(&source).map_err(|e| e.format(&source, &path.display().to_string()))
}

fn pick_layer(building: &BuildingConfig, requested: Option<String>) -> Result<LayerId, String> {
    match requested {
        Some(id) => {
            let id = LayerId::from(id);
            building
                .layer(&id)
                .map(|l| l.id.clone())
                .ok_or_else(|| format!("unknown floor layer '{}'", id))
        }
        None => building
            .layers
            .first()
            .map(|l| l.id.clone())
            .ok_or_else(|| "building has no floor layers".to_string()),
    }
}

fn print_report(building: &BuildingConfig, layer: &LayerId, guides: &[FaceId]) -> Result<(), String> {
    let report = layout_report(building, layer, guides).map_err(|e| e.to_string())?;
    print!("{}", report);
    Ok(())
}

fn drag(
    building: &mut BuildingConfig,
    layer: &LayerId,
    handle: DragHandle,
    start: Point2,
    hit: Point2,
    modifiers: DragModifiers,
) -> Result<(), String> {
    let mut editor = FootprintEditor::new(layer.clone(), &building.engine);
    editor
        .begin_drag(building, handle, start)
        .map_err(|e| e.to_string())?;
    let guides = editor.active_guides();
    let step = editor.update_drag(building, hit, modifiers, Instant::now());
    editor.end_drag();

    match step.status {
        DragStatus::Committed => println!("drag committed"),
        DragStatus::Clamped { t } => println!("drag clamped at {:.1}% of the requested motion", t * 100.0),
        DragStatus::Unchanged => println!("drag blocked, footprint unchanged"),
        DragStatus::Rejected(reason) => println!("drag rejected: {:?}", reason),
    }
    print_report(building, layer, &guides)
}
