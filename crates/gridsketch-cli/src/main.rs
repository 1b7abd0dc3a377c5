//! GridSketch command-line shell.
//!
//! Headless access to the engine: measure, straighten and close drawings
//! stored as JSON, and manage the local project list.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use gridsketch_core::{
    ConfigError, Drawing, EngineConfig, FileStorage, ProjectError, ProjectRecord, ProjectStore,
    Session, StorageError, format_measurement, snap_stroke,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid drawing JSON: {0}")]
    InvalidDrawing(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Project(#[from] ProjectError),
}

#[derive(Parser, Debug)]
#[command(name = "gridsketch", about = "GridSketch drawing engine CLI")]
struct Cli {
    /// Engine configuration JSON file.
    #[arg(long, global = true, env = "GRIDSKETCH_CONFIG")]
    config: Option<PathBuf>,

    /// Project storage directory.
    #[arg(long, global = true, env = "GRIDSKETCH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a length label for every stroke.
    Measure { drawing: PathBuf },
    /// Straighten every freehand stroke.
    Snap {
        drawing: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Find closed paths and add fills for them.
    Detect {
        drawing: PathBuf,
        /// Delete the strokes that formed each closed path.
        #[arg(long)]
        remove_sources: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    Projects(ProjectsCommand),
}

#[derive(Args, Debug)]
struct ProjectsCommand {
    #[command(subcommand)]
    command: ProjectsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProjectsSubcommand {
    List,
    Show {
        id: String,
    },
    /// Create a project from a drawing file.
    Import {
        drawing: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    log::debug!("engine config: {:?}", config);

    match cli.command {
        Command::Measure { drawing } => run_measure(&config, &drawing),
        Command::Snap { drawing, output } => run_snap(&config, &drawing, output.as_deref()),
        Command::Detect {
            drawing,
            remove_sources,
            output,
        } => run_detect(&config, &drawing, remove_sources, output.as_deref()),
        Command::Projects(projects) => {
            let storage = match cli.data_dir {
                Some(dir) => FileStorage::new(dir)?,
                None => FileStorage::default_location()?,
            };
            log::info!("project storage at {}", storage.base_path().display());
            run_projects(ProjectStore::new(storage), projects)
        }
    }
}

fn read_drawing(path: &Path) -> Result<Drawing, CliError> {
    let json = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Drawing::from_json(&json)?)
}

fn write_drawing(drawing: &Drawing, output: Option<&Path>) -> Result<(), CliError> {
    let json = drawing.to_json()?;
    match output {
        Some(path) => fs::write(path, json).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn run_measure(config: &EngineConfig, path: &Path) -> Result<(), CliError> {
    let session = Session::with_drawing(config.clone(), read_drawing(path)?);
    let labels = session.measurements();
    let mut total = 0.0;
    for (index, label) in &labels {
        total += label.units;
        println!(
            "{index}\t{}\t{:.3}\t{:.1}°",
            label.text, label.units, label.rotation_deg
        );
    }
    println!("total\t{}\t{:.3}", format_measurement(total), total);
    Ok(())
}

fn run_snap(config: &EngineConfig, path: &Path, output: Option<&Path>) -> Result<(), CliError> {
    let mut drawing = read_drawing(path)?;
    let snapped = drawing
        .strokes
        .iter_mut()
        .filter_map(|stroke| snap_stroke(stroke, config.grid_pitch, config.angle_tolerance_deg))
        .count();
    eprintln!("snapped {snapped} of {} strokes", drawing.strokes.len());
    write_drawing(&drawing, output)
}

fn run_detect(
    config: &EngineConfig,
    path: &Path,
    remove_sources: bool,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let mut session = Session::with_drawing(config.clone(), read_drawing(path)?);
    let found = session.detect_closed_shapes(remove_sources);
    eprintln!("found {found} closed shape(s)");
    write_drawing(&session.drawing, output)
}

fn run_projects(store: ProjectStore<FileStorage>, projects: ProjectsCommand) -> Result<(), CliError> {
    match projects.command {
        ProjectsSubcommand::List => {
            for project in pollster::block_on(store.list())? {
                println!(
                    "{}\t{}\t{}\t{} strokes",
                    project.id,
                    project.title,
                    project.last_modified.format("%Y-%m-%d %H:%M"),
                    project.strokes.len()
                );
            }
        }
        ProjectsSubcommand::Show { id } => {
            let project = pollster::block_on(store.get(&id))?;
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        ProjectsSubcommand::Import {
            drawing,
            title,
            description,
        } => {
            let strokes = read_drawing(&drawing)?.strokes;
            let record = ProjectRecord {
                strokes,
                ..ProjectRecord::new(title, description)
            };
            let saved = pollster::block_on(store.save(record))?;
            println!("{}", saved.id);
        }
    }
    Ok(())
}
