mod common;
mod errors;
mod extract;
mod operations;
mod params;
mod popup;
mod project;
mod value;
mod writer;
mod writers;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use operations::{RasterExportRequest, VectorExportRequest};
use params::{default_params, operation_parameters, OperationKind};
use project::{LayerKind, Project, ProjectLayer};
use value::Value;
use writer::FolderExporter;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every eligible layer of a project snapshot
    ExportProject {
        /// Project snapshot YAML file
        #[clap(short, long)]
        project: String,
        #[clap(short, long, default_value = "OpenLayers")]
        format: String,
        #[clap(short, long, default_value = "webmap")]
        output: String,
    },
    /// Export one vector layer
    ExportVector {
        #[clap(short, long)]
        project: String,
        /// Id of the input layer
        #[clap(long)]
        layer: String,
        #[clap(short, long, default_value = "OpenLayers")]
        format: String,
        #[clap(short, long, default_value = "webmap")]
        output: String,
        /// Export the layer unchecked in the layer switcher
        #[clap(long)]
        hidden: bool,
        #[clap(long)]
        cluster: bool,
        /// Parameter override as NAME=VALUE, repeatable
        #[clap(long = "param")]
        params: Vec<String>,
    },
    /// Export one raster layer
    ExportRaster {
        #[clap(short, long)]
        project: String,
        #[clap(long)]
        layer: String,
        #[clap(short, long, default_value = "OpenLayers")]
        format: String,
        #[clap(short, long, default_value = "webmap")]
        output: String,
        #[clap(long)]
        hidden: bool,
        #[clap(long = "param")]
        params: Vec<String>,
    },
    /// Print the parameter schema of an operation
    Schema {
        /// One of: project, vector, raster
        #[clap(short, long, default_value = "vector")]
        operation: String,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::ExportProject {
            project,
            format,
            output,
        } => {
            let project = load_project(&project)?;
            let exporter = FolderExporter::new(&output);
            let written = operations::export_project(&project, &format, &exporter)?;
            info!("exported project to {}", written.display());
        }
        Commands::ExportVector {
            project,
            layer,
            format,
            output,
            hidden,
            cluster,
            params,
        } => {
            let project = load_project(&project)?;
            let layer = find_layer(&project, &layer, LayerKind::Vector)?;
            let request = VectorExportRequest {
                map_format: format,
                visible: !hidden,
                cluster,
                params: parse_overrides(&params)?,
            };
            let exporter = FolderExporter::new(&output);
            let written = operations::export_vector_layer(layer, &request, &exporter)?;
            info!("exported layer '{}' to {}", layer.id, written.display());
        }
        Commands::ExportRaster {
            project,
            layer,
            format,
            output,
            hidden,
            params,
        } => {
            let project = load_project(&project)?;
            let layer = find_layer(&project, &layer, LayerKind::Raster)?;
            let request = RasterExportRequest {
                map_format: format,
                visible: !hidden,
                params: parse_overrides(&params)?,
            };
            let exporter = FolderExporter::new(&output);
            let written = operations::export_raster_layer(layer, &request, &exporter)?;
            info!("exported layer '{}' to {}", layer.id, written.display());
        }
        Commands::Schema { operation } => {
            let kind = match operation.to_lowercase().as_str() {
                "project" => OperationKind::Project,
                "vector" => OperationKind::VectorLayer,
                "raster" => OperationKind::RasterLayer,
                other => bail!("unknown operation '{}'", other),
            };
            let specs = operation_parameters(kind, &default_params());
            println!("{}", serde_yaml::to_string(&specs)?);
        }
    }

    Ok(())
}

fn load_project(path: &str) -> Result<Project> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read project snapshot {}", path))?;
    Project::from_yaml(&content).with_context(|| format!("invalid project snapshot {}", path))
}

fn find_layer<'a>(
    project: &'a Project,
    id: &str,
    expected: LayerKind,
) -> Result<&'a ProjectLayer> {
    let layer = project
        .layer(id)
        .with_context(|| format!("no layer '{}' in project", id))?;
    if layer.kind != expected {
        bail!("layer '{}' is not a {:?} layer", id, expected);
    }
    Ok(layer)
}

/// Parses NAME=VALUE overrides. Values classify the same way schema defaults
/// do: boolean first, then number, everything else stays a string.
fn parse_overrides(pairs: &[String]) -> Result<IndexMap<String, Value>> {
    let mut overrides = IndexMap::new();
    for pair in pairs {
        let (name, raw) = pair
            .split_once('=')
            .with_context(|| format!("expected NAME=VALUE, got '{}'", pair))?;
        let value = if let Ok(b) = raw.parse::<bool>() {
            Value::Bool(b)
        } else if let Ok(n) = raw.parse::<f64>() {
            Value::Number(n)
        } else {
            Value::Str(raw.to_string())
        };
        overrides.insert(name.to_string(), value);
    }
    Ok(overrides)
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .without_time()
        .init();
}
