use std::path::PathBuf;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::errors::ExportError;
use crate::extract::{extract_single_layer, extract_whole_project};
use crate::params::{default_params, ParamTable};
use crate::project::{Layer, LayerTree};
use crate::value::Value;
use crate::writer::{Exporter, MapFormat, WriterConfig};
use crate::writers;

/// Resolved inputs of the vector-layer export operation. `params` holds
/// pre-validated overrides for leaves of the defaults table, keyed by
/// parameter name.
#[derive(Clone, Debug)]
pub struct VectorExportRequest {
    pub map_format: String,
    pub visible: bool,
    pub cluster: bool,
    pub params: IndexMap<String, Value>,
}

impl Default for VectorExportRequest {
    fn default() -> Self {
        Self {
            map_format: "OpenLayers".to_string(),
            visible: true,
            cluster: false,
            params: IndexMap::new(),
        }
    }
}

/// Resolved inputs of the raster-layer export operation.
#[derive(Clone, Debug)]
pub struct RasterExportRequest {
    pub map_format: String,
    pub visible: bool,
    pub params: IndexMap<String, Value>,
}

impl Default for RasterExportRequest {
    fn default() -> Self {
        Self {
            map_format: "OpenLayers".to_string(),
            visible: true,
            params: IndexMap::new(),
        }
    }
}

/// Exports every eligible layer of a project.
pub fn export_project<T: LayerTree>(
    tree: &T,
    map_format: &str,
    exporter: &dyn Exporter,
) -> Result<PathBuf, ExportError> {
    let format = MapFormat::resolve(map_format);
    let model = extract_whole_project(tree);
    info!("exporting project with {} layers as {:?}", model.len(), format);
    let config = WriterConfig {
        params: default_params(),
        model,
    };
    write_out(format, &config.to_context(), exporter)
}

/// Exports a single vector layer with explicit visibility and clustering.
pub fn export_vector_layer<L: Layer>(
    layer: &L,
    request: &VectorExportRequest,
    exporter: &dyn Exporter,
) -> Result<PathBuf, ExportError> {
    let format = MapFormat::resolve(&request.map_format);
    let mut params = default_params();
    apply_overrides(&mut params, &request.params);
    info!("exporting vector layer '{}' as {:?}", layer.id(), format);
    let config = WriterConfig {
        params,
        model: extract_single_layer(layer, request.visible, request.cluster),
    };
    write_out(format, &config.to_context(), exporter)
}

/// Exports a single raster layer with explicit visibility.
pub fn export_raster_layer<L: Layer>(
    layer: &L,
    request: &RasterExportRequest,
    exporter: &dyn Exporter,
) -> Result<PathBuf, ExportError> {
    let format = MapFormat::resolve(&request.map_format);
    let mut params = default_params();
    apply_overrides(&mut params, &request.params);
    info!("exporting raster layer '{}' as {:?}", layer.id(), format);
    let config = WriterConfig {
        params,
        model: extract_single_layer(layer, request.visible, false),
    };
    write_out(format, &config.to_context(), exporter)
}

/// Overwrites leaves of a per-invocation parameter table copy with resolved
/// inputs. Names not present in the table are ignored with a warning.
fn apply_overrides(table: &mut ParamTable, overrides: &IndexMap<String, Value>) {
    for (name, value) in overrides {
        let slot = table
            .values_mut()
            .find_map(|settings| settings.get_mut(name));
        match slot {
            Some(slot) => *slot = value.clone(),
            None => warn!("ignoring unknown parameter override '{}'", name),
        }
    }
}

fn write_out(
    format: MapFormat,
    context: &JsonValue,
    exporter: &dyn Exporter,
) -> Result<PathBuf, ExportError> {
    let destination = exporter.export_directory()?;
    let writer = writers::create(format);
    let written = writer.write(context, &destination)?;
    info!("wrote {}", written.display());
    Ok(written)
}
