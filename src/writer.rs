use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value as JsonValue};

use crate::errors::ExportError;
use crate::extract::ExportModel;
use crate::params::ParamTable;
use crate::project::Layer;

/// Target web-map library. An unrecognized format string is not an error;
/// everything that is not "leaflet" selects OpenLayers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapFormat {
    OpenLayers,
    Leaflet,
}

impl MapFormat {
    pub fn resolve(format: &str) -> Self {
        if format.trim().eq_ignore_ascii_case("leaflet") {
            MapFormat::Leaflet
        } else {
            MapFormat::OpenLayers
        }
    }
}

/// Everything a writer needs: the per-invocation copy of the parameter table
/// with resolved inputs applied, plus the extracted layer model.
#[derive(Clone, Debug)]
pub struct WriterConfig<'a, L> {
    pub params: ParamTable,
    pub model: ExportModel<'a, L>,
}

impl<'a, L: Layer> WriterConfig<'a, L> {
    /// Serializes the configuration into the context writers render from.
    pub fn to_context(&self) -> JsonValue {
        let layers: Vec<JsonValue> = self
            .model
            .layers
            .iter()
            .map(|layer| {
                json!({
                    "id": layer.id(),
                    "name": layer.name(),
                    "kind": layer.kind(),
                    "source": layer.source(),
                })
            })
            .collect();

        json!({
            "params": self.params,
            "layers": layers,
            "groups": self.model.groups,
            "popups": self.model.popups,
            "visible": self.model.visible,
            "json": self.model.json_encode,
            "cluster": self.model.cluster,
        })
    }
}

/// External writer seam: renders a writer context into a deployable artifact
/// under the destination directory and reports what it wrote.
pub trait MapWriter {
    fn write(&self, context: &JsonValue, destination: &Path) -> Result<PathBuf, ExportError>;
}

/// External exporter seam: decides where an export lands.
pub trait Exporter {
    fn export_directory(&self) -> Result<PathBuf, ExportError>;
}

/// Exporter writing into a fixed local folder.
#[derive(Clone, Debug)]
pub struct FolderExporter {
    folder: PathBuf,
}

impl FolderExporter {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }
}

impl Exporter for FolderExporter {
    fn export_directory(&self) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.folder).map_err(|source| ExportError::ExportDirectory {
            path: self.folder.clone(),
            source,
        })?;
        Ok(self.folder.clone())
    }
}
