use std::path::PathBuf;

use thiserror::Error;

/// Failure of the per-layer renderer probe.
///
/// Probe failures are recoverable: extraction logs them and drops the layer,
/// they never abort a whole export.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// The layer's renderer could not be serialized
    #[error("renderer dump failed for layer '{layer}': {reason}")]
    RendererDump { layer: String, reason: String },
}

/// Errors surfaced by the export operations themselves. Anything in here
/// propagates to the caller; per-layer trouble is handled inside extraction.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Template rendering failed inside a writer
    #[error("template rendering failed: {0}")]
    Template(#[from] handlebars::RenderError),

    /// The exporter could not provide a destination directory
    #[error("could not prepare export directory {path}: {source}")]
    ExportDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing an artifact failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
