use indexmap::IndexMap;
use tracing::{debug, error};

use crate::popup::{resolve_popups, LayerPopups, PopupFieldMap};
use crate::project::{
    Layer, LayerKind, LayerTree, CLUSTER_CHECKED, CLUSTER_KEY, JSON_KEY, VISIBLE_KEY,
};

/// Normalized, writer-agnostic result of layer extraction.
///
/// All parallel vectors have identical length and index alignment with
/// `layers`. Order is the reverse of tree order: the tree lists layers
/// top-to-bottom by draw priority, writers consume them bottom-to-top.
#[derive(Clone, Debug)]
pub struct ExportModel<'a, L> {
    pub layers: Vec<&'a L>,
    /// Group membership by group name. Currently never populated.
    pub groups: IndexMap<String, Vec<String>>,
    pub popups: Vec<LayerPopups>,
    pub visible: Vec<bool>,
    pub json_encode: Vec<bool>,
    pub cluster: Vec<bool>,
}

impl<'a, L> ExportModel<'a, L> {
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Walks the project tree and extracts every exportable layer.
///
/// Plugin layers and layers on unchecked tree nodes are dropped. Vector
/// layers additionally pass a renderer-dump probe; layers with an unreadable
/// renderer are logged and excluded, the export itself carries on with the
/// reduced set.
pub fn extract_whole_project<T: LayerTree>(tree: &T) -> ExportModel<'_, T::Layer> {
    let mut layers = Vec::new();
    for layer in tree.find_layers() {
        if layer.kind() == LayerKind::Plugin {
            debug!("skipping plugin layer '{}'", layer.id());
            continue;
        }
        if !tree.is_visible(layer.id()) {
            debug!("skipping unchecked layer '{}'", layer.id());
            continue;
        }
        if layer.kind() == LayerKind::Vector {
            if let Err(probe) = layer.renderer_dump() {
                error!("excluding layer from export: {}", probe);
                continue;
            }
        }
        layers.push(layer);
    }

    let mut popups = Vec::with_capacity(layers.len());
    let mut visible = Vec::with_capacity(layers.len());
    let mut json_encode = Vec::with_capacity(layers.len());
    let mut cluster = Vec::with_capacity(layers.len());
    for layer in &layers {
        let layer_popups = if layer.kind() == LayerKind::Vector {
            resolve_popups(*layer)
        } else {
            PopupFieldMap::new()
        };
        popups.push(LayerPopups::Fields(layer_popups));
        visible.push(layer.property_bool(VISIBLE_KEY, true));
        json_encode.push(layer.property_bool(JSON_KEY, true));
        cluster.push(layer.property_i64(CLUSTER_KEY, 0) == CLUSTER_CHECKED);
    }

    // Reverse everything together so index alignment survives
    layers.reverse();
    popups.reverse();
    visible.reverse();
    json_encode.reverse();
    cluster.reverse();

    ExportModel {
        layers,
        groups: IndexMap::new(),
        popups,
        visible,
        json_encode,
        cluster,
    }
}

/// Builds a one-layer export model for the single-layer operations.
///
/// No filtering or probing happens here; visibility and clustering come from
/// the operation inputs instead of custom properties. Raster input gets the
/// disabled popup sentinel and no JSON encoding.
pub fn extract_single_layer<L: Layer>(
    layer: &L,
    visible: bool,
    cluster: bool,
) -> ExportModel<'_, L> {
    let is_vector = layer.kind() == LayerKind::Vector;
    ExportModel {
        layers: vec![layer],
        groups: IndexMap::new(),
        popups: vec![if is_vector {
            LayerPopups::Fields(resolve_popups(layer))
        } else {
            LayerPopups::disabled()
        }],
        visible: vec![visible],
        json_encode: vec![is_vector],
        cluster: vec![if is_vector { cluster } else { false }],
    }
}
