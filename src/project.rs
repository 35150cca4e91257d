use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::ProbeError;
use crate::value::Value;

/// Custom-property key marking a layer visible in the exported map.
pub const VISIBLE_KEY: &str = "qgis2web/Visible";
/// Custom-property key controlling GeoJSON encoding of a layer.
pub const JSON_KEY: &str = "qgis2web/Encode to JSON";
/// Custom-property key holding the tri-state cluster checkbox value.
pub const CLUSTER_KEY: &str = "qgis2web/Cluster";
/// Prefix of per-field popup configuration keys.
pub const POPUP_PREFIX: &str = "qgis2web/popup/";

/// Tri-state checkbox value the host stores for "checked".
pub const CLUSTER_CHECKED: i64 = 2;
/// Numeric code of the hidden edit widget in the host's widget enum.
pub const HIDDEN_WIDGET_CODE: i64 = 11;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Vector,
    Raster,
    Plugin,
}

/// Reference to a field's edit widget. The host reports it either as the
/// numeric enum value or as the widget's string name.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum WidgetRef {
    Code(i64),
    Name(String),
}

impl WidgetRef {
    /// True if this widget is the hidden sentinel, by code or by name.
    pub fn is_hidden(&self) -> bool {
        match self {
            WidgetRef::Code(code) => *code == HIDDEN_WIDGET_CODE,
            WidgetRef::Name(name) => name == "Hidden",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    #[serde(default = "default_widget")]
    pub widget: WidgetRef,
}

fn default_widget() -> WidgetRef {
    WidgetRef::Name("TextEdit".to_string())
}

/// Per-layer introspection seam onto the host project.
///
/// `custom_property` exposes the host's untyped annotation store as-is; the
/// provided `property_*` helpers give the typed get-with-default semantics
/// callers actually want. Absent or garbled values fall back to the default,
/// they never error.
pub trait Layer {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn kind(&self) -> LayerKind;
    /// Data source URI of the layer.
    fn source(&self) -> &str;
    /// Attribute fields in definition order. Empty for non-vector layers.
    fn fields(&self) -> &[Field];
    fn custom_property(&self, key: &str) -> Option<Value>;
    /// Serializes the active renderer. Only meaningful for vector layers;
    /// used as a probe for layers with a broken renderer.
    fn renderer_dump(&self) -> Result<String, ProbeError>;

    fn property_bool(&self, key: &str, default: bool) -> bool {
        self.custom_property(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    fn property_i64(&self, key: &str, default: i64) -> i64 {
        self.custom_property(key)
            .and_then(|v| v.as_f64())
            .map(|n| n as i64)
            .unwrap_or(default)
    }
}

/// Project layer-tree seam: layer enumeration in tree order plus per-node
/// visibility lookup.
pub trait LayerTree {
    type Layer: Layer;

    /// All layers reachable from the tree root, in tree order
    /// (top-to-bottom by draw priority).
    fn find_layers(&self) -> Vec<&Self::Layer>;

    /// Whether the tree node holding this layer is checked visible.
    fn is_visible(&self, layer_id: &str) -> bool;
}

//
// In-memory project snapshot
//

/// Renderer state of a snapshot layer: either a serialized description or a
/// broken renderer with the failure reason.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Renderer {
    Dump(String),
    Broken(String),
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::Dump("singleSymbol".to_string())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProjectLayer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub kind: LayerKind,
    #[serde(default)]
    pub source: String,
    /// Tree-node visibility (the checkbox next to the layer), not the
    /// `qgis2web/Visible` custom property.
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub renderer: Renderer,
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}

fn default_true() -> bool {
    true
}

/// Deserializable snapshot of a host project, used by the CLI and tests.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub layers: Vec<ProjectLayer>,
}

impl Project {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn layer(&self, id: &str) -> Option<&ProjectLayer> {
        self.layers.iter().find(|l| l.id == id)
    }
}

impl Layer for ProjectLayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn custom_property(&self, key: &str) -> Option<Value> {
        self.properties.get(key).cloned()
    }

    fn renderer_dump(&self) -> Result<String, ProbeError> {
        match &self.renderer {
            Renderer::Dump(dump) => Ok(dump.clone()),
            Renderer::Broken(reason) => Err(ProbeError::RendererDump {
                layer: self.id.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

impl LayerTree for Project {
    type Layer = ProjectLayer;

    fn find_layers(&self) -> Vec<&ProjectLayer> {
        self.layers.iter().collect()
    }

    fn is_visible(&self, layer_id: &str) -> bool {
        self.layer(layer_id).map(|l| l.visible).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector_layer(id: &str) -> ProjectLayer {
        ProjectLayer {
            id: id.to_string(),
            name: String::new(),
            kind: LayerKind::Vector,
            source: format!("data/{}.geojson", id),
            visible: true,
            fields: Vec::new(),
            renderer: Renderer::default(),
            properties: IndexMap::new(),
        }
    }

    #[test]
    fn hidden_widget_recognized_by_code_and_name() {
        assert!(WidgetRef::Code(HIDDEN_WIDGET_CODE).is_hidden());
        assert!(WidgetRef::Name("Hidden".to_string()).is_hidden());
        assert!(!WidgetRef::Code(0).is_hidden());
        assert!(!WidgetRef::Name("TextEdit".to_string()).is_hidden());
    }

    #[test]
    fn property_helpers_fall_back_on_absent_or_garbled_values() {
        let mut layer = vector_layer("roads");
        assert!(layer.property_bool(VISIBLE_KEY, true));
        assert_eq!(layer.property_i64(CLUSTER_KEY, 0), 0);

        layer
            .properties
            .insert(VISIBLE_KEY.to_string(), Value::Bool(false));
        assert!(!layer.property_bool(VISIBLE_KEY, true));

        // Wrong-typed value falls back to the default
        layer
            .properties
            .insert(CLUSTER_KEY.to_string(), Value::Str("2".to_string()));
        assert_eq!(layer.property_i64(CLUSTER_KEY, 0), 0);
    }

    #[test]
    fn snapshot_yaml_roundtrip() {
        let yaml = r#"
name: demo
layers:
  - id: roads
    kind: vector
    source: data/roads.geojson
    fields:
      - name: id
      - name: secret
        widget: Hidden
    properties:
      "qgis2web/Visible": false
      "qgis2web/Cluster": 2
  - id: dem
    kind: raster
    visible: false
"#;
        let project = Project::from_yaml(yaml).unwrap();
        assert_eq!(project.layers.len(), 2);
        let roads = project.layer("roads").unwrap();
        assert_eq!(roads.kind(), LayerKind::Vector);
        assert!(roads.fields[1].widget.is_hidden());
        assert_eq!(
            roads.custom_property(CLUSTER_KEY),
            Some(Value::Number(2.0))
        );
        assert!(!project.is_visible("dem"));
        assert!(!project.is_visible("missing"));
    }

    #[test]
    fn probe_reports_broken_renderer() {
        let mut layer = vector_layer("roads");
        assert_eq!(layer.renderer_dump().unwrap(), "singleSymbol");

        layer.renderer = Renderer::Broken("style file unreadable".to_string());
        let err = layer.renderer_dump().unwrap_err();
        assert!(err.to_string().contains("style file unreadable"));
    }
}
