use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::{ParamKind, Value};

/// Nested default-configuration table: group name → parameter name → default.
/// Insertion order is load-bearing; the generated form keeps table order.
pub type ParamTable = IndexMap<String, IndexMap<String, Value>>;

/// One user-configurable parameter of the generated schema.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ParamSpec {
    pub group: String,
    pub name: String,
    pub kind: ParamKind,
    pub default: Value,
}

/// The three export operations exposed to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    Project,
    VectorLayer,
    RasterLayer,
}

/// Built-in defaults table for the writer configuration.
pub fn default_params() -> ParamTable {
    let mut params = ParamTable::new();

    let mut data_export = IndexMap::new();
    data_export.insert("Exporter".to_string(), Value::from("Export to folder"));
    data_export.insert("Mapping library location".to_string(), Value::from("Local"));
    data_export.insert("Minify GeoJSON files".to_string(), Value::from(false));
    data_export.insert("Precision".to_string(), Value::from("maintain"));
    params.insert("Data export".to_string(), data_export);

    let mut scale_zoom = IndexMap::new();
    scale_zoom.insert("Extent".to_string(), Value::from("Fit to layers extent"));
    scale_zoom.insert("Max zoom level".to_string(), Value::from(28));
    scale_zoom.insert("Min zoom level".to_string(), Value::from(1));
    scale_zoom.insert("Restrict to extent".to_string(), Value::from(false));
    params.insert("Scale/Zoom".to_string(), scale_zoom);

    let mut appearance = IndexMap::new();
    appearance.insert("Add address search".to_string(), Value::from(false));
    appearance.insert("Add layers list".to_string(), Value::from(false));
    appearance.insert("Geolocate user".to_string(), Value::from(false));
    appearance.insert("Highlight on hover".to_string(), Value::from(false));
    appearance.insert("Layer search".to_string(), Value::from("None"));
    appearance.insert("Match project CRS".to_string(), Value::from(false));
    appearance.insert("Measure tool".to_string(), Value::from("None"));
    appearance.insert("Show popups on hover".to_string(), Value::from(false));
    appearance.insert("Template".to_string(), Value::from("full-screen"));
    params.insert("Appearance".to_string(), appearance);

    params
}

/// Generates the flat parameter schema from a defaults table.
///
/// Pure function: iterates groups and parameters in table order and classifies
/// each default by its runtime type (boolean before number, everything else a
/// string). The input table is never mutated.
pub fn build_schema(defaults: &ParamTable) -> Vec<ParamSpec> {
    let mut schema = Vec::new();
    for (group, settings) in defaults {
        for (name, default) in settings {
            schema.push(ParamSpec {
                group: group.clone(),
                name: name.clone(),
                kind: default.kind(),
                default: default.clone(),
            });
        }
    }
    schema
}

/// Full input form of an operation: the fixed, non-generated parameters
/// followed by the schema generated from the defaults table. The
/// whole-project operation takes nothing beyond the format choice.
pub fn operation_parameters(kind: OperationKind, defaults: &ParamTable) -> Vec<ParamSpec> {
    let fixed_group = "Input";
    let mut specs = vec![ParamSpec {
        group: fixed_group.to_string(),
        name: "MAP_FORMAT".to_string(),
        kind: ParamKind::String,
        default: Value::from("OpenLayers"),
    }];

    match kind {
        OperationKind::Project => return specs,
        OperationKind::VectorLayer => {
            specs.push(ParamSpec {
                group: fixed_group.to_string(),
                name: "INPUT_LAYER".to_string(),
                kind: ParamKind::String,
                default: Value::from(""),
            });
            specs.push(ParamSpec {
                group: fixed_group.to_string(),
                name: "VISIBLE".to_string(),
                kind: ParamKind::Boolean,
                default: Value::from(true),
            });
            specs.push(ParamSpec {
                group: fixed_group.to_string(),
                name: "CLUSTER".to_string(),
                kind: ParamKind::Boolean,
                default: Value::from(false),
            });
        }
        OperationKind::RasterLayer => {
            specs.push(ParamSpec {
                group: fixed_group.to_string(),
                name: "INPUT_LAYER".to_string(),
                kind: ParamKind::String,
                default: Value::from(""),
            });
            specs.push(ParamSpec {
                group: fixed_group.to_string(),
                name: "VISIBLE".to_string(),
                kind: ParamKind::Boolean,
                default: Value::from(true),
            });
        }
    }

    specs.extend(build_schema(defaults));
    specs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_defaults() -> ParamTable {
        let mut settings = IndexMap::new();
        settings.insert("Minify GeoJSON files".to_string(), Value::from(true));
        settings.insert("Precision".to_string(), Value::from(4));
        settings.insert("Template".to_string(), Value::from("canvas"));
        let mut table = ParamTable::new();
        table.insert("Data export".to_string(), settings);
        table
    }

    #[test]
    fn schema_infers_kinds_in_table_order() {
        let schema = build_schema(&sample_defaults());
        let kinds: Vec<ParamKind> = schema.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            [ParamKind::Boolean, ParamKind::Number, ParamKind::String]
        );
        let names: Vec<&str> = schema.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Minify GeoJSON files", "Precision", "Template"]);
    }

    #[test]
    fn build_schema_is_pure_and_idempotent() {
        let defaults = sample_defaults();
        let before = defaults.clone();
        let first = build_schema(&defaults);
        let second = build_schema(&defaults);
        assert_eq!(first, second);
        assert_eq!(defaults, before);
    }

    #[test]
    fn default_table_keeps_group_order() {
        let defaults = default_params();
        let groups: Vec<&String> = defaults.keys().collect();
        assert_eq!(groups, ["Data export", "Scale/Zoom", "Appearance"]);
        assert_eq!(
            defaults["Scale/Zoom"]["Max zoom level"],
            Value::Number(28.0)
        );
    }

    #[test]
    fn vector_operation_declares_fixed_parameters_first() {
        let specs = operation_parameters(OperationKind::VectorLayer, &default_params());
        let names: Vec<&str> = specs.iter().take(4).map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["MAP_FORMAT", "INPUT_LAYER", "VISIBLE", "CLUSTER"]);
        assert_eq!(specs[0].default, Value::Str("OpenLayers".to_string()));
        assert!(specs.len() > 4);
    }

    #[test]
    fn raster_operation_has_no_cluster_parameter() {
        let specs = operation_parameters(OperationKind::RasterLayer, &default_params());
        assert!(specs.iter().all(|s| s.name != "CLUSTER"));
    }

    #[test]
    fn project_operation_only_takes_the_format_choice() {
        let specs = operation_parameters(OperationKind::Project, &default_params());
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "MAP_FORMAT");
    }
}
