use indexmap::IndexMap;
use serde::Serialize;

use crate::project::{Layer, POPUP_PREFIX};
use crate::value::Value;

/// Per-layer popup configuration: field name to configured popup value, in
/// field-definition order. The value is whatever the host's property store
/// holds for the field, or `None` when nothing was configured.
pub type PopupFieldMap = IndexMap<String, Option<Value>>;

/// Popup state of one exported layer.
///
/// The whole-project path gives non-vector layers an empty field map while
/// the raster single-layer path uses an explicit disabled sentinel; both mean
/// "no popups" to callers, and both survive here as distinct variants.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum LayerPopups {
    Fields(PopupFieldMap),
    Disabled(bool),
}

impl LayerPopups {
    pub fn disabled() -> Self {
        LayerPopups::Disabled(false)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            LayerPopups::Fields(map) => map.is_empty(),
            LayerPopups::Disabled(_) => true,
        }
    }
}

/// Builds the popup field map for a vector layer.
///
/// Fields whose edit widget is hidden are excluded entirely; surviving fields
/// are looked up under the `qgis2web/popup/` property prefix. Result order
/// follows field definition order. A layer with no surviving fields yields an
/// empty map, which callers treat the same as disabled.
pub fn resolve_popups<L: Layer>(layer: &L) -> PopupFieldMap {
    let mut popups = PopupFieldMap::new();
    for field in layer.fields() {
        if field.widget.is_hidden() {
            continue;
        }
        let key = format!("{}{}", POPUP_PREFIX, field.name);
        popups.insert(field.name.clone(), layer.custom_property(&key));
    }
    popups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Field, LayerKind, ProjectLayer, Renderer, WidgetRef};
    use indexmap::IndexMap;

    fn layer_with_fields(fields: Vec<Field>) -> ProjectLayer {
        ProjectLayer {
            id: "roads".to_string(),
            name: String::new(),
            kind: LayerKind::Vector,
            source: String::new(),
            visible: true,
            fields,
            renderer: Renderer::default(),
            properties: IndexMap::new(),
        }
    }

    fn field(name: &str, widget: WidgetRef) -> Field {
        Field {
            name: name.to_string(),
            widget,
        }
    }

    #[test]
    fn hidden_fields_are_excluded() {
        let mut layer = layer_with_fields(vec![
            field("id", WidgetRef::Name("TextEdit".to_string())),
            field("name", WidgetRef::Code(0)),
            field("secret", WidgetRef::Name("Hidden".to_string())),
        ]);
        // A popup property on a hidden field must not resurrect it
        layer.properties.insert(
            "qgis2web/popup/secret".to_string(),
            Value::Str("inline label".to_string()),
        );

        let popups = resolve_popups(&layer);
        let keys: Vec<&String> = popups.keys().collect();
        assert_eq!(keys, ["id", "name"]);
    }

    #[test]
    fn entries_follow_field_order_with_configured_values() {
        let mut layer = layer_with_fields(vec![
            field("name", WidgetRef::Code(0)),
            field("id", WidgetRef::Code(0)),
        ]);
        layer.properties.insert(
            "qgis2web/popup/id".to_string(),
            Value::Str("header label".to_string()),
        );

        let popups = resolve_popups(&layer);
        let entries: Vec<(&String, &Option<Value>)> = popups.iter().collect();
        assert_eq!(entries[0].0, "name");
        assert_eq!(entries[0].1, &None);
        assert_eq!(entries[1].0, "id");
        assert_eq!(
            entries[1].1,
            &Some(Value::Str("header label".to_string()))
        );
    }

    #[test]
    fn zero_surviving_fields_yield_an_empty_map() {
        let layer = layer_with_fields(vec![field(
            "secret",
            WidgetRef::Name("Hidden".to_string()),
        )]);
        let popups = resolve_popups(&layer);
        assert!(popups.is_empty());
        assert!(LayerPopups::Fields(popups).is_empty());
        assert!(LayerPopups::disabled().is_empty());
    }

    #[test]
    fn popup_variants_serialize_distinctly() {
        let empty = LayerPopups::Fields(PopupFieldMap::new());
        assert_eq!(serde_json::to_string(&empty).unwrap(), "{}");
        assert_eq!(
            serde_json::to_string(&LayerPopups::disabled()).unwrap(),
            "false"
        );
    }
}
