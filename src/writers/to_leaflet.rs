use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;

use crate::common::{get_handlebars, write_string_to_file};
use crate::errors::ExportError;
use crate::writer::MapWriter;

pub struct LeafletWriter;

impl MapWriter for LeafletWriter {
    fn write(&self, context: &JsonValue, destination: &Path) -> Result<PathBuf, ExportError> {
        let html = render(context)?;
        let path = destination.join("index.html");
        write_string_to_file(&path, &html)?;
        Ok(path)
    }
}

pub fn render(context: &JsonValue) -> Result<String, ExportError> {
    let handlebars = get_handlebars();
    Ok(handlebars.render_template(get_template(), context)?)
}

fn get_template() -> &'static str {
    r##"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Leaflet map</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet/dist/leaflet.css">
    <script src="https://unpkg.com/leaflet/dist/leaflet.js"></script>
  </head>
  <body>
    <div id="map"></div>
    <script>
      var options = {{{json params}}};
      var layerDefs = [
      {{#each layers as |layer|}}
        {
          id: "{{layer.id}}",
          name: "{{layer.name}}",
          kind: "{{layer.kind}}",
          source: "{{layer.source}}",
          visible: {{lookup ../visible @index}},
          json: {{lookup ../json @index}},
          cluster: {{lookup ../cluster @index}},
          popup: {{{json (lookup ../popups @index)}}}
        },
      {{/each}}
      ];
      var map = L.map("map").setView([0, 0], 2);
    </script>
  </body>
</html>
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn template_can_render() {
        let context = json!({
            "params": {"Scale/Zoom": {"Max zoom level": 28}},
            "layers": [
                {"id": "roads", "name": "Roads", "kind": "vector", "source": "data/roads.geojson"}
            ],
            "groups": {},
            "popups": [{}],
            "visible": [true],
            "json": [true],
            "cluster": [true],
        });
        let html = render(&context).expect("This to render");
        assert!(html.contains(r#"id: "roads""#));
        assert!(html.contains("cluster: true"));
        assert!(html.contains("popup: {}"));
        assert!(html.contains(r#"L.map("map")"#));
    }
}
