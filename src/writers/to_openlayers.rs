use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;

use crate::common::{get_handlebars, write_string_to_file};
use crate::errors::ExportError;
use crate::writer::MapWriter;

pub struct OpenLayersWriter;

impl MapWriter for OpenLayersWriter {
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
    <title>OpenLayers map</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/ol/ol.css">
    <script src="https://cdn.jsdelivr.net/npm/ol/dist/ol.js"></script>
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
      var map = new ol.Map({
        target: "map",
        view: new ol.View({ center: [0, 0], zoom: 2 })
      });
    </script>
  </body>
</html>
"##
}
