pub mod to_leaflet;
pub mod to_openlayers;

use crate::writer::{MapFormat, MapWriter};

/// Returns the writer implementation for the resolved map format.
pub fn create(format: MapFormat) -> Box<dyn MapWriter> {
    match format {
        MapFormat::OpenLayers => Box::new(to_openlayers::OpenLayersWriter),
        MapFormat::Leaflet => Box::new(to_leaflet::LeafletWriter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_dispatches_on_format() {
        // Both formats must resolve to a writer without panicking
        let _ = create(MapFormat::OpenLayers);
        let _ = create(MapFormat::Leaflet);
    }
}
