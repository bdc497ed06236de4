//! Serialisable viewer state

// standard library
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

// crate modules
use crate::coordinates::CoordinateSpace;
use crate::error::{Error, Result};
use crate::layer::{Layer, LocalVolume};

// external crates
use log::{debug, trace};
use serde::Serialize;

/// Everything the viewer needs to display
///
/// Serialises to the viewer's JSON state, with the global coordinate space
/// under `dimensions` and image layers under `layers`.
///
/// ```rust
/// # use voxtools_viewer::{CoordinateSpace, LocalVolume, ViewerState};
/// # use ndarray::Array3;
/// let space = CoordinateSpace::uniform(&["x", "y", "z"], "cm", 10.0).unwrap();
///
/// let mut state = ViewerState::default();
/// state.dimensions = Some(space.clone());
/// state
///     .append_layer("scatter_angle", LocalVolume::new(Array3::zeros((2, 2, 2)), space).unwrap())
///     .unwrap();
///
/// let json = state.to_json().unwrap();
/// assert!(json.contains(r#""x": ["#));
/// assert!(json.contains(r#""name": "scatter_angle""#));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ViewerState {
    /// Global coordinate space, left to the viewer if unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<CoordinateSpace>,
    layers: Vec<Layer>,
}

// Public API
impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new image layer on top of the existing ones
    ///
    /// Layer names are unique within a state.
    pub fn append_layer(&mut self, name: &str, volume: LocalVolume) -> Result<()> {
        if self.layer(name).is_some() {
            return Err(Error::DuplicateLayer(name.to_string()));
        }

        let layer = Layer::new(name, volume);
        debug!("Adding layer {layer}");
        self.layers.push(layer);
        Ok(())
    }

    /// Find a layer by name
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Remove a layer by name, returning it if it existed
    pub fn remove_layer(&mut self, name: &str) -> Option<Layer> {
        let index = self.layers.iter().position(|l| l.name == name)?;
        Some(self.layers.remove(index))
    }

    /// All layers in display order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Pretty JSON string of the state
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the state to a pretty JSON file
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        trace!("Writing viewer state to {}", path.display());
        serde_json::to_writer_pretty(init_writer(path)?, self)?;
        Ok(())
    }
}

fn init_writer(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use serde_json::json;

    fn volume() -> LocalVolume {
        let space = CoordinateSpace::uniform(&["x", "y", "z"], "m", 1.0).unwrap();
        LocalVolume::new(Array3::zeros((1, 1, 1)), space).unwrap()
    }

    #[test]
    fn empty_state() {
        let state = ViewerState::new();
        assert_eq!(serde_json::to_value(&state).unwrap(), json!({"layers": []}));
    }

    #[test]
    fn duplicate_layers() {
        let mut state = ViewerState::new();
        state.append_layer("a", volume()).unwrap();

        let result = state.append_layer("a", volume());
        assert!(matches!(result, Err(Error::DuplicateLayer(name)) if name == "a"));
        assert_eq!(state.layers().len(), 1);
    }

    #[test]
    fn layer_order_and_removal() {
        let mut state = ViewerState::new();
        state.append_layer("a", volume()).unwrap();
        state.append_layer("b", volume()).unwrap();
        state.append_layer("c", volume()).unwrap();

        assert!(state.remove_layer("b").is_some());
        assert!(state.remove_layer("b").is_none());

        let names: Vec<&str> = state.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }
}
