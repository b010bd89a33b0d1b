use super::Component;
use crate::api::types::CompId;

/// Named render layers for a scene.
///
/// Layers are drawn back-to-front in declaration order: the last one is on
/// top. Entities without a [`LayerComp`] go to the default layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layers {
    names: Vec<String>,
    default: usize,
}

impl Layers {
    /// Replace the layer list. `default` falls back to the first layer when
    /// missing or unknown.
    pub fn new(names: &[&str], default: Option<&str>) -> Self {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        let default = default
            .and_then(|d| names.iter().position(|n| n == d))
            .unwrap_or(0);
        Self { names, default }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Draw index for an optional layer name. Unknown names use the default.
    pub fn resolve(&self, name: Option<&str>) -> usize {
        name.and_then(|n| self.index_of(n)).unwrap_or(self.default)
    }

    pub fn default_index(&self) -> usize {
        self.default
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Layers {
    fn default() -> Self {
        Self::new(&[], None)
    }
}

/// Puts an entity on a named layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerComp {
    pub layer: String,
}

impl LayerComp {
    pub const ID: CompId = "layer";

    pub fn new(layer: impl Into<String>) -> Self {
        Self { layer: layer.into() }
    }
}

impl Component for LayerComp {
    fn id(&self) -> CompId {
        Self::ID
    }

    fn inspect(&self) -> Option<String> {
        Some(format!("layer: {}", self.layer))
    }
}

/// Draw order within a layer. Higher z is drawn later (on top).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZComp {
    pub z: f32,
}

impl ZComp {
    pub const ID: CompId = "z";

    pub fn new(z: f32) -> Self {
        Self { z }
    }
}

impl Component for ZComp {
    fn id(&self) -> CompId {
        Self::ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layer_is_named_default() {
        let layers = Layers::new(&["bg", "obj", "ui"], Some("obj"));
        assert_eq!(layers.default_index(), 1);
        assert_eq!(layers.resolve(None), 1);
        assert_eq!(layers.resolve(Some("nope")), 1);
    }

    #[test]
    fn ordering_is_back_to_front() {
        let layers = Layers::new(&["bg", "obj", "ui"], None);
        assert!(layers.resolve(Some("bg")) < layers.resolve(Some("obj")));
        assert!(layers.resolve(Some("obj")) < layers.resolve(Some("ui")));
        assert_eq!(layers.name(2), Some("ui"));
    }

    #[test]
    fn empty_layers_resolve_to_zero() {
        let layers = Layers::default();
        assert!(layers.is_empty());
        assert_eq!(layers.resolve(Some("anything")), 0);
    }
}
