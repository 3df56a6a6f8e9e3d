use crate::blend::{blend_grids, merge_layers, BlendMode};
use crate::color::Color;
use crate::error::{EditorError, Result};
use crate::grid::CanvasGrid;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub type LayerId = Uuid;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    /// Shared between history snapshots until a paint replaces it.
    pub pixels: Arc<CanvasGrid>,
    /// Compositing weight, 0 to 100.
    pub opacity: u8,
    pub visible: bool,
    pub locked: bool,
    pub blend_mode: BlendMode,
    pub alpha_lock: bool,
}

impl Layer {
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self::with_pixels(name, CanvasGrid::new(width, height))
    }

    pub fn with_pixels(name: impl Into<String>, pixels: CanvasGrid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            pixels: Arc::new(pixels),
            opacity: 100,
            visible: true,
            locked: false,
            blend_mode: BlendMode::Normal,
            alpha_lock: false,
        }
    }

    pub fn opacity_weight(&self) -> f32 {
        self.opacity.min(100) as f32 / 100.0
    }
}

/// Whether a paint at `(x, y)` is allowed on this layer under its alpha lock.
pub fn apply_alpha_lock(layer: &Layer, x: i32, y: i32) -> bool {
    !layer.alpha_lock || layer.pixels.get(x, y).is_some_and(|c| !c.is_transparent())
}

/// Partial field set for `LayerStack::update_layer`; `None` leaves a field untouched.
#[derive(Clone, Default, Debug)]
pub struct LayerUpdate {
    pub name: Option<String>,
    pub opacity: Option<u8>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub blend_mode: Option<BlendMode>,
    pub alpha_lock: Option<bool>,
    pub pixels: Option<CanvasGrid>,
}

/// The document's ordered layers. Index 0 is the bottom of the stack.
///
/// Cloning is cheap: layer grids are reference counted, so a history snapshot of the
/// stack only copies the grids that a later edit replaces.
#[derive(Clone, PartialEq, Debug)]
pub struct LayerStack {
    width: usize,
    height: usize,
    layers: Vec<Layer>,
}

impl LayerStack {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            layers: vec![Layer::new("Layer 1", width, height)],
        }
    }

    pub fn from_layers(width: usize, height: usize, layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(EditorError::LastLayer);
        }
        for layer in &layers {
            check_dimensions((width, height), layer.pixels.dimensions())?;
        }
        Ok(Self {
            width,
            height,
            layers,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn find(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    pub fn top(&self) -> Option<&Layer> {
        self.layers.last()
    }

    fn require(&self, id: LayerId) -> Result<usize> {
        self.index_of(id).ok_or(EditorError::LayerNotFound(id))
    }

    /// Adds a layer on top of the stack and returns its id.
    pub fn add_layer(&mut self, name: Option<&str>, pixels: Option<CanvasGrid>) -> Result<LayerId> {
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| format!("Layer {}", self.layers.len() + 1));
        let pixels = match pixels {
            Some(grid) => {
                check_dimensions((self.width, self.height), grid.dimensions())?;
                grid
            }
            None => CanvasGrid::new(self.width, self.height),
        };
        let layer = Layer::with_pixels(name, pixels);
        let id = layer.id;
        log::debug!("adding layer {:?} ({})", layer.name, id);
        self.layers.push(layer);
        Ok(id)
    }

    /// Copies a layer, placing the copy directly above the source.
    pub fn duplicate_layer(&mut self, id: LayerId) -> Result<LayerId> {
        let index = self.require(id)?;
        let source = &self.layers[index];
        let copy = Layer {
            id: Uuid::new_v4(),
            name: format!("{} copy", source.name),
            pixels: Arc::new(source.pixels.as_ref().clone()),
            ..source.clone()
        };
        let copy_id = copy.id;
        self.layers.insert(index + 1, copy);
        Ok(copy_id)
    }

    /// Moves a layer to `to`, keeping the relative order of the others.
    pub fn move_layer(&mut self, id: LayerId, to: usize) -> Result<()> {
        let from = self.require(id)?;
        let layer = self.layers.remove(from);
        let to = to.min(self.layers.len());
        self.layers.insert(to, layer);
        Ok(())
    }

    pub fn update_layer(&mut self, id: LayerId, update: LayerUpdate) -> Result<()> {
        let index = self.require(id)?;
        if let Some(grid) = &update.pixels {
            check_dimensions((self.width, self.height), grid.dimensions())?;
        }
        let layer = &mut self.layers[index];
        if let Some(name) = update.name {
            layer.name = name;
        }
        if let Some(opacity) = update.opacity {
            layer.opacity = opacity.min(100);
        }
        if let Some(visible) = update.visible {
            layer.visible = visible;
        }
        if let Some(locked) = update.locked {
            layer.locked = locked;
        }
        if let Some(mode) = update.blend_mode {
            layer.blend_mode = mode;
        }
        if let Some(alpha_lock) = update.alpha_lock {
            layer.alpha_lock = alpha_lock;
        }
        if let Some(grid) = update.pixels {
            layer.pixels = Arc::new(grid);
        }
        Ok(())
    }

    /// Removes a layer. The last remaining layer can't be deleted.
    pub fn delete_layer(&mut self, id: LayerId) -> Result<Layer> {
        let index = self.require(id)?;
        if self.layers.len() == 1 {
            return Err(EditorError::LastLayer);
        }
        log::debug!("deleting layer {}", id);
        Ok(self.layers.remove(index))
    }

    /// Replaces every layer with a single composite of the visible ones.
    pub fn flatten(&mut self) -> LayerId {
        let merged = self.composite();
        let layer = Layer::with_pixels("Flattened", merged);
        let id = layer.id;
        log::info!("flattened {} layers into {}", self.layers.len(), id);
        self.layers = vec![layer];
        id
    }

    /// Composites a layer onto the one below it and removes it.
    /// Returns the id of the surviving lower layer.
    pub fn merge_down(&mut self, id: LayerId) -> Result<LayerId> {
        let index = self.require(id)?;
        if index == 0 {
            return Err(EditorError::NoLayerBelow(id));
        }
        let upper = self.layers.remove(index);
        let lower = &mut self.layers[index - 1];
        if upper.visible {
            let merged = blend_grids(
                &lower.pixels,
                &upper.pixels,
                upper.blend_mode,
                upper.opacity_weight(),
            );
            lower.pixels = Arc::new(merged);
        }
        Ok(lower.id)
    }

    /// The single paint entry point: refuses locked layers and, under alpha lock,
    /// drops any write to a cell that was transparent before the edit.
    pub fn paint(
        &mut self,
        id: LayerId,
        edit: impl FnOnce(&CanvasGrid) -> CanvasGrid,
    ) -> Result<()> {
        let index = self.require(id)?;
        let layer = &mut self.layers[index];
        if layer.locked {
            return Err(EditorError::LayerLocked(id));
        }
        let before = Arc::clone(&layer.pixels);
        let mut after = edit(&before);
        check_dimensions((self.width, self.height), after.dimensions())?;

        if layer.alpha_lock {
            for y in 0..self.height as i32 {
                for x in 0..self.width as i32 {
                    if !apply_alpha_lock(layer, x, y) {
                        after.put_pixel(x, y, Color::Transparent);
                    }
                }
            }
        }
        if after != *before {
            layer.pixels = Arc::new(after);
        }
        Ok(())
    }

    /// Applies a dimension-changing (or not) transform to every layer at once.
    pub fn map_grids(&mut self, f: impl Fn(&CanvasGrid) -> CanvasGrid) {
        for layer in &mut self.layers {
            layer.pixels = Arc::new(f(&layer.pixels));
        }
        if let Some(first) = self.layers.first() {
            (self.width, self.height) = first.pixels.dimensions();
        }
    }

    pub fn composite(&self) -> CanvasGrid {
        merge_layers(&self.layers, self.width, self.height)
    }
}

fn check_dimensions(expected: (usize, usize), found: (usize, usize)) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(EditorError::DimensionMismatch { expected, found })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{draw_line, draw_rectangle};

    const RED: Color = Color::Rgb(255, 0, 0);
    const BLUE: Color = Color::Rgb(0, 0, 255);

    #[test]
    fn new_layer_defaults() {
        let layer = Layer::new("Background", 4, 4);
        assert_eq!(layer.opacity, 100);
        assert!(layer.visible);
        assert!(!layer.locked);
        assert!(!layer.alpha_lock);
        assert_eq!(layer.blend_mode, BlendMode::Normal);
        assert!(layer.pixels.is_empty());
    }

    #[test]
    fn add_and_lookup() {
        let mut stack = LayerStack::new(4, 4);
        let id = stack.add_layer(None, None).unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.index_of(id), Some(1));
        assert_eq!(stack.find(id).unwrap().name, "Layer 2");
        assert_eq!(stack.top().unwrap().id, id);

        let wrong = CanvasGrid::new(3, 4);
        assert!(matches!(
            stack.add_layer(Some("bad"), Some(wrong)),
            Err(EditorError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn duplicate_is_a_deep_copy_above_source() {
        let mut stack = LayerStack::new(2, 2);
        let base = stack.get(0).unwrap().id;
        stack
            .update_layer(base, LayerUpdate { opacity: Some(40), ..Default::default() })
            .unwrap();
        let copy = stack.duplicate_layer(base).unwrap();
        assert_ne!(copy, base);
        assert_eq!(stack.index_of(copy), Some(1));
        let layer = stack.find(copy).unwrap();
        assert_eq!(layer.name, "Layer 1 copy");
        assert_eq!(layer.opacity, 40);
        assert!(!Arc::ptr_eq(&layer.pixels, &stack.find(base).unwrap().pixels));
    }

    #[test]
    fn move_preserves_relative_order() {
        let mut stack = LayerStack::new(1, 1);
        let a = stack.get(0).unwrap().id;
        let b = stack.add_layer(None, None).unwrap();
        let c = stack.add_layer(None, None).unwrap();
        stack.move_layer(a, 2).unwrap();
        let ids: Vec<_> = stack.layers().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![b, c, a]);
        stack.move_layer(a, 99).unwrap();
        assert_eq!(stack.index_of(a), Some(2));
    }

    #[test]
    fn cannot_delete_last_layer() {
        let mut stack = LayerStack::new(2, 2);
        let only = stack.get(0).unwrap().id;
        assert!(matches!(stack.delete_layer(only), Err(EditorError::LastLayer)));
        let extra = stack.add_layer(None, None).unwrap();
        stack.delete_layer(only).unwrap();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.get(0).unwrap().id, extra);
        assert!(matches!(
            stack.delete_layer(Uuid::new_v4()),
            Err(EditorError::LayerNotFound(_))
        ));
    }

    #[test]
    fn paint_respects_lock() {
        let mut stack = LayerStack::new(3, 3);
        let id = stack.get(0).unwrap().id;
        stack.update_layer(id, LayerUpdate { locked: Some(true), ..Default::default() }).unwrap();
        let err = stack.paint(id, |g| draw_line(g, 0, 0, 2, 2, RED));
        assert!(matches!(err, Err(EditorError::LayerLocked(_))));
        assert!(stack.get(0).unwrap().pixels.is_empty());
    }

    #[test]
    fn paint_respects_alpha_lock() {
        let mut stack = LayerStack::new(3, 3);
        let id = stack.get(0).unwrap().id;
        stack.paint(id, |g| draw_rectangle(g, 0, 0, 0, 2, BLUE, true)).unwrap();
        stack
            .update_layer(id, LayerUpdate { alpha_lock: Some(true), ..Default::default() })
            .unwrap();
        assert!(apply_alpha_lock(stack.get(0).unwrap(), 0, 1));
        assert!(!apply_alpha_lock(stack.get(0).unwrap(), 1, 1));

        stack.paint(id, |g| draw_line(g, 0, 1, 2, 1, RED)).unwrap();
        let pixels = &stack.get(0).unwrap().pixels;
        assert_eq!(pixels.get(0, 1), Some(RED));
        assert_eq!(pixels.get(1, 1), Some(Color::Transparent));
        assert_eq!(pixels.get(2, 1), Some(Color::Transparent));
    }

    #[test]
    fn snapshots_are_not_disturbed_by_paint() {
        let mut stack = LayerStack::new(2, 2);
        let id = stack.get(0).unwrap().id;
        let snapshot = stack.clone();
        stack.paint(id, |g| g.with_pixel(0, 0, RED)).unwrap();
        assert!(snapshot.get(0).unwrap().pixels.is_empty());
        assert_eq!(stack.get(0).unwrap().pixels.get(0, 0), Some(RED));
    }

    #[test]
    fn flatten_merges_visible_layers() {
        let mut stack = LayerStack::new(2, 1);
        let bottom = stack.get(0).unwrap().id;
        stack.paint(bottom, |g| g.with_pixel(0, 0, BLUE)).unwrap();
        let hidden = stack.add_layer(None, None).unwrap();
        stack.paint(hidden, |g| g.with_pixel(1, 0, RED)).unwrap();
        stack.update_layer(hidden, LayerUpdate { visible: Some(false), ..Default::default() }).unwrap();

        let id = stack.flatten();
        assert_eq!(stack.len(), 1);
        let layer = stack.get(0).unwrap();
        assert_eq!(layer.id, id);
        assert_eq!(layer.name, "Flattened");
        assert_eq!(layer.pixels.to_rows(), vec![vec![BLUE, Color::Transparent]]);
    }

    #[test]
    fn merge_down_blends_into_lower() {
        let mut stack = LayerStack::new(1, 1);
        let lower = stack.get(0).unwrap().id;
        stack.paint(lower, |g| g.with_pixel(0, 0, BLUE)).unwrap();
        let upper = stack.add_layer(None, None).unwrap();
        stack.paint(upper, |g| g.with_pixel(0, 0, RED)).unwrap();
        stack.update_layer(upper, LayerUpdate { opacity: Some(50), ..Default::default() }).unwrap();

        assert_eq!(stack.merge_down(upper).unwrap(), lower);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.get(0).unwrap().pixels.get(0, 0), Some(Color::Rgb(128, 0, 128)));
        assert!(matches!(stack.merge_down(lower), Err(EditorError::NoLayerBelow(_))));
    }
}
