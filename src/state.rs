use crate::blend::merge_layers;
use crate::color::Color;
use crate::commands::{Command, KeyPress, Keybindings};
use crate::config::EditorConfig;
use crate::dither::{should_draw_dithered, DitherPattern, BRUSH_DENSITY};
use crate::document::DocumentMeta;
use crate::error::{EditorError, Result};
use crate::grid::{stamp_cells, CanvasGrid, Point};
use crate::history::History;
use crate::layers::{LayerId, LayerStack, LayerUpdate};
use crate::palette::PaletteLibrary;
use crate::tools::{
    draw_circle, draw_line, draw_rectangle, flip_horizontal, flip_vertical, flood_fill,
    global_fill, line_points_within, paste_pixels, rotate_clockwise, PointerPhase, Selection,
    SelectionBounds, Tool, ToolInput,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FillMode {
    #[default]
    Contiguous,
    Global,
}

pub struct ToolSettings {
    pub brush_size: u32,
    pub shape_filled: bool,
    pub fill_mode: FillMode,
    pub dither: Option<DitherPattern>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            brush_size: 1,
            shape_filled: false,
            fill_mode: FillMode::Contiguous,
            dither: None,
        }
    }
}

/// What the external renderer needs to paint one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSurface {
    pub grid: CanvasGrid,
    pub width: usize,
    pub height: usize,
    pub pixel_size: u32,
    pub show_grid: bool,
}

// Everything a stroke needs, copied out of the editor so the layer stack can be
// borrowed mutably while painting.
#[derive(Clone, Copy)]
struct Brush {
    color: Color,
    size: u32,
    filled: bool,
    fill_mode: FillMode,
    dither: Option<DitherPattern>,
}

struct Gesture {
    tool: Tool,
    layer: LayerId,
    start: Point,
    last: Point,
    /// Stack as it was before the gesture; shape tools redraw from here.
    base: LayerStack,
    /// Whether this gesture has pushed its history entry yet.
    committed: bool,
    lasso: Vec<Point>,
}

pub struct Editor {
    config: EditorConfig,
    history: History<LayerStack>,
    active_layer: LayerId,
    pub meta: DocumentMeta,
    pub active_tool: Tool,
    pub tool_settings: ToolSettings,
    pub keybindings: Keybindings,
    pub primary_color: Color,
    pub secondary_color: Color,
    pub palettes: PaletteLibrary,
    pub show_grid: bool,
    pub pixel_size: u32,
    pub selection: Selection,
    clipboard: Option<CanvasGrid>,
    gesture: Option<Gesture>,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let stack = LayerStack::new(config.default_width, config.default_height);
        Self::from_parts(config, stack, None, PaletteLibrary::with_defaults(), DocumentMeta::new())
    }

    pub fn with_size(width: usize, height: usize, config: EditorConfig) -> Self {
        let config = EditorConfig {
            default_width: width,
            default_height: height,
            ..config
        };
        Self::new(config)
    }

    pub(crate) fn from_parts(
        config: EditorConfig,
        stack: LayerStack,
        active_layer: Option<LayerId>,
        palettes: PaletteLibrary,
        meta: DocumentMeta,
    ) -> Self {
        let active_layer = active_layer
            .filter(|id| stack.find(*id).is_some())
            .or_else(|| stack.top().map(|l| l.id))
            .unwrap_or_default();
        let primary_color = palettes
            .active()
            .and_then(|p| p.colors.first().copied())
            .unwrap_or(Color::BLACK);

        Self {
            history: History::new(stack, config.max_history),
            active_layer,
            meta,
            active_tool: Tool::default(),
            tool_settings: ToolSettings::default(),
            keybindings: Keybindings::default(),
            primary_color,
            secondary_color: Color::Transparent,
            palettes,
            show_grid: config.show_grid,
            pixel_size: config.pixel_size,
            selection: Selection::default(),
            clipboard: None,
            gesture: None,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn layers(&self) -> &LayerStack {
        self.history.current()
    }

    pub fn history(&self) -> &History<LayerStack> {
        &self.history
    }

    pub fn width(&self) -> usize {
        self.layers().width()
    }

    pub fn height(&self) -> usize {
        self.layers().height()
    }

    pub fn active_layer_id(&self) -> LayerId {
        self.active_layer
    }

    pub fn set_active_layer(&mut self, id: LayerId) -> Result<()> {
        if self.layers().find(id).is_none() {
            return Err(EditorError::LayerNotFound(id));
        }
        self.active_layer = id;
        Ok(())
    }

    pub fn clipboard(&self) -> Option<&CanvasGrid> {
        self.clipboard.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn composite(&self) -> CanvasGrid {
        let stack = self.layers();
        merge_layers(stack.layers(), stack.width(), stack.height())
    }

    pub fn render_surface(&self) -> RenderSurface {
        RenderSurface {
            grid: self.composite(),
            width: self.width(),
            height: self.height(),
            pixel_size: self.pixel_size,
            show_grid: self.show_grid,
        }
    }

    /// Pushes a finished edit as a new undo step.
    fn commit(&mut self, stack: LayerStack) {
        self.history.set_state(stack, false);
        self.ensure_active_layer();
    }

    fn ensure_active_layer(&mut self) {
        if self.layers().find(self.active_layer).is_none() {
            if let Some(top) = self.layers().top() {
                self.active_layer = top.id;
            }
        }
    }

    fn brush(&self) -> Brush {
        Brush {
            color: self.primary_color,
            size: self.tool_settings.brush_size,
            filled: self.tool_settings.shape_filled,
            fill_mode: self.tool_settings.fill_mode,
            dither: self.tool_settings.dither,
        }
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    /// Feeds one pointer sample. A start opens a gesture, moves extend it and an end
    /// closes it; every pixel change of one gesture lands in a single undo step.
    pub fn pointer(&mut self, input: ToolInput) -> Result<()> {
        match input.phase {
            PointerPhase::Start => self.begin_gesture(input.point),
            PointerPhase::Move => self.extend_gesture(input.point),
            PointerPhase::End => {
                let extended = self.extend_gesture(input.point);
                self.finish_gesture();
                extended
            }
        }
    }

    /// Ends a gesture abandoned mid-drag, keeping whatever it already drew.
    pub fn cancel_stroke(&mut self) {
        self.finish_gesture();
    }

    fn begin_gesture(&mut self, p: Point) -> Result<()> {
        if self.gesture.is_some() {
            self.finish_gesture();
        }
        let tool = self.active_tool;
        let base = self.layers().clone();

        match tool {
            Tool::Eyedropper => self.pick_color(p),
            Tool::Select => self.selection = Selection::rect(SelectionBounds::from_corners(p, p)),
            Tool::Lasso => self.selection.clear(),
            _ => {
                if let Some(layer) = base.find(self.active_layer) {
                    if layer.locked {
                        return Err(EditorError::LayerLocked(layer.id));
                    }
                }
            }
        }

        self.gesture = Some(Gesture {
            tool,
            layer: self.active_layer,
            start: p,
            last: p,
            base,
            committed: false,
            lasso: vec![p],
        });

        if tool.edits_pixels() {
            self.apply_stroke(p)?;
        }
        Ok(())
    }

    fn extend_gesture(&mut self, p: Point) -> Result<()> {
        let Some(gesture) = self.gesture.as_mut() else {
            return Ok(());
        };
        let tool = gesture.tool;
        match tool {
            Tool::Eyedropper => {
                gesture.last = p;
                self.pick_color(p);
            }
            Tool::Select => {
                let start = gesture.start;
                gesture.last = p;
                self.selection = Selection::rect(SelectionBounds::from_corners(start, p));
            }
            Tool::Lasso => {
                if gesture.lasso.last() != Some(&p) {
                    gesture.lasso.push(p);
                }
                gesture.last = p;
                self.selection = Selection::lasso(gesture.lasso.clone());
            }
            // Fill happens once, on pointer down
            Tool::Fill => {}
            _ => {
                if p != gesture.last {
                    self.apply_stroke(p)?;
                }
            }
        }
        Ok(())
    }

    fn finish_gesture(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            log::debug!(
                "{} gesture ended at ({}, {}), committed: {}",
                gesture.tool.name(),
                gesture.last.x,
                gesture.last.y,
                gesture.committed
            );
        }
    }

    /// Paints the gesture up to `p` and records it: the first change of a gesture
    /// pushes a history entry, later ones overwrite that entry.
    fn apply_stroke(&mut self, p: Point) -> Result<()> {
        let brush = self.brush();
        let Some(gesture) = self.gesture.as_mut() else {
            return Ok(());
        };

        let mut next = if gesture.tool.is_shape() {
            gesture.base.clone()
        } else {
            self.history.current().clone()
        };
        paint_stroke(&mut next, gesture.layer, gesture.tool, gesture.start, gesture.last, p, brush)?;
        gesture.last = p;

        if gesture.committed {
            self.history.set_state(next, true);
        } else if next != *self.history.current() {
            gesture.committed = true;
            self.history.set_state(next, false);
        }
        Ok(())
    }

    fn pick_color(&mut self, p: Point) {
        match self.composite().get(p.x, p.y) {
            Some(color) if !color.is_transparent() => self.primary_color = color,
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Runs the command bound to a key press, returning which one ran.
    pub fn key(&mut self, press: KeyPress) -> Result<Option<Command>> {
        let Some(command) = self.keybindings.resolve(&press) else {
            return Ok(None);
        };
        self.execute(command)?;
        Ok(Some(command))
    }

    pub fn execute(&mut self, command: Command) -> Result<()> {
        // A command in the middle of a drag closes the drag first
        self.finish_gesture();
        log::debug!("command: {}", command.name());

        match command {
            Command::SelectTool(tool) => {
                self.active_tool = tool;
                self.selection.clear();
            }
            Command::Undo => {
                if self.history.undo() {
                    self.ensure_active_layer();
                }
            }
            Command::Redo => {
                if self.history.redo() {
                    self.ensure_active_layer();
                }
            }
            Command::ToggleGrid => self.show_grid = !self.show_grid,
            Command::Copy => self.copy_selection(),
            Command::Cut => self.cut_selection()?,
            Command::Paste => self.paste()?,
            Command::ClearSelection => self.selection.clear(),
            Command::ClearCanvas => self.clear_canvas(),
            Command::RotateClockwise => self.transform_canvas(rotate_clockwise),
            Command::FlipHorizontal => self.transform_canvas(flip_horizontal),
            Command::FlipVertical => self.transform_canvas(flip_vertical),
            Command::AddLayer => {
                let mut next = self.layers().clone();
                let id = next.add_layer(None, None)?;
                self.commit(next);
                self.active_layer = id;
            }
            Command::DuplicateLayer => {
                let mut next = self.layers().clone();
                let id = next.duplicate_layer(self.active_layer)?;
                self.commit(next);
                self.active_layer = id;
            }
            Command::DeleteLayer => {
                let mut next = self.layers().clone();
                let index = next.index_of(self.active_layer).unwrap_or(0);
                next.delete_layer(self.active_layer)?;
                let below = next.get(index.saturating_sub(1)).map(|l| l.id);
                self.commit(next);
                if let Some(id) = below {
                    self.active_layer = id;
                }
            }
            Command::MergeDown => {
                let mut next = self.layers().clone();
                let id = next.merge_down(self.active_layer)?;
                self.commit(next);
                self.active_layer = id;
            }
            Command::Flatten => {
                let mut next = self.layers().clone();
                let id = next.flatten();
                self.commit(next);
                self.active_layer = id;
            }
        }
        Ok(())
    }

    fn copy_selection(&mut self) {
        let Some(layer) = self.layers().find(self.active_layer) else {
            return;
        };
        if let Some(pixels) = self.selection.capture(&layer.pixels) {
            log::debug!("copied {}x{} cells", pixels.width(), pixels.height());
            self.selection.pixels = Some(pixels.clone());
            self.clipboard = Some(pixels);
        }
    }

    fn cut_selection(&mut self) -> Result<()> {
        if !self.selection.active {
            return Ok(());
        }
        self.copy_selection();
        let selection = self.selection.clone();
        let mut next = self.layers().clone();
        next.paint(self.active_layer, |grid| selection.erase_from(grid))?;
        if next != *self.layers() {
            self.commit(next);
        }
        Ok(())
    }

    /// Pastes the clipboard at the selection's corner (or the origin) and selects it.
    fn paste(&mut self) -> Result<()> {
        let Some(pixels) = self.clipboard.clone() else {
            return Ok(());
        };
        let (x, y) = self
            .selection
            .bounds
            .map(|b| (b.x, b.y))
            .unwrap_or((0, 0));
        let mut next = self.layers().clone();
        next.paint(self.active_layer, |grid| paste_pixels(grid, &pixels, x, y))?;
        if next != *self.layers() {
            self.commit(next);
        }

        let mut selection = Selection::rect(SelectionBounds {
            x,
            y,
            width: pixels.width(),
            height: pixels.height(),
        });
        selection.pixels = Some(pixels);
        self.selection = selection;
        Ok(())
    }

    fn clear_canvas(&mut self) {
        let fresh = LayerStack::new(self.width(), self.height());
        self.active_layer = fresh.top().map(|l| l.id).unwrap_or_default();
        self.history.clear_history(fresh);
        self.selection.clear();
        log::info!("canvas cleared");
    }

    fn transform_canvas(&mut self, f: fn(&CanvasGrid) -> CanvasGrid) {
        let mut next = self.layers().clone();
        next.map_grids(f);
        self.selection.clear();
        self.commit(next);
    }

    // ------------------------------------------------------------------
    // Layer panel
    // ------------------------------------------------------------------

    pub fn update_layer(&mut self, id: LayerId, update: LayerUpdate) -> Result<()> {
        let mut next = self.layers().clone();
        next.update_layer(id, update)?;
        self.commit(next);
        Ok(())
    }

    pub fn move_layer(&mut self, id: LayerId, to: usize) -> Result<()> {
        let mut next = self.layers().clone();
        next.move_layer(id, to)?;
        self.commit(next);
        Ok(())
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

/// Applies one step of `tool` to `layer`. Freehand tools paint the segment from `last`
/// to `to`; shape tools draw from `start` to `to`.
fn paint_stroke(
    stack: &mut LayerStack,
    layer: LayerId,
    tool: Tool,
    start: Point,
    last: Point,
    to: Point,
    brush: Brush,
) -> Result<()> {
    match tool {
        Tool::Pencil | Tool::Eraser => {
            let color = if tool == Tool::Eraser {
                Color::Transparent
            } else {
                brush.color
            };
            // Dither only applies to paint; erasing is always solid
            let dither = brush.dither.filter(|_| tool == Tool::Pencil);
            stack.paint(layer, |grid| {
                let mut next = grid.clone();
                // centres further out than the brush size cannot reach the grid
                let reach = brush.size.min(i32::MAX as u32) as i32;
                let min = Point::new(-reach, -reach);
                let max = Point::new(
                    i32::try_from(grid.width()).unwrap_or(i32::MAX).saturating_add(reach),
                    i32::try_from(grid.height()).unwrap_or(i32::MAX).saturating_add(reach),
                );
                for p in line_points_within(last.x, last.y, to.x, to.y, min, max) {
                    for cell in stamp_cells(grid, p.x, p.y, brush.size) {
                        let skip = dither
                            .is_some_and(|d| !should_draw_dithered(cell.x, cell.y, d, BRUSH_DENSITY));
                        if !skip {
                            next.put_pixel(cell.x, cell.y, color);
                        }
                    }
                }
                next
            })
        }
        Tool::Fill => stack.paint(layer, |grid| match brush.fill_mode {
            FillMode::Contiguous => flood_fill(grid, to.x, to.y, brush.color),
            FillMode::Global => match grid.get(to.x, to.y) {
                Some(target) => global_fill(grid, target, brush.color),
                None => grid.clone(),
            },
        }),
        Tool::Line => stack.paint(layer, |grid| {
            draw_line(grid, start.x, start.y, to.x, to.y, brush.color)
        }),
        Tool::Rectangle => stack.paint(layer, |grid| {
            draw_rectangle(grid, start.x, start.y, to.x, to.y, brush.color, brush.filled)
        }),
        Tool::Circle => {
            let dx = f64::from(to.x) - f64::from(start.x);
            let dy = f64::from(to.y) - f64::from(start.y);
            let radius = (dx * dx + dy * dy).sqrt().round() as i32;
            stack.paint(layer, |grid| {
                draw_circle(grid, start.x, start.y, radius, brush.color, brush.filled)
            })
        }
        Tool::Eyedropper | Tool::Select | Tool::Lasso => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::Rgb(255, 0, 0);
    const BLUE: Color = Color::Rgb(0, 0, 255);

    fn editor(size: usize) -> Editor {
        let mut editor = Editor::with_size(size, size, EditorConfig::default());
        editor.primary_color = RED;
        editor
    }

    fn drag(editor: &mut Editor, points: &[(i32, i32)]) {
        let (first, rest) = points.split_first().unwrap();
        editor.pointer(ToolInput::start(first.0, first.1)).unwrap();
        for &(x, y) in rest {
            editor.pointer(ToolInput::moved(x, y)).unwrap();
        }
        let last = points.last().unwrap();
        editor.pointer(ToolInput::end(last.0, last.1)).unwrap();
    }

    fn active_pixels(editor: &Editor) -> &CanvasGrid {
        &editor.layers().find(editor.active_layer_id()).unwrap().pixels
    }

    #[test]
    fn a_drag_is_one_undo_step() {
        let mut editor = editor(8);
        drag(&mut editor, &[(0, 0), (3, 0), (3, 3), (5, 5)]);
        assert_eq!(editor.history().len(), 2);
        assert_eq!(active_pixels(&editor).get(3, 2), Some(RED));

        editor.execute(Command::Undo).unwrap();
        assert!(active_pixels(&editor).is_empty());
        editor.execute(Command::Redo).unwrap();
        assert_eq!(active_pixels(&editor).get(5, 5), Some(RED));
    }

    #[test]
    fn shape_preview_redraws_from_base() {
        let mut editor = editor(8);
        editor.execute(Command::SelectTool(Tool::Line)).unwrap();
        editor.pointer(ToolInput::start(0, 0)).unwrap();
        editor.pointer(ToolInput::moved(7, 0)).unwrap();
        editor.pointer(ToolInput::moved(0, 7)).unwrap();
        editor.pointer(ToolInput::end(0, 7)).unwrap();

        let pixels = active_pixels(&editor);
        assert_eq!(pixels.get(7, 0), Some(Color::Transparent));
        assert_eq!(pixels.get(0, 7), Some(RED));
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn no_op_fill_records_nothing() {
        let mut editor = editor(4);
        editor.execute(Command::SelectTool(Tool::Fill)).unwrap();
        editor.primary_color = Color::Transparent;
        drag(&mut editor, &[(1, 1)]);
        assert_eq!(editor.history().len(), 1);

        editor.primary_color = BLUE;
        drag(&mut editor, &[(1, 1)]);
        assert_eq!(editor.history().len(), 2);
        assert!(active_pixels(&editor).cells().iter().all(|c| *c == BLUE));
    }

    #[test]
    fn locked_layer_refuses_strokes() {
        let mut editor = editor(4);
        let id = editor.active_layer_id();
        editor
            .update_layer(id, LayerUpdate { locked: Some(true), ..Default::default() })
            .unwrap();
        let err = editor.pointer(ToolInput::start(1, 1));
        assert!(matches!(err, Err(EditorError::LayerLocked(_))));
        assert!(!editor.is_drawing());
        assert!(active_pixels(&editor).is_empty());
    }

    #[test]
    fn eyedropper_reads_composite() {
        let mut editor = editor(4);
        drag(&mut editor, &[(2, 2)]);
        editor.primary_color = BLUE;
        editor.execute(Command::SelectTool(Tool::Eyedropper)).unwrap();
        drag(&mut editor, &[(2, 2)]);
        assert_eq!(editor.primary_color, RED);
        drag(&mut editor, &[(0, 0)]);
        assert_eq!(editor.primary_color, RED);
    }

    #[test]
    fn copy_cut_paste() {
        let mut editor = editor(6);
        drag(&mut editor, &[(0, 0), (1, 0)]);
        editor.execute(Command::SelectTool(Tool::Select)).unwrap();
        drag(&mut editor, &[(0, 0), (1, 1)]);
        assert_eq!(
            editor.selection.bounds,
            Some(SelectionBounds { x: 0, y: 0, width: 2, height: 2 })
        );

        editor.execute(Command::Cut).unwrap();
        assert!(active_pixels(&editor).is_empty());
        assert_eq!(editor.clipboard().unwrap().get(1, 0), Some(RED));

        drag(&mut editor, &[(3, 3), (4, 4)]);
        editor.execute(Command::Paste).unwrap();
        let pixels = active_pixels(&editor);
        assert_eq!(pixels.get(3, 3), Some(RED));
        assert_eq!(pixels.get(4, 3), Some(RED));
        assert_eq!(pixels.get(3, 4), Some(Color::Transparent));
    }

    #[test]
    fn paste_that_changes_nothing_records_nothing() {
        let mut editor = editor(4);
        drag(&mut editor, &[(0, 0)]);
        editor.execute(Command::SelectTool(Tool::Select)).unwrap();
        drag(&mut editor, &[(0, 0), (1, 1)]);
        editor.execute(Command::Copy).unwrap();
        let before = editor.history().len();

        drag(&mut editor, &[(100, 100), (101, 101)]);
        editor.execute(Command::Paste).unwrap();
        assert_eq!(editor.history().len(), before);
        assert_eq!(
            editor.selection.bounds,
            Some(SelectionBounds { x: 100, y: 100, width: 2, height: 2 })
        );

        // pasting over identical pixels is also a no-op
        drag(&mut editor, &[(0, 0), (1, 1)]);
        editor.execute(Command::Paste).unwrap();
        assert_eq!(editor.history().len(), before);
    }

    #[test]
    fn strokes_with_extreme_coordinates_are_clipped() {
        let mut editor = editor(4);
        drag(&mut editor, &[(i32::MIN, 1), (i32::MAX, 1)]);
        assert_eq!(active_pixels(&editor).row(1).unwrap(), &[RED; 4]);

        editor.execute(Command::SelectTool(Tool::Circle)).unwrap();
        drag(&mut editor, &[(i32::MIN, i32::MIN), (i32::MAX, i32::MAX)]);
        editor.tool_settings.shape_filled = true;
        drag(&mut editor, &[(0, 0), (i32::MAX, 0)]);
        assert!(active_pixels(&editor).cells().iter().all(|c| *c == RED));
    }

    #[test]
    fn tool_switch_clears_selection() {
        let mut editor = editor(4);
        editor.execute(Command::SelectTool(Tool::Select)).unwrap();
        drag(&mut editor, &[(0, 0), (2, 2)]);
        assert!(editor.selection.active);
        editor.execute(Command::SelectTool(Tool::Pencil)).unwrap();
        assert!(!editor.selection.active);
    }

    #[test]
    fn dithered_pencil_skips_cells() {
        let mut editor = editor(4);
        editor.tool_settings.dither = Some(DitherPattern::Bayer2);
        drag(&mut editor, &[(0, 0), (3, 0)]);
        let row = active_pixels(&editor).row(0).unwrap().to_vec();
        // Bayer 2x2 row 0 thresholds are 0, 0.5, 0, 0.5
        assert_eq!(row, vec![RED, Color::Transparent, RED, Color::Transparent]);
    }

    #[test]
    fn layer_commands_track_active_layer() {
        let mut editor = editor(4);
        let first = editor.active_layer_id();
        editor.execute(Command::AddLayer).unwrap();
        let second = editor.active_layer_id();
        assert_ne!(first, second);
        assert_eq!(editor.layers().len(), 2);

        editor.execute(Command::DeleteLayer).unwrap();
        assert_eq!(editor.active_layer_id(), first);
        assert!(matches!(editor.execute(Command::DeleteLayer), Err(EditorError::LastLayer)));

        editor.execute(Command::Undo).unwrap();
        assert_eq!(editor.layers().len(), 2);
        editor.execute(Command::Undo).unwrap();
        assert_eq!(editor.layers().len(), 1);
        assert_eq!(editor.active_layer_id(), first);
    }

    #[test]
    fn undo_restores_active_layer_that_vanished() {
        let mut editor = editor(4);
        editor.execute(Command::AddLayer).unwrap();
        editor.execute(Command::Undo).unwrap();
        assert!(editor.layers().find(editor.active_layer_id()).is_some());
    }

    #[test]
    fn clear_canvas_resets_history() {
        let mut editor = editor(4);
        drag(&mut editor, &[(0, 0)]);
        editor.execute(Command::ClearCanvas).unwrap();
        assert_eq!(editor.history().len(), 1);
        assert!(editor.composite().is_empty());
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn rotate_applies_to_every_layer() {
        let mut editor = Editor::with_size(3, 2, EditorConfig::default());
        editor.execute(Command::AddLayer).unwrap();
        editor.execute(Command::RotateClockwise).unwrap();
        assert_eq!((editor.width(), editor.height()), (2, 3));
        for layer in editor.layers().layers() {
            assert_eq!(layer.pixels.dimensions(), (2, 3));
        }
    }

    #[test]
    fn keys_and_render_surface() {
        let mut editor = editor(4);
        assert!(editor.render_surface().show_grid);
        let ran = editor.key(KeyPress::new('g')).unwrap();
        assert_eq!(ran, Some(Command::ToggleGrid));
        assert!(!editor.render_surface().show_grid);
        assert_eq!(editor.key(KeyPress::new('q')).unwrap(), None);

        let surface = editor.render_surface();
        assert_eq!((surface.width, surface.height, surface.pixel_size), (4, 4, 16));
    }

    #[test]
    fn abandoned_drag_keeps_its_single_entry() {
        let mut editor = editor(4);
        editor.pointer(ToolInput::start(0, 0)).unwrap();
        editor.pointer(ToolInput::moved(2, 0)).unwrap();
        editor.cancel_stroke();
        assert!(!editor.is_drawing());
        assert_eq!(editor.history().len(), 2);
        // a stray move after cancel does nothing
        editor.pointer(ToolInput::moved(3, 3)).unwrap();
        assert_eq!(active_pixels(&editor).get(3, 3), Some(Color::Transparent));
    }
}
