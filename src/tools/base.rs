use crate::grid::Point;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    Fill,
    Line,
    Rectangle,
    Circle,
    Eyedropper,
    Select,
    Lasso,
}

impl Tool {
    pub fn all() -> &'static [Tool] {
        &[
            Tool::Pencil,
            Tool::Eraser,
            Tool::Fill,
            Tool::Line,
            Tool::Rectangle,
            Tool::Circle,
            Tool::Eyedropper,
            Tool::Select,
            Tool::Lasso,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Pencil => "Pencil",
            Tool::Eraser => "Eraser",
            Tool::Fill => "Fill",
            Tool::Line => "Line",
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Eyedropper => "Eyedropper",
            Tool::Select => "Select",
            Tool::Lasso => "Lasso",
        }
    }

    /// Whether a gesture with this tool changes pixels (and so records history).
    pub fn edits_pixels(&self) -> bool {
        !matches!(self, Tool::Eyedropper | Tool::Select | Tool::Lasso)
    }

    /// Shape tools redraw from the pre-gesture snapshot on every pointer move.
    pub fn is_shape(&self) -> bool {
        matches!(self, Tool::Line | Tool::Rectangle | Tool::Circle)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PointerPhase {
    Start,
    Move,
    End,
}

/// One pointer sample, already converted to grid coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ToolInput {
    pub phase: PointerPhase,
    pub point: Point,
}

impl ToolInput {
    pub fn start(x: i32, y: i32) -> Self {
        Self {
            phase: PointerPhase::Start,
            point: Point::new(x, y),
        }
    }

    pub fn moved(x: i32, y: i32) -> Self {
        Self {
            phase: PointerPhase::Move,
            point: Point::new(x, y),
        }
    }

    pub fn end(x: i32, y: i32) -> Self {
        Self {
            phase: PointerPhase::End,
            point: Point::new(x, y),
        }
    }
}
