use crate::tools::Tool;

/// Discrete editor actions, as produced by keyboard shortcuts or toolbar buttons.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    SelectTool(Tool),
    Undo,
    Redo,
    ToggleGrid,
    Copy,
    Cut,
    Paste,
    ClearSelection,
    ClearCanvas,
    RotateClockwise,
    FlipHorizontal,
    FlipVertical,
    AddLayer,
    DuplicateLayer,
    DeleteLayer,
    MergeDown,
    Flatten,
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Command::SelectTool(tool) => tool.name(),
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::ToggleGrid => "Toggle Grid",
            Command::Copy => "Copy",
            Command::Cut => "Cut",
            Command::Paste => "Paste",
            Command::ClearSelection => "Deselect",
            Command::ClearCanvas => "Clear Canvas",
            Command::RotateClockwise => "Rotate",
            Command::FlipHorizontal => "Flip Horizontal",
            Command::FlipVertical => "Flip Vertical",
            Command::AddLayer => "Add Layer",
            Command::DuplicateLayer => "Duplicate Layer",
            Command::DeleteLayer => "Delete Layer",
            Command::MergeDown => "Merge Down",
            Command::Flatten => "Flatten",
        }
    }
}

/// A key with its modifiers. Serves both as the press reported by the host and as
/// the chord a command is bound to. `key` is compared case-insensitively.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct KeyPress {
    pub key: char,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyPress {
    pub fn new(key: char) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
            alt: false,
        }
    }

    pub fn ctrl(mut self, value: bool) -> Self {
        self.ctrl = value;
        self
    }

    pub fn shift(mut self, value: bool) -> Self {
        self.shift = value;
        self
    }

    pub fn alt(mut self, value: bool) -> Self {
        self.alt = value;
        self
    }

    /// Same key ignoring case, same modifiers exactly.
    pub fn matches(&self, other: &KeyPress) -> bool {
        other.key.eq_ignore_ascii_case(&self.key)
            && other.ctrl == self.ctrl
            && other.shift == self.shift
            && other.alt == self.alt
    }

    pub fn format(&self) -> String {
        let mut s = String::new();
        if self.ctrl {
            s.push_str("Ctrl+");
        }
        if self.shift {
            s.push_str("Shift+");
        }
        if self.alt {
            s.push_str("Alt+");
        }
        s.push(self.key.to_ascii_uppercase());
        s
    }
}

pub struct Keybindings {
    pub bindings: Vec<(KeyPress, Command)>,
}

impl Keybindings {
    /// First binding matching the press, if any.
    pub fn resolve(&self, press: &KeyPress) -> Option<Command> {
        self.bindings
            .iter()
            .find(|(shortcut, _)| shortcut.matches(press))
            .map(|(_, command)| *command)
    }

    pub fn shortcut_for(&self, command: Command) -> Option<KeyPress> {
        self.bindings
            .iter()
            .find(|(_, c)| *c == command)
            .map(|(s, _)| *s)
    }
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            bindings: vec![
                (KeyPress::new('z').ctrl(true), Command::Undo),
                (KeyPress::new('y').ctrl(true), Command::Redo),
                (KeyPress::new('z').ctrl(true).shift(true), Command::Redo),
                (KeyPress::new('c').ctrl(true), Command::Copy),
                (KeyPress::new('x').ctrl(true), Command::Cut),
                (KeyPress::new('v').ctrl(true), Command::Paste),
                (KeyPress::new('d').ctrl(true), Command::ClearSelection),
                (KeyPress::new('g'), Command::ToggleGrid),
                (KeyPress::new('b'), Command::SelectTool(Tool::Pencil)),
                (KeyPress::new('e'), Command::SelectTool(Tool::Eraser)),
                (KeyPress::new('f'), Command::SelectTool(Tool::Fill)),
                (KeyPress::new('l'), Command::SelectTool(Tool::Line)),
                (KeyPress::new('r'), Command::SelectTool(Tool::Rectangle)),
                (KeyPress::new('o'), Command::SelectTool(Tool::Circle)),
                (KeyPress::new('i'), Command::SelectTool(Tool::Eyedropper)),
                (KeyPress::new('s'), Command::SelectTool(Tool::Select)),
                (KeyPress::new('a'), Command::SelectTool(Tool::Lasso)),
            ],
        }
    }
}
