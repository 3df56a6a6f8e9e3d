use crate::color::{Color, Rgb, TRANSPARENT};
use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub type PaletteId = Uuid;

/// Named, ordered list of colors. Edits return a new value and keep the id.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Palette {
    pub id: PaletteId,
    pub name: String,
    pub colors: Vec<Color>,
}

/// On-disk JSON shape: just the name and the colors.
#[derive(Serialize)]
struct PaletteFile<'a> {
    name: &'a str,
    colors: &'a [Color],
}

impl Palette {
    pub fn new(name: impl Into<String>, colors: Vec<Color>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            colors,
        }
    }

    pub fn with_color(&self, color: Color) -> Palette {
        let mut next = self.clone();
        next.colors.push(color);
        next
    }

    pub fn without_color(&self, index: usize) -> Palette {
        let mut next = self.clone();
        if index < next.colors.len() {
            next.colors.remove(index);
        }
        next
    }

    pub fn with_color_moved(&self, from: usize, to: usize) -> Palette {
        let mut next = self.clone();
        if from < next.colors.len() {
            let color = next.colors.remove(from);
            let to = to.min(next.colors.len());
            next.colors.insert(to, color);
        }
        next
    }

    pub fn to_json(&self) -> Result<String> {
        let file = PaletteFile {
            name: &self.name,
            colors: &self.colors,
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Requires a string `name` and an array `colors`; anything else yields `None`.
    /// Entries in `colors` that aren't valid colors are skipped.
    pub fn from_json(text: &str) -> Option<Palette> {
        let value: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("palette json rejected: {}", e);
                return None;
            }
        };
        let name = value.get("name")?.as_str()?;
        let entries = value.get("colors")?.as_array()?;

        let colors = entries
            .iter()
            .filter_map(|entry| {
                let parsed = entry.as_str().and_then(Color::from_hex);
                if parsed.is_none() {
                    log::warn!("skipping palette entry {}", entry);
                }
                parsed
            })
            .collect();
        Some(Palette::new(name, colors))
    }

    /// GIMP `.gpl` text. Transparent entries are written as `0 0 0` with the
    /// entry name `transparent`, which `from_gpl` reads back.
    pub fn to_gpl(&self) -> String {
        let mut out = String::from("GIMP Palette\n");
        out.push_str(&format!("Name: {}\n", self.name));
        out.push_str("Columns: 8\n#\n");
        for color in &self.colors {
            let Rgb { r, g, b } = color.to_rgb();
            out.push_str(&format!("{:3} {:3} {:3}\t{}\n", r, g, b, color.to_hex()));
        }
        out
    }

    /// Parses GIMP palette text. A `Name:` line sets the name, lines starting with
    /// three integers in `[0, 255]` become colors, everything else is ignored. An
    /// entry named `transparent` reads as transparent.
    ///
    /// Returns `None` when the text has neither a `GIMP Palette` header nor any
    /// readable color; a headed file with no entries is an empty palette.
    pub fn from_gpl(text: &str) -> Option<Palette> {
        let mut name = String::from("Imported Palette");
        let mut colors = Vec::new();
        let mut headed = false;

        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if i == 0 && line == "GIMP Palette" {
                headed = true;
                continue;
            }
            if let Some(rest) = line.strip_prefix("Name:") {
                name = rest.trim().to_string();
                continue;
            }
            let mut fields = line.split_whitespace();
            let channels: Vec<u8> = fields.by_ref().take(3).map_while(|f| f.parse().ok()).collect();
            if let [r, g, b] = channels[..] {
                let label = fields.next().unwrap_or_default();
                if label.eq_ignore_ascii_case(TRANSPARENT) {
                    colors.push(Color::Transparent);
                } else {
                    colors.push(Color::Rgb(r, g, b));
                }
            }
        }

        if !headed && colors.is_empty() {
            log::warn!("gpl palette {:?} had no header and no readable colors", name);
            return None;
        }
        Some(Palette::new(name, colors))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BuiltinPalette {
    Default16,
    Grayscale,
    Retro16,
}

impl BuiltinPalette {
    pub fn all() -> &'static [BuiltinPalette] {
        &[
            BuiltinPalette::Default16,
            BuiltinPalette::Grayscale,
            BuiltinPalette::Retro16,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinPalette::Default16 => "Default",
            BuiltinPalette::Grayscale => "Grayscale",
            BuiltinPalette::Retro16 => "Retro 16",
        }
    }

    fn hex_codes(&self) -> &'static [&'static str] {
        match self {
            BuiltinPalette::Default16 => &[
                "#000000", "#FFFFFF", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF",
                "#00FFFF", "#808080", "#C0C0C0", "#800000", "#008000", "#000080", "#808000",
                "#800080", "#008080",
            ],
            BuiltinPalette::Grayscale => &[
                "#000000", "#242424", "#494949", "#6D6D6D", "#929292", "#B6B6B6", "#DBDBDB",
                "#FFFFFF",
            ],
            BuiltinPalette::Retro16 => &[
                "#000000", "#1D2B53", "#7E2553", "#008751", "#AB5236", "#5F574F", "#C2C3C7",
                "#FFF1E8", "#FF004D", "#FFA300", "#FFEC27", "#00E436", "#29ADFF", "#83769C",
                "#FF77A8", "#FFCCAA",
            ],
        }
    }

    pub fn colors(&self) -> Vec<Color> {
        self.hex_codes().iter().filter_map(|hex| Color::from_hex(hex)).collect()
    }

    /// A fresh palette built from this template; the template itself is never shared.
    pub fn instantiate(&self) -> Palette {
        Palette::new(self.name(), self.colors())
    }
}

/// Process-wide palette collection with one optional active palette.
#[derive(Clone, Default, Debug)]
pub struct PaletteLibrary {
    palettes: Vec<Palette>,
    active: Option<PaletteId>,
}

impl PaletteLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A library holding a copy of the default palette, marked active.
    pub fn with_defaults() -> Self {
        let mut library = Self::new();
        let id = library.load_builtin(BuiltinPalette::Default16);
        library.active = Some(id);
        library
    }

    pub fn from_parts(palettes: Vec<Palette>, active: Option<PaletteId>) -> Self {
        let active = active.filter(|id| palettes.iter().any(|p| p.id == *id));
        Self { palettes, active }
    }

    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    pub fn get(&self, id: PaletteId) -> Option<&Palette> {
        self.palettes.iter().find(|p| p.id == id)
    }

    pub fn create(&mut self, name: impl Into<String>, colors: Vec<Color>) -> PaletteId {
        self.insert(Palette::new(name, colors))
    }

    pub fn insert(&mut self, palette: Palette) -> PaletteId {
        let id = palette.id;
        self.palettes.push(palette);
        id
    }

    pub fn load_builtin(&mut self, builtin: BuiltinPalette) -> PaletteId {
        self.insert(builtin.instantiate())
    }

    /// Swaps in an edited palette value with the same id.
    pub fn replace(&mut self, palette: Palette) -> Result<()> {
        let slot = self
            .palettes
            .iter_mut()
            .find(|p| p.id == palette.id)
            .ok_or(EditorError::PaletteNotFound(palette.id))?;
        *slot = palette;
        Ok(())
    }

    pub fn remove(&mut self, id: PaletteId) -> Result<Palette> {
        let index = self
            .palettes
            .iter()
            .position(|p| p.id == id)
            .ok_or(EditorError::PaletteNotFound(id))?;
        if self.active == Some(id) {
            self.active = None;
        }
        Ok(self.palettes.remove(index))
    }

    pub fn set_active(&mut self, id: PaletteId) -> Result<()> {
        if self.get(id).is_none() {
            return Err(EditorError::PaletteNotFound(id));
        }
        self.active = Some(id);
        Ok(())
    }

    pub fn active_id(&self) -> Option<PaletteId> {
        self.active
    }

    pub fn active(&self) -> Option<&Palette> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn import_json(&mut self, text: &str) -> Option<PaletteId> {
        Palette::from_json(text).map(|p| self.insert(p))
    }

    pub fn import_gpl(&mut self, text: &str) -> Option<PaletteId> {
        Palette::from_gpl(text).map(|p| self.insert(p))
    }
}
