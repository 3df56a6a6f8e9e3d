use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::image_store::{thumbnail, Thumbnail};
use crate::layers::{Layer, LayerId, LayerStack};
use crate::palette::{Palette, PaletteId, PaletteLibrary};
use crate::state::Editor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Identity and bookkeeping that travels with an editor session but is not pixels.
#[derive(Clone, PartialEq, Debug)]
pub struct DocumentMeta {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub minted: bool,
    pub mint_address: Option<String>,
}

impl DocumentMeta {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            minted: false,
            mint_address: None,
        }
    }
}

impl Default for DocumentMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain serializable snapshot of a whole document.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub layers: Vec<Layer>,
    pub active_layer_id: Option<LayerId>,
    pub palettes: Vec<Palette>,
    pub active_palette_id: Option<PaletteId>,
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub minted: bool,
    #[serde(default)]
    pub mint_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Document> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Document> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        log::info!("saved document {} to {}", self.id, path.display());
        Ok(())
    }

    /// Rebuilds the layer stack, checking every layer against the document size.
    pub fn layer_stack(&self) -> Result<LayerStack> {
        LayerStack::from_layers(self.width, self.height, self.layers.clone())
    }
}

impl Editor {
    /// Snapshots the current history entry, palettes and metadata.
    pub fn to_document(&self) -> Document {
        let stack = self.layers();
        Document {
            id: self.meta.id,
            layers: stack.layers().to_vec(),
            active_layer_id: Some(self.active_layer_id()),
            palettes: self.palettes.palettes().to_vec(),
            active_palette_id: self.palettes.active_id(),
            width: stack.width(),
            height: stack.height(),
            thumbnail: Some(thumbnail(&self.composite(), self.config().thumbnail_size)),
            minted: self.meta.minted,
            mint_address: self.meta.mint_address.clone(),
            created_at: self.meta.created_at,
            updated_at: Utc::now(),
        }
    }

    /// Opens a saved document with a fresh history.
    pub fn from_document(document: Document, config: EditorConfig) -> Result<Editor> {
        let stack = document.layer_stack()?;
        let palettes = PaletteLibrary::from_parts(document.palettes, document.active_palette_id);
        let meta = DocumentMeta {
            id: document.id,
            created_at: document.created_at,
            minted: document.minted,
            mint_address: document.mint_address,
        };
        Ok(Editor::from_parts(config, stack, document.active_layer_id, palettes, meta))
    }
}

/// Key-value persistence for documents, keyed by document id.
pub trait DocumentStore {
    fn save(&mut self, document: &Document) -> Result<()>;
    fn load(&self, id: Uuid) -> Result<Option<Document>>;
    /// Returns whether anything was removed.
    fn delete(&mut self, id: Uuid) -> Result<bool>;
    fn list(&self) -> Result<Vec<Uuid>>;
}

/// In-memory store with a byte quota over the serialized documents.
pub struct MemoryStore {
    documents: HashMap<Uuid, String>,
    quota: usize,
}

impl MemoryStore {
    pub fn new(quota: usize) -> Self {
        Self {
            documents: HashMap::new(),
            quota,
        }
    }

    pub fn used_bytes(&self) -> usize {
        self.documents.values().map(String::len).sum()
    }
}

impl DocumentStore for MemoryStore {
    fn save(&mut self, document: &Document) -> Result<()> {
        let json = serde_json::to_string(document)?;
        let replaced = self.documents.get(&document.id).map_or(0, String::len);
        let needed = self.used_bytes() - replaced + json.len();
        if needed > self.quota {
            log::warn!("document {} does not fit: {} > {} bytes", document.id, needed, self.quota);
            return Err(EditorError::StorageQuotaExceeded {
                needed,
                limit: self.quota,
            });
        }
        self.documents.insert(document.id, json);
        Ok(())
    }

    fn load(&self, id: Uuid) -> Result<Option<Document>> {
        self.documents
            .get(&id)
            .map(String::as_str)
            .map(Document::from_json)
            .transpose()
    }

    fn delete(&mut self, id: Uuid) -> Result<bool> {
        Ok(self.documents.remove(&id).is_some())
    }

    fn list(&self) -> Result<Vec<Uuid>> {
        let mut ids: Vec<Uuid> = self.documents.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}

/// One `<id>.json` file per document under a root directory.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

impl DocumentStore for DirectoryStore {
    fn save(&mut self, document: &Document) -> Result<()> {
        document.save(&self.path_for(document.id))
    }

    fn load(&self, id: Uuid) -> Result<Option<Document>> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        Document::load(&path).map(Some)
    }

    fn delete(&mut self, id: Uuid) -> Result<bool> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<Uuid>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match path.file_stem().and_then(|s| s.to_str()).map(Uuid::parse_str) {
                    Some(Ok(id)) => ids.push(id),
                    _ => log::debug!("skipping {}", path.display()),
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}
