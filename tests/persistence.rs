use pixelsmith::commands::Command;
use pixelsmith::palette::{BuiltinPalette, Palette};
use pixelsmith::tools::ToolInput;
use pixelsmith::{
    Color, DirectoryStore, Document, DocumentStore, Editor, EditorConfig, EditorError, MemoryStore,
};

fn painted_editor() -> Editor {
    let mut editor = Editor::with_size(16, 16, EditorConfig::default());
    editor.pointer(ToolInput::start(0, 0)).unwrap();
    editor.pointer(ToolInput::moved(15, 15)).unwrap();
    editor.pointer(ToolInput::end(15, 15)).unwrap();
    editor.execute(Command::DuplicateLayer).unwrap();
    let retro = editor.palettes.load_builtin(BuiltinPalette::Retro16);
    editor.palettes.set_active(retro).unwrap();
    editor.meta.minted = true;
    editor.meta.mint_address = Some("addr-123".to_string());
    editor
}

#[test]
fn reopened_document_matches_what_was_saved() {
    let editor = painted_editor();
    let mut store = MemoryStore::new(EditorConfig::default().storage_quota_bytes);
    store.save(&editor.to_document()).unwrap();

    let doc = store.load(editor.meta.id).unwrap().unwrap();
    let reopened = Editor::from_document(doc, EditorConfig::default()).unwrap();
    assert_eq!(reopened.layers(), editor.layers());
    assert_eq!(reopened.composite(), editor.composite());
    assert_eq!(reopened.palettes.active().unwrap().name, "Retro 16");
    assert_eq!(reopened.primary_color, Color::BLACK);
    assert!(reopened.meta.minted);
    assert_eq!(reopened.meta.mint_address.as_deref(), Some("addr-123"));
}

#[test]
fn quota_is_reported_as_its_own_error() {
    let editor = painted_editor();
    let mut store = MemoryStore::new(64);
    let err = store.save(&editor.to_document()).unwrap_err();
    assert!(matches!(err, EditorError::StorageQuotaExceeded { limit: 64, .. }));
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn directory_store_lists_saved_documents() {
    let root = std::env::temp_dir().join(format!("pixelsmith-it-{}", uuid::Uuid::new_v4()));
    let mut store = DirectoryStore::open(&root).unwrap();

    let a = Editor::with_size(2, 2, EditorConfig::default()).to_document();
    let b = painted_editor().to_document();
    store.save(&a).unwrap();
    store.save(&b).unwrap();

    let mut expected = vec![a.id, b.id];
    expected.sort();
    assert_eq!(store.list().unwrap(), expected);

    let loaded: Document = store.load(b.id).unwrap().unwrap();
    assert_eq!(loaded.layers.len(), 2);
    assert_eq!(loaded.width, 16);
    std::fs::remove_dir_all(root).unwrap();
}

#[test]
fn palettes_convert_between_json_and_gpl() {
    let palette = Palette::new("Sunset", vec![Color::Rgb(255, 94, 77), Color::Rgb(40, 20, 60)]);
    let gpl = palette.to_gpl();
    let from_gpl = Palette::from_gpl(&gpl).unwrap();
    assert_eq!(from_gpl.name, "Sunset");
    assert_eq!(from_gpl.colors, palette.colors);

    let json = from_gpl.to_json().unwrap();
    let from_json = Palette::from_json(&json).unwrap();
    assert_eq!(from_json.colors, palette.colors);
    assert_ne!(from_json.id, palette.id);
}
