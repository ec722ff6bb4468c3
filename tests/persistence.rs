//! Session snapshots and corpus files surviving a restart.

use annotator_core::persistence::{load_corpus_json, load_from_disk, save_corpus_json};
use annotator_core::{
    Action, AnnotatorConfig, AnnotatorEngine, CorpusStore, Direction, EntityClass, Glyph,
    MemoryStore, Mode, SelectionState,
};
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn selection_survives_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("session.bin");

    // First session: change filters, type something, save.
    let expected = {
        let mut engine = AnnotatorEngine::from_snapshot_or_new(&path, SelectionState::default());
        engine.dispatch(Action::SetMode(Mode::NGrams));
        engine.dispatch(Action::SetN(4));
        engine.dispatch(Action::SetDirection(EntityClass::Word, Direction::Left));
        engine.dispatch(Action::ToggleConsonantFilter(Glyph(0x0100)));
        engine.entry.push_glyph(Glyph(7));
        engine.save_snapshot().unwrap();
        engine.state.clone()
    };

    // Second session: the same state comes back.
    let engine = AnnotatorEngine::from_snapshot_or_new(&path, SelectionState::default());
    assert_eq!(engine.state, expected);
    assert_eq!(engine.entry.current_word(), &[Glyph(7)]);
}

#[test]
fn missing_or_broken_snapshot_falls_back_to_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("session.bin");

    let defaults = SelectionState::default().apply(Action::SetN(3));
    let engine = AnnotatorEngine::from_snapshot_or_new(&path, defaults.clone());
    assert_eq!(engine.state, defaults);

    fs::write(&path, b"not a snapshot").unwrap();
    assert!(load_from_disk(&path).is_err());
    let engine = AnnotatorEngine::from_snapshot_or_new(&path, defaults.clone());
    assert_eq!(engine.state, defaults);
}

#[test]
fn config_without_snapshot_path_never_writes() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = AnnotatorConfig { snapshot_path: None, corpus_path: None, ..Default::default() };

    let engine = AnnotatorEngine::from_config(&config);
    engine.save_snapshot().unwrap();
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn corpus_json_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("corpus.json");

    let mut store = MemoryStore::new();
    store
        .submit_text(&[vec![Glyph(10), Glyph(20)], vec![Glyph(30)]], Some("wall"))
        .unwrap();
    store.update_word(1, "door").unwrap();
    save_corpus_json(store.corpus(), &path).unwrap();

    let loaded = load_corpus_json(&path).unwrap();
    assert_eq!(&loaded, store.corpus());
    assert_eq!(loaded.context_translation(1), format!("door {}", loaded.sound_guess(Glyph(30))));
}
