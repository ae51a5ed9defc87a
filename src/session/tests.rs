use std::path::{Path, PathBuf};

use tempfile::tempdir;

use super::{SessionSaver, SessionStore, TomlSessionStore};

fn store_in(dir: &Path) -> TomlSessionStore {
    TomlSessionStore::at(dir.join("session.toml"))
}

#[test]
fn missing_file_loads_as_empty_session() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());

    assert!(store.load_last_source().is_none());
    assert!(store.load_last_volume().is_none());
}

#[test]
fn volume_and_source_round_trip() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());

    store.save_last_volume(0.3);
    store.save_last_source(Path::new("/music/morning"));

    assert_eq!(store.load_last_volume(), Some(0.3));
    assert_eq!(
        store.load_last_source(),
        Some(PathBuf::from("/music/morning"))
    );
}

#[test]
fn saving_one_key_preserves_the_other() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());

    store.save_last_source(Path::new("/music/a.mp3"));
    store.save_last_volume(0.8);
    store.save_last_source(Path::new("/music/b.mp3"));

    assert_eq!(store.load_last_volume(), Some(0.8));
    assert_eq!(store.load_last_source(), Some(PathBuf::from("/music/b.mp3")));
}

#[test]
fn corrupt_file_degrades_to_empty_and_recovers_on_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.toml");
    std::fs::write(&path, "volume = \"not a number").unwrap();

    let store = TomlSessionStore::at(path);
    assert!(store.load_last_volume().is_none());

    store.save_last_volume(0.5);
    assert_eq!(store.load_last_volume(), Some(0.5));
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let store = TomlSessionStore::at(dir.path().join("state").join("deep").join("session.toml"));

    store.save_last_volume(0.9);
    assert_eq!(store.load_last_volume(), Some(0.9));
}

#[test]
fn saver_flushes_queued_writes_on_drop() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.toml");

    {
        let saver = SessionSaver::spawn(TomlSessionStore::at(path.clone()));
        saver.save_last_volume(0.7);
        saver.save_last_source(Path::new("/music/evening"));
    }

    let store = TomlSessionStore::at(path);
    assert_eq!(store.load_last_volume(), Some(0.7));
    assert_eq!(
        store.load_last_source(),
        Some(PathBuf::from("/music/evening"))
    );
}
