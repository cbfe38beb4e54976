use semtree::{DataBlock, Engine, EngineOptions, Key, TOP_LEVEL};

#[test]
fn container_survives_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("container.semtree");

    let mut engine = Engine::open_path(&path, EngineOptions::default()).unwrap();
    engine
        .insert(TOP_LEVEL, &Key::new("persisted"), DataBlock::default())
        .unwrap();
    let device = engine.close().unwrap();
    drop(device);

    let mut reopened = Engine::open_path(&path, EngineOptions::default()).unwrap();
    assert!(reopened.search(TOP_LEVEL, &Key::new("persisted")).is_ok());
}

#[test]
fn opening_missing_path_formats_a_fresh_container() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.semtree");
    assert!(!path.exists());

    let mut engine = Engine::open_path(&path, EngineOptions::default()).unwrap();
    assert_eq!(engine.count_keys(TOP_LEVEL).unwrap(), 0);
}

#[test]
fn cache_enabled_roundtrips_identically_to_uncached() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cached.semtree");

    let mut engine = Engine::open_path(&path, EngineOptions { cache: true }).unwrap();
    for i in 0..40 {
        engine
            .insert(TOP_LEVEL, &Key::new(&format!("c{i:03}")), DataBlock::default())
            .unwrap();
    }
    engine.close().unwrap();

    let mut reopened = Engine::open_path(&path, EngineOptions::default()).unwrap();
    assert_eq!(reopened.count_keys(TOP_LEVEL).unwrap(), 40);
}
