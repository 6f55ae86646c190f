extern crate conveyor;

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use conveyor::prelude::*;

#[test]
fn settings() {
    let settings = LoaderSettings::from_json(
        r#"{
            "shortcuts": { "res:": "mem://assets/" },
            "defaultSchema": "mem",
            "parallel": false
        }"#,
    )
    .unwrap();

    let mut params = LoaderParams::default();
    params.apply(&settings).unwrap();
    assert!(!params.parallel);

    let memory = Memory::new();
    memory.insert("assets/a.txt", "a");
    memory.insert("b.txt", "b");
    params.res.schemas.add("mem", memory);

    let loader = AssetManager::new(params);
    let result = Rc::new(RefCell::new(None));
    let rx = result.clone();

    let handle = loader
        .load(
            vec!["res:a.txt", "b.txt"],
            LoadOptions::new().on_complete(move |v| *rx.borrow_mut() = Some(v)),
        )
        .unwrap();

    assert!(handle.is_running());
    loader.run_until_idle();
    assert!(!handle.is_running());

    let result = result.borrow();
    let texts: Vec<_> = result
        .as_ref()
        .and_then(|v| v.as_list())
        .unwrap()
        .iter()
        .map(|v| v.resource::<Text>().and_then(|v| v.text()))
        .collect();

    assert_eq!(texts, vec![Some("a".to_owned()), Some("b".to_owned())]);
}

#[test]
fn malformed_settings() {
    assert!(LoaderSettings::from_json("{").is_err());
    assert!(LoaderSettings::from_json(r#"{"parallel": "yes"}"#).is_err());
}

#[test]
fn local_files() {
    let _ = env_logger::try_init();

    let dir = std::env::temp_dir().join(format!("conveyor-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("hello.txt"), "hello").unwrap();

    let mut params = LoaderParams::default();
    params.res.schemas.add("file", Dir::with_root(&dir));
    params.res.shortcuts.add("res:", "file://").unwrap();

    let loader = AssetManager::new(params);
    let asset = AssetParams::src("res:hello.txt").with_id("hello").with_cache(true);
    loader.load(asset, LoadOptions::new()).unwrap();
    loader.run_until_idle();

    let v = loader.read("hello").unwrap();
    assert_eq!(v.resource::<Text>().and_then(|v| v.text()), Some("hello".to_owned()));

    assert_eq!(loader.unload(&Asset::from(AssetParams::src("res:hello.txt").with_id("hello"))), 1);
    assert!(!loader.contains("hello"));
    assert!(v.resource::<Text>().unwrap().is_destroyed());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn progress_of_single_asset() {
    let _ = env_logger::try_init();

    let memory = Memory::new();
    memory.insert("a.bin", vec![1u8, 2, 3]);

    let mut params = LoaderParams::default();
    params.res.schemas.add("mem", memory);
    params.res.default_schema = "mem".into();

    let fractions = Rc::new(RefCell::new(Vec::new()));
    let f = fractions.clone();

    let loader = AssetManager::new(params);
    let asset = AssetParams::src("a.bin").on_progress(move |v| f.borrow_mut().push(v));
    loader.load(asset, LoadOptions::new()).unwrap();

    assert!(fractions.borrow().is_empty());
    assert_eq!(loader.advance(), 1);
    assert_eq!(*fractions.borrow(), vec![1.0]);
}

#[test]
fn context_outlives_destroy() {
    let loader = AssetManager::with_defaults();
    let ctx = loader.context();
    loader.destroy();

    // Tasks may still load through their context, but nothing is cached.
    let result = Rc::new(RefCell::new(None));
    let rx = result.clone();

    let asset = AssetParams::function(|done| done(Value::new(Text::new("a")))).with_id("a");
    let options = LoadOptions::new().on_complete(move |v| *rx.borrow_mut() = Some(v));
    assert!(ctx.load(asset.into(), options).is_ok());

    let result = result.borrow();
    let text = result.as_ref().and_then(|v| v.resource::<Text>()).and_then(|v| v.text());
    assert_eq!(text, Some("a".to_owned()));
}
