extern crate conveyor;
extern crate image;

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use conveyor::prelude::*;

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn setup() -> (AssetManager, Memory) {
    let _ = env_logger::try_init();

    let memory = Memory::new();
    let mut params = LoaderParams::default();
    params.res.shortcuts.add("res:", "mem://").unwrap();
    params.res.schemas.add("mem", memory.clone());

    (AssetManager::new(params), memory)
}

fn load<T: Into<Asset>>(loader: &AssetManager, asset: T) -> Value {
    let result = Rc::new(RefCell::new(None));
    let rx = result.clone();

    loader
        .load(asset, LoadOptions::new().on_complete(move |v| *rx.borrow_mut() = Some(v)))
        .unwrap();
    loader.run_until_idle();

    let v = result.borrow_mut().take();
    v.expect("the load has not completed")
}

#[test]
fn direct() {
    let (loader, memory) = setup();
    memory.insert("hero.png", png(2, 2, [1, 2, 3, 4]));
    memory.insert("level.json", r#"{"name": "forest"}"#);
    memory.insert("notes.txt", "hello");

    let v = load(&loader, vec!["res:hero.png", "res:level.json", "res:notes.txt"]);

    let hero = v.at(0).and_then(|v| v.resource::<Image>()).unwrap();
    assert_eq!(hero.dimensions(), (2, 2));
    assert_eq!(hero.pixel(1, 1), Some([1, 2, 3, 4]));
    assert_eq!(hero.src(), Some("mem://hero.png".to_owned()));

    let level = v.at(1).and_then(|v| v.resource::<Json>()).unwrap();
    assert_eq!(level.value().unwrap()["name"], "forest");

    let notes = v.at(2).and_then(|v| v.resource::<Text>()).unwrap();
    assert_eq!(notes.text(), Some("hello".to_owned()));
}

#[test]
fn missing() {
    let (loader, _) = setup();
    assert!(load(&loader, "res:missing.png").is_failed());
}

#[test]
fn color_alpha() {
    let (loader, memory) = setup();
    memory.insert("hero.png", png(2, 1, [10, 20, 30, 255]));
    memory.insert("hero_alpha.png", png(2, 1, [64, 64, 64, 255]));

    let asset = AssetParams::new()
        .with_field("color", "res:hero.png")
        .with_field("alpha", "res:hero_alpha.png");

    let v = load(&loader, asset);
    let image = v.resource::<Image>().unwrap();
    assert_eq!(image.pixel(0, 0), Some([10, 20, 30, 64]));
    assert_eq!(image.pixel(1, 0), Some([10, 20, 30, 64]));
    assert_eq!(image.src(), Some("mem://hero.png".to_owned()));
}

#[test]
fn color_alpha_mismatch() {
    let (loader, memory) = setup();
    memory.insert("hero.png", png(2, 1, [10, 20, 30, 255]));
    memory.insert("hero_alpha.png", png(1, 1, [64, 64, 64, 255]));

    let asset = AssetParams::new()
        .with_field("color", "res:hero.png")
        .with_field("alpha", "res:hero_alpha.png");

    assert!(load(&loader, asset).is_failed());
}

#[test]
fn atlas() {
    let (loader, memory) = setup();
    memory.insert("hero.png", png(4, 2, [0, 0, 0, 255]));
    memory.insert(
        "hero.json",
        r#"{"frames": {"idle": {"x": 0, "y": 0, "w": 2, "h": 2}, "run": {"x": 2, "y": 0, "w": 2, "h": 2}}}"#,
    );

    let asset = AssetParams::new()
        .with_id("hero")
        .with_cache(true)
        .with_field("atlas", "res:hero.json")
        .with_field("image", "res:hero.png");

    let v = load(&loader, asset);
    let atlas = v.resource::<Atlas>().unwrap();
    assert_eq!(atlas.len(), 2);
    assert_eq!(atlas.frame("run"), Some(Frame { x: 2, y: 0, w: 2, h: 2 }));
    assert_eq!(atlas.image().dimensions(), (4, 2));

    // Deleting the atlas releases its image as well.
    let image = atlas.image().clone();
    assert!(loader.delete("hero"));
    assert!(image.is_destroyed());
}

#[test]
fn atlas_out_of_bounds() {
    let (loader, memory) = setup();
    memory.insert("hero.png", png(2, 2, [0, 0, 0, 255]));
    memory.insert("hero.json", r#"{"frames": {"idle": {"x": 1, "y": 1, "w": 2, "h": 2}}}"#);

    let asset = AssetParams::new()
        .with_field("atlas", "res:hero.json")
        .with_field("image", "res:hero.png");

    assert!(load(&loader, asset).is_failed());
}

#[test]
fn function() {
    let (loader, _) = setup();
    let v = load(
        &loader,
        Asset::function(|done| done(Value::new(Text::new("generated")))),
    );

    assert_eq!(v.resource::<Text>().and_then(|v| v.text()), Some("generated".to_owned()));
}
