extern crate conveyor;

mod support;

use conveyor::prelude::*;

use self::support::*;

struct Plain;

impl Task for Plain {
    fn start(&mut self, _: &TaskContext, done: Done) {
        done(Value::new(Probe::new("plain")));
    }
}

impl TaskKind for Plain {
    const NAME: &'static str = "plain";

    fn test(_: &AssetParams) -> bool {
        true
    }

    fn create(_: AssetParams) -> Result<Self> {
        Ok(Plain)
    }
}

struct Special;

impl Task for Special {
    fn start(&mut self, _: &TaskContext, done: Done) {
        done(Value::new(Probe::new("special")));
    }
}

impl TaskKind for Special {
    const NAME: &'static str = "special";

    fn test(params: &AssetParams) -> bool {
        params.fields.get("special").and_then(|v| v.as_bool()).unwrap_or(false)
    }

    fn create(_: AssetParams) -> Result<Self> {
        Ok(Special)
    }
}

fn special() -> AssetParams {
    AssetParams::new().with_field("special", true)
}

#[test]
fn priority_dispatch() {
    let mut registry = TaskRegistry::new();
    registry.register::<Plain>(0);
    registry.register::<Special>(10);

    let (info, _) = registry.resolve(special()).unwrap();
    assert_eq!(info.kind, "special");

    let (info, _) = registry.resolve(AssetParams::new()).unwrap();
    assert_eq!(info.kind, "plain");
}

#[test]
fn registration_order_breaks_ties() {
    let mut registry = TaskRegistry::new();
    registry.register::<Plain>(10);
    registry.register::<Special>(10);

    let (info, _) = registry.resolve(special()).unwrap();
    assert_eq!(info.kind, "plain");
    assert_eq!(registry.names(), vec!["plain", "special"]);
}

#[test]
fn kind_hint() {
    let registry = TaskRegistry::with_defaults();

    let params = AssetParams::src("a.png")
        .with_field("color", "a.jpg")
        .with_field("alpha", "a_alpha.png")
        .with_kind("load");

    let (info, _) = registry.resolve(params).unwrap();
    assert_eq!(info.kind, "load");

    // The hinted kind must still be able to take the descriptor apart.
    assert!(registry
        .resolve(AssetParams::src("a.png").with_kind("list"))
        .is_err());
}

#[test]
fn unresolved() {
    let mut registry = TaskRegistry::new();
    registry.register::<Special>(0);

    match registry.resolve(AssetParams::new()) {
        Err(Error::Unresolved(_)) => {}
        _ => panic!("expects a resolution error"),
    }

    match registry.resolve(AssetParams::new().with_kind("plain")) {
        Err(Error::UnknownKind(ref kind)) => assert_eq!(kind, "plain"),
        _ => panic!("expects an unknown kind error"),
    }
}

#[test]
fn closures() {
    let (loader, _) = setup();
    let (results, options) = recorder();

    loader.register_def(TaskDef::new(
        "upper",
        200,
        |params| params.has_field("upper"),
        |params| {
            let text = params.field_str("upper").unwrap_or_default().to_uppercase();
            Ok(Box::new(FunctionTask::create(
                AssetParams::function(move |done| done(Value::new(Probe::new(text)))),
            )?) as Box<dyn Task>)
        },
    ));

    loader
        .load(AssetParams::new().with_field("upper", "abc"), options)
        .unwrap();

    assert_eq!(name_of(&results.borrow()[0]), Some("ABC".to_owned()));
}

#[test]
fn defaults() {
    let registry = TaskRegistry::with_defaults();

    let select = |params: AssetParams| registry.select(&params).map(|v| v.name().to_owned()).ok();
    assert_eq!(select(AssetParams::src("a.png")), Some("load".to_owned()));
    assert_eq!(
        select(AssetParams::src("a.png").with_assets(vec!["b.png"])),
        Some("list".to_owned())
    );
    assert_eq!(
        select(AssetParams::new().with_field("color", "a.jpg").with_field("alpha", "b.png")),
        Some("color_alpha".to_owned())
    );
    assert_eq!(
        select(AssetParams::new().with_field("atlas", "a.json").with_field("image", "a.png")),
        Some("atlas".to_owned())
    );
    assert_eq!(
        select(AssetParams::function(|done| done(Value::Empty)).with_field("color", "a.jpg")),
        Some("function".to_owned())
    );
    assert_eq!(select(AssetParams::new()), None);
}
