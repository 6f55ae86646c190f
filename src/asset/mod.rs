//! Asset descriptors.
//!
//! An `Asset` describes _what_ to load, never _how_. It comes in three shapes:
//! a single descriptor, an ordered list or a keyed map of further assets. A
//! single descriptor is a bag of properties (`AssetParams`); which task kind
//! handles it is decided by the task registry from the properties it carries.
//!
//! ```rust
//! use conveyor::prelude::*;
//!
//! let assets = Asset::map(vec![
//!     ("hero", Asset::src("res:hero.png")),
//!     ("level", AssetParams::src("res:level.json").with_id("level-1").with_cache(true).into()),
//! ]);
//!
//! assert_eq!(assets.ids(), vec!["hero".to_owned(), "level-1".to_owned()]);
//! ```

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::resource::Value;

/// Ordered string-keyed map, used for map descriptors and map results.
pub type AssetMap<T> = IndexMap<String, T>;

/// The completion of a task. It must be called exactly once.
pub type Done = Box<dyn FnOnce(Value)>;
/// A programmatic load step.
pub type AsyncFn = Box<dyn FnOnce(Done)>;
/// The per-asset completion, invoked with the result of the asset.
pub type CompleteFn = Box<dyn FnOnce(&Value, &mut FollowUps)>;
/// Progress notification with a fraction in `[0, 1]`.
pub type ProgressFn = Rc<dyn Fn(f32)>;

/// A declarative description of something to load.
pub enum Asset {
    Single(AssetParams),
    List(Vec<Asset>),
    Map(AssetMap<Asset>),
}

impl Asset {
    /// Shortcut for a direct load of `src`.
    #[inline]
    pub fn src<T: Into<String>>(src: T) -> Self {
        Asset::Single(AssetParams::src(src))
    }

    pub fn list<I, T>(assets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Asset>,
    {
        Asset::List(assets.into_iter().map(|v| v.into()).collect())
    }

    pub fn map<I, K, T>(assets: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Asset>,
    {
        Asset::Map(
            assets
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Shortcut for a programmatic load step.
    #[inline]
    pub fn function<F>(func: F) -> Self
    where
        F: FnOnce(Done) + 'static,
    {
        Asset::Single(AssetParams::function(func))
    }

    /// Returns the id of a single descriptor.
    #[inline]
    pub fn id(&self) -> Option<&str> {
        match *self {
            Asset::Single(ref v) => v.id.as_ref().map(|v| v.as_str()),
            _ => None,
        }
    }

    /// Enumerates every id this descriptor tree could be cached under, in
    /// declaration order. A leaf of a map without an explicit id is
    /// identified by its key.
    pub fn ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.collect_ids(None, &mut ids);
        ids
    }

    fn collect_ids(&self, key: Option<&str>, ids: &mut Vec<String>) {
        match *self {
            Asset::Single(ref v) => {
                if let Some(id) = v.id.as_ref().map(|v| v.as_str()).or(key) {
                    ids.push(id.to_owned());
                }

                if let Some(ref assets) = v.assets {
                    assets.collect_ids(None, ids);
                }
            }
            Asset::List(ref v) => {
                for w in v {
                    w.collect_ids(None, ids);
                }
            }
            Asset::Map(ref v) => {
                for (k, w) in v {
                    w.collect_ids(Some(k.as_str()), ids);
                }
            }
        }
    }
}

impl From<AssetParams> for Asset {
    fn from(params: AssetParams) -> Self {
        Asset::Single(params)
    }
}

impl<'a> From<&'a str> for Asset {
    fn from(src: &'a str) -> Self {
        Asset::src(src)
    }
}

impl From<String> for Asset {
    fn from(src: String) -> Self {
        Asset::src(src)
    }
}

impl<T: Into<Asset>> From<Vec<T>> for Asset {
    fn from(assets: Vec<T>) -> Self {
        Asset::list(assets)
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Asset::Single(ref v) => fmt::Debug::fmt(v, f),
            Asset::List(ref v) => f.debug_list().entries(v.iter()).finish(),
            Asset::Map(ref v) => f.debug_map().entries(v.iter()).finish(),
        }
    }
}

/// The properties of a single descriptor.
#[derive(Default)]
pub struct AssetParams {
    /// Identifier the result is cached under.
    pub id: Option<String>,
    /// Location of the resource, e.g. `res:sprites/hero.png`.
    pub src: Option<String>,
    /// Writes the result into the cache. Requires `id`.
    pub cache: bool,
    /// Selects a task kind by name instead of testing predicates.
    pub kind: Option<String>,
    /// Opaque payload handed to the fetcher.
    pub data: Option<serde_json::Value>,
    pub priority: i32,
    /// Nested assets, loaded by a nested session.
    pub assets: Option<Box<Asset>>,
    /// Concurrency of the nested session.
    pub parallel: Option<bool>,
    /// Caches every leaf of the nested session.
    pub cache_all: bool,
    /// Free-form properties used by specific task kinds.
    pub fields: AssetMap<serde_json::Value>,
    /// Set by sessions with caching switched off, so nested loads inherit it.
    pub(crate) uncached: bool,
    run: Option<AsyncFn>,
    complete: Option<CompleteFn>,
    progress: Option<ProgressFn>,
}

impl AssetParams {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn src<T: Into<String>>(src: T) -> Self {
        AssetParams {
            src: Some(src.into()),
            ..Default::default()
        }
    }

    pub fn function<F>(func: F) -> Self
    where
        F: FnOnce(Done) + 'static,
    {
        AssetParams {
            run: Some(Box::new(func)),
            ..Default::default()
        }
    }

    pub fn with_id<T: Into<String>>(mut self, id: T) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_kind<T: Into<String>>(mut self, kind: T) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_assets<T: Into<Asset>>(mut self, assets: T) -> Self {
        self.assets = Some(Box::new(assets.into()));
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    pub fn with_cache_all(mut self, cache_all: bool) -> Self {
        self.cache_all = cache_all;
        self
    }

    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Sets the per-asset completion. It receives the result of this asset
    /// and may push follow-up assets, which are loaded by the same session.
    pub fn on_complete<F>(mut self, func: F) -> Self
    where
        F: FnOnce(&Value, &mut FollowUps) + 'static,
    {
        self.complete = Some(Box::new(func));
        self
    }

    pub fn on_progress<F>(mut self, func: F) -> Self
    where
        F: Fn(f32) + 'static,
    {
        self.progress = Some(Rc::new(func));
        self
    }

    /// Gets a free-form string property.
    #[inline]
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_str())
    }

    #[inline]
    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        self.run.is_some()
    }

    #[inline]
    pub fn take_function(&mut self) -> Option<AsyncFn> {
        self.run.take()
    }

    #[inline]
    pub fn take_complete(&mut self) -> Option<CompleteFn> {
        self.complete.take()
    }

    #[inline]
    pub fn progress(&self) -> Option<ProgressFn> {
        self.progress.clone()
    }
}

impl fmt::Debug for AssetParams {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = f.debug_struct("AssetParams");
        if let Some(ref id) = self.id {
            s.field("id", id);
        }

        if let Some(ref src) = self.src {
            s.field("src", src);
        }

        if let Some(ref kind) = self.kind {
            s.field("type", kind);
        }

        if self.cache {
            s.field("cache", &self.cache);
        }

        if self.run.is_some() {
            s.field("async", &"<fn>");
        }

        if let Some(ref assets) = self.assets {
            s.field("assets", assets);
        }

        if !self.fields.is_empty() {
            s.field("fields", &self.fields);
        }

        s.finish()
    }
}

/// Collects the follow-up assets pushed by a per-asset completion.
#[derive(Default)]
pub struct FollowUps {
    assets: Vec<Asset>,
}

impl FollowUps {
    pub fn new() -> Self {
        Default::default()
    }

    /// Schedules `asset` to be loaded by the session that loaded the asset
    /// being completed.
    #[inline]
    pub fn push<T: Into<Asset>>(&mut self, asset: T) {
        self.assets.push(asset.into());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub(crate) fn into_vec(self) -> Vec<Asset> {
        self.assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes() {
        let v: Asset = vec!["a.png", "b.png"].into();
        match v {
            Asset::List(ref v) => assert_eq!(v.len(), 2),
            _ => unreachable!(),
        }

        let v = Asset::map(vec![("x", "x.png"), ("y", "y.png")]);
        match v {
            Asset::Map(ref v) => {
                assert_eq!(v.keys().collect::<Vec<_>>(), vec!["x", "y"]);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn ids() {
        let nested = AssetParams::new()
            .with_id("group")
            .with_assets(vec![
                Asset::from(AssetParams::src("a.png").with_id("a")),
                Asset::src("b.png"),
            ]);

        let v = Asset::map(vec![
            ("n", Asset::from(nested)),
            ("k", Asset::src("k.png")),
            ("m", Asset::from(AssetParams::src("m.png").with_id("explicit"))),
        ]);

        assert_eq!(v.ids(), vec!["group", "a", "k", "explicit"]);
        assert_eq!(Asset::src("a.png").ids(), Vec::<String>::new());
    }

    #[test]
    fn fields() {
        let mut v = AssetParams::new()
            .with_field("color", "a.jpg")
            .with_field("alpha", "a_alpha.png");

        assert_eq!(v.field_str("color"), Some("a.jpg"));
        assert!(v.has_field("alpha"));
        assert!(!v.is_function());
        assert!(v.take_function().is_none());
    }
}
