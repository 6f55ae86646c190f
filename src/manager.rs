//! The `AssetManager` ties the pipeline together: task registration, loads,
//! the asset cache and teardown.
//!
//! ```rust
//! use conveyor::prelude::*;
//!
//! let mut params = LoaderParams::default();
//! let memory = Memory::new();
//! memory.insert("greeting.txt", "hello");
//! params.res.schemas.add("mem", memory);
//! params.res.default_schema = "mem".into();
//!
//! let loader = AssetManager::new(params);
//! let asset = AssetParams::src("greeting.txt").with_id("greeting").with_cache(true);
//! loader.load(asset, LoadOptions::new()).unwrap();
//! loader.run_until_idle();
//!
//! let v = loader.read("greeting").unwrap();
//! assert_eq!(v.resource::<Text>().and_then(|v| v.text()), Some("hello".into()));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;

use crate::asset::Asset;
use crate::cache::{AssetCache, CacheKey};
use crate::errors::*;
use crate::res::{ResourceParams, ResourceSystem};
use crate::resource::Value;
use crate::sched::prelude::Dispatcher;
use crate::session::{LoadHandle, LoadOptions, LoadSession};
use crate::task::prelude::*;

/// The setup parameters of an `AssetManager`.
#[derive(Clone)]
pub struct LoaderParams {
    pub res: ResourceParams,
    /// Loads in parallel unless a load says otherwise.
    pub parallel: bool,
}

impl Default for LoaderParams {
    fn default() -> Self {
        LoaderParams {
            res: ResourceParams::default(),
            parallel: true,
        }
    }
}

impl LoaderParams {
    /// Applies deserialized settings on top of these parameters.
    pub fn apply(&mut self, settings: &LoaderSettings) -> Result<()> {
        for (k, v) in &settings.shortcuts {
            self.res.shortcuts.add(k.as_str(), v.as_str())?;
        }

        if let Some(ref schema) = settings.default_schema {
            self.res.default_schema = schema.clone();
        }

        if let Some(parallel) = settings.parallel {
            self.parallel = parallel;
        }

        Ok(())
    }
}

/// The serializable part of `LoaderParams`.
///
/// ```json
/// {
///     "shortcuts": { "res:": "file://assets/" },
///     "defaultSchema": "file",
///     "parallel": false
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderSettings {
    pub shortcuts: crate::asset::AssetMap<String>,
    pub default_schema: Option<String>,
    pub parallel: Option<bool>,
}

impl LoaderSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub(crate) struct Shared {
    pub registry: RefCell<TaskRegistry>,
    pub cache: RefCell<Option<AssetCache>>,
    pub res: ResourceSystem,
    pub sched: Rc<Dispatcher>,
    pub parallel: bool,
}

pub struct AssetManager {
    shared: Rc<Shared>,
}

impl AssetManager {
    /// Creates a manager with the built-in task kinds registered.
    pub fn new(params: LoaderParams) -> Self {
        AssetManager::with_registry(params, TaskRegistry::with_defaults())
    }

    /// Creates a manager with default parameters and the built-in task kinds.
    pub fn with_defaults() -> Self {
        AssetManager::new(LoaderParams::default())
    }

    pub fn with_registry(params: LoaderParams, registry: TaskRegistry) -> Self {
        info!(
            "Creates asset manager with {} task kind(s) and {} schema(s).",
            registry.len(),
            params.res.schemas.len()
        );

        let shared = Shared {
            registry: RefCell::new(registry),
            cache: RefCell::new(Some(AssetCache::new())),
            res: ResourceSystem::new(params.res),
            sched: Rc::new(Dispatcher::new()),
            parallel: params.parallel,
        };

        AssetManager {
            shared: Rc::new(shared),
        }
    }

    /// Registers task kind `T` with `priority`.
    pub fn register<T: TaskKind>(&self, priority: i32) {
        self.shared.registry.borrow_mut().register::<T>(priority);
    }

    pub fn register_def(&self, def: TaskDef) {
        self.shared.registry.borrow_mut().register_def(def);
    }

    /// Loads `asset`. The completion of `options` receives a result shaped
    /// like `asset`.
    pub fn load<T: Into<Asset>>(&self, asset: T, options: LoadOptions) -> Result<LoadHandle> {
        if self.shared.cache.borrow().is_none() {
            return Err(Error::Destroyed);
        }

        LoadSession::start(&self.context(), asset.into(), options)
    }

    /// Reads the cached value of `id`.
    pub fn read(&self, id: &str) -> Option<Value> {
        self.shared
            .cache
            .borrow()
            .as_ref()
            .and_then(|v| v.read(id).cloned())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.shared
            .cache
            .borrow()
            .as_ref()
            .map(|v| v.contains(id))
            .unwrap_or(false)
    }

    /// Destroys and removes a cached value.
    pub fn delete<'a, T: Into<CacheKey<'a>>>(&self, key: T) -> bool {
        match *self.shared.cache.borrow_mut() {
            Some(ref mut cache) => cache.delete(key),
            None => false,
        }
    }

    /// Destroys and removes every cached value `asset` could have produced.
    /// Returns the number of deleted entries.
    pub fn unload(&self, asset: &Asset) -> usize {
        let ids = asset.ids();
        match *self.shared.cache.borrow_mut() {
            Some(ref mut cache) => ids.iter().filter(|v| cache.delete(v.as_str())).count(),
            None => 0,
        }
    }

    /// Destroys and removes every cached value.
    pub fn unload_all(&self) {
        if let Some(ref mut cache) = *self.shared.cache.borrow_mut() {
            cache.empty();
        }
    }

    /// Runs the completions delivered since the last call.
    #[inline]
    pub fn advance(&self) -> usize {
        self.shared.sched.advance()
    }

    /// Runs completions until nothing is left.
    #[inline]
    pub fn run_until_idle(&self) -> usize {
        self.shared.sched.run_until_idle()
    }

    #[inline]
    pub fn dispatcher(&self) -> &Rc<Dispatcher> {
        &self.shared.sched
    }

    /// Returns the context tasks run with.
    #[inline]
    pub fn context(&self) -> TaskContext {
        TaskContext(self.shared.clone())
    }

    /// Destroys every cached value and the cache itself. Loads still running
    /// finish, but nothing is cached anymore.
    pub fn destroy(self) {
        let cache = self.shared.cache.borrow_mut().take();
        if let Some(cache) = cache {
            info!("Destroys asset cache with {} asset(s).", cache.len());
            cache.destroy();
        }
    }
}
