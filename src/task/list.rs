use std::cell::Cell;
use std::rc::Rc;

use crate::asset::{Asset, AssetParams, Done};
use crate::errors::*;
use crate::resource::Value;
use crate::session::{LoadHandle, LoadOptions};

use super::{Task, TaskContext, TaskKind};

/// Loads the embedded `assets` of a descriptor with a nested session. The
/// result is the assembled result of the nested session.
pub struct ListTask {
    assets: Option<Asset>,
    parallel: Option<bool>,
    cache_all: bool,
    cache: bool,
    handle: Option<LoadHandle>,
}

impl ListTask {
    /// Returns the handle of the nested session once started.
    #[inline]
    pub fn handle(&self) -> Option<&LoadHandle> {
        self.handle.as_ref()
    }
}

impl Task for ListTask {
    fn start(&mut self, ctx: &TaskContext, done: Done) {
        let assets = match self.assets.take() {
            Some(assets) => assets,
            None => {
                done(Value::failed("The nested assets have been loaded already."));
                return;
            }
        };

        let slot: Rc<Cell<Option<Done>>> = Rc::new(Cell::new(Some(done)));
        let (s1, s2) = (slot.clone(), slot.clone());

        let mut options = LoadOptions::new()
            .on_complete(move |value| {
                if let Some(done) = s1.take() {
                    done(value);
                }
            })
            .on_error(move |err| {
                if let Some(done) = s2.take() {
                    done(Value::failed(err));
                }
            });

        options.parallel = self.parallel;
        options.cache_all = self.cache_all;
        options.cache = self.cache;

        match ctx.load(assets, options) {
            Ok(handle) => self.handle = Some(handle),
            Err(err) => {
                error!("Failed to load nested assets: {}", err);
                if let Some(done) = slot.take() {
                    done(Value::failed(err));
                }
            }
        }
    }

    fn destroy(&mut self) {
        self.assets = None;
        self.handle = None;
    }
}

impl TaskKind for ListTask {
    const NAME: &'static str = "list";

    fn test(params: &AssetParams) -> bool {
        params.assets.is_some()
    }

    fn create(mut params: AssetParams) -> Result<Self> {
        let assets = params
            .assets
            .take()
            .ok_or_else(|| Error::Malformed("List tasks require nested assets.".into()))?;

        Ok(ListTask {
            assets: Some(*assets),
            parallel: params.parallel,
            cache_all: params.cache_all,
            cache: !params.uncached,
            handle: None,
        })
    }
}
