//! Load sessions resolve, run and reassemble one submitted asset.
//!
//! A session classifies the submitted asset into its shape, resolves every
//! leaf into a task up front, and starts them with the chosen concurrency:
//!
//! * In parallel mode every task is started before any completion is
//!   awaited. Completions may arrive in any order.
//! * In sequential mode the next task is started only after the completion
//!   of the previous one has returned.
//!
//! Results are written into the position of their descriptor, so the
//! assembled result always mirrors the submitted shape. Once every task,
//! including the follow-ups pushed by per-asset completions, has finished,
//! the session calls its completion exactly once and becomes inert.
//!
//! There is no cancellation. A running session always waits for all of its
//! tasks.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::mem;
use std::rc::{Rc, Weak};

use crate::asset::{Asset, AssetMap, AssetParams, Done, FollowUps, ProgressFn};
use crate::errors::*;
use crate::resource::{destroy_value, Value};
use crate::sched::prelude::{CountLatch, Latch};
use crate::task::{Task, TaskContext, TaskInfo};

/// Options of a load.
pub struct LoadOptions {
    complete: Option<Done>,
    error: Option<Box<dyn FnOnce(Error)>>,
    progress: Option<ProgressFn>,
    /// Overrides the default concurrency of the loader.
    pub parallel: Option<bool>,
    /// Master switch of caching. Nothing is cached if false.
    pub cache: bool,
    /// Caches every leaf, whether its descriptor asks for it or not.
    pub cache_all: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            complete: None,
            error: None,
            progress: None,
            parallel: None,
            cache: true,
            cache_all: false,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the completion, which receives the assembled result.
    pub fn on_complete<F>(mut self, func: F) -> Self
    where
        F: FnOnce(Value) + 'static,
    {
        self.complete = Some(Box::new(func));
        self
    }

    /// Sets the callback of sessions aborted by a follow-up which could not
    /// be resolved. The completion is never called in that case.
    pub fn on_error<F>(mut self, func: F) -> Self
    where
        F: FnOnce(Error) + 'static,
    {
        self.error = Some(Box::new(func));
        self
    }

    /// Sets the progress callback, called with `finished / total` after each
    /// task.
    pub fn on_progress<F>(mut self, func: F) -> Self
    where
        F: Fn(f32) + 'static,
    {
        self.progress = Some(Rc::new(func));
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_cache_all(mut self, cache_all: bool) -> Self {
        self.cache_all = cache_all;
        self
    }
}

/// A weak handle to a running session.
#[derive(Clone)]
pub struct LoadHandle {
    state: Weak<RefCell<State>>,
}

impl LoadHandle {
    /// Returns true until the session has completed or aborted.
    pub fn is_running(&self) -> bool {
        self.state
            .upgrade()
            .map(|v| !v.borrow().destroyed)
            .unwrap_or(false)
    }

    /// Returns the number of tasks which have not finished yet.
    pub fn outstanding(&self) -> usize {
        match self.state.upgrade() {
            Some(v) => {
                let s = v.borrow();
                if s.destroyed {
                    0
                } else {
                    s.latch.count()
                }
            }
            None => 0,
        }
    }
}

enum Shape {
    Single,
    List(usize),
    Map(Vec<String>),
}

struct Entry {
    /// Position in the assembled result. Follow-ups have none.
    slot: Option<usize>,
    info: TaskInfo,
    task: Option<Box<dyn Task>>,
    started: bool,
    finished: bool,
}

struct State {
    ctx: TaskContext,
    shape: Shape,
    entries: Vec<Entry>,
    results: Vec<Option<Value>>,
    pending: VecDeque<usize>,
    running: bool,
    latch: CountLatch,
    finished: usize,
    total: usize,
    complete: Option<Done>,
    error: Option<Box<dyn FnOnce(Error)>>,
    progress: Option<ProgressFn>,
    parallel: bool,
    cache: bool,
    cache_all: bool,
    destroyed: bool,
}

/// The per-request orchestrator of loads.
pub struct LoadSession;

impl LoadSession {
    /// Resolves and starts loading `asset`. Fails without starting anything
    /// if one of its leaves can not be resolved.
    pub fn start(ctx: &TaskContext, asset: Asset, options: LoadOptions) -> Result<LoadHandle> {
        let (shape, leaves) = flatten(asset);
        let parallel = options.parallel.unwrap_or_else(|| ctx.parallel());

        let mut entries = Vec::with_capacity(leaves.len());
        for (i, mut params) in leaves.into_iter().enumerate() {
            params.uncached |= !options.cache;
            match ctx.resolve(params) {
                Ok((mut info, task)) => {
                    apply_cache_policy(&mut info, options.cache, options.cache_all);
                    entries.push(Entry {
                        slot: Some(i),
                        info,
                        task: Some(task),
                        started: false,
                        finished: false,
                    });
                }
                Err(err) => {
                    for v in &mut entries {
                        if let Some(mut task) = v.task.take() {
                            task.destroy();
                        }
                    }

                    return Err(err);
                }
            }
        }

        let num = entries.len();
        let state = Rc::new(RefCell::new(State {
            ctx: ctx.clone(),
            shape,
            entries,
            results: vec![None; num],
            pending: VecDeque::new(),
            running: false,
            latch: CountLatch::new(num),
            finished: 0,
            total: num,
            complete: options.complete,
            error: options.error,
            progress: options.progress,
            parallel,
            cache: options.cache,
            cache_all: options.cache_all,
            destroyed: false,
        }));

        let handle = LoadHandle {
            state: Rc::downgrade(&state),
        };

        info!(
            "Starts loading {} asset(s) {}.",
            num,
            if parallel { "in parallel" } else { "sequentially" }
        );

        if num == 0 {
            finish(&state);
        } else if parallel {
            for i in 0..num {
                start_task(&state, i);
            }
        } else {
            state.borrow_mut().pending.extend(0..num);
            pump(&state);
        }

        Ok(handle)
    }
}

/// Splits `asset` into its shape and leaf descriptors. Composite elements of
/// lists and maps become nested loads, and leaves of maps are identified by
/// their keys unless they carry an id.
fn flatten(asset: Asset) -> (Shape, Vec<AssetParams>) {
    fn leaf(asset: Asset) -> AssetParams {
        match asset {
            Asset::Single(params) => params,
            composite => AssetParams::new().with_assets(composite),
        }
    }

    match asset {
        Asset::Single(params) => (Shape::Single, vec![params]),
        Asset::List(assets) => (
            Shape::List(assets.len()),
            assets.into_iter().map(leaf).collect(),
        ),
        Asset::Map(assets) => {
            let mut keys = Vec::with_capacity(assets.len());
            let mut leaves = Vec::with_capacity(assets.len());

            for (k, v) in assets {
                let mut params = leaf(v);
                if params.id.is_none() {
                    params.id = Some(k.clone());
                }

                keys.push(k);
                leaves.push(params);
            }

            (Shape::Map(keys), leaves)
        }
    }
}

fn apply_cache_policy(info: &mut TaskInfo, cache: bool, cache_all: bool) {
    let requested = cache && (info.cache || cache_all);
    let named = info.id.as_ref().map(|v| !v.is_empty()).unwrap_or(false);

    if requested && !named {
        warn!(
            "Asset {} requests caching without an id, caching is disabled for it.",
            info
        );
    }

    info.cache = requested && named;
}

fn start_task(state: &Rc<RefCell<State>>, index: usize) {
    let (ctx, mut task) = {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        let entry = &mut s.entries[index];
        entry.started = true;

        match entry.task.take() {
            Some(task) => {
                debug!("Starts task {}.", entry.info);
                (s.ctx.clone(), task)
            }
            None => return,
        }
    };

    let st = state.clone();
    task.start(&ctx, Box::new(move |value| on_done(&st, index, value)));

    // The completion might have been called in place.
    let mut s = state.borrow_mut();
    if s.entries[index].finished {
        drop(s);
        task.destroy();
    } else {
        s.entries[index].task = Some(task);
    }
}

/// Starts the next pending task in sequential mode.
fn pump(state: &Rc<RefCell<State>>) {
    let next = {
        let mut s = state.borrow_mut();
        if s.destroyed || s.running {
            return;
        }

        let next = s.pending.pop_front();
        s.running = next.is_some();
        next
    };

    if let Some(index) = next {
        start_task(state, index);
    }
}

fn on_done(state: &Rc<RefCell<State>>, index: usize, value: Value) {
    let (ctx, id, cache, complete, task) = {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        let entry = &mut s.entries[index];
        entry.finished = true;

        if s.destroyed {
            let task = entry.task.take();
            drop(guard);

            if let Some(mut task) = task {
                task.destroy();
            }

            destroy_value(&value);
            return;
        }

        (
            s.ctx.clone(),
            entry.info.id.clone(),
            entry.info.cache,
            entry.info.complete.take(),
            entry.task.take(),
        )
    };

    if cache && !value.is_failed() {
        if let Some(ref id) = id {
            ctx.write_cache(id, value.clone());
        }
    }

    let mut follow_ups = FollowUps::new();
    if let Some(complete) = complete {
        complete(&value, &mut follow_ups);
    }

    if let Some(mut task) = task {
        task.destroy();
    }

    let added = match add_follow_ups(state, &ctx, follow_ups) {
        Ok(added) => added,
        Err(err) => {
            if !cache {
                destroy_value(&value);
            }

            abort(state, err);
            return;
        }
    };

    let (done, progress, fraction, parallel) = {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;

        if let Some(slot) = s.entries[index].slot {
            s.results[slot] = Some(value);
        }

        s.finished += 1;
        s.latch.set();
        s.running = false;

        let fraction = s.finished as f32 / s.total as f32;
        (s.latch.is_set(), s.progress.clone(), fraction, s.parallel)
    };

    if let Some(progress) = progress {
        progress(fraction);
    }

    if done {
        finish(state);
    } else if parallel {
        for i in added {
            start_task(state, i);
        }
    } else {
        let st = state.clone();
        ctx.dispatcher().defer(move || pump(&st));
    }
}

fn add_follow_ups(
    state: &Rc<RefCell<State>>,
    ctx: &TaskContext,
    follow_ups: FollowUps,
) -> Result<Vec<usize>> {
    if follow_ups.is_empty() {
        return Ok(Vec::new());
    }

    let cache = state.borrow().cache;
    let mut resolved = Vec::new();
    for asset in follow_ups.into_vec() {
        let (_, leaves) = flatten(asset);
        for mut params in leaves {
            params.uncached |= !cache;
            match ctx.resolve(params) {
                Ok(v) => resolved.push(v),
                Err(err) => {
                    for (_, mut task) in resolved {
                        task.destroy();
                    }

                    return Err(err);
                }
            }
        }
    }

    let mut guard = state.borrow_mut();
    let s = &mut *guard;
    let mut added = Vec::with_capacity(resolved.len());

    for (mut info, task) in resolved {
        apply_cache_policy(&mut info, s.cache, s.cache_all);
        debug!("Adds follow-up task {}.", info);

        added.push(s.entries.len());
        s.entries.push(Entry {
            slot: None,
            info,
            task: Some(task),
            started: false,
            finished: false,
        });

        s.latch.increment();
        s.total += 1;
    }

    if !s.parallel {
        s.pending.extend(added.iter().cloned());
    }

    Ok(added)
}

/// Assembles the result and calls the completion of the session.
fn finish(state: &Rc<RefCell<State>>) {
    let (complete, result, total) = {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        s.destroyed = true;

        let results = mem::replace(&mut s.results, Vec::new());
        let shape = mem::replace(&mut s.shape, Shape::Single);
        (s.complete.take(), assemble(shape, results), s.total)
    };

    info!("Finishes loading {} asset(s).", total);
    if let Some(complete) = complete {
        complete(result);
    }
}

fn assemble(shape: Shape, results: Vec<Option<Value>>) -> Value {
    let mut iter = results.into_iter().map(|v| v.unwrap_or_default());
    match shape {
        Shape::Single => iter.next().unwrap_or_default(),
        Shape::List(len) => Value::List(iter.take(len).collect()),
        Shape::Map(keys) => Value::Map(keys.into_iter().zip(iter).collect::<AssetMap<Value>>()),
    }
}

/// Marks the session destroyed without calling its completion. Tasks which
/// never started are destroyed, and partial results nobody owns are
/// destroyed as well.
fn abort(state: &Rc<RefCell<State>>, err: Error) {
    error!("Aborts loading session: {}", err);

    let (tasks, results, error) = {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        s.destroyed = true;
        s.complete = None;
        s.pending.clear();

        let mut tasks = Vec::new();
        let mut results = Vec::new();
        for entry in &mut s.entries {
            if !entry.started {
                if let Some(task) = entry.task.take() {
                    tasks.push(task);
                }
            }

            if let Some(slot) = entry.slot {
                if !entry.info.cache {
                    if let Some(v) = s.results[slot].take() {
                        results.push(v);
                    }
                }
            }
        }

        (tasks, results, s.error.take())
    };

    for mut task in tasks {
        task.destroy();
    }

    for v in &results {
        destroy_value(v);
    }

    if let Some(error) = error {
        error(err);
    }
}
