use crate::asset::{AssetParams, Done, ProgressFn};
use crate::errors::*;

use super::{Task, TaskContext, TaskKind};

/// Fetches the `src` of a descriptor and passes the content through as-is.
pub struct LoadTask {
    src: String,
    priority: i32,
    data: Option<serde_json::Value>,
    progress: Option<ProgressFn>,
}

impl Task for LoadTask {
    fn start(&mut self, ctx: &TaskContext, done: Done) {
        ctx.fetch(
            &self.src,
            self.priority,
            self.data.take(),
            self.progress.clone(),
            done,
        );
    }

    fn destroy(&mut self) {
        self.data = None;
        self.progress = None;
    }
}

impl TaskKind for LoadTask {
    const NAME: &'static str = "load";

    fn test(params: &AssetParams) -> bool {
        params.src.is_some()
    }

    fn create(mut params: AssetParams) -> Result<Self> {
        let src = params
            .src
            .take()
            .ok_or_else(|| Error::Malformed("Direct loads require a src.".into()))?;

        Ok(LoadTask {
            src,
            priority: params.priority,
            data: params.data.take(),
            progress: params.progress(),
        })
    }
}

impl LoadTask {
    #[inline]
    pub fn src(&self) -> &str {
        &self.src
    }
}
