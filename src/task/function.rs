use crate::asset::{AssetParams, AsyncFn, Done};
use crate::errors::*;
use crate::resource::Value;

use super::{Task, TaskContext, TaskKind};

/// Runs a programmatic step. The step receives the completion directly and
/// its result is passed through untouched.
pub struct FunctionTask {
    run: Option<AsyncFn>,
}

impl Task for FunctionTask {
    fn start(&mut self, _: &TaskContext, done: Done) {
        match self.run.take() {
            Some(run) => run(done),
            None => done(Value::failed("The function has been started already.")),
        }
    }

    fn destroy(&mut self) {
        self.run = None;
    }
}

impl TaskKind for FunctionTask {
    const NAME: &'static str = "function";

    fn test(params: &AssetParams) -> bool {
        params.is_function()
    }

    fn create(mut params: AssetParams) -> Result<Self> {
        let run = params
            .take_function()
            .ok_or_else(|| Error::Malformed("Function tasks require an async step.".into()))?;

        Ok(FunctionTask { run: Some(run) })
    }
}
