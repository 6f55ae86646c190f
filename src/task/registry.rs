use crate::asset::AssetParams;
use crate::errors::*;

use super::prelude::*;

type TestFn = Box<dyn Fn(&AssetParams) -> bool>;
type CreateFn = Box<dyn Fn(AssetParams) -> Result<Box<dyn Task>>>;

/// A registered rule mapping descriptors to a task kind.
pub struct TaskDef {
    name: String,
    priority: i32,
    test: TestFn,
    create: CreateFn,
}

impl TaskDef {
    /// Creates a definition from closures.
    pub fn new<T1, T2, T3>(name: T1, priority: i32, test: T2, create: T3) -> Self
    where
        T1: Into<String>,
        T2: Fn(&AssetParams) -> bool + 'static,
        T3: Fn(AssetParams) -> Result<Box<dyn Task>> + 'static,
    {
        TaskDef {
            name: name.into(),
            priority,
            test: Box::new(test),
            create: Box::new(create),
        }
    }

    /// Creates a definition of task kind `T`.
    pub fn of<T: TaskKind>(priority: i32) -> Self {
        TaskDef::new(T::NAME, priority, T::test, |params| {
            let task = T::create(params)?;
            Ok(Box::new(task) as Box<dyn Task>)
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    #[inline]
    pub fn test(&self, params: &AssetParams) -> bool {
        (self.test)(params)
    }
}

/// Holds every registered task definition, ordered by descending priority.
#[derive(Default)]
pub struct TaskRegistry {
    defs: Vec<TaskDef>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        TaskRegistry { defs: Vec::new() }
    }

    /// Creates a registry with the built-in task kinds.
    pub fn with_defaults() -> Self {
        let mut registry = TaskRegistry::new();
        registry.register::<FunctionTask>(100);
        registry.register::<ColorAlphaTask>(80);
        registry.register::<AtlasTask>(80);
        registry.register::<ListTask>(60);
        registry.register::<LoadTask>(0);
        registry
    }

    /// Registers task kind `T` with `priority`.
    #[inline]
    pub fn register<T: TaskKind>(&mut self, priority: i32) {
        self.register_def(TaskDef::of::<T>(priority));
    }

    /// Registers a task definition. Definitions with equal priorities are
    /// tested in registration order.
    pub fn register_def(&mut self, def: TaskDef) {
        info!("Registers task {} with priority {}.", def.name, def.priority);
        self.defs.push(def);
        // Stable.
        self.defs.sort_by(|lhs, rhs| rhs.priority.cmp(&lhs.priority));
    }

    /// Selects the definition handling `params`. An explicit kind hint
    /// bypasses the predicates.
    pub fn select(&self, params: &AssetParams) -> Result<&TaskDef> {
        if let Some(ref kind) = params.kind {
            return self
                .defs
                .iter()
                .find(|v| &v.name == kind)
                .ok_or_else(|| Error::UnknownKind(kind.clone()));
        }

        self.defs
            .iter()
            .find(|v| v.test(params))
            .ok_or_else(|| Error::Unresolved(format!("{:?}", params)))
    }

    /// Resolves `params` into a task.
    pub fn resolve(&self, mut params: AssetParams) -> Result<(TaskInfo, Box<dyn Task>)> {
        let def = self.select(&params)?;

        let info = TaskInfo {
            kind: def.name.clone(),
            id: params.id.clone(),
            cache: params.cache,
            complete: params.take_complete(),
        };

        let task = (def.create)(params)?;
        debug!("Resolves task {}.", info);
        Ok((info, task))
    }

    /// Returns the names of definitions in the order they are tested.
    pub fn names(&self) -> Vec<&str> {
        self.defs.iter().map(|v| v.name.as_str()).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.defs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Done;
    use crate::resource::Value;

    struct Nop;

    impl Task for Nop {
        fn start(&mut self, _: &TaskContext, done: Done) {
            done(Value::Empty);
        }
    }

    fn def(name: &str, priority: i32) -> TaskDef {
        TaskDef::new(name, priority, |_| true, |_| Ok(Box::new(Nop) as Box<dyn Task>))
    }

    #[test]
    fn defaults() {
        let registry = TaskRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec!["function", "color_alpha", "atlas", "list", "load"]
        );
    }

    #[test]
    fn stable() {
        let mut registry = TaskRegistry::new();
        registry.register_def(def("a", 0));
        registry.register_def(def("b", 10));
        registry.register_def(def("c", 0));
        registry.register_def(def("d", 10));
        assert_eq!(registry.names(), vec!["b", "d", "a", "c"]);

        let (info, _) = registry.resolve(AssetParams::new()).unwrap();
        assert_eq!(info.kind, "b");

        let (info, _) = registry.resolve(AssetParams::new().with_kind("c")).unwrap();
        assert_eq!(info.kind, "c");

        assert!(registry.resolve(AssetParams::new().with_kind("x")).is_err());
    }
}
