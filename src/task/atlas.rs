use crate::asset::{AssetParams, Done};
use crate::errors::*;
use crate::resource::prelude::*;
use crate::sched::prelude::Join;

use super::{Task, TaskContext, TaskKind};

/// Loads a frame manifest and its backing image concurrently, and merges
/// them into an `Atlas`.
///
/// ```json
/// { "atlas": "res:hero.json", "image": "res:hero.png" }
/// ```
pub struct AtlasTask {
    atlas: String,
    image: String,
    priority: i32,
}

fn merge(manifest: &Value, image: &Value) -> Result<Value> {
    let manifest = manifest
        .resource::<Json>()
        .ok_or_else(|| Error::Malformed(format!("Atlas manifest is not a json: {:?}", manifest)))?
        .to::<AtlasManifest>()?;

    let image = image
        .downcast::<Image>()
        .ok_or_else(|| Error::Malformed(format!("Atlas source is not an image: {:?}", image)))?;

    Ok(Value::new(Atlas::new(image, manifest)?))
}

impl Task for AtlasTask {
    fn start(&mut self, ctx: &TaskContext, done: Done) {
        let atlas = self.atlas.clone();
        let join = Join::new(2, move |values: Vec<Option<Value>>| {
            let mut iter = values.into_iter().map(|v| v.unwrap_or_default());
            let (m, i) = (iter.next().unwrap_or_default(), iter.next().unwrap_or_default());

            // The image is owned by the atlas from now on.
            let merged = merge(&m, &i);
            destroy_value(&m);

            match merged {
                Ok(value) => done(value),
                Err(err) => {
                    warn!("Failed to build atlas {}: {}", atlas, err);
                    destroy_value(&i);
                    done(Value::failed(err));
                }
            }
        });

        ctx.fetch(&self.atlas, self.priority, None, None, join.slot(0));
        ctx.fetch(&self.image, self.priority, None, None, join.slot(1));
    }
}

impl TaskKind for AtlasTask {
    const NAME: &'static str = "atlas";

    fn test(params: &AssetParams) -> bool {
        params.has_field("atlas") && params.has_field("image")
    }

    fn create(params: AssetParams) -> Result<Self> {
        let field = |key: &str| {
            params
                .field_str(key)
                .map(|v| v.to_owned())
                .ok_or_else(|| Error::Malformed(format!("Field {} must be a source string.", key)))
        };

        Ok(AtlasTask {
            atlas: field("atlas")?,
            image: field("image")?,
            priority: params.priority,
        })
    }
}
