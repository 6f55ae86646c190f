use crate::asset::{AssetParams, Done};
use crate::errors::*;
use crate::resource::prelude::*;
use crate::sched::prelude::Join;

use super::{Task, TaskContext, TaskKind};

/// Loads a color image and a separate alpha mask concurrently, and merges
/// them into one image whose alpha channel is the red channel of the mask.
///
/// ```json
/// { "color": "res:hero.jpg", "alpha": "res:hero_alpha.png" }
/// ```
pub struct ColorAlphaTask {
    color: String,
    alpha: String,
    priority: i32,
}

fn merge(color: &Value, alpha: &Value) -> Result<Value> {
    let c = color
        .resource::<Image>()
        .ok_or_else(|| Error::Malformed(format!("Color source is not an image: {:?}", color)))?;
    let a = alpha
        .resource::<Image>()
        .ok_or_else(|| Error::Malformed(format!("Alpha source is not an image: {:?}", alpha)))?;

    Ok(Value::new(c.with_alpha_from(a)?))
}

impl Task for ColorAlphaTask {
    fn start(&mut self, ctx: &TaskContext, done: Done) {
        let color = self.color.clone();
        let join = Join::new(2, move |values: Vec<Option<Value>>| {
            let mut iter = values.into_iter().map(|v| v.unwrap_or_default());
            let (c, a) = (iter.next().unwrap_or_default(), iter.next().unwrap_or_default());

            let merged = merge(&c, &a);
            destroy_value(&c);
            destroy_value(&a);

            match merged {
                Ok(value) => done(value),
                Err(err) => {
                    warn!("Failed to merge alpha channel of {}: {}", color, err);
                    done(Value::failed(err));
                }
            }
        });

        ctx.fetch(&self.color, self.priority, None, None, join.slot(0));
        ctx.fetch(&self.alpha, self.priority, None, None, join.slot(1));
    }
}

impl TaskKind for ColorAlphaTask {
    const NAME: &'static str = "color_alpha";

    fn test(params: &AssetParams) -> bool {
        params.has_field("color") && params.has_field("alpha")
    }

    fn create(params: AssetParams) -> Result<Self> {
        let field = |key: &str| {
            params
                .field_str(key)
                .map(|v| v.to_owned())
                .ok_or_else(|| Error::Malformed(format!("Field {} must be a source string.", key)))
        };

        Ok(ColorAlphaTask {
            color: field("color")?,
            alpha: field("alpha")?,
            priority: params.priority,
        })
    }
}
