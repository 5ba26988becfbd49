//! Render command implementation

use forge_nix::FileKind;

use crate::context::Context;
use crate::error::Result;

/// Print the freshly generated content of one file, without merging.
pub fn run_render(ctx: &Context, kind: FileKind) -> Result<()> {
    let mut engine = ctx.engine()?;
    let model = engine.load()?.model;
    print!("{}", engine.renderer().render(kind, &model));
    Ok(())
}
