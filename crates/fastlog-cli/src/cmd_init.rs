use crate::ctx::Ctx;
use fastlog_store::{FileStorage, LogStorage};

pub fn execute(ctx: &Ctx) -> anyhow::Result<()> {
    let paths = &ctx.paths;
    if paths.is_initialized() {
        paths.ensure_layout()?;
        println!("Already initialized at {}", paths.root.display());
        return Ok(());
    }

    paths.ensure_layout()?;
    FileStorage::new(paths.clone()).update(&[])?;

    println!("Initialized fastlog store at {}", paths.root.display());
    println!(
        "  interval: {}h fasting / {}h eating",
        ctx.config.fast_hours(),
        ctx.config.eat_hours()
    );
    Ok(())
}
