use crate::clock;
use crate::ctx::Ctx;
use crate::prompt;
use fastlog_core::Outcome;

pub fn reschedule(ctx: &Ctx, old: &str, new: &str) -> anyhow::Result<()> {
    let now = clock::now_ms();
    let old_ts = clock::parse_time(old, now)?;
    let new_ts = clock::parse_time(new, now)?;
    let mut session = ctx.session(now)?;

    let m = session.reschedule(old_ts, new_ts, now)?;
    match m.outcome {
        Outcome::Applied => println!(
            "Moved event {} -> {}",
            clock::long(old_ts),
            clock::long(new_ts)
        ),
        Outcome::NotFound => println!("No event at {} ({old_ts}).", clock::long(old_ts)),
    }
    Ok(())
}

pub fn delete(ctx: &Ctx, at: &str, yes: bool) -> anyhow::Result<()> {
    let now = clock::now_ms();
    let ts = clock::parse_time(at, now)?;
    let mut session = ctx.session(now)?;

    if !yes && !prompt::confirm(&format!("Delete the event at {}?", clock::long(ts))) {
        println!("Nothing deleted.");
        return Ok(());
    }

    let m = session.delete(ts, now)?;
    match m.outcome {
        Outcome::Applied => println!("Deleted {} event(s) at {}", m.affected, clock::long(ts)),
        Outcome::NotFound => println!("No event at {} ({ts}).", clock::long(ts)),
    }
    Ok(())
}
