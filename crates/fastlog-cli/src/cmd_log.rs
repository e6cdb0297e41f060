use crate::clock;
use crate::ctx::Ctx;
use crate::prompt;
use fastlog_core::Phase;
use fastlog_store::LogOutcome;

pub fn execute(ctx: &Ctx, at: Option<&str>, phase: Option<Phase>, yes: bool) -> anyhow::Result<()> {
    let now = clock::now_ms();
    let ts = match at {
        Some(s) => clock::parse_time(s, now)?,
        None => now,
    };
    let mut session = ctx.session(now)?;

    let outcome = session.log_event(ts, phase, now, |p| {
        yes || prompt::confirm(&format!(
            "There is still {} left of your fast. Are you sure?",
            clock::span(p.ms_remaining)
        ))
    })?;

    match outcome {
        LogOutcome::Logged(event) => {
            println!("Started {} at {}", event.start, clock::long(event.ts));
            if let Some(target) = session.snapshot().target {
                println!(
                    "Next: start {} at {}",
                    target.start,
                    clock::short(target.ts)
                );
            }
        }
        LogOutcome::Declined => println!("Nothing logged."),
        LogOutcome::Changed => {
            println!("The log changed while you were deciding. Nothing logged; run it again.")
        }
    }
    Ok(())
}
