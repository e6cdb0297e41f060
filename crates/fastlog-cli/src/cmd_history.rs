use crate::clock;
use crate::ctx::Ctx;
use fastlog_core::{decorate_log, recent, DecoratedEvent, Stats};
use serde::Serialize;

#[derive(Serialize)]
struct HistoryJson {
    events: Vec<DecoratedEvent>,
    stats: Stats,
}

pub fn execute(ctx: &Ctx, limit: usize, json: bool) -> anyhow::Result<()> {
    let now = clock::now_ms();
    let session = ctx.session(now)?;
    let log = session.load()?;
    let decorated = decorate_log(&log, session.config());
    let shown = recent(&decorated, limit);
    let stats = Stats::from_decorated(&decorated);

    if json {
        let out = HistoryJson {
            events: shown,
            stats,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("No events logged.");
        return Ok(());
    }
    for d in &shown {
        println!("{}", entry_line(d));
    }
    println!();
    println!(
        "Fasts: {}/{} on target   Eating windows: {}/{} on target",
        stats.fasts_succeeded, stats.fasts, stats.eating_windows_succeeded, stats.eating_windows
    );
    if let Some(started) = stats.longest_fast_started {
        println!(
            "Longest fast: {} (started {})",
            clock::span_short(stats.longest_fast_ms),
            clock::short(started)
        );
    }
    Ok(())
}

/// `+ Mon 01 08:00  [16:00] Started eating  (1700000000000)`
fn entry_line(d: &DecoratedEvent) -> String {
    format!(
        "{} {}  [{}] Started {:<7}  ({})",
        d.success_state.marker(),
        clock::short(d.event.ts),
        clock::span_short(d.duration),
        d.event.start,
        d.event.ts
    )
}
