use crate::clock;
use crate::ctx::Ctx;
use fastlog_core::{Phase, Progress, Snapshot};
use serde::Serialize;

#[derive(Serialize)]
struct StatusJson<'a> {
    now: i64,
    #[serde(flatten)]
    snapshot: &'a Snapshot,
    progress: Option<Progress>,
}

pub fn execute(ctx: &Ctx, json: bool) -> anyhow::Result<()> {
    let now = clock::now_ms();
    let session = ctx.session(now)?;
    let snap = session.snapshot();
    let progress = session.tick(now);

    if json {
        let out = StatusJson {
            now,
            snapshot: snap,
            progress,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print!("{}", render(snap, progress.as_ref()));
    Ok(())
}

/// Label for the action that starts `next`.
pub fn action_label(next: Phase) -> &'static str {
    match next {
        Phase::Eating => "Start eating",
        Phase::Fasting => "Start fasting",
    }
}

/// `Remaining: 07:59:59 [50%]` or `Extra: 00:10:00 [0%]`.
pub fn remaining_line(p: &Progress) -> String {
    let label = if p.overrun { "Extra" } else { "Remaining" };
    format!(
        "{label}: {} [{}%]",
        clock::span(p.display_ms()),
        p.percent_remaining()
    )
}

fn render(snap: &Snapshot, progress: Option<&Progress>) -> String {
    let mut out = String::new();
    let Some(last) = snap.last_event else {
        out.push_str("No events yet (eating). Run `fastlog log` to start a fast.\n");
        return out;
    };
    out.push_str(&format!(
        "Currently {} since {}\n",
        snap.state,
        clock::long(last.ts)
    ));
    if let Some(p) = progress {
        out.push_str(&remaining_line(p));
        out.push('\n');
        out.push_str(&format!(
            "Last: {}  Goal: {}\n",
            clock::short(p.phase_started_at()),
            clock::short(p.target.ts)
        ));
        out.push_str(&format!(
            "Next: {}{}\n",
            action_label(p.target.start),
            if p.overrun { " (target reached)" } else { "" }
        ));
    }
    out
}
