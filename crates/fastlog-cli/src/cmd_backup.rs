use crate::clock;
use crate::ctx::Ctx;
use crate::prompt;
use fastlog_backup::{format_log, BackupV1};
use fastlog_store::write_atomic;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Output path that means "timestamped file in the store's backups dir".
const AUTO: &str = "auto";

fn resolve_out(ctx: &Ctx, out: &Path, now: i64) -> anyhow::Result<PathBuf> {
    if out.as_os_str() != AUTO {
        return Ok(out.to_path_buf());
    }
    ctx.paths.ensure_layout()?;
    let stamp = fastlog_core::format::format_with(
        now,
        time::UtcOffset::UTC,
        "[year][month][day]T[hour][minute][second]Z",
    );
    Ok(ctx.paths.backup_file(&stamp))
}

pub fn backup(ctx: &Ctx, out: Option<&Path>) -> anyhow::Result<()> {
    let now = clock::now_ms();
    let session = ctx.session(now)?;
    let text = session.backup(&BackupV1)?;

    match out {
        None => println!("{text}"),
        Some(out) => {
            let path = resolve_out(ctx, out, now)?;
            write_atomic(&path, text.as_bytes())?;
            println!("Wrote backup to {}", path.display());
        }
    }
    Ok(())
}

fn read_input(file: &Path) -> anyhow::Result<String> {
    if file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", file.display()))
}

pub fn restore(ctx: &Ctx, file: &Path, merge: bool, yes: bool) -> anyhow::Result<()> {
    let now = clock::now_ms();
    let text = read_input(file)?;
    let mut session = ctx.session(now)?;

    if !merge && !yes {
        let current = session.load()?.len();
        let question = format!("Replace the current log ({current} events) with the backup?");
        if !prompt::confirm(&question) {
            println!("Restore aborted.");
            return Ok(());
        }
    }

    let m = session.restore(&BackupV1, &text, merge, now)?;
    if merge {
        println!("Merged {} new event(s); log now has {}.", m.affected, m.log.len());
    } else {
        println!("Restored {} event(s).", m.log.len());
    }
    Ok(())
}

pub fn export(ctx: &Ctx) -> anyhow::Result<()> {
    let session = ctx.session(clock::now_ms())?;
    let log = session.load()?;
    let text = format_log(&log, clock::local_offset());
    if !text.is_empty() {
        println!("{text}");
    }
    Ok(())
}
