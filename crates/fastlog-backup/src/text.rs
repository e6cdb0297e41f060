//! Tab-separated text view of a log, for copy/paste. Not a restore format.

use fastlog_core::format::format_ts;
use fastlog_core::Event;
use time::UtcOffset;

/// `<yyyy-MM-dd HH:mm:ss>\t<phase>`
pub fn format_event(event: &Event, offset: UtcOffset) -> String {
    format!("{}\t{}", format_ts(event.ts, offset), event.start)
}

pub fn format_log(log: &[Event], offset: UtcOffset) -> String {
    log.iter()
        .map(|e| format_event(e, offset))
        .collect::<Vec<_>>()
        .join("\n")
}
