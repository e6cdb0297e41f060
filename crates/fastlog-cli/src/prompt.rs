use std::io::{BufRead, IsTerminal, Write};

/// Ask a yes/no question on the terminal. Defaults to "no", and to "no"
/// without asking when stdin is not interactive.
pub fn confirm(question: &str) -> bool {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        eprintln!("{question} [y/N] (not a terminal, pass --yes to proceed)");
        return false;
    }
    eprint!("{question} [y/N] ");
    let _ = std::io::stderr().flush();
    let mut line = String::new();
    if stdin.lock().read_line(&mut line).is_err() {
        return false;
    }
    is_yes(&line)
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
