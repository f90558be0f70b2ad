use std::io::{self, BufRead, IsTerminal, Write};

/// Whether stdin is attached to a terminal, so questions can be answered.
pub fn interactive() -> bool {
    io::stdin().is_terminal()
}

/// Ask a y/N question on stderr. Anything but "y" or "yes" declines.
pub fn confirm(question: &str) -> bool {
    match ask(&format!("{question} [y/N] ")) {
        Some(answer) => matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"),
        None => false,
    }
}

/// Read one trimmed line after printing `question`. `None` on EOF or read error.
pub fn ask(question: &str) -> Option<String> {
    eprint!("{question}");
    io::stderr().flush().ok()?;

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}
