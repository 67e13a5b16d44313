use std::io::{self, BufRead};

use colored::*;
use console::Term;

use crate::terminal::colors;

/// Asks for a target on the terminal. `None` when the answer is blank.
pub fn ask_target() -> io::Result<Option<String>> {
    let term = Term::stdout();
    let question: String = format!(
        "{} {} ",
        "?".color(colors::ACCENT).bold(),
        "Enter the URL to scan:".color(colors::TEXT_DEFAULT)
    );

    let answer: String = if term.is_term() {
        term.write_str(&question)?;
        term.read_line()?
    } else {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        line
    };

    Ok(non_blank(&answer))
}

fn non_blank(answer: &str) -> Option<String> {
    let trimmed = answer.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
