//! Terminal UI utilities

use colored::*;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, size},
};
use std::io::{self, IsTerminal, Write};

use medrag_core::Result;

/// Display the startup banner
pub fn display_banner() {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(64, terminal_width.saturating_sub(4));

    let top_border = format!("┌{}┐", "─".repeat(banner_width - 2));
    let bottom_border = format!("└{}┘", "─".repeat(banner_width - 2));
    let empty_line = format!("│{}│", " ".repeat(banner_width - 2));

    println!();
    println!("{}", top_border.blue());
    println!("{}", empty_line.blue());

    let title = "medrag - Hospital Records Assistant";
    let title_line = format!(
        "│  {}{}│",
        title.blue().bold(),
        " ".repeat(banner_width.saturating_sub(title.len() + 3))
    );
    println!("{}", title_line);

    println!("{}", empty_line.blue());

    let feature_lines = vec![
        "Ask questions about hospital records in plain language:",
        "",
        "- fuzzy searches over patient summaries",
        "- average stay lengths per condition",
        "- patient counts with structured filters",
        "- side-by-side stay comparisons",
        "",
        "v0.1.0 - Powered by DeepSeek",
    ];

    for line in feature_lines {
        if line.is_empty() {
            println!("{}", empty_line.blue());
        } else {
            let content = if line.starts_with("v0.1.0") {
                format!(
                    "│  {}{}│",
                    line.dimmed(),
                    " ".repeat(banner_width.saturating_sub(line.len() + 4))
                )
            } else {
                format!(
                    "│  {}{}│",
                    line,
                    " ".repeat(banner_width.saturating_sub(line.len() + 4))
                )
            };
            println!("{}", content.blue());
        }
    }

    println!("{}", empty_line.blue());
    println!("{}", bottom_border.blue());
    println!();
    println!(
        "{}",
        "Tip: try \"how many diabetes patients stayed more than 5 days?\"".dimmed()
    );
    println!();
}

/// Read one question, with history navigation in interactive mode
///
/// Returns `None` at end of input (EOF or Ctrl-C/Ctrl-D).
pub async fn read_question(history: &mut Vec<String>) -> Result<Option<String>> {
    // Piped input reads plain lines from stdin
    if !io::stdin().is_terminal() {
        let mut input = String::new();
        let bytes = io::stdin().read_line(&mut input)?;
        if bytes == 0 {
            return Ok(None);
        }
        let input = input.trim().to_string();
        if !input.is_empty() {
            history.push(input.clone());
        }
        return Ok(Some(input));
    }

    enable_raw_mode()?;
    let mut input = String::new();
    let mut history_index: Option<usize> = None;
    let mut cursor_pos = 0;

    print!("{} ", "medrag>".green().bold());
    io::stdout().flush()?;

    loop {
        if let Event::Key(key_event) = event::read()? {
            if key_event.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key_event.code, KeyCode::Char('c') | KeyCode::Char('d'))
            {
                disable_raw_mode()?;
                println!();
                return Ok(None);
            }

            match key_event.code {
                KeyCode::Enter => {
                    disable_raw_mode()?;
                    println!();
                    if !input.is_empty() {
                        history.push(input.clone());
                    }
                    return Ok(Some(input));
                }
                KeyCode::Char(c) => {
                    input.insert(cursor_pos, c);
                    cursor_pos += 1;
                    print!("\r{} {}", "medrag>".green().bold(), input);
                    io::stdout().flush()?;
                }
                KeyCode::Backspace => {
                    if cursor_pos > 0 {
                        input.remove(cursor_pos - 1);
                        cursor_pos -= 1;
                        print!(
                            "\r{} {}  \r{} {}",
                            "medrag>".green().bold(),
                            input,
                            "medrag>".green().bold(),
                            input
                        );
                        io::stdout().flush()?;
                    }
                }
                KeyCode::Up => {
                    if !history.is_empty() {
                        let new_index = match history_index {
                            None => history.len() - 1,
                            Some(idx) if idx > 0 => idx - 1,
                            Some(idx) => idx,
                        };
                        history_index = Some(new_index);
                        input = history[new_index].clone();
                        cursor_pos = input.len();
                        print!(
                            "\r{} {}  \r{} {}",
                            "medrag>".green().bold(),
                            " ".repeat(50),
                            "medrag>".green().bold(),
                            input
                        );
                        io::stdout().flush()?;
                    }
                }
                KeyCode::Down => {
                    if let Some(idx) = history_index {
                        if idx < history.len() - 1 {
                            let new_index = idx + 1;
                            history_index = Some(new_index);
                            input = history[new_index].clone();
                        } else {
                            history_index = None;
                            input.clear();
                        }
                        cursor_pos = input.len();
                        print!(
                            "\r{} {}  \r{} {}",
                            "medrag>".green().bold(),
                            " ".repeat(50),
                            "medrag>".green().bold(),
                            input
                        );
                        io::stdout().flush()?;
                    }
                }
                KeyCode::Esc => {
                    disable_raw_mode()?;
                    println!();
                    return Ok(Some(String::new()));
                }
                _ => {}
            }
        }
    }
}
