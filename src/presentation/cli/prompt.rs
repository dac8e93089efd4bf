//! Terminal-backed implementation of the interactive prompt.

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use crate::application::prompt::{Prompt, ReviewDecision};

/// Prompt that reads answers from standard input.
pub struct TerminalPrompt;

fn read_answer() -> io::Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_lowercase())
}

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> io::Result<bool> {
        print!("{} [y/N]: ", message);
        io::stdout().flush()?;
        let answer = read_answer()?;
        Ok(answer == "y" || answer == "yes")
    }

    fn review_new_files(
        &mut self,
        location: &Path,
        files: &[String],
    ) -> io::Result<ReviewDecision> {
        println!(
            "\n{} {} contains new files:",
            "::".blue().bold(),
            location.display()
        );
        for file in files {
            println!("  {}", file.yellow());
        }

        loop {
            print!("Commit it anyway? [y]es / [n]o / [q]uit: ");
            io::stdout().flush()?;
            match read_answer()?.as_str() {
                "y" | "yes" => return Ok(ReviewDecision::Include),
                "n" | "no" => return Ok(ReviewDecision::Skip),
                "q" | "quit" => return Ok(ReviewDecision::Abort),
                _ => println!("Please answer y, n, or q."),
            }
        }
    }
}
