// Interactive chat REPL

use anyhow::Result;
use crossterm::{style::Stylize, terminal};
use std::io::{self, IsTerminal, Write};

use crate::bot::Moltbot;

use super::commands::{handle_command, Command};

/// Get current terminal width, or default to 80 if not a TTY
fn terminal_width() -> usize {
    terminal::size().map(|(w, _)| w as usize).unwrap_or(80)
}

pub struct Repl<'a> {
    bot: &'a Moltbot,
    is_interactive: bool,
}

impl<'a> Repl<'a> {
    pub fn new(bot: &'a Moltbot) -> Self {
        // Detect if we're in interactive mode (stdout is a TTY)
        let is_interactive = io::stdout().is_terminal();
        Self {
            bot,
            is_interactive,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        if self.is_interactive {
            println!();
            println!("Ready. Type /help for commands, /quit to leave.");
            self.print_status_line();
        } else {
            // Minimal output for non-interactive mode (pipes, scripts)
            eprintln!("# moltbot v{} - non-interactive mode", env!("CARGO_PKG_VERSION"));
        }

        loop {
            if self.is_interactive {
                println!();
                self.print_separator();
                print!("> ");
            }
            io::stdout().flush()?;

            let mut input = String::new();
            let bytes_read = io::stdin().read_line(&mut input)?;
            if bytes_read == 0 {
                // EOF: piped input ran out or the terminal went away
                if self.is_interactive {
                    println!("Goodbye!");
                }
                break;
            }

            let input = input.trim();
            if input.is_empty() {
                continue;
            }

            if self.is_interactive {
                self.print_separator();
                println!();
            }

            // Check for slash commands
            if let Some(command) = Command::parse(input) {
                match command {
                    Command::Quit => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => {
                        let output = handle_command(command, self.bot).await?;
                        println!("{}", output);
                        continue;
                    }
                }
            }

            match self.bot.chat(input).await {
                Ok(response) => {
                    println!("{}", response);
                    if self.is_interactive {
                        println!();
                        self.print_status_line();
                    }
                }
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    if self.is_interactive {
                        println!();
                        self.print_status_line();
                    }
                }
            }
        }

        Ok(())
    }

    /// Print separator line that adapts to terminal width
    fn print_separator(&self) {
        let width = terminal_width();
        println!("{}", "─".repeat(width));
    }

    /// One-line activity status below the prompt (interactive mode only)
    fn print_status_line(&self) {
        if !self.is_interactive {
            return;
        }

        let snapshot = self.bot.coordinator().stats_snapshot();
        let limits = &self.bot.config().limits;
        let moltbook = if self.bot.coordinator().moltbook_active() {
            "on"
        } else {
            "off"
        };

        let status = format!(
            "Moltbook: {} | Posts: {}/{} | Comments: {}/{} | Tasks done today: {}",
            moltbook,
            snapshot.posts_made,
            limits.max_daily_posts,
            snapshot.comments_made,
            limits.max_daily_comments,
            snapshot.tasks_completed
        );

        // Truncate to terminal width if needed
        let width = terminal_width();
        let truncated = if status.len() > width {
            format!("{}...", &status[..width.saturating_sub(3)])
        } else {
            status
        };

        println!("{}", truncated.dark_grey());
    }
}
