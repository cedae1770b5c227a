//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the toolbridge CLI.

use crate::types::ToolCatalog;
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the chat banner
    pub fn banner(&self, host: &str, model: &str) {
        if self.colored {
            println!(
                "\n   {} {}",
                "toolbridge".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
            println!("   {} {}", "server".dimmed(), host.bright_white());
            println!("   {} {}", "model ".dimmed(), model.bright_white());
            println!("   {}\n", "/clear resets the conversation, /quit exits".dimmed());
        } else {
            println!("\n   toolbridge v{}", env!("CARGO_PKG_VERSION"));
            println!("   server {}", host);
            println!("   model  {}", model);
            println!("   /clear resets the conversation, /quit exits\n");
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print the input prompt without a newline
    pub fn prompt(&self) {
        if self.colored {
            print!("{} ", "you ›".bright_cyan().bold());
        } else {
            print!("you > ");
        }
        io::stdout().flush().ok();
    }

    /// Print the assistant's reply
    pub fn reply(&self, text: &str) {
        if self.colored {
            println!("{} {}\n", "bot ›".bright_green().bold(), text);
        } else {
            println!("bot > {}\n", text);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print every tool with its description and parameter names
    pub fn tools(&self, catalog: &ToolCatalog) {
        for tool in catalog.iter() {
            let params = tool
                .parameter_schema
                .get("properties")
                .and_then(|p| p.as_object())
                .map(|p| p.keys().cloned().collect::<Vec<_>>().join(", "))
                .unwrap_or_default();

            if self.colored {
                println!("    {} {}", "•".blue(), tool.name.bright_white().bold());
                if !tool.description.is_empty() {
                    println!("      {}", tool.description.dimmed());
                }
                if !params.is_empty() {
                    println!("      {} {}", "params:".dimmed(), params.cyan());
                }
            } else {
                println!("    - {}", tool.name);
                if !tool.description.is_empty() {
                    println!("      {}", tool.description);
                }
                if !params.is_empty() {
                    println!("      params: {}", params);
                }
            }
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}
