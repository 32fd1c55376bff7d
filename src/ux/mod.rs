use colored::Colorize;
use humansize::{format_size, DECIMAL};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};

use crate::materialize::{FileStatus, MaterializeSummary};
use crate::update::{UpdateStatus, UpdateSummary};
use crate::wire::{Language, Subtask};

pub fn show_plan(plan: &[Subtask]) {
    println!("\n=== PLAN ===");
    if plan.is_empty() {
        println!("(no subtasks)");
        return;
    }
    for (i, t) in plan.iter().enumerate() {
        let tag = format!("[{}]", t.language.tag().to_uppercase());
        let tag = match t.language {
            Language::Python => tag.blue().bold(),
            Language::NodeJs => tag.green().bold(),
            Language::Rust => tag.red().bold(),
            Language::Other(_) => tag.dimmed(),
        };
        println!("{}. {}  {} — {}", i + 1, tag, t.filename.bold(), t.description);
    }
    println!();
}

/// The plan exactly as parsed, for copy/paste or inspection.
pub fn print_plan_json(plan: &[Subtask]) {
    match serde_json::to_string_pretty(plan) {
        Ok(s) => println!("{s}"),
        Err(e) => tracing::warn!(error = %e, "could not render plan as JSON"),
    }
}

pub fn prompt_line(prompt: &str) -> String {
    print!("{prompt} ");
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        s.trim().to_string()
    } else {
        String::new()
    }
}

pub fn confirm(prompt: &str) -> bool {
    let ans = prompt_line(&format!("{prompt} [y/N]:")).to_lowercase();
    matches!(ans.as_str(), "y" | "yes" | "s" | "si" | "sí")
}

/// Progress bar that degrades to plain lines when hidden (non-TTY or disabled).
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    pub fn new(len: u64, enabled: bool) -> Self {
        let bar = if enabled { ProgressBar::new(len) } else { ProgressBar::hidden() };
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }

    pub fn start(&self, msg: String) {
        self.bar.set_message(msg);
    }

    pub fn line(&self, msg: String) {
        if self.bar.is_hidden() {
            println!("{msg}");
        } else {
            self.bar.println(msg);
        }
    }

    pub fn done(&self) {
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

pub fn print_materialize_dashboard(sum: &MaterializeSummary) {
    println!(
        "\n{}",
        "┏━━━━━━━━━━━━━━━━━━━━━━━━ Generated ━━━━━━━━━━━━━━━━━━━━━━━┓".bold()
    );
    println!(
        "  {}: {}   {}: {}   {}: {}   {}: {}   {}: {}",
        "Generated".green().bold(), sum.count(|s| matches!(s, FileStatus::Generated)),
        "Placeholder".cyan().bold(), sum.count(|s| matches!(s, FileStatus::Placeholder)),
        "Empty".yellow().bold(), sum.count(|s| matches!(s, FileStatus::Degraded(_))),
        "Failed".red().bold(), sum.count(|s| matches!(s, FileStatus::Failed(_))),
        "Bytes".bold(), format_size(sum.bytes_written(), DECIMAL)
    );
    println!("{}", "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold());

    for o in &sum.files {
        let shown = o
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| o.filename.clone());
        match &o.status {
            FileStatus::Generated => {}
            FileStatus::Placeholder => println!("  {} {} ({})", "placeholder".cyan(), shown, o.language),
            FileStatus::Degraded(k) => println!("  {} {} ({}, {})", "empty".yellow(), shown, o.language, k),
            FileStatus::Failed(k) => println!("  {} {} ({}, {})", "failed".red(), shown, o.language, k),
        }
    }
}

pub fn print_update_dashboard(sum: &UpdateSummary) {
    println!(
        "\n{}",
        "┏━━━━━━━━━━━━━━━━━━━━━━━━━ Updated ━━━━━━━━━━━━━━━━━━━━━━━━┓".bold()
    );
    println!(
        "  {}: {}   {}: {}   {}: {}   {}: {}   {}: {}",
        "Improved".green().bold(), sum.count(|s| matches!(s, UpdateStatus::Improved)),
        "Copied".cyan().bold(), sum.count(|s| matches!(s, UpdateStatus::Copied)),
        "Skipped".red().bold(), sum.count(|s| matches!(s, UpdateStatus::Skipped(_))),
        "Excluded".yellow().bold(), sum.count(|s| matches!(s, UpdateStatus::Excluded)),
        "Bytes".bold(), format_size(sum.bytes_written(), DECIMAL)
    );
    println!("{}", "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold());

    for o in &sum.files {
        match (&o.status, &o.dest) {
            (UpdateStatus::Skipped(k), _) => println!("  {} {} ({})", "skipped".red(), o.source.display(), k),
            (UpdateStatus::Excluded, _) => println!("  {} {}", "excluded".yellow(), o.source.display()),
            (UpdateStatus::Improved, Some(d)) => println!("  {} {} -> {}", "improved".green(), o.source.display(), d.display()),
            _ => {}
        }
    }
}
