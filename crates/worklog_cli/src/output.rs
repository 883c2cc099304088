use colored::Colorize;
use worklog_core::WorkItem;

pub fn title(text: &str) {
    println!();
    println!("{}", text.bold().cyan());
}

pub fn muted(text: &str) {
    println!("{}", text.dimmed());
}

pub fn divider() {
    println!("{}", "─".repeat(50).dimmed());
}

pub fn header(text: &str) {
    println!("{}", text.bold());
}

pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

pub fn info(msg: &str) {
    println!("{} {}", "info:".blue().bold(), msg);
}

pub fn warn(msg: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

/// Prints a titled summary line, skipping empty text.
pub fn summary(label: &str, text: &str) {
    if !text.is_empty() {
        println!("{} {}", format!("{label}:").bold().magenta(), text.italic());
    }
}

/// Prints items with 1-based numbers, as accepted by `done` and `delete`.
pub fn items(items: &[WorkItem]) {
    for (index, item) in items.iter().enumerate() {
        let number = format!("{:>3}.", index + 1);
        if item.completed {
            println!("{} {} {}", number.dimmed(), "[x]".green(), item.text.dimmed());
        } else {
            println!("{} {} {}", number.dimmed(), "[ ]".yellow(), item.text);
        }
    }
}
