use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::BRIEFCASE, text.style(theme().header.clone()));
}

pub fn banner(title: &str, subtitle: &str) {
    if crate::output::is_quiet() {
        return;
    }
    println!();
    println!("{} {}", Icons::BRIEFCASE, title.style(theme().header.clone()));
    println!("   {}", subtitle.style(theme().dim.clone()));
    println!();
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str) {
    println!("{} {}", Icons::INFO.style(theme().info.clone()), label);
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}
