use console::style;

use crate::types::GoNoGo;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Decision banner in the color the trailer crew expects
    pub fn decision(&self, decision: GoNoGo) {
        let banner = match decision {
            GoNoGo::Go => style(" GO ").black().on_green(),
            GoNoGo::ConditionalGo => style(" CONDITIONAL GO ").black().on_yellow(),
            GoNoGo::NoGo => style(" NO GO ").white().on_red(),
            GoNoGo::StopWork => style(" STOP WORK ").white().on_red().bold(),
        };
        println!("\n{}", banner);
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
