//! Output formatting for the CLI.

use console::style;
use turbo_feed::prelude::FeedProduct;

/// Where human messages go and whether they are shown at all.
///
/// In JSON mode stdout carries only the JSON document; everything else is
/// suppressed except errors, which go to stderr as JSON.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    fn out(&self, line: impl std::fmt::Display) {
        if !self.json {
            println!("{}", line);
        }
    }

    fn err(&self, line: impl std::fmt::Display) {
        if !self.json {
            eprintln!("{}", line);
        }
    }

    pub fn info(&self, msg: &str) {
        self.out(format_args!("{} {}", style("ℹ").blue(), msg));
    }

    pub fn success(&self, msg: &str) {
        self.out(format_args!("{} {}", style("✓").green(), msg));
    }

    pub fn warn(&self, msg: &str) {
        self.err(format_args!("{} {}", style("⚠").yellow(), msg));
    }

    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    /// Only shown with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            self.err(format_args!("{} {}", style("→").dim(), style(msg).dim()));
        }
    }

    pub fn header(&self, msg: &str) {
        self.out(format_args!("\n{}", style(msg).bold().underlined()));
    }

    /// Print a value as pretty JSON on stdout, regardless of mode.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => self.error(&format!("Failed to encode output: {}", e)),
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        self.out(format_args!("  {}: {}", style(key).dim(), value));
    }

    pub fn list_item(&self, item: &str) {
        self.out(format_args!("  {} {}", style("•").dim(), item));
    }

    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        self.out(format_args!("  {}", format_row(cols, widths)));
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn format_row(cols: &[&str], widths: &[usize]) -> String {
    cols.iter()
        .zip(widths.iter())
        .map(|(col, width)| format!("{:width$}", col, width = width))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Badges shown next to a feed item.
pub fn feed_badges(item: &FeedProduct) -> String {
    let mut badges = Vec::new();
    if item.is_from_followed {
        badges.push(style("following").cyan().to_string());
    }
    if item.is_new {
        badges.push(style("new").green().to_string());
    }
    if item.is_trending {
        badges.push(style("trending").magenta().to_string());
    }
    if item.product.has_coupon() {
        badges.push(style("coupon").yellow().to_string());
    }
    badges.join(" ")
}

/// Format a score for display; unscored tabs show a dash.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{:.2}", score),
        None => "-".to_string(),
    }
}

/// Shorten text to `max` characters, ending in an ellipsis when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Format microseconds as a human-readable duration.
pub fn format_micros(us: u64) -> String {
    if us < 1_000 {
        format!("{}µs", us)
    } else if us < 1_000_000 {
        format!("{:.1}ms", us as f64 / 1_000.0)
    } else {
        format!("{:.2}s", us as f64 / 1_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(Some(98.0)), "98.00");
        assert_eq!(format_score(Some(0.1)), "0.10");
        assert_eq!(format_score(None), "-");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Scarf", 10), "Scarf");
        assert_eq!(truncate("Oversized wool scarf", 10), "Oversized…");
        assert_eq!(truncate("Oversized wool scarf", 10).chars().count(), 10);
    }

    #[test]
    fn test_format_micros() {
        assert_eq!(format_micros(850), "850µs");
        assert_eq!(format_micros(12_500), "12.5ms");
        assert_eq!(format_micros(3_000_000), "3.00s");
    }

    #[test]
    fn test_format_row_pads_columns() {
        assert_eq!(format_row(&["1", "p1"], &[3, 4]), "1    p1  ");
    }
}
