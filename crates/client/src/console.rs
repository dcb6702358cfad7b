use console::style;
use shared::models::TransactionRecord;
use std::time::Duration;

pub(crate) struct Console;

impl Console {
    const WIDTH: usize = 48;

    pub(crate) fn section(title: &str) {
        let rule = "─".repeat(Self::WIDTH);
        println!();
        println!("{}", style(&rule).magenta());
        println!("{}", style(format!("{title:^width$}", width = Self::WIDTH)).magenta().bold());
        println!("{}", style(&rule).magenta());
    }

    pub(crate) fn info(label: &str, value: &str) {
        println!("{}: {}", style(label).dim().magenta(), style(value).white());
    }

    pub(crate) fn success(text: &str) {
        println!("{} {}", style("✓").green().bold(), style(text).green());
    }

    pub(crate) fn warning(text: &str) {
        println!("{} {}", style("⚠").yellow().bold(), style(text).yellow());
    }

    pub(crate) fn error(text: &str) {
        println!("{} {}", style("✗").red().bold(), style(text).red());
    }

    pub(crate) fn record(record: &TransactionRecord) {
        println!();
        Self::info("From", &record.address_from.to_string());
        Self::info("To", &record.address_to.to_string());
        Self::info("Amount", &format!("{} ETH", record.amount));
        if !record.message.is_empty() {
            Self::info("Message", &record.message);
        }
        if !record.keyword.is_empty() {
            Self::info("Keyword", &record.keyword);
        }
        Self::info("Time", &record.timestamp);
    }

    pub(crate) fn spinner(text: &str) -> indicatif::ProgressBar {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("{spinner:.magenta} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
        );
        pb.set_message(text.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}
