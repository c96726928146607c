//! Terminal styling for the fareprep CLI

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

use crate::pipeline::FeatureConfig;

pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static PLANE: Emoji<'_, '_> = Emoji("✈️  ", "");
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     __                                     
    / _| __ _ _ __ ___ _ __  _ __ ___ _ __  
   | |_ / _` | '__/ _ \ '_ \| '__/ _ \ '_ \ 
   |  _| (_| | | |  __/ |_) | | |  __/ |_) |
   |_|  \__,_|_|  \___| .__/|_|  \___| .__/ 
                      |_|            |_|    
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}{}",
        PLANE,
        style("Flight fare feature engineering").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the run configuration card
pub fn print_config(
    input: &Path,
    apply: Option<&Path>,
    target: Option<&str>,
    output: &Path,
    config: &FeatureConfig,
) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!("    │  {} Train:  {:<39}│", FOLDER, truncate_path(input, 38));
    if let Some(apply) = apply {
        println!("    │  {} Apply:  {:<39}│", FOLDER, truncate_path(apply, 38));
    }
    if let Some(target) = target {
        println!("    │  {} Target: {:<39}│", TARGET, truncate_string(target, 38));
    }
    println!("    │  {} Output: {:<39}│", SAVE, truncate_path(output, 38));
    println!("    ├{}┤", line);

    let percentiles = config
        .similarity
        .percentiles
        .iter()
        .map(|p| format!("{}", p))
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "    │  {} Gamma:       {:<36}│",
        CLOCK,
        style(format!("{}", config.similarity.gamma)).yellow()
    );
    println!(
        "    │  {} Percentiles: {:<36}│",
        CLOCK,
        style(truncate_string(&percentiles, 30)).yellow()
    );
    println!(
        "    │  {} Durations:   {:<36}│",
        CLOCK,
        style(format!(
            "short {} / medium {} / over {}",
            config.duration.short, config.duration.medium, config.long_duration.value
        ))
        .yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

pub fn print_warning(message: &str) {
    println!("    {} {}", style("!").yellow().bold(), style(message).yellow());
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {}{}",
        CLOCK,
        style(format!("{:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Feature engineering complete!").green().bold()
    );
    println!();
}

/// Print a styled count message, e.g. "Produced 42 feature columns"
pub fn print_count(verb: &str, count: usize, description: &str) {
    println!(
        "      {} {} {}",
        verb,
        style(count).yellow().bold(),
        description
    );
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    truncate_string(&path.display().to_string(), max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        return s.to_string();
    }
    if max_len < 3 {
        return chars[chars.len() - max_len..].iter().collect();
    }
    let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
    format!("...{}", tail)
}
