use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use super::{get_config_path, save_config, Config, DEFAULT_THINKING_DELAY, MAX_THINKING_DELAY};
use crate::design::{AutomationLevel, DesignState, FulfilmentLogic, StorageModel};
use crate::scoring::{calculate_metrics, RecommendPolicy};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(18));
    }
    println!();
}

/// Resolve a menu answer: a 1-based number or any spelling `FromStr` accepts.
fn parse_choice<T: FromStr + Copy>(input: &str, options: &[T]) -> Option<T> {
    if let Ok(n) = input.trim().parse::<usize>() {
        return n.checked_sub(1).and_then(|i| options.get(i).copied());
    }
    input.parse::<T>().ok()
}

/// Show a numbered menu until the user picks a valid option.
fn prompt_option<T: FromStr + Copy + std::fmt::Display>(
    title: &str,
    options: &[T],
    current: T,
) -> Result<T> {
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }
    loop {
        let input = prompt_with_default(title, &current.to_string())?;
        match parse_choice(&input, options) {
            Some(choice) => return Ok(choice),
            None => println!("  Invalid: pick 1-{} or type an option name. Try again.", options.len()),
        }
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("Warehouse Design Configuration Wizard");
    println!("=====================================");
    println!();

    // 1. The human design
    let defaults = DesignState::default();
    typewriter("Every warehouse design is three decisions. Pick the one you would build today.");
    println!();

    typewriter("Storage model: how densely goods are packed versus how easy they are to reach.");
    let storage_model = prompt_option("Storage model", &StorageModel::ALL, defaults.storage_model)?;
    println!();

    typewriter("Fulfilment logic: how orders are released to the floor.");
    let fulfilment_logic =
        prompt_option("Fulfilment logic", &FulfilmentLogic::ALL, defaults.fulfilment_logic)?;
    println!();

    typewriter("Automation level: how much of the handling machines take over.");
    let automation_level =
        prompt_option("Automation level", &AutomationLevel::ALL, defaults.automation_level)?;

    let design = DesignState::new(storage_model, fulfilment_logic, automation_level);
    let metrics = calculate_metrics(&design);
    println!();
    println!(
        "Your design: {} (efficiency {:.2})",
        design, metrics.efficiency_index
    );

    // 2. Recommendation policy
    println!();
    typewriter("When no design beats yours, the AI can still show a different design with the same score,");
    typewriter("or simply confirm that yours is already the best.");
    let show_alternative = prompt_yes_no("Show equal-scoring alternatives?", true)?;
    let recommend_policy = if show_alternative {
        RecommendPolicy::DistinctAlternative
    } else {
        RecommendPolicy::StrictImprovement
    };

    // 3. Thinking delay
    println!();
    typewriter("The AI side pauses briefly before answering. Use '0s' to answer instantly.");
    let thinking_delay = loop {
        let input = prompt_with_default("Thinking delay", DEFAULT_THINKING_DELAY)?;
        match humantime::parse_duration(&input) {
            Ok(d) if d <= MAX_THINKING_DELAY => break input,
            Ok(_) => println!(
                "  Invalid: must be at most {}. Try again.",
                humantime::format_duration(MAX_THINKING_DELAY)
            ),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    // 4. Config path
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    // Check if file already exists
    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        design: Some(design),
        recommend_policy: Some(recommend_policy),
        thinking_delay: Some(thinking_delay),
        theme: None,
    };
    save_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `wh-design` to open the configurator, or `wh-design recommend` to see what the AI would build.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice_by_number() {
        assert_eq!(
            parse_choice("2", &StorageModel::ALL),
            Some(StorageModel::HighAccessibility)
        );
        assert_eq!(parse_choice("0", &StorageModel::ALL), None);
        assert_eq!(parse_choice("4", &StorageModel::ALL), None);
    }

    #[test]
    fn test_parse_choice_by_name() {
        assert_eq!(
            parse_choice("Continuous Flow", &FulfilmentLogic::ALL),
            Some(FulfilmentLogic::ContinuousFlow)
        );
        assert_eq!(parse_choice("robots", &AutomationLevel::ALL), None);
    }
}
