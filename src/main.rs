use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use wh_design::design::{AutomationLevel, DesignState, FulfilmentLogic, StorageModel};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_TUI: i32 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Tsv,
    Json,
}

/// Override the configured design field by field
#[derive(Args, Debug, Clone, Default)]
struct DesignArgs {
    /// Storage model (high-density, high-accessibility, hybrid)
    #[arg(long)]
    storage: Option<StorageModel>,

    /// Fulfilment logic (wave, continuous-flow, batch)
    #[arg(long)]
    fulfilment: Option<FulfilmentLogic>,

    /// Automation level (labour-driven, selective-automation, mechanization-heavy)
    #[arg(long)]
    automation: Option<AutomationLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive configurator (default if no subcommand)
    Ui {
        #[command(flatten)]
        design: DesignArgs,
    },
    /// Show the metrics of one design
    Score {
        #[command(flatten)]
        design: DesignArgs,

        /// Show how each decision moved the scores
        #[arg(long)]
        explain: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Compare a design with the AI's recommendation
    Recommend {
        #[command(flatten)]
        design: DesignArgs,

        /// Answer immediately instead of waiting the thinking delay
        #[arg(long)]
        no_delay: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Rank every possible design by efficiency
    Rank {
        #[command(flatten)]
        design: DesignArgs,

        /// Only show the best N designs
        #[arg(long)]
        top: Option<usize>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "wh-design")]
#[command(about = "Warehouse design scoring and human vs AI comparison", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/wh-design/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn resolve_design(base: DesignState, args: &DesignArgs) -> DesignState {
    base.with_overrides(args.storage, args.fulfilment, args.automation)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Show a spinner on stderr for the thinking delay. Skipped when stderr is not a terminal.
async fn wait_thinking(delay: Duration) {
    if delay.is_zero() || !std::io::stderr().is_terminal() {
        return;
    }

    let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let start = Instant::now();
    let mut frame = 0usize;
    while start.elapsed() < delay {
        eprint!("\r{} AI is thinking...", frames[frame % frames.len()]);
        std::io::stderr().flush().ok();
        frame += 1;
        let remaining = delay.saturating_sub(start.elapsed());
        tokio::time::sleep(remaining.min(Duration::from_millis(100))).await;
    }
    eprint!("\r{}\r", " ".repeat(24));
    std::io::stderr().flush().ok();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Ui {
        design: DesignArgs::default(),
    });
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = command {
        if let Err(e) = wh_design::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match wh_design::config::load_config(config_path.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = wh_design::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let thinking_delay = match config.thinking_delay() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    let policy = config.recommend_policy();

    if cli.verbose {
        match &config.design {
            Some(d) => eprintln!("Configured design: {}", d),
            None => eprintln!("No design configured, using baseline: {}", DesignState::default()),
        }
        eprintln!("Recommendation policy: {}", policy.key());
        eprintln!("Thinking delay: {}", humantime::format_duration(thinking_delay));
    }

    let use_colors = wh_design::output::should_use_colors();

    match command {
        Commands::Ui { design } => {
            if !std::io::stdout().is_terminal() {
                eprintln!("The configurator needs an interactive terminal. Try `wh-design rank` or `wh-design recommend`.");
                std::process::exit(EXIT_TUI);
            }

            let design = resolve_design(config.design(), &design);
            let colors = wh_design::tui::resolve_theme(config.theme());
            let app = wh_design::tui::App::new(
                config,
                config_path,
                design,
                thinking_delay,
                colors,
                cli.verbose,
            );

            if let Err(e) = wh_design::tui::run_tui(app).await {
                eprintln!("Terminal UI error: {:#}", e);
                std::process::exit(EXIT_TUI);
            }
        }
        Commands::Score {
            design,
            explain,
            format,
        } => {
            let design = resolve_design(config.design(), &design);
            let candidate = wh_design::scoring::Candidate::evaluate(design);

            if cli.verbose {
                eprintln!("Scoring: {}", design);
            }

            match format {
                OutputFormat::Text => {
                    println!(
                        "{}",
                        wh_design::output::format_design_detail(&candidate, use_colors)
                    );
                    if explain {
                        println!();
                        let breakdown = wh_design::scoring::explain_metrics(&design);
                        println!(
                            "{}",
                            wh_design::output::format_breakdown(&breakdown, use_colors)
                        );
                    }
                }
                OutputFormat::Tsv => {
                    println!("{}", wh_design::output::format_metrics_tsv(&candidate));
                }
                OutputFormat::Json => {
                    if let Err(e) = print_json(&candidate) {
                        eprintln!("Failed to serialize output: {}", e);
                        std::process::exit(EXIT_INVALID_INPUT);
                    }
                }
            }
        }
        Commands::Recommend {
            design,
            no_delay,
            format,
        } => {
            let design = resolve_design(config.design(), &design);
            let start = Instant::now();
            let comparison = wh_design::scoring::compare(&design, policy);

            if cli.verbose {
                eprintln!(
                    "Evaluated {} designs in {:?}",
                    comparison.total_designs,
                    start.elapsed()
                );
            }

            if !no_delay && format == OutputFormat::Text {
                wait_thinking(thinking_delay).await;
            }

            match format {
                OutputFormat::Text => {
                    println!(
                        "{}",
                        wh_design::output::format_comparison(&comparison, use_colors)
                    );
                }
                OutputFormat::Tsv => {
                    println!(
                        "{}",
                        wh_design::output::format_tsv(&[comparison.human, comparison.recommended])
                    );
                }
                OutputFormat::Json => {
                    if let Err(e) = print_json(&comparison) {
                        eprintln!("Failed to serialize output: {}", e);
                        std::process::exit(EXIT_INVALID_INPUT);
                    }
                }
            }
        }
        Commands::Rank {
            design,
            top,
            format,
        } => {
            let human = resolve_design(config.design(), &design);
            let ranked = wh_design::scoring::rank_designs();
            let shown = match top {
                Some(0) => {
                    eprintln!("--top must be at least 1");
                    std::process::exit(EXIT_INVALID_INPUT);
                }
                Some(n) => &ranked[..n.min(ranked.len())],
                None => &ranked[..],
            };

            if cli.verbose {
                eprintln!("Showing {} of {} designs", shown.len(), ranked.len());
            }

            match format {
                OutputFormat::Text => {
                    println!(
                        "{}",
                        wh_design::output::format_ranked_table(shown, &human, use_colors)
                    );
                }
                OutputFormat::Tsv => {
                    println!("{}", wh_design::output::format_tsv(shown));
                }
                OutputFormat::Json => {
                    if let Err(e) = print_json(shown) {
                        eprintln!("Failed to serialize output: {}", e);
                        std::process::exit(EXIT_INVALID_INPUT);
                    }
                }
            }
        }
        Commands::Init => unreachable!("init is handled before config loading"),
    }

    std::process::exit(EXIT_SUCCESS);
}
