//! smart-pm CLI - backlog grooming, feedback triage and roadmap planning.

use clap::Parser;
use smart_pm::cli::{
    BoardCommands, Cli, Commands, ConfigCommands, FeedbackCommands, RoadmapCommands,
};
use smart_pm::client::AssistantService;
use smart_pm::commands::{self, Output};
use smart_pm::config::{ConfigOverrides, ResolvedConfig};
use smart_pm::logging;
use std::io::Read;
use std::process;
use std::sync::Arc;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    if let Err(e) = logging::init_logging(cli.verbose, cli.quiet) {
        eprintln!("warning: {}", e);
    }

    let overrides = ConfigOverrides {
        api_url: cli.api_url,
        data_dir: cli.data_dir,
    };

    let result = commands::load_config(&overrides).and_then(|config| run_command(cli.command, &config, human));

    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

fn run_command(command: Commands, config: &ResolvedConfig, human: bool) -> smart_pm::Result<()> {
    match command {
        Commands::Board { command } => {
            let store = commands::open_store(config)?;
            match command {
                BoardCommands::List => output(&commands::board_list(store)?, human),
                BoardCommands::Show { id } => output(&commands::board_show(store, &id)?, human),
                BoardCommands::Add { title } => {
                    let service: Arc<dyn AssistantService> = Arc::new(commands::assistant(config));
                    output(&commands::board_add(store, service, &title)?, human);
                }
                BoardCommands::Rm { id } => output(&commands::board_rm(store, &id)?, human),
            }
        }
        Commands::Feedback { command } => match command {
            FeedbackCommands::Analyze {
                file,
                promote,
                promote_all,
            } => {
                let input = match file {
                    Some(path) => std::fs::read_to_string(path)?,
                    None => {
                        let mut buf = String::new();
                        std::io::stdin().read_to_string(&mut buf)?;
                        buf
                    }
                };
                let store = commands::open_store(config)?;
                let service = commands::assistant(config);
                let result =
                    commands::feedback_analyze(store, &service, &input, &promote, promote_all)?;
                output(&result, human);
            }
        },
        Commands::Roadmap { command } => {
            let store = commands::open_store(config)?;
            match command {
                RoadmapCommands::Generate => {
                    let service = commands::assistant(config);
                    output(&commands::roadmap_generate(store, &service)?, human);
                }
                RoadmapCommands::Layout { plan } => {
                    output(&commands::roadmap_layout(store, &plan)?, human)
                }
            }
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => output(&commands::config_show(config), human),
        },
    }
    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
