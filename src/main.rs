use clap::Parser;
use tally::cli::{self, Cli, Command, ConfigCommand};
use tally::{config, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cfg = match config::load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init_logging(&cfg.logging) {
        eprintln!("Warning: {}", e);
    }

    let result = match cli.command {
        Command::Replay { events } => cli::handle_replay(&events, &cfg).await,
        Command::Config(ConfigCommand::Show) => cli::handle_config_show(&cfg),
        Command::Config(ConfigCommand::Get { key }) => cli::handle_config_get(&cfg, &key),
        Command::Config(ConfigCommand::Path) => {
            cli::handle_config_path(cli.config.as_deref());
            Ok(())
        }
        Command::Version => {
            cli::handle_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
