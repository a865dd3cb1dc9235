use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use folio::commands::{email::EmailCommand, serve::serve, submit::SubmitCommand};
use folio_config::DEFAULT_CONFIG_PATH;
use folio_utils::folio_version;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::Completion { shell } = cli.command {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            env!("CARGO_BIN_NAME"),
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    init_tracing();

    let config = folio_config::load(cli.config.as_slice()).context("Failed to load config")?;

    match cli.command {
        Command::Serve => serve(config).await?,
        Command::Submit(command) => command.invoke(config).await?,
        Command::Email { command } => command.invoke(config).await?,
        Command::CheckConfig { verbose } => {
            if verbose {
                println!("{config:#?}");
            }
        }
        Command::Completion { .. } => unreachable!(),
    }

    Ok(())
}

#[derive(Debug, Parser)]
#[command(version = folio_version())]
struct Cli {
    /// Config files to load, later files override earlier ones
    #[arg(
        short,
        long,
        global = true,
        env = "FOLIO_CONFIG",
        value_delimiter = ',',
        default_value = DEFAULT_CONFIG_PATH
    )]
    config: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the http server handling contact form submissions
    #[command(aliases(["run", "start", "s"]))]
    Serve,
    /// Submit the contact form once, validating it like the website does
    Submit(SubmitCommand),
    /// Test email deliverability
    #[command(aliases(["e"]))]
    Email {
        #[command(subcommand)]
        command: EmailCommand,
    },
    /// Validate configuration
    CheckConfig {
        /// Print a debug representation of the config
        #[arg(short, long)]
        verbose: bool,
    },
    /// Generate shell completions
    Completion {
        /// The shell to generate completions for
        #[clap(value_enum)]
        shell: Shell,
    },
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`). Set
/// `RUST_LOG_PRETTY=1` for multi-line output.
fn init_tracing() {
    let filter = || {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy()
    };
    let pretty = std::env::var("RUST_LOG_PRETTY").as_deref() == Ok("1");

    let compact_layer = (!pretty).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter())
    });
    let pretty_layer = pretty.then(|| {
        tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_filter(filter())
    });

    tracing_subscriber::registry()
        .with(compact_layer)
        .with(pretty_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_submit() {
        let cli = Cli::try_parse_from([
            "folio",
            "--config",
            "a.toml,b.toml",
            "submit",
            "--name",
            "Jo",
            "--email",
            "jo@x.com",
            "--subject",
            "Hello there",
            "--message",
            "This is a test message.",
        ])
        .unwrap();

        assert_eq!(cli.config, [PathBuf::from("a.toml"), PathBuf::from("b.toml")]);
        assert!(matches!(cli.command, Command::Submit(_)));
    }
}
