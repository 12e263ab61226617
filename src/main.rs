use std::io::IsTerminal;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use dsagent::connector::api::{Container, ContainerConfig, Router};
use dsagent::connector::web::{serve, WebState};
use dsagent::{Commands, ConsoleMenu};

const INIT_ERROR: &str =
    "Error initializing agent. Please check GEMINI_API_KEY in your environment or .env file";

#[derive(Parser)]
#[command(name = "dsagent")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer offline by echoing each prompt instead of calling Gemini
    #[arg(long, global = true)]
    mock_llm: bool,

    /// Gemini model to use (default: GEMINI_MODEL or gemini-2.5-flash)
    #[arg(long, global = true)]
    model: Option<String>,

    /// API base URL (default: GEMINI_BASE_URL or the public endpoint)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(level).into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        mock_llm: cli.mock_llm,
        model: cli.model,
        base_url: cli.base_url,
    })
    .context(INIT_ERROR)?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = std::io::stdin();
            let dispatcher = container.dispatcher();
            let spinner = std::io::stderr().is_terminal();
            let mut menu = ConsoleMenu::new(dispatcher, stdin.lock(), std::io::stdout())
                .with_spinner(spinner);
            menu.run().await?;
        }

        Commands::Serve {
            port,
            public,
            idle_minutes,
        } => {
            let host = if public { [0, 0, 0, 0] } else { [127, 0, 0, 1] };
            let listener = TcpListener::bind(SocketAddr::from((host, port))).await?;

            let shutdown = CancellationToken::new();
            let signal = shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Shutting down web UI...");
                    signal.cancel();
                }
            });

            let state = WebState::new(container.dispatcher())
                .with_idle_timeout(Duration::from_secs(idle_minutes.saturating_mul(60)));
            serve(listener, state, shutdown).await?;
        }

        command => {
            let router = Router::new(&container);
            let output = router.route(command).await?;
            println!("{}", output);
        }
    }

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_menu() {
        let cli = Cli::try_parse_from(["dsagent"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn questions_accepts_difficulty_and_count() {
        let cli = Cli::try_parse_from([
            "dsagent",
            "questions",
            "Time Series",
            "--difficulty",
            "research-level",
            "-n",
            "3",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Questions {
                topic,
                difficulty,
                count,
            }) => {
                assert_eq!(topic, "Time Series");
                assert_eq!(difficulty.as_deref(), Some("research-level"));
                assert_eq!(count, Some(3));
            }
            _ => panic!("expected questions command"),
        }
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli =
            Cli::try_parse_from(["dsagent", "serve", "--mock-llm", "--port", "9000"]).unwrap();
        assert!(cli.mock_llm);
        assert!(matches!(
            cli.command,
            Some(Commands::Serve {
                port: 9000,
                public: false,
                idle_minutes: 30,
            })
        ));
    }

    #[test]
    fn serve_rejects_zero_idle_minutes() {
        assert!(Cli::try_parse_from(["dsagent", "serve", "--idle-minutes", "0"]).is_err());
    }
}
