use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use soundshift::{config, error, info, server, session::SessionCodec, success};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP API
    Serve(ServeOptions),

    /// Issue or inspect session credentials
    Session(SessionOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Address to bind (overrides SERVER_ADDRESS)
    #[clap(long)]
    pub addr: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct SessionOptions {
    /// Signing secret
    #[clap(long, env = "SESSION_SECRET", hide_env_values = true)]
    pub secret: String,

    #[command(subcommand)]
    pub command: SessionSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SessionSubcommand {
    /// Mint a credential for a Spotify user id
    Issue { subject: String },

    /// Verify a credential and print its claims
    Verify { token: String },
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    // .env may carry RUST_LOG, so load it before the subscriber reads the filter
    if let Err(e) = config::load_env() {
        error!("Cannot load environment. Err: {}", e);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(opt) => {
            let mut config = match config::Config::from_env() {
                Ok(config) => config,
                Err(e) => error!("{}", e),
            };
            if let Some(addr) = opt.addr {
                config.server_addr = addr;
            }

            info!("Starting SoundShift API on {}", config.server_addr);
            if let Err(e) = server::start_api_server(config).await {
                error!("Server failed: {}", e);
            }
        }
        Command::Session(opt) => {
            let codec = SessionCodec::new(&opt.secret);
            match opt.command {
                SessionSubcommand::Issue { subject } => match codec.issue_for_subject(&subject) {
                    Ok(token) => println!("{token}"),
                    Err(e) => error!("{}", e),
                },
                SessionSubcommand::Verify { token } => match codec.verify(&token) {
                    Ok(claims) => {
                        success!("Session credential is valid");
                        match serde_json::to_string_pretty(&Value::Object(claims)) {
                            Ok(json) => println!("{json}"),
                            Err(e) => error!("{}", e),
                        }
                    }
                    Err(e) => error!("{}", e),
                },
            }
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
