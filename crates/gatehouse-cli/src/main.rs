use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "gatehouse", version, about = "Gatehouse token tooling")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Symmetric key management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Session token minting and verification
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a new 32-byte key. Prints hex unless --output is given.
    Generate {
        /// Directory to write token.key into
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Mint a token for an admin id without a credential check.
    Mint {
        /// Key file path or encoded key
        #[arg(long, env = "GATEHOUSE_TOKEN_KEY", hide_env_values = true)]
        key: Option<String>,

        /// Admin id written into the `admin_id` claim
        #[arg(long)]
        identity: String,

        /// Issuer claim (defaults to "gatehouse")
        #[arg(long)]
        issuer: Option<String>,

        /// Token lifetime, e.g. "120m", "2h" (defaults to 120m)
        #[arg(long)]
        ttl: Option<String>,

        /// Write the token to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Decode a token and check the standard claim rules.
    Verify {
        /// Key file path or encoded key
        #[arg(long, env = "GATEHOUSE_TOKEN_KEY", hide_env_values = true)]
        key: Option<String>,

        /// Expected issuer claim (defaults to "gatehouse")
        #[arg(long)]
        issuer: Option<String>,

        /// Token string or path to a file containing it
        token: String,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate { output } => commands::keys::generate(output)?,
        },

        Command::Token { cmd } => match cmd {
            TokenCommand::Mint {
                key,
                identity,
                issuer,
                ttl,
                output,
            } => commands::token::mint(key, identity, issuer, ttl, output)?,
            TokenCommand::Verify { key, issuer, token } => {
                commands::token::verify(key, issuer, token)?
            }
        },
    }

    Ok(())
}
