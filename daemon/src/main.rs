//! claimdrop daemon: entry point for running the claim service.

mod app;
mod config;
mod shutdown;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use claimdrop_crypto::{generate_keypair, parse_private_key, read_private_key_file, verify_ticket};
use claimdrop_rpc::RpcServer;
use claimdrop_types::{KeyPair, NormalizedIdentity, PublicKey, Signature, SlotIndex, WalletAddress};
use claimdrop_utils::{init_logging, LogFormat};
use tracing::info;
use zeroize::Zeroizing;

use crate::config::DaemonConfig;
use crate::shutdown::ShutdownController;

#[derive(Parser)]
#[command(name = "claimdrop-daemon", version, about = "Social-gated claim ticket service")]
struct Cli {
    /// Log format: "human" or "json" (defaults to the config file value).
    #[arg(long, global = true, env = "CLAIMDROP_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log filter, e.g. "info" or "debug,claimdrop_service=trace".
    #[arg(long, global = true, env = "CLAIMDROP_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP service.
    Run(RunArgs),

    /// Generate a new verifier key and print its public half.
    Keygen {
        /// Write the secret key (hex) to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Overwrite `--out` if it already exists.
        #[arg(long)]
        force: bool,
    },

    /// Check a claim ticket against a published verifier key.
    VerifyTicket(VerifyTicketArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "CLAIMDROP_CONFIG")]
    config: Option<PathBuf>,

    /// Address the HTTP server binds to.
    #[arg(long, env = "CLAIMDROP_LISTEN")]
    listen: Option<SocketAddr>,

    /// Number of claim slots.
    #[arg(long, env = "CLAIMDROP_CAPACITY")]
    capacity: Option<u64>,

    /// Accept every identity without asking Twitter.
    #[arg(long, env = "CLAIMDROP_BYPASS_VERIFICATION")]
    bypass_verification: bool,

    /// Network label reported by the health endpoint.
    #[arg(long, env = "CLAIMDROP_NETWORK")]
    network: Option<String>,

    #[arg(long, env = "CLAIMDROP_TWITTER_BEARER_TOKEN", hide_env_values = true)]
    twitter_bearer_token: Option<String>,

    /// Handle participants must follow.
    #[arg(long, env = "CLAIMDROP_TWITTER_ACCOUNT")]
    twitter_account: Option<String>,

    /// Numeric user id of the account to follow.
    #[arg(long, env = "CLAIMDROP_TWITTER_ACCOUNT_ID")]
    twitter_account_id: Option<String>,

    #[arg(long, env = "CLAIMDROP_CAMPAIGN_TWEET_ID")]
    campaign_tweet_id: Option<String>,

    /// Also require a retweet of the campaign tweet.
    #[arg(long, env = "CLAIMDROP_REQUIRE_RETWEET")]
    require_retweet: bool,

    /// Verifier secret key (hex seed, hex keypair or JSON byte array).
    #[arg(
        long,
        env = "CLAIMDROP_VERIFIER_SECRET_KEY",
        hide_env_values = true,
        conflicts_with = "secret_key_file"
    )]
    secret_key: Option<String>,

    /// File holding the verifier secret key.
    #[arg(long, env = "CLAIMDROP_VERIFIER_SECRET_KEY_FILE")]
    secret_key_file: Option<PathBuf>,
}

#[derive(Args)]
struct VerifyTicketArgs {
    /// Published verifier key (hex).
    #[arg(long)]
    public_key: PublicKey,

    #[arg(long)]
    wallet: String,

    /// Identity handle; normalized before checking.
    #[arg(long)]
    identity: String,

    #[arg(long)]
    slot: SlotIndex,

    /// Ticket signature (hex).
    #[arg(long)]
    signature: Signature,
}

impl RunArgs {
    /// Layer flags and env vars over the file (or default) configuration.
    fn load_config(&self) -> anyhow::Result<DaemonConfig> {
        let mut config = match &self.config {
            Some(path) => DaemonConfig::from_toml_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => DaemonConfig::default(),
        };

        if let Some(listen) = self.listen {
            config.server.listen = listen;
        }
        if let Some(capacity) = self.capacity {
            config.campaign.capacity = capacity;
        }
        config.campaign.bypass_verification |= self.bypass_verification;
        if let Some(network) = &self.network {
            config.campaign.network = network.clone();
        }
        if let Some(token) = &self.twitter_bearer_token {
            config.twitter.bearer_token = Some(token.clone());
        }
        if let Some(account) = &self.twitter_account {
            config.twitter.account_to_follow = account.trim_start_matches('@').to_string();
        }
        if let Some(id) = &self.twitter_account_id {
            config.twitter.account_id = Some(id.clone());
        }
        if let Some(tweet) = &self.campaign_tweet_id {
            config.twitter.campaign_tweet_id = Some(tweet.clone());
        }
        config.twitter.require_retweet |= self.require_retweet;

        config.validate()?;
        Ok(config)
    }

    fn load_keypair(&self) -> anyhow::Result<KeyPair> {
        if let Some(secret) = &self.secret_key {
            return parse_private_key(secret).context("parsing verifier secret key");
        }
        if let Some(path) = &self.secret_key_file {
            return read_private_key_file(path)
                .with_context(|| format!("reading verifier secret key from {}", path.display()));
        }
        bail!(
            "no verifier secret key: set CLAIMDROP_VERIFIER_SECRET_KEY or pass --secret-key-file \
             (generate one with `claimdrop-daemon keygen`)"
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            let config = args.load_config()?;
            init_logging(
                cli.log_format.unwrap_or(config.log.format),
                cli.log_level.as_deref().unwrap_or(&config.log.level),
            );
            let keypair = args.load_keypair()?;
            run(config, keypair).await
        }
        Command::Keygen { out, force } => keygen(out.as_deref(), force),
        Command::VerifyTicket(args) => verify(&args),
    }
}

async fn run(config: DaemonConfig, keypair: KeyPair) -> anyhow::Result<()> {
    let state = app::build_state(&config, keypair)?;
    info!(
        capacity = config.campaign.capacity,
        network = %config.campaign.network,
        bypass_verification = config.campaign.bypass_verification,
        follow = %config.twitter.account_to_follow,
        require_retweet = config.twitter.require_retweet,
        verifier = %state.service.signer().public_key(),
        "starting claimdrop daemon"
    );

    let shutdown = Arc::new(ShutdownController::new());
    let signals = Arc::clone(&shutdown);
    tokio::spawn(async move { signals.wait_for_signal().await });

    RpcServer::new(config.server.listen, state)
        .serve(shutdown.signalled())
        .await
        .context("HTTP server failed")?;

    info!("claimdrop daemon stopped");
    Ok(())
}

fn keygen(out: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let keypair = generate_keypair().context("generating verifier key")?;
    let mut keypair_bytes = Zeroizing::new([0u8; 64]);
    keypair_bytes[..32].copy_from_slice(&keypair.private.0);
    keypair_bytes[32..].copy_from_slice(keypair.public.as_bytes());
    let secret = Zeroizing::new(hex::encode(&keypair_bytes[..]));

    match out {
        Some(path) => {
            if path.exists() && !force {
                bail!("{} already exists (pass --force to overwrite)", path.display());
            }
            write_secret(path, &secret)
                .with_context(|| format!("writing secret key to {}", path.display()))?;
            println!("secret key written to {}", path.display());
        }
        None => println!("secret key: {}", secret.as_str()),
    }
    println!("public key: {}", keypair.public);
    Ok(())
}

#[cfg(unix)]
fn write_secret(path: &Path, secret: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    writeln!(file, "{secret}")
}

#[cfg(not(unix))]
fn write_secret(path: &Path, secret: &str) -> std::io::Result<()> {
    std::fs::write(path, format!("{secret}\n"))
}

fn verify(args: &VerifyTicketArgs) -> anyhow::Result<()> {
    let wallet = WalletAddress::parse(&args.wallet).context("invalid wallet")?;
    let identity = NormalizedIdentity::normalize(&args.identity).context("invalid identity")?;

    if !verify_ticket(
        &args.public_key,
        wallet.as_str(),
        identity.as_str(),
        args.slot,
        &args.signature,
    ) {
        bail!("ticket signature is invalid");
    }
    println!("ticket is valid");
    Ok(())
}
