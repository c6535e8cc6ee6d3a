use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::io::{self, Read};
use std::path::PathBuf;
use telegram_login::config::{ConfigFile, SharedSecret};
use telegram_login::fields::{AUTH_DATE, HASH};
use telegram_login::{signature, ClaimedFields, LoginProvider, LoginUser, Telegram, TelegramCfg};

/// CLI tool to produce and check Telegram Login Widget payloads
#[derive(Parser, Debug)]
#[command(
    name = "login-signer",
    about = "Sign or verify Telegram Login Widget payloads with a bot secret"
)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, help = "Path to a config file providing client_secret")]
    config: Option<PathBuf>,

    /// Bot secret, overrides the config file
    #[arg(
        short,
        long,
        env = "TELEGRAM_CLIENT_SECRET",
        hide_env_values = true,
        help = "Bot secret used to sign the payload"
    )]
    secret: Option<String>,

    /// Claimed fields to sign
    #[arg(short, long = "field", value_parser = parse_field, help = "A claimed field as key=value")]
    fields: Vec<(String, String)>,

    /// Unix time to stamp the payload with
    #[arg(long, help = "auth_date to sign, defaults to now")]
    auth_date: Option<i64>,

    /// Verify a JSON payload read from stdin instead of signing
    #[arg(long, help = "Verify the payload on stdin and print the mapped user")]
    verify: bool,

    /// Verbose output
    #[arg(short, long, help = "Enable verbose logging")]
    verbose: bool,
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("missing field name in '{}'", raw)),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected key=value, got '{}'", raw)),
    }
}

fn load_config(args: &Args) -> Result<TelegramCfg> {
    let mut config = match args.config {
        Some(ref path) => {
            if !path.exists() {
                anyhow::bail!("Config path does not exist: {}", path.display());
            }
            log::debug!("Using config path: {}", path.display());
            TelegramCfg::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => TelegramCfg::default(),
    };

    if let Some(ref secret) = args.secret {
        config.client_secret = SharedSecret::new(secret.as_str());
    }

    if config.client_secret.is_empty() {
        anyhow::bail!("No client secret configured, pass --secret or --config");
    }

    Ok(config)
}

fn sign_payload(config: &TelegramCfg, args: &Args) -> ClaimedFields {
    let mut fields = args
        .fields
        .iter()
        .filter(|(key, _)| key != HASH)
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect::<ClaimedFields>();

    // --auth-date wins over an auth_date given with --field
    match args.auth_date {
        Some(auth_date) => {
            fields.insert(AUTH_DATE, auth_date.to_string());
        }
        None if !fields.contains(AUTH_DATE) => {
            fields.insert(AUTH_DATE, Utc::now().timestamp().to_string());
        }
        None => (),
    }

    let hash = signature::sign(&config.client_secret, &fields);
    fields.insert(HASH, hash);
    fields
}

fn verify_payload(config: &TelegramCfg, body: &str) -> Result<LoginUser> {
    let fields = ClaimedFields::from_json(body).context("Payload is not a flat JSON object")?;
    let user = Telegram
        .verify(config, &fields)
        .context("Login payload failed verification")?;
    Ok(user)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let config = load_config(&args)?;

    if args.verify {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read payload from stdin")?;

        let user = verify_payload(&config, &body)?;
        log::info!("Payload verified for id {}", user.id);
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        let fields = sign_payload(&config, &args);
        log::info!("Signed {} fields", fields.len());
        println!("{}", serde_json::to_string_pretty(&fields)?);
    }

    Ok(())
}
