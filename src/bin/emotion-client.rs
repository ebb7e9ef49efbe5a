use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use emotion_api::client::{ApiClient, ClientError, DEFAULT_BASE_URL, render};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "emotion-client", version, about = "Emotion detection API client")]
struct Cli {
    /// Base URL of the emotion detection API
    #[arg(long, env = "EMOTION_API_URL", default_value = DEFAULT_BASE_URL)]
    url: String,

    #[arg(short, long, env = "EMOTION_API_USERNAME")]
    username: Option<String>,

    #[arg(short, long, env = "EMOTION_API_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Use an existing access token instead of logging in
    #[arg(long, env = "EMOTION_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and print the access token
    Login,
    /// Check that the API is running
    Health,
    /// Predict the emotion of a single text
    Predict { text: String },
    /// Predict emotions for one text per line (file, or stdin when omitted)
    PredictMultiple { file: Option<PathBuf> },
    /// Predict emotions for the `text` column of a CSV file
    PredictCsv { file: PathBuf },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut client = ApiClient::new(&cli.url);

    if let Command::Health = cli.command {
        println!("{}", client.health().await?);
        return Ok(());
    }

    match (&cli.token, &cli.username, &cli.password) {
        (Some(token), _, _) if !matches!(cli.command, Command::Login) => {
            client = client.with_token(token.clone());
        }
        (_, Some(username), Some(password)) => {
            client.login(username, password).await?;
            if let Command::Login = cli.command {
                println!("Login successful.");
            }
        }
        _ => return Err(ClientError::NotLoggedIn.into()),
    }

    match cli.command {
        Command::Health => {}
        Command::Login => {
            if let Some(token) = client.token() {
                println!("{}", token);
            }
        }
        Command::Predict { text } => {
            let prediction = client.predict_single(&text).await?;
            println!("{}", render::prediction(&prediction));
        }
        Command::PredictMultiple { file } => {
            let input = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let results = client.predict_multiple(&input).await?;
            println!("{}", render::text_predictions(&results));
        }
        Command::PredictCsv { file } => {
            if file.extension().and_then(|e| e.to_str()) != Some("csv") {
                bail!("Please choose a CSV file.");
            }
            let contents = std::fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let results = client.predict_csv(&contents).await?;
            println!("{}", render::csv_results(&results));
        }
    }

    Ok(())
}
