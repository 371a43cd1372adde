use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "validator-cli")]
#[command(about = "Management CLI for the audit request validator", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Reload reference tables
    Load {
        /// Data directory on the server (server default when omitted)
        #[arg(short, long)]
        dir: Option<String>,
    },
    /// Validate every request
    Validate,
    /// Validate a single request
    ValidateRequest {
        /// Request identifier
        id: String,
    },
    /// Show reference data statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{base}/health")).send().await?,
        Commands::Load { dir } => {
            let mut req = client.post(format!("{base}/load"));
            if let Some(dir) = dir {
                req = req.query(&[("dir", dir)]);
            }
            req.send().await?
        }
        Commands::Validate => client.post(format!("{base}/validate")).send().await?,
        Commands::ValidateRequest { id } => {
            client
                .post(format!("{base}/validate/request"))
                .query(&[("id", id)])
                .send()
                .await?
        }
        Commands::Stats => client.get(format!("{base}/stats")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: validator returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
