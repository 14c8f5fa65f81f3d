use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use tiny_notes::deploy::init::CONTAINER_OWNER;
use tiny_notes::deploy::{init_project, Action, Compose};

#[derive(Parser)]
#[command(name = "notes-ctl")]
#[command(about = "Deployment CLI for Tiny Notes", long_about = None)]
struct Cli {
    /// Project directory holding the compose files and .env
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Compose file, repeatable (default: base file plus production overlay)
    #[arg(short, long = "file")]
    files: Vec<PathBuf>,

    /// Print the docker command instead of running it
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .env from the template and prepare the notes directory
    Init {
        #[arg(long, default_value_t = CONTAINER_OWNER.0)]
        uid: u32,
        #[arg(long, default_value_t = CONTAINER_OWNER.1)]
        gid: u32,
    },
    /// Build and start the stack
    Up,
    /// Stop and remove the stack
    Down,
    /// Restart running containers
    Restart,
    /// Show container logs
    Logs {
        /// Print current logs and exit
        #[arg(long)]
        no_follow: bool,
        #[arg(long)]
        tail: Option<usize>,
    },
    /// Query the health endpoint of a running server
    Status {
        #[arg(short, long, default_value = "http://localhost:8000")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiny_notes=info".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let compose = if cli.files.is_empty() {
        Compose::production(&cli.dir)
    } else {
        Compose::with_files(&cli.dir, cli.files.clone())
    };

    let action = match cli.command {
        Commands::Init { uid, gid } => {
            let report = init_project(&cli.dir, Some((uid, gid)))?;
            if report.env_created {
                println!("Created .env from .env.example; set NOTES_ADMIN_KEY before starting.");
            } else {
                println!(".env already exists, left untouched.");
            }
            println!("notes/ ready ({:?}).", report.notes_ownership);
            return Ok(());
        }
        Commands::Status { url } => return status(&url).await,
        Commands::Up => Action::Up,
        Commands::Down => Action::Down,
        Commands::Restart => Action::Restart,
        Commands::Logs { no_follow, tail } => Action::Logs {
            follow: !no_follow,
            tail,
        },
    };

    if cli.dry_run {
        println!("{}", compose.command_line(&action));
        return Ok(());
    }

    compose.run(&action).await?;
    Ok(())
}

async fn status(base_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let url = format!("{}/health", base_url.trim_end_matches('/'));
    let res = reqwest::get(&url).await?;
    let status = res.status();
    let body: Value = res.json().await.unwrap_or(Value::Null);

    println!("{}", serde_json::to_string_pretty(&body)?);
    if !status.is_success() {
        return Err(format!("{url} returned {status}").into());
    }
    Ok(())
}
