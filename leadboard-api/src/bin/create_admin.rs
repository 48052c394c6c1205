use clap::Parser;
use std::path::PathBuf;

use leadboard_api::database::{self, default_db_path, Database};

/// Provision an admin account directly against the database, for first-run
/// setup before any service key exists.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long, default_value = "admin")]
    role: String,
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let db_path = args.db_path.unwrap_or_else(default_db_path);
    let db = Database::new(&db_path)?;

    tracing::info!("Attempting to create user: {}", args.email);

    let user = database::users::create_user(
        db.async_connection.clone(),
        &args.email,
        &args.password,
        &args.role,
    )
    .await?;

    println!("User created successfully!");
    println!("ID: {}", user.id);
    println!("Email: {}", user.email);
    println!("Role: {}", user.role);

    Ok(())
}
