use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Load catalog categories into the category directory")]
struct Args {
    /// JSON file path or http(s) URL
    source: String,

    #[arg(long, default_value = "redis://localhost:6379")]
    redis_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let categories = seed::load_categories(&args.source).await?;
    println!("Loaded Categories: {}\n", categories.len());

    seed::seed_categories(&args.redis_url, &categories).await?;
    println!("Seeded Categories: {}", categories.len());

    Ok(())
}
