// fieldops-api/src/main.rs

use clap::Parser;
use rocket::{error, info};
use std::env;

#[derive(Parser)]
#[command(name = "fieldops-api")]
#[command(about = "Service-order management API server")]
#[command(version)]
struct Cli {}

#[rocket::main]
async fn main() {
    let _cli = Cli::parse();

    // Loads DATABASE_URL and ROCKET_* overrides from a local .env, if any.
    dotenvy::dotenv().ok();

    match env::current_dir() {
        Ok(path) => info!("Current directory: {}", path.display()),
        Err(e) => error!("Error getting current directory: {}", e),
    };

    info!("fieldops-api v{} starting", env!("CARGO_PKG_VERSION"));

    fieldops_api::rocket()
        .launch()
        .await
        .expect("Rocket server failed to launch");
}
