use tracing::info;
use tracing_subscriber::EnvFilter;

use game_client::{
    build_services, config::Config, session::SessionSettings, terminal::Terminal,
};
use game_persistence::{connection::connect_and_migrate, repositories::PreferenceRepository};

#[tokio::main]
async fn main() {
    // Logs go to stderr so they stay out of the game text.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open preference database: {}", e);
            std::process::exit(1);
        }
    };

    let services = match build_services(&config, PreferenceRepository::new(db)) {
        Ok(services) => services,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };
    let settings = SessionSettings::from_config(&config);

    info!("Starting word guessing game");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut terminal = Terminal::new(stdin, std::io::stdout());

    if let Err(e) = terminal.run(&services, &settings).await {
        tracing::error!("Game ended with an error: {}", e);
        std::process::exit(1);
    }

    info!("Goodbye");
}
