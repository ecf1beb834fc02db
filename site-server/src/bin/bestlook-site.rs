use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use admin_web::{run_server, AdminState};
use contact_api::{ContactState, Notifier};
use message_store::MessageStore;
use session_store::SessionStore;
use site_config::SiteConfig;

/// Best Look site server
///
/// - Accepts contact-form submissions and keeps them in a flat JSON file
/// - Serves the admin inbox page and its session-gated API
/// - Optionally forwards each submission to an email relay
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // Parse CLI arguments
    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    // Load configuration (require the config file to exist)
    let config = match &config_path {
        Some(path) => SiteConfig::load_from(path),
        None => SiteConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("No configuration found: {}", e);
            eprintln!();
            eprintln!("Run 'bestlook-setup' to configure the server before starting.");
            std::process::exit(1);
        }
    };

    // Open the message store
    let data_file = match &config.store.data_file {
        Some(path) => path.clone(),
        None => MessageStore::default_path()?,
    };
    println!("Message store: {}", data_file.display());
    let store = MessageStore::open_at(&data_file);

    // Admin sessions live in memory; a restart logs everyone out
    let sessions = Arc::new(SessionStore::new());

    let contact = match &config.notify {
        Some(notify) => {
            println!("Email notifications: relay at {}", notify.endpoint);
            ContactState::with_notifier(store, sessions.clone(), Notifier::new(notify))
        }
        None => {
            println!("Email notifications: disabled");
            ContactState::new(store, sessions.clone())
        }
    };

    let state = Arc::new(AdminState::new(
        Arc::new(contact),
        sessions,
        config.admin.clone(),
    ));

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    run_server(&addr, state).await
}
