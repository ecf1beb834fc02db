use std::path::PathBuf;

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password};
use site_config::{
    generate_password, AdminConfig, NotifyConfig, ServerConfig, SiteConfig, StoreConfig,
};

/// Run the full configuration wizard
pub fn run_wizard() -> Result<()> {
    println!();
    println!("~ Best Look Site Configuration ~");
    println!();

    // Load existing config if available for defaults
    let existing = SiteConfig::load().ok();
    let server_defaults = existing
        .as_ref()
        .map(|c| c.server.clone())
        .unwrap_or_default();

    let bind_address: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Bind address")
        .default(server_defaults.bind_address)
        .interact_text()?;

    let port: u16 = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("HTTP port")
        .default(server_defaults.port)
        .interact_text()?;

    println!();
    println!("~ Message Store ~");
    println!();

    let data_file: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Message store file (empty for the default)")
        .allow_empty(true)
        .default(
            existing
                .as_ref()
                .and_then(|c| c.store.data_file.as_ref())
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        )
        .interact_text()?;
    let data_file = if data_file.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(data_file.trim()))
    };

    println!();
    println!("~ Admin Credentials ~");
    println!();

    let username: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Admin username")
        .default(
            existing
                .as_ref()
                .map(|c| c.admin.username.clone())
                .unwrap_or_else(|| "admin".to_string()),
        )
        .interact_text()?;

    let generate = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Generate a random admin password?")
        .default(true)
        .interact()?;

    let password = if generate {
        let password = generate_password(16);
        println!();
        println!("Generated admin credentials (store them somewhere safe):");
        println!("  Username: {}", username);
        println!("  Password: {}", password);
        println!();
        password
    } else {
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Admin password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?
    };

    println!();
    println!("~ Email Notifications ~");
    println!();

    let notify = if Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Forward each submission to an email relay?")
        .default(existing.as_ref().map(|c| c.notify.is_some()).unwrap_or(false))
        .interact()?
    {
        let notify_defaults = existing.as_ref().and_then(|c| c.notify.clone());

        let endpoint: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Relay endpoint URL")
            .default(
                notify_defaults
                    .as_ref()
                    .map(|n| n.endpoint.clone())
                    .unwrap_or_default(),
            )
            .interact_text()?;

        let to: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Destination mailbox")
            .default(
                notify_defaults
                    .as_ref()
                    .map(|n| n.to.clone())
                    .unwrap_or_default(),
            )
            .interact_text()?;

        let token: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Relay bearer token (empty for none)")
            .allow_empty(true)
            .default(
                notify_defaults
                    .as_ref()
                    .and_then(|n| n.token.clone())
                    .unwrap_or_default(),
            )
            .interact_text()?;

        Some(NotifyConfig {
            endpoint,
            to,
            token: if token.trim().is_empty() {
                None
            } else {
                Some(token.trim().to_string())
            },
        })
    } else {
        None
    };

    let config = SiteConfig {
        server: ServerConfig { bind_address, port },
        store: StoreConfig { data_file },
        admin: AdminConfig::new(&username, &password),
        notify,
    };
    config.save()?;

    println!();
    println!(
        "Configuration saved to {}",
        SiteConfig::default_path()?.display()
    );
    println!("Start the server with 'bestlook-site'.");
    Ok(())
}
