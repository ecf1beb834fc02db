mod wizard;

use anyhow::Result;
use clap::Parser;
use site_config::SiteConfig;

#[derive(Parser)]
#[command(name = "bestlook-setup")]
#[command(about = "Interactive setup tool for the Best Look site server")]
struct Cli {
    /// Run the configuration wizard directly
    #[arg(long)]
    configure: bool,

    /// Show the current configuration
    #[arg(long)]
    status: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.configure {
        return wizard::run_wizard();
    }
    if cli.status {
        return show_status();
    }

    // No flags: run the wizard
    wizard::run_wizard()
}

fn show_status() -> Result<()> {
    match SiteConfig::load() {
        Ok(config) => {
            println!("Config: {}", SiteConfig::default_path()?.display());
            println!(
                "  Bind address: {}:{}",
                config.server.bind_address, config.server.port
            );
            match &config.store.data_file {
                Some(path) => println!("  Message store: {}", path.display()),
                None => println!("  Message store: (default)"),
            }
            println!("  Admin user: {}", config.admin.username);
            match &config.notify {
                Some(notify) => {
                    println!("  Notifications: relay at {} -> {}", notify.endpoint, notify.to)
                }
                None => println!("  Notifications: disabled"),
            }
        }
        Err(_) => {
            println!("No configuration found. Run 'bestlook-setup' to create one.");
        }
    }
    Ok(())
}
