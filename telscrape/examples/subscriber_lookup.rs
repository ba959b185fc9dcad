//! Subscriber lookup example: log in to a BRAS and check a PPPoE login
//!
//! This example connects to a device over Telnet, looks up the session of
//! one subscriber and resolves the vendor of its MAC address from a small
//! built-in OUI table.
//!
//! # Prerequisites
//!
//! - Telnet enabled on the device (port 23)
//! - Valid credentials
//!
//! # Usage
//!
//! With command line credentials:
//! ```bash
//! cargo run --example subscriber_lookup -- --host 10.10.0.1 --user admin --password secret --login alice
//! ```
//!
//! With a JSON settings file (`switchIp`, `username`, `password`,
//! `loginPrompt`, `passwordPrompt`):
//! ```bash
//! cargo run --example subscriber_lookup -- --settings settings.json --login alice
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use telscrape::{Credentials, OuiTable, SessionBuilder, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let Some(login) = args.login.as_deref() else {
        eprintln!("Error: Must provide --login");
        std::process::exit(1);
    };

    let (builder, credentials) = if let Some(path) = &args.settings {
        let settings: Settings = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        (
            SessionBuilder::from_settings(&settings)?,
            settings.credentials()?,
        )
    } else {
        let Some(password) = &args.password else {
            eprintln!("Error: Must provide either --password or --settings");
            std::process::exit(1);
        };
        (
            SessionBuilder::new(&args.host),
            Credentials::new(&args.user, password.as_str())
                .with_prompts(&args.login_prompt, &args.password_prompt),
        )
    };

    let mut builder = builder
        .port(args.port)
        .connect_timeout(Duration::from_secs(args.timeout));
    if let Some(marker) = &args.marker {
        builder = builder.marker(marker);
    }

    let mut session = builder.build();
    println!("Connecting to {}...", session.config().telnet.socket_addr());
    session.connect(&credentials).await?;
    println!("Logged in, prompt {:?}", session.marker().unwrap_or_default());

    let vendors = OuiTable::new()
        .with_entry("00:11:22", "Cimsys Inc")
        .and_then(|t| t.with_entry("00:1B:21", "Intel Corporate"))
        .and_then(|t| t.with_entry("F4:F2:6D", "TP-LINK TECHNOLOGIES CO.,LTD."))
        .unwrap_or_default();

    println!("\nChecking subscriber: {}", login);
    println!("{}", "-".repeat(50));

    match session.check_authorization(login, &vendors).await? {
        Some(record) => {
            println!("Interface: {}", record.interface);
            println!(
                "IP:        {}",
                record.ip_address.as_deref().unwrap_or("-")
            );
            match &record.mac_address {
                Some(mac) => println!("MAC:       {}", mac),
                None => println!("MAC:       -"),
            }
            println!("Uptime:    {}", record.uptime.as_deref().unwrap_or("-"));
            println!("Vendor:    {}", record.vendor.as_deref().unwrap_or("-"));
        }
        None => println!("Subscriber '{}' is not authorized", login),
    }

    println!("{}", "-".repeat(50));

    println!("\nClosing connection...");
    session.disconnect().await?;
    println!("Done!");

    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    login_prompt: String,
    password_prompt: String,
    marker: Option<String>,
    settings: Option<PathBuf>,
    login: Option<String>,
    timeout: u64,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 23u16;
        let mut user = "admin".to_string();
        let mut password = None;
        let mut login_prompt = "login:".to_string();
        let mut password_prompt = "Password:".to_string();
        let mut marker = None;
        let mut settings = None;
        let mut login = None;
        let mut timeout = 10u64;

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            match args[i].as_str() {
                "--host" | "-h" => host = value.unwrap_or(host),
                "--port" | "-p" => port = value.and_then(|v| v.parse().ok()).unwrap_or(23),
                "--user" | "-u" => user = value.unwrap_or(user),
                "--password" | "-P" => password = value,
                "--login-prompt" => login_prompt = value.unwrap_or(login_prompt),
                "--password-prompt" => password_prompt = value.unwrap_or(password_prompt),
                "--marker" | "-m" => marker = value,
                "--settings" | "-s" => settings = value.map(PathBuf::from),
                "--login" | "-l" => login = value,
                "--timeout" | "-t" => {
                    timeout = value.and_then(|v| v.parse().ok()).unwrap_or(10)
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        Self {
            host,
            port,
            user,
            password,
            login_prompt,
            password_prompt,
            marker,
            settings,
            login,
            timeout,
        }
    }

    fn print_help() {
        println!(
            r#"telscrape subscriber_lookup example

USAGE:
    cargo run --example subscriber_lookup -- [OPTIONS] --login <LOGIN>

OPTIONS:
    -h, --host <HOST>              Target host [default: localhost]
    -p, --port <PORT>              Telnet port [default: 23]
    -u, --user <USER>              Username [default: admin]
    -P, --password <PASS>          Password for authentication
        --login-prompt <TEXT>      Login prompt text [default: login:]
        --password-prompt <TEXT>   Password prompt text [default: Password:]
    -m, --marker <TEXT>            Fixed end-of-output marker [default: learned at login]
    -s, --settings <PATH>          JSON settings file (overrides host and credentials)
    -l, --login <LOGIN>            Subscriber login to look up
    -t, --timeout <SECS>           Connection timeout [default: 10]
    --help                         Print this help message
"#
        );
    }
}
