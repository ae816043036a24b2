use std::env;
use std::path::Path;

/// Settings embedded into firmware builds. Process environment wins over `.env`.
const SETTINGS: [&str; 4] = [
    "SHUTTERLINK_PEER_MAC",
    "SHUTTERLINK_BROADCAST",
    "SHUTTERLINK_DEBUG",
    "SHUTTERLINK_CHANNEL",
];

fn main() {
    println!("cargo:rerun-if-changed=.env");
    for key in SETTINGS {
        println!("cargo:rerun-if-env-changed={key}");
    }

    if Path::new(".env").exists() {
        if let Err(e) = dotenvy::dotenv() {
            println!("cargo:warning=Failed to load .env file: {e}");
        }
    }

    for key in SETTINGS {
        let value = env::var(key).unwrap_or_default().trim().to_string();
        println!("cargo:rustc-env={key}={value}");
    }

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
