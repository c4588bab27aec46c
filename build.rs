use std::env;
use std::fs;
use std::path::Path;

const KEYS: [&str; 3] = [
    "PORTAL_API_BASE",
    "PORTAL_POLL_INTERVAL_MS",
    "PORTAL_FLASH_TIMEOUT_MS",
];

fn main() {
    // Values from an optional .env file; the real environment takes precedence
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"');

                    if KEYS.contains(&key) && env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    }

    for key in KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
}
