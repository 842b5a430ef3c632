use std::env;

/// Runtime settings, all environment-driven with sensible defaults so
/// the server starts with no setup at all.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage_path: String,
    pub port: u16,
    pub fault_probability: f64,
}

impl Config {
    pub fn from_env() -> Self {
        let storage_path =
            env::var("NOTES_STORAGE_PATH").unwrap_or_else(|_| "notes.json".to_string());

        let port = parse_var("NOTES_PORT", 8000);
        let fault_probability = parse_var("NOTES_FAULT_PROBABILITY", 0.4);

        Self {
            storage_path,
            port,
            fault_probability,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value '{raw}' for {name}, falling back to default");
            default
        }),
        Err(_) => default,
    }
}
