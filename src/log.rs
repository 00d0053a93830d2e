use serde::Deserialize;
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

#[derive(Deserialize)]
pub struct Log {
    pub level: String,
    /// JSON lines instead of the human readable format
    #[serde(default)]
    pub structured: bool,
}

/// setup log from an optional environment filter and the config file
///
/// if the environment filter is present, then the config is not used
pub fn setup(
    env_filter: Result<EnvFilter, tracing_subscriber::filter::FromEnvError>,
    config: &Option<Log>,
) {
    let (filter, structured) = match (env_filter, config) {
        (Ok(env_filter), config) => (
            env_filter,
            config.as_ref().map(|c| c.structured).unwrap_or(false),
        ),
        (Err(_), Some(config)) => (EnvFilter::new(&config.level), config.structured),
        (Err(_), None) => return,
    };

    let sbuilder = Subscriber::builder()
        .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc3339())
        .with_level(true)
        .with_env_filter(filter);
    let installed = if structured {
        tracing::subscriber::set_global_default(sbuilder.json().finish())
    } else {
        tracing::subscriber::set_global_default(sbuilder.with_ansi(true).finish())
    };
    if let Err(err) = installed {
        eprintln!("tracing subscriber already installed: {}", err);
    }
}
