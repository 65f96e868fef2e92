use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber, `RUST_LOG` overrides `default_level`
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    let installed = if cfg!(test) {
        builder.compact().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = installed {
        eprintln!("Tracing already initialized: {}", e);
    }
}
