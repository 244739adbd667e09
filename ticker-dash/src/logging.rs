use std::{fs::File, io, path::Path, sync::Mutex};

/// Install a `tracing` subscriber writing to `path`. The terminal belongs to the UI, so log
/// output never goes to stdout. Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::options().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
