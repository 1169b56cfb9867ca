//! Demo binary: a local menu REPL.

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(err) = waymark_runtime::repl::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
