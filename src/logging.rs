use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the stderr subscriber. `RUST_LOG` wins over the `-v` count.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "gmail_mailer=info",
        1 => "gmail_mailer=debug",
        _ => "gmail_mailer=trace,reqwest=debug",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(default_directive(0), "gmail_mailer=info");
        assert_eq!(default_directive(1), "gmail_mailer=debug");
        assert!(default_directive(4).starts_with("gmail_mailer=trace"));
    }
}
