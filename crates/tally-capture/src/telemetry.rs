//! Tracing subscriber setup for hosts embedding the capture engine.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVES: &str = "info,tally_capture=debug";

/// Installs a fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_directives`.
///
/// Returns false if a global subscriber was already set; the existing one is
/// kept.
pub fn init_tracing(default_directives: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        init_tracing(DEFAULT_DIRECTIVES);
        assert!(!init_tracing(DEFAULT_DIRECTIVES));
    }
}
