use std::sync::OnceLock;

pub use log::LevelFilter;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install `env_logger` once. `RUST_LOG` wins over `default_level` when set.
pub fn init(default_level: LevelFilter) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env = env_logger::Env::default().default_filter_or(default_level.to_string());
        let mut builder = env_logger::Builder::from_env(env);
        builder.format_timestamp(None).format_target(false);
        // A test harness may have installed a logger already.
        let _ = builder.try_init();
    });
}

/// Initialize with `info` as the default level.
pub fn init_default() {
    init(LevelFilter::Info);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init(LevelFilter::Debug);
        init_default();
        log::info!("logger installed");
        assert!(LOGGER_INITIALIZED.get().is_some());
    }
}
