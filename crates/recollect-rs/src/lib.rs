//! Public SDK surface for Recollect.
//!
//! This crate re-exports the pipeline building blocks and wires them up from
//! a loaded [`config::RecollectConfig`].

/// Re-export for convenience.
pub use recollect_rs_config as config;
pub use recollect_rs_core as core;
/// Re-export for convenience.
pub use recollect_rs_llm as llm;
/// Re-export for convenience.
pub use recollect_rs_memory as memory;

pub mod setup;

pub use setup::{
    DEFAULT_MEMORY_PATH, SetupError, build_pipeline, capture_policy_from_config,
    completion_from_config, memory_store_from_config,
};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}
