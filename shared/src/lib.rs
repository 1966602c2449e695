pub mod macros;
pub mod metrics_defs;
pub mod urls;
