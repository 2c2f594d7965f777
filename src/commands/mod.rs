// Command handlers module
pub mod monitor;
pub mod snapshot;

// Re-exports for cleaner imports
pub use monitor::execute as monitor;
pub use snapshot::execute as snapshot;
