/*
[INPUT]:  Public API exports for wallet-session-cli crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod call_spec;
pub mod config;
pub mod console;
pub mod host;
pub mod profile;

// Re-export main types for convenience
pub use call_spec::parse_call;
pub use config::CliConfig;
pub use console::{ConsoleBiometric, ConsoleBrowser};
pub use host::SessionHost;
pub use profile::ProfileStore;
