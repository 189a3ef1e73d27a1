//! Library entry point for the T prism demo.

pub mod config;
pub mod engine;
pub mod scene;

// Re-export main types for convenience
pub use config::DemoConfig;
pub use scene::App;
