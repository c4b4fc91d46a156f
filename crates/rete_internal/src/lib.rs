//! # wc_rete Internal Library
//!
//! Re-exports the wc_rete crates for convenience.

/// Layer 1: discrimination network storage.
pub use rete_network;

/// Layer 2: pattern compilation.
pub use rete_compiler;

/// Log subscriber setup.
pub use rete_tracing;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use rete_compiler::prelude::*;
    pub use rete_tracing::{TracingFormat, TracingSetup};
}
