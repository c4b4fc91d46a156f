//! Compiles declarative graph patterns into a shared Rete discrimination
//! network.
//!

pub use rete_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use rete_internal::prelude::*;
}
