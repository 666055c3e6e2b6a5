//! Port traits (interfaces for adapters).
//!
//! The application layer depends on these traits, not on concrete
//! merchant code.

mod handler;

pub use handler::ResultHandler;
