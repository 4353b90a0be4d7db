//! Storage primitives for durable client-side records.

pub mod atomic_json;

pub use atomic_json::AtomicJsonFile;
