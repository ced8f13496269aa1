// Adapters layer: concrete implementations of the store port. The real
// remote transport lives outside this crate; the in-memory fake lives here
// for tests and local use.

pub mod memory;

pub use memory::MemoryStore;
