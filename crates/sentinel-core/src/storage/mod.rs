//! Storage backends for vault records
//!
//! Records reach storage already encrypted, so backends only persist bytes:
//! 1. In-memory (tests and ephemeral use)
//! 2. JSON file (persistent)

mod file;
mod memory;
mod traits;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use traits::RecordStorage;
