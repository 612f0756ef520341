pub mod store;
pub mod fs;
pub mod memory;

pub use store::DocumentStore;
pub use fs::FsStore;
pub use memory::MemoryStore;
