pub mod codec;
mod interface;
mod memory_store;
mod text_store;

pub use interface::{LedgerStore, Loaded, SkippedRecord, Result, BackendError};
pub use codec::MalformedRecord;
pub use memory_store::MemoryStore;
pub use text_store::TextStore;
