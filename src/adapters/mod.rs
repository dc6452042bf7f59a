// Adapters layer: concrete document stores behind `DocumentStore`.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
