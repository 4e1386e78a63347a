pub mod completion_llm;
pub mod file_store;
pub mod memory_store;

pub use completion_llm::OpenAiCompletionAdapter;
pub use file_store::FileTestStore;
pub use memory_store::InMemoryTestStore;
