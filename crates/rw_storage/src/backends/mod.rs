pub mod http;
pub mod memory;

pub use http::HttpStore;
pub use memory::InMemoryStore;
