pub mod serper;

pub use serper::{SerperSearch, SERPER_ENDPOINT};
