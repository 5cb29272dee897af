pub mod search;

pub use search::{SearchInput, SearchParams};
