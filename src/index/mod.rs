pub mod reader;
pub mod types;

pub use reader::SearchIndex;
pub use types::*;
