pub mod anthropic;
pub mod mock;
pub mod traits;

pub use traits::{LLMError, LLMProvider};
