use std::pin::Pin;

use thiserror::Error;

/// A text-completion backend bound to one system persona.
pub trait LLMProvider: Send + Sync {
    fn query<'a>(
        &'a self,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, LLMError>> + Send + 'a>>;
}

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("LLMError: network failure: {0}")]
    Network(String),

    #[error("LLMError: provider returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("LLMError: invalid response: {0}")]
    InvalidResponse(String),

    #[error("LLMError: response contained no text")]
    EmptyResponse,
}
