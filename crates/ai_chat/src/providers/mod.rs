//! Vendor adapters for the `ChatModel` port

pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicChat;
pub use openai::OpenAiChat;
