//! Chat provider abstractions - uniform text generation over cloud vendors
//!
//! Provides the `ChatModel` port, vendor adapters (OpenAI, Anthropic), and a
//! string-keyed registry for dispatch by provider id.
//!
//! # Example
//!
//! ```ignore
//! use ai_chat::{ChatRegistry, ChatRequest};
//!
//! let registry = ChatRegistry::from_config(&config)?;
//! let response = registry
//!     .chat("anthropic")?
//!     .chat(ChatRequest::simple("What is a filter graph?"))
//!     .await?;
//! println!("{}", response.content);
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod registry;

pub use config::{AnthropicConfig, ChatConfig, OpenAiChatConfig};
pub use error::ChatError;
pub use ports::{ChatMessage, ChatModel, ChatRequest, ChatResponse, ChatRole, TokenUsage};
pub use registry::ChatRegistry;
