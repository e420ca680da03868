// LLM abstraction layer

pub mod provider;
pub mod openai;

#[cfg(test)]
pub(crate) mod testing;

pub use provider::*;
pub use crate::types::*;
