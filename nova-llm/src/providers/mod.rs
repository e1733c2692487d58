pub mod trait_impl;
pub mod ollama;

pub use trait_impl::ChatProvider;
pub use ollama::OllamaProvider;
