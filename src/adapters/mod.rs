pub mod perplexity;

pub use perplexity::PerplexityClient;
