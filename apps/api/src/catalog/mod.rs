pub mod feedback;
pub mod filter;
pub mod handlers;
pub mod normalizer;
pub mod policy;
pub mod prompts;
pub mod seed;
pub mod similarity;
pub mod store;
