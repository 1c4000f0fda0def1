//! LLM provider adapters

mod google_ai;

pub use google_ai::GoogleAiAdapter;
