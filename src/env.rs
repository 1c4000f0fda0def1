//! Environment variable constants used throughout the application
//!
//! This module centralizes all environment variable names. They are only read
//! while resolving [`crate::config::AppConfig`] at startup.

/// Logging configuration
pub mod logging {
    /// Log level configuration (e.g., "debug", "info", "warn", "error")
    pub const LOG_LEVEL: &str = "PARTMATCH_LOG_LEVEL";

    /// Log file path for file-based logging
    pub const LOG_FILE: &str = "PARTMATCH_LOG_FILE";

    /// Emit logs as JSON lines
    pub const LOG_JSON: &str = "PARTMATCH_LOG_JSON";

    /// Disable colored output (follows the NO_COLOR standard)
    pub const NO_COLOR: &str = "NO_COLOR";
}

/// External API configuration
pub mod apis {
    /// Google AI API key used for embeddings and explanations
    pub const GOOGLE_AI_API_KEY: &str = "GOOGLE_AI_API_KEY";

    /// Override for the Generative Language API base URL
    pub const GOOGLE_AI_BASE_URL: &str = "PARTMATCH_GOOGLE_AI_BASE_URL";
}

/// Embedding provider configuration
pub mod embedding {
    /// "google-ai" | "local" | "hashing"
    pub const PROVIDER: &str = "PARTMATCH_EMBEDDING_PROVIDER";

    /// Provider-specific model identifier
    pub const MODEL: &str = "PARTMATCH_EMBEDDING_MODEL";
}

/// Generative model configuration
pub mod llm {
    /// Gemini model used for match explanations
    pub const MODEL: &str = "PARTMATCH_LLM_MODEL";

    /// Request timeout in seconds
    pub const TIMEOUT: &str = "PARTMATCH_LLM_TIMEOUT";
}
