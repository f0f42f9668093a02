//! API constants

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Current API version
pub const API_VERSION: &str = "v0";

/// Versioned API prefix
pub const API_PREFIX: &str = "/api/v0";

/// Largest accepted request body; upload requests carry metadata only.
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Server-level cap on in-flight requests
pub const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
