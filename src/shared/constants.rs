/// Prefix for all versioned API routes
pub const API_V1_PREFIX: &str = "/api/v1";

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "catalog-service";

/// Upper bound on the parent chain walked when checking the category hierarchy
pub const MAX_CATEGORY_DEPTH: usize = 64;
