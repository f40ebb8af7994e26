pub(crate) mod dashboard;
pub(crate) mod health;
pub(crate) mod sales;
pub(crate) mod stock;

/// Body limit for routes that accept an uploaded file as a base64 data URI.
pub(crate) const UPLOAD_BODY_LIMIT: usize = 64 * 1024 * 1024;
