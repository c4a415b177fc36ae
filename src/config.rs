//! Configuration constants for the story exporter
//!
//! This module centralizes the tunable parameters and fixed endpoints used
//! throughout the application.

use std::time::Duration;

// ============================================================================
// API Configuration
// ============================================================================

/// Base URL of the Clubhouse API, with trailing slash
pub const DEFAULT_BASE_URL: &str = "https://api.clubhouse.io/";

/// API version path segment appended to the base URL
pub const API_VERSION: &str = "api/v2";

/// Environment variable the auth token is read from
pub const TOKEN_ENV_VAR: &str = "CLUBHOUSE_TOKEN";

/// Timeout applied to every HTTP request
///
/// The API answers list and search calls in well under a second; a request
/// that takes longer than this is stuck, not slow.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Pagination Configuration
// ============================================================================

/// Number of search results requested per page
///
/// Clubhouse defaults search pages to 25 results for performance reasons.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Soft cap on the number of records fetched through continuation calls
///
/// Once `continuation_calls * page_size` exceeds this, pagination stops and
/// the result carries a truncation warning. Keeps a runaway query under the
/// Clubhouse 200 requests/minute rate limit.
pub const PAGINATION_FETCH_CAP: usize = 1000;

// ============================================================================
// Report Configuration
// ============================================================================

/// Epics carrying this label each become a sheet in the report
pub const SHEET_FILTER_LABEL: &str = "Test Suite";
