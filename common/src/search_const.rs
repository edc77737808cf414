//! Portal-wide search constants.

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const DEFAULT_SORT: &str = "mostrecent";

/// Sort options understood by the search backend.
pub const SORT_OPTIONS: &[&str] = &["mostrecent", "leastrecent", "mostcited"];

/// Shown in place of the widget once either fetch has failed.
pub const SEARCH_ERROR_NOTICE: &str = "Something went wrong, can not search";
