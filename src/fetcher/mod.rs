mod fetch_error;
mod fetcher;

pub use fetch_error::FetchError;
pub use fetcher::{extract_visible_text, PricingPageFetcher, MAX_PAGE_CHARS};
