//! Upstream access: the paginating HTTP client and the trait it implements.
//!
//! The proxy only ever talks to the upstream through [`Upstream`], so tests
//! (and alternative transports) can swap in their own implementation.

pub mod client;
pub mod link;
pub mod traits;

pub use client::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, UpstreamClient, UpstreamConfig};
pub use link::next_page_url;
pub use traits::Upstream;
