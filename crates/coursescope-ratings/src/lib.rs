//! Instructor profile lookup for coursescope.
//!
//! Fetches ratings-site search pages, extracts profile candidates through an
//! embedded-JSON / DOM / free-text cascade, picks the best match for the
//! configured institution and caches the answer for a bounded time.

pub mod cache;
pub mod disambiguate;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod lookup;
pub mod types;

mod numbers;

pub use cache::{cache_key, ProfileCache, TtlCache};
pub use disambiguate::disambiguate;
pub use error::RatingsError;
pub use extract::{extract_candidates, extract_profile};
pub use fetch::{HttpPageFetcher, PageFetcher};
pub use lookup::{LookupSettings, ProfileLookup};
pub use types::{ProfileCandidate, ProfileFields, ProfileQuery, ProfileResult};
