//! # CrewHands Scrapers
//!
//! Site adapters for the supported job boards and the driver that runs one
//! adapter through a complete scrape session:
//!
//! initialize → login (best effort) → search (retried) → extract/advance
//! until the board runs dry → detail enrichment → normalize and dedup →
//! dump → close.
//!
//! Boards differ only in data: [`SiteDefinition`] carries the addresses,
//! selector tables and pagination style that [`BoardAdapter`] interprets.

mod adapter;
mod driver;
mod dump;
mod error;
mod extract;
mod site;
mod state;

pub use adapter::{BoardAdapter, Credentials, SearchFilters, SiteAdapter};
pub use driver::{scrape_site, ScrapeOptions};
pub use dump::{dump_jobs, dump_path};
pub use error::ScrapeError;
pub use extract::{count_cards, extract_cards, extract_details};
pub use site::{
    DetailSelectors, LoginRules, Pagination, SelectorTable, SiteDefinition, SELECTOR_VERSION,
};
pub use state::SessionState;
