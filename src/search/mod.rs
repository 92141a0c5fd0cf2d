//! Full-text search over the site's pages.
//!
//! The index is loaded from a flat file at startup and only read afterwards.

pub mod index;

pub use index::{IndexError, MIN_SEARCH_WORD_LENGTH, Page, PageId, SearchIndex, write_record};
