//! Clubhouse API access
//!
//! [`Api`] is the seam between the pipeline and the network: the real
//! [`ApiClient`] speaks HTTP, while tests substitute a stub that serves
//! canned pages.

pub mod client;
pub mod error;

pub use client::{ApiClient, ClientConfig};
pub use error::ApiError;

use crate::model::{Epic, SearchPage};

/// Read-only operations the exporter needs from the API
pub trait Api {
    /// Full, unfiltered epic listing
    fn list_epics(&self) -> Result<Vec<Epic>, ApiError>;

    /// First page of a story search
    fn search_stories(&self, query: &str, page_size: usize) -> Result<SearchPage, ApiError>;

    /// Follow a server-issued continuation token
    fn next_page(&self, token: &str) -> Result<SearchPage, ApiError>;
}

#[cfg(test)]
pub mod test_utils {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Test double that serves canned epics and search pages in order
    pub struct StubApi {
        epics: Vec<Epic>,
        pages: RefCell<VecDeque<SearchPage>>,
        pub continuation_tokens: RefCell<Vec<String>>,
    }

    impl StubApi {
        pub fn new(epics: Vec<Epic>, pages: Vec<SearchPage>) -> Self {
            Self {
                epics,
                pages: RefCell::new(pages.into()),
                continuation_tokens: RefCell::new(Vec::new()),
            }
        }
    }

    impl Api for StubApi {
        fn list_epics(&self) -> Result<Vec<Epic>, ApiError> {
            Ok(self.epics.clone())
        }

        fn search_stories(&self, _query: &str, _page_size: usize) -> Result<SearchPage, ApiError> {
            Ok(self
                .pages
                .borrow_mut()
                .pop_front()
                .expect("stub has no first page"))
        }

        fn next_page(&self, token: &str) -> Result<SearchPage, ApiError> {
            self.continuation_tokens
                .borrow_mut()
                .push(token.to_string());
            Ok(self
                .pages
                .borrow_mut()
                .pop_front()
                .expect("stub ran out of pages"))
        }
    }
}
