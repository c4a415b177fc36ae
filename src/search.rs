//! Cursor-based pagination over the story search endpoint

use tracing::{debug, warn};

use crate::api::{Api, ApiError};
use crate::config::PAGINATION_FETCH_CAP;
use crate::model::Story;

/// Accumulated result of a paginated story search
#[derive(Debug)]
pub struct SearchOutcome {
    /// Stories from all fetched pages, concatenated in page order
    pub stories: Vec<Story>,
    /// Total result count as reported by the server, when it reported one
    pub total: Option<u64>,
    /// Present only when pagination stopped at the safety cap
    pub warning: Option<String>,
}

/// Fetch all pages of a story search, following continuation tokens until the
/// server stops issuing them or the fetch cap is reached.
///
/// The cap check is an approximation (`continuation_calls * page_size`), kept
/// deliberately coarse: its job is to stop a runaway query before it chews
/// through the API rate limit, not to count records exactly.
pub fn search_stories(
    api: &dyn Api,
    query: &str,
    page_size: usize,
) -> Result<SearchOutcome, ApiError> {
    let first_page = api.search_stories(query, page_size)?;
    let total = first_page.total;
    let mut stories = first_page.data;
    let mut next_token = first_page.next;
    let mut continuation_calls = 0usize;
    let mut warning = None;

    while let Some(token) = next_token.take() {
        continuation_calls += 1;
        if continuation_calls * page_size > PAGINATION_FETCH_CAP {
            let approx_fetched = continuation_calls * page_size;
            let reported_total = match total {
                Some(t) => t.to_string(),
                None => "an unknown total".to_string(),
            };
            warn!(approx_fetched, %reported_total, "stopping pagination at fetch cap");
            warning = Some(format!(
                "Excessive api calls resulted in truncated data set. \
                 About {} of {} returned",
                approx_fetched, reported_total
            ));
            break;
        }

        let page = api.next_page(&token)?;
        debug!(
            page = continuation_calls,
            fetched = page.data.len(),
            "continuation page fetched"
        );
        stories.extend(page.data);
        next_token = page.next;
    }

    Ok(SearchOutcome {
        stories,
        total,
        warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_utils::StubApi;
    use crate::model::SearchPage;

    fn story(id: i64) -> Story {
        Story {
            id: id.into(),
            name: format!("story {}", id),
            description: String::new(),
            epic_id: 1.into(),
        }
    }

    fn page(ids: &[i64], next: Option<&str>, total: Option<u64>) -> SearchPage {
        SearchPage {
            data: ids.iter().copied().map(story).collect(),
            next: next.map(str::to_string),
            total,
        }
    }

    #[test]
    fn single_page_returns_items_and_total_without_warning() {
        let api = StubApi::new(vec![], vec![page(&[1, 2, 3], None, Some(3))]);
        let outcome = search_stories(&api, "label:x", 25).unwrap();

        assert_eq!(outcome.stories.len(), 3);
        assert_eq!(outcome.total, Some(3));
        assert!(outcome.warning.is_none());
    }

    #[test]
    fn absent_total_stays_absent() {
        let api = StubApi::new(vec![], vec![page(&[1], None, None)]);
        let outcome = search_stories(&api, "q", 25).unwrap();

        assert!(outcome.total.is_none());
        assert!(outcome.warning.is_none());
    }

    #[test]
    fn pages_are_concatenated_in_page_order() {
        let api = StubApi::new(
            vec![],
            vec![
                page(&[1, 2], Some("/next?cursor=a"), Some(6)),
                page(&[3, 4], Some("/next?cursor=b"), Some(6)),
                page(&[5, 6], None, Some(6)),
            ],
        );
        let outcome = search_stories(&api, "q", 25).unwrap();

        let ids: Vec<_> = outcome
            .stories
            .iter()
            .map(|s| s.id.to_string())
            .collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6"]);
        assert_eq!(
            *api.continuation_tokens.borrow(),
            vec!["/next?cursor=a", "/next?cursor=b"]
        );
        assert!(outcome.warning.is_none());
    }

    #[test]
    fn fetch_cap_stops_pagination_with_warning() {
        // page_size 600: first continuation call is under the 1000 cap, the
        // second (2 * 600 = 1200) trips it before fetching.
        let api = StubApi::new(
            vec![],
            vec![
                page(&[1], Some("/next?cursor=a"), Some(5000)),
                page(&[2], Some("/next?cursor=b"), Some(5000)),
            ],
        );
        let outcome = search_stories(&api, "q", 600).unwrap();

        assert_eq!(outcome.stories.len(), 2);
        assert_eq!(outcome.total, Some(5000));
        let warning = outcome.warning.expect("warning expected at cap");
        assert!(warning.contains("About 1200 of 5000"), "got: {}", warning);
        // the second token was never followed
        assert_eq!(*api.continuation_tokens.borrow(), vec!["/next?cursor=a"]);
    }

    #[test]
    fn fetch_cap_warning_handles_unknown_total() {
        let api = StubApi::new(
            vec![],
            vec![
                page(&[1], Some("/next?cursor=a"), None),
                page(&[2], Some("/next?cursor=b"), None),
            ],
        );
        let outcome = search_stories(&api, "q", 600).unwrap();

        let warning = outcome.warning.expect("warning expected at cap");
        assert!(warning.contains("an unknown total"), "got: {}", warning);
    }
}
