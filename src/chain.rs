//! The source chain: try each source in priority order, keep the first one
//! that yields enough rows, and fall back to demo data when none does.
//!
//! Only one source's rows ever leave [`SourceChain::acquire`]; the rest of
//! the list is not fetched once a source is accepted.

use crate::entropy::Entropy;
use crate::fetch::{Fetcher, Transport};
use crate::models::{RowRecord, SourceResults};
use crate::normalize::NameNormalizer;
use crate::scrapers::demo::{demo_rows, DEMO_SOURCE_ID};
use crate::scrapers::{table, SourceSpec};
use tracing::{error, info, instrument, warn};

/// Thresholds governing which source is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainLimits {
    /// Minimum rows for a source to be accepted.
    pub min_viable_rows: usize,
    /// Rows kept per source.
    pub max_teams: usize,
    pub demo_fallback: bool,
}

impl Default for ChainLimits {
    fn default() -> Self {
        Self {
            min_viable_rows: 10,
            max_teams: 18,
            demo_fallback: true,
        }
    }
}

/// Ordered fallback over standings sources.
#[derive(Debug)]
pub struct SourceChain<T, E> {
    fetcher: Fetcher<T>,
    rng: E,
    sources: Vec<SourceSpec>,
    normalizer: NameNormalizer,
    limits: ChainLimits,
}

impl<T: Transport, E: Entropy> SourceChain<T, E> {
    pub fn new(
        fetcher: Fetcher<T>,
        rng: E,
        sources: Vec<SourceSpec>,
        normalizer: NameNormalizer,
        limits: ChainLimits,
    ) -> Self {
        Self {
            fetcher,
            rng,
            sources,
            normalizer,
            limits,
        }
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &Fetcher<T> {
        &self.fetcher
    }

    /// Rows from the first viable source, or the demo table, or nothing.
    #[instrument(level = "info", skip_all)]
    pub async fn acquire(&mut self) -> SourceResults {
        let mut results = SourceResults::new();

        for idx in 0..self.sources.len() {
            let id = self.sources[idx].id.clone();
            info!(source = %id, "Trying source");
            let rows = self.scrape(idx).await;

            if rows.len() >= self.limits.min_viable_rows {
                info!(source = %id, teams = rows.len(), "Source accepted");
                results.insert(id, rows);
                return results;
            }
            warn!(
                source = %id,
                teams = rows.len(),
                min = self.limits.min_viable_rows,
                "Insufficient data; falling back"
            );
        }

        if self.limits.demo_fallback {
            warn!("All sources failed; using demonstration data");
            let rows = demo_rows(&mut self.rng);
            results.insert(DEMO_SOURCE_ID, rows);
        } else {
            error!("All sources failed and demo fallback is disabled");
        }
        results
    }

    /// Fetch and extract one source. Empty on any failure.
    async fn scrape(&mut self, idx: usize) -> Vec<RowRecord> {
        let spec = &self.sources[idx];
        let Some(page) = self.fetcher.fetch(&spec.url, &mut self.rng).await else {
            warn!(source = %spec.id, "No response from source");
            return Vec::new();
        };
        table::extract(spec, &page.body, &self.normalizer, self.limits.max_teams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::SeededEntropy;
    use crate::fetch::testing::CannedTransport;
    use crate::fetch::FetchPolicy;
    use crate::scrapers::demo::DEMO_LABEL;
    use crate::scrapers::{ColumnMap, RowLocator};

    fn source(id: &str) -> SourceSpec {
        SourceSpec {
            id: id.to_string(),
            label: id.to_uppercase(),
            url: format!("https://{id}.test/tabla"),
            locators: vec![RowLocator::rows("tbody tr")],
            min_cells: 3,
            columns: ColumnMap::default(),
        }
    }

    fn page_with_rows(n: usize) -> String {
        let rows: String = (1..=n)
            .map(|i| {
                format!(
                    "<tr><td>{i}</td><td>Club {i}</td><td>{}</td><td>12</td></tr>",
                    40 - i
                )
            })
            .collect();
        format!("<table><tbody>{rows}</tbody></table>")
    }

    fn chain(
        transport: CannedTransport,
        ids: &[&str],
        limits: ChainLimits,
    ) -> SourceChain<CannedTransport, SeededEntropy> {
        SourceChain::new(
            Fetcher::new(transport, FetchPolicy::immediate()),
            SeededEntropy::seeded(11),
            ids.iter().map(|id| source(id)).collect(),
            NameNormalizer::default(),
            limits,
        )
    }

    #[tokio::test]
    async fn test_skips_source_below_threshold() {
        let transport = CannedTransport::default()
            .with_page("https://one.test/tabla", page_with_rows(5))
            .with_page("https://two.test/tabla", page_with_rows(15));
        let mut c = chain(transport, &["one", "two"], ChainLimits::default());

        let results = c.acquire().await;
        assert_eq!(results.keys().collect::<Vec<_>>(), vec!["two"]);
        assert_eq!(results.get("two").unwrap().len(), 15);
    }

    #[tokio::test]
    async fn test_first_success_stops_the_chain() {
        let transport = CannedTransport::default()
            .with_page("https://one.test/tabla", page_with_rows(12))
            .with_page("https://two.test/tabla", page_with_rows(18));
        let mut c = chain(transport, &["one", "two"], ChainLimits::default());

        let results = c.acquire().await;
        assert_eq!(results.keys().collect::<Vec<_>>(), vec!["one"]);
        let requested = c.fetcher().transport().requested.borrow();
        assert_eq!(requested.as_slice(), ["https://one.test/tabla"]);
    }

    #[tokio::test]
    async fn test_rows_are_capped_at_max_teams() {
        let transport =
            CannedTransport::default().with_page("https://one.test/tabla", page_with_rows(30));
        let mut c = chain(transport, &["one"], ChainLimits::default());
        assert_eq!(c.acquire().await.get("one").unwrap().len(), 18);
    }

    #[tokio::test]
    async fn test_all_empty_falls_back_to_demo() {
        let transport = CannedTransport::default()
            .with_page("https://one.test/tabla", "<p>blocked</p>")
            .with_page("https://two.test/tabla", page_with_rows(0));
        let mut c = chain(transport, &["one", "two", "three"], ChainLimits::default());

        let results = c.acquire().await;
        assert_eq!(results.keys().collect::<Vec<_>>(), vec![DEMO_SOURCE_ID]);
        let demo = results.get(DEMO_SOURCE_ID).unwrap();
        assert_eq!(demo.len(), 18);
        assert!(demo.iter().all(|r| r.source == DEMO_LABEL));
    }

    #[tokio::test]
    async fn test_no_demo_when_disabled() {
        let limits = ChainLimits {
            demo_fallback: false,
            ..ChainLimits::default()
        };
        let mut c = chain(CannedTransport::default(), &["one"], limits);
        assert!(c.acquire().await.is_empty());
    }

    #[tokio::test]
    async fn test_threshold_is_configurable() {
        let limits = ChainLimits {
            min_viable_rows: 3,
            ..ChainLimits::default()
        };
        let transport =
            CannedTransport::default().with_page("https://one.test/tabla", page_with_rows(5));
        let mut c = chain(transport, &["one"], limits);
        assert_eq!(c.acquire().await.get("one").unwrap().len(), 5);
    }
}
