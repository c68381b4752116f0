use futures_util::stream::{self, Stream, TryStreamExt};
use log::debug;
use serde_json::Value;

use crate::error::RecGovError;
use crate::source::RecordSource;

/// Records requested per page unless the caller says otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Walks a paginated RIDB list endpoint.
///
/// Every call to [`RecordPager::records`] starts a fresh pass at offset 0.
/// The pass ends once the running record count equals the total the service
/// reported; a count that overshoots the total, a page whose length disagrees
/// with its own count, or an empty page before the total is reached all end
/// the pass with [`RecGovError::ProtocolInconsistency`].
pub struct RecordPager<'a> {
    source: &'a dyn RecordSource,
    endpoint: String,
    query: Vec<(String, String)>,
    page_size: usize,
}

#[derive(Debug, Clone, Copy)]
struct PagerState {
    retrieved: usize,
    total: Option<usize>,
}

impl<'a> RecordPager<'a> {
    /// Create a pager over `endpoint` with the default page size.
    pub fn new(source: &'a dyn RecordSource, endpoint: impl Into<String>) -> Self {
        Self {
            source,
            endpoint: endpoint.into(),
            query: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Extra query parameters sent with every page request.
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Override the page size. Zero is bumped to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Lazily stream every record of the endpoint.
    pub fn records(&self) -> impl Stream<Item = Result<Value, RecGovError>> + Send + '_ {
        let initial = PagerState {
            retrieved: 0,
            total: None,
        };

        stream::try_unfold(initial, move |state| async move {
            if state.total == Some(state.retrieved) {
                return Ok::<_, RecGovError>(None);
            }

            let page = self
                .source
                .get_page(&self.endpoint, &self.query, state.retrieved, self.page_size)
                .await?;

            let retrieved = state.retrieved + page.page_count;
            let total = page.total_count;
            debug!(
                "Fetched {} records from {} ({}/{})",
                page.page_count, self.endpoint, retrieved, total
            );

            let stalled = page.page_count == 0 && retrieved < total;
            if retrieved > total || stalled || page.records.len() != page.page_count {
                return Err(RecGovError::ProtocolInconsistency { total, retrieved });
            }

            let next = PagerState {
                retrieved,
                total: Some(total),
            };
            let records = page.records.into_iter().map(Ok::<Value, RecGovError>);
            Ok(Some((stream::iter(records), next)))
        })
        .try_flatten()
    }

    /// Collect every record of the endpoint.
    pub async fn fetch_all(&self) -> Result<Vec<Value>, RecGovError> {
        self.records().try_collect().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures_util::StreamExt;
    use serde_json::json;

    use super::*;
    use crate::source::RecordPage;

    /// Serves `total` numbered records, reporting `reported_total` as the total.
    struct MockRecordSource {
        total: usize,
        reported_total: usize,
        extra_on_last_page: usize,
        short_pages: bool,
        offsets: Mutex<Vec<usize>>,
        queries: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl MockRecordSource {
        fn new(total: usize) -> Self {
            Self {
                total,
                reported_total: total,
                extra_on_last_page: 0,
                short_pages: false,
                offsets: Mutex::new(Vec::new()),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl RecordSource for MockRecordSource {
        async fn get_page(
            &self,
            _endpoint: &str,
            query: &[(String, String)],
            offset: usize,
            limit: usize,
        ) -> Result<RecordPage, RecGovError> {
            self.offsets.lock().unwrap().push(offset);
            self.queries.lock().unwrap().push(query.to_vec());

            let end = (offset + limit).min(self.total);
            let mut records: Vec<Value> = (offset..end).map(|i| json!({"id": i})).collect();
            if end == self.total {
                records.extend((0..self.extra_on_last_page).map(|i| json!({"id": end + i})));
            }

            let page_count = records.len();
            if self.short_pages {
                records.pop();
            }

            Ok(RecordPage {
                page_count,
                records,
                total_count: self.reported_total,
            })
        }
    }

    #[tokio::test]
    async fn test_two_page_fetch_has_no_gaps() {
        let source = MockRecordSource::new(73);
        let pager = RecordPager::new(&source, "facilities/1/campsites");

        let records = pager.fetch_all().await.unwrap();

        assert_eq!(records.len(), 73);
        let ids: Vec<u64> = records.iter().map(|r| r["id"].as_u64().unwrap()).collect();
        assert_eq!(ids, (0..73).collect::<Vec<u64>>());
        assert_eq!(*source.offsets.lock().unwrap(), vec![0, 50]);
    }

    #[tokio::test]
    async fn test_overshooting_total_is_inconsistent() {
        let mut source = MockRecordSource::new(73);
        source.extra_on_last_page = 7;
        let pager = RecordPager::new(&source, "facilities/1/campsites");

        let result = pager.fetch_all().await;

        assert!(matches!(
            result,
            Err(RecGovError::ProtocolInconsistency {
                total: 73,
                retrieved: 80
            })
        ));
    }

    #[tokio::test]
    async fn test_stalled_page_is_inconsistent() {
        let mut source = MockRecordSource::new(10);
        source.reported_total = 20;
        let pager = RecordPager::new(&source, "facilities/1/campsites").with_page_size(10);

        let result = pager.fetch_all().await;

        assert!(matches!(
            result,
            Err(RecGovError::ProtocolInconsistency {
                total: 20,
                retrieved: 10
            })
        ));
        assert_eq!(*source.offsets.lock().unwrap(), vec![0, 10]);
    }

    #[tokio::test]
    async fn test_empty_endpoint_yields_nothing() {
        let source = MockRecordSource::new(0);
        let pager = RecordPager::new(&source, "facilities/1/campsites");

        let records = pager.fetch_all().await.unwrap();

        assert!(records.is_empty());
        assert_eq!(*source.offsets.lock().unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn test_records_restart_per_call() {
        let source = MockRecordSource::new(5);
        let pager = RecordPager::new(&source, "facilities/1/campsites").with_page_size(2);

        let first: Vec<_> = pager.records().collect().await;
        let second: Vec<_> = pager.records().collect().await;

        assert_eq!(first.len(), 5);
        assert_eq!(second.len(), 5);
        assert_eq!(*source.offsets.lock().unwrap(), vec![0, 2, 4, 0, 2, 4]);
    }

    #[tokio::test]
    async fn test_page_length_mismatch_is_inconsistent() {
        let mut source = MockRecordSource::new(5);
        source.short_pages = true;
        let pager = RecordPager::new(&source, "facilities/1/campsites").with_page_size(2);

        let result = pager.fetch_all().await;

        assert!(matches!(
            result,
            Err(RecGovError::ProtocolInconsistency {
                total: 5,
                retrieved: 2
            })
        ));
        assert_eq!(*source.offsets.lock().unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn test_query_sent_with_every_page() {
        let source = MockRecordSource::new(5);
        let query = vec![
            ("query".to_string(), "pines".to_string()),
            ("activity".to_string(), "CAMPING".to_string()),
        ];
        let pager = RecordPager::new(&source, "facilities/1/campsites")
            .with_query(query.clone())
            .with_page_size(2);

        let records = pager.fetch_all().await.unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(*source.queries.lock().unwrap(), vec![query.clone(), query.clone(), query]);
    }
}
