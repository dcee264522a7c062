//! Lazy pagination over list endpoints.
//!
//! Strava list endpoints take 1-based `page` / `per_page` parameters
//! and signal the end of the collection with a short or empty page.
//! [`PageStream`] wraps that protocol as a [`Stream`] of items: nothing
//! is fetched until the stream is first polled, each page is fetched at
//! most once, and an optional item cap stops iteration early without
//! fetching pages past the one that satisfies it.

use futures_util::Stream;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::client::StravaClient;
use crate::models::{self, ClientBound};
use crate::{Error, Result};

/// Page size requested from list endpoints. The server's maximum.
pub const DEFAULT_PER_PAGE: usize = 200;

type PageFuture<T> = Pin<Box<dyn Future<Output = Result<Vec<T>>> + Send>>;
type PageFetcher<T> = Box<dyn Fn(usize, usize) -> PageFuture<T> + Send>;

/// A lazy, single-pass stream over a paginated collection.
///
/// Items are yielded in server order. Once the stream ends, for any
/// reason, it stays ended; to re-read a collection, request a new
/// stream from the service that produced this one.
///
/// # Example
///
/// ```no_run
/// use futures_util::TryStreamExt;
///
/// # async fn example(client: strava_rs::StravaClient) -> strava_rs::Result<()> {
/// let mut stream = client.activities().list(Default::default()).with_limit(50);
/// while let Some(activity) = stream.try_next().await? {
///     println!("{}", activity.name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PageStream<T> {
    fetch_page: PageFetcher<T>,
    pending: Option<PageFuture<T>>,
    buffer: VecDeque<T>,
    /// Next page to request, 1-based.
    page: usize,
    per_page: usize,
    limit: Option<usize>,
    yielded: usize,
    started: bool,
    last_page_seen: bool,
    done: bool,
}

impl<T> PageStream<T> {
    pub(crate) fn new(per_page: usize, limit: Option<usize>, fetch_page: PageFetcher<T>) -> Self {
        Self {
            fetch_page,
            pending: None,
            buffer: VecDeque::new(),
            page: 1,
            per_page,
            limit,
            yielded: 0,
            started: false,
            last_page_seen: false,
            done: false,
        }
    }

    /// Cap the stream at `limit` items. Builder form, for use before
    /// the first poll.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set or clear the item cap.
    ///
    /// Fails with [`Error::Usage`] once iteration has started; a
    /// mid-flight cap change has no well-defined meaning for items
    /// already yielded.
    pub fn set_limit(&mut self, limit: Option<usize>) -> Result<()> {
        if self.started {
            return Err(Error::Usage(
                "cannot change the item cap after iteration has started".into(),
            ));
        }
        self.limit = limit;
        Ok(())
    }

    /// Items yielded so far.
    pub fn count_yielded(&self) -> usize {
        self.yielded
    }
}

impl<T: Unpin> Stream for PageStream<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if this.done {
                return Poll::Ready(None);
            }

            // The cap is checked before touching the buffer or the
            // network, so a cap satisfied mid-page never triggers
            // another fetch.
            if let Some(limit) = this.limit {
                if this.yielded >= limit {
                    this.done = true;
                    this.pending = None;
                    return Poll::Ready(None);
                }
            }

            if let Some(item) = this.buffer.pop_front() {
                this.yielded += 1;
                return Poll::Ready(Some(Ok(item)));
            }

            if let Some(fut) = this.pending.as_mut() {
                match fut.as_mut().poll(cx) {
                    Poll::Ready(Ok(items)) => {
                        this.pending = None;
                        if items.len() < this.per_page {
                            this.last_page_seen = true;
                        }
                        if items.is_empty() {
                            this.done = true;
                            return Poll::Ready(None);
                        }
                        this.buffer = items.into();
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        this.pending = None;
                        this.done = true;
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            if this.last_page_seen {
                this.done = true;
                return Poll::Ready(None);
            }

            this.started = true;
            this.pending = Some((this.fetch_page)(this.page, this.per_page));
            this.page += 1;
        }
    }
}

impl<T> std::fmt::Debug for PageStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageStream")
            .field("page", &self.page)
            .field("per_page", &self.per_page)
            .field("limit", &self.limit)
            .field("yielded", &self.yielded)
            .field("done", &self.done)
            .finish()
    }
}

/// Internal builder that wires a list endpoint into a [`PageStream`],
/// decoding and client-binding each item.
pub(crate) struct PageStreamBuilder<T> {
    client: StravaClient,
    path: String,
    query: Vec<(String, String)>,
    per_page: usize,
    _marker: PhantomData<T>,
}

impl<T> PageStreamBuilder<T>
where
    T: DeserializeOwned + ClientBound + Send + Unpin + 'static,
{
    pub(crate) fn new(client: StravaClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            query: Vec::new(),
            per_page: DEFAULT_PER_PAGE,
            _marker: PhantomData,
        }
    }

    pub(crate) fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub(crate) fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub(crate) fn build(self) -> PageStream<T> {
        let Self {
            client,
            path,
            query,
            per_page,
            ..
        } = self;

        PageStream::new(
            per_page,
            None,
            Box::new(move |page, per_page| {
                let client = client.clone();
                let path = path.clone();
                let mut query = query.clone();
                Box::pin(async move {
                    query.push(("page".to_string(), page.to_string()));
                    query.push(("per_page".to_string(), per_page.to_string()));

                    let raw: Vec<serde_json::Value> =
                        client.inner.get_with_query(&path, &query).await?;
                    tracing::debug!(path = %path, page, count = raw.len(), "fetched page");

                    let mut items = Vec::with_capacity(raw.len());
                    for value in raw {
                        let mut item: T = models::decode(value)?;
                        item.bind(&client);
                        items.push(item);
                    }
                    Ok(items)
                })
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;

    /// A stream over in-memory pages, recording which pages were
    /// requested.
    fn counted_stream(
        total: usize,
        per_page: usize,
    ) -> (PageStream<usize>, std::sync::Arc<std::sync::Mutex<Vec<usize>>>) {
        let fetched = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = fetched.clone();
        let stream = PageStream::new(
            per_page,
            None,
            Box::new(move |page, per_page| {
                log.lock().unwrap().push(page);
                let start = (page - 1) * per_page;
                let items: Vec<usize> = (start..total.min(start + per_page)).collect();
                Box::pin(async move { Ok(items) })
            }),
        );
        (stream, fetched)
    }

    #[tokio::test]
    async fn test_yields_all_items_in_order() {
        let (stream, fetched) = counted_stream(5, 2);
        let items: Vec<usize> = stream.try_collect().await.unwrap();
        assert_eq!(items, vec![0, 1, 2, 3, 4]);
        // Final short page ends iteration; no empty-page probe needed
        assert_eq!(*fetched.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_exact_page_boundary_probes_once_more() {
        let (stream, fetched) = counted_stream(4, 2);
        let items: Vec<usize> = stream.try_collect().await.unwrap();
        assert_eq!(items, vec![0, 1, 2, 3]);
        // Full final page forces one empty-page probe
        assert_eq!(*fetched.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_limit_stops_fetching() {
        let (stream, fetched) = counted_stream(100, 2);
        let items: Vec<usize> = stream.with_limit(3).try_collect().await.unwrap();
        assert_eq!(items, vec![0, 1, 2]);
        // Cap satisfied one item into page 2; page 3 never requested
        assert_eq!(*fetched.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_zero_limit_fetches_nothing() {
        let (stream, fetched) = counted_stream(100, 2);
        let items: Vec<usize> = stream.with_limit(0).try_collect().await.unwrap();
        assert!(items.is_empty());
        assert!(fetched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let (stream, fetched) = counted_stream(0, 2);
        let items: Vec<usize> = stream.try_collect().await.unwrap();
        assert!(items.is_empty());
        assert_eq!(*fetched.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_set_limit_after_start_is_usage_error() {
        let (mut stream, _) = counted_stream(10, 2);
        assert!(stream.set_limit(Some(5)).is_ok());

        let first = stream.try_next().await.unwrap();
        assert_eq!(first, Some(0));
        assert!(matches!(stream.set_limit(Some(1)), Err(Error::Usage(_))));
    }

    #[tokio::test]
    async fn test_stream_is_terminal_after_end() {
        let (mut stream, fetched) = counted_stream(3, 2);
        let items: Vec<usize> = (&mut stream).try_collect().await.unwrap();
        assert_eq!(items.len(), 3);

        let after = stream.try_next().await.unwrap();
        assert_eq!(after, None);
        // No page was re-fetched by polling past the end
        assert_eq!(*fetched.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_error_ends_the_stream() {
        let calls = std::sync::Arc::new(std::sync::Mutex::new(0usize));
        let log = calls.clone();
        let mut stream: PageStream<usize> = PageStream::new(
            2,
            None,
            Box::new(move |page, _| {
                *log.lock().unwrap() += 1;
                Box::pin(async move {
                    if page == 1 {
                        Ok(vec![1, 2])
                    } else {
                        Err(Error::Validation("bad page".into()))
                    }
                })
            }),
        );

        assert_eq!(stream.try_next().await.unwrap(), Some(1));
        assert_eq!(stream.try_next().await.unwrap(), Some(2));
        assert!(stream.try_next().await.is_err());
        // Terminal after the error, without further fetches
        assert_eq!(stream.try_next().await.unwrap(), None);
        assert_eq!(*calls.lock().unwrap(), 2);
    }
}
