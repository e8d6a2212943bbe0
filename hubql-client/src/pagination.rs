//! # Cursor Pagination
//!
//! List operations return a [`PageStream`]: a lazy, forward-only sequence
//! that fetches one page per request, hands out its items one at a time and
//! asks for the next page only once the current one is drained.
//!
//! The stream is generic over a [`PageSource`], the page-fetch half. GraphQL
//! connections are served by [`ConnectionSource`]; any other source (a test
//! double, a REST endpoint) only has to return [`Page`]s.

use std::collections::VecDeque;
use std::future::Future;
use std::marker::PhantomData;

use futures_util::Stream;
use futures_util::stream;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::client::GitHubClient;
use crate::error::Result;
use crate::graphql::{self, GraphQlRequest};

/// Cursor information GitHub returns with every page
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
  pub has_next_page: bool,
  pub end_cursor: Option<String>,
}

/// One page of items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub page_info: PageInfo,
  pub total_count: Option<u64>,
}

impl<T> Page<T> {
  /// A page with no items and no successor
  pub fn empty() -> Self {
    Self {
      items: Vec::new(),
      page_info: PageInfo::default(),
      total_count: None,
    }
  }
}

/// GitHub's connection shape: `{ nodes, pageInfo, totalCount }`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Connection<T> {
  #[serde(default)]
  nodes: Vec<Option<T>>,
  page_info: PageInfo,
  total_count: Option<u64>,
}

impl<T> From<Connection<T>> for Page<T> {
  fn from(connection: Connection<T>) -> Self {
    Self {
      items: connection.nodes.into_iter().flatten().collect(),
      page_info: connection.page_info,
      total_count: connection.total_count,
    }
  }
}

/// Fetches a page given the cursor of the previous one
pub trait PageSource {
  type Item;

  /// Fetch the page after `after`; `None` requests the first page
  fn fetch(&mut self, after: Option<String>) -> impl Future<Output = Result<Page<Self::Item>>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
  /// Nothing fetched yet
  Start,
  /// A page is buffered; `has_next_page` says whether another one may follow
  Buffered { has_next_page: bool },
  /// The last page has been drained
  Exhausted,
  /// A fetch failed; the stream yields nothing further
  Failed,
}

/// Lazy sequence of items spread over server-side pages
#[derive(Debug)]
pub struct PageStream<S: PageSource> {
  source: S,
  buffer: VecDeque<S::Item>,
  cursor: Option<String>,
  state: StreamState,
  pages_fetched: usize,
  total_count: Option<u64>,
}

impl<S: PageSource> PageStream<S> {
  pub fn new(source: S) -> Self {
    Self {
      source,
      buffer: VecDeque::new(),
      cursor: None,
      state: StreamState::Start,
      pages_fetched: 0,
      total_count: None,
    }
  }

  /// Pull the next item, fetching a page when the buffer is empty.
  ///
  /// Returns `Ok(None)` once the last page is drained. A failed fetch is
  /// returned as `Err` and leaves the buffer and cursor untouched; the stream
  /// is then finished and every later pull returns `Ok(None)`.
  pub async fn try_next(&mut self) -> Result<Option<S::Item>> {
    loop {
      if let Some(item) = self.buffer.pop_front() {
        return Ok(Some(item));
      }

      match self.state {
        StreamState::Exhausted | StreamState::Failed => return Ok(None),
        StreamState::Buffered { has_next_page: false } => {
          self.state = StreamState::Exhausted;
          return Ok(None);
        }
        StreamState::Start | StreamState::Buffered { has_next_page: true } => {}
      }

      let page = match self.source.fetch(self.cursor.clone()).await {
        Ok(page) => page,
        Err(e) => {
          debug!("Page fetch failed after {} pages: {}", self.pages_fetched, e);
          self.state = StreamState::Failed;
          return Err(e);
        }
      };
      self.accept(page);
    }
  }

  fn accept(&mut self, page: Page<S::Item>) {
    self.pages_fetched += 1;
    if page.total_count.is_some() {
      self.total_count = page.total_count;
    }

    let PageInfo {
      has_next_page,
      end_cursor,
    } = page.page_info;

    let has_next_page = match (has_next_page, end_cursor) {
      (false, _) => false,
      (true, None) => {
        warn!("Page {} reports a next page without a cursor; stopping", self.pages_fetched);
        false
      }
      (true, Some(cursor)) if self.cursor.as_deref() == Some(cursor.as_str()) => {
        warn!("Page {} repeats cursor {}; stopping", self.pages_fetched, cursor);
        false
      }
      (true, Some(cursor)) => {
        self.cursor = Some(cursor);
        true
      }
    };

    debug!(
      "Fetched page {} with {} items (has_next_page: {})",
      self.pages_fetched,
      page.items.len(),
      has_next_page
    );
    self.buffer = page.items.into();
    self.state = StreamState::Buffered { has_next_page };
  }

  /// Drain every remaining item, stopping at the first error
  pub async fn collect_all(mut self) -> Result<Vec<S::Item>> {
    let mut items = Vec::new();
    while let Some(item) = self.try_next().await? {
      items.push(item);
    }
    Ok(items)
  }

  /// Adapt into a [`Stream`] of results; the stream ends after an error
  pub fn into_stream(self) -> impl Stream<Item = Result<S::Item>> {
    stream::unfold(self, |mut pages| async move {
      match pages.try_next().await {
        Ok(Some(item)) => Some((Ok(item), pages)),
        Ok(None) => None,
        Err(e) => Some((Err(e), pages)),
      }
    })
  }

  /// Whether no further item will be yielded
  pub fn is_terminated(&self) -> bool {
    self.buffer.is_empty()
      && matches!(
        self.state,
        StreamState::Exhausted | StreamState::Failed | StreamState::Buffered { has_next_page: false }
      )
  }

  pub fn pages_fetched(&self) -> usize {
    self.pages_fetched
  }

  /// Total item count the server last reported, if the connection has one
  pub fn total_count(&self) -> Option<u64> {
    self.total_count
  }
}

/// Page source over a GraphQL connection.
///
/// The document must declare `$first: Int!` and `$after: String` and pass
/// them to the connection found at `path`.
#[derive(Debug)]
pub struct ConnectionSource<'c, T> {
  client: &'c GitHubClient,
  query: String,
  variables: Map<String, Value>,
  path: Vec<&'static str>,
  _item: PhantomData<fn() -> T>,
}

impl<'c, T> ConnectionSource<'c, T> {
  pub(crate) fn new(client: &'c GitHubClient, request: GraphQlRequest, path: Vec<&'static str>) -> Self {
    Self {
      client,
      query: request.query,
      variables: request.variables,
      path,
      _item: PhantomData,
    }
  }
}

impl<T: DeserializeOwned + Send> PageSource for ConnectionSource<'_, T> {
  type Item = T;

  async fn fetch(&mut self, after: Option<String>) -> Result<Page<T>> {
    let mut request = GraphQlRequest {
      query: self.query.clone(),
      variables: self.variables.clone(),
    }
    .var("first", self.client.page_size);
    request = request.var("after", after.map_or(Value::Null, Value::String));

    // A parent GitHub cannot resolve reads as an empty, final page
    let data = self.client.execute_lookup(&request).await?;
    let page = graphql::decode::<Connection<T>>(&data, &self.path)?
      .map(Page::from)
      .unwrap_or_else(Page::empty);
    Ok(page)
  }
}

/// Stream returned by every list operation
pub type Paginated<'c, T> = PageStream<ConnectionSource<'c, T>>;

impl GitHubClient {
  /// Build a lazy stream over the connection at `path`
  pub(crate) fn paginate<T: DeserializeOwned + Send>(&self, request: GraphQlRequest, path: Vec<&'static str>) -> Paginated<'_, T> {
    PageStream::new(ConnectionSource::new(self, request, path))
  }
}

#[cfg(test)]
mod tests {
  use std::collections::VecDeque;
  use std::sync::Arc;
  use std::sync::atomic::{AtomicUsize, Ordering};

  use futures_util::StreamExt;
  use reqwest::StatusCode;

  use super::*;
  use crate::error::Error;

  /// Serves a fixed script of pages and records the cursors it was asked for
  struct ScriptedSource {
    pages: VecDeque<Result<Page<u32>>>,
    requested: Vec<Option<String>>,
    calls: Arc<AtomicUsize>,
  }

  impl ScriptedSource {
    fn new(pages: Vec<Result<Page<u32>>>) -> (Self, Arc<AtomicUsize>) {
      let calls = Arc::new(AtomicUsize::new(0));
      let source = Self {
        pages: pages.into(),
        requested: Vec::new(),
        calls: Arc::clone(&calls),
      };
      (source, calls)
    }
  }

  impl PageSource for ScriptedSource {
    type Item = u32;

    async fn fetch(&mut self, after: Option<String>) -> Result<Page<u32>> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.requested.push(after);
      self.pages.pop_front().unwrap_or_else(|| panic!("unexpected page request"))
    }
  }

  fn page(items: &[u32], next: Option<&str>) -> Result<Page<u32>> {
    Ok(Page {
      items: items.to_vec(),
      page_info: PageInfo {
        has_next_page: next.is_some(),
        end_cursor: next.map(str::to_string),
      },
      total_count: Some(7),
    })
  }

  fn server_error() -> Result<Page<u32>> {
    Err(Error::Status {
      status: StatusCode::BAD_GATEWAY,
      body: "bad gateway".to_string(),
    })
  }

  #[tokio::test]
  async fn test_yields_all_pages_in_order() -> anyhow::Result<()> {
    let (source, calls) = ScriptedSource::new(vec![
      page(&[1, 2, 3], Some("c1")),
      page(&[4, 5], Some("c2")),
      page(&[6, 7], None),
    ]);
    let mut stream = PageStream::new(source);

    let mut seen = Vec::new();
    while let Some(item) = stream.try_next().await? {
      seen.push(item);
    }

    assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(stream.pages_fetched(), 3);
    assert_eq!(stream.total_count(), Some(7));
    assert_eq!(
      stream.source.requested,
      vec![None, Some("c1".to_string()), Some("c2".to_string())]
    );

    // Terminal: further pulls never request again
    assert!(stream.is_terminated());
    assert_eq!(stream.try_next().await?, None);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    Ok(())
  }

  #[tokio::test]
  async fn test_fetches_lazily() -> anyhow::Result<()> {
    let (source, calls) = ScriptedSource::new(vec![page(&[1, 2], Some("c1")), page(&[3], None)]);
    let mut stream = PageStream::new(source);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(stream.try_next().await?, Some(1));
    assert_eq!(stream.try_next().await?, Some(2));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(stream.try_next().await?, Some(3));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    Ok(())
  }

  #[tokio::test]
  async fn test_empty_first_page() -> anyhow::Result<()> {
    let (source, calls) = ScriptedSource::new(vec![page(&[], None)]);
    let stream = PageStream::new(source);

    let items = stream.collect_all().await?;
    assert!(items.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    Ok(())
  }

  #[tokio::test]
  async fn test_empty_middle_page_is_skipped() -> anyhow::Result<()> {
    let (source, _) = ScriptedSource::new(vec![
      page(&[1], Some("c1")),
      page(&[], Some("c2")),
      page(&[2], None),
    ]);

    assert_eq!(PageStream::new(source).collect_all().await?, vec![1, 2]);
    Ok(())
  }

  #[tokio::test]
  async fn test_mid_sequence_error_ends_stream() -> anyhow::Result<()> {
    let (source, calls) = ScriptedSource::new(vec![page(&[1, 2], Some("c1")), server_error(), page(&[3], None)]);
    let mut stream = PageStream::new(source);

    assert_eq!(stream.try_next().await?, Some(1));
    assert_eq!(stream.try_next().await?, Some(2));

    let err = stream.try_next().await.unwrap_err();
    assert!(err.is_transport());
    assert!(stream.is_terminated());
    assert_eq!(stream.cursor.as_deref(), Some("c1"));

    assert_eq!(stream.try_next().await?, None);
    assert_eq!(stream.try_next().await?, None);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    Ok(())
  }

  #[tokio::test]
  async fn test_collect_all_propagates_error() {
    let (source, _) = ScriptedSource::new(vec![page(&[1], Some("c1")), server_error()]);
    let result = PageStream::new(source).collect_all().await;
    assert!(matches!(result, Err(Error::Status { .. })));
  }

  #[tokio::test]
  async fn test_missing_cursor_stops() -> anyhow::Result<()> {
    let (source, calls) = ScriptedSource::new(vec![Ok(Page {
      items: vec![1],
      page_info: PageInfo {
        has_next_page: true,
        end_cursor: None,
      },
      total_count: None,
    })]);

    assert_eq!(PageStream::new(source).collect_all().await?, vec![1]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
  }

  #[tokio::test]
  async fn test_repeated_cursor_stops() -> anyhow::Result<()> {
    let (source, calls) = ScriptedSource::new(vec![page(&[1], Some("same")), page(&[2], Some("same"))]);

    assert_eq!(PageStream::new(source).collect_all().await?, vec![1, 2]);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    Ok(())
  }

  #[tokio::test]
  async fn test_into_stream() -> anyhow::Result<()> {
    let (source, _) = ScriptedSource::new(vec![page(&[1, 2], Some("c1")), server_error()]);
    let results: Vec<Result<u32>> = PageStream::new(source).into_stream().collect().await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().ok(), Some(&1));
    assert_eq!(results[1].as_ref().ok(), Some(&2));
    assert!(results[2].is_err());
    Ok(())
  }

  #[test]
  fn test_connection_into_page_drops_null_nodes() {
    let connection: Connection<u32> = serde_json::from_value(serde_json::json!({
      "nodes": [1, null, 2],
      "pageInfo": { "hasNextPage": true, "endCursor": "Y3Vyc29y" },
      "totalCount": 3
    }))
    .unwrap();

    let page = Page::from(connection);
    assert_eq!(page.items, vec![1, 2]);
    assert!(page.page_info.has_next_page);
    assert_eq!(page.page_info.end_cursor.as_deref(), Some("Y3Vyc29y"));
    assert_eq!(page.total_count, Some(3));
  }
}
