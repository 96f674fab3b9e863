//! Backend trait for answering financials queries.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::Result, types::QueryRequest, view::ResultView};

/// A service that answers financials queries.
///
/// Implementations perform exactly one attempt per call: no retries, no
/// timeout beyond the transport's own, no caching.
#[async_trait]
pub trait FinancialsBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "HTTP").
    fn name(&self) -> &str;

    /// Submits a query and parses the answer into a [`ResultView`].
    ///
    /// Non-success answers become [`FormError::Server`](crate::FormError::Server)
    /// carrying the server's `detail`, transport failures become
    /// [`FormError::Network`](crate::FormError::Network) and unparsable
    /// bodies [`FormError::Parse`](crate::FormError::Parse).
    async fn query(&self, request: &QueryRequest) -> Result<ResultView>;

    /// Fetches the export behind a download link target.
    ///
    /// `href` is the [`ResultView::file_url`] value and may be relative.
    async fn download(&self, href: &str) -> Result<Vec<u8>>;
}
