//! Auto-pagination
//!
//! List endpoints answer with a [`Paginated`] envelope carrying a `next`
//! link. The collectors below follow those links until the last page, or until
//! the caller's maximum is reached.

use crate::client::Client;
use crate::error::SdkResult;
use crate::models::Paginated;
use crate::query::QueryParams;
use crate::request::{GetOptions, Request};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Options of a paginated collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectOptions {
    /// Upper bound on the number of items returned
    ///
    /// A value below 1 yields no items and no request.
    pub max: Option<i64>,

    /// Options applied to every page request
    pub get: GetOptions,
}

impl CollectOptions {
    /// Collect every item
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after `max` items
    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    /// Options applied to every page request
    pub fn get_options(mut self, options: GetOptions) -> Self {
        self.get = options;
        self
    }
}

impl From<GetOptions> for CollectOptions {
    fn from(get: GetOptions) -> Self {
        Self { max: None, get }
    }
}

impl Client {
    /// Fetch every item of a paginated endpoint, in page order
    pub async fn collect_all<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
        options: &CollectOptions,
    ) -> SdkResult<Vec<T>> {
        self.collect_all_mapped(path, params, options, |item: T| item)
            .await
    }

    /// Fetch every item of a paginated endpoint, transforming each one with
    /// `map` as its page arrives
    ///
    /// Any failing page aborts the whole collection.
    pub async fn collect_all_mapped<T, S, F>(
        &self,
        path: &str,
        params: &QueryParams,
        options: &CollectOptions,
        mut map: F,
    ) -> SdkResult<Vec<S>>
    where
        T: DeserializeOwned,
        F: FnMut(T) -> S,
    {
        let limit = match options.max {
            Some(max) if max < 1 => return Ok(Vec::new()),
            Some(max) => Some(usize::try_from(max).unwrap_or(usize::MAX)),
            None => None,
        };

        let mut items = Vec::new();
        let mut page: Paginated<T> = self.get(path, params, &options.get).await?;
        let mut pages = 1usize;

        loop {
            let next = page.next_link().map(str::to_string);
            items.extend(page.data.into_iter().map(&mut map));

            if let Some(limit) = limit {
                if items.len() >= limit {
                    items.truncate(limit);
                    break;
                }
            }

            let Some(uri) = next else {
                break;
            };

            let request = Request::get(uri)
                .headers(options.get.request_headers())
                .log(options.get.log);
            page = self.dispatch(request).await?;
            pages += 1;
        }

        debug!(path = path, pages = pages, items = items.len(), "Collected paginated results");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_options() {
        let options = CollectOptions::new().max(10);
        assert_eq!(options.max, Some(10));
        assert!(options.get.log);

        let options: CollectOptions = GetOptions::new().cache_bust(true).into();
        assert_eq!(options.max, None);
        assert!(options.get.cache_bust);
    }
}
