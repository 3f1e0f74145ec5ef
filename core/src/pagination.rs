//! Page-by-page iteration over paginated endpoints.

use std::marker::PhantomData;

use crate::error::Result;
use crate::types::Page;

/// Iterator that fetches successive pages with `limit`/`offset` parameters.
///
/// The offset advances by the number of items each page returned. Iteration
/// stops after the last page, after an empty page, or after yielding the
/// first error.
///
/// # Example
///
/// ```no_run
/// use ulule_core::{Credentials, UluleClient};
///
/// # fn example() -> ulule_core::Result<()> {
/// let client = UluleClient::new(Credentials::access_token("token"));
/// for page in client.project_supporter_pages(31458, 50) {
///     for supporter in page?.items {
///         println!("{:?}", supporter.username);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct PageIter<T, F> {
    fetch: F,
    limit: u32,
    offset: u32,
    done: bool,
    _item: PhantomData<fn() -> T>,
}

impl<T, F> PageIter<T, F>
where
    F: FnMut(u32, u32) -> Result<Page<T>>,
{
    /// `fetch` receives `(limit, offset)` for each page.
    pub fn new(limit: u32, fetch: F) -> Self {
        Self {
            fetch,
            limit,
            offset: 0,
            done: false,
            _item: PhantomData,
        }
    }
}

impl<T, F> Iterator for PageIter<T, F>
where
    F: FnMut(u32, u32) -> Result<Page<T>>,
{
    type Item = Result<Page<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match (self.fetch)(self.limit, self.offset) {
            Ok(page) => {
                let fetched = u32::try_from(page.items.len()).unwrap_or(u32::MAX);
                self.offset = self.offset.saturating_add(fetched);
                self.done = page.last_page || page.items.is_empty();
                Some(Ok(page))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
