//! Read-through memoization of async functions behind a key/value cache store.
//!
//! [`Memoize`] derives a key from the caller's identity and arguments, serves
//! hits from the store, and on a miss runs the function and stores its JSON
//! result with a `max-age` equal to the configured ttl. The store itself is
//! injected through the [`CacheStorage`] port; expiry is left to it.
//!
//! ```ignore
//! let memo = Memoize::new(storage, MemoizeOptions::new().with_ttl(TtlSecs(60)));
//! let find_user = memo.wrap("Users", "find", |(id,): (u32,)| repo.find(id));
//! let user = find_user.call((7,)).await?;
//! ```

pub mod domain;
pub mod interceptor;
pub mod key;
pub mod options;
pub mod ports;
pub mod stats;

pub use domain::{CacheKey, StoredEntry};
pub use interceptor::{Memoize, Memoized};
pub use key::{ArgumentList, Invocation, KeyGenerator, RESERVED_AUTHORITY, UrlKeyGenerator};
pub use options::{FallbackPolicy, MemoizeOptions};
pub use ports::{CachePartition, CacheStorage};
pub use stats::MemoStats;
