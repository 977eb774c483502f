//! Bounded key-value cache with FIFO eviction and durable persistence.
//!
//! Every mutation rewrites the whole cache to disk before returning. The
//! rewrite goes to a sibling temporary file which is then renamed over the
//! cache file, so readers only ever see the previous or the new state.

mod error;
mod fifo;

pub use error::{CacheError, Result};
pub use fifo::PersistentFifoCache;
