//! Work dispatch adapters.
//!
//! - `InlineDispatcher` - processes in the caller's task
//! - `RedisQueueDispatcher` / `RedisQueueWorker` - deferred processing over a Redis list

mod inline;
mod redis_queue;

pub use inline::InlineDispatcher;
pub use redis_queue::{decode_job, encode_job, RedisQueueDispatcher, RedisQueueWorker};
