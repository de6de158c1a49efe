//! Wire protocol between the coordinator and render workers.

pub mod codec;
pub mod messages;
pub mod worker_id;
