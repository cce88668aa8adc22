pub mod batch;
pub mod pool;

pub use batch::{calculate_many, summarize, HistorySummary};
pub use pool::WorkerPool;
