pub mod collector;
pub mod error;
pub mod fanout;
pub mod http;
pub mod memory;
pub mod merge;
pub mod nodes;
pub mod schema;
pub mod types;

pub use collector::GpuCollector;
pub use error::PromError;
pub use http::HttpQueryClient;
pub use memory::StaticQueryApi;
pub use schema::GpuQuery;
pub use types::{QueryApi, QueryData, QueryResponse, Sample, SampleValue};
