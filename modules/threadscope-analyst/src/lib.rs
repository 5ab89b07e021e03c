pub mod error;
pub mod extractor;
pub mod parser;
pub mod pipeline;
pub mod presenter;
pub mod prompter;
pub mod render;
pub mod schema;
pub mod stats;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::ExtractionError;
pub use extractor::Extractor;
pub use parser::{parse_response, Entry, ExtractionResult, FieldValue};
pub use pipeline::{AnalysisPipeline, AnalysisReport};
pub use presenter::{present, GroupStat, PresentedTable, PriceStats};
pub use schema::{AnalysisMode, ExtractionSchema, FieldType, SchemaField};
pub use stats::RunStats;
