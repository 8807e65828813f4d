pub mod column_analysis;
pub mod elementary;
pub mod header_detection;

pub use column_analysis::{ColumnAnalysisService, DEFAULT_CONTEXT_WINDOW, MAX_SAMPLE_VALUES};
pub use elementary::{infer_cell_type, infer_record_type};
pub use header_detection::{HeaderDetection, HeaderRegion, detect_headers};
