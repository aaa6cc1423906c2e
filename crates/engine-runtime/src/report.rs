use model::core::{log_type::LogType, timestamp::Timestamp, window::TimeWindow};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub log_type: LogType,
    pub window: TimeWindow,
    pub pages: usize,
    pub records_written: usize,
    /// Records requested twice because they sat on a page boundary.
    pub boundary_ties: usize,
}

/// Summary of one pull run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    /// Request end-time of the run; this is what gets persisted.
    pub end: Timestamp,
    pub items: Vec<ItemReport>,
}

impl RunReport {
    pub fn new(run_id: String, end: Timestamp) -> Self {
        RunReport {
            run_id,
            end,
            items: Vec::new(),
        }
    }

    pub fn total_records(&self) -> usize {
        self.items.iter().map(|i| i.records_written).sum()
    }
}
