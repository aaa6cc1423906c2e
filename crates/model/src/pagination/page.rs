use crate::records::record::LogRecord;

/// One response's worth of records, newest first, plus the continuation flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    pub records: Vec<LogRecord>,
    pub has_more: bool,
}

impl PageResult {
    pub fn new(records: Vec<LogRecord>, has_more: bool) -> Self {
        PageResult { records, has_more }
    }

    /// A page after which the API has nothing older to return.
    pub fn last(records: Vec<LogRecord>) -> Self {
        PageResult::new(records, false)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
