use std::fmt;
use std::string::FromUtf8Error;

use crate::model::{EventId, MonthKey};

/// A trace container that cannot be exported or summarized as-is
#[derive(Debug, Clone, PartialEq)]
pub enum TraceError {
    /// Row at `position` claims to be month `index`
    RowIndexOutOfOrder { position: usize, index: usize },
    DuplicateMonth(MonthKey),
    /// A per-month dictionary has an entry for a month with no row
    UnknownMonth {
        table: &'static str,
        month: MonthKey,
    },
    EventMonthMissing { event_id: EventId, month: MonthKey },
    SummaryMismatch {
        summary_months: usize,
        row_count: usize,
    },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::RowIndexOutOfOrder { position, index } => {
                write!(f, "row at position {position} has index {index}")
            }
            TraceError::DuplicateMonth(month) => write!(f, "month {month} appears more than once"),
            TraceError::UnknownMonth { table, month } => {
                write!(f, "{table} has an entry for {month}, which has no row")
            }
            TraceError::EventMonthMissing { event_id, month } => {
                write!(f, "event {event_id} refers to {month}, which has no row")
            }
            TraceError::SummaryMismatch {
                summary_months,
                row_count,
            } => write!(
                f,
                "summary covers {summary_months} months but the trace has {row_count} rows"
            ),
        }
    }
}

impl std::error::Error for TraceError {}

/// Errors raised while rendering export documents
#[derive(Debug)]
pub enum ExportError {
    InvalidTrace(TraceError),
    Csv(csv::Error),
    Json(serde_json::Error),
    Utf8(FromUtf8Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::InvalidTrace(e) => write!(f, "refusing to export: {e}"),
            ExportError::Csv(e) => write!(f, "csv rendering failed: {e}"),
            ExportError::Json(e) => write!(f, "json rendering failed: {e}"),
            ExportError::Utf8(e) => write!(f, "export produced invalid utf-8: {e}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::InvalidTrace(e) => Some(e),
            ExportError::Csv(e) => Some(e),
            ExportError::Json(e) => Some(e),
            ExportError::Utf8(e) => Some(e),
        }
    }
}

impl From<TraceError> for ExportError {
    fn from(err: TraceError) -> Self {
        ExportError::InvalidTrace(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Json(err)
    }
}

impl From<FromUtf8Error> for ExportError {
    fn from(err: FromUtf8Error) -> Self {
        ExportError::Utf8(err)
    }
}
