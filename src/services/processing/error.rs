use thiserror::Error;

/// Terminal failures of a timetable import.
///
/// Each variant names the stage that gave up and the search window it used,
/// so the caller can tell the uploader what to fix in the file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("Workbook could not be read: {0}")]
    Workbook(String),

    #[error("Workbook has no worksheet to use for shift '{shift}'")]
    SheetNotFound { shift: String },

    #[error(
        "No row naming at least {min_classes} classes was found in the first {rows_scanned} rows"
    )]
    HeaderNotFound {
        rows_scanned: usize,
        min_classes: usize,
    },

    #[error(
        "No weekday label was found in the first {columns_scanned} columns of {rows_scanned} rows"
    )]
    DayBlockNotFound {
        rows_scanned: usize,
        columns_scanned: usize,
    },

    #[error("Layout was recognised ({classes} classes, {days} days) but no lessons were extracted")]
    EmptyResult { classes: usize, days: usize },
}

impl ImportError {
    /// Pipeline stage the import stopped at
    pub fn stage(&self) -> &'static str {
        match self {
            ImportError::Workbook(_) => "workbook",
            ImportError::SheetNotFound { .. } => "sheet_selection",
            ImportError::HeaderNotFound { .. } => "class_header",
            ImportError::DayBlockNotFound { .. } => "day_blocks",
            ImportError::EmptyResult { .. } => "extraction",
        }
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::Workbook(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_search_window() {
        let err = ImportError::HeaderNotFound {
            rows_scanned: 15,
            min_classes: 2,
        };
        assert_eq!(
            err.to_string(),
            "No row naming at least 2 classes was found in the first 15 rows"
        );
        assert_eq!(err.stage(), "class_header");

        let err = ImportError::DayBlockNotFound {
            rows_scanned: 40,
            columns_scanned: 5,
        };
        assert!(err.to_string().contains("first 5 columns of 40 rows"));
        assert_eq!(err.stage(), "day_blocks");
    }
}
