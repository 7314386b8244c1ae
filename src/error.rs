/// Exit code for CLI/input problems (missing file, unreadable CSV, bad prompt input).
pub const EXIT_INPUT: u8 = 2;
/// Exit code for fatal table content errors.
pub const EXIT_TABLE: u8 = 3;
/// Exit code for failures while writing outputs.
pub const EXIT_OUTPUT: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Which parameter-table field a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableField {
    Low,
    High,
    Nonlinearity,
}

impl TableField {
    pub fn label(self) -> &'static str {
        match self {
            TableField::Low => "low threshold (lt)",
            TableField::High => "high threshold (ht)",
            TableField::Nonlinearity => "nonlinear indicator",
        }
    }
}

/// Fatal errors: any of these aborts the run before output is written.
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// A value that must be numeric did not parse as a finite number.
    NonNumericValue {
        line: usize,
        field: TableField,
        text: String,
    },
    /// One threshold is a ranging value (`a:b`) and the other is not.
    ShapeMismatch {
        line: usize,
        low: String,
        high: String,
    },
    /// Fewer than two members requested.
    DegeneratePopulation { size: usize },
}

impl TableError {
    pub fn exit_code(&self) -> u8 {
        match self {
            TableError::DegeneratePopulation { .. } => EXIT_INPUT,
            TableError::NonNumericValue { .. } | TableError::ShapeMismatch { .. } => EXIT_TABLE,
        }
    }
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::NonNumericValue { line, field, text } => write!(
                f,
                "line {line}: {} '{text}' is not a finite number",
                field.label()
            ),
            TableError::ShapeMismatch { line, low, high } => {
                let (ranging, scalar) = if low.contains(':') {
                    ("low threshold (lt)", "high threshold (ht)")
                } else {
                    ("high threshold (ht)", "low threshold (lt)")
                };
                write!(
                    f,
                    "line {line}: {ranging} is ranging but {scalar} is not (lt='{low}', ht='{high}')"
                )
            }
            TableError::DegeneratePopulation { size } => write!(
                f,
                "number of cells must be at least 2 (got {size}); cell 0 takes lt and the last cell takes ht"
            ),
        }
    }
}

impl std::error::Error for TableError {}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}
