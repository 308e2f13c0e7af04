use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty acceptance table, bad threshold, etc.).
    ConfigValidation(String),
    /// Missing required column in an input file.
    MissingColumn { file: String, column: String },
    /// Date parse error in a repository file.
    DateParse { file: String, row: usize, value: String },
    /// Numeric parse error (id or quantity) in a repository file.
    NumberParse { file: String, row: usize, value: String },
    /// IO error (file read, malformed CSV record, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { file, column } => {
                write!(f, "{file}: missing column '{column}'")
            }
            Self::DateParse { file, row, value } => {
                write!(f, "{file}, row {row}: cannot parse date '{value}'")
            }
            Self::NumberParse { file, row, value } => {
                write!(f, "{file}, row {row}: cannot parse number '{value}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
