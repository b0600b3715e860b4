use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("No race slugs found on {url}; the season page structure may have changed")]
    NoCandidates { url: String },

    #[error("Could not determine the latest race for {year} ({candidates} candidates probed)")]
    NoLatestRace { year: u16, candidates: usize },

    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("HTML parsing error: {message}")]
    Parse { message: String },

    #[error("Data processing error: {message}")]
    Processing { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Site,
    Parsing,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HarvestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HarvestError::Http(_) => ErrorCategory::Network,
            HarvestError::HttpStatus { .. }
            | HarvestError::NoCandidates { .. }
            | HarvestError::NoLatestRace { .. } => ErrorCategory::Site,
            HarvestError::Parse { .. } | HarvestError::Processing { .. } => ErrorCategory::Parsing,
            HarvestError::Xlsx(_) | HarvestError::Io(_) => ErrorCategory::Output,
            HarvestError::Config { .. } | HarvestError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Site => ErrorSeverity::Critical,
            ErrorCategory::Parsing => ErrorSeverity::Medium,
            ErrorCategory::Output | ErrorCategory::Configuration => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HarvestError::Http(_) => "Check the network connection and that the site is reachable",
            HarvestError::HttpStatus { .. } => {
                "Verify --base-url and --year; the season anchor page may not exist yet"
            }
            HarvestError::NoCandidates { .. } => {
                "Inspect the anchor page links; the site layout may have changed"
            }
            HarvestError::NoLatestRace { .. } => {
                "Every results page failed to answer; retry later or pick another year"
            }
            HarvestError::Xlsx(_) | HarvestError::Io(_) => {
                "Check that the output directory exists and is writable"
            }
            HarvestError::Config { .. } | HarvestError::InvalidConfigValue { .. } => {
                "Fix the configuration file or command line flags"
            }
            HarvestError::Parse { .. } | HarvestError::Processing { .. } => {
                "Re-run with --verbose and inspect the offending page"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Site => format!("Site problem: {}", self),
            ErrorCategory::Parsing => format!("Could not read page content: {}", self),
            ErrorCategory::Output => format!("Could not save the workbook: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }

    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
