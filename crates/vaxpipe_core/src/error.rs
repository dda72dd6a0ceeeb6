use std::fmt;

/// Malformed triangular-distribution bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidRangeError {
    pub low: f64,
    pub likely: f64,
    pub high: f64,
}

impl fmt::Display for InvalidRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid triangular range (low={}, likely={}, high={}): requires low <= likely <= high",
            self.low, self.likely, self.high
        )
    }
}

impl std::error::Error for InvalidRangeError {}

/// A single configuration problem found during eager validation
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidConfigurationError {
    OutOfRange {
        parameter: String,
        value: f64,
        min: f64,
        max: f64,
    },
    BadTriangle {
        parameter: String,
        low: f64,
        likely: f64,
        high: f64,
    },
    EmptyRegistry,
    DuplicateVaccineId {
        id: u32,
    },
}

impl fmt::Display for InvalidConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidConfigurationError::OutOfRange {
                parameter,
                value,
                min,
                max,
            } => {
                write!(f, "{parameter} = {value} outside [{min}, {max}]")
            }
            InvalidConfigurationError::BadTriangle {
                parameter,
                low,
                likely,
                high,
            } => {
                write!(
                    f,
                    "{parameter} bounds ({low}, {likely}, {high}) need low <= likely <= high"
                )
            }
            InvalidConfigurationError::EmptyRegistry => {
                write!(f, "vaccine registry is empty")
            }
            InvalidConfigurationError::DuplicateVaccineId { id } => {
                write!(f, "vaccine id {id} appears more than once in the registry")
            }
        }
    }
}

impl std::error::Error for InvalidConfigurationError {}

/// Every configuration problem found before the first run
///
/// Validation does not stop at the first violation; the whole list is
/// reported so a bad parameter file can be fixed in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigProblems {
    pub problems: Vec<InvalidConfigurationError>,
}

impl fmt::Display for ConfigProblems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} configuration problem(s): ", self.problems.len())?;
        for (i, p) in self.problems.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigProblems {}

impl From<InvalidConfigurationError> for ConfigProblems {
    fn from(e: InvalidConfigurationError) -> Self {
        ConfigProblems { problems: vec![e] }
    }
}

/// Top-level error for the forecast entry points
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    Config(ConfigProblems),
    Range(InvalidRangeError),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Config(e) => write!(f, "{e}"),
            ModelError::Range(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Config(e) => Some(e),
            ModelError::Range(e) => Some(e),
        }
    }
}

impl From<ConfigProblems> for ModelError {
    fn from(e: ConfigProblems) -> Self {
        ModelError::Config(e)
    }
}

impl From<InvalidRangeError> for ModelError {
    fn from(e: InvalidRangeError) -> Self {
        ModelError::Range(e)
    }
}
