use std::fmt;
use std::path::PathBuf;

/// Error types surfaced by the harness
///
/// Anything that means "the generator produced the wrong thing" ends up here so
/// callers can tell a generator defect apart from plumbing failures.
#[derive(Debug)]
pub enum HarnessError {
    /// An external command exited with a non-zero status
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// A file the caller expected the generator to produce does not exist
    MissingFile(PathBuf),

    /// Generated files contain strings that must never survive substitution
    Disallowed { violations: Vec<(PathBuf, String)> },

    /// A scenario-dependent artifact was present when it should be absent, or vice versa
    ArtifactMismatch {
        path: PathBuf,
        expected_present: bool,
    },

    /// A value could not be parsed into one of the scenario axes
    InvalidValue {
        kind: &'static str,
        value: String,
        expected: Vec<&'static str>,
    },

    /// The generated params testing file lacks an expected `key=value` line
    MissingParam { key: String, value: String },
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::CommandFailed {
                command,
                exit_code,
                stdout,
                stderr,
            } => {
                write!(f, "Command '{}' failed", command)?;

                match exit_code {
                    Some(code) => write!(f, " (exit code {})", code)?,
                    None => write!(f, " (terminated by signal)")?,
                }

                if !stdout.trim().is_empty() {
                    write!(f, "\nstdout:\n{}", stdout.trim_end())?;
                }

                if !stderr.trim().is_empty() {
                    write!(f, "\nstderr:\n{}", stderr.trim_end())?;
                }

                Ok(())
            }
            HarnessError::MissingFile(path) => {
                write!(f, "Expected file does not exist: {}", path.display())
            }
            HarnessError::Disallowed { violations } => {
                write!(
                    f,
                    "Found {} disallowed string occurrence(s)",
                    violations.len()
                )?;

                for (path, needle) in violations {
                    write!(f, "\n  {} contains '{}'", path.display(), needle)?;
                }

                Ok(())
            }
            HarnessError::ArtifactMismatch {
                path,
                expected_present,
            } => {
                if *expected_present {
                    write!(f, "Expected artifact is missing: {}", path.display())
                } else {
                    write!(f, "Unexpected artifact was generated: {}", path.display())
                }
            }
            HarnessError::InvalidValue {
                kind,
                value,
                expected,
            } => {
                write!(
                    f,
                    "Invalid {} '{}' (expected one of: {})",
                    kind,
                    value,
                    expected.join(", ")
                )
            }
            HarnessError::MissingParam { key, value } => {
                write!(f, "Params testing file lacks '{}={}'", key, value)
            }
        }
    }
}

impl std::error::Error for HarnessError {}
