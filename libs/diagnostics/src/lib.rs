//! Collecting problems found while checking user input.
//!
//! Checks push [`Diagnostic`]s into an [`IssueSet`] instead of stopping at
//! the first problem, so users see everything that needs fixing at once.
#![warn(missing_docs)]


use std::fmt::{Debug, Display};

/// A problem to report to users.
pub trait Diagnostic: Debug + Display {
    /// How serious the problem is.
    ///
    /// Defaults to [`Severity::Warning`].
    fn severity(&self) -> Severity {
        Severity::default()
    }
}

/// How serious a [`Diagnostic`] is.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Severity {
    /// Worth knowing; nothing needs to change.
    Info,
    /// Suspicious, but output can still be generated.
    #[default]
    Warning,
    /// Generating output will fail.
    Error,
}

impl Severity {
    /// The tracing level issues of this severity are logged at.
    #[inline]
    pub const fn as_tracing_level(&self) -> tracing::Level {
        match *self {
            Self::Info => tracing::Level::INFO,
            Self::Warning => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match *self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Issues in the order they were found, with running error and warning counts.
#[derive(Debug, Clone)]
pub struct IssueSet<T> {
    issues: Vec<T>,
    num_errors: usize,
    num_warnings: usize,
}

impl<T> Default for IssueSet<T> {
    fn default() -> Self {
        Self {
            issues: Vec::new(),
            num_errors: 0,
            num_warnings: 0,
        }
    }
}

impl<T> IssueSet<T> {
    /// Creates an empty set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over the issues in the order they were added.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.issues.iter()
    }

    /// The number of issues, of any severity.
    #[inline]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns `true` if nothing was reported.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns `true` if any issue has [`Severity::Error`].
    #[inline]
    pub fn has_error(&self) -> bool {
        self.num_errors > 0
    }

    /// The number of [`Severity::Error`] issues.
    #[inline]
    pub fn num_errors(&self) -> usize {
        self.num_errors
    }

    /// Returns `true` if any issue has [`Severity::Warning`].
    #[inline]
    pub fn has_warning(&self) -> bool {
        self.num_warnings > 0
    }

    /// The number of [`Severity::Warning`] issues.
    #[inline]
    pub fn num_warnings(&self) -> usize {
        self.num_warnings
    }
}

impl<T: Diagnostic> IssueSet<T> {
    /// Records an issue, updating the counts for its severity.
    pub fn add(&mut self, issue: T) {
        match issue.severity() {
            Severity::Error => self.num_errors += 1,
            Severity::Warning => self.num_warnings += 1,
            Severity::Info => (),
        }
        self.issues.push(issue);
    }
}

impl<T> IntoIterator for IssueSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl<T: Diagnostic> Display for IssueSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for issue in self.issues.iter() {
            writeln!(f, "{}: {}", issue.severity(), issue)?;
        }
        Ok(())
    }
}
