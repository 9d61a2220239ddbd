// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! User-facing diagnostics returned by provider operations.

use std::fmt;

use sp;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    severity: Severity,
    summary: String,
    detail: String,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn summary(&self) -> &str {
        self.summary.as_str()
    }

    pub fn detail(&self) -> &str {
        self.detail.as_str()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.summary)
        } else {
            write!(f, "{}: {}", self.summary, self.detail)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Default::default()
    }

    /// A single error diagnostic.
    pub fn error<S: Into<String>, D: Into<String>>(summary: S, detail: D) -> Self {
        let mut diags = Self::new();
        diags.add_error(summary, detail);
        diags
    }

    /// A single error diagnostic whose detail is the full error chain.
    pub fn from_error<S: Into<String>>(summary: S, err: &sp::Error) -> Self {
        let detail = err
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(": ");
        Self::error(summary, detail)
    }

    pub fn add_error<S: Into<String>, D: Into<String>>(&mut self, summary: S, detail: D) {
        self.push(Severity::Error, summary.into(), detail.into());
    }

    pub fn add_warning<S: Into<String>, D: Into<String>>(&mut self, summary: S, detail: D) {
        self.push(Severity::Warning, summary.into(), detail.into());
    }

    fn push(&mut self, severity: Severity, summary: String, detail: String) {
        self.0.push(Diagnostic {
            severity,
            summary,
            detail,
        });
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lines = self.0.iter().map(|d| d.to_string()).collect::<Vec<_>>();
        write!(f, "{}", lines.join("; "))
    }
}
