use std::sync::Mutex;

use serde::Serialize;

use super::lock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The block-specific component failed to import; the generic one was used.
    ComponentFallback,
    /// Neither the specific nor the generic component could be imported.
    ComponentUnresolved,
    ComponentRender,
    Stylesheet,
    Image,
}

/// A recovered, non-fatal pipeline failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub subject: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Append-only diagnostic channel attached to a page.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    pub fn push(&self, subject: impl Into<String>, kind: DiagnosticKind, message: impl Into<String>) {
        lock(&self.entries).push(Diagnostic {
            subject: subject.into(),
            kind,
            message: message.into(),
        });
    }

    pub fn snapshot(&self) -> Vec<Diagnostic> {
        lock(&self.entries).clone()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        lock(&self.entries).iter().filter(|d| d.kind == kind).count()
    }
}
