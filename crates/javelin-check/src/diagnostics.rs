use javelin_syntax::TextRange;
use serde::Serialize;

use crate::feature::Feature;

/// Coarse taxonomy of everything the engine reports. Severity is
/// implicitly "error": a lower-severity warning channel is out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Structural,
    UnsupportedFeature,
    Resolution,
    Inheritance,
    Signature,
    Lexical,
    ExceptionHandling,
    Annotation,
}

/// Kind-specific structured data carried alongside the message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorPayload {
    None,
    Feature { feature: Feature },
    Name { name: String },
    Signatures { found: String, conflicting: String },
    Types { expected: String, actual: String },
    Thrown { types: Vec<String> },
    Candidates { count: usize },
}

/// One detected rule violation. Immutable once created; ownership passes
/// to the error sink on emission.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub category: ErrorCategory,
    /// Stable dotted identifier, e.g. `class.cyclic.inheritance`.
    pub code: &'static str,
    pub message: String,
    pub range: TextRange,
    pub payload: ErrorPayload,
}

impl Diagnostic {
    pub fn new(
        category: ErrorCategory,
        code: &'static str,
        range: TextRange,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            category,
            code,
            message: message.into(),
            range,
            payload: ErrorPayload::None,
        }
    }

    pub fn with_payload(mut self, payload: ErrorPayload) -> Self {
        self.payload = payload;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_defaults_to_none() {
        let diag = Diagnostic::new(
            ErrorCategory::Lexical,
            "literal.unclosed",
            TextRange::new(0, 3),
            "unclosed literal",
        );
        assert_eq!(diag.payload, ErrorPayload::None);
    }

    #[test]
    fn serializes_with_tagged_payload() {
        let diag = Diagnostic::new(
            ErrorCategory::Resolution,
            "annotation.unresolved",
            TextRange::new(4, 11),
            "cannot resolve annotation 'Missing'",
        )
        .with_payload(ErrorPayload::Name {
            name: "Missing".to_string(),
        });
        let value = serde_json::to_value(&diag).unwrap();
        assert_eq!(value["category"], "resolution");
        assert_eq!(value["code"], "annotation.unresolved");
        assert_eq!(value["payload"]["kind"], "name");
        assert_eq!(value["payload"]["name"], "Missing");
    }
}
