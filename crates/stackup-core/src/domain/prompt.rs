//! The prompt handler model.
//!
//! A [`PromptHandler`] is one question: the [`Parameter`] it fills, a
//! [`Condition`] over earlier answers that decides whether it is asked at all,
//! and a [`Validation`] the entered value must pass.
//!
//! Handlers are grouped into a [`PromptSequence`]. The sequence makes the
//! conditional prompt graph explicit: every key a condition reads must be
//! produced by an earlier handler in the sequence (or be seeded from a
//! previous sequence), so evaluation in declaration order is always sound.
//!
//! Resolution itself needs a terminal and lives in the application layer
//! (`application::services::PromptResolver`).

use std::collections::HashSet;

use thiserror::Error;

use crate::domain::{error::DomainError, module::Parameter, parameters::ParameterValues};

// ── Condition ─────────────────────────────────────────────────────────────────

/// Visibility rule for a prompt, evaluated against the answers so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Always ask.
    Always,
    /// Ask only when `key` was answered with exactly `value`.
    KeyEquals { key: String, value: String },
}

impl Condition {
    pub fn key_equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::KeyEquals {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn evaluate(&self, answers: &ParameterValues) -> bool {
        match self {
            Self::Always => true,
            Self::KeyEquals { key, value } => answers.get(key) == Some(value.as_str()),
        }
    }

    /// Answer keys this condition reads.
    pub fn reads(&self) -> Vec<&str> {
        match self {
            Self::Always => Vec::new(),
            Self::KeyEquals { key, .. } => vec![key.as_str()],
        }
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

/// Input was refused by a [`Validation`]. Recoverable: the user is asked again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("'{input}' is not a valid answer, expected one of: {}", expected.join(", "))]
pub struct ValidationRejected {
    pub input: String,
    pub expected: Vec<String>,
}

/// Acceptance rule for entered values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Anything goes, including the empty string.
    None,
    /// Input must equal one of these literals exactly.
    OneOf(Vec<String>),
}

impl Validation {
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn check(&self, input: &str) -> Result<(), ValidationRejected> {
        match self {
            Self::None => Ok(()),
            Self::OneOf(allowed) if allowed.iter().any(|a| a == input) => Ok(()),
            Self::OneOf(allowed) => Err(ValidationRejected {
                input: input.to_string(),
                expected: allowed.clone(),
            }),
        }
    }
}

// ── PromptHandler ─────────────────────────────────────────────────────────────

/// One interactive question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptHandler {
    pub parameter: Parameter,
    pub condition: Condition,
    pub validation: Validation,
}

impl PromptHandler {
    /// An unconditional, unvalidated prompt.
    pub fn new(parameter: Parameter) -> Self {
        Self {
            parameter,
            condition: Condition::Always,
            validation: Validation::None,
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    pub fn validated_by(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    pub fn field(&self) -> &str {
        &self.parameter.field
    }

    pub fn is_visible(&self, answers: &ParameterValues) -> bool {
        self.condition.evaluate(answers)
    }
}

// ── PromptSequence ────────────────────────────────────────────────────────────

/// Ordered prompts whose condition dependencies are checked on insertion.
#[derive(Debug, Clone, Default)]
pub struct PromptSequence {
    handlers: Vec<PromptHandler>,
    available: HashSet<String>,
}

impl PromptSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sequence that may depend on keys answered before it runs.
    pub fn seeded<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            handlers: Vec::new(),
            available: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a handler.
    ///
    /// Fails if its field is already asked in this sequence, or if its
    /// condition reads a key that nothing before it answers.
    pub fn push(&mut self, handler: PromptHandler) -> Result<(), DomainError> {
        let field = handler.field().to_string();

        if self.handlers.iter().any(|h| h.field() == field) {
            return Err(DomainError::DuplicatePrompt { field });
        }

        if let Some(key) = handler
            .condition
            .reads()
            .into_iter()
            .find(|key| !self.available.contains(*key))
        {
            return Err(DomainError::UnresolvedDependency {
                field,
                key: key.to_string(),
            });
        }

        self.available.insert(field);
        self.handlers.push(handler);
        Ok(())
    }

    pub fn with(mut self, handler: PromptHandler) -> Result<Self, DomainError> {
        self.push(handler)?;
        Ok(self)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.handlers.iter().any(|h| h.field() == field)
    }

    pub fn handlers(&self) -> &[PromptHandler] {
        &self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<'a> IntoIterator for &'a PromptSequence {
    type Item = &'a PromptHandler;
    type IntoIter = std::slice::Iter<'a, PromptHandler>;

    fn into_iter(self) -> Self::IntoIter {
        self.handlers.iter()
    }
}
