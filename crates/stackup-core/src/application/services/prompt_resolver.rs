//! Resolves prompt handlers against a [`Prompter`].

use tracing::{debug, instrument};

use crate::{
    application::ports::Prompter,
    domain::{ParameterValues, PromptHandler, PromptSequence},
    error::StackupResult,
};

/// Drives prompt handlers from pending to resolved.
pub struct PromptResolver<'a> {
    prompter: &'a dyn Prompter,
}

impl<'a> PromptResolver<'a> {
    pub fn new(prompter: &'a dyn Prompter) -> Self {
        Self { prompter }
    }

    /// Resolve one handler, recording the answer into `answers`.
    ///
    /// Returns `None` when the condition is false: nothing is asked and the
    /// field stays absent. A field that already has an answer resolves to it
    /// without asking again. Rejected input is reported and asked again.
    pub fn resolve(
        &self,
        handler: &PromptHandler,
        answers: &mut ParameterValues,
    ) -> StackupResult<Option<String>> {
        let field = handler.field();

        if let Some(existing) = answers.get(field) {
            debug!(field, "Already answered");
            return Ok(Some(existing.to_string()));
        }

        if !handler.is_visible(answers) {
            debug!(field, "Condition not met, skipping");
            return Ok(None);
        }

        let input = loop {
            let input = self
                .prompter
                .ask(&handler.parameter.label, &handler.parameter.default)?;
            match handler.validation.check(&input) {
                Ok(()) => break input,
                Err(rejected) => {
                    debug!(field, input = %rejected.input, "Answer rejected");
                    self.prompter.reject(&rejected);
                }
            }
        };

        answers.record(field, input.clone())?;
        Ok(Some(input))
    }

    /// Resolve every handler of a sequence, once each, in declaration order.
    #[instrument(skip_all, fields(prompts = sequence.len()))]
    pub fn resolve_sequence(
        &self,
        sequence: &PromptSequence,
        answers: &mut ParameterValues,
    ) -> StackupResult<()> {
        for handler in sequence {
            self.resolve(handler, answers)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ApplicationError, ports::MockPrompter};
    use crate::domain::{Condition, Parameter, Validation};
    use crate::error::StackupError;
    use mockall::predicate::eq;

    fn push_prompt() -> PromptHandler {
        PromptHandler::new(Parameter::new("push", "Push? (y/n)", "y"))
            .validated_by(Validation::one_of(["y", "n"]))
    }

    fn org_prompt() -> PromptHandler {
        PromptHandler::new(Parameter::new("org", "Org", "github.com/"))
            .when(Condition::key_equals("push", "y"))
    }

    #[test]
    fn false_condition_never_asks() {
        let mut prompter = MockPrompter::new();
        prompter.expect_ask().never();
        prompter.expect_reject().never();

        let mut answers: ParameterValues = [("push", "n")].into_iter().collect();
        let resolved = PromptResolver::new(&prompter)
            .resolve(&org_prompt(), &mut answers)
            .unwrap();

        assert_eq!(resolved, None);
        assert!(!answers.contains("org"));
    }

    #[test]
    fn loops_until_input_is_in_the_allowed_set() {
        let mut prompter = MockPrompter::new();
        let mut script = vec!["yes", "Y", "n"].into_iter();
        prompter
            .expect_ask()
            .with(eq("Push? (y/n)"), eq("y"))
            .times(3)
            .returning(move |_, _| Ok(script.next().unwrap_or_default().to_string()));
        prompter.expect_reject().times(2).return_const(());

        let mut answers = ParameterValues::new();
        let resolved = PromptResolver::new(&prompter)
            .resolve(&push_prompt(), &mut answers)
            .unwrap();

        assert_eq!(resolved.as_deref(), Some("n"));
        assert_eq!(answers.get("push"), Some("n"));
    }

    #[test]
    fn answered_field_is_not_asked_again() {
        let mut prompter = MockPrompter::new();
        prompter.expect_ask().never();

        let mut answers: ParameterValues = [("push", "y")].into_iter().collect();
        let resolved = PromptResolver::new(&prompter)
            .resolve(&push_prompt(), &mut answers)
            .unwrap();

        assert_eq!(resolved.as_deref(), Some("y"));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn sequence_skips_org_when_not_pushing() {
        let mut prompter = MockPrompter::new();
        prompter
            .expect_ask()
            .times(1)
            .returning(|_, _| Ok("n".to_string()));

        let sequence = PromptSequence::new()
            .with(push_prompt())
            .and_then(|s| s.with(org_prompt()))
            .unwrap();
        let mut answers = ParameterValues::new();
        PromptResolver::new(&prompter)
            .resolve_sequence(&sequence, &mut answers)
            .unwrap();

        assert_eq!(answers.get("push"), Some("n"));
        assert!(!answers.contains("org"));
    }

    #[test]
    fn sequence_asks_org_when_pushing() {
        let mut prompter = MockPrompter::new();
        let mut script = vec!["y", "github.com/acme"].into_iter();
        prompter
            .expect_ask()
            .times(2)
            .returning(move |_, _| Ok(script.next().unwrap_or_default().to_string()));

        let sequence = PromptSequence::new()
            .with(push_prompt())
            .and_then(|s| s.with(org_prompt()))
            .unwrap();
        let mut answers = ParameterValues::new();
        PromptResolver::new(&prompter)
            .resolve_sequence(&sequence, &mut answers)
            .unwrap();

        assert_eq!(answers.get("org"), Some("github.com/acme"));
    }

    #[test]
    fn prompt_failure_propagates() {
        let mut prompter = MockPrompter::new();
        prompter.expect_ask().returning(|_, _| {
            Err(ApplicationError::Prompt {
                reason: "input stream closed".into(),
            }
            .into())
        });

        let mut answers = ParameterValues::new();
        let err = PromptResolver::new(&prompter)
            .resolve(&push_prompt(), &mut answers)
            .unwrap_err();

        assert!(matches!(
            err,
            StackupError::Application(ApplicationError::Prompt { .. })
        ));
        assert!(answers.is_empty());
    }
}
