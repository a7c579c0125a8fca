//! In-crate fakes shared by the service tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::application::{
    ApplicationError,
    ports::{ModuleLoader, Prompter},
};
use crate::domain::{ModuleConfig, ModuleSource, ValidationRejected};
use crate::error::StackupResult;

/// Module loader backed by a fixed source → descriptor table.
#[derive(Default)]
pub(crate) struct StaticLoader {
    modules: HashMap<String, ModuleConfig>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    fetches: AtomicUsize,
    parses: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl StaticLoader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_module(mut self, source: impl Into<String>, config: ModuleConfig) -> Self {
        self.modules.insert(source.into(), config);
        self
    }

    pub(crate) fn failing_fetch(mut self, source: impl Into<String>) -> Self {
        self.failing.insert(source.into());
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn parse_count(&self) -> usize {
        self.parses.load(Ordering::SeqCst)
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModuleLoader for StaticLoader {
    async fn fetch(&self, source: &ModuleSource) -> StackupResult<()> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(source.as_str()) {
            return Err(ApplicationError::ModuleFetch {
                location: source.to_string(),
                reason: "connection reset".into(),
            }
            .into());
        }
        Ok(())
    }

    fn parse(&self, source: &ModuleSource) -> StackupResult<ModuleConfig> {
        self.parses.fetch_add(1, Ordering::SeqCst);
        self.modules.get(source.as_str()).cloned().ok_or_else(|| {
            ApplicationError::ModuleParse {
                location: source.to_string(),
                reason: "stackup-module.toml not found".into(),
            }
            .into()
        })
    }
}

/// Prompter that replays canned answers in order.
///
/// An empty scripted answer stands for "accept the default", like pressing
/// enter at a real prompt. Running out of answers behaves like a closed
/// input stream.
#[derive(Default)]
pub(crate) struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    selections: Mutex<VecDeque<usize>>,
    asked: Mutex<Vec<String>>,
    rejected: Mutex<Vec<ValidationRejected>>,
}

impl ScriptedPrompter {
    pub(crate) fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub(crate) fn with_selections(self, selections: impl IntoIterator<Item = usize>) -> Self {
        *self.selections.lock().unwrap() = selections.into_iter().collect();
        self
    }

    /// Labels of every `ask`/`select` call, in order.
    pub(crate) fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    pub(crate) fn rejections(&self) -> usize {
        self.rejected.lock().unwrap().len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, label: &str, default: &str) -> StackupResult<String> {
        self.asked.lock().unwrap().push(label.to_string());
        match self.answers.lock().unwrap().pop_front() {
            Some(answer) if answer.is_empty() => Ok(default.to_string()),
            Some(answer) => Ok(answer),
            None => Err(ApplicationError::Prompt {
                reason: "input stream closed".into(),
            }
            .into()),
        }
    }

    fn select(&self, label: &str, options: &[String]) -> StackupResult<usize> {
        self.asked.lock().unwrap().push(label.to_string());
        match self.selections.lock().unwrap().pop_front() {
            Some(index) if index < options.len() => Ok(index),
            _ => Err(ApplicationError::Prompt {
                reason: "no selection".into(),
            }
            .into()),
        }
    }

    fn reject(&self, rejection: &ValidationRejected) {
        self.rejected.lock().unwrap().push(rejection.clone());
    }
}
