//! Rewrites messages in flight with an ordered list of rules.

mod rules;

pub use rules::{EraseContentFromSources, Identity, RenameSources, Rule, TransformError};

use async_trait::async_trait;
use tracing::debug;

use conflux_pipeline::{BoxError, CallNext, Handler};
use conflux_types::{Context, Message};

/// A handler that applies its [`Rule`]s in order and forwards the result.
///
/// The first rule that fails halts the chain with that rule's error. With
/// no rules the transformer forwards messages unchanged.
#[derive(Default)]
pub struct Transformer {
    rules: Vec<Box<dyn Rule>>,
}

impl Transformer {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }
}

#[async_trait]
impl Handler for Transformer {
    fn name(&self) -> &str {
        "transformer"
    }

    async fn process(
        &self,
        ctx: &Context,
        message: Message,
        next: CallNext,
    ) -> Result<(), BoxError> {
        let mut transformed = message;
        for rule in &self.rules {
            transformed = rule.apply(transformed)?;
        }
        debug!(
            key = %transformed.key(),
            source = %transformed.source(),
            "transformed message"
        );

        next.call(ctx, transformed).await
    }
}
