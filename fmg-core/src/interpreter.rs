//! Runs a [`Plan`] against a [`Provider`]
//!
//! Effects run one at a time in plan order. Nothing is retried.

use crate::effect::Effect;
use crate::plan::Plan;
use crate::provider::{Provider, ProviderError, ProviderResult};
use crate::resource::{ResourceId, State};

/// What a single effect produced
#[derive(Debug)]
pub enum EffectOutcome {
    Read { state: State },
    Created { state: State },
    Updated { state: State },
    Deleted { id: ResourceId },
    /// Not executed; `reason` says why
    Skipped { reason: String },
}

#[derive(Debug)]
pub struct ApplyResult {
    /// One entry per executed effect, in plan order
    pub outcomes: Vec<Result<EffectOutcome, ProviderError>>,
    pub success_count: usize,
    pub failure_count: usize,
}

impl ApplyResult {
    pub fn is_success(&self) -> bool {
        self.failure_count == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct InterpreterConfig {
    /// Report every effect as skipped without calling the provider
    pub dry_run: bool,
    /// Keep going after a failed effect instead of stopping
    pub continue_on_error: bool,
}

pub struct Interpreter<P: Provider> {
    provider: P,
    config: InterpreterConfig,
}

impl<P: Provider> Interpreter<P> {
    pub fn new(provider: P) -> Self {
        Interpreter {
            provider,
            config: InterpreterConfig::default(),
        }
    }

    pub fn with_config(self, config: InterpreterConfig) -> Self {
        Interpreter { config, ..self }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn apply(&self, plan: &Plan) -> ApplyResult {
        let mut result = ApplyResult {
            outcomes: Vec::with_capacity(plan.effects().len()),
            success_count: 0,
            failure_count: 0,
        };

        for effect in plan.effects() {
            let outcome = self.execute_effect(effect).await;
            let failed = outcome.is_err();
            if let Err(e) = &outcome {
                log::warn!("{} failed: {}", effect.resource_id(), e);
                result.failure_count += 1;
            } else {
                result.success_count += 1;
            }
            result.outcomes.push(outcome);

            if failed && !self.config.continue_on_error {
                break;
            }
        }

        result
    }

    pub async fn execute_effect(&self, effect: &Effect) -> ProviderResult<EffectOutcome> {
        if self.config.dry_run {
            return Ok(EffectOutcome::Skipped {
                reason: "dry-run mode".to_string(),
            });
        }

        log::debug!("{} {}", effect_kind(effect), effect.resource_id());
        let outcome = match effect {
            Effect::Read(resource) => EffectOutcome::Read {
                state: self.provider.read(resource, None).await?,
            },
            Effect::Create(resource) => EffectOutcome::Created {
                state: self.provider.create(resource).await?,
            },
            Effect::Update { id, from, to } => {
                let mkey = recorded_identifier(id, from, "update")?;
                EffectOutcome::Updated {
                    state: self.provider.update(id, mkey, from, to).await?,
                }
            }
            Effect::Delete { id, from } => {
                let mkey = recorded_identifier(id, from, "delete")?;
                self.provider.delete(id, mkey, from).await?;
                EffectOutcome::Deleted { id: id.clone() }
            }
        };
        Ok(outcome)
    }
}

fn effect_kind(effect: &Effect) -> &'static str {
    match effect {
        Effect::Read(_) => "read",
        Effect::Create(_) => "create",
        Effect::Update { .. } => "update",
        Effect::Delete { .. } => "delete",
    }
}

fn recorded_identifier<'a>(
    id: &ResourceId,
    from: &'a State,
    action: &str,
) -> ProviderResult<&'a str> {
    from.identifier.as_deref().ok_or_else(|| {
        ProviderError::new(format!("Cannot {} a resource without an identifier", action))
            .for_resource(id.clone())
    })
}
