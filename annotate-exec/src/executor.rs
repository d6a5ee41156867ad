//! The annotation run
//!
//! Resolves every variable, plans the resolved ones, and executes plans
//! concurrently. Within one variable the operation sequence is strictly
//! ordered and stops at the first failure; across variables nothing is
//! shared except the store, so failures never propagate sideways.
//! Verification for a variable runs only after its own inserts completed.

use futures::future::join_all;
use tracing::{info, warn};

use annotate_map::{resolve_all, ResolveOutcome, ResolvedVariable, SemanticMap};
use annotate_plan::{plan_variable, VariablePlan};
use annotate_vocab::PrefixMap;

use crate::state::{RunReport, VariableOutcome, VariableState};
use crate::store::SparqlStore;

/// What a run should do beyond planning.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Render plans and stop; nothing is posted to the store
    pub dry_run: bool,
    /// Run the quality-control checks after a variable's inserts complete
    pub verify: bool,
    /// Carry the rendered SPARQL in the report
    pub include_queries: bool,
}

/// Execute one full annotation run over a semantic map.
pub async fn run_annotation(
    map: &SemanticMap,
    store: &dyn SparqlStore,
    options: RunOptions,
) -> RunReport {
    let prefixes = PrefixMap::defaults().with_extras(map.prefixes.clone());
    let outcomes = resolve_all(map, &prefixes);

    let prefixes = &prefixes;
    let tasks = outcomes.into_iter().map(|outcome| async move {
        match outcome {
            ResolveOutcome::Undescribed { name } => {
                info!(variable = name.as_str(), "skipped, no local definition");
                VariableOutcome::terminal(name, VariableState::Skipped)
            }
            ResolveOutcome::Invalid { name, reason } => {
                let mut record = VariableOutcome::terminal(name, VariableState::ConfigError);
                record.error = Some(reason);
                record
            }
            ResolveOutcome::Resolved(variable) => {
                let plan = plan_variable(&map.database_name, &variable, prefixes);
                run_variable(&variable, plan, store, options).await
            }
        }
    });

    let variables = join_all(tasks).await;
    let failed = variables.iter().filter(|v| v.state.is_failure()).count();
    info!(
        database = map.database_name.as_str(),
        variables = variables.len(),
        failed,
        "run complete"
    );

    RunReport {
        database: map.database_name.clone(),
        variables,
    }
}

/// Plan only, for rendering or saving queries. Same resolution path as a
/// run, so configuration errors surface identically.
pub fn plan_all(map: &SemanticMap) -> Vec<(ResolveOutcome, Option<VariablePlan>)> {
    let prefixes = PrefixMap::defaults().with_extras(map.prefixes.clone());
    resolve_all(map, &prefixes)
        .into_iter()
        .map(|outcome| {
            let plan = match &outcome {
                ResolveOutcome::Resolved(variable) => {
                    Some(plan_variable(&map.database_name, variable, &prefixes))
                }
                _ => None,
            };
            (outcome, plan)
        })
        .collect()
}

/// Run the quality-control checks only, without writing anything.
pub async fn verify_annotation(map: &SemanticMap, store: &dyn SparqlStore) -> RunReport {
    let prefixes = PrefixMap::defaults().with_extras(map.prefixes.clone());
    let outcomes = resolve_all(map, &prefixes);

    let prefixes = &prefixes;
    let tasks = outcomes.into_iter().map(|outcome| async move {
        match outcome {
            ResolveOutcome::Undescribed { name } => {
                VariableOutcome::terminal(name, VariableState::Skipped)
            }
            ResolveOutcome::Invalid { name, reason } => {
                let mut record = VariableOutcome::terminal(name, VariableState::ConfigError);
                record.error = Some(reason);
                record
            }
            ResolveOutcome::Resolved(variable) => {
                let plan = plan_variable(&map.database_name, &variable, prefixes);
                let mut record =
                    VariableOutcome::terminal(variable.name.clone(), VariableState::Verified);
                record.state = verify_plan(&variable, &plan, store, &mut record.error).await;
                record
            }
        }
    });

    RunReport {
        database: map.database_name.clone(),
        variables: join_all(tasks).await,
    }
}

async fn run_variable(
    variable: &ResolvedVariable,
    plan: VariablePlan,
    store: &dyn SparqlStore,
    options: RunOptions,
) -> VariableOutcome {
    let mut record = VariableOutcome::terminal(variable.name.clone(), VariableState::Planned);

    if options.dry_run {
        record.plan = Some(plan);
        return record;
    }

    for (index, op) in plan.operations.iter().enumerate() {
        if let Err(e) = store.update(&op.sparql).await {
            warn!(
                variable = variable.name.as_str(),
                step = index + 1,
                label = op.label.as_str(),
                error = %e,
                "operation failed, remaining steps skipped"
            );
            record.state = VariableState::ExecutionFailed;
            record.failed_step = Some(index + 1);
            record.error = Some(format!("{}: {e}", op.label));
            if options.include_queries {
                record.plan = Some(plan);
            }
            return record;
        }
        record.applied += 1;
    }

    record.state = if options.verify {
        verify_plan(variable, &plan, store, &mut record.error).await
    } else {
        VariableState::Executed
    };
    if options.include_queries {
        record.plan = Some(plan);
    }
    record
}

async fn verify_plan(
    variable: &ResolvedVariable,
    plan: &VariablePlan,
    store: &dyn SparqlStore,
    error: &mut Option<String>,
) -> VariableState {
    for check in &plan.verification {
        match store.ask(&check.sparql).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(
                    variable = variable.name.as_str(),
                    check = check.label.as_str(),
                    "verification mismatch"
                );
                *error = Some(format!("check `{}` found nothing", check.label));
                return VariableState::VerificationFailed;
            }
            Err(e) => {
                *error = Some(format!("check `{}`: {e}", check.label));
                return VariableState::VerificationError;
            }
        }
    }
    VariableState::Verified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreError, StoreResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory store that records updates and can fail on a given step.
    #[derive(Default)]
    struct RecordingStore {
        updates: Mutex<Vec<String>>,
        fail_on_update: Option<usize>,
        ask_answer: bool,
    }

    impl RecordingStore {
        fn answering(ask_answer: bool) -> Self {
            RecordingStore {
                ask_answer,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl SparqlStore for RecordingStore {
        async fn update(&self, sparql: &str) -> StoreResult<()> {
            let mut updates = self.updates.lock().unwrap();
            if self.fail_on_update == Some(updates.len() + 1) {
                return Err(StoreError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            updates.push(sparql.to_string());
            Ok(())
        }

        async fn ask(&self, _sparql: &str) -> StoreResult<bool> {
            Ok(self.ask_answer)
        }
    }

    fn three_step_map() -> SemanticMap {
        SemanticMap::from_json(
            r#"{
                "endpoint": "http://e/statements",
                "database_name": "opc",
                "variable_info": {
                    "age": {
                        "predicate": "roo:P100016", "class": "roo:C100003",
                        "local_definition": "age",
                        "schema_reconstruction": [
                            {"type": "class", "predicate": "roo:P100039",
                             "class": "ncit:C16495", "class_label": "demographicClass",
                             "aesthetic_label": "Demographic"},
                            {"type": "node", "predicate": "roo:P100027",
                             "class": "ncit:C29848", "node_label": "years",
                             "aesthetic_label": "Years"}
                        ]
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn failure_mid_sequence_stops_that_variable() {
        let store = RecordingStore {
            fail_on_update: Some(2),
            ..Default::default()
        };
        let report = run_annotation(&three_step_map(), &store, RunOptions::default()).await;
        let outcome = &report.variables[0];
        assert_eq!(outcome.state, VariableState::ExecutionFailed);
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.failed_step, Some(2));
        assert!(outcome.error.as_deref().unwrap().contains("attachment"));
        // Step 3 was never attempted.
        assert_eq!(store.updates.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn successful_run_applies_all_steps_in_order() {
        let store = RecordingStore::answering(true);
        let options = RunOptions {
            verify: true,
            ..Default::default()
        };
        let report = run_annotation(&three_step_map(), &store, options).await;
        let outcome = &report.variables[0];
        assert_eq!(outcome.state, VariableState::Verified);
        assert_eq!(outcome.applied, 3);
        let updates = store.updates.lock().unwrap();
        assert!(updates[0].contains("db:opc.demographicClass"));
        assert!(updates[1].contains("owl:equivalentClass roo:C100003"));
        assert!(updates[2].contains("db:opc.years"));
    }

    #[tokio::test]
    async fn verification_mismatch_is_invalid_not_error() {
        let store = RecordingStore::answering(false);
        let options = RunOptions {
            verify: true,
            ..Default::default()
        };
        let report = run_annotation(&three_step_map(), &store, options).await;
        let outcome = &report.variables[0];
        assert_eq!(outcome.state, VariableState::VerificationFailed);
        assert_eq!(outcome.applied, 3);
        assert!(outcome.error.as_deref().unwrap().contains("found nothing"));
    }

    #[tokio::test]
    async fn dry_run_posts_nothing() {
        let store = RecordingStore::default();
        let options = RunOptions {
            dry_run: true,
            ..Default::default()
        };
        let report = run_annotation(&three_step_map(), &store, options).await;
        assert_eq!(report.variables[0].state, VariableState::Planned);
        assert!(report.variables[0].plan.is_some());
        assert!(store.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn broken_and_undescribed_variables_do_not_block_siblings() {
        let map = SemanticMap::from_json(
            r#"{
                "endpoint": "http://e/statements",
                "database_name": "opc",
                "variable_info": {
                    "described": {"predicate": "roo:P100018", "class": "ncit:C28421",
                                  "local_definition": "sex"},
                    "broken": {"class": "ncit:C1", "local_definition": "b"},
                    "undescribed": {"predicate": "roo:P1", "class": "ncit:C1"}
                }
            }"#,
        )
        .unwrap();
        let store = RecordingStore::default();
        let report = run_annotation(&map, &store, RunOptions::default()).await;
        let state =
            |name: &str| report.variables.iter().find(|v| v.variable == name).unwrap().state;
        assert_eq!(state("broken"), VariableState::ConfigError);
        assert_eq!(state("undescribed"), VariableState::Skipped);
        assert_eq!(state("described"), VariableState::Executed);
        assert_eq!(report.failures().count(), 1);
    }
}
