use std::collections::BTreeSet;
use std::time::Instant;

use chrono::NaiveDateTime;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use shopseed_core::{
    ConflictDecision, ConflictPolicy, EntityKind, IdentifierPool, PhaseNode, RecordLedger,
    Result, SeedConfig, SeedError, execution_order,
};
use shopseed_store::{RetryPolicy, Store, wait_until_ready};

use crate::faker::FakeRsProvider;
use crate::model::{PhaseReport, RunState, SeedReport};
use crate::phases::{PhaseContext, PhaseDef, phase_table};
use crate::provider::FakeValueProvider;

/// Successful run: the report plus the populated pools.
#[derive(Debug)]
pub struct SeedOutcome {
    pub report: SeedReport,
    pub pool: IdentifierPool,
}

/// Failed run. The report reflects every phase that completed.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct SeedFailure {
    #[source]
    pub error: SeedError,
    pub report: SeedReport,
}

/// Runs the phase table against a store.
#[derive(Debug, Clone)]
pub struct Seeder {
    config: SeedConfig,
    phases: Vec<PhaseDef>,
    seed: u64,
    run_id: String,
}

impl Seeder {
    /// Seeder over the full storefront phase table.
    pub fn new(config: SeedConfig) -> Result<Self> {
        Self::with_phases(config, phase_table())
    }

    pub fn with_phases(config: SeedConfig, phases: Vec<PhaseDef>) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            phases,
            seed,
            run_id: uuid::Uuid::new_v4().to_string(),
        })
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    pub fn nodes(&self) -> Vec<PhaseNode> {
        self.phases.iter().map(PhaseDef::node).collect()
    }

    /// Phases in execution order.
    pub fn plan(&self) -> Result<Vec<&PhaseDef>> {
        let order = execution_order(&self.nodes())?;
        Ok(order
            .into_iter()
            .filter_map(|entity| self.phases.iter().find(|phase| phase.entity == entity))
            .collect())
    }

    /// Seed `store` using the `fake`-backed value provider.
    pub async fn run<S>(&self, store: &S) -> std::result::Result<SeedOutcome, SeedFailure>
    where
        S: Store + ?Sized,
    {
        let now = chrono::Utc::now().naive_utc();
        let mut fake = FakeRsProvider::new(self.seed, now);
        self.run_with(store, &mut fake, now).await
    }

    /// Seed `store`, drawing values from `fake`.
    ///
    /// The store is closed exactly once before this returns, whatever the
    /// outcome.
    pub async fn run_with<S>(
        &self,
        store: &S,
        fake: &mut dyn FakeValueProvider,
        now: NaiveDateTime,
    ) -> std::result::Result<SeedOutcome, SeedFailure>
    where
        S: Store + ?Sized,
    {
        let start = Instant::now();
        let run_id = self.run_id.as_str();
        let mut report = SeedReport::new(run_id.to_string(), self.seed, store.engine());
        let mut pool = IdentifierPool::new();

        info!(
            run_id,
            engine = store.engine(),
            phases = self.phases.len(),
            seed = self.seed,
            "seeding started"
        );

        let result = self
            .drive(store, fake, now, &mut report, &mut pool)
            .await;
        store.close().await;

        report.pool_sizes = pool.sizes();
        report.duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => {
                transition(&mut report, RunState::Completed);
                info!(
                    run_id,
                    phases = report.phases.len(),
                    rows_inserted = report.rows_inserted_total,
                    rows_skipped = report.rows_skipped_total,
                    duration_ms = report.duration_ms,
                    "seeding completed"
                );
                Ok(SeedOutcome { report, pool })
            }
            Err(error) => {
                transition(&mut report, RunState::Failed);
                report.failed_phase = error.phase();
                report.error = Some(error.to_string());
                warn!(
                    run_id,
                    phase = ?report.failed_phase,
                    error = %error,
                    "seeding failed"
                );
                Err(SeedFailure { error, report })
            }
        }
    }

    async fn drive<S>(
        &self,
        store: &S,
        fake: &mut dyn FakeValueProvider,
        now: NaiveDateTime,
        report: &mut SeedReport,
        pool: &mut IdentifierPool,
    ) -> Result<()>
    where
        S: Store + ?Sized,
    {
        let plan = self.plan()?;

        transition(report, RunState::ProbingReadiness);
        let attempts = wait_until_ready(store, RetryPolicy::from(&self.config.readiness)).await?;
        report.probe_attempts = Some(attempts);

        let mut ledger = RecordLedger::new();
        let mut completed = BTreeSet::new();

        for (index, phase) in plan.into_iter().enumerate() {
            transition(
                report,
                RunState::GeneratingPhase {
                    index,
                    entity: phase.entity,
                },
            );
            let phase_report = self
                .run_phase(store, phase, fake, now, pool, &mut ledger, &completed, report)
                .await
                .map_err(|err| err.in_phase(phase.entity))?;
            completed.insert(phase.entity);
            report.record_phase(phase_report);
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_phase<S>(
        &self,
        store: &S,
        phase: &PhaseDef,
        fake: &mut dyn FakeValueProvider,
        now: NaiveDateTime,
        pool: &mut IdentifierPool,
        ledger: &mut RecordLedger,
        completed: &BTreeSet<EntityKind>,
        report: &mut SeedReport,
    ) -> Result<PhaseReport>
    where
        S: Store + ?Sized,
    {
        let entity = phase.entity;
        let phase_start = Instant::now();

        for &prerequisite in phase.requires.iter().chain(phase.optional) {
            if !completed.contains(&prerequisite) {
                return Err(SeedError::PrerequisiteIncomplete {
                    phase: entity,
                    prerequisite,
                });
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(self.seed, entity.table()));
        let records = {
            let mut ctx = PhaseContext {
                config: &self.config,
                pool: &*pool,
                ledger: &*ledger,
                fake: &mut *fake,
                rng: &mut rng,
                now,
            };
            (phase.build)(&mut ctx)?
        };

        info!(
            phase = %entity,
            table = entity.table(),
            rows = records.len(),
            "seeding phase"
        );

        let policy = ConflictPolicy::for_entity(entity);
        let mut inserted = 0_u64;
        let mut skipped = 0_u64;
        let attempted = records.len() as u64;

        for record in records {
            match store.insert(&record).await {
                Ok(Some(id)) => {
                    pool.add(entity, id);
                    ledger.ingest(id, record);
                    inserted += 1;
                }
                Ok(None) => inserted += 1,
                Err(err) => match policy.classify(&err) {
                    ConflictDecision::Skip => {
                        debug!(
                            phase = %entity,
                            kind = %err.kind,
                            constraint = err.constraint.as_deref().unwrap_or(""),
                            "row skipped"
                        );
                        report.record_skip(err.kind);
                        skipped += 1;
                    }
                    ConflictDecision::Abort => return Err(err.into()),
                },
            }
        }

        let phase_report = PhaseReport {
            entity,
            table: entity.table(),
            rows_attempted: attempted,
            rows_inserted: inserted,
            rows_skipped: skipped,
            duration_ms: phase_start.elapsed().as_millis() as u64,
        };

        info!(
            phase = %entity,
            rows_inserted = inserted,
            rows_skipped = skipped,
            duration_ms = phase_report.duration_ms,
            "phase completed"
        );

        Ok(phase_report)
    }
}

fn transition(report: &mut SeedReport, state: RunState) {
    debug!(from = ?report.state, to = ?state, "run state");
    report.state = state;
}

/// Per-phase seed for pool draws (counts and parent picks). Field values
/// come from the single provider stream shared by every phase, so adding a
/// phase shifts the values of the phases after it.
fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
