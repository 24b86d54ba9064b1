//! Comparison orchestrator.
//!
//! Runs the per-kind comparators selected by the configured levels,
//! aggregates their diffs into one deterministically ordered sequence, and
//! computes the summary counts. This stage is pure data transformation:
//! it cannot fail, and absent collections are simply empty slices.

mod entities;

use crate::types::{
    ComparisonConfig, ComparisonLevel, ComparisonResult, Diff, DiffKind, DiffSummary,
    ModuleDefinition,
};

/// Compare two module definitions under the given configuration.
///
/// Levels not listed in the configuration are skipped entirely: their
/// entities are neither compared nor reported, which is distinct from
/// "compared and found equal".
#[must_use]
pub fn compare_modules(
    left: &ModuleDefinition,
    right: &ModuleDefinition,
    config: &ComparisonConfig,
) -> ComparisonResult {
    let mut diffs = Vec::new();

    if config.level_enabled(ComparisonLevel::ModuleCalls) {
        diffs.extend(entities::classify(
            &left.module_calls,
            &right.module_calls,
            config,
        ));
    }
    if config.level_enabled(ComparisonLevel::Outputs) {
        diffs.extend(entities::classify(&left.outputs, &right.outputs, config));
    }
    if config.level_enabled(ComparisonLevel::Resources) {
        diffs.extend(entities::classify(&left.resources, &right.resources, config));
    }
    if config.level_enabled(ComparisonLevel::DataSources) {
        diffs.extend(entities::classify(
            &left.data_sources,
            &right.data_sources,
            config,
        ));
    }
    if config.level_enabled(ComparisonLevel::Variables) {
        diffs.extend(entities::classify(&left.variables, &right.variables, config));
    }

    sort_diffs(&mut diffs);
    let summary = summarize(&diffs);

    ComparisonResult {
        left_path: left.path.clone(),
        right_path: right.path.clone(),
        diffs,
        summary,
    }
}

/// Sort diffs by (level name, diff kind, identity key), ascending.
///
/// The order is total and stable across runs, so repeated invocations with
/// identical inputs produce identically ordered diff lists.
pub fn sort_diffs(diffs: &mut [Diff]) {
    diffs.sort_by(|a, b| {
        (a.level, a.kind, &a.element).cmp(&(b.level, b.kind, &b.element))
    });
}

/// Compute summary counts with a single scan over the final diff sequence.
fn summarize(diffs: &[Diff]) -> DiffSummary {
    let mut summary = DiffSummary::default();
    for diff in diffs {
        match diff.kind {
            DiffKind::Added => summary.added += 1,
            DiffKind::Removed => summary.removed += 1,
            DiffKind::Modified => summary.modified += 1,
        }
    }
    summary.total = diffs.len();
    summary
}
