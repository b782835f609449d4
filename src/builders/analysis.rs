//! The `analyze` pipeline.
//!
//! Phases, each a pure function of the previous phase's output:
//!
//! 1. validate the configuration (fatal on error)
//! 2. parse every input into a `SourceUnit`, isolating parse failures
//! 3. measure units and build the call graph, concurrently
//! 4. detect dead code once the graph is complete
//! 5. mark unused records and summarize each unit
//!
//! With `parallel` disabled every phase runs on the calling thread; the
//! report is identical either way.

use crate::analysis::{DeadCode, DeadCodeDetector};
use crate::analyzers::analyze_source;
use crate::call_graph::{CallGraphBuild, CallGraphBuilder, FunctionId};
use crate::config::AnalysisConfig;
use crate::core::{AnalysisError, ParseError, SourceInput, SourceUnit};
use crate::metrics::{MetricThresholds, MetricsEngine, UnitMetrics};
use crate::report::{AnalysisReport, UnitSummary};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Analyze a set of source inputs.
///
/// Fails only on an invalid configuration or an empty input set; a unit
/// that cannot be parsed is listed in `failed_units` and skipped.
pub fn analyze(
    inputs: &[SourceInput],
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    config.validate()?;
    if inputs.is_empty() {
        return Err(AnalysisError::NoInput);
    }

    let _span = tracing::info_span!("analyze", units = inputs.len()).entered();

    let (units, failed_units) = parse_units(inputs, config.parallel);
    let engine = MetricsEngine::new(MetricThresholds::from(config));

    let (unit_metrics, build) = if config.parallel {
        rayon::join(
            || measure_units(&engine, &units, true),
            || CallGraphBuilder::new(&units, config.cross_unit_resolution).build(true),
        )
    } else {
        (
            measure_units(&engine, &units, false),
            CallGraphBuilder::new(&units, config.cross_unit_resolution).build(false),
        )
    };

    let dead_code = DeadCodeDetector::new(&units, &build, config).detect();

    tracing::info!(
        parsed = units.len(),
        failed = failed_units.len(),
        unused_functions = dead_code.unused_functions.len(),
        "analysis complete"
    );

    Ok(assemble(
        &units,
        unit_metrics,
        build,
        dead_code,
        failed_units,
        engine.thresholds(),
    ))
}

fn parse_units(inputs: &[SourceInput], parallel: bool) -> (Vec<SourceUnit>, Vec<ParseError>) {
    let results: Vec<Result<SourceUnit, ParseError>> = if parallel {
        inputs.par_iter().map(analyze_source).collect()
    } else {
        inputs.iter().map(analyze_source).collect()
    };

    let mut units = Vec::with_capacity(results.len());
    let mut failed = Vec::new();
    for result in results {
        match result {
            Ok(unit) => units.push(unit),
            Err(err) => {
                tracing::warn!("{err}");
                failed.push(err);
            }
        }
    }
    (units, failed)
}

fn measure_units(engine: &MetricsEngine, units: &[SourceUnit], parallel: bool) -> Vec<UnitMetrics> {
    if parallel {
        units.par_iter().map(|u| engine.measure_unit(u)).collect()
    } else {
        units.iter().map(|u| engine.measure_unit(u)).collect()
    }
}

fn assemble(
    units: &[SourceUnit],
    unit_metrics: Vec<UnitMetrics>,
    build: CallGraphBuild,
    dead_code: DeadCode,
    failed_units: Vec<ParseError>,
    thresholds: &MetricThresholds,
) -> AnalysisReport {
    let unused: BTreeSet<&FunctionId> = dead_code.unused_functions.iter().collect();
    let mut warnings = build.warnings;
    let mut records = Vec::new();
    let mut summaries = Vec::with_capacity(units.len());

    for (unit, metrics) in units.iter().zip(unit_metrics) {
        let mut unit_records = metrics.records;
        for record in &mut unit_records {
            record.unused = unused.contains(&record.id);
        }
        warnings.extend(metrics.warnings);

        let unit_variables: Vec<_> = dead_code
            .unused_variables
            .iter()
            .filter(|v| v.unit == unit.path)
            .collect();
        let record_refs: Vec<_> = unit_records.iter().collect();
        summaries.push(UnitSummary::build(
            unit,
            &record_refs,
            metrics.maintainability_index,
            &unit_variables,
            thresholds,
        ));
        records.extend(unit_records);
    }

    AnalysisReport {
        records,
        call_graph: build.graph,
        unused_functions: dead_code.unused_functions,
        unused_variables: dead_code.unused_variables,
        summaries,
        failed_units,
        warnings,
    }
}
