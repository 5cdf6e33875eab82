//! Decides what the generator has to redo.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use layoutbind_common::LayoutName;
use layoutbind_diagnostics::{codes, Diagnostic, DiagnosticSink, Severity};
use layoutbind_store::{merge_artifacts, DependencyLog, MetadataLog, StoreError};

use crate::args::ResolverArgs;
use crate::descriptors::{family_of, list_descriptor_files};
use crate::graph::DependencyGraph;
use crate::result::{FullBuildReason, ResolutionMode, ResolutionResult};

/// Resolves which classes are stale and which descriptor files must be parsed.
///
/// A missing or unreadable previous log, or a non-incremental request, results
/// in a full build; the reason is recorded in `sink`. Invalid upstream
/// artifacts are skipped with a warning. The only error is a descriptor folder
/// that exists but cannot be listed.
pub fn resolve(args: &ResolverArgs, sink: &DiagnosticSink) -> Result<ResolutionResult, StoreError> {
    let present = list_descriptor_files(&args.info_dir)?;
    let upstream = merge_artifacts(&args.dependency_dirs, &args.package, sink).classes;

    let result = match previous_log(args, sink) {
        Ok(previous) => resolve_incremental(args, present, upstream, &previous, sink),
        Err((reason, previous)) => resolve_full(present, upstream, previous, reason, sink),
    };

    tracing::debug!(
        full = result.mode.is_full(),
        invalidated = result.invalidated_classes.len(),
        files = result.files_to_consider.len(),
        existing = result.existing_binding_classes.len(),
        warnings = sink.count_at_least(Severity::Warning),
        "resolved incremental build"
    );
    Ok(result)
}

/// Loads the previous log if it can be trusted. Otherwise returns why not, and
/// whatever classes the old log still names so they can be invalidated.
fn previous_log(
    args: &ResolverArgs,
    sink: &DiagnosticSink,
) -> Result<DependencyLog, (FullBuildReason, Option<DependencyLog>)> {
    let path = args.log_path();
    if !args.incremental {
        sink.emit(
            Diagnostic::new(
                Severity::Help,
                codes::FULL_BUILD_REQUESTED,
                "non-incremental build, regenerating every class",
            )
            .with_path(&path),
        );
        return Err((
            FullBuildReason::NotIncremental,
            DependencyLog::read(&path).ok().flatten(),
        ));
    }

    match DependencyLog::read(&path) {
        Ok(Some(log)) => Ok(log),
        Ok(None) => {
            sink.emit(
                Diagnostic::note(
                    codes::MISSING_LOG,
                    "no dependency log from a previous build, regenerating every class",
                )
                .with_path(&path),
            );
            Err((FullBuildReason::MissingLog, None))
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unusable dependency log");
            sink.emit(
                Diagnostic::warning(
                    codes::CORRUPT_LOG,
                    "dependency log from the previous build is unusable, regenerating every class",
                )
                .with_path(&path)
                .with_note(e.to_string()),
            );
            Err((FullBuildReason::CorruptLog(e.to_string()), None))
        }
    }
}

fn resolve_full(
    present: BTreeSet<PathBuf>,
    upstream: MetadataLog,
    previous: Option<DependencyLog>,
    reason: FullBuildReason,
    sink: &DiagnosticSink,
) -> ResolutionResult {
    tracing::debug!(%reason, "full build");

    let invalidated_classes = previous
        .map(|log| {
            log.class_log()
                .qualified_names(log.class_log().mappings().keys())
        })
        .unwrap_or_default();

    let local: BTreeSet<LayoutName> = present.iter().filter_map(|p| family_of(p)).collect();
    let mut existing = MetadataLog::new();
    add_visible_upstream(&mut existing, &upstream, &local, sink);

    ResolutionResult {
        invalidated_classes,
        files_to_consider: present.clone(),
        existing_binding_classes: existing,
        unchanged_log: DependencyLog::new(),
        mode: ResolutionMode::Full(reason),
        dependency_classes: upstream,
        present_files: present,
    }
}

fn resolve_incremental(
    args: &ResolverArgs,
    present: BTreeSet<PathBuf>,
    upstream: MetadataLog,
    previous: &DependencyLog,
    sink: &DiagnosticSink,
) -> ResolutionResult {
    let local_log = previous.class_log();
    let recorded_upstream = previous.dependency_classes();
    let present_families: BTreeSet<LayoutName> =
        present.iter().filter_map(|p| family_of(p)).collect();

    let known = |name: &str| {
        local_log.contains(name)
            || present_families.contains(name)
            || upstream.contains(name)
            || recorded_upstream.contains(name)
    };
    let graph = DependencyGraph::build(previous, known);

    let mut seeds: BTreeSet<LayoutName> = args
        .removed
        .iter()
        .chain(&args.out_of_date)
        .filter_map(|p| family_of(p))
        .collect();

    // Upstream classes that appeared, changed, or vanished since the last run.
    let changed_upstream: BTreeSet<LayoutName> = recorded_upstream
        .diff(&upstream)
        .into_iter()
        .filter(|name| !local_log.contains(name))
        .collect();
    for name in &changed_upstream {
        seeds.extend(graph.dependents_of(name).cloned());
    }
    tracing::debug!(
        seeds = seeds.len(),
        changed_upstream = changed_upstream.len(),
        dangling = graph.dangling_count(),
        "seeded invalidation"
    );

    let invalidated = graph.invalidation_closure(seeds);

    let invalidated_classes = local_log.qualified_names(&invalidated);

    let removed: BTreeSet<&PathBuf> = args.removed.iter().collect();
    let files_to_consider: BTreeSet<PathBuf> = args
        .out_of_date
        .iter()
        .filter(|p| family_of(p).is_some())
        .chain(present.iter().filter(|p| {
            family_of(p).is_some_and(|family| invalidated.contains(&family))
        }))
        .filter(|p| !removed.contains(p))
        .cloned()
        .collect();

    // Only edges between surviving classes, or into current upstream classes.
    let mut unchanged_log = previous.clone();
    unchanged_log.set_dependency_classes(MetadataLog::new());
    unchanged_log.set_input_fingerprints(BTreeMap::new());
    unchanged_log
        .class_log_mut()
        .retain(|name, _| !invalidated.contains(name));
    let kept: BTreeSet<LayoutName> = unchanged_log.class_log().mappings().keys().cloned().collect();
    unchanged_log.retain_edges(|from, to| {
        kept.contains(from)
            && !graph.is_dangling(from, to)
            && (kept.contains(to) || upstream.contains(to))
    });

    let mut local_families = present_families;
    local_families.extend(kept);
    let mut existing = unchanged_log.class_log().clone();
    add_visible_upstream(&mut existing, &upstream, &local_families, sink);

    ResolutionResult {
        invalidated_classes,
        files_to_consider,
        existing_binding_classes: existing,
        unchanged_log,
        mode: ResolutionMode::Incremental,
        dependency_classes: upstream,
        present_files: present,
    }
}

/// Adds upstream classes to `existing` unless a local family of the same name
/// takes precedence.
fn add_visible_upstream(
    existing: &mut MetadataLog,
    upstream: &MetadataLog,
    local_families: &BTreeSet<LayoutName>,
    sink: &DiagnosticSink,
) {
    for (name, descriptor) in upstream.mappings() {
        if local_families.contains(name) {
            sink.emit(
                Diagnostic::note(
                    codes::SHADOWED_EXTERNAL_CLASS,
                    format!(
                        "local layout '{name}' shadows '{}' from an upstream module",
                        descriptor.qualified_name
                    ),
                )
                .with_help("rename one of the layouts to use both classes"),
            );
            continue;
        }
        if !existing.contains(name) {
            existing.put(name.clone(), descriptor.clone());
        }
    }
}
