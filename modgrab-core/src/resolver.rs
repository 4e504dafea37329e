// modgrab-core/src/resolver.rs
use std::collections::HashSet;
use std::sync::Arc;

use modgrab_common::config::Config;
use modgrab_common::error::{ModError, Result};
use modgrab_common::event::{Phase, ProgressEvent, ProgressSink};
use modgrab_common::graph::{Conflict, DependencyGraph, ModNode, NodeCategory};
use modgrab_common::model::DependencyType;
use modgrab_net::api::Registry;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::dependency::{Dependency, DependencyRef};
use crate::package::Mod;

/// Which resolution steps a fan-out runs per mod.
#[derive(Debug, Clone, Copy)]
enum Stage {
    Project,
    Version,
    /// Project then version, used for mods discovered as dependencies.
    /// Already-completed steps are skipped.
    Full,
}

/// Final output of dependency resolution: the frozen graph, the resolved mods
/// to hand to the downloader, and the aggregated domain errors and notices.
#[derive(Debug)]
pub struct Resolution {
    pub graph: DependencyGraph,
    pub mods: Vec<Mod>,
    pub errors: Vec<ModError>,
    pub notices: Vec<String>,
}

impl Resolution {
    /// The run proceeds to download only if no fatal domain error survived
    /// optional-chain pruning.
    pub fn should_continue(&self) -> bool {
        self.errors.is_empty()
    }

    fn halted(errors: Vec<ModError>) -> Self {
        Self {
            graph: DependencyGraph::default(),
            mods: Vec::new(),
            errors,
            notices: Vec::new(),
        }
    }
}

/// Breadth-first frontier expansion over the registry: resolve every mod in
/// the current level, collect its typed dependencies, turn the unseen targets
/// into the next level. Levels never overlap; dedup-by-id depends on each
/// level's discoveries being recorded before the next level resolves.
pub struct DependencyResolver<R> {
    registry: Arc<R>,
    config: Arc<Config>,
    sink: Arc<dyn ProgressSink>,
}

impl<R: Registry + 'static> DependencyResolver<R> {
    pub fn new(registry: Arc<R>, config: Arc<Config>, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            registry,
            config,
            sink,
        }
    }

    /// Resolves the seed set and expands it into the full dependency graph.
    /// Seed failures halt before expansion; a transport-class error anywhere
    /// aborts the worker pool and propagates.
    pub async fn resolve(&self, seeds: Vec<Mod>) -> Result<Resolution> {
        let results = self
            .resolve_stage(seeds, Stage::Project, Phase::ResolveProjects, true)
            .await?;
        let (seeds, errors) = split_results(results);
        if !errors.is_empty() {
            return Ok(Resolution::halted(errors));
        }

        let results = self
            .resolve_stage(seeds, Stage::Version, Phase::ResolveVersions, true)
            .await?;
        let (seeds, errors) = split_results(results);
        if !errors.is_empty() {
            return Ok(Resolution::halted(errors));
        }

        self.expand(seeds).await
    }

    /// Runs one resolution stage over a set of mods concurrently, bounded by
    /// the worker pool. Domain failures are collected per mod; the first
    /// transport-class failure stops every other worker and propagates.
    /// Results come back in input order so downstream graph mutation is
    /// deterministic.
    async fn resolve_stage(
        &self,
        mods: Vec<Mod>,
        stage: Stage,
        phase: Phase,
        announce: bool,
    ) -> Result<Vec<(Mod, Option<ModError>)>> {
        if announce {
            self.sink.emit(ProgressEvent::PhaseStarted {
                phase,
                total: Some(mods.len()),
            });
        }

        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let mut tasks = JoinSet::new();
        for (idx, mut item) in mods.into_iter().enumerate() {
            let registry = Arc::clone(&self.registry);
            let config = Arc::clone(&self.config);
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| ModError::State(format!("worker pool closed: {e}")))?;
            tasks.spawn(async move {
                let _permit = permit;
                let result = async {
                    match stage {
                        Stage::Project => {
                            item.resolve_project(
                                registry.as_ref(),
                                config.require_client,
                                config.require_server,
                            )
                            .await
                        }
                        Stage::Version => {
                            item.resolve_version(
                                registry.as_ref(),
                                &config.game_version,
                                &config.loader,
                            )
                            .await
                        }
                        Stage::Full => {
                            item.resolve_project(
                                registry.as_ref(),
                                config.require_client,
                                config.require_server,
                            )
                            .await?;
                            item.resolve_version(
                                registry.as_ref(),
                                &config.game_version,
                                &config.loader,
                            )
                            .await
                        }
                    }
                }
                .await;
                (idx, item, result)
            });
        }

        let mut collected = Vec::new();
        let mut fatal: Option<ModError> = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, item, Ok(()))) => {
                    self.sink.emit(ProgressEvent::Advanced {
                        phase,
                        message: stage_message(stage, &item),
                    });
                    collected.push((idx, item, None));
                }
                Ok((idx, item, Err(e))) if e.is_domain() => {
                    warn!("{}", e);
                    self.sink.emit(ProgressEvent::Advanced {
                        phase,
                        message: format!("warning: {e}"),
                    });
                    collected.push((idx, item, Some(e)));
                }
                Ok((_, _, Err(e))) => {
                    fatal = Some(e);
                    tasks.abort_all();
                    break;
                }
                Err(join_err) => {
                    fatal = Some(ModError::State(format!("worker task failed: {join_err}")));
                    tasks.abort_all();
                    break;
                }
            }
        }
        if announce {
            self.sink.emit(ProgressEvent::PhaseFinished { phase });
        }
        if let Some(e) = fatal {
            return Err(e);
        }

        collected.sort_by_key(|(idx, ..)| *idx);
        Ok(collected.into_iter().map(|(_, m, e)| (m, e)).collect())
    }

    /// Resolves version-pinned dependency references concurrently. Same
    /// error policy as `resolve_stage`.
    async fn fetch_pinned(
        &self,
        deps: Vec<(String, Dependency)>,
    ) -> Result<Vec<(String, Dependency, Result<Mod>)>> {
        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let mut tasks = JoinSet::new();
        for (idx, (parent_id, dep)) in deps.into_iter().enumerate() {
            let registry = Arc::clone(&self.registry);
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| ModError::State(format!("worker pool closed: {e}")))?;
            tasks.spawn(async move {
                let _permit = permit;
                let result = dep.resolve(registry.as_ref()).await;
                (idx, parent_id, dep, result)
            });
        }

        let mut collected = Vec::new();
        let mut fatal: Option<ModError> = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, parent_id, dep, result)) => {
                    match &result {
                        Err(e) if !e.is_domain() => {
                            fatal = Some(e.clone());
                            tasks.abort_all();
                            break;
                        }
                        Err(e) => warn!("pinned dependency of {parent_id} failed: {e}"),
                        Ok(m) => debug!("pinned dependency resolved: {}", m.slug_or_id()),
                    }
                    collected.push((idx, parent_id, dep, result));
                }
                Err(join_err) => {
                    fatal = Some(ModError::State(format!("worker task failed: {join_err}")));
                    tasks.abort_all();
                    break;
                }
            }
        }
        if let Some(e) = fatal {
            return Err(e);
        }

        collected.sort_by_key(|(idx, ..)| *idx);
        Ok(collected
            .into_iter()
            .map(|(_, p, d, r)| (p, d, r))
            .collect())
    }

    /// Level-by-level frontier expansion, then graph post-processing.
    async fn expand(&self, seeds: Vec<Mod>) -> Result<Resolution> {
        let mut graph = DependencyGraph::default();
        let mut errors: Vec<ModError> = Vec::new();
        let mut notices: Vec<String> = Vec::new();
        let mut mods: Vec<Mod> = Vec::new();
        let mut finalized: HashSet<String> = HashSet::new();

        let mut seed_ids: HashSet<String> = HashSet::new();
        for m in &seeds {
            seed_ids.insert(m.project_id()?.to_string());
        }

        self.sink.emit(ProgressEvent::PhaseStarted {
            phase: Phase::ResolveDependencies,
            total: None,
        });

        let mut frontier = seeds;
        while !frontier.is_empty() {
            // Resolve sub-phase. Seeds arrive already resolved and pass
            // through; pinned mods only need their project metadata.
            let results = self
                .resolve_stage(frontier, Stage::Full, Phase::ResolveDependencies, false)
                .await?;
            frontier = Vec::new();

            // Merge in frontier order; the expansion policy below depends on
            // it being deterministic.
            let mut level: Vec<(String, Vec<Dependency>)> = Vec::new();
            for (m, err) in results {
                let id = m
                    .project_id()
                    .unwrap_or_else(|_| m.slug_or_id())
                    .to_string();
                if !finalized.insert(id.clone()) {
                    continue;
                }
                match err {
                    None => {
                        let node = ModNode::resolved(
                            m.title()?,
                            m.slug()?,
                            m.version()?.id.clone(),
                        );
                        graph.insert_node(&id, node);
                        level.push((id, m.dependencies()?));
                        mods.push(m);
                    }
                    Some(e) => {
                        // Keep the unreachable node so incompatibility checks
                        // and pruning can still see it.
                        let title = m
                            .title()
                            .unwrap_or_else(|_| m.slug_or_id())
                            .to_string();
                        graph.insert_node(&id, ModNode::failed(title));
                        errors.push(e);
                    }
                }
            }

            // Expand sub-phase: apply dependency-type policy, record edges,
            // queue unseen targets.
            let mut pinned: Vec<(String, Dependency)> = Vec::new();
            for (parent_id, deps) in level {
                for dep in deps {
                    let dropped = dep.dep_type == DependencyType::Incompatible
                        || (dep.dep_type == DependencyType::Optional
                            && !self.config.allow_optional);
                    match dep.known_project_id() {
                        Some(pid) => {
                            let pid = pid.to_string();
                            let known = graph.contains(&pid);
                            // An incompatible or dropped-optional target only
                            // matters once something else draws it in.
                            if dropped && !known {
                                continue;
                            }
                            graph.add_edge(&pid, &parent_id, dep.dep_type);
                            if dropped || known {
                                continue;
                            }
                            graph.insert_node(&pid, ModNode::pending(&pid));
                            match &dep.target {
                                DependencyRef::Project(_) => match Mod::new(&pid) {
                                    Ok(m) => frontier.push(m),
                                    Err(e) => {
                                        graph.insert_node(&pid, ModNode::failed(pid.clone()));
                                        finalized.insert(pid);
                                        errors.push(e);
                                    }
                                },
                                DependencyRef::Version(_) => {
                                    pinned.push((parent_id.clone(), dep));
                                }
                            }
                        }
                        None => {
                            if dropped {
                                continue;
                            }
                            pinned.push((parent_id.clone(), dep));
                        }
                    }
                }
            }

            if !pinned.is_empty() {
                for (parent_id, dep, result) in self.fetch_pinned(pinned).await? {
                    match result {
                        Ok(m) => match dep.known_project_id() {
                            // Edge and placeholder were recorded before the
                            // fetch.
                            Some(_) => frontier.push(m),
                            None => {
                                let pid = m.slug_or_id().to_string();
                                let known = graph.contains(&pid);
                                graph.add_edge(&pid, &parent_id, dep.dep_type);
                                if known {
                                    continue;
                                }
                                graph.insert_node(&pid, ModNode::pending(&pid));
                                frontier.push(m);
                            }
                        },
                        Err(e) => {
                            if let Some(pid) = dep.known_project_id() {
                                graph.insert_node(pid, ModNode::failed(pid.to_string()));
                                finalized.insert(pid.to_string());
                            }
                            errors.push(e);
                        }
                    }
                }
            }
        }

        self.sink.emit(ProgressEvent::PhaseFinished {
            phase: Phase::ResolveDependencies,
        });

        let mut errors = prune_optional_chains(&mut graph, errors, &mut notices);
        detect_conflicts(&graph, &mut errors);
        categorize_nodes(&mut graph, &seed_ids);

        Ok(Resolution {
            graph,
            mods,
            errors,
            notices,
        })
    }
}

fn split_results(results: Vec<(Mod, Option<ModError>)>) -> (Vec<Mod>, Vec<ModError>) {
    let mut mods = Vec::new();
    let mut errors = Vec::new();
    for (m, err) in results {
        match err {
            None => mods.push(m),
            Some(e) => errors.push(e),
        }
    }
    (mods, errors)
}

fn stage_message(stage: Stage, m: &Mod) -> String {
    let name = m.title().unwrap_or_else(|_| m.slug_or_id());
    match stage {
        Stage::Project => format!("resolved {name}"),
        Stage::Version | Stage::Full => match m.version() {
            Ok(v) => format!("found {} {}", name, v.version_number),
            Err(_) => format!("resolved {name}"),
        },
    }
}

/// A `NotFound` target nothing actually requires is downgraded to a notice:
/// the node, its error, and its incident edges are removed. Applies only when
/// at least one edge points at the node and every one of them is optional.
fn prune_optional_chains(
    graph: &mut DependencyGraph,
    errors: Vec<ModError>,
    notices: &mut Vec<String>,
) -> Vec<ModError> {
    let mut kept = Vec::new();
    for err in errors {
        if let ModError::NotFound { target, .. } = &err {
            if graph.contains(target) {
                let mut incoming = 0usize;
                let mut all_optional = true;
                for edge in graph.dependents_of(target) {
                    incoming += 1;
                    if edge.dep_type != DependencyType::Optional {
                        all_optional = false;
                    }
                }
                if incoming > 0 && all_optional {
                    notices.push(format!(
                        "skipped optional dependency '{}': {}",
                        graph.title_of(target),
                        err
                    ));
                    graph.remove_node(target);
                    continue;
                }
            }
        }
        kept.push(err);
    }
    kept
}

/// Emits one structured conflict per incompatible edge. Only edges whose
/// source is the incompatible target are inspected; declarations made by the
/// target itself in the reverse direction are not.
fn detect_conflicts(graph: &DependencyGraph, errors: &mut Vec<ModError>) {
    for edge in graph
        .edges
        .iter()
        .filter(|e| e.dep_type == DependencyType::Incompatible)
    {
        let required_by: Vec<String> = graph
            .dependents_of(&edge.source)
            .filter(|e| {
                matches!(
                    e.dep_type,
                    DependencyType::Required | DependencyType::Optional
                )
            })
            .map(|e| graph.title_of(&e.sink))
            .collect();
        errors.push(ModError::Incompatible(Conflict {
            declarer: graph.title_of(&edge.sink),
            target: graph.title_of(&edge.source),
            required_by,
        }));
    }
}

/// Presentation only; computed after the graph is frozen and never fed back
/// into resolution.
fn categorize_nodes(graph: &mut DependencyGraph, seed_ids: &HashSet<String>) {
    let mut optional_only: HashSet<String> = HashSet::new();
    let mut has_other: HashSet<String> = HashSet::new();
    for edge in &graph.edges {
        if edge.dep_type == DependencyType::Optional {
            optional_only.insert(edge.source.clone());
        } else {
            has_other.insert(edge.source.clone());
        }
    }

    for (id, node) in graph.nodes.iter_mut() {
        node.category = if !node.resolved {
            NodeCategory::Failed
        } else if seed_ids.contains(id) {
            NodeCategory::Seed
        } else if optional_only.contains(id) && !has_other.contains(id) {
            NodeCategory::OptionalOnly
        } else {
            NodeCategory::Dependency
        };
    }
}

#[cfg(test)]
mod tests {
    use modgrab_common::event::NoopSink;
    use modgrab_common::model::DependencyType;

    use super::*;
    use crate::testutil::{dep_on, fixture_config, pinned_dep, FakeRegistry};

    fn resolver(registry: FakeRegistry, config: Config) -> DependencyResolver<FakeRegistry> {
        DependencyResolver::new(Arc::new(registry), Arc::new(config), Arc::new(NoopSink))
    }

    fn seeds(names: &[&str]) -> Vec<Mod> {
        names.iter().map(|n| Mod::new(n).unwrap()).collect()
    }

    #[tokio::test]
    async fn resolves_required_dependency_and_reports_conflict() {
        // A requires C; B declares C incompatible. The graph must contain all
        // three, both edges, and one conflict naming A as the mod that still
        // needs C.
        let mut registry = FakeRegistry::default();
        registry.add_project("aaa", "alpha", "Alpha");
        registry.add_project("bbb", "beta", "Beta");
        registry.add_project("ccc", "gamma", "Gamma");
        registry.add_version("aaa", "a1", vec![dep_on("ccc", DependencyType::Required)]);
        registry.add_version("bbb", "b1", vec![dep_on("ccc", DependencyType::Incompatible)]);
        registry.add_version("ccc", "c1", vec![]);

        let resolution = resolver(registry, fixture_config())
            .resolve(seeds(&["alpha", "beta"]))
            .await
            .unwrap();

        assert_eq!(resolution.graph.nodes.len(), 3);
        assert!(resolution.graph.contains("ccc"));
        let edge_kinds: Vec<_> = resolution
            .graph
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.sink.as_str(), e.dep_type))
            .collect();
        assert!(edge_kinds.contains(&("ccc", "aaa", DependencyType::Required)));
        assert!(edge_kinds.contains(&("ccc", "bbb", DependencyType::Incompatible)));

        assert_eq!(resolution.errors.len(), 1);
        match &resolution.errors[0] {
            ModError::Incompatible(conflict) => {
                assert_eq!(conflict.declarer, "Beta");
                assert_eq!(conflict.target, "Gamma");
                assert_eq!(conflict.required_by, vec!["Alpha".to_string()]);
            }
            other => panic!("expected an incompatibility, got {other:?}"),
        }
        assert!(!resolution.should_continue());
    }

    #[tokio::test]
    async fn shared_dependency_is_resolved_once() {
        let mut registry = FakeRegistry::default();
        registry.add_project("aaa", "alpha", "Alpha");
        registry.add_project("bbb", "beta", "Beta");
        registry.add_project("ccc", "gamma", "Gamma");
        registry.add_version("aaa", "a1", vec![dep_on("ccc", DependencyType::Required)]);
        registry.add_version("bbb", "b1", vec![dep_on("ccc", DependencyType::Required)]);
        registry.add_version("ccc", "c1", vec![]);
        let calls = registry.call_log();

        let resolution = resolver(registry, fixture_config())
            .resolve(seeds(&["alpha", "beta"]))
            .await
            .unwrap();

        assert!(resolution.should_continue());
        assert_eq!(resolution.graph.nodes.len(), 3);
        // both edges survive even though the node is shared
        assert_eq!(resolution.graph.dependents_of("ccc").count(), 2);
        // the shared target was fetched exactly once
        let gamma_fetches = calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == "project:ccc")
            .count();
        assert_eq!(gamma_fetches, 1);
    }

    #[tokio::test]
    async fn cyclic_dependencies_terminate() {
        let mut registry = FakeRegistry::default();
        registry.add_project("aaa", "alpha", "Alpha");
        registry.add_project("bbb", "beta", "Beta");
        registry.add_version("aaa", "a1", vec![dep_on("bbb", DependencyType::Required)]);
        registry.add_version("bbb", "b1", vec![dep_on("aaa", DependencyType::Required)]);

        let resolution = resolver(registry, fixture_config())
            .resolve(seeds(&["alpha"]))
            .await
            .unwrap();

        assert!(resolution.should_continue());
        assert_eq!(resolution.graph.nodes.len(), 2);
        assert_eq!(resolution.graph.edges.len(), 2);
    }

    #[tokio::test]
    async fn unavailable_optional_dependency_is_pruned() {
        let mut registry = FakeRegistry::default();
        registry.add_project("mmm", "muse", "Muse");
        registry.add_project("ddd", "delta", "Delta");
        registry.add_version("mmm", "m1", vec![dep_on("ddd", DependencyType::Optional)]);
        // Delta exists but has no version for the target platform.

        let mut config = fixture_config();
        config.allow_optional = true;
        let resolution = resolver(registry, config)
            .resolve(seeds(&["muse"]))
            .await
            .unwrap();

        assert!(resolution.should_continue(), "{:?}", resolution.errors);
        assert_eq!(resolution.notices.len(), 1);
        assert!(!resolution.graph.contains("ddd"));
        assert!(resolution.graph.edges.is_empty());
    }

    #[tokio::test]
    async fn required_edge_keeps_unavailable_dependency_fatal() {
        let mut registry = FakeRegistry::default();
        registry.add_project("mmm", "muse", "Muse");
        registry.add_project("nnn", "nuuu", "Nuuu");
        registry.add_project("ddd", "delta", "Delta");
        registry.add_version("mmm", "m1", vec![dep_on("ddd", DependencyType::Optional)]);
        registry.add_version("nnn", "n1", vec![dep_on("ddd", DependencyType::Required)]);

        let mut config = fixture_config();
        config.allow_optional = true;
        let resolution = resolver(registry, config)
            .resolve(seeds(&["muse", "nuuu"]))
            .await
            .unwrap();

        assert!(!resolution.should_continue());
        assert!(resolution
            .errors
            .iter()
            .any(|e| matches!(e, ModError::NotFound { target, .. } if target == "ddd")));
        assert!(resolution.graph.contains("ddd"));
    }

    #[tokio::test]
    async fn optional_dependencies_are_skipped_by_default() {
        let mut registry = FakeRegistry::default();
        registry.add_project("mmm", "muse", "Muse");
        registry.add_project("ddd", "delta", "Delta");
        registry.add_version("mmm", "m1", vec![dep_on("ddd", DependencyType::Optional)]);
        registry.add_version("ddd", "d1", vec![]);

        let resolution = resolver(registry, fixture_config())
            .resolve(seeds(&["muse"]))
            .await
            .unwrap();

        assert!(resolution.should_continue());
        assert!(!resolution.graph.contains("ddd"));
        assert!(resolution.graph.edges.is_empty());
    }

    #[tokio::test]
    async fn seed_without_matching_version_halts_the_run() {
        let mut registry = FakeRegistry::default();
        registry.add_project("aaa", "alpha", "Alpha");
        // no versions registered for alpha

        let resolution = resolver(registry, fixture_config())
            .resolve(seeds(&["alpha"]))
            .await
            .unwrap();

        assert!(!resolution.should_continue());
        assert!(resolution.graph.nodes.is_empty());
        assert!(resolution.mods.is_empty());
    }

    #[tokio::test]
    async fn version_pinned_dependency_resolves_through_its_version_id() {
        let mut registry = FakeRegistry::default();
        registry.add_project("aaa", "alpha", "Alpha");
        registry.add_project("ppp", "pivot", "Pivot");
        registry.add_version("ppp", "p7", vec![]);
        // alpha pins pi's version directly and does not name the project
        registry.add_version("aaa", "a1", vec![pinned_dep("p7", DependencyType::Required)]);

        let resolution = resolver(registry, fixture_config())
            .resolve(seeds(&["alpha"]))
            .await
            .unwrap();

        assert!(resolution.should_continue(), "{:?}", resolution.errors);
        assert!(resolution.graph.contains("ppp"));
        let edge = &resolution.graph.edges[0];
        assert_eq!(edge.source, "ppp");
        assert_eq!(edge.sink, "aaa");
        // the pinned version is kept instead of re-selecting one
        assert_eq!(
            resolution.graph.nodes["ppp"].version_id.as_deref(),
            Some("p7")
        );
    }

    #[tokio::test]
    async fn nodes_are_categorized_after_freeze() {
        let mut registry = FakeRegistry::default();
        registry.add_project("aaa", "alpha", "Alpha");
        registry.add_project("rrr", "rho", "Rho");
        registry.add_project("ooo", "omicron", "Omicron");
        registry.add_version(
            "aaa",
            "a1",
            vec![
                dep_on("rrr", DependencyType::Required),
                dep_on("ooo", DependencyType::Optional),
            ],
        );
        registry.add_version("rrr", "r1", vec![]);
        registry.add_version("ooo", "o1", vec![]);

        let mut config = fixture_config();
        config.allow_optional = true;
        let resolution = resolver(registry, config)
            .resolve(seeds(&["alpha"]))
            .await
            .unwrap();

        let nodes = &resolution.graph.nodes;
        assert_eq!(nodes["aaa"].category, NodeCategory::Seed);
        assert_eq!(nodes["rrr"].category, NodeCategory::Dependency);
        assert_eq!(nodes["ooo"].category, NodeCategory::OptionalOnly);
    }

    #[tokio::test]
    async fn transport_failure_aborts_resolution() {
        let mut registry = FakeRegistry::default();
        registry.add_project("aaa", "alpha", "Alpha");
        registry.fail_with_transport("project:broken");

        let result = resolver(registry, fixture_config())
            .resolve(seeds(&["alpha", "broken"]))
            .await;
        assert!(matches!(result, Err(ModError::Api(_))));
    }
}
