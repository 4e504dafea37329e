// modgrab-core/src/dependency.rs
use modgrab_common::error::Result;
use modgrab_common::model::{DependencyType, VersionDependency};
use modgrab_net::api::Registry;

use crate::package::Mod;

/// A dependency entry either pins an exact version or names a project and
/// leaves version selection to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyRef {
    Project(String),
    Version(String),
}

/// One typed dependency declared by a resolved mod's chosen version.
#[derive(Debug, Clone)]
pub struct Dependency {
    pub target: DependencyRef,
    /// Project id as declared on the descriptor, when present. Version-pinned
    /// entries sometimes omit it; the id is then only learned by resolving
    /// the pinned version.
    pub project_id: Option<String>,
    pub dep_type: DependencyType,
    pub file_name: Option<String>,
}

impl Dependency {
    /// Returns None for descriptors carrying no resolvable target (the
    /// registry contains annotation-only entries).
    pub fn from_descriptor(raw: &VersionDependency) -> Option<Self> {
        let target = match (&raw.version_id, &raw.project_id) {
            (Some(version_id), _) => DependencyRef::Version(version_id.clone()),
            (None, Some(project_id)) => DependencyRef::Project(project_id.clone()),
            (None, None) => return None,
        };
        Some(Self {
            target,
            project_id: raw.project_id.clone(),
            dep_type: raw.dependency_type,
            file_name: raw.file_name.clone(),
        })
    }

    /// The target's project id when it is knowable without a registry
    /// round-trip.
    pub fn known_project_id(&self) -> Option<&str> {
        match (&self.project_id, &self.target) {
            (Some(project_id), _) => Some(project_id),
            (None, DependencyRef::Project(project_id)) => Some(project_id),
            (None, DependencyRef::Version(_)) => None,
        }
    }

    /// Resolves the reference into a Mod node. Project refs construct an
    /// unresolved Mod; version refs fetch the pinned version so the resulting
    /// Mod skips version selection entirely.
    pub async fn resolve<R: Registry + ?Sized>(&self, registry: &R) -> Result<Mod> {
        match &self.target {
            DependencyRef::Project(project_id) => Mod::new(project_id),
            DependencyRef::Version(version_id) => {
                let version = registry.version(version_id).await?;
                Ok(Mod::from_pinned_version(version))
            }
        }
    }
}
