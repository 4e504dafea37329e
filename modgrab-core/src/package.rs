// modgrab-core/src/package.rs
use std::sync::LazyLock;

use modgrab_common::error::{ModError, Result};
use modgrab_common::model::{Project, SideSupport, Version, VersionFile};
use modgrab_net::api::Registry;
use regex::Regex;
use tracing::{debug, warn};

use crate::dependency::Dependency;

/// Modrinth's slug grammar. Project ids happen to match it too.
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[\w!@$()`.+,"\-']{3,64}$"#).unwrap());

/// One mod's resolution lifecycle: constructed from a slug/id/URL, then
/// resolved in stages (project metadata, matching version, downloadable
/// file). Each instance is owned by exactly one in-flight task at a time;
/// accessors for a stage fail with a contract error until that stage has run.
#[derive(Debug, Clone)]
pub struct Mod {
    slug: String,
    project: Option<Project>,
    version: Option<Version>,
    file: Option<VersionFile>,
}

impl Mod {
    /// Accepts a bare slug, a project id, or a modrinth.com project URL (the
    /// slug is the last path segment). Validation is synchronous; a malformed
    /// identifier fails this one entry only.
    pub fn new(input: &str) -> Result<Self> {
        let slug = input.rsplit('/').next().unwrap_or(input);
        if !SLUG_RE.is_match(slug) {
            return Err(ModError::InvalidSlug(slug.to_string()));
        }
        Ok(Self {
            slug: slug.to_string(),
            project: None,
            version: None,
            file: None,
        })
    }

    /// A mod discovered through a version-pinned dependency: the version, and
    /// with it the owning project id, is already chosen.
    pub(crate) fn from_pinned_version(version: Version) -> Self {
        Self {
            slug: version.project_id.clone(),
            project: None,
            version: Some(version),
            file: None,
        }
    }

    /// The identifier this mod was constructed from: a user-supplied slug for
    /// seeds, a project id for discovered dependencies.
    pub fn slug_or_id(&self) -> &str {
        &self.slug
    }

    pub fn is_project_resolved(&self) -> bool {
        self.project.is_some()
    }

    pub fn project_id(&self) -> Result<&str> {
        self.project
            .as_ref()
            .map(|p| p.id.as_str())
            .ok_or_else(|| self.state_error("project"))
    }

    pub fn title(&self) -> Result<&str> {
        self.project
            .as_ref()
            .map(|p| p.title.as_str())
            .ok_or_else(|| self.state_error("project"))
    }

    pub fn slug(&self) -> Result<&str> {
        self.project
            .as_ref()
            .map(|p| p.slug.as_str())
            .ok_or_else(|| self.state_error("project"))
    }

    pub fn version(&self) -> Result<&Version> {
        self.version.as_ref().ok_or_else(|| self.state_error("version"))
    }

    pub fn file(&self) -> Result<&VersionFile> {
        self.file.as_ref().ok_or_else(|| self.state_error("file"))
    }

    fn state_error(&self, stage: &str) -> ModError {
        ModError::State(format!("mod '{}' has no resolved {stage}", self.slug))
    }

    /// Fetches project metadata. A 404 becomes a `NotFound` tagged with the
    /// attempted identifier. When a side is required and the project declares
    /// it unsupported the mod is treated exactly like one with no compatible
    /// release; an undeclared side only warns.
    pub async fn resolve_project<R: Registry + ?Sized>(
        &mut self,
        registry: &R,
        require_client: bool,
        require_server: bool,
    ) -> Result<()> {
        if self.project.is_some() {
            return Ok(());
        }
        debug!("Resolving project '{}'", self.slug);
        let project = registry.project(&self.slug).await?;
        if require_client {
            check_side(&project, project.client_side, "client")?;
        }
        if require_server {
            check_side(&project, project.server_side, "server")?;
        }
        debug!("Resolved '{}' as {} ({})", self.slug, project.title, project.id);
        self.project = Some(project);
        Ok(())
    }

    /// Picks the newest release matching both the game version and the
    /// loader. The server-side filter is only a hint; the membership check
    /// here is the actual selection rule, and "first match" means "most
    /// recent" because the registry lists versions newest-first.
    pub async fn resolve_version<R: Registry + ?Sized>(
        &mut self,
        registry: &R,
        game_version: &str,
        loader: &str,
    ) -> Result<()> {
        if self.version.is_some() {
            return Ok(());
        }
        let project = self.project.as_ref().ok_or_else(|| self.state_error("project"))?;
        let versions = registry.versions(&project.id, loader, game_version).await?;
        let chosen = versions.into_iter().find(|v| {
            v.game_versions.iter().any(|g| g == game_version)
                && v.loaders.iter().any(|l| l == loader)
        });
        match chosen {
            Some(version) => {
                debug!("Found version {} {}", project.title, version.version_number);
                self.version = Some(version);
                Ok(())
            }
            None => Err(ModError::not_found(
                &project.id,
                format!(
                    "{} has no version for {} ({})",
                    project.title, game_version, loader
                ),
            )),
        }
    }

    /// Fetches the full version record and takes its first file entry as the
    /// download target; first-is-primary is the registry's own convention.
    pub async fn resolve_file<R: Registry + ?Sized>(&mut self, registry: &R) -> Result<()> {
        if self.file.is_some() {
            return Ok(());
        }
        let (version_id, version_number) = {
            let version = self.version.as_ref().ok_or_else(|| self.state_error("version"))?;
            (version.id.clone(), version.version_number.clone())
        };
        let detail = registry.version(&version_id).await?;
        match detail.files.into_iter().next() {
            Some(file) => {
                debug!("File for {} {}: {}", self.slug, version_number, file.filename);
                self.file = Some(file);
                Ok(())
            }
            None => Err(ModError::not_found(
                self.project_id().unwrap_or(&self.slug),
                format!("{} {} has no downloadable file", self.slug, version_number),
            )),
        }
    }

    /// Typed dependencies of the chosen version. Descriptors carrying no
    /// resolvable target are dropped silently.
    pub fn dependencies(&self) -> Result<Vec<Dependency>> {
        let version = self.version.as_ref().ok_or_else(|| self.state_error("version"))?;
        Ok(version
            .dependencies
            .iter()
            .filter_map(Dependency::from_descriptor)
            .collect())
    }
}

fn check_side(project: &Project, support: SideSupport, side: &str) -> Result<()> {
    match support {
        SideSupport::Unsupported => Err(ModError::not_found(
            &project.id,
            format!("{} does not support the {side} side", project.title),
        )),
        SideSupport::Unknown => {
            warn!(
                "{} does not declare {side}-side support; continuing anyway",
                project.title
            );
            Ok(())
        }
        SideSupport::Required | SideSupport::Optional => Ok(()),
    }
}
