// modgrab-core/src/testutil.rs
//! In-memory registry backing the resolver and downloader tests.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use modgrab_common::config::Config;
use modgrab_common::error::{ModError, Result};
use modgrab_common::model::{
    DependencyType, FileHashes, Project, SideSupport, Version, VersionDependency, VersionFile,
};
use modgrab_net::api::Registry;
use modgrab_net::validation::verify_sha512;
use sha2::{Digest, Sha512};

#[derive(Default)]
pub struct FakeRegistry {
    projects: HashMap<String, Project>,
    versions_by_project: HashMap<String, Vec<Version>>,
    versions_by_id: HashMap<String, Version>,
    files: HashMap<String, Vec<u8>>,
    transport_failures: Vec<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeRegistry {
    pub fn add_project(&mut self, id: &str, slug: &str, title: &str) {
        self.projects.insert(
            id.to_string(),
            Project {
                id: id.to_string(),
                slug: slug.to_string(),
                title: title.to_string(),
                client_side: SideSupport::Required,
                server_side: SideSupport::Required,
            },
        );
    }

    pub fn add_version(
        &mut self,
        project_id: &str,
        version_id: &str,
        dependencies: Vec<VersionDependency>,
    ) {
        let version = Version {
            id: version_id.to_string(),
            project_id: project_id.to_string(),
            version_number: format!("{version_id}.0"),
            dependencies,
            game_versions: vec!["1.20.1".to_string()],
            loaders: vec!["fabric".to_string()],
            files: Vec::new(),
        };
        self.versions_by_id
            .insert(version_id.to_string(), version.clone());
        self.versions_by_project
            .entry(project_id.to_string())
            .or_default()
            .push(version);
    }

    /// Attaches a downloadable file to an existing version and serves its
    /// bytes. The declared digest defaults to the real one; pass an override
    /// to simulate registry/CDN disagreement.
    pub fn add_file(
        &mut self,
        version_id: &str,
        filename: &str,
        bytes: &[u8],
        declared_sha512: Option<&str>,
    ) {
        let url = format!("https://cdn.invalid/{filename}");
        let sha512 = declared_sha512
            .map(str::to_string)
            .unwrap_or_else(|| hex::encode(Sha512::digest(bytes)));
        let file = VersionFile {
            hashes: FileHashes { sha512, sha1: None },
            url: url.clone(),
            filename: filename.to_string(),
            primary: true,
            size: bytes.len() as u64,
        };
        if let Some(version) = self.versions_by_id.get_mut(version_id) {
            version.files.push(file.clone());
        }
        for versions in self.versions_by_project.values_mut() {
            for version in versions.iter_mut().filter(|v| v.id == version_id) {
                version.files.push(file.clone());
            }
        }
        self.files.insert(url, bytes.to_vec());
    }

    /// Makes the given call key (e.g. `project:broken`) fail with a
    /// transport-class error.
    pub fn fail_with_transport(&mut self, call: &str) {
        self.transport_failures.push(call.to_string());
    }

    pub fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    pub fn version_of(&self, version_id: &str) -> Version {
        self.versions_by_id[version_id].clone()
    }

    fn record(&self, call: String) -> Result<()> {
        if self.transport_failures.contains(&call) {
            return Err(ModError::Api(format!("HTTP status 500 from {call}")));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    async fn project(&self, id_or_slug: &str) -> Result<Project> {
        self.record(format!("project:{id_or_slug}"))?;
        self.projects
            .values()
            .find(|p| p.id == id_or_slug || p.slug == id_or_slug)
            .cloned()
            .ok_or_else(|| {
                ModError::not_found(
                    id_or_slug,
                    format!("'{id_or_slug}' was not found on the registry"),
                )
            })
    }

    async fn versions(
        &self,
        project_id: &str,
        _loader: &str,
        _game_version: &str,
    ) -> Result<Vec<Version>> {
        self.record(format!("versions:{project_id}"))?;
        Ok(self
            .versions_by_project
            .get(project_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn version(&self, version_id: &str) -> Result<Version> {
        self.record(format!("version:{version_id}"))?;
        self.versions_by_id.get(version_id).cloned().ok_or_else(|| {
            ModError::not_found(
                version_id,
                format!("'{version_id}' was not found on the registry"),
            )
        })
    }

    async fn fetch_file(&self, filename: &str, url: &str, sha512: &str) -> Result<Vec<u8>> {
        self.record(format!("fetch:{url}"))?;
        let bytes = self
            .files
            .get(url)
            .cloned()
            .ok_or_else(|| ModError::Api(format!("HTTP status 404 from {url}")))?;
        verify_sha512(filename, &bytes, sha512)?;
        Ok(bytes)
    }
}

pub fn fixture_config() -> Config {
    let mut config = Config::new("1.20.1", "fabric");
    config.workers = 2;
    config
}

pub fn dep_on(project_id: &str, dep_type: DependencyType) -> VersionDependency {
    VersionDependency {
        version_id: None,
        project_id: Some(project_id.to_string()),
        file_name: None,
        dependency_type: dep_type,
    }
}

pub fn pinned_dep(version_id: &str, dep_type: DependencyType) -> VersionDependency {
    VersionDependency {
        version_id: Some(version_id.to_string()),
        project_id: None,
        file_name: None,
        dependency_type: dep_type,
    }
}
