// modgrab-core/src/downloader.rs
use std::path::PathBuf;
use std::sync::Arc;

use modgrab_common::config::Config;
use modgrab_common::error::{ModError, Result};
use modgrab_common::event::{Phase, ProgressEvent, ProgressSink};
use modgrab_net::api::Registry;
use modgrab_net::download::write_atomic;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

use crate::package::Mod;

/// Outcome of the download stage: files written and per-file domain errors.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub written: Vec<PathBuf>,
    pub errors: Vec<ModError>,
}

impl DownloadReport {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Fetches the chosen file for every accepted node. File references are
/// resolved for the whole set first; if any is missing, nothing downloads at
/// all, since a partial mod set can violate the dependency edges just
/// resolved. Actual downloads are best-effort: per-file failures aggregate
/// without stopping siblings.
pub struct Downloader<R> {
    registry: Arc<R>,
    config: Arc<Config>,
    sink: Arc<dyn ProgressSink>,
}

impl<R: Registry + 'static> Downloader<R> {
    pub fn new(registry: Arc<R>, config: Arc<Config>, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            registry,
            config,
            sink,
        }
    }

    pub async fn download(&self, mods: Vec<Mod>) -> Result<DownloadReport> {
        let (mods, errors) = self.resolve_files(mods).await?;
        if !errors.is_empty() {
            return Ok(DownloadReport {
                written: Vec::new(),
                errors,
            });
        }
        self.fetch_all(mods).await
    }

    /// Resolves the download file reference for every mod concurrently.
    async fn resolve_files(&self, mods: Vec<Mod>) -> Result<(Vec<Mod>, Vec<ModError>)> {
        self.sink.emit(ProgressEvent::PhaseStarted {
            phase: Phase::ResolveFiles,
            total: Some(mods.len()),
        });

        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let mut tasks = JoinSet::new();
        for (idx, mut item) in mods.into_iter().enumerate() {
            let registry = Arc::clone(&self.registry);
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| ModError::State(format!("worker pool closed: {e}")))?;
            tasks.spawn(async move {
                let _permit = permit;
                let result = item.resolve_file(registry.as_ref()).await;
                (idx, item, result)
            });
        }

        let mut collected = Vec::new();
        let mut fatal: Option<ModError> = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, item, Ok(()))) => {
                    let message = item
                        .file()
                        .map(|f| format!("file for {}: {}", item.slug_or_id(), f.filename))
                        .unwrap_or_default();
                    self.sink.emit(ProgressEvent::Advanced {
                        phase: Phase::ResolveFiles,
                        message,
                    });
                    collected.push((idx, item, None));
                }
                Ok((idx, item, Err(e))) if e.is_domain() => {
                    warn!("{}", e);
                    self.sink.emit(ProgressEvent::Advanced {
                        phase: Phase::ResolveFiles,
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
        self.sink.emit(ProgressEvent::PhaseFinished {
            phase: Phase::ResolveFiles,
        });
        if let Some(e) = fatal {
            return Err(e);
        }

        collected.sort_by_key(|(idx, ..)| *idx);
        let mut mods = Vec::new();
        let mut errors = Vec::new();
        for (_, item, err) in collected {
            match err {
                None => mods.push(item),
                Some(e) => errors.push(e),
            }
        }
        Ok((mods, errors))
    }

    /// Streams every file concurrently; each is hash-verified before it is
    /// written to the download directory.
    async fn fetch_all(&self, mods: Vec<Mod>) -> Result<DownloadReport> {
        self.sink.emit(ProgressEvent::PhaseStarted {
            phase: Phase::Download,
            total: Some(mods.len()),
        });

        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let mut tasks = JoinSet::new();
        for (idx, item) in mods.iter().enumerate() {
            let file = item.file()?.clone();
            let registry = Arc::clone(&self.registry);
            let dir = self.config.download_dir.clone();
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| ModError::State(format!("worker pool closed: {e}")))?;
            tasks.spawn(async move {
                let _permit = permit;
                let result = async {
                    let bytes = registry
                        .fetch_file(&file.filename, &file.url, &file.hashes.sha512)
                        .await?;
                    write_atomic(&dir, &file.filename, &bytes).await
                }
                .await;
                (idx, file.filename, result)
            });
        }

        let mut collected: Vec<(usize, PathBuf)> = Vec::new();
        let mut errors = Vec::new();
        let mut fatal: Option<ModError> = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, filename, Ok(path))) => {
                    self.sink.emit(ProgressEvent::Advanced {
                        phase: Phase::Download,
                        message: format!("downloaded {filename}"),
                    });
                    collected.push((idx, path));
                }
                Ok((_, _, Err(e))) if e.is_domain() => {
                    warn!("{}", e);
                    self.sink.emit(ProgressEvent::Advanced {
                        phase: Phase::Download,
                        message: format!("warning: {e}"),
                    });
                    errors.push(e);
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
        self.sink.emit(ProgressEvent::PhaseFinished {
            phase: Phase::Download,
        });
        if let Some(e) = fatal {
            return Err(e);
        }

        collected.sort_by_key(|(idx, _)| *idx);
        Ok(DownloadReport {
            written: collected.into_iter().map(|(_, path)| path).collect(),
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use modgrab_common::event::NoopSink;

    use super::*;
    use crate::testutil::{fixture_config, FakeRegistry};

    fn downloader(
        registry: FakeRegistry,
        config: Config,
    ) -> Downloader<FakeRegistry> {
        Downloader::new(Arc::new(registry), Arc::new(config), Arc::new(NoopSink))
    }

    fn pinned_mod(registry: &FakeRegistry, version_id: &str) -> Mod {
        Mod::from_pinned_version(registry.version_of(version_id))
    }

    #[tokio::test]
    async fn downloads_verified_files_to_the_target_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = FakeRegistry::default();
        registry.add_version("aaa", "a1", vec![]);
        registry.add_version("bbb", "b1", vec![]);
        registry.add_file("a1", "alpha.jar", b"mod file one", None);
        registry.add_file("b1", "beta.jar", b"mod file two", None);
        let mods = vec![pinned_mod(&registry, "a1"), pinned_mod(&registry, "b1")];

        let mut config = fixture_config();
        config.download_dir = dir.path().to_path_buf();
        let report = downloader(registry, config).download(mods).await.unwrap();

        assert!(report.is_complete());
        assert_eq!(report.written.len(), 2);
        assert_eq!(
            std::fs::read(dir.path().join("alpha.jar")).unwrap(),
            b"mod file one"
        );
        assert_eq!(
            std::fs::read(dir.path().join("beta.jar")).unwrap(),
            b"mod file two"
        );
    }

    #[tokio::test]
    async fn missing_file_reference_blocks_every_download() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = FakeRegistry::default();
        registry.add_version("aaa", "a1", vec![]);
        registry.add_version("bbb", "b1", vec![]);
        registry.add_file("a1", "alpha.jar", b"mod file one", None);
        // b1 has no files at all
        let calls = registry.call_log();
        let mods = vec![pinned_mod(&registry, "a1"), pinned_mod(&registry, "b1")];

        let mut config = fixture_config();
        config.download_dir = dir.path().to_path_buf();
        let report = downloader(registry, config).download(mods).await.unwrap();

        assert_eq!(report.errors.len(), 1);
        assert!(report.written.is_empty());
        assert!(!dir.path().join("alpha.jar").exists());
        // the all-or-nothing gate means no byte was fetched
        assert!(!calls
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.starts_with("fetch:")));
    }

    #[tokio::test]
    async fn integrity_mismatch_drops_the_file_but_not_its_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = FakeRegistry::default();
        registry.add_version("aaa", "a1", vec![]);
        registry.add_version("bbb", "b1", vec![]);
        registry.add_file("a1", "alpha.jar", b"mod file one", None);
        // declared digest disagrees with the served bytes
        registry.add_file("b1", "beta.jar", b"mod file two", Some(&"0".repeat(128)));
        let mods = vec![pinned_mod(&registry, "a1"), pinned_mod(&registry, "b1")];

        let mut config = fixture_config();
        config.download_dir = dir.path().to_path_buf();
        let report = downloader(registry, config).download(mods).await.unwrap();

        assert_eq!(report.written.len(), 1);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            report.errors[0],
            ModError::IntegrityMismatch { .. }
        ));
        assert!(dir.path().join("alpha.jar").exists());
        assert!(!dir.path().join("beta.jar").exists());
    }
}
