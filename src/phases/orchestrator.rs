//! Orchestrator for a complete harvest run
//!
//! [`Pipeline`] owns the resolved [`Config`], the checkpoint store and the three
//! external collaborators (listing client, git, archive writer). Collaborators
//! are injected so the whole run can be exercised without network access.
//!
//! Every stage method reads its input from the checkpoint store, never from
//! the return value of the previous stage, so each can be invoked on its own.

use log::info;

use super::{stage1, stage2, stage3, stage4};
use crate::archive::{ArchiveWriter, ZipArchiveWriter};
use crate::checkpoint::CheckpointStore;
use crate::config::Config;
use crate::error::Result;
use crate::github::{GitHubClient, RepositoryLister};
use crate::partition::Partition;
use crate::phases::archive::ArchiveReport;
use crate::phases::clone::CloneReport;
use crate::repository::{DefaultGitOperations, GitOperations};

/// Counts and failures of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub listed: usize,
    pub selected: usize,
    pub leftover: usize,
    pub clone: CloneReport,
    /// `None` when archiving is disabled.
    pub archive: Option<ArchiveReport>,
}

impl RunSummary {
    /// Number of repositories that failed to clone or archive.
    pub fn failed(&self) -> usize {
        self.clone.failed() + self.archive.as_ref().map_or(0, ArchiveReport::failed)
    }
}

/// The four-stage pipeline with its collaborators.
pub struct Pipeline {
    config: Config,
    store: CheckpointStore,
    lister: Box<dyn RepositoryLister>,
    git: Box<dyn GitOperations>,
    archiver: Box<dyn ArchiveWriter>,
}

impl Pipeline {
    /// Creates a pipeline talking to the configured GitHub API, the system
    /// `git` and the zip writer.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let lister = GitHubClient::new(&config.api_url, config.token.as_deref())?;
        Ok(Self::with_operations(
            config,
            Box::new(lister),
            Box::new(DefaultGitOperations),
            Box::new(ZipArchiveWriter),
        ))
    }

    /// Creates a pipeline with custom collaborators.
    pub fn with_operations(
        config: Config,
        lister: Box<dyn RepositoryLister>,
        git: Box<dyn GitOperations>,
        archiver: Box<dyn ArchiveWriter>,
    ) -> Self {
        let store = CheckpointStore::new(config.lists_dir.clone());
        Self {
            config,
            store,
            lister,
            git,
            archiver,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &CheckpointStore {
        &self.store
    }

    /// Stage 1: list the organization into the `full` checkpoint.
    pub fn enumerate(&self) -> Result<Vec<String>> {
        let organization = self.config.require_organization()?;
        stage1::execute(self.lister.as_ref(), organization, &self.store)
    }

    /// Stage 2: split `full` into `selected` and `leftover`.
    pub fn filter(&self) -> Result<Partition> {
        let pattern = self.config.compile_pattern()?;
        stage2::execute(&self.store, &pattern)
    }

    /// Stage 3: clone every `selected` repository.
    pub fn clone_selected(&self) -> Result<CloneReport> {
        stage3::execute(self.git.as_ref(), &self.store, &self.config.repos_dir)
    }

    /// Stage 4: archive every cloned repository.
    pub fn archive(&self) -> Result<ArchiveReport> {
        stage4::execute(
            self.archiver.as_ref(),
            &self.config.repos_dir,
            &self.config.archives_dir,
            self.config.compression_level,
        )
    }

    /// Run every stage in order, archiving only when enabled.
    ///
    /// Requirements of later stages (pattern) are checked before the listing
    /// starts so a misconfigured run fails without network traffic.
    pub fn run(&self) -> Result<RunSummary> {
        self.config.require_organization()?;
        self.config.compile_pattern()?;

        info!("Stage 1/4: enumerating repositories");
        let listed = self.enumerate()?.len();

        info!("Stage 2/4: filtering repositories");
        let partition = self.filter()?;

        info!("Stage 3/4: cloning selected repositories");
        let clone = self.clone_selected()?;

        let archive = if self.config.archive {
            info!("Stage 4/4: archiving cloned repositories");
            Some(self.archive()?)
        } else {
            info!("Stage 4/4: archiving disabled, skipping");
            None
        };

        let summary = RunSummary {
            listed,
            selected: partition.selected.len(),
            leftover: partition.leftover.len(),
            clone,
            archive,
        };
        info!(
            "Run finished: {} listed, {} selected, {} cloned, {} failed",
            summary.listed,
            summary.selected,
            summary.clone.cloned(),
            summary.failed()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveStats;
    use crate::checkpoint::Checkpoint;
    use crate::error::Error;
    use crate::github::RemoteRepository;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// An organization of `total` repositories; every 15th block of 4 ends in `-service`.
    struct MockLister {
        total: usize,
        requests: Arc<Mutex<u32>>,
    }

    impl RepositoryLister for MockLister {
        fn list_page(&self, org: &str, page: u32, per_page: u32) -> Result<Vec<RemoteRepository>> {
            *self.requests.lock().unwrap() += 1;
            let start = ((page - 1) * per_page) as usize;
            let end = (start + per_page as usize).min(self.total);
            Ok((start.min(end)..end)
                .map(|i| {
                    let name = if i % 15 < 4 {
                        format!("repo{}-service", i)
                    } else {
                        format!("repo{}", i)
                    };
                    RemoteRepository {
                        html_url: format!("https://github.com/{}/{}", org, name),
                        name: Some(name),
                        clone_url: None,
                        archived: false,
                        fork: false,
                    }
                })
                .collect())
        }
    }

    struct MockGit {
        calls: Arc<Mutex<Vec<String>>>,
        fail_suffix: Option<&'static str>,
    }

    impl GitOperations for MockGit {
        fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()> {
            self.calls.lock().unwrap().push(url.to_string());
            if self.fail_suffix.is_some_and(|s| url.ends_with(s)) || target_dir.exists() {
                return Err(Error::GitClone {
                    url: url.to_string(),
                    message: "failed".to_string(),
                    hint: None,
                });
            }
            fs::create_dir_all(target_dir)?;
            fs::write(target_dir.join("README.md"), url)?;
            Ok(())
        }
    }

    struct MockArchiver {
        calls: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl ArchiveWriter for MockArchiver {
        fn create_archive(&self, source: &Path, dest: &Path, _level: u8) -> Result<ArchiveStats> {
            self.calls.lock().unwrap().push(source.to_path_buf());
            fs::write(dest, "zip")?;
            Ok(ArchiveStats::default())
        }
    }

    struct Harness {
        _temp: TempDir,
        pipeline: Pipeline,
        requests: Arc<Mutex<u32>>,
        clones: Arc<Mutex<Vec<String>>>,
        archives: Arc<Mutex<Vec<PathBuf>>>,
    }

    fn harness(total: usize, archive: bool, fail_suffix: Option<&'static str>) -> Harness {
        let temp = TempDir::new().unwrap();
        let config = Config {
            organization: Some("acme".to_string()),
            pattern: Some("-service".to_string()),
            lists_dir: temp.path().join("lists"),
            repos_dir: temp.path().join("repos"),
            archives_dir: temp.path().join("archives"),
            archive,
            ..Default::default()
        };
        let requests = Arc::new(Mutex::new(0));
        let clones = Arc::new(Mutex::new(Vec::new()));
        let archives = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::with_operations(
            config,
            Box::new(MockLister {
                total,
                requests: requests.clone(),
            }),
            Box::new(MockGit {
                calls: clones.clone(),
                fail_suffix,
            }),
            Box::new(MockArchiver {
                calls: archives.clone(),
            }),
        );
        Harness {
            _temp: temp,
            pipeline,
            requests,
            clones,
            archives,
        }
    }

    #[test]
    fn test_end_to_end_150_repositories() {
        let h = harness(150, true, None);

        let summary = h.pipeline.run().unwrap();

        assert_eq!(summary.listed, 150);
        assert_eq!(summary.selected, 40);
        assert_eq!(summary.leftover, 110);
        assert_eq!(*h.requests.lock().unwrap(), 3);
        assert_eq!(h.clones.lock().unwrap().len(), 40);
        assert_eq!(summary.clone.cloned(), 40);
        assert_eq!(h.archives.lock().unwrap().len(), 40);
        assert_eq!(summary.archive.as_ref().unwrap().archived(), 40);
        assert_eq!(summary.failed(), 0);

        let store = h.pipeline.store();
        assert_eq!(store.read_list(Checkpoint::Full).unwrap().len(), 150);
        assert_eq!(store.read_list(Checkpoint::Selected).unwrap().len(), 40);
        assert_eq!(store.read_list(Checkpoint::Leftover).unwrap().len(), 110);
        assert!(store.exists(Checkpoint::CloneReport));
    }

    #[test]
    fn test_archive_only_for_successful_clones() {
        let h = harness(30, true, Some("repo1-service"));

        let summary = h.pipeline.run().unwrap();

        assert_eq!(summary.selected, 8);
        assert_eq!(summary.clone.failed(), 1);
        assert_eq!(summary.archive.as_ref().unwrap().attempted(), 7);
        assert_eq!(summary.failed(), 1);
    }

    #[test]
    fn test_archiving_can_be_disabled() {
        let h = harness(15, false, None);

        let summary = h.pipeline.run().unwrap();

        assert!(summary.archive.is_none());
        assert!(h.archives.lock().unwrap().is_empty());
        assert!(!h.pipeline.config().archives_dir.exists());
    }

    #[test]
    fn test_stages_read_checkpoints_not_memory() {
        let h = harness(15, true, None);
        h.pipeline.enumerate().unwrap();

        // An operator edits the checkpoint between stages
        h.pipeline
            .store()
            .write_list(
                Checkpoint::Full,
                &["https://github.com/acme/only-service".to_string()],
            )
            .unwrap();
        let partition = h.pipeline.filter().unwrap();

        assert_eq!(partition.selected, vec!["https://github.com/acme/only-service"]);
        h.pipeline.clone_selected().unwrap();
        assert_eq!(
            *h.clones.lock().unwrap(),
            vec!["https://github.com/acme/only-service".to_string()]
        );
    }

    #[test]
    fn test_rerun_keeps_existing_clones() {
        let h = harness(15, false, None);
        h.pipeline.run().unwrap();
        let readme = h.pipeline.config().repos_dir.join("repo0-service/README.md");
        let before = fs::read_to_string(&readme).unwrap();

        let summary = h.pipeline.run().unwrap();

        assert_eq!(summary.clone.cloned(), 0);
        assert_eq!(summary.clone.failed(), 4);
        assert_eq!(fs::read_to_string(&readme).unwrap(), before);
    }

    #[test]
    fn test_missing_pattern_fails_before_listing() {
        let mut h = harness(15, true, None);
        h.pipeline.config.pattern = None;

        let err = h.pipeline.run().unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
        assert_eq!(*h.requests.lock().unwrap(), 0);
    }

    #[test]
    fn test_clone_stage_alone_requires_selected_checkpoint() {
        let h = harness(15, true, None);
        let err = h.pipeline.clone_selected().unwrap_err();
        assert!(matches!(err, Error::CheckpointMissing { .. }));
    }
}
