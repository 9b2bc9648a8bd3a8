use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info};

use berry_core::{Flag, Mill, MillError};
use berry_repos::{DebianRepoFinder, RepoError, RepoFinder, repos_to_json};

use crate::config::MillConfig;

/// Name of the staged document inside the scratch workspace.
const STAGED_DOCUMENT: &str = "repos.json";

/// Mill that renders the host's APT repositories as a JSON document.
///
/// The document is staged in a private scratch directory and only then
/// published. Publishing to a file goes through a sibling temporary file that
/// is renamed over the destination, so the output is either the previous
/// document or the complete new one.
pub struct RepoMill {
    config: MillConfig,
    finder: DebianRepoFinder,
    scratch: Option<TempDir>,
}

impl RepoMill {
    pub fn new(config: MillConfig) -> Result<Self, MillError> {
        config.validate()?;

        let scratch = tempfile::Builder::new().prefix("berry-mill-").tempdir()?;
        debug!(scratch = %scratch.path().display(), "scratch workspace created");

        Ok(Self {
            finder: DebianRepoFinder::new(&config.root),
            config,
            scratch: Some(scratch),
        })
    }

    /// Scratch workspace, until cleanup releases it.
    pub fn scratch_dir(&self) -> Option<&Path> {
        self.scratch.as_ref().map(TempDir::path)
    }

    fn stage(&self, scratch: &Path) -> Result<PathBuf, MillError> {
        let repos = self.finder.get_repos().map_err(processing)?;
        info!(
            root = %self.finder.root().display(),
            count = repos.len(),
            "repositories discovered"
        );

        let doc = repos_to_json(&repos).map_err(processing)?;
        let mut body = serde_json::to_vec_pretty(&doc)
            .map_err(|e| MillError::Internal(format!("encoding repository document: {e}")))?;
        body.push(b'\n');

        let staged = scratch.join(STAGED_DOCUMENT);
        fs::write(&staged, body)?;
        Ok(staged)
    }

    fn publish(&self, staged: &Path) -> Result<(), MillError> {
        match &self.config.output {
            Some(output) => {
                let dir = output
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new("."));
                let mut pending = NamedTempFile::new_in(dir)?;
                io::copy(&mut fs::File::open(staged)?, pending.as_file_mut())?;
                pending.as_file().sync_all()?;
                pending.persist(output).map_err(io::Error::from)?;
                info!(output = %output.display(), "repository document written");
            }
            None => {
                let mut stdout = io::stdout().lock();
                io::copy(&mut fs::File::open(staged)?, &mut stdout)?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

fn processing(e: RepoError) -> MillError {
    MillError::Processing(e.to_string())
}

impl Mill for RepoMill {
    fn name(&self) -> &'static str {
        "repo-mill"
    }

    fn debug(&self) -> Flag {
        self.config.debug
    }

    fn run(&mut self) -> Result<(), MillError> {
        let scratch = self
            .scratch_dir()
            .ok_or_else(|| MillError::Internal("scratch workspace already released".into()))?;

        let staged = self.stage(scratch)?;
        self.publish(&staged)
    }

    fn cleanup(&mut self) -> Result<(), MillError> {
        let Some(scratch) = self.scratch.take() else {
            return Ok(());
        };
        let path = scratch.path().to_path_buf();
        scratch.close()?;

        debug!(scratch = %path.display(), "scratch workspace removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(root: &Path, body: &str) {
        let apt = root.join("etc/apt");
        fs::create_dir_all(&apt).unwrap();
        fs::write(apt.join("sources.list"), body).unwrap();
    }

    fn config(root: &Path, output: PathBuf) -> MillConfig {
        MillConfig {
            root: root.to_path_buf(),
            output: Some(output),
            debug: Flag::disabled(),
        }
    }

    #[test]
    fn run_publishes_document_and_cleanup_removes_scratch() {
        let root = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("repos.json");
        sources(
            root.path(),
            "deb http://deb.example bookworm main\ndeb http://deb.example bookworm contrib\n",
        );

        let mut mill = RepoMill::new(config(root.path(), output.clone())).unwrap();
        let scratch = mill.scratch_dir().unwrap().to_path_buf();
        assert!(scratch.is_dir());

        mill.run().unwrap();
        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(doc["amd64"]["bookworm"]["components"], "contrib,main");

        mill.cleanup().unwrap();
        assert!(!scratch.exists());
        assert!(mill.scratch_dir().is_none());
    }

    #[test]
    fn publish_replaces_existing_output_without_leftovers() {
        let root = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("repos.json");
        fs::write(&output, "stale").unwrap();
        sources(root.path(), "deb http://deb.example bookworm main\n");

        let mut mill = RepoMill::new(config(root.path(), output.clone())).unwrap();
        mill.run().unwrap();
        mill.cleanup().unwrap();

        let body = fs::read_to_string(&output).unwrap();
        assert!(body.contains("http://deb.example"));
        assert!(body.ends_with("}\n"));
        let entries: Vec<_> = fs::read_dir(out_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "only the published document may remain");
    }

    #[test]
    fn failed_run_keeps_previous_output() {
        let root = tempfile::tempdir().unwrap();
        let output = root.path().join("out.json");
        fs::write(&output, "previous").unwrap();
        sources(root.path(), "deb http://broken.example\n");

        let mut mill = RepoMill::new(config(root.path(), output.clone())).unwrap();
        assert!(mill.run().is_err());
        mill.cleanup().unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    }

    #[test]
    fn second_cleanup_is_a_no_op() {
        let root = tempfile::tempdir().unwrap();
        let mut mill = RepoMill::new(config(root.path(), root.path().join("out.json"))).unwrap();

        mill.cleanup().unwrap();
        mill.cleanup().unwrap();
    }

    #[test]
    fn run_after_cleanup_is_internal_error() {
        let root = tempfile::tempdir().unwrap();
        let mut mill = RepoMill::new(config(root.path(), root.path().join("out.json"))).unwrap();
        mill.cleanup().unwrap();

        assert!(matches!(mill.run(), Err(MillError::Internal(_))));
    }

    #[test]
    fn malformed_sources_fail_run_without_output() {
        let root = tempfile::tempdir().unwrap();
        let output = root.path().join("out.json");
        sources(root.path(), "deb http://broken.example\n");

        let mut mill = RepoMill::new(config(root.path(), output.clone())).unwrap();
        let err = mill.run().unwrap_err();

        assert!(matches!(err, MillError::Processing(ref m) if m.contains("unknown repository format")));
        assert!(!output.exists());
        mill.cleanup().unwrap();
    }

    #[test]
    fn construction_validates_config() {
        let root = tempfile::tempdir().unwrap();
        let cfg = MillConfig {
            root: root.path().join("missing"),
            output: None,
            debug: Flag::enabled(),
        };

        assert!(matches!(RepoMill::new(cfg), Err(MillError::Config(_))));
    }

    #[test]
    fn debug_flag_comes_from_config() {
        let root = tempfile::tempdir().unwrap();
        let mut cfg = config(root.path(), root.path().join("out.json"));
        cfg.debug = Flag::enabled();

        let mut mill = RepoMill::new(cfg).unwrap();
        assert!(mill.debug().is_enabled());
        mill.cleanup().unwrap();
    }
}
