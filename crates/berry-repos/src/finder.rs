use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::{RepoError, RepoResult},
    parse::parse_repo_file,
    repodata::Repodata,
};

/// Source of the repositories configured on a host.
pub trait RepoFinder {
    /// Returns every configured repository, one record per URL.
    fn get_repos(&self) -> RepoResult<Vec<Repodata>>;
}

/// Reads one-line-style APT source lists below a filesystem root.
#[derive(Debug, Clone)]
pub struct DebianRepoFinder {
    root: PathBuf,
}

impl DebianRepoFinder {
    /// Finder for the lists under `root` (`/` for the running system).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `etc/apt/sources.list` followed by every `*.list` in `etc/apt/sources.list.d`.
    ///
    /// Missing files or directories are skipped. Drop-ins are sorted by name,
    /// which is the order apt reads them in.
    pub fn source_files(&self) -> RepoResult<Vec<PathBuf>> {
        let apt = self.root.join("etc/apt");
        let mut files = Vec::new();

        let main = apt.join("sources.list");
        if main.is_file() {
            files.push(main);
        }

        let ddir = apt.join("sources.list.d");
        let entries = match fs::read_dir(&ddir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(files),
            Err(e) => return Err(RepoError::io(ddir, e)),
        };

        let mut dropins = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| RepoError::io(&ddir, e))?.path();
            // Backups, copies and disabled files are ignored.
            if path.extension().is_some_and(|ext| ext == "list") && path.is_file() {
                dropins.push(path);
            }
        }
        dropins.sort();
        files.extend(dropins);
        Ok(files)
    }
}

impl RepoFinder for DebianRepoFinder {
    fn get_repos(&self) -> RepoResult<Vec<Repodata>> {
        let mut repos: Vec<Repodata> = Vec::new();
        let mut by_url: HashMap<String, usize> = HashMap::new();

        for file in self.source_files()? {
            let parsed = parse_repo_file(&file)?;
            debug!(file = %file.display(), count = parsed.len(), "read source list");

            for r in parsed {
                match by_url.get(&r.url) {
                    Some(&idx) => repos[idx].merge(&r)?,
                    None => {
                        by_url.insert(r.url.clone(), repos.len());
                        repos.push(r);
                    }
                }
            }
        }

        Ok(repos)
    }
}

/// Combines the per-repository JSON of every record into one document.
///
/// Architectures shared by several repositories end up in a single object;
/// a later repository with the same name replaces an earlier one.
pub fn repos_to_json(repos: &[Repodata]) -> RepoResult<Value> {
    let mut doc = Map::new();
    for r in repos {
        let Value::Object(per_arch) = r.to_json()? else {
            continue;
        };
        for (arch, entries) in per_arch {
            let Value::Object(entries) = entries else {
                continue;
            };
            if let Value::Object(slot) = doc
                .entry(arch)
                .or_insert_with(|| Value::Object(Map::new()))
            {
                slot.extend(entries);
            }
        }
    }
    Ok(Value::Object(doc))
}
