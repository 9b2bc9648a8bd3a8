use std::{fs, path::Path};

use tracing::trace;

use crate::{
    error::{RepoError, RepoResult},
    repodata::Repodata,
};

/// Parses one one-line-style APT source entry.
///
/// Lines that are not `deb` entries (e.g. `deb-src`) yield an invalid, empty
/// record rather than an error; callers filter with [`Repodata::is_valid`].
pub fn parse_repo_line(line: &str) -> RepoResult<Repodata> {
    let mut r = Repodata::default();

    let Some(rest) = line.strip_prefix("deb ") else {
        return Ok(r);
    };
    r.kind = "apt-deb".to_string();

    let mut rest = rest.trim();
    if let Some(opts) = rest.strip_prefix('[') {
        if let Some((block, tail)) = opts.split_once(']') {
            for attr in block.split_whitespace() {
                let bad = || RepoError::BadAttribute {
                    attr: attr.to_string(),
                    line: line.to_string(),
                };
                let (k, v) = attr.split_once('=').ok_or_else(bad)?;
                // Empty values such as `arch=` are malformed.
                if v.split(',').all(|part| part.trim().is_empty()) {
                    return Err(bad());
                }
                r.attrs.insert(k.to_string(), v.to_string());
            }
            rest = tail.trim();
        }
    }
    r.trusted = r.attrs.get("trusted").is_some_and(|v| v == "yes");

    r.url = rest.split_whitespace().next().unwrap_or_default().to_string();
    let rest = rest[r.url.len()..].trim();

    if rest == "/" {
        r.is_flat = true;
        r.name = flat_name(&r.url);
        return Ok(r);
    }

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(suite), Some(first)) => {
            r.name = suite.to_string();
            r.components = std::iter::once(first)
                .chain(parts)
                .map(str::to_string)
                .collect();
            Ok(r)
        }
        _ => Err(RepoError::UnknownFormat(line.to_string())),
    }
}

/// Derives a stable identifier for a flat repository from its URL.
///
/// `http://Deb.Example:8080/some/repo/` becomes `deb_example8080_some_repo`.
fn flat_name(url: &str) -> String {
    let path = url.rsplit("://").next().unwrap_or(url);
    path.split('/')
        .collect::<Vec<_>>()
        .join("_")
        .replace('.', "_")
        .to_lowercase()
        .trim_matches('_')
        .replace(':', "")
}

/// Collects every valid repository declared in a source list file.
///
/// Blank lines and `#` comments are skipped.
pub fn parse_repo_file(path: &Path) -> RepoResult<Vec<Repodata>> {
    let content = fs::read_to_string(path).map_err(|e| RepoError::io(path, e))?;

    let mut repos = Vec::new();
    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let r = parse_repo_line(line)?;
        if r.is_valid() {
            trace!(file = %path.display(), repo = %r, "parsed repository");
            repos.push(r);
        }
    }
    Ok(repos)
}
