use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{RepoError, RepoResult};

/// Architecture assumed when a source line carries no `arch=` attribute.
const DEFAULT_ARCH: &str = "amd64";

/// One APT repository as declared in a source list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repodata {
    /// Repository type, `apt-deb` for binary sources.
    pub kind: String,
    /// Components such as `main` or `universe`. Empty for flat repositories.
    pub components: Vec<String>,
    pub url: String,
    pub trusted: bool,
    /// Suite for standard repositories, a name derived from the URL for flat ones.
    pub name: String,
    /// Options from the `[key=value ...]` block.
    pub attrs: BTreeMap<String, String>,
    pub is_flat: bool,
}

/// Wire shape of a single repository inside the JSON document.
#[derive(Serialize)]
struct RepoEntry<'a> {
    url: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    name: &'a str,
    components: String,
}

impl Repodata {
    /// A record is usable only when type, URL and name are all known.
    pub fn is_valid(&self) -> bool {
        !(self.kind.is_empty() || self.url.is_empty() || self.name.is_empty())
    }

    /// Architectures listed in the `arch` attribute.
    pub fn arches(&self) -> Vec<&str> {
        self.attrs
            .get("arch")
            .map(String::as_str)
            .unwrap_or(DEFAULT_ARCH)
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .collect()
    }

    /// Merges another declaration of the same URL into this one.
    ///
    /// Components become the sorted union, the result is trusted only if both
    /// sides are, and attributes from `other` win.
    pub fn merge(&mut self, other: &Repodata) -> RepoResult<()> {
        if self.url != other.url {
            return Err(RepoError::MergeMismatch {
                expected: self.url.clone(),
                actual: other.url.clone(),
            });
        }

        self.components.extend(other.components.iter().cloned());
        self.components.sort();
        self.components.dedup();

        self.trusted = self.trusted && other.trusted;
        self.attrs
            .extend(other.attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    /// Renders `{arch: {name: {url, type, name, components}}}`.
    ///
    /// Flat repositories report `"/"` as their components.
    pub fn to_json(&self) -> RepoResult<Value> {
        let components = if self.components.is_empty() {
            "/".to_string()
        } else {
            self.components.join(",")
        };
        let entry = serde_json::to_value(RepoEntry {
            url: &self.url,
            kind: &self.kind,
            name: &self.name,
            components,
        })?;

        let mut data = Map::new();
        for arch in self.arches() {
            let mut by_name = Map::new();
            by_name.insert(self.name.clone(), entry.clone());
            data.insert(arch.to_string(), Value::Object(by_name));
        }
        Ok(Value::Object(data))
    }
}

impl fmt::Display for Repodata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Repo: {}, Type: {}", self.name, self.kind)?;
        if !self.url.is_empty() {
            write!(f, ", URL: {}", self.url)?;
        }
        if !self.attrs.is_empty() {
            let attrs: Vec<String> = self.attrs.iter().map(|(k, v)| format!("{k}={v}")).collect();
            write!(f, ", Attributes: {{{}}}", attrs.join(", "))?;
        }
        f.write_str(if self.trusted { ", Trusted" } else { ", Untrusted" })?;
        if !self.components.is_empty() {
            write!(f, ", Components: {}", self.components.join(", "))?;
        }
        write!(f, ", Format: {}", if self.is_flat { "flat" } else { "standard" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(url: &str, name: &str, components: &[&str]) -> Repodata {
        Repodata {
            kind: "apt-deb".into(),
            url: url.into(),
            name: name.into(),
            components: components.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn validity_requires_kind_url_and_name() {
        assert!(repo("http://deb.example", "stable", &["main"]).is_valid());
        assert!(!Repodata::default().is_valid());

        let mut r = repo("http://deb.example", "stable", &[]);
        r.name.clear();
        assert!(!r.is_valid());
    }

    #[test]
    fn merge_unions_components_and_downgrades_trust() {
        let mut a = repo("http://deb.example", "stable", &["main", "contrib"]);
        a.trusted = true;
        a.attrs.insert("arch".into(), "amd64".into());

        let mut b = repo("http://deb.example", "stable", &["non-free", "main"]);
        b.attrs.insert("arch".into(), "arm64".into());
        b.attrs.insert("signed-by".into(), "/k.gpg".into());

        a.merge(&b).unwrap();

        assert_eq!(a.components, vec!["contrib", "main", "non-free"]);
        assert!(!a.trusted);
        assert_eq!(a.attrs.get("arch").map(String::as_str), Some("arm64"));
        assert_eq!(a.attrs.get("signed-by").map(String::as_str), Some("/k.gpg"));
    }

    #[test]
    fn merge_rejects_different_urls() {
        let mut a = repo("http://a.example", "stable", &["main"]);
        let b = repo("http://b.example", "stable", &["main"]);

        let err = a.merge(&b).unwrap_err();
        assert!(matches!(err, RepoError::MergeMismatch { .. }));
        assert_eq!(a.components, vec!["main"]);
    }

    #[test]
    fn json_is_keyed_by_arch_then_name() {
        let mut r = repo("http://deb.example", "bookworm", &["main", "contrib"]);
        r.attrs.insert("arch".into(), "amd64,arm64".into());

        let json = r.to_json().unwrap();
        for arch in ["amd64", "arm64"] {
            let entry = &json[arch]["bookworm"];
            assert_eq!(entry["url"], "http://deb.example");
            assert_eq!(entry["type"], "apt-deb");
            assert_eq!(entry["name"], "bookworm");
            assert_eq!(entry["components"], "main,contrib");
        }
    }

    #[test]
    fn flat_json_uses_slash_and_default_arch() {
        let mut r = repo("http://deb.example/flat/", "deb_example_flat", &[]);
        r.is_flat = true;

        let json = r.to_json().unwrap();
        assert_eq!(json["amd64"]["deb_example_flat"]["components"], "/");
    }

    #[test]
    fn display_lists_known_fields() {
        let mut r = repo("http://deb.example", "stable", &["main", "contrib"]);
        r.attrs.insert("arch".into(), "amd64".into());

        assert_eq!(
            r.to_string(),
            "<Repo: stable, Type: apt-deb, URL: http://deb.example, Attributes: {arch=amd64}, \
             Untrusted, Components: main, contrib, Format: standard"
        );
    }
}
