//! Discovery of the APT repositories configured on a Debian-family host.
//!
//! Source lists are parsed into [`Repodata`] records, records pointing at the
//! same URL are merged, and the result can be rendered as a per-architecture
//! JSON document.
mod error;
pub use error::{RepoError, RepoResult};

mod repodata;
pub use repodata::Repodata;

mod parse;
pub use parse::{parse_repo_file, parse_repo_line};

mod finder;
pub use finder::{DebianRepoFinder, RepoFinder, repos_to_json};
