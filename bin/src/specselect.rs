use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result, bail};

/// Selects a specification file, either by its 1-based position among the
/// bundled specifications or by path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SpecSelector {
    Index(usize),
    Path(PathBuf),
}

impl Default for SpecSelector {
    fn default() -> Self {
        Self::Index(1)
    }
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("specification numbers start at 1")]
pub struct ZeroIndexError;

impl FromStr for SpecSelector {
    type Err = ZeroIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<usize>() {
            Ok(0) => Err(ZeroIndexError),
            Ok(index) => Ok(Self::Index(index)),
            Err(_) => Ok(Self::Path(PathBuf::from(s))),
        }
    }
}

impl fmt::Display for SpecSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl SpecSelector {
    /// Resolves the selector to an existing specification file. `specs_dir`
    /// is only consulted for [SpecSelector::Index].
    pub fn resolve(&self, specs_dir: Option<&Path>) -> Result<PathBuf> {
        match self {
            Self::Index(index) => {
                let specs_dir = specs_dir.with_context(|| {
                    "no bundled specifications directory found, pass --specs-dir"
                })?;
                let listed = engine::spec::list(specs_dir)?;
                let Some((_, path)) = listed.into_iter().find(|(n, _)| n == index) else {
                    bail!("no specification #{index} in {specs_dir:?}");
                };
                Ok(path)
            }
            Self::Path(path) => {
                if !path.is_file() {
                    bail!("specification file {path:?} does not exist");
                }
                Ok(path.clone())
            }
        }
    }
}
