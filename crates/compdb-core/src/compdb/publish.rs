//! Publishing a rendered database.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::paths::{COMPDB_FILENAME, CompdbPaths};

/// Where a database ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Canonical location of the database
    pub output_path: PathBuf,
    /// Symlink pointing at `output_path`, if one was placed
    pub link_path: Option<PathBuf>,
}

/// Destination for a rendered compilation database.
pub trait OutputSink {
    /// Store `contents` as the complete database.
    fn publish(&mut self, contents: &[u8]) -> Result<Published>;
}

/// Writes the database to disk and optionally links it elsewhere.
#[derive(Debug, Clone)]
pub struct FilePublisher {
    paths: CompdbPaths,
    link_dir: Option<PathBuf>,
}

impl FilePublisher {
    pub fn new(paths: CompdbPaths) -> Self {
        Self {
            paths,
            link_dir: None,
        }
    }

    /// Also place a `compile_commands.json` symlink in `link_dir`.
    pub fn with_link_dir(mut self, link_dir: Option<PathBuf>) -> Self {
        self.link_dir = link_dir;
        self
    }

    pub fn paths(&self) -> &CompdbPaths {
        &self.paths
    }

    /// Write through a sibling temporary file so readers never see a partial database.
    fn write_output(&self, contents: &[u8]) -> Result<PathBuf> {
        let output = &self.paths.output_file;
        let staging = staging_path(output, "tmp");

        let written = fs::write(&staging, contents)
            .map_err(|source| Error::Output {
                path: staging.clone(),
                source,
            })
            .and_then(|()| {
                fs::rename(&staging, output).map_err(|source| Error::Output {
                    path: output.clone(),
                    source,
                })
            });
        if let Err(e) = written {
            let _ = remove_if_exists(&staging);
            return Err(e);
        }

        std::path::absolute(output).map_err(|source| Error::Output {
            path: output.clone(),
            source,
        })
    }

    /// Whether a link in `link_dir` would land on the database itself.
    fn links_to_itself(&self, link_dir: &Path) -> bool {
        let resolve = |dir: &Path| fs::canonicalize(dir).or_else(|_| std::path::absolute(dir));
        match (resolve(link_dir), resolve(&self.paths.output_dir)) {
            (Ok(link_dir), Ok(output_dir)) => link_dir == output_dir,
            _ => false,
        }
    }
}

impl OutputSink for FilePublisher {
    fn publish(&mut self, contents: &[u8]) -> Result<Published> {
        self.paths.ensure_output_dir()?;
        let output_path = self.write_output(contents)?;

        let link_path = match &self.link_dir {
            Some(dir) if self.links_to_itself(dir) => {
                tracing::warn!(
                    "not linking {}: link directory is the output directory",
                    dir.display()
                );
                None
            }
            Some(dir) => {
                let link = CompdbPaths::link_path(dir);
                replace_link(&output_path, &link)?;
                Some(link)
            }
            None => None,
        };

        Ok(Published {
            output_path,
            link_path,
        })
    }
}

/// Point `link` at `target`, replacing whatever is at `link` in one rename.
fn replace_link(target: &Path, link: &Path) -> Result<()> {
    let link_error = |source| Error::Link {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
        source,
    };
    let staging = staging_path(link, "link");

    remove_if_exists(&staging).map_err(link_error)?;
    symlink(target, &staging).map_err(link_error)?;
    if let Err(e) = fs::rename(&staging, link) {
        let _ = remove_if_exists(&staging);
        return Err(link_error(e));
    }

    tracing::debug!("linked {} -> {}", link.display(), target.display());
    Ok(())
}

/// Hidden sibling of `path`, unique to this process.
fn staging_path(path: &Path, suffix: &str) -> PathBuf {
    path.with_file_name(format!(".{COMPDB_FILENAME}.{}.{suffix}", std::process::id()))
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}
