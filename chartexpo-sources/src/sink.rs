//! Report sinks
//!
//! A sink takes a named artifact and tells what became of it. Outcomes are
//! values, not errors: a cancelled save is a normal answer.
//!
//! ## Fallback
//!
//! ```text
//! primary.deliver() ─┬─ Unavailable ─▶ secondary.deliver()
//!                    └─ anything else ─▶ returned as is
//! ```

use std::{
    fs::OpenOptions,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::SinkError;

/// Named report text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name
    pub name: String,
    /// Report text
    pub content: String,
}

impl Artifact {
    /// New artifact
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// What happened to a delivered artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutcome {
    /// Stored at `location`
    Saved {
        /// Where it went
        location: String,
    },
    /// Declined without error (existing file, user cancel)
    Cancelled,
    /// Tried and failed
    Failed(String),
    /// This sink cannot take artifacts at all right now
    Unavailable,
}

impl SinkOutcome {
    /// Artifact was stored
    pub fn is_saved(&self) -> bool {
        matches!(self, SinkOutcome::Saved { .. })
    }
}

/// Destination for rendered reports
pub trait ReportSink: Send {
    /// Hand over `artifact`; `label` describes it for interactive sinks
    fn deliver(&mut self, artifact: &Artifact, label: &str) -> SinkOutcome;
}

/// Writes artifacts into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    replace: bool,
}

impl DirectorySink {
    /// Sink writing into `dir`, never overwriting
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            replace: false,
        }
    }

    /// Overwrite existing files
    pub fn replace_existing(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, artifact: &Artifact) -> Result<PathBuf, SinkError> {
        if !self.dir.is_dir() {
            return Err(SinkError::Unavailable(self.dir.display().to_string()));
        }

        let path = self.dir.join(&artifact.name);
        let mut options = OpenOptions::new();
        options.write(true);
        if self.replace {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let mut file = options.open(&path).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => SinkError::AlreadyExists(path.display().to_string()),
            _ => SinkError::Io(e),
        })?;
        file.write_all(artifact.content.as_bytes())?;
        file.sync_all()?;
        Ok(path)
    }
}

impl ReportSink for DirectorySink {
    fn deliver(&mut self, artifact: &Artifact, label: &str) -> SinkOutcome {
        match self.write(artifact) {
            Ok(path) => {
                log::info!("{}: saved {}", label, path.display());
                SinkOutcome::Saved {
                    location: path.display().to_string(),
                }
            }
            Err(SinkError::AlreadyExists(path)) => {
                log::warn!("{}: {} exists, not overwriting", label, path);
                SinkOutcome::Cancelled
            }
            Err(SinkError::Unavailable(dir)) => {
                log::warn!("{}: directory {} unavailable", label, dir);
                SinkOutcome::Unavailable
            }
            Err(e) => {
                log::warn!("{}: {}", label, e);
                SinkOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Keeps artifacts in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    artifacts: Vec<Artifact>,
    offline: bool,
}

impl MemorySink {
    /// Accepting sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that answers `Unavailable` to everything
    pub fn offline() -> Self {
        Self {
            artifacts: Vec::new(),
            offline: true,
        }
    }

    /// Artifacts received so far
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }
}

impl ReportSink for MemorySink {
    fn deliver(&mut self, artifact: &Artifact, _label: &str) -> SinkOutcome {
        if self.offline {
            return SinkOutcome::Unavailable;
        }
        self.artifacts.push(artifact.clone());
        SinkOutcome::Saved {
            location: format!("memory:{}", artifact.name),
        }
    }
}

/// Tries `primary`, uses `secondary` only when the primary is unavailable
#[derive(Debug, Clone)]
pub struct FallbackSink<P, S> {
    primary: P,
    secondary: S,
}

impl<P: ReportSink, S: ReportSink> FallbackSink<P, S> {
    /// Chain two sinks
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    /// Primary sink
    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// Secondary sink
    pub fn secondary(&self) -> &S {
        &self.secondary
    }
}

impl<P: ReportSink, S: ReportSink> ReportSink for FallbackSink<P, S> {
    fn deliver(&mut self, artifact: &Artifact, label: &str) -> SinkOutcome {
        match self.primary.deliver(artifact, label) {
            SinkOutcome::Unavailable => {
                log::debug!("{}: primary sink unavailable, falling back", label);
                self.secondary.deliver(artifact, label)
            }
            outcome => outcome,
        }
    }
}
