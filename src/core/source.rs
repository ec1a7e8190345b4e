//! Document sources
//!
//! A source provides the original (unedited) document set, either from a
//! local directory or from static files served over HTTP. Content is
//! JSON-unwrapped and unescaped through the normalizer before it reaches
//! callers, so the rest of the system only ever sees literal text.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use ureq::Agent;
use walkdir::WalkDir;

use crate::core::document::Document;
use crate::render::normalize;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from a document source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("document root {0} is not a directory")]
    MissingRoot(PathBuf),
    #[error("failed to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// A provider of the fixed document set.
pub trait DocumentSource {
    /// Load every document, in display order.
    fn list(&self) -> Result<Vec<Document>, SourceError>;

    /// Load a single document by id.
    fn get(&self, id: &str) -> Result<Option<Document>, SourceError> {
        Ok(self.list()?.into_iter().find(|doc| doc.id == id))
    }
}

/// Markdown files read from a local directory.
///
/// With an explicit file list the given order is kept; without one the
/// directory is scanned for markdown files in name order.
pub struct DirSource {
    root: PathBuf,
    files: Vec<String>,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: Vec::new(),
        }
    }

    /// Restrict the source to an explicit filename list, in display order.
    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = files;
        self
    }

    fn filenames(&self) -> Vec<String> {
        if !self.files.is_empty() {
            return self.files.clone();
        }

        let mut names: Vec<String> = WalkDir::new(&self.root)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "md" || ext == "markdown")
                    .unwrap_or(false)
            })
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

impl DocumentSource for DirSource {
    fn list(&self) -> Result<Vec<Document>, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::MissingRoot(self.root.clone()));
        }

        let mut docs = Vec::new();
        for filename in self.filenames() {
            let path = self.root.join(&filename);
            match std::fs::read_to_string(&path) {
                Ok(raw) => {
                    docs.push(Document::from_file_content(
                        &filename,
                        normalize::normalize(&raw),
                    ));
                }
                // A document that fails to load is skipped, not fatal.
                Err(err) => tracing::warn!("skipping {}: {}", path.display(), err),
            }
        }
        Ok(docs)
    }
}

/// Markdown files fetched from a base URL.
///
/// HTTP cannot enumerate files, so an explicit filename list is required.
pub struct HttpSource {
    agent: Agent,
    base_url: String,
    files: Vec<String>,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, files: Vec<String>) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(HTTP_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            agent,
            base_url,
            files,
        }
    }

    fn fetch(&self, filename: &str) -> Result<String, SourceError> {
        let url = format!("{}/{}", self.base_url, filename);
        let response = self.agent.get(&url).call().map_err(|e| SourceError::Fetch {
            url: url.clone(),
            source: Box::new(e),
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(SourceError::Status { url, status });
        }

        response
            .into_body()
            .read_to_string()
            .map_err(|e| SourceError::Fetch {
                url,
                source: Box::new(e),
            })
    }
}

impl DocumentSource for HttpSource {
    fn list(&self) -> Result<Vec<Document>, SourceError> {
        let mut docs = Vec::new();
        for filename in &self.files {
            match self.fetch(filename) {
                Ok(raw) => {
                    docs.push(Document::from_file_content(
                        filename,
                        normalize::normalize(&raw),
                    ));
                }
                Err(err) => tracing::warn!("skipping {filename}: {err}"),
            }
        }
        Ok(docs)
    }
}
