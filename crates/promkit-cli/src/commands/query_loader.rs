use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use promkit_lib::Diagnostics;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("query is required: use positional argument or -q/--query")]
    Missing,

    #[error("failed to read stdin: {0}")]
    Stdin(io::Error),

    #[error("failed to read '{}': {source}", path.display())]
    File { path: PathBuf, source: io::Error },
}

/// Query text together with the name it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySource {
    pub text: String,
    pub path: Option<String>,
}

impl QuerySource {
    pub fn inline(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            path: None,
        }
    }

    /// Renders diagnostics against this source, cascading errors suppressed.
    pub fn render(&self, diagnostics: &Diagnostics, color: bool) -> String {
        let printer = diagnostics.filtered_printer(&self.text).colored(color);
        match &self.path {
            Some(path) => printer.path(path).render(),
            None => printer.render(),
        }
    }
}

pub fn load_query_source(
    query_path: Option<&Path>,
    query_text: Option<&str>,
) -> Result<QuerySource, LoadError> {
    if let Some(text) = query_text {
        return Ok(QuerySource::inline(text));
    }

    match query_path {
        Some(path) if path.as_os_str() == "-" => load_stdin(),
        Some(path) => load_file(path),
        None => Err(LoadError::Missing),
    }
}

fn load_stdin() -> Result<QuerySource, LoadError> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(LoadError::Stdin)?;
    Ok(QuerySource {
        text: buf,
        path: Some("<stdin>".to_string()),
    })
}

fn load_file(path: &Path) -> Result<QuerySource, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::File {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "loaded query");
    Ok(QuerySource {
        text,
        path: Some(path.to_string_lossy().into_owned()),
    })
}
