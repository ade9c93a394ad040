use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use percent_encoding::percent_decode_str;
use tracing::debug;
use crate::error::{AppError, Result};

pub const INDEX_FILENAME: &str = "index.html";

const MAX_STEM_CHARS: usize = 50;

/// Output filename for a post URL: its last path segment turned into a slug.
pub fn filename_for_url(url: &str) -> String {
    let path = url::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string());
    let segment = path.rsplit('/').find(|s| !s.is_empty()).unwrap_or_default();
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    format!("{}.html", slugify(&decoded))
}

/// Lower-case slug keeping any alphanumeric character, `post` when nothing is left.
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug: String = slug.trim_end_matches('-').chars().take(MAX_STEM_CHARS).collect();
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "post".to_string()
    } else {
        slug.to_string()
    }
}

/// Hands out unique filenames within one run; the index name is always reserved.
#[derive(Debug)]
pub struct FilenameAllocator {
    taken: HashSet<String>,
}

impl Default for FilenameAllocator {
    fn default() -> Self {
        Self {
            taken: HashSet::from([INDEX_FILENAME.to_string()]),
        }
    }
}

impl FilenameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, wanted: &str) -> String {
        if self.taken.insert(wanted.to_string()) {
            return wanted.to_string();
        }
        let stem = wanted.strip_suffix(".html").unwrap_or(wanted);
        let mut counter = 2;
        loop {
            let candidate = format!("{}-{}.html", stem, counter);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| AppError::WriteError {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes through a temporary sibling so a failed write never leaves a partial file.
    pub fn write(&self, filename: &str, html: &str) -> Result<PathBuf> {
        let path = self.dir.join(filename);
        let tmp = self.dir.join(format!(".{}.tmp", filename));
        let to_error = |source| AppError::WriteError {
            path: path.clone(),
            source,
        };

        if let Err(err) = fs::write(&tmp, html) {
            let _ = fs::remove_file(&tmp);
            return Err(to_error(err));
        }
        if let Err(err) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(to_error(err));
        }
        debug!("Wrote {} ({} bytes)", path.display(), html.len());
        Ok(path)
    }
}
