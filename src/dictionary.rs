use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use log::{debug, info};

use crate::error::DictionaryError;

/// Dictionary handle shared by every session of one server.
///
/// Sessions hold the read guard while matching and take the write guard only
/// to append, never across a client read.
pub type SharedDictionary = Arc<RwLock<Dictionary>>;

/// Ordered word list, optionally backed by an append-only file.
///
/// Words are kept in load order, lowercased, and duplicates are kept.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: Vec<String>,
    path: Option<PathBuf>,
}

fn normalize(line: &str) -> Option<String> {
    let word = line.trim_end_matches(['\r', '\n']);
    if word.is_empty() {
        None
    } else {
        Some(word.to_lowercase())
    }
}

impl Dictionary {
    /// In-memory dictionary with no backing file.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Dictionary {
            words: words
                .into_iter()
                .filter_map(|w| normalize(w.as_ref()))
                .collect(),
            path: None,
        }
    }

    /// Loads a word-per-line file. Appends are written back to the same file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DictionaryError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let mut dictionary = Self::from_words(content.lines());
        dictionary.path = Some(path.to_path_buf());
        info!(
            "loaded {} words from {}",
            dictionary.words.len(),
            path.display()
        );
        Ok(dictionary)
    }

    pub fn into_shared(self) -> SharedDictionary {
        Arc::new(RwLock::new(self))
    }

    /// Adds `word` at the end, persisting it first when file-backed.
    pub fn append(&mut self, word: &str) -> Result<(), DictionaryError> {
        let word = word.to_lowercase();
        if let Some(path) = &self.path {
            let write = || -> std::io::Result<()> {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                writeln!(file, "{word}")
            };
            write().map_err(|source| DictionaryError::Append {
                word: word.clone(),
                path: path.clone(),
                source,
            })?;
        }
        debug!("appended '{word}' to dictionary");
        self.words.push(word);
        Ok(())
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
