use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

/// Words must be strictly longer than this (in characters) to be indexed
/// or to take part in a query.
pub const MIN_SEARCH_WORD_LENGTH: usize = 2;

/// Field separator inside one index record.
const FIELD_SEPARATOR: char = '\0';

/// Position of a page in the index's page table.
pub type PageId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub title: String,
    pub date: String,
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("malformed index record on line {line}: expected url, title and date")]
    MalformedRecord { line: usize },
    #[error("failed to read search index: {0}")]
    Io(#[from] io::Error),
}

/// Whether `word` is long enough to be indexed or queried.
pub fn is_searchable(word: &str) -> bool {
    word.chars().count() > MIN_SEARCH_WORD_LENGTH
}

/// Inverted word → page index, built once and read-only afterwards.
///
/// Pages live in an arena and postings refer to them by [`PageId`], so two
/// pages with identical fields stay distinct.
#[derive(Debug, Default)]
pub struct SearchIndex {
    pages: Vec<Page>,
    postings: HashMap<String, HashSet<PageId>>,
}

impl SearchIndex {
    /// Parses index records, one per line: `url\0title\0date\0word\0word…`.
    ///
    /// Words are lowercased; words too short to be searchable are dropped.
    pub fn parse(text: &str) -> Result<Self, IndexError> {
        let mut index = SearchIndex::default();

        for (n, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split(FIELD_SEPARATOR);
            let (Some(url), Some(title), Some(date)) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(IndexError::MalformedRecord { line: n + 1 });
            };

            let id = index.pages.len();
            index.pages.push(Page {
                url: url.to_string(),
                title: title.to_string(),
                date: date.to_string(),
            });

            for word in fields.filter(|w| is_searchable(w)) {
                index
                    .postings
                    .entry(word.to_lowercase())
                    .or_default()
                    .insert(id);
            }
        }

        Ok(index)
    }

    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let text = std::fs::read_to_string(path)?;
        let index = Self::parse(&text)?;

        tracing::info!(
            path = %path.display(),
            pages = index.pages.len(),
            words = index.postings.len(),
            "Search index loaded"
        );
        Ok(index)
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(id)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn word_count(&self) -> usize {
        self.postings.len()
    }

    /// Pages containing every searchable term, sorted by title.
    ///
    /// Terms that are not searchable are ignored. If no term survives, or
    /// any surviving term is unknown, the result is empty.
    pub fn search<S: AsRef<str>>(&self, terms: &[S]) -> Vec<&Page> {
        let mut matches: Option<HashSet<PageId>> = None;

        for term in terms {
            let term = term.as_ref();
            if !is_searchable(term) {
                continue;
            }

            let Some(postings) = self.postings.get(&term.to_lowercase()) else {
                return Vec::new();
            };

            matches = Some(match matches {
                None => postings.clone(),
                Some(current) => current.intersection(postings).copied().collect(),
            });
        }

        let mut pages: Vec<&Page> = matches
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| self.pages.get(id))
            .collect();
        pages.sort_by(|a, b| a.title.cmp(&b.title));
        pages
    }
}

/// Writes one index record in the format [`SearchIndex::parse`] reads.
///
/// Words are lowercased and deduplicated; unsearchable words are skipped.
pub fn write_record<'a, W: Write>(
    out: &mut W,
    page: &Page,
    words: impl IntoIterator<Item = &'a str>,
) -> io::Result<()> {
    let mut seen = HashSet::new();

    write!(out, "{}\0{}\0{}", page.url, page.title, page.date)?;
    for word in words.into_iter().filter(|w| is_searchable(w)) {
        let word = word.to_lowercase();
        if seen.insert(word.clone()) {
            write!(out, "\0{word}")?;
        }
    }
    writeln!(out)
}
