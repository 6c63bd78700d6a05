//! # Abbreviation Engine
//!
//! Holds the UPSC abbreviation dictionary and applies it to quiz text.
//!
//! ## Table layout
//!
//! The dictionary is an ordered list of domains. Each domain maps a full
//! phrase to its abbreviation. Order matters: phrases are substituted one at
//! a time, domain by domain, over the already-modified text, so an earlier
//! substitution can create or destroy a later match.
//!
//! ## Persisted format
//!
//! ```json
//! {
//!     "economy": {
//!         "Reserve Bank of India": "RBI",
//!         "Gross Domestic Product": "GDP"
//!     }
//! }
//! ```
//!
//! Loading never fails: unreadable or malformed files degrade to an empty
//! table so quiz creation keeps working without abbreviations.

use regex::{Captures, Regex, RegexBuilder};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::errors::{error_logging, AppError, AppResult};

/// Default location of the persisted dictionary, relative to the working directory
pub const DEFAULT_ABBREVIATIONS_PATH: &str = "upsc_abbreviations.json";

const BUILTIN_DEFAULTS: &str = include_str!("../config/default_abbreviations.json");

/// A named group of phrase → abbreviation pairs, kept in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbreviationDomain {
    pub name: String,
    entries: Vec<(String, String)>,
}

impl AbbreviationDomain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Build a domain from literal pairs, mainly for tests and defaults
    pub fn with_entries(name: impl Into<String>, entries: &[(&str, &str)]) -> Self {
        let mut domain = Self::new(name);
        for (phrase, abbreviation) in entries {
            domain.insert(*phrase, *abbreviation);
        }
        domain
    }

    /// Insert or replace a phrase. A replaced phrase keeps its original position.
    pub fn insert(&mut self, phrase: impl Into<String>, abbreviation: impl Into<String>) {
        let phrase = phrase.into();
        let abbreviation = abbreviation.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == phrase) {
            Some(entry) => entry.1 = abbreviation,
            None => self.entries.push((phrase, abbreviation)),
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One compiled substitution, in application order
#[derive(Debug, Clone)]
struct SubstitutionRule {
    pattern: Regex,
    abbreviation: String,
}

/// Immutable, ordered abbreviation dictionary with pre-compiled patterns
///
/// Built once at startup and shared read-only between handlers.
#[derive(Debug, Clone, Default)]
pub struct AbbreviationTable {
    domains: Vec<AbbreviationDomain>,
    rules: Vec<SubstitutionRule>,
}

impl PartialEq for AbbreviationTable {
    fn eq(&self, other: &Self) -> bool {
        self.domains == other.domains
    }
}

impl AbbreviationTable {
    /// Table with no domains; `apply` is the identity
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile a table from ordered domains
    pub fn from_domains(domains: Vec<AbbreviationDomain>) -> Self {
        let mut rules = Vec::new();
        for domain in &domains {
            for (phrase, abbreviation) in domain.entries() {
                match compile_phrase(phrase) {
                    Ok(pattern) => rules.push(SubstitutionRule {
                        pattern,
                        abbreviation: abbreviation.clone(),
                    }),
                    Err(e) => {
                        warn!(domain = %domain.name, phrase = %phrase, error = %e, "Skipping abbreviation that failed to compile");
                    }
                }
            }
        }
        Self { domains, rules }
    }

    /// The dictionary shipped with the bot, written to disk on first start
    pub fn builtin_defaults() -> AppResult<Self> {
        let table: Self = serde_json::from_str(BUILTIN_DEFAULTS)?;
        Ok(table)
    }

    pub fn domains(&self) -> &[AbbreviationDomain] {
        &self.domains
    }

    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    pub fn phrase_count(&self) -> usize {
        self.domains.iter().map(AbbreviationDomain::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Replace every whole-word, case-insensitive occurrence of known phrases
    pub fn apply(&self, text: &str) -> String {
        self.apply_counted(text).0
    }

    /// Same as [`apply`](Self::apply), also returning how many substitutions were made
    pub fn apply_counted(&self, text: &str) -> (String, usize) {
        let mut modified = text.to_string();
        let mut substitutions = 0usize;

        for rule in &self.rules {
            // Closure replacer inserts the abbreviation literally (no `$name` expansion)
            modified = rule
                .pattern
                .replace_all(&modified, |_: &Captures<'_>| {
                    substitutions += 1;
                    rule.abbreviation.as_str()
                })
                .into_owned();
        }

        if substitutions > 0 {
            debug!(substitutions, "Applied abbreviations");
        }
        (modified, substitutions)
    }

    /// Check that every phrase key can be matched meaningfully.
    ///
    /// Domain names and abbreviations are free-form and never rejected.
    pub fn validate(&self) -> AppResult<()> {
        for domain in &self.domains {
            for (i, (phrase, _)) in domain.entries().iter().enumerate() {
                if phrase.trim().is_empty() {
                    return Err(AppError::Validation(format!(
                        "{}[{}] phrase cannot be empty",
                        domain.name, i
                    )));
                }
                if phrase.chars().any(|c| c.is_control()) {
                    return Err(AppError::Validation(format!(
                        "{}[{}] phrase '{}' contains control characters",
                        domain.name, i, phrase
                    )));
                }
            }
        }
        Ok(())
    }

    /// Serialize in the persisted layout, four-space indented
    pub fn to_json_pretty(&self) -> AppResult<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(buffer).map_err(|e| AppError::Serialization(e.to_string()))
    }
}

fn compile_phrase(phrase: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(phrase)))
        .case_insensitive(true)
        .build()
}

/// Load the dictionary from `path`, writing the built-in defaults there if absent.
///
/// Any I/O, parse or validation failure is logged and yields an empty table.
pub fn load_abbreviation_table(path: impl AsRef<Path>) -> AbbreviationTable {
    let path = path.as_ref();
    match try_load_abbreviation_table(path) {
        Ok(table) => {
            info!(
                path = %path.display(),
                domains = table.domain_count(),
                phrases = table.phrase_count(),
                "Abbreviation table loaded"
            );
            table
        }
        Err(e @ AppError::FileSystem(_)) => {
            error_logging::log_filesystem_error(&e, "load_abbreviation_table", path.to_str());
            AbbreviationTable::empty()
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Error loading abbreviations, continuing without them");
            AbbreviationTable::empty()
        }
    }
}

/// Fallible variant of [`load_abbreviation_table`]
pub fn try_load_abbreviation_table(path: impl AsRef<Path>) -> AppResult<AbbreviationTable> {
    let path = path.as_ref();

    if path.exists() {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::FileSystem(format!("failed to read '{}': {}", path.display(), e))
        })?;
        let table: AbbreviationTable = serde_json::from_str(&content).map_err(|e| {
            AppError::Serialization(format!("failed to parse '{}': {}", path.display(), e))
        })?;
        table.validate()?;
        return Ok(table);
    }

    info!(path = %path.display(), "No abbreviation file found, writing built-in defaults");
    let table = AbbreviationTable::builtin_defaults()?;
    fs::write(path, table.to_json_pretty()?).map_err(|e| {
        AppError::FileSystem(format!("failed to write '{}': {}", path.display(), e))
    })?;
    Ok(table)
}

impl Serialize for AbbreviationTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.domains.len()))?;
        for domain in &self.domains {
            map.serialize_entry(&domain.name, &PhrasesRef(domain.entries()))?;
        }
        map.end()
    }
}

struct PhrasesRef<'a>(&'a [(String, String)]);

impl Serialize for PhrasesRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (phrase, abbreviation) in self.0 {
            map.serialize_entry(phrase, abbreviation)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AbbreviationTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let domains = deserializer.deserialize_map(DomainsVisitor)?;
        Ok(AbbreviationTable::from_domains(domains))
    }
}

struct DomainsVisitor;

impl<'de> Visitor<'de> for DomainsVisitor {
    type Value = Vec<AbbreviationDomain>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of domain names to phrase maps")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut domains: Vec<AbbreviationDomain> = Vec::new();
        while let Some((name, phrases)) = access.next_entry::<String, OrderedPhrases>()? {
            // Repeated domain keys: last value wins, first position kept
            match domains.iter_mut().find(|d| d.name == name) {
                Some(existing) => existing.entries = phrases.0.entries,
                None => {
                    let mut domain = phrases.0;
                    domain.name = name;
                    domains.push(domain);
                }
            }
        }
        Ok(domains)
    }
}

struct OrderedPhrases(AbbreviationDomain);

impl<'de> Deserialize<'de> for OrderedPhrases {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PhrasesVisitor)
    }
}

struct PhrasesVisitor;

impl<'de> Visitor<'de> for PhrasesVisitor {
    type Value = OrderedPhrases;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of full phrases to abbreviations")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut domain = AbbreviationDomain::new(String::new());
        while let Some((phrase, abbreviation)) = access.next_entry::<String, String>()? {
            domain.insert(phrase, abbreviation);
        }
        Ok(OrderedPhrases(domain))
    }
}
