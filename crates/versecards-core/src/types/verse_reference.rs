// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// A scripture location in canonical `"<Book> <Chapter>:<Verse>"` form, e.g.
/// `"John 3:16"` or `"1 Corinthians 13:4-7"`.
///
/// Parsing only checks the shape of the reference and normalizes whitespace.
/// Whether the book or verse actually exists is not our concern.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerseReference(String);

impl VerseReference {
    pub fn parse(text: &str) -> Fallible<Self> {
        let canonical: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let invalid =
            || ErrorReport::invalid_input(format!("invalid verse reference: '{}'.", text.trim()));
        let (book, location) = canonical.rsplit_once(' ').ok_or_else(invalid)?;
        if !book.chars().any(char::is_alphabetic) {
            return Err(invalid());
        }
        let (chapter, verses) = location.split_once(':').ok_or_else(invalid)?;
        parse_positive(chapter).ok_or_else(invalid)?;
        match verses.split_once('-') {
            Some((start, end)) => {
                let start = parse_positive(start).ok_or_else(invalid)?;
                let end = parse_positive(end).ok_or_else(invalid)?;
                if end < start {
                    return Err(invalid());
                }
            }
            None => {
                parse_positive(verses).ok_or_else(invalid)?;
            }
        }
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The book name, e.g. `"1 John"`.
    pub fn book(&self) -> &str {
        self.0.rsplit_once(' ').map_or("", |(book, _)| book)
    }
}

fn parse_positive(s: &str) -> Option<u32> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>().ok().filter(|n| *n > 0)
}

impl Display for VerseReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VerseReference {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VerseReference {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VerseReference> for String {
    fn from(reference: VerseReference) -> String {
        reference.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_canonical_forms() -> Fallible<()> {
        assert_eq!(VerseReference::parse("John 3:16")?.as_str(), "John 3:16");
        assert_eq!(
            VerseReference::parse("  1   John\t4:8 ")?.as_str(),
            "1 John 4:8"
        );
        assert_eq!(
            VerseReference::parse("Song of Solomon 2:4")?.book(),
            "Song of Solomon"
        );
        assert_eq!(
            VerseReference::parse("1 Corinthians 13:4-7")?.as_str(),
            "1 Corinthians 13:4-7"
        );
        Ok(())
    }

    #[test]
    fn test_rejects_malformed() {
        let inputs = [
            "",
            "John",
            "John 3",
            "John :16",
            "John 3:",
            "John 0:16",
            "John 3:x",
            "John 3:7-4",
            "12 3:16",
        ];
        for input in inputs {
            let err = VerseReference::parse(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{input}");
        }
    }

    #[test]
    fn test_ordering_is_lexical() -> Fallible<()> {
        let a = VerseReference::parse("John 3:16")?;
        let b = VerseReference::parse("Psalm 23:1")?;
        let c = VerseReference::parse("Romans 8:28")?;
        assert!(a < b);
        assert!(b < c);
        Ok(())
    }
}
