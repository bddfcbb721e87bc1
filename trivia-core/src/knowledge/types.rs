//! Knowledge entity types

use serde::{Deserialize, Serialize};

/// One unit of external content to learn from (e.g. a chart entry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnableRecord {
    pub artist: String,
    pub track: String,
    /// Chart position, when the source has one
    #[serde(default)]
    pub rank: Option<u32>,
}

impl LearnableRecord {
    pub fn new(artist: impl Into<String>, track: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            track: track.into(),
            rank: None,
        }
    }

    #[must_use]
    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }
}

/// A track and the artists known to perform it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artists: Vec<String>,
}

impl Track {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artists: Vec::new(),
        }
    }
}

/// An artist and the tracks known to be theirs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    pub tracks: Vec<String>,
}

impl Artist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learnable_record_rank_is_optional_in_json() {
        let record: LearnableRecord =
            serde_json::from_str(r#"{"artist": "Queen", "track": "Bohemian Rhapsody"}"#).unwrap();
        assert_eq!(record, LearnableRecord::new("Queen", "Bohemian Rhapsody"));
    }

    #[test]
    fn learnable_record_with_rank() {
        let record = LearnableRecord::new("Queen", "Under Pressure").with_rank(7);
        assert_eq!(record.rank, Some(7));
    }
}
