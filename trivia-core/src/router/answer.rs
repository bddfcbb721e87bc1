//! Shape of a cached guess

/// Separator players use for "artist - track" style answers
pub const ANSWER_SEPARATOR: char = '-';

/// A guess, classified by shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// One name; the reaction tells whether it is a track or an artist
    Single(String),
    /// "artist - track" or "track - artist"; the sides cannot be told apart
    Ambiguous,
}

impl Answer {
    /// Classify the text of a guess
    pub fn parse(text: &str) -> Self {
        if text.contains(ANSWER_SEPARATOR) {
            Self::Ambiguous
        } else {
            Self::Single(text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_name_is_single() {
        assert_eq!(
            Answer::parse("Bohemian Rhapsody"),
            Answer::Single("Bohemian Rhapsody".to_string())
        );
    }

    #[test]
    fn single_keeps_text_verbatim() {
        assert_eq!(
            Answer::parse("> Yesterday "),
            Answer::Single("> Yesterday ".to_string())
        );
    }

    #[test]
    fn artist_dash_track_is_ambiguous() {
        assert_eq!(Answer::parse("Queen - Bohemian Rhapsody"), Answer::Ambiguous);
    }

    #[test]
    fn any_dash_is_ambiguous() {
        assert_eq!(Answer::parse("Jay-Z"), Answer::Ambiguous);
        assert_eq!(Answer::parse("a-b-c"), Answer::Ambiguous);
    }
}
