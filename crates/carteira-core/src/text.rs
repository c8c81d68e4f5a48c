//! Normalized views over raw OCR text.

/// Normalized views of a raw OCR text blob, as the detector and the
/// extractors read it.
///
/// * `upper` is uppercased, with whitespace collapsed inside each line and
///   blank lines dropped. Accents are kept so extracted values stay faithful
///   to what was printed on the card.
/// * `folded` is `upper` with Portuguese diacritics removed. Signature
///   matching runs on this view so OCR output with or without accents scores
///   the same.
#[derive(Debug, Clone)]
pub struct CardText {
    upper: String,
    folded: String,
}

impl CardText {
    /// Build the normalized views for a text blob.
    pub fn new(raw: &str) -> Self {
        let upper = raw
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        let folded = fold_accents(&upper);

        Self { upper, folded }
    }

    /// Uppercased, whitespace-normalized text.
    pub fn upper(&self) -> &str {
        &self.upper
    }

    /// Uppercased, whitespace-normalized, accent-folded text.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Non-empty normalized lines, in document order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.upper.lines()
    }

    /// Whether the folded text contains `phrase` as a whole word sequence.
    ///
    /// `phrase` must already be uppercase and unaccented. The characters
    /// around a match must not be letters or digits, so `AMIL` does not match
    /// inside `FAMILIA`.
    pub fn contains(&self, phrase: &str) -> bool {
        contains_phrase(&self.folded, phrase)
    }
}

/// Whole-word containment test used for signatures and lexicon tokens.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }

    haystack.match_indices(phrase).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + phrase.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Replace Portuguese diacritics with their base letter.
///
/// Every mapping is one char to one char, so char offsets are preserved.
pub fn fold_accents(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ç' => 'C',
        'ç' => 'c',
        'Ñ' => 'N',
        'ñ' => 'n',
        other => other,
    }
}
