use std::collections::HashMap;
use std::sync::OnceLock;

use crate::token::Token;

/// A translation of alternative key encodings into canonical tokens.
///
/// Terminals disagree on how to encode some keys. Notably, many terminals send
/// the SS3 forms `ESC O H` and `ESC O F` for the home and end keys, whereas
/// the canonical forms used throughout this crate are the CSI forms
/// [`Token::HOME`] and [`Token::END`]. A normalizer maps the former to the
/// latter and passes all other tokens through.
#[derive(Debug)]
pub struct Normalizer {
    table: HashMap<Token, Token>,
}

impl Normalizer {
    /// Create a new normalizer with the default translations.
    pub fn new() -> Self {
        let table = [
            (Token::new(b"\x1bOH"), Token::HOME),
            (Token::new(b"\x1bOF"), Token::END),
        ]
        .into_iter()
        .collect();

        Self { table }
    }

    /// Get the process-wide normalizer.
    ///
    /// The normalizer is created on first use and immutable thereafter.
    pub fn global() -> &'static Normalizer {
        static NORMALIZER: OnceLock<Normalizer> = OnceLock::new();
        NORMALIZER.get_or_init(Normalizer::new)
    }

    /// Normalize the token.
    pub fn normalize(&self, token: Token) -> Token {
        self.table.get(&token).copied().unwrap_or(token)
    }

    /// Get the number of translations.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Determine whether this normalizer has no translations.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::Normalizer;
    use crate::token::Token;

    #[test]
    fn test_normalize() {
        let normalizer = Normalizer::global();
        assert_eq!(normalizer.len(), 2);
        assert_eq!(normalizer.normalize(Token::new(b"\x1bOH")), Token::HOME);
        assert_eq!(normalizer.normalize(Token::new(b"\x1bOF")), Token::END);
        assert_eq!(normalizer.normalize(Token::HOME), Token::HOME);
        assert_eq!(normalizer.normalize(Token::F1), Token::F1);
        assert_eq!(normalizer.normalize(Token::from(b'H')), Token::from(b'H'));
        assert!(std::ptr::eq(normalizer, Normalizer::global()));
    }
}
