use std::collections::HashMap;
use std::ops::Deref;

/// Opaque vocabulary id. Only equality and hashing are meaningful.
pub type Token = u32;

/// An immutable token sequence: one hypothesis or one reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Sequence {
    tokens: Vec<Token>,
}

impl Sequence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Sequence { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn n_tokens(&self) -> usize {
        self.tokens.len()
    }
}

impl From<Vec<Token>> for Sequence {
    fn from(tokens: Vec<Token>) -> Self {
        Sequence::new(tokens)
    }
}

impl From<&[Token]> for Sequence {
    fn from(tokens: &[Token]) -> Self {
        Sequence::new(tokens.to_vec())
    }
}

impl AsRef<[Token]> for Sequence {
    fn as_ref(&self) -> &[Token] {
        &self.tokens
    }
}

impl Deref for Sequence {
    type Target = [Token];

    fn deref(&self) -> &[Token] {
        &self.tokens
    }
}

/// Word <-> token id mapping.
///
/// Passed around explicitly by whoever tokenizes input; ids are handed out
/// in registration order starting at 0.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    ids: HashMap<String, Token>,
    words: Vec<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `word`, registering it first if it is new.
    pub fn register(&mut self, word: &str) -> Token {
        if let Some(&id) = self.ids.get(word) {
            return id;
        }
        let id = Token::try_from(self.words.len()).expect("vocabulary exceeds the token id range");
        self.ids.insert(word.to_string(), id);
        self.words.push(word.to_string());
        id
    }

    /// Registers every whitespace-separated word of `text` and returns the
    /// resulting sequence.
    pub fn encode(&mut self, text: &str) -> Sequence {
        let tokens = str_to_word_vec(text)
            .iter()
            .map(|word| self.register(word))
            .collect();
        Sequence::new(tokens)
    }

    pub fn id(&self, word: &str) -> Option<Token> {
        self.ids.get(word).copied()
    }

    pub fn word(&self, id: Token) -> Option<&str> {
        self.words.get(id as usize).map(String::as_str)
    }

    /// Joins the words of `seq` with single spaces. Unknown ids are skipped.
    pub fn decode(&self, seq: &[Token]) -> String {
        seq.iter()
            .filter_map(|&id| self.word(id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

pub fn str_to_word_vec(string: &str) -> Vec<&str> {
    string.split_whitespace().collect()
}
