use serde::{Deserialize, Serialize};

/// A set of words or patterns of words for the recognition service to
/// recognize, expressed in JSpeech Grammar Format (JSGF). Parsing the
/// grammar itself is left to the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grammar {
    /// Grammar source text.
    pub src: String,

    /// Weight of this grammar relative to the others in the list.
    pub weight: f32,
}

/// Ordered list of grammars. Append-only while configuring a recognizer,
/// read-only once a session is running.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrammarList {
    list: Vec<Grammar>,
}

impl GrammarList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a grammar from a source string. Weight defaults to 1.0 in
    /// the mimicked API; pass it explicitly here.
    pub fn add_from_string(&mut self, src: impl Into<String>, weight: f32) {
        self.list.push(Grammar {
            src: src.into(),
            weight,
        });
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Grammar> {
        self.list.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Grammar> {
        self.list.iter()
    }
}
