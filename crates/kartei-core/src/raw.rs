/// Unnormalized output of a lexical source. Every field is optional except
/// the sense list; different sources populate different subsets.
#[derive(Debug, Clone, Default)]
pub struct RawLexicalData {
    /// Senses in the order the source returned them. The merger treats
    /// this order as authoritative and never re-sorts.
    pub senses: Vec<RawSense>,
    /// Entry-level phonetic transcription
    pub ipa: Option<String>,
    /// Entry-level synonym/antonym hints (sense-level ones are separate)
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    /// Grammatical article, where the language has one (der/die/das)
    pub article: Option<String>,
    /// Plural form, where the source exposes one
    pub plural: Option<String>,
    /// URL of the source entry
    pub source_url: Option<String>,
}

/// One sense as the source shaped it
#[derive(Debug, Clone, Default)]
pub struct RawSense {
    pub definition: String,
    pub example: Option<String>,
    pub pos: Option<String>,
    pub ipa: Option<String>,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

impl RawSense {
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            ..Default::default()
        }
    }
}
