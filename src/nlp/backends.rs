//! Built-in enhancement providers.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use unicode_segmentation::UnicodeSegmentation;

use super::enhancement::{BackendError, LinguisticBackend, PosTag};
use super::language::{is_arabic_char, Language};
use super::normalizer::{is_stop_word, normalize_token, strip_diacritics};

/// Rule-based Arabic morphological analyzer.
///
/// Detaches conjunction and preposition proclitics and tags tokens from
/// surface cues (article, feminine and plural endings, imperfect prefixes).
/// An optional lexicon (one noun per line) extends noun recognition; when
/// configured it must be readable or the provider reports itself unavailable.
pub struct ArabicMorphology {
    lexicon_path: Option<PathBuf>,
    lexicon: OnceCell<HashSet<String>>,
}

const ARTICLE: &str = "ال";
const CONJUNCTIONS: [char; 2] = ['و', 'ف'];
const PREPOSITIONS: [char; 3] = ['ب', 'ك', 'ل'];
const IMPERFECT_PREFIXES: [char; 4] = ['ي', 'ت', 'ن', 'أ'];

struct Analysis {
    token: String,
    tag: PosTag,
}

impl Default for ArabicMorphology {
    fn default() -> Self {
        Self::new()
    }
}

impl ArabicMorphology {
    pub const NAME: &'static str = "arabic-morphology";

    pub fn new() -> Self {
        Self {
            lexicon_path: None,
            lexicon: OnceCell::new(),
        }
    }

    pub fn with_lexicon(path: &Path) -> Self {
        Self {
            lexicon_path: Some(path.to_path_buf()),
            lexicon: OnceCell::new(),
        }
    }

    fn load_lexicon(&self) -> Result<HashSet<String>, BackendError> {
        let Some(path) = &self.lexicon_path else {
            return Ok(HashSet::new());
        };
        let content = fs::read_to_string(path).map_err(|e| BackendError::Unavailable {
            backend: Self::NAME,
            reason: format!("cannot read lexicon {}: {}", path.display(), e),
        })?;
        Ok(content
            .lines()
            .map(|line| normalize_token(line.trim(), Language::Arabic))
            .filter(|w| !w.is_empty())
            .collect())
    }

    fn in_lexicon(&self, token: &str) -> bool {
        let Some(lexicon) = self.lexicon.get() else {
            return false;
        };
        let normalized = normalize_token(token, Language::Arabic);
        lexicon.contains(&normalized)
            || normalized
                .strip_prefix(ARTICLE)
                .map(|bare| lexicon.contains(bare))
                .unwrap_or(false)
    }

    fn analyze(&self, raw: &str) -> Option<Analysis> {
        let bare = strip_diacritics(raw);
        let bare = bare.trim_matches(|c: char| !c.is_alphanumeric()).to_string();
        if bare.is_empty() {
            return None;
        }

        if is_stop_word(&normalize_token(&bare, Language::Arabic), Language::Arabic) {
            return Some(Analysis {
                token: bare,
                tag: PosTag::Particle,
            });
        }

        let token = detach_proclitics(&bare, |rest| self.in_lexicon(rest));
        let tag = self.tag(&token);
        Some(Analysis { token, tag })
    }

    /// Tag a token whose clitics are already detached.
    fn tag(&self, token: &str) -> PosTag {
        if is_stop_word(&normalize_token(token, Language::Arabic), Language::Arabic) {
            return PosTag::Particle;
        }
        let len = token.chars().count();
        let definite = token.starts_with(ARTICLE) && len > 3;
        if definite || token.ends_with('ة') || token.ends_with("ات") || self.in_lexicon(token) {
            PosTag::Noun
        } else if len >= 4
            && (token.starts_with("سي") || token.starts_with("ست") || starts_with_any(token, &IMPERFECT_PREFIXES))
        {
            PosTag::Verb
        } else {
            PosTag::Other
        }
    }

    fn analyze_sentence(&self, sentence: &str) -> Result<Vec<Analysis>, BackendError> {
        if !sentence.chars().any(is_arabic_char) {
            return Err(BackendError::Unsupported {
                backend: Self::NAME,
                reason: "no Arabic script in sentence".into(),
            });
        }
        Ok(sentence
            .split_whitespace()
            .filter_map(|word| self.analyze(word))
            .collect())
    }
}

fn starts_with_any(word: &str, prefixes: &[char]) -> bool {
    word.chars().next().map(|c| prefixes.contains(&c)).unwrap_or(false)
}

fn has_article(chars: &[char]) -> bool {
    chars.len() > 3 && chars[0] == 'ا' && chars[1] == 'ل'
}

fn has_fused_article(chars: &[char]) -> bool {
    (chars.len() > 4 && PREPOSITIONS.contains(&chars[0]) && chars[1] == 'ا' && chars[2] == 'ل')
        || (chars.len() > 3 && chars[0] == 'ل' && chars[1] == 'ل')
}

/// Strip a leading conjunction and fold a preposition fused with the article
/// (`بال`, `كال`, `لل`) back to the bare article. The article itself is kept so
/// tagging can still see definiteness.
///
/// A leading `و`/`ف` is only a conjunction when what follows carries the
/// article or is a known word; otherwise it belongs to the root (`فكرة`, `وزارة`).
fn detach_proclitics<F>(word: &str, known: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut chars: Vec<char> = word.chars().collect();

    if chars.len() > 3 && CONJUNCTIONS.contains(&chars[0]) {
        let rest = &chars[1..];
        let rest_word: String = rest.iter().collect();
        if has_article(rest) || has_fused_article(rest) || known(&rest_word) {
            chars.remove(0);
        }
    }

    if has_fused_article(&chars) {
        if chars[0] == 'ل' && chars[1] == 'ل' {
            chars[0] = 'ا';
        } else {
            chars.remove(0);
        }
    }

    chars.into_iter().collect()
}

impl LinguisticBackend for ArabicMorphology {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn probe(&self) -> Result<(), BackendError> {
        let lexicon = self.load_lexicon()?;
        let _ = self.lexicon.set(lexicon);
        Ok(())
    }

    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, BackendError> {
        Ok(self
            .analyze_sentence(sentence)?
            .into_iter()
            .map(|a| a.token)
            .collect())
    }

    fn pos_tag(&self, tokens: &[String]) -> Result<Option<Vec<PosTag>>, BackendError> {
        // Tokens come from `tokenize`, so clitics are already detached.
        let tags = tokens.iter().map(|t| self.tag(t)).collect();
        Ok(Some(tags))
    }
}

/// Tokenization-only provider using Unicode word boundaries (UAX #29).
pub struct UnicodeWords;

impl UnicodeWords {
    pub const NAME: &'static str = "unicode-words";
}

impl LinguisticBackend for UnicodeWords {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn probe(&self) -> Result<(), BackendError> {
        Ok(())
    }

    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, BackendError> {
        Ok(sentence.unicode_words().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn unknown(_: &str) -> bool {
        false
    }

    #[test]
    fn test_detach_proclitics() {
        assert_eq!(detach_proclitics("والكتاب", unknown), "الكتاب");
        assert_eq!(detach_proclitics("بالمدرسة", unknown), "المدرسة");
        assert_eq!(detach_proclitics("للطالب", unknown), "الطالب");
        assert_eq!(detach_proclitics("وبالمدرسة", unknown), "المدرسة");
        assert_eq!(detach_proclitics("كتب", unknown), "كتب");
    }

    #[test]
    fn test_root_initial_waw_and_fa_kept() {
        assert_eq!(detach_proclitics("فكرة", unknown), "فكرة");
        assert_eq!(detach_proclitics("وزارة", unknown), "وزارة");
        assert_eq!(detach_proclitics("فوائد", unknown), "فوائد");
        assert_eq!(detach_proclitics("وقلم", |w| w == "قلم"), "قلم");

        let morph = ArabicMorphology::new();
        let tokens = morph.tokenize("فكرة الوزارة وزارة فوائد").unwrap();
        assert_eq!(tokens, vec!["فكرة", "الوزارة", "وزارة", "فوائد"]);
        let tags = morph.pos_tag(&tokens).unwrap().unwrap();
        assert_eq!(tags, vec![PosTag::Noun, PosTag::Noun, PosTag::Noun, PosTag::Other]);
    }

    #[test]
    fn test_tokenize_strips_clitics() {
        let morph = ArabicMorphology::new();
        let tokens = morph.tokenize("ذهب الطالب إلى المدرسة").unwrap();
        assert_eq!(tokens, vec!["ذهب", "الطالب", "إلى", "المدرسة"]);
    }

    #[test]
    fn test_rejects_non_arabic_sentence() {
        let morph = ArabicMorphology::new();
        assert!(matches!(
            morph.tokenize("plain latin text"),
            Err(BackendError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_pos_tags_nouns() {
        let morph = ArabicMorphology::new();
        let tags = morph
            .pos_tag(&[
                "مدرسة".to_string(),
                "إلى".to_string(),
                "يكتبون".to_string(),
                "الكتاب".to_string(),
            ])
            .unwrap()
            .unwrap();
        assert_eq!(tags, vec![PosTag::Noun, PosTag::Particle, PosTag::Verb, PosTag::Noun]);
    }

    #[test]
    fn test_lexicon_extends_nouns() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "قلم")?;
        let morph = ArabicMorphology::with_lexicon(file.path());
        morph.probe()?;
        let tags = morph.pos_tag(&["قلم".to_string()])?.unwrap_or_default();
        assert_eq!(tags, vec![PosTag::Noun]);
        Ok(())
    }

    #[test]
    fn test_unicode_words() {
        let tokens = UnicodeWords.tokenize("Hello, world! مرحبا بالعالم").unwrap();
        assert_eq!(tokens, vec!["Hello", "world", "مرحبا", "بالعالم"]);
        assert_eq!(UnicodeWords.pos_tag(&tokens).unwrap(), None);
    }
}
