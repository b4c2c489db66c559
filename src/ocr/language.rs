use super::{LanguageDetector, LanguageError};

/// ISO 639-3 to ISO 639-1 for the languages `whatlang` knows, sorted by the
/// three-letter code.
const ISO_639_1: &[(&str, &str)] = &[
    ("afr", "af"),
    ("aka", "ak"),
    ("amh", "am"),
    ("ara", "ar"),
    ("aze", "az"),
    ("bel", "be"),
    ("ben", "bn"),
    ("bul", "bg"),
    ("cat", "ca"),
    ("ces", "cs"),
    ("cmn", "zh"),
    ("dan", "da"),
    ("deu", "de"),
    ("ell", "el"),
    ("eng", "en"),
    ("epo", "eo"),
    ("est", "et"),
    ("fin", "fi"),
    ("fra", "fr"),
    ("guj", "gu"),
    ("heb", "he"),
    ("hin", "hi"),
    ("hrv", "hr"),
    ("hun", "hu"),
    ("hye", "hy"),
    ("ind", "id"),
    ("ita", "it"),
    ("jav", "jv"),
    ("jpn", "ja"),
    ("kan", "kn"),
    ("kat", "ka"),
    ("khm", "km"),
    ("kor", "ko"),
    ("lat", "la"),
    ("lav", "lv"),
    ("lit", "lt"),
    ("mal", "ml"),
    ("mar", "mr"),
    ("mkd", "mk"),
    ("mya", "my"),
    ("nep", "ne"),
    ("nld", "nl"),
    ("nob", "nb"),
    ("ori", "or"),
    ("pan", "pa"),
    ("pes", "fa"),
    ("pol", "pl"),
    ("por", "pt"),
    ("ron", "ro"),
    ("rus", "ru"),
    ("sin", "si"),
    ("slk", "sk"),
    ("slv", "sl"),
    ("sna", "sn"),
    ("spa", "es"),
    ("srp", "sr"),
    ("swe", "sv"),
    ("tam", "ta"),
    ("tel", "te"),
    ("tgl", "tl"),
    ("tha", "th"),
    ("tuk", "tk"),
    ("tur", "tr"),
    ("ukr", "uk"),
    ("urd", "ur"),
    ("uzb", "uz"),
    ("vie", "vi"),
    ("yid", "yi"),
    ("zul", "zu"),
];

/// Two-letter code where one exists, otherwise the three-letter code.
fn short_code(code: &'static str) -> &'static str {
    ISO_639_1
        .binary_search_by_key(&code, |&(long, _)| long)
        .map_or(code, |i| ISO_639_1[i].1)
}

/// Trigram-based detection via `whatlang`. Deterministic, so repeated runs
/// on the same text always agree.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector {
    reliable_only: bool,
}

impl WhatlangDetector {
    pub fn new(reliable_only: bool) -> Self {
        Self { reliable_only }
    }
}

impl LanguageDetector for WhatlangDetector {
    /// ISO 639-1 code of the detected language (e.g. `en`).
    fn detect(&self, text: &str) -> Result<String, LanguageError> {
        let info = whatlang::detect(text).ok_or(LanguageError::Undetermined)?;
        if self.reliable_only && !info.is_reliable() {
            log::debug!(
                "Discarding unreliable detection {} ({:.2})",
                info.lang().code(),
                info.confidence()
            );
            return Err(LanguageError::Undetermined);
        }
        Ok(short_code(info.lang().code()).to_string())
    }
}
