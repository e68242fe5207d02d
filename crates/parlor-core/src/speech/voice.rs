//! Voice selection for spoken playback.

use parlor_types::speech::Voice;

/// Voice names preferred when no English voice advertises itself as female.
const FALLBACK_VOICE_NAMES: &[&str] = &["samantha", "victoria"];

/// Pick the voice used for a chunk.
///
/// Order of preference: an English voice whose name contains "female", an
/// English voice from the fallback name list, the first English voice, then
/// the first voice at all. Returns `None` only for an empty list.
pub fn select_voice(voices: &[Voice]) -> Option<&Voice> {
    let english = || voices.iter().filter(|v| v.is_english());

    english()
        .find(|v| v.name.to_lowercase().contains("female"))
        .or_else(|| {
            english().find(|v| {
                let name = v.name.to_lowercase();
                FALLBACK_VOICE_NAMES.iter().any(|f| name.contains(f))
            })
        })
        .or_else(|| english().next())
        .or_else(|| voices.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(name: &str, lang: &str) -> Voice {
        Voice::new(name.to_lowercase(), name, lang)
    }

    #[test]
    fn test_empty_list() {
        assert!(select_voice(&[]).is_none());
    }

    #[test]
    fn test_prefers_english_female() {
        let voices = vec![
            voice("Samantha", "en-US"),
            voice("Anna Female", "de-DE"),
            voice("English Female", "en-GB"),
        ];
        assert_eq!(select_voice(&voices).unwrap().name, "English Female");
    }

    #[test]
    fn test_falls_back_to_named_voice() {
        let voices = vec![
            voice("Daniel", "en-GB"),
            voice("Victoria", "en-US"),
        ];
        assert_eq!(select_voice(&voices).unwrap().name, "Victoria");
    }

    #[test]
    fn test_falls_back_to_first_english() {
        let voices = vec![voice("Thomas", "fr-FR"), voice("Daniel", "en-GB")];
        assert_eq!(select_voice(&voices).unwrap().name, "Daniel");
    }

    #[test]
    fn test_falls_back_to_first_voice() {
        let voices = vec![voice("Thomas", "fr-FR"), voice("Anna", "de-DE")];
        assert_eq!(select_voice(&voices).unwrap().name, "Thomas");
    }

    #[test]
    fn test_deterministic_for_same_list() {
        let voices = vec![voice("Daniel", "en-GB"), voice("Karen", "en-AU")];
        assert_eq!(select_voice(&voices), select_voice(&voices));
    }
}
