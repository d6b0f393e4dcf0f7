use std::fmt;

/// What the user is asking for, derived from keywords on every turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Weather,
    Time,
    Calculation,
    AiChat,
    GeneralChat,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Weather => "weather",
            Intent::Time => "time",
            Intent::Calculation => "calculation",
            Intent::AiChat => "ai_chat",
            Intent::GeneralChat => "general_chat",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Checked top to bottom; the first intent with a matching keyword wins.
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Weather,
        &["weather", "temperature", "forecast", "rain", "sunny", "cloudy"],
    ),
    (Intent::Time, &["time", "date", "what time", "current time"]),
    (
        Intent::Calculation,
        &["calculate", "math", "plus", "minus", "multiply", "divide"],
    ),
    (
        Intent::AiChat,
        &["tell me", "explain", "what do you think", "opinion", "advice"],
    ),
];

pub struct IntentClassifier;

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Maps raw text to an intent by case-insensitive substring lookup.
    pub fn classify(&self, text: &str) -> Intent {
        let text = text.to_lowercase();

        INTENT_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::GeneralChat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Intent {
        IntentClassifier::new().classify(text)
    }

    #[test]
    fn test_weather_keywords() {
        assert_eq!(classify("What's the weather in Paris"), Intent::Weather);
        assert_eq!(classify("will it RAIN tomorrow"), Intent::Weather);
        assert_eq!(classify("is it sunny"), Intent::Weather);
    }

    #[test]
    fn test_time_keywords() {
        assert_eq!(classify("what time is it"), Intent::Time);
        assert_eq!(classify("today's date please"), Intent::Time);
    }

    #[test]
    fn test_calculation_keywords() {
        assert_eq!(classify("calculate 2 + 2"), Intent::Calculation);
        assert_eq!(classify("five plus three"), Intent::Calculation);
    }

    #[test]
    fn test_ai_chat_keywords() {
        assert_eq!(classify("Tell me a joke"), Intent::AiChat);
        assert_eq!(classify("explain borrowing"), Intent::AiChat);
    }

    #[test]
    fn test_every_keyword_maps_to_its_intent() {
        for (position, (intent, keywords)) in INTENT_KEYWORDS.iter().enumerate() {
            for keyword in keywords.iter() {
                let shadowed = INTENT_KEYWORDS[..position]
                    .iter()
                    .flat_map(|(_, earlier)| earlier.iter())
                    .any(|earlier| keyword.contains(earlier));
                if shadowed {
                    continue;
                }
                let text = format!("so, {} please", keyword.to_uppercase());
                assert_eq!(classify(&text), *intent, "keyword {keyword:?}");
            }
        }
    }

    #[test]
    fn test_weather_keywords_beat_time_keywords() {
        let (_, weather) = INTENT_KEYWORDS[0];
        let (_, time) = INTENT_KEYWORDS[1];
        for w in weather {
            for t in time {
                assert_eq!(classify(&format!("{t} {w}")), Intent::Weather, "{t} + {w}");
                assert_eq!(classify(&format!("{w} {t}")), Intent::Weather, "{w} + {t}");
            }
        }
    }

    #[test]
    fn test_weather_beats_time() {
        assert_eq!(classify("weather at this time of day"), Intent::Weather);
    }

    #[test]
    fn test_time_beats_calculation() {
        assert_eq!(classify("calculate the date"), Intent::Time);
    }

    #[test]
    fn test_calculation_beats_ai_chat() {
        assert_eq!(classify("explain how to multiply"), Intent::Calculation);
    }

    #[test]
    fn test_general_chat_fallback() {
        assert_eq!(classify("hello there"), Intent::GeneralChat);
        assert_eq!(classify(""), Intent::GeneralChat);
        assert_eq!(classify("?!?!"), Intent::GeneralChat);
        assert_eq!(classify("2 + (3 * 4)"), Intent::GeneralChat);
    }

    #[test]
    fn test_substring_matching() {
        // "sometimes" contains "time"
        assert_eq!(classify("sometimes I wonder"), Intent::Time);
    }
}
