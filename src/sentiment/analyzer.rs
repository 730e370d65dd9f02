use vader_sentiment::SentimentIntensityAnalyzer;

const COMPOUND: &str = "compound";

///
/// VADER polarity analyzer producing a compound score in [-1, 1].
///
/// The full VADER lexicon (words, slang, emoticons and idioms) is loaded the
/// first time any analyzer scores text and is shared afterwards. Construct
/// one and pass it by reference; it holds no per-call state.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        SentimentAnalyzer
    }

    ///
    /// Compound polarity of `text`, rounded to four decimals.
    ///
    /// ## Arguments
    ///
    /// * `text` - Free review text. Empty or sentiment-free text scores 0.0.
    ///
    pub fn compound(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let analyzer = SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        let compound = scores.get(COMPOUND).copied().unwrap_or(0.0);
        round4(compound.clamp(-1.0, 1.0))
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
