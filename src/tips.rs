//! Static informational content: blog tips, wellness tips and daily quotes.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tip {
    pub title: &'static str,
    pub content: &'static str,
}

pub const BLOG_TIPS: [Tip; 6] = [
    Tip {
        title: "Be Consistent",
        content: "Regular posting keeps your audience engaged. Try to establish a consistent schedule.",
    },
    Tip {
        title: "Take Breaks",
        content: "Quality over quantity. It's okay to take breaks to avoid burnout and maintain quality.",
    },
    Tip {
        title: "Read Others",
        content: "Reading other blogs in your niche helps you stay inspired and informed.",
    },
    Tip {
        title: "Track Analytics",
        content: "Use analytics to understand what content resonates with your audience.",
    },
    Tip {
        title: "Plan Ahead",
        content: "Create a content calendar to stay organized and maintain a consistent posting schedule.",
    },
    Tip {
        title: "Quality Matters",
        content: "Focus on creating valuable, high-quality content that solves problems for your readers.",
    },
];

pub const WELLNESS_TIPS: [&str; 4] = [
    "Drink at least 8 glasses of water daily",
    "Take short breaks to stretch every hour",
    "Practice mindfulness for 10 minutes a day",
    "Aim for 7-9 hours of quality sleep",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    fn new(text: &str, author: &str) -> Self {
        Self {
            text: text.to_string(),
            author: author.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Quote source unavailable: {0}")]
    Unavailable(String),
}

/// Somewhere quotes can be fetched from
pub trait QuoteSource {
    fn fetch(&self) -> Result<Vec<Quote>, QuoteError>;
}

/// Always serves the built-in list
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackQuotes;

impl QuoteSource for FallbackQuotes {
    fn fetch(&self) -> Result<Vec<Quote>, QuoteError> {
        Ok(fallback_quotes())
    }
}

pub fn fallback_quotes() -> Vec<Quote> {
    vec![
        Quote::new("Take care of your body. It's the only place you have to live.", "Jim Rohn"),
        Quote::new("Happiness is the highest form of health.", "Dalai Lama"),
        Quote::new("An early-morning walk is a blessing for the whole day.", "Henry David Thoreau"),
        Quote::new("Small daily improvements are the key to staggering long-term results.", "Robin Sharma"),
        Quote::new("Sleep is the best meditation.", "Dalai Lama"),
    ]
}

/// Quotes from `source`, or the built-in list when it fails or returns nothing
pub fn quotes_or_fallback(source: &dyn QuoteSource) -> Vec<Quote> {
    match source.fetch() {
        Ok(quotes) if !quotes.is_empty() => quotes,
        Ok(_) => {
            log::info!("Quote source returned no quotes, using fallback list");
            fallback_quotes()
        }
        Err(e) => {
            log::warn!("Failed to fetch quotes, using fallback list: {}", e);
            fallback_quotes()
        }
    }
}

/// Pick a stable quote for `date`
pub fn quote_for_day(quotes: &[Quote], date: NaiveDate) -> Option<&Quote> {
    if quotes.is_empty() {
        return None;
    }
    quotes.get(date.ordinal0() as usize % quotes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl QuoteSource for Failing {
        fn fetch(&self) -> Result<Vec<Quote>, QuoteError> {
            Err(QuoteError::Unavailable("offline".into()))
        }
    }

    struct Empty;

    impl QuoteSource for Empty {
        fn fetch(&self) -> Result<Vec<Quote>, QuoteError> {
            Ok(Vec::new())
        }
    }

    struct Fixed;

    impl QuoteSource for Fixed {
        fn fetch(&self) -> Result<Vec<Quote>, QuoteError> {
            Ok(vec![Quote::new("Move.", "Coach")])
        }
    }

    #[test]
    fn failures_fall_back_to_builtin_list() {
        assert_eq!(quotes_or_fallback(&Failing), fallback_quotes());
        assert_eq!(quotes_or_fallback(&Empty), fallback_quotes());
        assert_eq!(quotes_or_fallback(&Fixed)[0].author, "Coach");
    }

    #[test]
    fn quote_for_day_is_stable_and_rotates() {
        let quotes = fallback_quotes();
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(quote_for_day(&quotes, d1), quote_for_day(&quotes, d1));
        assert_ne!(quote_for_day(&quotes, d1), quote_for_day(&quotes, d2));
        assert_eq!(quote_for_day(&[], d1), None);
    }
}
