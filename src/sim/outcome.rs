//! Spin outcome classification and feedback
//!
//! Pure functions of the three center symbols; the UI layer only applies
//! the resulting flags.

use serde::Serialize;

use super::symbol::Symbol;
use crate::consts::REEL_COUNT;

/// Win tier, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WinTier {
    /// Three jackpot symbols
    #[serde(rename = "sevenSevenSeven")]
    SuperJackpot,
    /// Three of any other kind
    #[serde(rename = "jackpot")]
    Jackpot,
    /// Adjacent pair on reels 1-2 or 2-3
    #[serde(rename = "smallWin")]
    SmallWin,
    #[serde(rename = "noWin")]
    NoWin,
}

impl WinTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            WinTier::SuperJackpot => "sevenSevenSeven",
            WinTier::Jackpot => "jackpot",
            WinTier::SmallWin => "smallWin",
            WinTier::NoWin => "noWin",
        }
    }
}

/// Classify three center symbols
pub fn classify(symbols: &[Symbol; REEL_COUNT]) -> WinTier {
    let [a, b, c] = *symbols;
    if a == b && b == c {
        if a.is_jackpot() {
            WinTier::SuperJackpot
        } else {
            WinTier::Jackpot
        }
    } else if a == b || b == c {
        WinTier::SmallWin
    } else {
        WinTier::NoWin
    }
}

/// Styling class for the result display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStyle {
    Idle,
    Spinning,
    SuperJackpot,
    Jackpot,
    SmallWin,
    Lose,
}

impl ResultStyle {
    /// Extra CSS class applied next to `result-display`
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            ResultStyle::Idle | ResultStyle::Spinning => None,
            ResultStyle::SuperJackpot => Some("win-super-jackpot"),
            ResultStyle::Jackpot => Some("win-jackpot"),
            ResultStyle::SmallWin => Some("win-small"),
            ResultStyle::Lose => Some("lose"),
        }
    }
}

/// What the UI should show for an outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub text: String,
    pub style: ResultStyle,
    /// Per-reel center highlight
    pub highlights: [bool; REEL_COUNT],
    /// Shake + glow the machine housing
    pub housing_alert: bool,
    /// Confetti burst to fire, if any
    pub burst: Option<WinTier>,
}

impl Feedback {
    /// Shown before the first spin
    pub fn idle() -> Self {
        Self {
            text: "GOOD LUCK!".to_string(),
            style: ResultStyle::Idle,
            highlights: [false; REEL_COUNT],
            housing_alert: false,
            burst: None,
        }
    }

    /// Shown while reels are in motion
    pub fn spinning() -> Self {
        Self {
            text: "SPINNING...".to_string(),
            style: ResultStyle::Spinning,
            ..Self::idle()
        }
    }
}

/// A classified spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub symbols: [Symbol; REEL_COUNT],
    pub tier: WinTier,
}

impl Outcome {
    pub fn evaluate(symbols: [Symbol; REEL_COUNT]) -> Self {
        Self {
            symbols,
            tier: classify(&symbols),
        }
    }

    /// Pipe-separated readout of the three symbols
    pub fn readout(&self) -> String {
        self.symbols
            .iter()
            .map(Symbol::glyph)
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn feedback(&self) -> Feedback {
        let [a, b, c] = self.symbols;
        match self.tier {
            WinTier::SuperJackpot => Feedback {
                text: "🔥 ７７７ SUPER JACKPOT! 🔥".to_string(),
                style: ResultStyle::SuperJackpot,
                highlights: [true; REEL_COUNT],
                housing_alert: true,
                burst: Some(WinTier::SuperJackpot),
            },
            WinTier::Jackpot => Feedback {
                text: format!("🎉 JACKPOT! {a} 🎉"),
                style: ResultStyle::Jackpot,
                highlights: [true; REEL_COUNT],
                housing_alert: false,
                burst: Some(WinTier::Jackpot),
            },
            WinTier::SmallWin => Feedback {
                text: format!("💰 SMALL WIN! {} 💰", self.readout()),
                style: ResultStyle::SmallWin,
                highlights: [a == b, a == b || b == c, b == c],
                housing_alert: false,
                burst: Some(WinTier::SmallWin),
            },
            WinTier::NoWin => Feedback {
                text: format!("RESULT: {}", self.readout()),
                style: ResultStyle::Lose,
                highlights: [false; REEL_COUNT],
                housing_alert: false,
                burst: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::symbol::Symbol::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_examples() {
        assert_eq!(classify(&[Seven, Seven, Seven]), WinTier::SuperJackpot);
        assert_eq!(classify(&[Star, Star, Star]), WinTier::Jackpot);
        assert_eq!(classify(&[Star, Star, Bell]), WinTier::SmallWin);
        assert_eq!(classify(&[Bell, Star, Star]), WinTier::SmallWin);
        assert_eq!(classify(&[Bell, Star, Lemon]), WinTier::NoWin);
    }

    #[test]
    fn test_outer_pair_is_not_a_win() {
        assert_eq!(classify(&[Bell, Star, Bell]), WinTier::NoWin);
        assert_eq!(classify(&[Seven, Star, Seven]), WinTier::NoWin);
    }

    #[test]
    fn test_super_jackpot_feedback() {
        let fb = Outcome::evaluate([Seven, Seven, Seven]).feedback();
        assert_eq!(fb.text, "🔥 ７７７ SUPER JACKPOT! 🔥");
        assert_eq!(fb.highlights, [true, true, true]);
        assert!(fb.housing_alert);
        assert_eq!(fb.burst, Some(WinTier::SuperJackpot));
        assert_eq!(fb.style.css_class(), Some("win-super-jackpot"));
    }

    #[test]
    fn test_jackpot_feedback_names_symbol() {
        let fb = Outcome::evaluate([Diamond, Diamond, Diamond]).feedback();
        assert_eq!(fb.text, "🎉 JACKPOT! 💎 🎉");
        assert!(!fb.housing_alert);
        assert_eq!(fb.burst, Some(WinTier::Jackpot));
    }

    #[test]
    fn test_small_win_highlights_pair() {
        let fb = Outcome::evaluate([Star, Star, Bell]).feedback();
        assert_eq!(fb.highlights, [true, true, false]);
        assert_eq!(fb.text, "💰 SMALL WIN! ⭐ | ⭐ | 🔔 💰");

        let fb = Outcome::evaluate([Bar, Lemon, Lemon]).feedback();
        assert_eq!(fb.highlights, [false, true, true]);
        assert_eq!(fb.burst, Some(WinTier::SmallWin));
    }

    #[test]
    fn test_no_win_readout() {
        let fb = Outcome::evaluate([Bell, Star, Lemon]).feedback();
        assert_eq!(fb.text, "RESULT: 🔔 | ⭐ | 🍋");
        assert_eq!(fb.burst, None);
        assert_eq!(fb.highlights, [false; 3]);
        assert_eq!(fb.style, ResultStyle::Lose);
    }

    #[test]
    fn test_tier_names_serialize() {
        for tier in [WinTier::SuperJackpot, WinTier::Jackpot, WinTier::SmallWin, WinTier::NoWin] {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier.as_str()));
        }
    }

    #[test]
    fn test_outcome_json() {
        let outcome = Outcome::evaluate([Seven, Seven, Seven]);
        assert_eq!(
            serde_json::to_string(&outcome).unwrap(),
            r#"{"symbols":["seven","seven","seven"],"tier":"sevenSevenSeven"}"#
        );
    }

    fn any_symbol() -> impl Strategy<Value = Symbol> {
        (0usize..Symbol::ALL.len()).prop_map(|i| Symbol::ALL[i])
    }

    proptest! {
        #[test]
        fn prop_classification_matches_definition(a in any_symbol(), b in any_symbol(), c in any_symbol()) {
            let tier = classify(&[a, b, c]);
            let all_equal = a == b && b == c;
            let expected = if all_equal && a == Seven {
                WinTier::SuperJackpot
            } else if all_equal {
                WinTier::Jackpot
            } else if a == b || b == c {
                WinTier::SmallWin
            } else {
                WinTier::NoWin
            };
            prop_assert_eq!(tier, expected);
        }
    }
}
