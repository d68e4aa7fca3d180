//! Reel symbols and strips
//!
//! A strip is the long ribbon of symbols a reel scrolls through. Strips are
//! rebuilt from fresh shuffles on every spin so no pattern carries over.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::Serialize;

use crate::consts::{STRIP_TAIL_LEN, VISIBLE_SYMBOLS};

/// Symbols printed on the reels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Cherry,
    Lemon,
    Watermelon,
    Star,
    Bell,
    Diamond,
    Bar,
    /// Jackpot symbol
    Seven,
}

impl Symbol {
    /// The full alphabet, in display order
    pub const ALL: [Symbol; 8] = [
        Symbol::Cherry,
        Symbol::Lemon,
        Symbol::Watermelon,
        Symbol::Star,
        Symbol::Bell,
        Symbol::Diamond,
        Symbol::Bar,
        Symbol::Seven,
    ];

    /// The symbol that pays the super jackpot
    pub const JACKPOT: Symbol = Symbol::Seven;

    /// Text shown on the reel
    pub fn glyph(&self) -> &'static str {
        match self {
            Symbol::Cherry => "🍒",
            Symbol::Lemon => "🍋",
            Symbol::Watermelon => "🍉",
            Symbol::Star => "⭐",
            Symbol::Bell => "🔔",
            Symbol::Diamond => "💎",
            Symbol::Bar => "BAR",
            Symbol::Seven => "７",
        }
    }

    #[inline]
    pub fn is_jackpot(&self) -> bool {
        *self == Self::JACKPOT
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

/// An ordered ribbon of symbols, never shorter than the visible window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip {
    symbols: Vec<Symbol>,
}

impl Strip {
    /// Wrap an explicit symbol sequence (None if it can't fill the window)
    pub fn from_symbols(symbols: Vec<Symbol>) -> Option<Self> {
        if symbols.len() < VISIBLE_SYMBOLS {
            return None;
        }
        Some(Self { symbols })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Symbol> {
        self.symbols.get(index).copied()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Lowest index that can sit in the middle row
    #[inline]
    pub fn min_center(&self) -> usize {
        crate::center_row()
    }

    /// Highest index that can sit in the middle row
    #[inline]
    pub fn max_center(&self) -> usize {
        self.len() - 1 - crate::center_row()
    }

    /// Whether `index` leaves a full visible window around it
    #[inline]
    pub fn is_legal_center(&self, index: usize) -> bool {
        index >= self.min_center() && index <= self.max_center()
    }

    /// Highest index that can sit in the top row
    #[inline]
    pub fn max_top(&self) -> usize {
        self.len() - VISIBLE_SYMBOLS
    }
}

/// Build a fresh strip: `repeats` full shuffles of the alphabet followed by
/// a tail of independent random picks, padded up to `visible_count`.
pub fn build_strip<R: Rng + ?Sized>(rng: &mut R, visible_count: usize, repeats: usize) -> Strip {
    let mut symbols = Vec::with_capacity(repeats * Symbol::ALL.len() + STRIP_TAIL_LEN);

    for _ in 0..repeats {
        let mut block = Symbol::ALL;
        block.shuffle(rng);
        symbols.extend_from_slice(&block);
    }

    let tail = STRIP_TAIL_LEN.max(visible_count.saturating_sub(symbols.len()));
    for _ in 0..tail {
        // ALL is non-empty so choose always yields
        if let Some(sym) = Symbol::ALL.choose(rng) {
            symbols.push(*sym);
        }
    }

    Strip { symbols }
}
