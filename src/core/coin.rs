//! Supported coins and their static display metadata

use crate::core::error::QueryError;
use serde::{Serialize, Serializer};
use std::fmt::Display;
use std::str::FromStr;

/// Selector value meaning "do not filter by coin".
pub const ALL_COINS: &str = "ALL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Coin {
    Bitcoin,
    BinanceCoin,
    BitcoinCash,
    Dogecoin,
    Ethereum,
    Solana,
    Tether,
    Monero,
    Ripple,
}

/// Display metadata for a coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoinMeta {
    pub symbol: &'static str,
    pub display_name: &'static str,
    pub color: &'static str,
}

impl Coin {
    /// Every supported coin, in catalogue order.
    pub const ALL: [Coin; 9] = [
        Coin::Bitcoin,
        Coin::BinanceCoin,
        Coin::BitcoinCash,
        Coin::Dogecoin,
        Coin::Ethereum,
        Coin::Solana,
        Coin::Tether,
        Coin::Monero,
        Coin::Ripple,
    ];

    pub fn meta(&self) -> CoinMeta {
        let (symbol, display_name, color) = match self {
            Coin::Bitcoin => ("BTC-USD", "Bitcoin", "blue"),
            Coin::BinanceCoin => ("BNB-USD", "Binance Coin", "orange"),
            Coin::BitcoinCash => ("BCH-USD", "Bitcoin Cash", "cyan"),
            Coin::Dogecoin => ("DOGE-USD", "Dogecoin", "red"),
            Coin::Ethereum => ("ETH-USD", "Ethereum", "gold"),
            Coin::Solana => ("SOL-USD", "Solana", "lightgreen"),
            Coin::Tether => ("USDT-USD", "Tether", "purple"),
            Coin::Monero => ("XMR-USD", "Monero", "white"),
            Coin::Ripple => ("XRP-USD", "Ripple", "gray"),
        };
        CoinMeta {
            symbol,
            display_name,
            color,
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.meta().symbol
    }

    pub fn display_name(&self) -> &'static str {
        self.meta().display_name
    }

    pub fn color(&self) -> &'static str {
        self.meta().color
    }
}

impl Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Coin {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Coin::ALL
            .into_iter()
            .find(|coin| coin.symbol() == wanted)
            .ok_or_else(|| QueryError::UnknownCoin(s.to_string()))
    }
}

impl Serialize for Coin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

/// A coin selector: one coin, or the `ALL` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinSelection {
    All,
    Single(Coin),
}

impl CoinSelection {
    pub fn matches(&self, coin: Coin) -> bool {
        match self {
            CoinSelection::All => true,
            CoinSelection::Single(selected) => *selected == coin,
        }
    }
}

impl Display for CoinSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoinSelection::All => write!(f, "{ALL_COINS}"),
            CoinSelection::Single(coin) => write!(f, "{coin}"),
        }
    }
}

impl FromStr for CoinSelection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL_COINS) {
            Ok(CoinSelection::All)
        } else {
            s.parse().map(CoinSelection::Single)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbols_case_insensitively() {
        assert_eq!("BTC-USD".parse::<Coin>().unwrap(), Coin::Bitcoin);
        assert_eq!(" doge-usd ".parse::<Coin>().unwrap(), Coin::Dogecoin);
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let err = "ADA-USD".parse::<Coin>().unwrap_err();
        assert!(matches!(err, QueryError::UnknownCoin(ref s) if s == "ADA-USD"));
    }

    #[test]
    fn catalogue_has_unique_symbols() {
        let mut symbols: Vec<_> = Coin::ALL.iter().map(Coin::symbol).collect();
        symbols.sort();
        symbols.dedup();
        assert_eq!(symbols.len(), 9);
    }

    #[test]
    fn selection_handles_all_sentinel() {
        assert_eq!("all".parse::<CoinSelection>().unwrap(), CoinSelection::All);
        assert_eq!(
            "XMR-USD".parse::<CoinSelection>().unwrap(),
            CoinSelection::Single(Coin::Monero)
        );
        assert!(CoinSelection::All.matches(Coin::Ripple));
        assert!(!CoinSelection::Single(Coin::Monero).matches(Coin::Ripple));
    }

    #[test]
    fn meta_resolves_display_name_and_color() {
        let meta = Coin::Ethereum.meta();
        assert_eq!(meta.symbol, "ETH-USD");
        assert_eq!(meta.display_name, "Ethereum");
        assert_eq!(meta.color, "gold");
    }
}
