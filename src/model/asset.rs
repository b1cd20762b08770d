use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// Trades every calendar day; carries price and volume.
    Crypto,
    /// Trades on its own calendar; price only, forward-filled onto the daily grid.
    NonCrypto,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Asset {
    pub symbol: String,
    pub class: AssetClass,
}

impl Asset {
    pub fn crypto(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            class: AssetClass::Crypto,
        }
    }

    pub fn non_crypto(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            class: AssetClass::NonCrypto,
        }
    }

    pub fn is_crypto(&self) -> bool {
        self.class == AssetClass::Crypto
    }

    pub fn price_column(&self) -> &str {
        &self.symbol
    }

    pub fn volume_column(&self) -> Option<String> {
        self.is_crypto().then(|| volume_column(&self.symbol))
    }
}

pub fn volume_column(symbol: &str) -> String {
    format!("{}_volume", symbol)
}

pub fn px_std_column(symbol: &str) -> String {
    format!("{}_px_std", symbol)
}

pub fn volume_std_column(symbol: &str) -> String {
    format!("{}_volume_std", symbol)
}
