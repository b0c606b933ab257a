//! Stock lists: compact quantity/key inventories
//!
//! Containers and rooms list their starting items on one line, e.g.
//! `[2xHealth_Potion,1xDagger]`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

static STOCK_LIST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([1-9][0-9]*x[A-Z][A-Za-z_]+(?:,[1-9][0-9]*x[A-Z][A-Za-z_]+)*)\]$").unwrap()
});

/// Errors parsing a stock list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockListError {
    #[error("malformed stock list '{0}' (expected [<qty>x<Key>,...])")]
    Malformed(String),

    #[error("quantity out of range in stock entry '{0}'")]
    QuantityOutOfRange(String),
}

/// One `<qty>x<Key>` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockEntry {
    pub quantity: u32,
    pub key: String,
}

/// Parse a stock list like `[3xGold_Coin,1xRapier]`
pub fn parse_stock_list(text: &str) -> Result<Vec<StockEntry>, StockListError> {
    let text = text.trim();
    let inner = STOCK_LIST_REGEX
        .captures(text)
        .and_then(|c| c.get(1))
        .ok_or_else(|| StockListError::Malformed(text.to_string()))?;

    inner
        .as_str()
        .split(',')
        .map(|entry| {
            // The regex guarantees exactly one 'x' between digits and key
            let (qty, key) = entry
                .split_once('x')
                .ok_or_else(|| StockListError::Malformed(text.to_string()))?;
            let quantity = qty
                .parse()
                .map_err(|_| StockListError::QuantityOutOfRange(entry.to_string()))?;
            Ok(StockEntry {
                quantity,
                key: key.to_string(),
            })
        })
        .collect()
}
