//! Static coin catalog grouped by mining algorithm
//!
//! The catalog is immutable. Searching produces a derived view that borrows
//! from it; nothing here holds mutable state.

use serde::Serialize;

/// A coin offered by the calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coin {
    pub name: &'static str,
    pub symbol: &'static str,
}

/// Coins sharing a proof-of-work algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmGroup {
    pub algorithm: &'static str,
    pub coins: &'static [Coin],
}

/// A filtered group; coins keep catalog order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
    pub algorithm: &'static str,
    pub coins: Vec<&'static Coin>,
}

/// Popular coins, in display order
pub static CATALOG: &[AlgorithmGroup] = &[
    AlgorithmGroup {
        algorithm: "SHA-256",
        coins: &[
            Coin { name: "Bitcoin", symbol: "BTC" },
            Coin { name: "Bitcoin Cash", symbol: "BCH" },
        ],
    },
    AlgorithmGroup {
        algorithm: "Scrypt",
        coins: &[
            Coin { name: "Litecoin", symbol: "LTC" },
            Coin { name: "Dogecoin", symbol: "DOGE" },
        ],
    },
    AlgorithmGroup {
        algorithm: "Ethash",
        coins: &[Coin { name: "Ethereum Classic", symbol: "ETC" }],
    },
    AlgorithmGroup {
        algorithm: "X11",
        coins: &[Coin { name: "Dash", symbol: "DASH" }],
    },
    AlgorithmGroup {
        algorithm: "CryptoNight",
        coins: &[Coin { name: "Monero", symbol: "XMR" }],
    },
    AlgorithmGroup {
        algorithm: "Equihash",
        coins: &[Coin { name: "Zcash", symbol: "ZEC" }],
    },
];

/// Filter the catalog by a case-insensitive search on name or symbol
///
/// Groups left without coins are dropped. An empty search keeps everything.
pub fn filter(search: &str) -> Vec<GroupView> {
    let needle = search.to_lowercase();

    CATALOG
        .iter()
        .filter_map(|group| {
            let coins: Vec<&'static Coin> = group
                .coins
                .iter()
                .filter(|coin| {
                    coin.name.to_lowercase().contains(&needle)
                        || coin.symbol.to_lowercase().contains(&needle)
                })
                .collect();

            (!coins.is_empty()).then_some(GroupView {
                algorithm: group.algorithm,
                coins,
            })
        })
        .collect()
}

/// Keep `current` if the view still lists it, otherwise fall back to the
/// first coin in the view
pub fn reconcile_selection(current: Option<&str>, view: &[GroupView]) -> Option<&'static str> {
    let mut coins = view.iter().flat_map(|group| group.coins.iter());
    let kept = current.and_then(|current| {
        view.iter()
            .flat_map(|group| group.coins.iter())
            .find(|coin| coin.symbol == current)
    });

    kept.or_else(|| coins.next()).map(|coin| coin.symbol)
}

/// Find a coin and its algorithm by exact symbol
pub fn find(symbol: &str) -> Option<(&'static str, &'static Coin)> {
    CATALOG.iter().find_map(|group| {
        group
            .coins
            .iter()
            .find(|coin| coin.symbol == symbol)
            .map(|coin| (group.algorithm, coin))
    })
}
