/// Display metadata for a known EVM network.
///
/// Signing never depends on this table; unknown chain ids sign the same way
/// and only lose the friendly name and explorer link.
#[derive(Debug, Clone)]
pub struct EvmChain {
    pub chain_id: u64,
    pub name: &'static str,
    pub symbol: &'static str,
    /// Block explorer base URL, if the network has a public one.
    pub explorer_url: Option<&'static str>,
}

pub const ETHEREUM: EvmChain = EvmChain {
    chain_id: 1,
    name: "Ethereum",
    symbol: "ETH",
    explorer_url: Some("https://etherscan.io"),
};

pub const POLYGON: EvmChain = EvmChain {
    chain_id: 137,
    name: "Polygon",
    symbol: "MATIC",
    explorer_url: Some("https://polygonscan.com"),
};

pub const BSC: EvmChain = EvmChain {
    chain_id: 56,
    name: "BNB Smart Chain",
    symbol: "BNB",
    explorer_url: Some("https://bscscan.com"),
};

pub const SEPOLIA: EvmChain = EvmChain {
    chain_id: 11155111,
    name: "Sepolia",
    symbol: "ETH",
    explorer_url: Some("https://sepolia.etherscan.io"),
};

pub const HOLESKY: EvmChain = EvmChain {
    chain_id: 17000,
    name: "Holesky",
    symbol: "ETH",
    explorer_url: Some("https://holesky.etherscan.io"),
};

/// Ganache's default chain id.
pub const GANACHE: EvmChain = EvmChain {
    chain_id: 1337,
    name: "Ganache (local)",
    symbol: "ETH",
    explorer_url: None,
};

/// Anvil / Hardhat default chain id.
pub const LOCAL_DEV: EvmChain = EvmChain {
    chain_id: 31337,
    name: "Local devnet",
    symbol: "ETH",
    explorer_url: None,
};

const ALL_CHAINS: &[&EvmChain] = &[
    &ETHEREUM, &POLYGON, &BSC, &SEPOLIA, &HOLESKY, &GANACHE, &LOCAL_DEV,
];

/// Returns the chain definition for a given chain ID, or `None` if unknown.
pub fn get_chain(chain_id: u64) -> Option<&'static EvmChain> {
    ALL_CHAINS
        .iter()
        .find(|c| c.chain_id == chain_id)
        .copied()
}

/// Human-readable label, e.g. `Sepolia (chain 11155111)`.
pub fn describe_chain(chain_id: u64) -> String {
    match get_chain(chain_id) {
        Some(chain) => format!("{} (chain {chain_id})", chain.name),
        None => format!("chain {chain_id}"),
    }
}

/// Native currency symbol, falling back to `ETH`.
pub fn native_symbol(chain_id: u64) -> &'static str {
    get_chain(chain_id).map_or("ETH", |c| c.symbol)
}

/// Explorer page for a transaction hash on chains that have one.
pub fn explorer_tx_url(chain_id: u64, tx_hash: &str) -> Option<String> {
    get_chain(chain_id)
        .and_then(|c| c.explorer_url)
        .map(|base| format!("{base}/tx/{tx_hash}"))
}
