use std::fmt;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Chain namespace accepted by the explicit pairing flow (Ethereum mainnet).
pub const MAINNET_NAMESPACE: &str = "eip155:1";

/// A chain-tagged account identifier, as carried in a settled session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub namespace: String,
    pub address: String,
}

impl Account {
    pub fn new(namespace: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            address: address.into(),
        }
    }

    /// Parses a CAIP-10 identifier (`<namespace>:<reference>:<address>`).
    pub fn parse_caip10(value: &str) -> Option<Self> {
        let (namespace, address) = value.rsplit_once(':')?;
        let (family, reference) = namespace.split_once(':')?;
        if family.is_empty() || reference.is_empty() || address.is_empty() {
            return None;
        }
        Some(Self::new(namespace, address))
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.address)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub topic: String,
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportAccount {
    ManualInput(Account),
    GeneratedRandom(Account),
    FromSession { account: Account, topic: String },
}

impl ImportAccount {
    /// Builds a manual import from typed text. Returns `None` for empty or malformed input.
    pub fn from_input(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let account = match Account::parse_caip10(input) {
            Some(account) if account.namespace.starts_with("eip155:") => {
                let address = parse_evm_address(&account.address)?;
                Account::new(account.namespace, address)
            }
            Some(account) => account,
            None => Account::new(MAINNET_NAMESPACE, parse_evm_address(input)?),
        };
        Some(Self::ManualInput(account))
    }

    /// Fresh synthetic account on `namespace`.
    pub fn generate(namespace: &str) -> Self {
        let address = Address::new(rand::random::<[u8; 20]>());
        Self::GeneratedRandom(Account::new(namespace, address.to_checksum(None)))
    }

    pub fn from_session(account: Account, topic: impl Into<String>) -> Self {
        Self::FromSession {
            account,
            topic: topic.into(),
        }
    }

    pub fn account(&self) -> &Account {
        match self {
            Self::ManualInput(account) | Self::GeneratedRandom(account) => account,
            Self::FromSession { account, .. } => account,
        }
    }

    pub fn topic(&self) -> Option<&str> {
        match self {
            Self::FromSession { topic, .. } => Some(topic),
            _ => None,
        }
    }
}

fn parse_evm_address(value: &str) -> Option<String> {
    if !value.starts_with("0x") {
        return None;
    }
    value
        .parse::<Address>()
        .ok()
        .map(|address| address.to_checksum(None))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptStatus {
    Pending,
    Completed,
    Failed,
}

impl AttemptStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Result of one of the coordinator's entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported(ImportAccount),
    /// The settled session was already claimed by another listener.
    AlreadyHandled { topic: String },
    /// Typed input did not parse; the input field should be cleared.
    InputReset,
}
