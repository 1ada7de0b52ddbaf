pub mod recovery;

use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::types::{PropertyId, TokenId};

pub use recovery::{recover_token_id, RecoveredToken};

/// event name emitted by the token contract on a successful mint
pub const TOKENIZED_EVENT: &str = "PropertyTokenized";
/// generic transfer event name
pub const TRANSFER_EVENT: &str = "Transfer";

/// one log entry from a mint transaction. decoding is best-effort:
/// `event`, `token_id` and `recipient` are present only when the log
/// parsed against the contract abi; `topics` always carries the raw
/// indexed values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenLog {
    pub contract: String,
    pub event: Option<String>,
    pub token_id: Option<TokenId>,
    pub recipient: Option<String>,
    pub topics: Vec<String>,
}

/// receipt returned by the mint operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MintReceipt {
    pub transaction_hash: String,
    pub token_contract: String,
    pub logs: Vec<TokenLog>,
}

/// external token contract surface. the platform drives it opaquely;
/// signing and transport belong to the implementation
pub trait TokenChain {
    /// mint a token for the property, returning the transaction receipt
    fn mint(&mut self, to: &str, property_id: PropertyId, value: Money) -> Result<MintReceipt>;

    /// tokens held by an owner, in indexing order (most recent last)
    fn tokens_of_owner(&self, owner: &str) -> Result<Vec<TokenId>>;

    /// property a token references, if any
    fn token_property(&self, token_id: TokenId) -> Result<Option<PropertyId>>;
}

/// which fallback produced a recovered token id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryStrategy {
    /// decoded tokenization event in the receipt
    TokenizedEvent,
    /// recipient's token index, verified against the expected property
    OwnerIndex,
    /// decoded transfer event addressed to the recipient
    TransferEvent,
    /// raw topic of a token-contract log decoded as a big integer
    RawTopic,
}

impl RecoveryStrategy {
    /// full fallback chain, in trial order
    pub const ORDER: [RecoveryStrategy; 4] = [
        RecoveryStrategy::TokenizedEvent,
        RecoveryStrategy::OwnerIndex,
        RecoveryStrategy::TransferEvent,
        RecoveryStrategy::RawTopic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryStrategy::TokenizedEvent => "tokenized_event",
            RecoveryStrategy::OwnerIndex => "owner_index",
            RecoveryStrategy::TransferEvent => "transfer_event",
            RecoveryStrategy::RawTopic => "raw_topic",
        }
    }
}
