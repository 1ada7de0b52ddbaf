use tracing::{debug, info, warn};

use crate::chain::{
    MintReceipt, RecoveryStrategy, TokenChain, TOKENIZED_EVENT, TRANSFER_EVENT,
};
use crate::errors::{LendingError, Result};
use crate::types::{PropertyId, TokenId};

/// token id recovered after a mint, with the strategy that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveredToken {
    pub token_id: TokenId,
    pub strategy: RecoveryStrategy,
}

/// determine which token id a mint transaction assigned. the direct
/// event-parsing result is not always available, so an ordered chain of
/// fallbacks is tried; the first success wins and the strategy used is
/// logged. best-effort only: exhausting the chain is a hard failure
/// requiring manual reconciliation.
pub fn recover_token_id<C: TokenChain>(
    receipt: &MintReceipt,
    recipient: &str,
    expected_property: PropertyId,
    chain: &C,
) -> Result<RecoveredToken> {
    for strategy in RecoveryStrategy::ORDER {
        debug!(
            strategy = strategy.as_str(),
            tx = %receipt.transaction_hash,
            "attempting token id recovery"
        );

        let found = match strategy {
            RecoveryStrategy::TokenizedEvent => from_tokenized_event(receipt),
            RecoveryStrategy::OwnerIndex => {
                from_owner_index(chain, recipient, expected_property)?
            }
            RecoveryStrategy::TransferEvent => from_transfer_event(receipt, recipient),
            RecoveryStrategy::RawTopic => from_raw_topic(receipt),
        };

        if let Some(token_id) = found {
            info!(
                strategy = strategy.as_str(),
                %token_id,
                tx = %receipt.transaction_hash,
                "token id recovered"
            );
            return Ok(RecoveredToken { token_id, strategy });
        }
    }

    warn!(tx = %receipt.transaction_hash, "token id recovery exhausted all strategies");
    Err(LendingError::TokenIdUndeterminable {
        transaction_hash: receipt.transaction_hash.clone(),
    })
}

/// strategy 1: a decoded tokenization event carries the token id directly
fn from_tokenized_event(receipt: &MintReceipt) -> Option<TokenId> {
    receipt
        .logs
        .iter()
        .find(|log| log.event.as_deref() == Some(TOKENIZED_EVENT))
        .and_then(|log| log.token_id)
}

/// strategy 2: assume the recipient's most recently indexed token, but
/// verify it references the expected property; if it does not, scan the
/// recipient's tokens for one that does
fn from_owner_index<C: TokenChain>(
    chain: &C,
    recipient: &str,
    expected_property: PropertyId,
) -> Result<Option<TokenId>> {
    let tokens = chain.tokens_of_owner(recipient)?;

    if let Some(&latest) = tokens.last() {
        if chain.token_property(latest)? == Some(expected_property) {
            return Ok(Some(latest));
        }
        for &token_id in &tokens {
            if chain.token_property(token_id)? == Some(expected_property) {
                return Ok(Some(token_id));
            }
        }
    }

    Ok(None)
}

/// strategy 3: a decoded generic transfer addressed to the recipient
fn from_transfer_event(receipt: &MintReceipt, recipient: &str) -> Option<TokenId> {
    receipt
        .logs
        .iter()
        .find(|log| {
            log.event.as_deref() == Some(TRANSFER_EVENT)
                && log
                    .recipient
                    .as_deref()
                    .is_some_and(|r| r.eq_ignore_ascii_case(recipient))
        })
        .and_then(|log| log.token_id)
}

/// strategy 4: decode the last indexed topic of a token-contract log as
/// a big integer, latest log first
fn from_raw_topic(receipt: &MintReceipt) -> Option<TokenId> {
    receipt
        .logs
        .iter()
        .rev()
        .filter(|log| log.contract.eq_ignore_ascii_case(&receipt.token_contract))
        .find_map(|log| log.topics.last().and_then(|t| TokenId::from_hex_topic(t)))
}
