use crate::crypto::GENESIS_HASH;
use crate::error::ChainError;

use super::chain::Block;

/// Check a single block against the block before it (`None` for the first).
pub fn validate_block_link(block: &Block, previous: Option<&Block>, height: usize) -> Result<(), ChainError> {
    let expected_previous = previous.map_or(GENESIS_HASH, |b| b.hash());
    if block.previous_hash() != expected_previous {
        return Err(ChainError::InvalidBlockLinkage { height });
    }

    let recomputed = block.compute_hash();
    if recomputed != block.hash() {
        return Err(ChainError::InvalidBlock(format!(
            "Hash mismatch at height {}. Expected {}, but got {}.",
            height,
            recomputed,
            block.hash()
        )));
    }
    Ok(())
}

/// Walk the whole chain and report the first block that breaks linkage or
/// whose stored hash does not match its contents.
pub fn validate_chain(blocks: &[Block]) -> Result<(), ChainError> {
    let mut previous = None;
    for (height, block) in blocks.iter().enumerate() {
        validate_block_link(block, previous, height)?;
        previous = Some(block);
    }
    Ok(())
}
