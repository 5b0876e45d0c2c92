//! Context window assembly from a fused ranking.

use super::ranking::FusedRanking;

/// Separator placed between document bodies in the context.
pub const CONTEXT_DELIMITER: &str = "\n\n";

/// Default number of documents kept in the context.
pub const DEFAULT_TOP_K: usize = 30;

/// Concatenate the bodies of the first `top_k` fused documents, in fused order.
///
/// An empty ranking (or `top_k == 0`) yields an empty string.
pub fn assemble_context(ranking: &FusedRanking, top_k: usize) -> String {
    ranking
        .top(top_k)
        .iter()
        .map(|entry| entry.document.body())
        .collect::<Vec<_>>()
        .join(CONTEXT_DELIMITER)
}
