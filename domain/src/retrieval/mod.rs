//! Retrieval fusion domain.
//!
//! Turns per-query ranked lists into one bounded context:
//!
//! - [`query`] - [`Query`](query::Query) and parsing of diversified query output
//! - [`document`] - [`Document`](document::Document) with a content-derived key
//! - [`ranking`] - [`RankedList`](ranking::RankedList) and [`FusedRanking`](ranking::FusedRanking)
//! - [`fusion`] - Reciprocal Rank Fusion ([`RrfFusion`](fusion::RrfFusion))
//! - [`context`] - top-K context assembly

pub mod context;
pub mod document;
pub mod fusion;
pub mod query;
pub mod ranking;
