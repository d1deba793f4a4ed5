//! Tally
//!
//! Tally is the cart, pricing and checkout engine behind a research-report
//! storefront: a persistent shopping cart with derived totals, a pure
//! filter-and-ranking engine for the report listing, and a checkout flow
//! that validates per-method payment details before settling.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod fixtures;
pub mod prelude;
pub mod ranking;
pub mod storage;
