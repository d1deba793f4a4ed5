//! Tally prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLine, ItemKind, TAX_RATE, Totals},
    catalog::{CatalogError, CatalogFilters, CatalogSource, Report},
    checkout::{
        Checkout, CheckoutError, CheckoutState, Confirmation, GatewayError, MobileProvider,
        PaymentDetails, PaymentGateway, PaymentMethod, SimulatedGateway,
        validation::{Field, FieldError, FieldErrors},
    },
    ranking::{
        CategoryFilter, RankableReport, SortBy, Tab, categories, decorate_all, display_order,
        filter_by_category, filter_by_query, rank, sort_by,
    },
    storage::{CartStorage, JsonFileStorage, MemoryStorage, StorageError},
};
