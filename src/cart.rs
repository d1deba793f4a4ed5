//! Cart store

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::storage::CartStorage;

/// Fixed sales-tax rate applied to every cart subtotal.
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// What kind of catalog entry a cart line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A one-off research report purchase.
    Report,
    /// A subscription plan. Quantity controls are not exposed for these in
    /// the storefront, but the store itself does not special-case them.
    Subscription,
}

/// One purchasable entry in the cart: a catalog item and its quantity.
///
/// Serialized field names match the legacy snapshot layout (`unitPrice`,
/// `thumbnailUrl`), with aliases accepted for the older `type`/`price` keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog id, unique within the cart.
    pub id: String,

    /// Report or subscription.
    #[serde(alias = "type")]
    pub kind: ItemKind,

    /// Display title.
    pub title: String,

    /// Non-negative price per unit.
    #[serde(alias = "price")]
    pub unit_price: Decimal,

    /// Always at least 1; a line that would drop to 0 is removed instead.
    pub quantity: u32,

    /// Optional thumbnail for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl CartLine {
    /// Create a line with quantity 1.
    pub fn new(
        id: impl Into<String>,
        kind: ItemKind,
        title: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            unit_price,
            quantity: 1,
            thumbnail_url: None,
        }
    }

    /// Override the quantity; 0 is clamped up to 1.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    /// Attach a thumbnail.
    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    /// Price of the line: `unit_price × quantity`.
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Derived money aggregates for a cart.
///
/// Values are exact decimals; rounding to two places happens only when
/// formatting for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Sum over lines of `unit_price × quantity`.
    pub subtotal: Decimal,

    /// `subtotal ×` [`TAX_RATE`].
    pub tax: Decimal,

    /// `subtotal + tax`.
    pub total: Decimal,
}

impl Totals {
    fn from_subtotal(subtotal: Decimal) -> Self {
        let tax = subtotal * TAX_RATE;

        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    /// The payable total as display money, rounded to two places.
    pub fn total_money(&self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_decimal(self.total.round_dp(2), currency)
    }

    /// The pre-tax subtotal as display money, rounded to two places.
    pub fn subtotal_money(&self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_decimal(self.subtotal.round_dp(2), currency)
    }

    /// The tax portion as display money, rounded to two places.
    pub fn tax_money(&self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_decimal(self.tax.round_dp(2), currency)
    }
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "subtotal {}, tax {}, total {}",
            self.subtotal.round_dp(2),
            self.tax.round_dp(2),
            self.total.round_dp(2)
        )
    }
}

/// Single source of truth for what is in the cart.
///
/// Every mutation persists the full line collection through the storage
/// handle. Persistence is fire-and-forget: a failed write is logged and the
/// in-memory state stays authoritative for the session.
#[derive(Debug)]
pub struct Cart<S: CartStorage> {
    lines: Vec<CartLine>,
    storage: S,
}

impl<S: CartStorage> Cart<S> {
    /// Open the cart, rehydrating any persisted snapshot.
    ///
    /// A snapshot that fails to load is discarded with a warning and the cart
    /// starts empty; this is never surfaced to the caller.
    pub fn open(storage: S) -> Self {
        let lines = match storage.load() {
            Ok(lines) => lines,
            Err(error) => {
                tracing::warn!(%error, "discarding unreadable cart snapshot");
                Vec::new()
            }
        };

        Self { lines, storage }
    }

    /// Add an item to the cart.
    ///
    /// If a line with the same id already exists its quantity is incremented
    /// by one and the incoming quantity is ignored; otherwise the line is
    /// appended, preserving insertion order. This is "add to cart", not "set
    /// quantity"; use [`Cart::update_quantity`] for an absolute set.
    pub fn add_item(&mut self, line: CartLine) {
        if let Some(existing) = self.lines.iter_mut().find(|existing| existing.id == line.id) {
            existing.quantity += 1;
        } else {
            self.lines.push(line);
        }

        self.persist();
    }

    /// Remove the line with the given id; a no-op when absent.
    pub fn remove_item(&mut self, id: &str) {
        self.lines.retain(|line| line.id != id);
        self.persist();
    }

    /// Set the quantity of the line with the given id.
    ///
    /// A quantity of 0 removes the line, matching [`Cart::remove_item`].
    /// A no-op when the id is absent.
    pub fn update_quantity(&mut self, id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove_item(id);
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity;
        }

        self.persist();
    }

    /// Empty the cart and persist the empty state.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// The lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total item count: the sum of quantities, not the line count.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum over lines of `unit_price × quantity`.
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Tax on the current subtotal at the fixed [`TAX_RATE`].
    pub fn tax(&self) -> Decimal {
        self.subtotal() * TAX_RATE
    }

    /// Payable total: subtotal plus tax.
    pub fn total(&self) -> Decimal {
        self.totals().total
    }

    /// All derived aggregates in one pass.
    pub fn totals(&self) -> Totals {
        Totals::from_subtotal(self.subtotal())
    }

    fn persist(&self) {
        if let Err(error) = self.storage.persist(&self.lines) {
            tracing::warn!(%error, "failed to persist cart snapshot");
        }
    }
}
