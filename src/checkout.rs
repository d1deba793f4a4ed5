//! Checkout flow

pub mod validation;

use std::{fmt, time::Duration};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    cart::{Cart, Totals},
    checkout::validation::{FieldErrors, validate},
    storage::CartStorage,
};

/// How long the simulated gateway takes to settle.
const SIMULATED_SETTLEMENT_DELAY: Duration = Duration::from_secs(2);

/// The mobile-money networks the storefront accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobileProvider {
    /// MTN Mobile Money.
    Mtn,
    /// Airtel Money.
    Airtel,
}

impl fmt::Display for MobileProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mtn => "MTN Mobile Money",
            Self::Airtel => "Airtel Money",
        };

        f.write_str(name)
    }
}

/// Which payment method a submission used, without its field data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Card payment.
    CreditCard,
    /// Phone-number-keyed payment through the given network.
    MobileMoney(MobileProvider),
}

/// The field set submitted for exactly one payment method.
///
/// The form exposes the methods as mutually exclusive tabs; a submission
/// carries only the active tab's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentDetails {
    /// Card payment fields.
    CreditCard {
        /// 16-19 digits, spaces allowed for display formatting.
        number: String,
        /// Name printed on the card.
        holder: String,
        /// `MM/YY`.
        expiry: String,
        /// 3-4 digit security code.
        cvv: String,
    },
    /// Mobile-money fields.
    MobileMoney {
        /// Which network to charge.
        provider: MobileProvider,
        /// 10-15 digits.
        phone: String,
        /// At least 3 characters.
        full_name: String,
    },
}

impl PaymentDetails {
    /// The method this submission pays with.
    pub fn method(&self) -> PaymentMethod {
        match self {
            Self::CreditCard { .. } => PaymentMethod::CreditCard,
            Self::MobileMoney { provider, .. } => PaymentMethod::MobileMoney(*provider),
        }
    }
}

/// Where a checkout flow instance currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    /// Collecting payment details; the only state that accepts a submission.
    Editing,
    /// Running field validation for the submitted method.
    Validating,
    /// Awaiting gateway settlement; no cancel action exists here.
    Processing,
    /// Terminal. The cart has been cleared and a confirmation returned.
    Succeeded,
}

/// Errors a submission can end with.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more fields failed validation; the flow is back in
    /// [`CheckoutState::Editing`] and the cart is untouched.
    #[error("payment details failed validation")]
    Validation(FieldErrors),

    /// A submission arrived while the flow was not editing.
    #[error("checkout is not accepting submissions in state {0:?}")]
    NotEditing(CheckoutState),

    /// The gateway refused to settle; the flow is back in
    /// [`CheckoutState::Editing`].
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Errors a payment gateway can report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The charge was declined.
    #[error("payment declined: {reason}")]
    Declined {
        /// Gateway-supplied cause.
        reason: String,
    },
}

/// The settlement seam.
///
/// The shipped [`SimulatedGateway`] always settles successfully after a fixed
/// delay; a real integration plugs in here with its own failure, timeout and
/// retry behavior.
pub trait PaymentGateway {
    /// Settle the given amount.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Declined`]: the charge was refused.
    async fn settle(&self, method: PaymentMethod, amount: Decimal) -> Result<(), GatewayError>;
}

/// Stand-in gateway: waits a fixed delay, then settles.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    /// A gateway settling after the given delay.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::with_delay(SIMULATED_SETTLEMENT_DELAY)
    }
}

impl PaymentGateway for SimulatedGateway {
    async fn settle(&self, _method: PaymentMethod, _amount: Decimal) -> Result<(), GatewayError> {
        tokio::time::sleep(self.delay).await;

        Ok(())
    }
}

/// What a successful checkout hands back for the confirmation page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confirmation {
    /// The method that paid.
    pub method: PaymentMethod,

    /// The totals as charged, captured before the cart was cleared.
    pub amount: Totals,
}

/// Drives one order through validation, settlement and cart clearing.
///
/// One instance covers one flow: after [`CheckoutState::Succeeded`] it stops
/// accepting submissions. Validation failures return the flow to editing so
/// the user can correct and resubmit.
#[derive(Debug)]
pub struct Checkout<'a, S: CartStorage, G: PaymentGateway> {
    cart: &'a mut Cart<S>,
    gateway: G,
    state: CheckoutState,
}

impl<'a, S: CartStorage> Checkout<'a, S, SimulatedGateway> {
    /// A checkout backed by the simulated gateway.
    pub fn simulated(cart: &'a mut Cart<S>) -> Self {
        Self::new(cart, SimulatedGateway::default())
    }
}

impl<'a, S: CartStorage, G: PaymentGateway> Checkout<'a, S, G> {
    /// A checkout for the given cart and gateway, starting in
    /// [`CheckoutState::Editing`].
    pub fn new(cart: &'a mut Cart<S>, gateway: G) -> Self {
        Self {
            cart,
            gateway,
            state: CheckoutState::Editing,
        }
    }

    /// Current state of the flow.
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Submit payment details for the active method.
    ///
    /// Walks editing → validating → processing → succeeded. On success the
    /// cart is cleared and the charged totals are returned for the
    /// confirmation page.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Validation`]: a field failed; back to editing,
    ///   cart untouched.
    /// - [`CheckoutError::NotEditing`]: the flow already left editing.
    /// - [`CheckoutError::Gateway`]: settlement was refused; back to editing.
    pub async fn submit(&mut self, details: &PaymentDetails) -> Result<Confirmation, CheckoutError> {
        if self.state != CheckoutState::Editing {
            return Err(CheckoutError::NotEditing(self.state));
        }

        self.state = CheckoutState::Validating;

        let errors = validate(details);
        if !errors.is_empty() {
            self.state = CheckoutState::Editing;
            return Err(CheckoutError::Validation(errors));
        }

        self.state = CheckoutState::Processing;

        let amount = self.cart.totals();

        if let Err(error) = self.gateway.settle(details.method(), amount.total).await {
            self.state = CheckoutState::Editing;
            return Err(error.into());
        }

        self.state = CheckoutState::Succeeded;
        self.cart.clear();

        tracing::info!(method = ?details.method(), %amount, "order settled");

        Ok(Confirmation {
            method: details.method(),
            amount,
        })
    }
}
