//! Cart operation errors.
//!
//! The `Display` text of each variant is the message shown to the shopper.
//! The underlying cause stays reachable through `source()` for logging.

use rocketshoes_core::{CartRuleViolation, ProductId};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::store::StoreError;

/// Why a cart operation did not go through.
#[derive(Debug, Error)]
pub enum CartError {
    /// Stock or product lookup failed while adding.
    #[error("Erro na adição do produto")]
    AdditionFailed(#[source] CatalogError),

    /// The requested quantity is more than the catalog has in stock.
    #[error("Quantidade solicitada fora de estoque")]
    InsufficientStock(#[source] CartRuleViolation),

    /// The product to remove is not in the cart.
    #[error("Erro na remoção do produto")]
    RemovalFailed(#[source] CartRuleViolation),

    /// The product to update is not in the cart, or its stock could not be read.
    #[error("Erro na alteração de quantidade do produto")]
    AmountUpdateFailed {
        product_id: ProductId,
        #[source]
        source: Option<CatalogError>,
    },

    /// The new cart could not be written to the store.
    #[error("Erro ao salvar o carrinho")]
    Persistence(#[from] StoreError),
}

impl CartError {
    /// Short machine-readable name, used as a log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AdditionFailed(_) => "addition_failed",
            Self::InsufficientStock(_) => "insufficient_stock",
            Self::RemovalFailed(_) => "removal_failed",
            Self::AmountUpdateFailed { .. } => "amount_update_failed",
            Self::Persistence(_) => "persistence",
        }
    }

    /// Whether the shopper's request broke a cart rule, as opposed to a
    /// catalog or storage failure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        match self {
            Self::InsufficientStock(_) | Self::RemovalFailed(_) => true,
            Self::AmountUpdateFailed { source, .. } => source.is_none(),
            Self::AdditionFailed(_) | Self::Persistence(_) => false,
        }
    }
}
