use super::error::InvalidOrderReason;
use crate::model::{ItemId, ShoppingCart};

/// Checks a cart and returns its distinct lines in cart order.
///
/// Pure: it runs to completion before any collaborator is contacted.
pub fn validate_cart(cart: &ShoppingCart) -> Result<Vec<(ItemId, i32)>, InvalidOrderReason> {
    if cart.is_empty() {
        return Err(InvalidOrderReason::EmptyCart);
    }

    if let Some(item) = cart.items.iter().find(|item| item.quantity < 1) {
        return Err(InvalidOrderReason::NonPositiveQuantity {
            item_id: item.item_id,
            quantity: item.quantity,
        });
    }

    Ok(cart.distinct_lines())
}
