//! Explicit per-session state object.
//!
//! Replaces ambient global state with a value the caller constructs at
//! session start and drops at session end: the signed-in user (if any) and
//! the cart. Losing the session loses the cart.

use thiserror::Error;
use uuid::Uuid;

use crate::cart::Cart;
use crate::order::{OrderDraft, OrderLineSnapshot};

/// The signed-in user as provided by the upstream auth provider.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("cart is empty")]
    EmptyCart,
}

/// One browsing session: optional user plus a cart.
#[derive(Debug, Default)]
pub struct Session {
    user: Option<UserProfile>,
    cart: Cart,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&mut self, user: UserProfile) {
        self.user = Some(user);
    }

    /// Signs the user out. The cart is kept: it belongs to the browsing
    /// session, not the account.
    pub fn sign_out(&mut self) {
        self.user = None;
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Snapshots the cart into an [`OrderDraft`] ready for persistence.
    ///
    /// Does NOT clear the cart: the caller clears it only after the order
    /// write succeeds, so a failed checkout leaves the cart intact for
    /// retry.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] when no user is signed in,
    /// [`SessionError::EmptyCart`] when there is nothing to check out.
    pub fn checkout_draft(
        &self,
        shipping_address: String,
        payment_method: String,
    ) -> Result<OrderDraft, SessionError> {
        let user = self.user.as_ref().ok_or(SessionError::NotAuthenticated)?;
        if self.cart.is_empty() {
            return Err(SessionError::EmptyCart);
        }
        let items: Vec<OrderLineSnapshot> = self
            .cart
            .items()
            .iter()
            .map(OrderLineSnapshot::from)
            .collect();
        Ok(OrderDraft::new(
            user.id,
            items,
            shipping_address,
            payment_method,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartProduct;

    fn user() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            name: "Ana Pérez".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    fn product(id: i64, price: i64) -> CartProduct {
        CartProduct {
            product_id: id,
            name: format!("Product {id}"),
            price,
            image_url: None,
            category: None,
        }
    }

    #[test]
    fn checkout_requires_authentication() {
        let mut session = Session::new();
        session.cart_mut().add(product(1, 10_000));

        let err = session
            .checkout_draft("addr".to_string(), "cash".to_string())
            .unwrap_err();
        assert_eq!(err, SessionError::NotAuthenticated);
    }

    #[test]
    fn checkout_rejects_empty_cart() {
        let mut session = Session::new();
        session.sign_in(user());

        let err = session
            .checkout_draft("addr".to_string(), "cash".to_string())
            .unwrap_err();
        assert_eq!(err, SessionError::EmptyCart);
    }

    #[test]
    fn checkout_draft_leaves_cart_intact_until_cleared() {
        let mut session = Session::new();
        let u = user();
        let user_id = u.id;
        session.sign_in(u);
        session.cart_mut().add(product(1, 89_000));
        session.cart_mut().add(product(5, 245_000));

        let draft = session
            .checkout_draft("Calle 123".to_string(), "credit_card".to_string())
            .expect("draft");

        assert_eq!(draft.user_id, user_id);
        assert_eq!(draft.total, 334_000);
        assert_eq!(draft.items.len(), 2);
        // Failed persistence must leave the cart untouched for retry.
        assert_eq!(session.cart().item_count(), 2);

        session.cart_mut().clear();
        assert!(session.cart().is_empty());
    }

    #[test]
    fn sign_out_keeps_cart() {
        let mut session = Session::new();
        session.sign_in(user());
        session.cart_mut().add(product(1, 10_000));
        session.sign_out();

        assert!(!session.is_authenticated());
        assert_eq!(session.cart().item_count(), 1);
    }
}
