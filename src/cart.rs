//! Cart action functions
//!
//! Each function builds one [`Action`] and dispatches it as a view action. Nothing
//! here validates payloads; the cart store on the receiving end decides what to
//! accept.
use super::action::{Action, CartItem, DomainSuggestion, EmailRegistrationData};
use super::dispatcher::Dispatcher;
use super::transform::tag_origin;
use std::sync::Arc;

/// Canonical cart item for registering `domain` under `product_slug`.
pub fn domain_registration(domain: &str, product_slug: &str) -> CartItem {
    CartItem {
        product_slug: product_slug.to_owned(),
        meta: Some(domain.to_owned()),
        is_domain_registration: true,
        ..CartItem::default()
    }
}

pub struct CartActions {
    dispatcher: Arc<Dispatcher>,
}

impl CartActions {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn disable_cart(&self) {
        self.dispatcher.dispatch(Action::Disable);
    }

    pub fn show_cart_on_mobile(&self, show: bool) {
        self.dispatcher.dispatch(Action::ShowOnMobile { show });
    }

    pub fn add_privacy_to_all_domains(&self) {
        self.dispatcher.dispatch(Action::AddPrivacyToAllDomains);
    }

    pub fn remove_privacy_from_all_domains(&self) {
        self.dispatcher.dispatch(Action::RemovePrivacyFromAllDomains);
    }

    pub fn add_item(&self, item: &CartItem) {
        self.add_items(std::slice::from_ref(item));
    }

    /// Add `items` to the cart, each tagged with the storefront origin.
    pub fn add_items(&self, items: &[CartItem]) {
        let cart_items = items.iter().map(tag_origin).collect();
        self.dispatcher.dispatch(Action::AddItems { cart_items });
    }

    /// Replace the whole cart with `items`, each tagged with the storefront origin.
    pub fn replace_cart_with_items(&self, items: &[CartItem]) {
        let cart_items = items.iter().map(tag_origin).collect();
        self.dispatcher.dispatch(Action::ReplaceAllItems { cart_items });
    }

    pub fn remove_item(&self, item: CartItem, domains_with_plans_only: bool) {
        self.dispatcher.dispatch(Action::RemoveItem {
            cart_item: item,
            domains_with_plans_only,
        });
    }

    pub fn replace_item(&self, old_item: CartItem, new_item: CartItem) {
        self.dispatcher
            .dispatch(Action::ReplaceItem { old_item, new_item });
    }

    pub fn add_domain_to_cart(&self, suggestion: &DomainSuggestion) {
        self.add_item(&domain_registration(
            &suggestion.domain_name,
            &suggestion.product_slug,
        ));
    }

    pub fn remove_domain_from_cart(&self, suggestion: &DomainSuggestion) {
        self.remove_item(
            domain_registration(&suggestion.domain_name, &suggestion.product_slug),
            false,
        );
    }

    pub fn add_email_registration_data(&self, registration_data: EmailRegistrationData) {
        self.dispatcher
            .dispatch(Action::AddEmailRegistrationData { registration_data });
    }

    pub fn apply_coupon(&self, coupon: impl Into<String>) {
        self.dispatcher.dispatch(Action::ApplyCoupon {
            coupon: coupon.into(),
        });
    }

    pub fn remove_coupon(&self) {
        self.dispatcher.dispatch(Action::RemoveCoupon);
    }

    pub fn set_tax_country_code(&self, country_code: impl Into<String>) {
        self.dispatcher.dispatch(Action::SetTaxCountryCode {
            country_code: country_code.into(),
        });
    }

    pub fn set_tax_postal_code(&self, postal_code: impl Into<String>) {
        self.dispatcher.dispatch(Action::SetTaxPostalCode {
            postal_code: postal_code.into(),
        });
    }
}
