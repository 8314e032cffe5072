//! Cart actions and the values they carry
//!
//! An [`Action`] is an immutable description of one cart mutation intent. It has
//! no identity of its own: two actions are the same when their type and payload
//! are equal, which is also what [`Action::fingerprint`] captures.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A value stored under a key of [`CartItem::extra`].
#[derive(
    minicbor::Encode, minicbor::Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq,
)]
#[serde(untagged)]
pub enum ExtraValue {
    #[n(0)]
    Text(#[n(0)] String),
    #[n(1)]
    Flag(#[n(0)] bool),
    #[n(2)]
    Number(#[n(0)] i64),
}

impl From<&str> for ExtraValue {
    fn from(value: &str) -> Self {
        ExtraValue::Text(value.to_owned())
    }
}

impl From<bool> for ExtraValue {
    fn from(value: bool) -> Self {
        ExtraValue::Flag(value)
    }
}

impl From<i64> for ExtraValue {
    fn from(value: i64) -> Self {
        ExtraValue::Number(value)
    }
}

#[derive(
    minicbor::Encode, minicbor::Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default,
)]
pub struct CartItem {
    #[n(0)]
    pub product_slug: String,
    #[n(1)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>, // domain name for domain products
    #[n(2)]
    #[serde(default)]
    pub is_domain_registration: bool,
    #[n(3)]
    #[serde(default)]
    pub extra: BTreeMap<String, ExtraValue>,
}

impl CartItem {
    pub fn new(product_slug: impl Into<String>) -> Self {
        Self {
            product_slug: product_slug.into(),
            ..Self::default()
        }
    }
    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<ExtraValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A domain suggestion as returned by the domain search API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DomainSuggestion {
    pub domain_name: String,
    pub product_slug: String,
}

#[derive(
    minicbor::Encode, minicbor::Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct EmailUser {
    #[n(0)]
    pub email: String,
    #[n(1)]
    pub first_name: String,
    #[n(2)]
    pub last_name: String,
}

/// Mailbox registration details collected by the email upsell.
#[derive(
    minicbor::Encode, minicbor::Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq,
)]
pub struct EmailRegistrationData {
    #[n(0)]
    pub domain: String,
    #[n(1)]
    pub users: Vec<EmailUser>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    ItemsAdd,
    ItemsReplaceAll,
    ItemRemove,
    ItemReplace,
    CouponApply,
    CouponRemove,
    TaxCountryCodeSet,
    TaxPostalCodeSet,
    OnMobileShow,
    PrivacyProtectionAdd,
    PrivacyProtectionRemove,
    Disable,
    EmailRegistrationDataAdd,
}

impl ActionType {
    /// The wire constant the cart store matches on.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::ItemsAdd => "CART_ITEMS_ADD",
            ActionType::ItemsReplaceAll => "CART_ITEMS_REPLACE_ALL",
            ActionType::ItemRemove => "CART_ITEM_REMOVE",
            ActionType::ItemReplace => "CART_ITEM_REPLACE",
            ActionType::CouponApply => "CART_COUPON_APPLY",
            ActionType::CouponRemove => "CART_COUPON_REMOVE",
            ActionType::TaxCountryCodeSet => "CART_TAX_COUNTRY_CODE_SET",
            ActionType::TaxPostalCodeSet => "CART_TAX_POSTAL_CODE_SET",
            ActionType::OnMobileShow => "CART_ON_MOBILE_SHOW",
            ActionType::PrivacyProtectionAdd => "CART_PRIVACY_PROTECTION_ADD",
            ActionType::PrivacyProtectionRemove => "CART_PRIVACY_PROTECTION_REMOVE",
            ActionType::Disable => "CART_DISABLE",
            ActionType::EmailRegistrationDataAdd => "GOOGLE_APPS_REGISTRATION_DATA_ADD",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    minicbor::Encode, minicbor::Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq,
)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Action {
    #[n(0)]
    #[serde(rename = "CART_ITEMS_ADD")]
    AddItems {
        #[n(0)]
        cart_items: Vec<CartItem>,
    },
    #[n(1)]
    #[serde(rename = "CART_ITEMS_REPLACE_ALL")]
    ReplaceAllItems {
        #[n(0)]
        cart_items: Vec<CartItem>,
    },
    #[n(2)]
    #[serde(rename = "CART_ITEM_REMOVE")]
    RemoveItem {
        #[n(0)]
        cart_item: CartItem,
        #[n(1)]
        domains_with_plans_only: bool,
    },
    #[n(3)]
    #[serde(rename = "CART_ITEM_REPLACE")]
    ReplaceItem {
        #[n(0)]
        old_item: CartItem,
        #[n(1)]
        new_item: CartItem,
    },
    #[n(4)]
    #[serde(rename = "CART_COUPON_APPLY")]
    ApplyCoupon {
        #[n(0)]
        coupon: String,
    },
    #[n(5)]
    #[serde(rename = "CART_COUPON_REMOVE")]
    RemoveCoupon,
    #[n(6)]
    #[serde(rename = "CART_TAX_COUNTRY_CODE_SET")]
    SetTaxCountryCode {
        #[n(0)]
        country_code: String,
    },
    #[n(7)]
    #[serde(rename = "CART_TAX_POSTAL_CODE_SET")]
    SetTaxPostalCode {
        #[n(0)]
        postal_code: String,
    },
    #[n(8)]
    #[serde(rename = "CART_ON_MOBILE_SHOW")]
    ShowOnMobile {
        #[n(0)]
        show: bool,
    },
    #[n(9)]
    #[serde(rename = "CART_PRIVACY_PROTECTION_ADD")]
    AddPrivacyToAllDomains,
    #[n(10)]
    #[serde(rename = "CART_PRIVACY_PROTECTION_REMOVE")]
    RemovePrivacyFromAllDomains,
    #[n(11)]
    #[serde(rename = "CART_DISABLE")]
    Disable,
    #[n(12)]
    #[serde(rename = "GOOGLE_APPS_REGISTRATION_DATA_ADD")]
    AddEmailRegistrationData {
        #[n(0)]
        registration_data: EmailRegistrationData,
    },
}

impl Action {
    pub fn kind(&self) -> ActionType {
        match self {
            Action::AddItems { .. } => ActionType::ItemsAdd,
            Action::ReplaceAllItems { .. } => ActionType::ItemsReplaceAll,
            Action::RemoveItem { .. } => ActionType::ItemRemove,
            Action::ReplaceItem { .. } => ActionType::ItemReplace,
            Action::ApplyCoupon { .. } => ActionType::CouponApply,
            Action::RemoveCoupon => ActionType::CouponRemove,
            Action::SetTaxCountryCode { .. } => ActionType::TaxCountryCodeSet,
            Action::SetTaxPostalCode { .. } => ActionType::TaxPostalCodeSet,
            Action::ShowOnMobile { .. } => ActionType::OnMobileShow,
            Action::AddPrivacyToAllDomains => ActionType::PrivacyProtectionAdd,
            Action::RemovePrivacyFromAllDomains => ActionType::PrivacyProtectionRemove,
            Action::Disable => ActionType::Disable,
            Action::AddEmailRegistrationData { .. } => ActionType::EmailRegistrationDataAdd,
        }
    }
    /// Serialises the action into CBOR and returns the sha256 digest of the encoding
    /// alongside the encoding itself.
    pub fn encode(&self) -> anyhow::Result<(String, Vec<u8>)> {
        let cbor = minicbor::to_vec(self)?;
        let hash = sha256::digest(&cbor);

        Ok((hash, cbor))
    }
    pub fn fingerprint(&self) -> anyhow::Result<String> {
        self.encode().map(|(hash, _)| hash)
    }
}

/// Where an action originated.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    #[n(0)]
    View,
    #[n(1)]
    Server,
}

/// What consumers receive: the action plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub source: Source,
    pub action: Action,
}
