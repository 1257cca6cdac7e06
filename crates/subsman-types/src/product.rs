//! Catalog product types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::define_id;
use crate::StatusParseError;

define_id!(
    /// Unique product identifier
    ProductId
);

/// Product availability status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

impl ProductStatus {
    /// Stored string form
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(StatusParseError::new("product", s)),
        }
    }
}

/// How often a product is billed
///
/// The set is open: anything other than `monthly`/`yearly` is kept verbatim
/// in `Other` and round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillingType {
    Monthly,
    Yearly,
    Other(String),
}

impl BillingType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for BillingType {
    fn from(s: &str) -> Self {
        match s {
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for BillingType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            _ => Self::Other(s),
        }
    }
}

impl From<BillingType> for String {
    fn from(billing: BillingType) -> Self {
        match billing {
            BillingType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for BillingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscribable catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Price per billing period, in currency units
    pub price: f64,
    pub billing_type: BillingType,
    pub category: String,
    #[serde(default)]
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a new active product with fresh id and timestamps
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        billing_type: impl Into<BillingType>,
        category: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            name: name.into(),
            description: description.into(),
            price,
            billing_type: billing_type.into(),
            category: category.into(),
            status: ProductStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    pub fn is_monthly(&self) -> bool {
        self.billing_type == BillingType::Monthly
    }

    pub fn is_yearly(&self) -> bool {
        self.billing_type == BillingType::Yearly
    }

    /// Price must be strictly positive. NaN is rejected.
    pub fn validate_price(&self) -> bool {
        self.price > 0.0
    }

    /// Price normalized to one month.
    ///
    /// Billing types other than monthly/yearly have no defined policy and
    /// return the raw price.
    pub fn monthly_equivalent_price(&self) -> f64 {
        match self.billing_type {
            BillingType::Monthly => self.price,
            BillingType::Yearly => self.price / 12.0,
            BillingType::Other(_) => self.price,
        }
    }

    /// Take the product out of the catalog without deleting it
    pub fn deactivate(&mut self) {
        self.status = ProductStatus::Inactive;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_equivalent_price() {
        let monthly = Product::new("Netflix", "", 15.99, "monthly", "streaming");
        assert!(monthly.is_monthly());
        assert_eq!(monthly.monthly_equivalent_price(), 15.99);

        let yearly = Product::new("Annual", "", 120.0, BillingType::Yearly, "music");
        assert!(yearly.is_yearly());
        assert!((yearly.monthly_equivalent_price() - 10.0).abs() < f64::EPSILON);

        let weekly = Product::new("Weekly", "", 3.0, "weekly", "news");
        assert_eq!(weekly.billing_type, BillingType::Other("weekly".into()));
        assert_eq!(weekly.monthly_equivalent_price(), 3.0);
    }

    #[test]
    fn test_validate_price() {
        let mut product = Product::new("Spotify", "Music", 9.99, "monthly", "music");
        assert!(product.validate_price());

        product.price = 0.0;
        assert!(!product.validate_price());

        product.price = -1.0;
        assert!(!product.validate_price());

        product.price = f64::NAN;
        assert!(!product.validate_price());
    }

    #[test]
    fn test_billing_type_round_trips_as_plain_string() {
        let json = serde_json::to_string(&BillingType::Other("quarterly".into())).unwrap();
        assert_eq!(json, "\"quarterly\"");

        let parsed: BillingType = serde_json::from_str("\"yearly\"").unwrap();
        assert_eq!(parsed, BillingType::Yearly);
    }

    #[test]
    fn test_deactivate() {
        let mut product = Product::new("Disney+", "Disney", 7.99, "monthly", "streaming");
        assert!(product.is_active());
        product.deactivate();
        assert!(!product.is_active());
    }
}
