//! Products, packing entries and the assembled document-data record.
//!
//! [`assemble`] is a pure projection of the conversation state. It is recomputed on
//! every read and never cached, so edits to products or packing after generation are
//! always reflected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::SKIPPED;
use crate::validation::{
    parse_amount, validate_amount, validate_required, ValidationError, ValidationErrors, Validator,
};

/// Scalar answers keyed by field.
pub type AnswerMap = BTreeMap<String, String>;

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Product as entered in the products sub-flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDraft {
    #[serde(default)]
    pub product_code: String,
    pub description: String,
    #[serde(default)]
    pub hs_code: String,
    #[serde(default)]
    pub unit: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl Validator for ProductDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_required(&self.description, "description", &mut errors);
        validate_amount(self.quantity, "quantity", &mut errors);
        validate_amount(self.unit_price, "unit_price", &mut errors);
        errors.into_result()
    }
}

/// Editable product attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductField {
    ProductCode,
    Description,
    HsCode,
    Unit,
    Quantity,
    UnitPrice,
}

/// One line item. `total_amount` always equals `round2(quantity * unit_price)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: String,
    pub product_code: String,
    pub description: String,
    pub hs_code: String,
    pub unit: String,
    quantity: f64,
    unit_price: f64,
    total_amount: f64,
}

impl Product {
    pub fn new(id: impl Into<String>, draft: ProductDraft) -> Self {
        Self {
            id: id.into(),
            product_code: draft.product_code.trim().to_string(),
            description: draft.description.trim().to_string(),
            hs_code: draft.hs_code.trim().to_string(),
            unit: draft.unit.trim().to_string(),
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            total_amount: round2(draft.quantity * draft.unit_price),
        }
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    pub fn set_quantity(&mut self, quantity: f64) {
        self.quantity = quantity;
        self.recompute();
    }

    pub fn set_unit_price(&mut self, unit_price: f64) {
        self.unit_price = unit_price;
        self.recompute();
    }

    /// Apply a single-field edit from the edit form.
    pub fn update(&mut self, field: ProductField, value: &str) -> Result<(), ValidationError> {
        match field {
            ProductField::ProductCode => self.product_code = value.trim().to_string(),
            ProductField::Description => self.description = value.trim().to_string(),
            ProductField::HsCode => self.hs_code = value.trim().to_string(),
            ProductField::Unit => self.unit = value.trim().to_string(),
            ProductField::Quantity => self.set_quantity(parse_amount(value, "quantity")?),
            ProductField::UnitPrice => self.set_unit_price(parse_amount(value, "unit_price")?),
        }
        Ok(())
    }

    fn recompute(&mut self) {
        self.total_amount = round2(self.quantity * self.unit_price);
    }
}

/// Packing details as entered in the packing sub-flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PackingDraft {
    /// 1-based index into the product list.
    pub product_index: usize,
    #[serde(default)]
    pub kind_of_packages: String,
    pub number_of_packages: u32,
    pub net_weight: f64,
    pub gross_weight: f64,
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: String,
}

impl PackingDraft {
    /// Validate against the number of products collected so far.
    pub fn validate_for(&self, product_count: usize) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.product_index == 0 || self.product_index > product_count {
            errors.add(
                ValidationError::new(
                    "product_index",
                    format!("Product #{} does not exist", self.product_index),
                )
                .with_suggestion(format!("Choose a product between 1 and {}", product_count)),
            );
        }
        validate_amount(self.net_weight, "net_weight", &mut errors);
        validate_amount(self.gross_weight, "gross_weight", &mut errors);
        errors.into_result()
    }
}

/// Editable packing attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PackingField {
    ProductIndex,
    KindOfPackages,
    NumberOfPackages,
    NetWeight,
    GrossWeight,
    Length,
    Width,
    Height,
}

/// Packing entry. `measurements` is derived from the three dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PackingEntry {
    pub id: String,
    pub product_index: usize,
    pub kind_of_packages: String,
    pub number_of_packages: u32,
    pub net_weight: f64,
    pub gross_weight: f64,
    #[serde(default)]
    length: String,
    #[serde(default)]
    width: String,
    #[serde(default)]
    height: String,
    measurements: String,
}

impl PackingEntry {
    pub fn new(id: impl Into<String>, draft: PackingDraft) -> Self {
        let mut entry = Self {
            id: id.into(),
            product_index: draft.product_index,
            kind_of_packages: draft.kind_of_packages.trim().to_string(),
            number_of_packages: draft.number_of_packages,
            net_weight: draft.net_weight,
            gross_weight: draft.gross_weight,
            length: draft.length.trim().to_string(),
            width: draft.width.trim().to_string(),
            height: draft.height.trim().to_string(),
            measurements: String::new(),
        };
        entry.recompute();
        entry
    }

    pub fn measurements(&self) -> &str {
        &self.measurements
    }

    pub fn dimensions(&self) -> (&str, &str, &str) {
        (&self.length, &self.width, &self.height)
    }

    /// Apply a single-field edit. `product_count` bounds `product_index`.
    pub fn update(
        &mut self,
        field: PackingField,
        value: &str,
        product_count: usize,
    ) -> Result<(), ValidationError> {
        let value = value.trim();
        match field {
            PackingField::ProductIndex => {
                let index = value
                    .parse::<usize>()
                    .ok()
                    .filter(|i| (1..=product_count).contains(i))
                    .ok_or_else(|| ValidationError::invalid_number("product_index", value))?;
                self.product_index = index;
            }
            PackingField::KindOfPackages => self.kind_of_packages = value.to_string(),
            PackingField::NumberOfPackages => {
                self.number_of_packages = value
                    .parse()
                    .map_err(|_| ValidationError::invalid_number("number_of_packages", value))?;
            }
            PackingField::NetWeight => self.net_weight = parse_amount(value, "net_weight")?,
            PackingField::GrossWeight => self.gross_weight = parse_amount(value, "gross_weight")?,
            PackingField::Length => self.length = value.to_string(),
            PackingField::Width => self.width = value.to_string(),
            PackingField::Height => self.height = value.to_string(),
        }
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        self.measurements = if self.length.is_empty() || self.width.is_empty() || self.height.is_empty() {
            String::new()
        } else {
            format!("{}×{}×{}", self.length, self.width, self.height)
        };
    }
}

/// Render-ready data for one generation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(flatten)]
    pub answers: AnswerMap,
    pub products: Vec<Product>,
    pub packing_info: Vec<PackingEntry>,
    pub total_amount: f64,
}

impl DocumentRecord {
    /// Answer for `key`, treating missing, blank and skipped answers alike.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.answers
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty() && *value != SKIPPED)
    }

    /// Answer for `key` or a placeholder.
    pub fn value_or<'a>(&'a self, key: &str, placeholder: &'a str) -> &'a str {
        self.get(key).unwrap_or(placeholder)
    }

    /// `true` when the answer to a Yes/No question is exactly "Yes".
    pub fn is_yes(&self, key: &str) -> bool {
        self.get(key) == Some("Yes")
    }

    pub fn total_packages(&self) -> u64 {
        self.packing_info
            .iter()
            .map(|entry| u64::from(entry.number_of_packages))
            .sum()
    }

    pub fn total_net_weight(&self) -> f64 {
        round2(self.packing_info.iter().map(|entry| entry.net_weight).sum())
    }

    pub fn total_gross_weight(&self) -> f64 {
        round2(self.packing_info.iter().map(|entry| entry.gross_weight).sum())
    }

    pub fn total_quantity(&self) -> f64 {
        self.products.iter().map(Product::quantity).sum()
    }

    /// Product referenced by a packing entry.
    pub fn product_for(&self, entry: &PackingEntry) -> Option<&Product> {
        entry
            .product_index
            .checked_sub(1)
            .and_then(|index| self.products.get(index))
    }
}

/// Merge answers, products and packing into one record.
pub fn assemble(answers: &AnswerMap, products: &[Product], packing_info: &[PackingEntry]) -> DocumentRecord {
    let total_amount = round2(products.iter().map(Product::total_amount).sum());
    DocumentRecord {
        answers: answers.clone(),
        products: products.to_vec(),
        packing_info: packing_info.to_vec(),
        total_amount,
    }
}
