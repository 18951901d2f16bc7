//! # Catalog State
//!
//! Products the storefront can put in a cart, keyed by id.
//!
//! The catalog is read-only after construction. Every product is validated
//! up front so cart commands only have to resolve ids.

use std::collections::HashMap;

use vfarma_core::validation::validate_product;
use vfarma_core::{CoreResult, Product, ValidationError};

/// Validated, ordered product list with id lookup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog.
    ///
    /// ## Errors
    /// - a product fails validation (empty id or name, negative price)
    /// - two products share an id
    pub fn new(products: Vec<Product>) -> CoreResult<Self> {
        let mut index = HashMap::with_capacity(products.len());

        for (position, product) in products.iter().enumerate() {
            validate_product(product)?;

            if index.insert(product.id.clone(), position).is_some() {
                return Err(ValidationError::Duplicate {
                    field: "id".to_string(),
                    value: product.id.clone(),
                }
                .into());
            }
        }

        Ok(Catalog { products, index })
    }

    /// Demo pharmacy shelf. Product `4` is the one `NEYMAR20` promotes.
    pub fn pharmacy() -> Self {
        let products = vec![
            Product::new("1", "Paracetamol 750mg (20 tabs)", 1_290, false),
            Product::new("2", "Vitamina C 1g (10 eff. tabs)", 2_450, false),
            Product::new("3", "Protetor Solar FPS 50", 5_990, false),
            Product::new("4", "Dipirona 500mg (30 tabs)", 10_000, false),
            Product::new("5", "Amoxicilina 500mg (21 caps)", 3_875, true),
        ];

        let index = products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();

        Catalog { products, index }
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.index.get(product_id).map(|&i| &self.products[i])
    }

    /// Products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfarma_core::CoreError;

    #[test]
    fn test_pharmacy_catalog_is_valid() {
        let seeded = Catalog::pharmacy();
        let rebuilt = Catalog::new(seeded.products().to_vec()).unwrap();

        assert_eq!(rebuilt.len(), seeded.len());
        assert!(seeded.get("4").is_some());
        assert!(seeded.products().iter().any(|p| p.requires_prescription));
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::pharmacy();

        assert_eq!(catalog.get("4").map(|p| p.price.cents()), Some(10_000));
        assert!(catalog.get("404").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::new(vec![
            Product::new("1", "Dorflex", 1_500, false),
            Product::new("1", "Dorflex 36", 2_500, false),
        ]);

        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = Catalog::new(vec![Product::new("1", "Dorflex", -1, false)]);
        assert!(result.is_err());
    }
}
