//! The document-creation payload.
//!
//! The gate treats the payload as opaque; these types are the known shape of
//! the remote's creation endpoint, serialized with camelCase field names.

use serde::{Deserialize, Serialize};

/// A product-introduction document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub import_request: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_inn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_inn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_inn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_number: Option<String>,
}

/// The document description block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_inn: Option<String>,
}

/// A single product entry within a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_document_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_document_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_inn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_inn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tnved_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uit_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uitu_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_camel_case_names() {
        let document = Document {
            description: Some(Description {
                participant_inn: Some("1234567890".to_string()),
            }),
            doc_id: Some("doc123".to_string()),
            doc_status: Some("active".to_string()),
            import_request: false,
            owner_inn: Some("0987654321".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["docId"], "doc123");
        assert_eq!(json["docStatus"], "active");
        assert_eq!(json["importRequest"], false);
        assert_eq!(json["ownerInn"], "0987654321");
        assert_eq!(json["description"]["participantInn"], "1234567890");
        // Unset optional fields are omitted from the wire body.
        assert!(json.get("regNumber").is_none());
    }

    #[test]
    fn test_product_round_trips() {
        let product = Product {
            tnved_code: Some("6401".to_string()),
            uit_code: Some("uit-1".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&product).unwrap();
        let parsed: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.tnved_code.as_deref(), Some("6401"));
        assert_eq!(parsed.uit_code.as_deref(), Some("uit-1"));
    }
}
