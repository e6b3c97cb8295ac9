//! Tests for kernel parse errors

use std::error::Error as _;

use core_kernel::{ClaimId, CoreError, Currency, PolicyId};

#[test]
fn test_unknown_currency_names_the_code() {
    let result: Result<Currency, CoreError> = "xyz".parse();

    match result {
        Err(CoreError::UnsupportedCurrency(code)) => assert_eq!(code, "XYZ"),
        other => panic!("Expected UnsupportedCurrency, got {:?}", other),
    }
}

#[test]
fn test_malformed_identifier_keeps_input_and_source() {
    let err = "CLM-not-a-uuid".parse::<ClaimId>().unwrap_err();

    match &err {
        CoreError::InvalidIdentifier { input, .. } => assert_eq!(input, "CLM-not-a-uuid"),
        other => panic!("Expected InvalidIdentifier, got {:?}", other),
    }
    assert!(err.source().is_some());
    assert!(err.to_string().starts_with("Invalid identifier CLM-not-a-uuid"));
}

#[test]
fn test_identifier_with_foreign_prefix_is_rejected() {
    let claim_id = ClaimId::new();
    assert!(claim_id.to_string().parse::<PolicyId>().is_err());
}
