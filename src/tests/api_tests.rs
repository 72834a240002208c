//! Error surface of the HTTP layer and address validation.

use crate::api::ApiError;
use crate::service::ScoreError;
use crate::validation::{validate_eth_address, ValidationError};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[test]
fn client_faults_map_to_bad_request() {
    let missing = ApiError::MissingAddress.into_response();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let invalid = ApiError::InvalidAddress.into_response();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn server_faults_map_to_internal_error() {
    let unloaded = ApiError::ModelNotLoaded.into_response();
    assert_eq!(unloaded.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let scoring = ApiError::Scoring("boom".to_string()).into_response();
    assert_eq!(scoring.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn scoring_errors_keep_their_message() {
    let err = ScoreError::SchemaMismatch {
        column: "total_value".to_string(),
    };
    let api: ApiError = err.into();
    assert!(api.to_string().contains("total_value"));
}

#[test]
fn validation_errors_map_to_the_right_variant() {
    let missing: ApiError = ValidationError::MissingParameter("contract_address".into()).into();
    assert!(matches!(missing, ApiError::MissingAddress));

    let invalid: ApiError = ValidationError::InvalidEthereumAddress("nope".into()).into();
    assert!(matches!(invalid, ApiError::InvalidAddress));
}

#[test]
fn address_validation_accepts_checksummed_hex() {
    assert!(validate_eth_address("0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D").is_ok());
    assert!(validate_eth_address("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").is_ok());
}

#[test]
fn address_validation_rejects_malformed_input() {
    assert!(validate_eth_address("").is_err());
    assert!(validate_eth_address("   ").is_err());
    assert!(validate_eth_address("7a250d5630B4cF539739dF2C5dAcb4c659F2488D").is_err());
    assert!(validate_eth_address("0x1234").is_err());
    assert!(validate_eth_address("0xZZ50d5630B4cF539739dF2C5dAcb4c659F2488D1").is_err());
}
