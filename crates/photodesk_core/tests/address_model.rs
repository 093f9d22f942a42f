use photodesk_core::{Address, AddressInput, AddressValidationError, NULL_PLACEHOLDER};

fn valid_input() -> AddressInput {
    AddressInput {
        street1: Some("123 Elm Street".to_string()),
        city: Some("Metropolis".to_string()),
        state: Some("NY".to_string()),
        zip_code: Some("12345".to_string()),
        ..AddressInput::default()
    }
}

#[test]
fn from_input_maps_street_lines_city_and_zip() {
    let input = AddressInput {
        street2: Some("Apt 4".to_string()),
        ..valid_input()
    };

    let address = Address::from_input(&input);
    assert_eq!(address.street_name.as_deref(), Some("123 Elm Street"));
    assert_eq!(address.street_suffix.as_deref(), Some("Apt 4"));
    assert_eq!(address.city.as_deref(), Some("Metropolis"));
    assert_eq!(address.postal_code.as_deref(), Some("12345"));
    assert_eq!(address.external_id().as_str().len(), 36);
    assert!(!address.identity().is_persisted());
}

#[test]
fn valid_and_empty_inputs_pass() {
    assert!(valid_input().validate().is_ok());
    assert!(AddressInput::default().validate().is_ok());

    let nine_digit = AddressInput {
        zip_code: Some("12345-6789".to_string()),
        address_type: Some("mailing".to_string()),
        ..valid_input()
    };
    assert!(nine_digit.validate().is_ok());
}

#[test]
fn input_rules_reject_malformed_fields() {
    let bad_zip = AddressInput {
        zip_code: Some("1234".to_string()),
        ..valid_input()
    };
    assert_eq!(
        bad_zip.validate().unwrap_err(),
        AddressValidationError::InvalidZipCode("1234".to_string())
    );

    let bad_city = AddressInput {
        city: Some("Metropolis 9".to_string()),
        ..valid_input()
    };
    assert_eq!(
        bad_city.validate().unwrap_err(),
        AddressValidationError::InvalidCharacters { field: "city" }
    );

    let long_street = AddressInput {
        street1: Some("x".repeat(101)),
        ..valid_input()
    };
    assert_eq!(
        long_street.validate().unwrap_err(),
        AddressValidationError::TooLong {
            field: "street1",
            max: 100
        }
    );

    let bad_unit = AddressInput {
        unit_number: Some("#4 / B".to_string()),
        ..valid_input()
    };
    assert_eq!(
        bad_unit.validate().unwrap_err(),
        AddressValidationError::InvalidCharacters {
            field: "unit_number"
        }
    );

    let bad_type = AddressInput {
        address_type: Some("summer".to_string()),
        ..valid_input()
    };
    assert_eq!(
        bad_type.validate().unwrap_err(),
        AddressValidationError::InvalidAddressType("summer".to_string())
    );
}

#[test]
fn null_addresses_are_equal_and_never_validate() {
    let first = Address::null();
    let second = Address::null();

    assert_eq!(first, second);
    assert!(first.is_null());
    assert_eq!(first.external_id().as_str(), NULL_PLACEHOLDER);
    assert_eq!(
        first.validate().unwrap_err(),
        AddressValidationError::NullSentinel
    );
}

#[test]
fn record_validation_checks_postal_code() {
    let mut address = Address::new();
    assert!(address.validate().is_ok());

    address.postal_code = Some("ABCDE".to_string());
    assert_eq!(
        address.validate().unwrap_err(),
        AddressValidationError::InvalidZipCode("ABCDE".to_string())
    );

    address.postal_code = Some("9".repeat(33));
    assert!(matches!(
        address.validate().unwrap_err(),
        AddressValidationError::TooLong {
            field: "postal_code",
            ..
        }
    ));
}

#[test]
fn deserialized_address_is_never_managed() {
    let address: Address = serde_json::from_value(serde_json::json!({
        "id": 7,
        "version": 3,
        "city": "Metropolis"
    }))
    .unwrap();

    assert!(!address.identity().is_persisted());
    assert_eq!(address.identity().version(), 0);
    assert_eq!(address.city.as_deref(), Some("Metropolis"));
}
