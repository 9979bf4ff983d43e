use gig_node_wallet_core::{format_address, format_native_balance, network_name};

#[test]
fn address_formatting() {
    assert_eq!(format_address(""), "");
    assert_eq!(format_address("0xABCDEF1234567890"), "0xABCD...7890");
    // No well-formedness validation; short inputs repeat in both halves.
    assert_eq!(format_address("abc"), "abc...abc");
}

#[test]
fn address_formatting_survives_non_ascii_input() {
    // A buggy provider can hand back arbitrary strings; the cut points must
    // land on char boundaries, not bytes.
    assert_eq!(format_address("€€€€"), "€€€€...€€€€");
    assert_eq!(format_address("0xmañana-café"), "0xmaña...café");
}

#[test]
fn known_network_names() {
    assert_eq!(network_name("0x1"), "Ethereum");
    assert_eq!(network_name("0x89"), "Polygon");
    assert_eq!(network_name("0x38"), "BSC");
}

#[test]
fn unrecognized_chain_ids_are_unknown() {
    for chain_id in ["", "0x2", "0xa4b1", "1", "mainnet"] {
        assert_eq!(network_name(chain_id), "Unknown Network");
    }
}

#[test]
fn one_native_token_formats_to_four_decimals() {
    let formatted = format_native_balance("1000000000000000000").expect("valid balance");
    assert_eq!(formatted, "1.0000");
}

#[test]
fn hex_balances_are_accepted() {
    let formatted = format_native_balance("0xde0b6b3a7640000").expect("valid hex balance");
    assert_eq!(formatted, "1.0000");
}

#[test]
fn fractional_balances_truncate() {
    assert_eq!(
        format_native_balance("1500000000000000000").expect("valid"),
        "1.5000"
    );
    // Integer fixed-point division truncates rather than rounds.
    assert_eq!(
        format_native_balance("1999999999999999999").expect("valid"),
        "1.9999"
    );
    assert_eq!(
        format_native_balance("12345678901234567").expect("valid"),
        "0.0123"
    );
}

#[test]
fn zero_balance() {
    assert_eq!(format_native_balance("0").expect("valid"), "0.0000");
}

#[test]
fn malformed_balance_is_rejected() {
    assert!(format_native_balance("").is_err());
    assert!(format_native_balance("not-a-number").is_err());
    assert!(format_native_balance("0x").is_err());
}
