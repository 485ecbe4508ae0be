use super::*;

#[test]
fn test_parse_identifier_strips_extension() {
    assert_eq!(
        parse_identifier("20240101000000-seed.sql").unwrap(),
        "20240101000000-seed"
    );
    assert_eq!(parse_identifier("20240101000000-seed").unwrap(), "20240101000000-seed");
}

#[test]
fn test_parse_identifier_rejects_paths() {
    assert!(parse_identifier("migrations/20240101000000-seed.sql").is_err());
    assert!(parse_identifier("").is_err());
}
