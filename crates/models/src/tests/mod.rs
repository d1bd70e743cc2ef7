
/// Name validators
mod validation_tests {
    use crate::{city_service, product};

    #[test]
    fn service_name_must_not_be_blank() {
        assert!(city_service::validate_name("Water").is_ok());
        assert!(city_service::validate_name("").is_err());
        assert!(city_service::validate_name("   ").is_err());
    }

    #[test]
    fn product_name_length_bounds() {
        assert_eq!(product::validate_name("  Tea ").unwrap(), "Tea");
        assert!(product::validate_name("a").is_err());
        assert!(product::validate_name(&"x".repeat(51)).is_err());
        assert!(product::validate_name(&"x".repeat(50)).is_ok());
    }
}
