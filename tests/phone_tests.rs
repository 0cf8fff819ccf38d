/// Table tests for phone candidate generation
/// Covers the operator input formats seen in practice
use lead_ia_toggle::phone::generate_candidates;

#[cfg(test)]
mod candidate_tests {
    use super::*;

    #[test]
    fn test_formatted_mobile_numbers() {
        let expected = vec!["5511988887777", "551188887777"];

        assert_eq!(generate_candidates("(11) 98888-7777"), expected);
        assert_eq!(generate_candidates("11 98888 7777"), expected);
        assert_eq!(generate_candidates("11988887777"), expected);
        assert_eq!(generate_candidates("+55 11 98888-7777"), expected);
        assert_eq!(generate_candidates("5511988887777"), expected);
    }

    #[test]
    fn test_numbers_without_mobile_nine() {
        let expected = vec!["551133334444", "5511933334444"];

        assert_eq!(generate_candidates("1133334444"), expected);
        assert_eq!(generate_candidates("(11) 3333-4444"), expected);
        assert_eq!(generate_candidates("+55 (11) 3333-4444"), expected);
    }

    #[test]
    fn test_country_code_is_optional() {
        assert_eq!(
            generate_candidates("5511988887777"),
            generate_candidates("11988887777")
        );
        assert_eq!(
            generate_candidates("551133334444"),
            generate_candidates("1133334444")
        );
    }

    #[test]
    fn test_inputs_without_candidates() {
        assert!(generate_candidates("").is_empty());
        assert!(generate_candidates("   ").is_empty());
        assert!(generate_candidates("telefone").is_empty());
        // Subscriber number without DDD
        assert!(generate_candidates("98888-7777").is_empty());
        // Too many digits even after dropping the country code
        assert!(generate_candidates("+55 11 98888-77770").is_empty());
    }

    #[test]
    fn test_local_number_starting_with_55_is_misread() {
        // DDD 55 (Rio Grande do Sul) without country code loses its area code
        assert!(generate_candidates("55988887777").is_empty());
        // With the country code it works
        assert_eq!(
            generate_candidates("5555988887777"),
            vec!["5555988887777", "555588887777"]
        );
    }
}
