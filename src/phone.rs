//! Brazilian phone number candidates.
//!
//! Leads are stored with a single canonical phone: `55` + area code (DDD) +
//! subscriber number, digits only. Operators type numbers with or without the
//! country code and with or without the mobile `9` that was inserted after the
//! DDD when mobile numbers went from 8 to 9 digits, so a lookup has to try
//! both shapes.

/// Brazilian country code, always present on stored phones.
pub const COUNTRY_CODE: &str = "55";

/// DDD + mobile `9` + 8 digit subscriber number.
const LOCAL_LEN_WITH_NINE: usize = 11;

/// DDD + 8 digit subscriber number.
const LOCAL_LEN_WITHOUT_NINE: usize = 10;

/// Keeps only the ASCII decimal digits of `raw`.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Drops a leading `55` from a digit string.
///
/// Any leading `55` is treated as the country code, so a local number whose
/// DDD happens to start with 55 is misread.
pub fn strip_country_code(digits: &str) -> &str {
    digits.strip_prefix(COUNTRY_CODE).unwrap_or(digits)
}

/// Generates the canonical phone strings a raw operator input may be stored as.
///
/// * 11 local digits: as typed, then without the mobile `9` (3rd digit).
/// * 10 local digits: as typed, then with a `9` inserted after the DDD.
/// * anything else: no candidates.
///
/// Every candidate carries the `55` prefix. Order is stable and duplicates are
/// not removed.
///
/// # Examples
///
/// ```
/// use lead_ia_toggle::phone::generate_candidates;
///
/// assert_eq!(
///     generate_candidates("(11) 98888-7777"),
///     vec!["5511988887777", "551188887777"]
/// );
/// assert!(generate_candidates("").is_empty());
/// ```
pub fn generate_candidates(raw: &str) -> Vec<String> {
    let digits = digits_only(raw);
    let local = strip_country_code(&digits);

    match local.len() {
        LOCAL_LEN_WITH_NINE => {
            let without_nine = format!("{}{}", &local[..2], &local[3..]);
            vec![
                format!("{}{}", COUNTRY_CODE, local),
                format!("{}{}", COUNTRY_CODE, without_nine),
            ]
        }
        LOCAL_LEN_WITHOUT_NINE => {
            let with_nine = format!("{}9{}", &local[..2], &local[2..]);
            vec![
                format!("{}{}", COUNTRY_CODE, local),
                format!("{}{}", COUNTRY_CODE, with_nine),
            ]
        }
        _ => Vec::new(),
    }
}
