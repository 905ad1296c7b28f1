//! US phone number masking, validation and E.164 conversion.
//!
//! Input is always reduced to digits first, so the mask can be re-applied
//! to its own output without changing it.

pub const PHONE_FORMAT_MESSAGE: &str = "Phone number must be in the format (XXX) XXX-XXXX";
pub const PHONE_INVALID_MESSAGE: &str = "Please enter a valid phone number";

/// Digits of `input` with a leading US country code removed. The code is
/// only recognised when the raw text itself starts with `1` or `+1` and
/// carries exactly eleven digits, so a keystroke past a full mask whose
/// area code begins with 1 is not mistaken for one.
fn national_digits(input: &str) -> String {
    let input = input.trim();
    let mut digits: String = input.chars().filter(char::is_ascii_digit).collect();
    let prefixed = input.starts_with('1') || input.starts_with("+1");
    if prefixed && digits.len() == 11 {
        digits.remove(0);
    }
    digits
}

fn digits_of(input: &str) -> String {
    let mut digits = national_digits(input);
    digits.truncate(10);
    digits
}

/// Apply the `(XXX) XXX-XXXX` display mask to whatever digits are present.
pub fn format_phone(input: &str) -> String {
    let digits = digits_of(input);
    match digits.len() {
        0 => String::new(),
        1..=3 => format!("({}", digits),
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

fn is_masked(phone: &str) -> bool {
    let bytes = phone.as_bytes();
    bytes.len() == 14
        && bytes[0] == b'('
        && bytes[4] == b')'
        && bytes[5] == b' '
        && bytes[9] == b'-'
        && bytes
            .iter()
            .enumerate()
            .filter(|(i, _)| ![0, 4, 5, 9].contains(i))
            .all(|(_, b)| b.is_ascii_digit())
}

fn all_same(digits: &str) -> bool {
    let mut chars = digits.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => false,
    }
}

/// Validate a masked phone number. Empty input is accepted (phone is optional).
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Ok(());
    }
    if !is_masked(phone) {
        return Err(PHONE_FORMAT_MESSAGE);
    }

    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let (area, rest) = digits.split_at(3);
    let exchange = &rest[..3];

    if all_same(&digits) || all_same(area) || all_same(exchange) {
        return Err(PHONE_INVALID_MESSAGE);
    }
    Ok(())
}

/// Convert to `+1XXXXXXXXXX`. Input already starting with `+` passes through.
pub fn to_e164(phone: &str) -> Option<String> {
    let phone = phone.trim();
    if phone.starts_with('+') {
        return Some(phone.to_string());
    }

    let digits = national_digits(phone);
    if digits.len() != 10 {
        return None;
    }
    Some(format!("+1{}", digits))
}

/// Render a stored phone number (often E.164) for editing
pub fn from_e164(phone: &str) -> String {
    format_phone(phone)
}
