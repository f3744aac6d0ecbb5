use std::sync::LazyLock;

use regex::Regex;

use crate::models::{RawFields, RelayPayload};

pub const ADDRESS_MAX_CHARS: usize = 255;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static PHONE_STRIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9+()\-\s]").unwrap());
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+]?[-\s0-9()]{7,20}$").unwrap());
static EMAIL_LOCAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~.\-]+$").unwrap());
static DOMAIN_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9](?:[a-zA-Z0-9\-]*[a-zA-Z0-9])?$").unwrap());

/// Fields after sanitization. Only constructed by [`validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl From<NormalizedFields> for RelayPayload {
    fn from(fields: NormalizedFields) -> Self {
        RelayPayload {
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            phone: fields.phone,
            address: fields.address,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid(NormalizedFields),
    Invalid(Vec<String>),
}

/// Sanitize every field, then check all rules. Every violated rule
/// contributes one message, in field order.
pub fn validate(raw: &RawFields) -> ValidationResult {
    let fields = NormalizedFields {
        first_name: sanitize_text(&raw.first_name),
        last_name: sanitize_text(&raw.last_name),
        email: sanitize_email(&raw.email),
        phone: sanitize_phone(&raw.phone),
        address: sanitize_text(&raw.address),
    };

    let mut errors = Vec::new();

    if fields.first_name.is_empty() {
        errors.push("First name is required.".to_string());
    }
    if fields.last_name.is_empty() {
        errors.push("Last name is required.".to_string());
    }
    if !is_email(&fields.email) {
        errors.push("Valid email is required.".to_string());
    }
    if !PHONE_RE.is_match(&fields.phone) {
        errors.push("Valid phone is required.".to_string());
    }
    if fields.address.is_empty() {
        errors.push("Address is required.".to_string());
    } else if fields.address.chars().count() > ADDRESS_MAX_CHARS {
        errors.push(format!("Address must be at most {ADDRESS_MAX_CHARS} characters."));
    }

    if errors.is_empty() {
        ValidationResult::Valid(fields)
    } else {
        ValidationResult::Invalid(errors)
    }
}

/// Strip markup and control characters, collapse whitespace runs, trim.
pub fn sanitize_text(value: &str) -> String {
    let without_tags = TAG_RE.replace_all(value, "");
    let printable: String = without_tags
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    WHITESPACE_RE.replace_all(&printable, " ").trim().to_string()
}

/// Drop every character that cannot appear in an address.
pub fn sanitize_email(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~.@".contains(*c))
        .collect()
}

pub fn sanitize_phone(value: &str) -> String {
    PHONE_STRIP_RE.replace_all(value, "").trim().to_string()
}

/// `local@domain.tld` shape check.
pub fn is_email(value: &str) -> bool {
    if value.len() < 6 {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if domain.contains('@') || !EMAIL_LOCAL_RE.is_match(local) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|l| DOMAIN_LABEL_RE.is_match(l)) {
        return false;
    }

    labels.last().is_some_and(|tld| tld.len() >= 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_raw() -> RawFields {
        RawFields {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            address: "12 Analytical Row, London".to_string(),
        }
    }

    fn errors(raw: &RawFields) -> Vec<String> {
        match validate(raw) {
            ValidationResult::Invalid(errors) => errors,
            ValidationResult::Valid(_) => panic!("expected invalid"),
        }
    }

    #[test]
    fn valid_fields_pass_and_are_normalized() {
        let mut raw = valid_raw();
        raw.first_name = "  Ada \n".to_string();
        raw.address = "12   Analytical\tRow, <b>London</b>".to_string();
        raw.phone = "+1 (555) 123-4567 ext".to_string();

        let ValidationResult::Valid(fields) = validate(&raw) else {
            panic!("expected valid");
        };
        assert_eq!(fields.first_name, "Ada");
        assert_eq!(fields.address, "12 Analytical Row, London");
        assert_eq!(fields.phone, "+1 (555) 123-4567");
    }

    #[test]
    fn every_missing_field_is_reported_in_order() {
        let errs = errors(&RawFields::default());
        assert_eq!(
            errs,
            vec![
                "First name is required.",
                "Last name is required.",
                "Valid email is required.",
                "Valid phone is required.",
                "Address is required.",
            ]
        );
    }

    #[test]
    fn single_missing_field_names_that_field() {
        let mut raw = valid_raw();
        raw.last_name = "   ".to_string();
        assert_eq!(errors(&raw), vec!["Last name is required."]);
    }

    #[test]
    fn malformed_email_is_rejected() {
        for email in ["not-an-email", "a@b", "@example.com", "ada@example", "ada@@example.com", "ada@-x.com", "ada@example.c"] {
            let mut raw = valid_raw();
            raw.email = email.to_string();
            assert_eq!(errors(&raw), vec!["Valid email is required."], "{email}");
        }
    }

    #[test]
    fn email_accepts_common_shapes() {
        for email in ["ada@example.com", "ada.lovelace+forms@mail.example.co.uk", "a_b@x-y.io"] {
            assert!(is_email(email), "{email}");
        }
    }

    #[test]
    fn phone_rules() {
        let mut raw = valid_raw();
        raw.phone = "12345".to_string();
        assert_eq!(errors(&raw), vec!["Valid phone is required."]);

        raw.phone = "1".repeat(21);
        assert_eq!(errors(&raw), vec!["Valid phone is required."]);

        raw.phone = "1+2345678".to_string();
        assert_eq!(errors(&raw), vec!["Valid phone is required."]);

        raw.phone = "phone: 555-1234567".to_string();
        assert!(matches!(validate(&raw), ValidationResult::Valid(_)));
    }

    #[test]
    fn overlong_address_is_rejected_not_truncated() {
        let mut raw = valid_raw();
        raw.address = "a".repeat(ADDRESS_MAX_CHARS);
        assert!(matches!(validate(&raw), ValidationResult::Valid(_)));

        raw.address = "a".repeat(ADDRESS_MAX_CHARS + 1);
        assert_eq!(errors(&raw), vec!["Address must be at most 255 characters."]);
    }

    #[test]
    fn markup_only_name_is_empty() {
        let mut raw = valid_raw();
        raw.first_name = "<script></script>".to_string();
        assert_eq!(errors(&raw), vec!["First name is required."]);
    }
}
