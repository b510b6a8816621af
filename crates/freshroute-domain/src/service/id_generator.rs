//! Sequential identifier generation

pub const PACKAGE_ID_PREFIX: &str = "PKG";
pub const ROUTE_ID_PREFIX: &str = "RT";

/// Next sequential id for `prefix`, zero-padded to four digits.
///
/// Only ids shaped `prefix` + ASCII digits take part; anything else is
/// ignored. Two callers working from the same snapshot get the same id.
pub fn generate_id<'a, I>(prefix: &str, existing_ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max_suffix = existing_ids
        .into_iter()
        .filter_map(|id| id.strip_prefix(prefix))
        .filter(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
        .map(|suffix| suffix.trim_start_matches('0'))
        .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        .unwrap_or("");

    format!("{}{:0>4}", prefix, increment(max_suffix))
}

/// Decimal successor of an unsigned digit string of any length
fn increment(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    let mut carry = true;
    for b in bytes.iter_mut().rev() {
        if *b == b'9' {
            *b = b'0';
        } else {
            *b += 1;
            carry = false;
            break;
        }
    }
    if carry {
        bytes.insert(0, b'1');
    }
    bytes.into_iter().map(char::from).collect()
}
