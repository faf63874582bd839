//! Bounded identifier synthesis
//!
//! CloudFormation logical ids, role names and policy names are derived from
//! user-controlled values (service names, function identifiers, resource
//! paths) but must stay within a 64 character budget. Values are converted
//! to the target casing, and values that would overflow the budget are
//! truncated with a hash of the full casing-converted value appended, so
//! distinct long inputs sharing a truncated prefix stay distinguishable.
//!
//! The hash is a pure function of the input: synthesis is deterministic and
//! performs no collision detection against a live namespace.

const MAX_NAME_LENGTH: usize = 64;

/// Rendered width of the overflow hash, in hex digits
const HASH_WIDTH: usize = 8;

/// Convert a raw value to PascalCase
///
/// Words are split on non-alphanumeric separators and on case boundaries
/// (`lower|digit → Upper`, and the last capital of an acronym run followed
/// by a lower-case letter starts a new word).
pub fn pascal_case(raw: &str) -> String {
    split_words(raw)
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Convert a raw value to hyphenated lower-case (param case)
pub fn param_case(raw: &str) -> String {
    split_words(raw)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Synthesize a PascalCase identifier of at most 64 characters ending with
/// `raw_postfix` in the same casing
pub fn bounded_pascal(raw_value: &str, raw_postfix: &str) -> String {
    let value = pascal_case(raw_value);
    let postfix = pascal_case(raw_postfix);
    let max_length = MAX_NAME_LENGTH.saturating_sub(postfix.chars().count());

    let value = if value.chars().count() > max_length {
        let digest = format!("{:08x}", string_hash(&value));
        let keep = max_length.saturating_sub(HASH_WIDTH);
        let truncated: String = value.chars().take(keep).collect();
        format!("{truncated}{digest}")
    } else {
        value
    };

    format!("{value}{postfix}")
}

/// Synthesize a param-case identifier of at most 64 characters ending with
/// `-` + `raw_postfix` in the same casing
pub fn bounded_param(raw_value: &str, raw_postfix: &str) -> String {
    let value = param_case(raw_value);
    let postfix = param_case(raw_postfix);
    let max_length = MAX_NAME_LENGTH.saturating_sub(1 + postfix.chars().count());

    let value = if value.chars().count() > max_length {
        let digest = format!("{:08X}", string_hash(&value));
        let keep = max_length.saturating_sub(HASH_WIDTH + 1);
        let truncated: String = value.chars().take(keep).collect();
        format!("{truncated}-{digest}")
    } else {
        value
    };

    format!("{value}-{postfix}")
}

/// 32-bit hash of the full casing-converted value (djb2 xor variant,
/// processed from the last character to the first)
fn string_hash(value: &str) -> u32 {
    let mut hash: u32 = 5381;
    for ch in value.chars().rev() {
        hash = hash.wrapping_mul(33) ^ (ch as u32);
    }
    hash
}

/// Split a raw value into words at separators and case boundaries
fn split_words(raw: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = raw.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if ch.is_uppercase() && i > 0 && !current.is_empty() {
            let prev = chars[i - 1];
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && i + 1 < chars.len() && chars[i + 1].is_lowercase());
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}
