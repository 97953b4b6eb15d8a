//! Display-safe masking of personally-identifying values for admin views.
//! All functions are pure and total; they operate on characters, never byte
//! offsets, so no input length can make them panic.

const LOCAL_PART_MASK: &str = "***";
const USER_ID_MASK: &str = "****";
const MEASUREMENT_MASK: &str = "**.*%";
const NOT_AVAILABLE: &str = "N/A";

/// Keeps the first character of the local-part and the whole domain.
/// Local-parts of one or two characters collapse to `first + "***"`;
/// longer ones keep their final character as well. Inputs without an `@`
/// are masked as a bare local-part rather than echoed back.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => format!("{}@{}", mask_local_part(local), domain),
        None => mask_local_part(email),
    }
}

fn mask_local_part(local: &str) -> String {
    let mut chars = local.chars();
    let Some(first) = chars.next() else {
        return String::from(LOCAL_PART_MASK);
    };

    match chars.next_back() {
        Some(last) if chars.next().is_some() => format!("{first}{LOCAL_PART_MASK}{last}"),
        _ => format!("{first}{LOCAL_PART_MASK}"),
    }
}

/// First four and last four characters joined by an ellipsis. Identifiers
/// of eight characters or fewer collapse to a fixed token so the reveal
/// window never covers the whole value.
pub fn mask_user_id(user_id: &str) -> String {
    let chars: Vec<char> = user_id.chars().collect();
    if chars.len() <= 8 {
        return String::from(USER_ID_MASK);
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Non-null measurements render as a fixed placeholder; null renders as an
/// explicit marker, keeping "hidden" and "absent" distinguishable.
pub fn mask_measurement(value: Option<f64>) -> String {
    match value {
        Some(_) => String::from(MEASUREMENT_MASK),
        None => String::from(NOT_AVAILABLE),
    }
}
