//! Card file naming convention engine.
//!
//! Every issued card is stored as `{number}_{FIRST} {LAST}.jpg`: a single
//! underscore after the unpadded card number, one space between the
//! upper-cased names, `.jpg` regardless of the source photo format. Both the
//! authoritative store and the mirror use the identical name, and the number
//! allocator recovers card numbers from it.

/// Generate the canonical card filename.
///
/// Names must already be normalized to upper case by the request boundary.
///
/// # Examples
///
/// ```
/// use karta_core::naming::card_filename;
///
/// assert_eq!(card_filename(12, "JAN", "KOWALSKI"), "12_JAN KOWALSKI.jpg");
/// assert_eq!(card_filename(1, "ANNA", "NOWAK"), "1_ANNA NOWAK.jpg");
/// ```
pub fn card_filename(card_number: u32, first_name: &str, last_name: &str) -> String {
    format!("{card_number}_{first_name} {last_name}.jpg")
}

/// Recover the card number from a stored filename.
///
/// Returns `None` for files that do not follow the convention (wrong
/// extension, no underscore, non-numeric prefix); the store scan skips
/// those rather than failing.
///
/// # Examples
///
/// ```
/// use karta_core::naming::parse_card_number;
///
/// assert_eq!(parse_card_number("12_JAN KOWALSKI.jpg"), Some(12));
/// assert_eq!(parse_card_number("notes.txt"), None);
/// ```
pub fn parse_card_number(filename: &str) -> Option<u32> {
    let stem = filename.strip_suffix(".jpg")?;
    let (prefix, _rest) = stem.split_once('_')?;
    prefix.parse().ok()
}
