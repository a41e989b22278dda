use fastrace::trace;

/// Minimal address check: an `@` that is not the first character, followed
/// later by a `.` with at least one character on each side of it.
///
/// Anything beyond that (several `@`, whitespace, empty labels after the
/// first dot) is accepted.
#[trace]
pub fn is_valid_email(email: &str) -> bool {
    let Some(at_pos) = email.find('@') else {
        return false;
    };
    let Some(dot_pos) = email[at_pos..].find('.').map(|offset| at_pos + offset) else {
        return false;
    };
    at_pos > 0 && dot_pos > at_pos + 1 && dot_pos < email.len() - 1
}
