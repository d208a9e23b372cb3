//! Artifact file names
//!
//! `<reference>__<YYYYMMDD-HHMM>__<YYYYMMDD-HHMM>.csv`, with the reference
//! reduced to characters every file system accepts.

use crate::{
    constants::report::{ARTIFACT_EXTENSION, DEFAULT_ARTIFACT_STEM, MAX_ARTIFACT_STEM_LEN},
    time::{format_compact_datetime, Timestamp},
};

fn fold_accent(c: char) -> Option<char> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'ç' => 'c',
        'Ç' => 'C',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        _ => return None,
    };
    Some(folded)
}

fn is_kept(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Reduce `text` to `[A-Za-z0-9._-]`
///
/// Accented Latin letters lose their accent, every other run of characters
/// becomes a single `_`, leading and trailing `_` are trimmed, and the result
/// is cut to `MAX_ARTIFACT_STEM_LEN` characters.
pub fn sanitize_file_name(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;

    for c in text.chars() {
        let c = fold_accent(c).unwrap_or(c);
        if is_kept(c) {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }

    let mut trimmed = out.trim_matches('_').to_string();
    // ASCII only at this point
    trimmed.truncate(MAX_ARTIFACT_STEM_LEN);
    trimmed
}

/// File name for a report covering `start..end`
pub fn artifact_name(reference: &str, start: Timestamp, end: Timestamp) -> String {
    let stem = sanitize_file_name(reference);
    let stem = if stem.is_empty() {
        DEFAULT_ARTIFACT_STEM
    } else {
        stem.as_str()
    };
    format!(
        "{}__{}__{}.{}",
        stem,
        format_compact_datetime(start).unwrap_or_default(),
        format_compact_datetime(end).unwrap_or_default(),
        ARTIFACT_EXTENSION
    )
}
