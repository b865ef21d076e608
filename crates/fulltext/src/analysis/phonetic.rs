//! American Soundex encoding.

/// Returns the Soundex digit for an ASCII letter, `'0'` for vowels, and `None`
/// for letters that are skipped without separating codes (`h`, `w`).
fn code(c: char) -> Option<char> {
    match c.to_ascii_lowercase() {
        'b' | 'f' | 'p' | 'v' => Some('1'),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some('2'),
        'd' | 't' => Some('3'),
        'l' => Some('4'),
        'm' | 'n' => Some('5'),
        'r' => Some('6'),
        'h' | 'w' => None,
        _ => Some('0'),
    }
}

/// Encodes a word as a four character Soundex code such as `R163`.
///
/// Non-ASCII-letter characters are ignored. Returns `None` when the word
/// contains no ASCII letter.
///
/// # Examples
///
/// ```
/// use helios_fulltext::analysis::soundex;
///
/// assert_eq!(soundex("Robert").as_deref(), Some("R163"));
/// assert_eq!(soundex("Rupert").as_deref(), Some("R163"));
/// assert_eq!(soundex("1234"), None);
/// ```
pub fn soundex(word: &str) -> Option<String> {
    let mut letters = word.chars().filter(|c| c.is_ascii_alphabetic());
    let first = letters.next()?;

    let mut out = String::with_capacity(4);
    out.push(first.to_ascii_uppercase());

    let mut last = code(first);
    for c in letters {
        if out.len() == 4 {
            break;
        }
        match code(c) {
            None => {}
            Some('0') => last = Some('0'),
            Some(digit) => {
                if last != Some(digit) {
                    out.push(digit);
                }
                last = Some(digit);
            }
        }
    }

    while out.len() < 4 {
        out.push('0');
    }
    Some(out)
}
