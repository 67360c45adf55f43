//! Display-name sanitization for the restrictive in-game character set.
//!
//! The battle engine's text renderer only handles a small superset of
//! ASCII, and a handful of characters corrupt the storage layer outright.
//! Authored names are normalized here before resolution so every later
//! stage only ever sees encoding-safe strings.

/// Non-ASCII glyphs the target encoding renders natively.
const ALLOWED: &[char] = &['\u{2640}', '\u{2642}', 'â', 'É'];

/// Visually or semantically equivalent ASCII substitutes.
const REPLACEMENTS: &[(char, char)] = &[
    ('ᴹ', 'M'),
    ('ɴ', 'N'),
    ('×', 'x'),
    ('’', '\''),
    ('”', '"'),
    ('ᵖ', 'P'),
    ('ᵏ', 'K'),
    ('\u{00A0}', ' '),
    ('ᴾ', 'P'),
];

/// Characters the storage layer cannot hold, replaced unconditionally.
const ILLEGAL: &[char] = &['[', '\\', ']', '^', '`', '|'];

const PLACEHOLDER: char = '?';

/// Produce an encoding-safe equivalent of a display name.
///
/// Per character: allow-listed glyphs pass through, known look-alikes are
/// substituted, and anything else falls back to the ASCII rendition of the
/// original string with unrepresentable characters replaced by `?`.
/// Storage-illegal characters become `?` regardless. Idempotent: running
/// the transform on its own output returns it unchanged.
pub fn sanitize_ingamename(name: &str) -> String {
    let fallback: Vec<char> = name
        .chars()
        .map(|c| if c.is_ascii() { c } else { PLACEHOLDER })
        .collect();

    let safe: String = name
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if ALLOWED.contains(&c) {
                c
            } else if let Some(&(_, substitute)) = REPLACEMENTS.iter().find(|(from, _)| *from == c)
            {
                substitute
            } else {
                fallback[i]
            }
        })
        .collect();

    safe.chars()
        .map(|c| if ILLEGAL.contains(&c) { PLACEHOLDER } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_names_pass_through() {
        assert_eq!(sanitize_ingamename("PIKACHU"), "PIKACHU");
        assert_eq!(sanitize_ingamename("Mr. Mime"), "Mr. Mime");
    }

    #[test]
    fn allowed_glyphs_are_kept() {
        assert_eq!(sanitize_ingamename("Nidoran\u{2640}"), "Nidoran\u{2640}");
        assert_eq!(sanitize_ingamename("Nidoran\u{2642}"), "Nidoran\u{2642}");
        assert_eq!(sanitize_ingamename("Flabébé â É"), "Flab?b? â É");
    }

    #[test]
    fn lookalikes_are_substituted() {
        assert_eq!(sanitize_ingamename("Farfetch’d"), "Farfetch'd");
        assert_eq!(sanitize_ingamename("ᴹAGIKARP"), "MAGIKARP");
        assert_eq!(sanitize_ingamename("2×Speed"), "2xSpeed");
    }

    #[test]
    fn unknown_characters_become_placeholders() {
        assert_eq!(sanitize_ingamename("Pikachü"), "Pikach?");
        assert_eq!(sanitize_ingamename("ポケモン"), "????");
    }

    #[test]
    fn storage_illegal_characters_are_always_replaced() {
        assert_eq!(sanitize_ingamename("PIKA|CHU"), "PIKA?CHU");
        assert_eq!(sanitize_ingamename("a[b]c^d`e\\f"), "a?b?c?d?e?f");
    }

    #[test]
    fn sanitization_is_idempotent() {
        for input in [
            "PIKACHU",
            "Nidoran\u{2640}",
            "Farfetch’d",
            "Pikachü",
            "PIKA|CHU",
            "ᴹr.\u{00A0}Mime×2",
        ] {
            let once = sanitize_ingamename(input);
            assert_eq!(sanitize_ingamename(&once), once, "not idempotent for {input:?}");
        }
    }
}
