//! Message body cleanup before speech
//!
//! Raw bodies fetched from the mailbox still carry MIME headers, multipart
//! boundaries, HTML tags and attachment markers. None of that should be
//! read aloud.

use once_cell::sync::Lazy;
use regex::Regex;

/// Header lines and inline declarations that describe the transport, not the content
static HEADER_LINES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)Content-Type:[^\n]*(?:\n|$)",
        r"(?i)Content-Transfer-Encoding:[^\n]*(?:\n|$)",
        r"(?i)Content-Disposition:[^\n]*(?:\n|$)",
        r"(?i)MIME-Version:[^\n]*(?:\n|$)",
        r"(?i)charset=[^\n]*(?:\n|$)",
        r"(?i)boundary=[^\n]*(?:\n|$)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Outlook style `--_000_..._` boundaries and `--token` lines that stand alone
static BOUNDARIES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"--_\S*_",
        r"(?m)^[ \t]*--[0-9A-Za-z'()+_,./:=?-]{10,}[ \t]*$",
    ]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

static TAGS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"<[^>]*>").ok());

/// `[image: logo.png]`, `[cid:...]`, `[1]` and friends
static BRACKETED: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\[[^\n]*?\]").ok());

static WHITESPACE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\s+").ok());

fn replace_all(re: &Option<Regex>, text: String, with: &str) -> String {
    match re {
        Some(re) => re.replace_all(&text, with).into_owned(),
        None => text,
    }
}

fn clean_once(raw: &str) -> String {
    let mut text = raw.to_string();

    for re in HEADER_LINES.iter() {
        text = re.replace_all(&text, "").into_owned();
    }
    for re in BOUNDARIES.iter() {
        text = re.replace_all(&text, "").into_owned();
    }

    text = replace_all(&TAGS, text, " ");
    text = replace_all(&BRACKETED, text, "");
    text = replace_all(&WHITESPACE, text, " ");

    text.trim().to_string()
}

/// Strip transport artifacts from a message body
///
/// Removing one artifact can expose another (`--[x]_a_` becomes a boundary
/// once the bracket is gone), so the cleanup runs until nothing changes.
/// After the first pass every change shrinks the text, which bounds the loop.
pub fn sanitize(raw: &str) -> String {
    let mut current = clean_once(raw);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(sanitize("Lunch at noon?"), "Lunch at noon?");
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("   "), "");
    }

    #[test]
    fn test_removes_mime_headers() {
        let raw = "Content-Type: text/plain; charset=\"UTF-8\"\n\
                   Content-Transfer-Encoding: quoted-printable\n\
                   MIME-Version: 1.0\n\
                   Hello there";
        assert_eq!(sanitize(raw), "Hello there");
    }

    #[test]
    fn test_header_names_case_insensitive() {
        assert_eq!(sanitize("content-type: text/html\nHi"), "Hi");
    }

    #[test]
    fn test_header_on_last_line() {
        assert_eq!(sanitize("Body text\nContent-Type: text/plain"), "Body text");
    }

    #[test]
    fn test_removes_boundaries() {
        let raw = "--_000_BN6PR_\nFirst part\n--0000000000004f2a3b05f1c2--\nEnd";
        assert_eq!(sanitize(raw), "First part End");
    }

    #[test]
    fn test_double_hyphen_inside_text_kept() {
        assert_eq!(
            sanitize("The meeting was great--unfortunately John left early."),
            "The meeting was great--unfortunately John left early."
        );
        assert_eq!(
            sanitize("Slides are here--https://example.com/slides.pdf thanks"),
            "Slides are here--https://example.com/slides.pdf thanks"
        );
        assert_eq!(
            sanitize("Hi\n--0000000000004f2a3b05f1c2 and more\nBye"),
            "Hi --0000000000004f2a3b05f1c2 and more Bye"
        );
    }

    #[test]
    fn test_keeps_signature_separator() {
        assert_eq!(sanitize("Thanks\n-- \nBob"), "Thanks -- Bob");
    }

    #[test]
    fn test_strips_markup_and_attachments() {
        let raw = "<html><body><p>Quarterly <b>report</b></p>[image: chart.png]</body></html>";
        assert_eq!(sanitize(raw), "Quarterly report");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(sanitize("  a \t\t b\n\n\nc  "), "a b c");
    }

    #[test]
    fn test_unmatched_patterns_left_alone() {
        assert_eq!(sanitize("a < b and [c"), "a < b and [c");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "plain words",
            "--[x]_a_ trailing",
            "<p>Hi</p>\n[cid:1]\nContent-Type: text/plain\n",
            "[[nested]] [<b>]",
            "a <b c> d [e <f>] g",
            "--_a<b>_ text",
            "  \u{a0}spaced\u{2003}out  ",
        ];
        for sample in samples {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_exposed_boundary_removed() {
        assert_eq!(sanitize("--[x]_a_ trailing"), "trailing");
    }
}
