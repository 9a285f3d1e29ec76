//! Text normalisation: deterministic canonicalisation of extracted text.
//!
//! ## Why is normalisation necessary?
//!
//! Raw text coming out of a PDF content stream — and even more so out of OCR —
//! is wildly heterogeneous: mixed full-width/half-width characters, composed
//! vs. decomposed accents, irregular runs of whitespace, blank lines, and
//! sometimes control characters serialized as their *literal* two-character
//! escapes (`\n` as backslash + n). The canonical form optimises for
//! consistent matching and indexing over human readability.
//!
//! ## Pass Order
//!
//! The passes must run in exactly this order. Case folding happens before
//! compatibility decomposition so that folded characters decompose too; space
//! removal happens after decomposition so that characters which *decompose to*
//! a space (e.g. U+3000 IDEOGRAPHIC SPACE) are removed as well; escape repair
//! happens after space removal so repaired newlines reach the line pass.
//!
//! Removing EVERY space character (not just redundant ones) is an intentional
//! design choice, not sloppy whitespace handling. Downstream consumers depend
//! on this exact shape.

use unicode_normalization::UnicodeNormalization;

/// Canonicalise a raw extracted string.
///
/// Total over all inputs — this function never fails. Passes, in order:
/// 1. Full Unicode case fold (broader than lowercasing: `ß` → `ss`)
/// 2. Compatibility decomposition (NFKD: `é` → `e` + combining acute,
///    full-width forms → ASCII)
/// 3. Remove every U+0020 space character, anywhere in the string
/// 4. Trim leading/trailing whitespace of the whole string
/// 5. Repair literal `\n` / `\t` escapes into real control characters
/// 6. Drop blank lines; collapse each surviving line's internal whitespace
///    runs to a single space; rejoin with `\n`
///
/// An all-blank input yields the empty string.
pub fn normalize_text(input: &str) -> String {
    let folded = caseless::default_case_fold_str(input);
    let decomposed: String = folded.nfkd().collect();
    let despaced = decomposed.replace(' ', "");
    let repaired = repair_escapes(despaced.trim());
    rebuild_lines(&repaired)
}

// ── Pass 5: repair serialized escapes ────────────────────────────────────────

/// Replace literal two-character `\n` and `\t` sequences with real control
/// characters. Repairs text where a producer wrote the escaped textual
/// representation instead of the control byte itself.
fn repair_escapes(input: &str) -> String {
    input.replace("\\n", "\n").replace("\\t", "\t")
}

// ── Pass 6: line rebuild ─────────────────────────────────────────────────────

/// Split on newlines, drop lines that are blank after trimming, collapse each
/// remaining line's internal whitespace, and rejoin.
///
/// The collapse is vacuous for spaces (pass 3 already deleted them all) but
/// handles tabs and other whitespace surviving to this point.
fn rebuild_lines(input: &str) -> String {
    input
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Tests ────────────────────────────────────────────────────────────────────
