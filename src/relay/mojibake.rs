//! Repair of UTF-8 text that was decoded as Windows-1252 / Latin-1 upstream

/// Known corrupted sequences and the character they stand for, applied in order
pub const MOJIBAKE_TABLE: &[(&str, &str)] = &[
    ("\u{e2}\u{80}\u{99}", "\u{2019}"),
    ("\u{e2}\u{20ac}\u{2122}", "\u{2019}"),
    ("\u{e2}\u{20ac}\u{201c}", "\u{2013}"),
    ("\u{e2}\u{20ac}\u{201d}", "\u{2014}"),
    ("\u{e2}\u{20ac}\u{153}", "\u{201c}"),
    ("\u{e2}\u{20ac}\u{9d}", "\u{201d}"),
    ("\u{c3}\u{a9}", "\u{e9}"),
    ("\u{c3}\u{a1}", "\u{e1}"),
];

/// Replace every known corrupted sequence in `input`
///
/// The table is applied in order and repeated until a full pass changes
/// nothing, so the result is a fixed point: `fix_mojibake(&fix_mojibake(s))`
/// equals `fix_mojibake(s)`. Every replacement is shorter than the sequence it
/// replaces, which bounds the number of passes.
pub fn fix_mojibake(input: &str) -> String {
    let mut text = input.to_string();
    loop {
        let before = text.len();
        for (bad, good) in MOJIBAKE_TABLE {
            if text.contains(bad) {
                text = text.replace(bad, good);
            }
        }
        if text.len() == before {
            return text;
        }
    }
}
