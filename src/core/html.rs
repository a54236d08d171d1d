// src/core/html.rs
// Low-level line and tag helpers. Tag/attribute names match case-insensitively (ASCII only),
// so lowercased text keeps the same byte offsets as the original.

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

/// Lines of `s` with their byte offsets. Each line keeps its terminator (`\n` or `\r\n`),
/// so concatenating the slices reproduces `s` exactly.
pub fn lines_with_offsets(s: &str) -> impl Iterator<Item = (usize, &str)> {
    s.split_inclusive('\n').scan(0usize, |pos, line| {
        let start = *pos;
        *pos += line.len();
        Some((start, line))
    })
}

/// Every byte offset where `needle_lc` (already lowercased) occurs in `hay_lc`, left to right.
pub fn find_all(hay_lc: &str, needle_lc: &str) -> Vec<usize> {
    if needle_lc.is_empty() {
        return Vec::new();
    }
    hay_lc.match_indices(needle_lc).map(|(i, _)| i).collect()
}

/// How many times `line` opens `<tag` (followed by whitespace, `>`, `/` or end of line).
pub fn count_tag_opens(line: &str, tag: &str) -> usize {
    let lc = to_lower(line);
    let open = join!("<", &to_lower(tag));
    let mut from = 0usize;
    let mut n = 0usize;
    while let Some(rel) = lc[from..].find(&open) {
        let after = from + rel + open.len();
        match lc[after..].chars().next() {
            None => n += 1,
            Some(c) if c.is_ascii_whitespace() || c == '>' || c == '/' => n += 1,
            _ => {}
        }
        from = after;
    }
    n
}

pub fn opens_tag(line: &str, tag: &str) -> bool {
    count_tag_opens(line, tag) > 0
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
