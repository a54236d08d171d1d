// src/split/classify.rs
//! Row classifier: cut a region into rows and read each row's category key.
//!
//! A row starts on every line that opens the row tag (`<tr ...`) and runs up to the
//! next such line or the end of the region. The opening line must carry the key
//! attribute, e.g. `<tr data-actor="ai_user">`. Lines and key values are kept verbatim.
//! A line may open at most one row; minified `<tr ...></tr><tr ...>` markup is rejected.

use regex::Regex;

use crate::config::RowPattern;
use crate::core::html::{count_tag_opens, is_blank, lines_with_offsets};

use super::error::{Result, SplitError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row<'a> {
    pub key: String,
    pub lines: Vec<&'a str>,
    /// 1-based line number of the opening line within the region.
    pub line: usize,
}

impl Row<'_> {
    /// The row's text exactly as it appeared in the template.
    pub fn text(&self) -> String {
        self.lines.concat()
    }
}

pub struct Classifier {
    tag: String,
    attr: String,
    key_re: Regex,
}

impl Classifier {
    pub fn new(pattern: &RowPattern) -> Result<Self> {
        // Preceded by whitespace or a quote, so `x-data-actor` is not `data-actor`.
        let src = format!(
            r#"(?i)(?:^|[\s"']){}\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
            regex::escape(&pattern.key_attr)
        );
        let key_re = Regex::new(&src).map_err(|e| SplitError::Pattern {
            pattern: pattern.key_attr.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { tag: pattern.tag.clone(), attr: pattern.key_attr.clone(), key_re })
    }

    fn key_of(&self, line: &str) -> Option<String> {
        let caps = self.key_re.captures(line)?;
        let value = caps.get(1).or_else(|| caps.get(2))?.as_str();
        if value.trim().is_empty() { None } else { Some(s!(value)) }
    }

    pub fn classify<'a>(&self, region: &'a str) -> Result<Vec<Row<'a>>> {
        let mut rows: Vec<Row<'a>> = Vec::new();
        // Lines seen before the first row: fine only if no row ever starts.
        let mut leading: Option<(usize, &'a str)> = None;

        for (idx, (_, line)) in lines_with_offsets(region).enumerate() {
            let line_no = idx + 1;

            let opens = count_tag_opens(line, &self.tag);
            if opens > 1 {
                return Err(SplitError::MalformedRegion {
                    line: line_no,
                    reason: format!("{opens} `<{}` openings on one line", self.tag),
                });
            }
            if opens == 1 {
                if let Some((bad_no, bad)) = leading {
                    return Err(SplitError::MalformedRegion {
                        line: bad_no,
                        reason: format!("text before the first row: {:?}", bad.trim_end()),
                    });
                }
                let key = self.key_of(line).ok_or_else(|| SplitError::MissingCategoryKey {
                    line: line_no,
                    attr: self.attr.clone(),
                })?;
                rows.push(Row { key, lines: vec![line], line: line_no });
                continue;
            }

            match rows.last_mut() {
                Some(row) => row.lines.push(line),
                None => {
                    if leading.is_none() {
                        leading = Some((line_no, line));
                    }
                }
            }
        }

        // No rows: only blank filler is allowed.
        if rows.is_empty() && leading.is_some() {
            let stray = lines_with_offsets(region)
                .enumerate()
                .find(|(_, (_, l))| !is_blank(l));
            if let Some((idx, (_, l))) = stray {
                return Err(SplitError::MalformedRegion {
                    line: idx + 1,
                    reason: format!("text outside any row: {:?}", l.trim_end()),
                });
            }
        }

        Ok(rows)
    }
}

/// One-shot form of [`Classifier::classify`].
pub fn classify<'a>(region: &'a str, pattern: &RowPattern) -> Result<Vec<Row<'a>>> {
    Classifier::new(pattern)?.classify(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actors() -> RowPattern {
        RowPattern::new("data-actor")
    }

    #[test]
    fn rows_take_following_lines() {
        let region = "  <tr data-actor=\"a\">\n    <td>1</td>\n  </tr>\n  <tr data-actor='b'>\n  </tr>\n";
        let rows = classify(region, &actors()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "a");
        assert_eq!(rows[0].lines.len(), 3);
        assert_eq!(rows[1].key, "b");
        assert_eq!(rows[1].line, 4);
        let rejoined: String = rows.iter().map(Row::text).collect();
        assert_eq!(rejoined, region);
    }

    #[test]
    fn attribute_match_is_exact_name() {
        let region = "<tr data-actor-type=\"x\" data-actor=\"real\">\n";
        let rows = classify(region, &actors()).unwrap();
        assert_eq!(rows[0].key, "real");
    }

    #[test]
    fn prefixed_attribute_is_not_the_key() {
        let err = classify("<tr x-data-actor=\"v\">\n", &actors()).unwrap_err();
        assert_eq!(err.kind(), "MissingCategoryKey");

        let rows = classify("<tr x-data-actor=\"v\" data-actor=\"real\">\n", &actors()).unwrap();
        assert_eq!(rows[0].key, "real");
        let rows = classify("<tr data-actor='q'>\n", &actors()).unwrap();
        assert_eq!(rows[0].key, "q");
    }

    #[test]
    fn key_is_kept_verbatim() {
        let rows = classify("<tr data-actor=\" ai_user \">\n", &actors()).unwrap();
        assert_eq!(rows[0].key, " ai_user ");

        let err = classify("<tr data-actor=\"  \">\n", &actors()).unwrap_err();
        assert_eq!(err.kind(), "MissingCategoryKey");
    }

    #[test]
    fn two_rows_on_one_line_are_malformed() {
        let sectors = RowPattern::new("data-sector");
        let region = "<tr data-sector=\"a\"><td>a</td></tr><tr data-sector=\"b\"><td>b</td></tr>\n";
        let err = classify(region, &sectors).unwrap_err();
        assert!(matches!(err, SplitError::MalformedRegion { line: 1, .. }));
    }

    #[test]
    fn missing_key_is_fatal() {
        let region = "<tr data-actor=\"a\">\n</tr>\n<tr class=\"x\">\n</tr>\n";
        let err = classify(region, &actors()).unwrap_err();
        assert!(matches!(err, SplitError::MissingCategoryKey { line: 3, .. }));
    }

    #[test]
    fn empty_key_is_missing() {
        let err = classify("<tr data-actor=\"\">\n", &actors()).unwrap_err();
        assert_eq!(err.kind(), "MissingCategoryKey");
    }

    #[test]
    fn text_before_first_row_is_malformed() {
        let region = "<!-- rows -->\n<tr data-actor=\"a\">\n";
        let err = classify(region, &actors()).unwrap_err();
        assert!(matches!(err, SplitError::MalformedRegion { line: 1, .. }));

        // Blank lines would be dropped from every output, so they count too.
        let err = classify("\n<tr data-actor=\"a\">\n", &actors()).unwrap_err();
        assert_eq!(err.kind(), "MalformedRegion");
    }

    #[test]
    fn empty_and_blank_regions_have_no_rows() {
        assert!(classify("", &actors()).unwrap().is_empty());
        assert!(classify("   \n\t\n", &actors()).unwrap().is_empty());
        let err = classify("\n<td>orphan</td>\n", &actors()).unwrap_err();
        assert!(matches!(err, SplitError::MalformedRegion { line: 2, .. }));
    }
}
