//! Locating the `<!-- TAG:START -->` / `<!-- TAG:END -->` pair.

use std::ops::Range;

use regex::Regex;

use crate::patch::DocsError;

/// Compiled start/end marker patterns for one marker tag.
///
/// Whitespace inside the comment is tolerated, so `<!--TAG:START-->` matches
/// as well as `<!-- TAG:START -->`.
#[derive(Debug, Clone)]
pub struct Markers {
    tag: String,
    start: Regex,
    end: Regex,
}

impl Markers {
    /// Compiles the patterns for `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::MarkerPattern`] if the escaped tag still fails to
    /// compile (e.g. it exceeds the regex size limit).
    pub fn new(tag: &str) -> Result<Self, DocsError> {
        let escaped = regex::escape(tag);
        let start = Regex::new(&format!(r"<!--\s*{escaped}:START\s*-->"))?;
        let end = Regex::new(&format!(r"<!--\s*{escaped}:END\s*-->"))?;
        Ok(Self {
            tag: tag.to_string(),
            start,
            end,
        })
    }

    /// The canonical start marker text.
    #[must_use]
    pub fn start_tag(&self) -> String {
        format!("<!-- {}:START -->", self.tag)
    }

    /// The canonical end marker text.
    #[must_use]
    pub fn end_tag(&self) -> String {
        format!("<!-- {}:END -->", self.tag)
    }

    /// Byte range strictly between the two markers.
    ///
    /// # Errors
    ///
    /// Returns an error if either marker is missing or the end marker comes
    /// first.
    pub fn inner_range(&self, text: &str) -> Result<Range<usize>, DocsError> {
        let start = self
            .start
            .find(text)
            .ok_or_else(|| DocsError::MissingStartMarker {
                marker: self.start_tag(),
            })?;
        let end = self
            .end
            .find_at(text, start.end())
            .ok_or_else(|| {
                if self.end.is_match(text) {
                    DocsError::MarkersOutOfOrder {
                        marker: self.end_tag(),
                    }
                } else {
                    DocsError::MissingEndMarker {
                        marker: self.end_tag(),
                    }
                }
            })?;
        Ok(start.end()..end.start())
    }

    /// Replaces everything between the markers with `body`.
    ///
    /// The markers themselves and everything outside them are kept
    /// byte-for-byte.
    ///
    /// # Errors
    ///
    /// Same as [`Markers::inner_range`].
    pub fn splice(&self, text: &str, body: &str) -> Result<String, DocsError> {
        let range = self.inner_range(text)?;
        Ok(format!(
            "{}\n{}\n{}",
            &text[..range.start],
            body,
            &text[range.end..]
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Title\n\n<!-- FLOW:START -->\nold\n<!-- FLOW:END -->\n\nFooter\n";

    #[test]
    fn finds_range_between_markers() {
        let markers = Markers::new("FLOW").unwrap();
        let range = markers.inner_range(DOC).unwrap();
        assert_eq!(&DOC[range], "\nold\n");
    }

    #[test]
    fn tolerates_whitespace_inside_markers() {
        let markers = Markers::new("FLOW").unwrap();
        let text = "<!--FLOW:START-->x<!--   FLOW:END   -->";
        let range = markers.inner_range(text).unwrap();
        assert_eq!(&text[range], "x");
    }

    #[test]
    fn splice_keeps_outside_text() {
        let markers = Markers::new("FLOW").unwrap();
        let patched = markers.splice(DOC, "new").unwrap();
        assert_eq!(
            patched,
            "# Title\n\n<!-- FLOW:START -->\nnew\n<!-- FLOW:END -->\n\nFooter\n"
        );
    }

    #[test]
    fn splice_is_idempotent() {
        let markers = Markers::new("FLOW").unwrap();
        let once = markers.splice(DOC, "body").unwrap();
        let twice = markers.splice(&once, "body").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn tag_is_matched_literally() {
        let markers = Markers::new("A.B").unwrap();
        let err = markers
            .inner_range("<!-- AxB:START --><!-- AxB:END -->")
            .unwrap_err();
        assert!(matches!(err, DocsError::MissingStartMarker { .. }));
    }

    #[test]
    fn reports_missing_markers() {
        let markers = Markers::new("FLOW").unwrap();
        assert!(matches!(
            markers.inner_range("nothing here"),
            Err(DocsError::MissingStartMarker { .. })
        ));
        assert!(matches!(
            markers.inner_range("<!-- FLOW:START -->"),
            Err(DocsError::MissingEndMarker { .. })
        ));
    }

    #[test]
    fn reports_reversed_markers() {
        let markers = Markers::new("FLOW").unwrap();
        let err = markers
            .inner_range("<!-- FLOW:END -->\n<!-- FLOW:START -->")
            .unwrap_err();
        assert!(matches!(err, DocsError::MarkersOutOfOrder { .. }));
    }
}
