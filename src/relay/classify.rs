//! Routing uploads by declared MIME type

use std::fmt;

/// Which extraction webhook an upload goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl DocumentKind {
    /// Classify a declared content type
    ///
    /// Anything mentioning `pdf` is a PDF. Everything else, including an
    /// empty type, goes to the image webhook.
    pub fn from_mime(mime: &str) -> Self {
        if mime.contains("pdf") {
            DocumentKind::Pdf
        } else {
            DocumentKind::Image
        }
    }

    /// Name used in logs and configuration errors
    pub fn target(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF extraction",
            DocumentKind::Image => "image extraction",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => f.write_str("pdf"),
            DocumentKind::Image => f.write_str("image"),
        }
    }
}

/// `Content-Disposition` value carrying the original filename
///
/// Quotes and backslashes are escaped and control characters dropped so
/// the value is always a valid header.
pub fn content_disposition(filename: &str) -> String {
    let mut escaped = String::with_capacity(filename.len());
    for c in filename.chars() {
        match c {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_control() => {}
            c => escaped.push(c),
        }
    }
    format!("attachment; filename=\"{}\"", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_substring_routes_to_pdf() {
        for mime in ["application/pdf", "application/x-pdf", "text/pdf; charset=binary"] {
            assert_eq!(DocumentKind::from_mime(mime), DocumentKind::Pdf, "{mime}");
        }
    }

    #[test]
    fn test_everything_else_routes_to_image() {
        for mime in ["image/png", "image/jpeg", "text/plain", "application/octet-stream", ""] {
            assert_eq!(DocumentKind::from_mime(mime), DocumentKind::Image, "{mime}");
        }
    }

    #[test]
    fn test_match_is_case_sensitive_substring() {
        assert_eq!(DocumentKind::from_mime("APPLICATION/PDF"), DocumentKind::Image);
    }

    #[test]
    fn test_content_disposition_plain() {
        assert_eq!(
            content_disposition("invoice-42.pdf"),
            "attachment; filename=\"invoice-42.pdf\""
        );
    }

    #[test]
    fn test_content_disposition_escapes() {
        assert_eq!(
            content_disposition("a\"b\\c\r\n.png"),
            "attachment; filename=\"a\\\"b\\\\c.png\""
        );
    }
}
