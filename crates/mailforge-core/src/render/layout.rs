//! Baseline HTML document wrapping the rendered body.

use super::html::escape_html;

const RESET_STYLES: &str = "body { margin: 0; padding: 0; background-color: #f4f4f4; -webkit-text-size-adjust: 100%; -ms-text-size-adjust: 100%; }
table { border-collapse: collapse; }
img { border: 0; outline: none; text-decoration: none; -ms-interpolation-mode: bicubic; }
p { margin: 0 0 12px 0; }
ul, ol { margin: 0 0 12px 0; padding-left: 24px; }
li { margin: 0 0 4px 0; }
blockquote { margin: 0 0 12px 0; padding: 0 0 0 12px; border-left: 3px solid #dddddd; color: #555555; }
a { color: #007bff; }";

/// Wraps body fragments in the full document.
pub(crate) fn wrap_document(subject: &str, width: u32, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<meta http-equiv="X-UA-Compatible" content="IE=edge">
<title>{title}</title>
<style>
{RESET_STYLES}
</style>
</head>
<body>
<table role="presentation" width="100%" cellpadding="0" cellspacing="0" border="0" style="background-color: #f4f4f4;">
<tr>
<td align="center" style="padding: 20px 0;">
<table role="presentation" class="email-container" width="{width}" cellpadding="0" cellspacing="0" border="0" style="max-width: {width}px; width: 100%; background-color: #ffffff;">
<tr>
<td style="padding: 20px; font-family: Arial, sans-serif;">
{body}
</td>
</tr>
</table>
</td>
</tr>
</table>
</body>
</html>
"#,
        title = escape_html(subject),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_uses_width_and_escapes_title() {
        let html = wrap_document("A & B", 640, "<p>x</p>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("width=\"640\""));
        assert!(html.contains("max-width: 640px;"));
        assert!(html.contains("\n<p>x</p>\n"));
    }
}
