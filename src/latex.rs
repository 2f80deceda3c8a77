use askama::{Html, MarkupDisplay};
use once_cell::sync::Lazy;
use regex::Regex;

static MATH_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\$.*?\$\$|\$[^$]*\$").expect("math span pattern is valid")
});

static TEXT_COMMANDS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (
            r"\\textsc\{(.*?)\}",
            r#"<span style="font-variant: small-caps;">$1</span>"#,
        ),
        (r"\\textbf\{(.*?)\}", "<b>$1</b>"),
        (r"\\textit\{(.*?)\}", "<i>$1</i>"),
        (r"\\texttt\{(.*?)\}", "<code>$1</code>"),
        (r"\\emph\{(.*?)\}", "<em>$1</em>"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("text command pattern is valid"),
            replacement,
        )
    })
    .collect()
});

fn escape_html(text: &str) -> String {
    MarkupDisplay::new_unsafe(text, Html).to_string()
}

fn convert_text_commands(text: &str) -> String {
    let mut out = escape_html(text);
    for (pattern, replacement) in TEXT_COMMANDS.iter() {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    out
}

/// Turns arXiv title/abstract text into HTML.
///
/// A few LaTeX text-mode commands become plain HTML tags; inline and display
/// math (`$...$`, `$$...$$`) is left as written for MathJax. Everything is
/// HTML-escaped first, so the output can be emitted unescaped.
pub fn clean_latex_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for math in MATH_SPAN.find_iter(text) {
        out.push_str(&convert_text_commands(&text[last..math.start()]));
        out.push_str(&escape_html(math.as_str()));
        last = math.end();
    }
    out.push_str(&convert_text_commands(&text[last..]));

    out
}

/// Collapses the hard line wraps and indentation the arXiv feed puts
/// inside titles and abstracts.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_latex_text(""), "");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(
            clean_latex_text("Dark matter at colliders"),
            "Dark matter at colliders"
        );
    }

    #[test]
    fn test_text_commands_become_tags() {
        assert_eq!(clean_latex_text(r"\textbf{bold}"), "<b>bold</b>");
        assert_eq!(clean_latex_text(r"\textit{slanted}"), "<i>slanted</i>");
        assert_eq!(clean_latex_text(r"\texttt{code}"), "<code>code</code>");
        assert_eq!(clean_latex_text(r"\emph{this}"), "<em>this</em>");
        assert_eq!(
            clean_latex_text(r"the \textsc{Pythia} generator"),
            r#"the <span style="font-variant: small-caps;">Pythia</span> generator"#
        );
    }

    #[test]
    fn test_multiple_commands_in_one_string() {
        assert_eq!(
            clean_latex_text(r"\emph{first} and \textbf{second}"),
            "<em>first</em> and <b>second</b>"
        );
    }

    #[test]
    fn test_inline_math_preserved() {
        assert_eq!(
            clean_latex_text(r"mass $m_\textbf{h}$ and \textbf{width}"),
            r"mass $m_\textbf{h}$ and <b>width</b>"
        );
    }

    #[test]
    fn test_display_math_preserved() {
        assert_eq!(
            clean_latex_text(r"$$\emph{x}^2$$ then \emph{y}"),
            r"$$\emph{x}^2$$ then <em>y</em>"
        );
    }

    #[test]
    fn test_markup_is_escaped() {
        let cleaned = clean_latex_text("<script>alert(1)</script> & more");
        assert!(!cleaned.contains("<script>"));
        assert!(cleaned.contains("&lt;script&gt;"));
        assert!(cleaned.contains("&amp; more"));
    }

    #[test]
    fn test_comparison_inside_math_is_escaped() {
        assert_eq!(clean_latex_text("$a < b$"), "$a &lt; b$");
    }

    #[test]
    fn test_unbalanced_dollar_left_as_text() {
        assert_eq!(clean_latex_text("costs $5"), "costs $5");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("  A study of\n  gauge  theories\n"),
            "A study of gauge theories"
        );
        assert_eq!(normalize_whitespace("\n\t "), "");
    }
}
