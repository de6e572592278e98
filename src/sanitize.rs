//! Strips markdown the chat surface cannot render from backend replies.
//!
//! This is not a markdown parser. Rules run in a fixed order and the whole
//! pass repeats until the text is stable, so malformed input settles into a
//! single canonical form.

use std::sync::OnceLock;

use regex::Regex;

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid sanitizer pattern"),
            replacement,
        }
    }
}

fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            // emphasis
            Rule::new(r"\*\*(.+?)\*\*", "${1}"),
            Rule::new(r"__(.+?)__", "${1}"),
            Rule::new(r"\*(.+?)\*", "${1}"),
            Rule::new(r"_(.+?)_", "${1}"),
            // headings; `\s` also eats the newlines after a bare marker
            Rule::new(r"(?m)^#{1,6}\s+", ""),
            // fenced blocks before inline spans, language tag dropped
            Rule::new(r"(?s)```[A-Za-z0-9_+\-]*\n?(.*?)```", "${1}"),
            Rule::new(r"`(.+?)`", "${1}"),
            // links
            Rule::new(r"\[(.+?)\]\(.+?\)", "${1}"),
            // horizontal rules
            Rule::new(r"(?m)^[-*_]{3,}$", ""),
            // bullets, swallowing blank lines in front of the item
            Rule::new(r"(?m)^\s*[-*+]\s+", "• "),
            Rule::new(r"\n{3,}", "\n\n"),
        ]
    })
}

fn sanitize_pass(text: &str) -> String {
    let mut current = text.to_owned();
    for rule in rules() {
        if let std::borrow::Cow::Owned(replaced) =
            rule.pattern.replace_all(&current, rule.replacement)
        {
            current = replaced;
        }
    }
    current.trim().to_owned()
}

pub fn sanitize(text: &str) -> String {
    // Every rule only removes marker characters or swaps one for the bullet
    // glyph, so this reaches a fixed point.
    let mut current = sanitize_pass(text);
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize;

    #[test]
    fn strips_bold_and_keeps_colon() {
        assert_eq!(sanitize("**Причина:** свечи"), "Причина: свечи");
    }

    #[test]
    fn strips_emphasis_variants() {
        assert_eq!(sanitize("__a__ *b* _c_ **d**"), "a b c d");
    }

    #[test]
    fn strips_heading_markers() {
        assert_eq!(
            sanitize("## Вероятные причины\n###### мелко"),
            "Вероятные причины\nмелко"
        );
        assert_eq!(sanitize("#хэштег"), "#хэштег");
    }

    #[test]
    fn keeps_code_content() {
        assert_eq!(sanitize("проверь `P0420`"), "проверь P0420");
        assert_eq!(
            sanitize("```text\nшаг 1\nшаг 2\n```"),
            "шаг 1\nшаг 2"
        );
    }

    #[test]
    fn heading_inside_fence_loses_marker_once() {
        assert_eq!(sanitize("```\n# заголовок\n```"), "заголовок");
    }

    #[test]
    fn converts_links_to_labels() {
        assert_eq!(
            sanitize("см. [каталог](https://example.com/parts)"),
            "см. каталог"
        );
    }

    #[test]
    fn removes_horizontal_rules_and_collapses_blank_lines() {
        assert_eq!(sanitize("верх\n---\n\n\n\nниз"), "верх\n\nниз");
        assert_eq!(sanitize("a\n-----\nb"), "a\n\nb");
    }

    #[test]
    fn normalizes_bullets() {
        assert_eq!(
            sanitize("- свечи\n  * катушки\n+ форсунки"),
            "• свечи\n• катушки\n• форсунки"
        );
    }

    #[test]
    fn blank_line_before_list_is_dropped() {
        assert_eq!(sanitize("Причины:\n\n- свечи"), "Причины:\n• свечи");
        assert_eq!(
            sanitize("Причины:\n\n- свечи\n- катушки"),
            "Причины:\n• свечи\n• катушки"
        );
        assert_eq!(
            sanitize("## Причины\n\n* свечи"),
            "Причины\n• свечи"
        );
    }

    #[test]
    fn trims_outer_whitespace() {
        assert_eq!(sanitize("  \n\nответ\n\n  "), "ответ");
    }

    #[test]
    fn plain_text_is_untouched() {
        let text = "Проверьте уровень масла.\n\nЗамените фильтр.";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn sanitize_is_idempotent() {
        let samples = [
            "**Причина:** свечи",
            "***a***",
            "****",
            "* a * b *",
            "_a_b_ __c",
            "- - -\n- * +",
            "# - **x**\n\n\n\n```\n- y\n```",
            "[a](b) [c]( d) [[e](f)](g)",
            "``` `` ` ```",
            "*_*_x_*_*",
            "\n\n - \n\n\n * \n",
            "line_with_snake_case_name and *star",
            "---\n___\n***\n-----",
        ];
        for sample in samples {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "sample {sample:?}");
        }
    }
}
