/// Leading marker of a list item in lesson text.
pub const BULLET: char = '•';

const HEADING_MARKER: &str = "**";

/// Rendered structure of one lesson paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// Plain paragraph, line breaks preserved.
    Prose(String),
    /// Bulleted list. `lead` holds the paragraph's non-bullet lines, shown before the list.
    List { lead: Vec<String>, items: Vec<String> },
    /// Paragraph wrapped in `**` on both ends.
    Heading(String),
}

/// Splits lesson text into paragraphs on blank lines and classifies each one.
///
/// A paragraph with at least one line starting with [`BULLET`] is a list; otherwise a
/// paragraph that starts and ends with `**` is a heading; anything else is prose.
#[must_use]
pub fn parse_content(text: &str) -> Vec<ContentBlock> {
    let normalized = text.replace("\r\n", "\n");
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in normalized.split('\n') {
        if line.trim().is_empty() {
            if !paragraph.is_empty() {
                blocks.push(classify(&paragraph));
                paragraph.clear();
            }
        } else {
            paragraph.push(line);
        }
    }
    if !paragraph.is_empty() {
        blocks.push(classify(&paragraph));
    }

    blocks
}

fn classify(lines: &[&str]) -> ContentBlock {
    if lines.iter().any(|line| is_bullet(line)) {
        let mut lead = Vec::new();
        let mut items = Vec::new();
        for line in lines {
            let trimmed = line.trim();
            match trimmed.strip_prefix(BULLET) {
                Some(item) => items.push(item.trim().to_owned()),
                None => lead.push(trimmed.to_owned()),
            }
        }
        return ContentBlock::List { lead, items };
    }

    let text = lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n");
    if is_heading(&text) {
        return ContentBlock::Heading(text.replace(HEADING_MARKER, "").trim().to_owned());
    }
    ContentBlock::Prose(text)
}

fn is_bullet(line: &str) -> bool {
    line.trim_start().starts_with(BULLET)
}

fn is_heading(text: &str) -> bool {
    text.len() >= 2 * HEADING_MARKER.len()
        && text.starts_with(HEADING_MARKER)
        && text.ends_with(HEADING_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_paragraphs_on_blank_lines() {
        let blocks = parse_content("First line.\n\nSecond para\ncontinues.\n\n\n");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Prose("First line.".into()),
                ContentBlock::Prose("Second para\ncontinues.".into()),
            ]
        );
    }

    #[test]
    fn bullet_paragraph_becomes_list_with_lead() {
        let blocks = parse_content("Electrical Problems:\n• Old wiring\n  • Overloaded panels  ");
        assert_eq!(
            blocks,
            vec![ContentBlock::List {
                lead: vec!["Electrical Problems:".into()],
                items: vec!["Old wiring".into(), "Overloaded panels".into()],
            }]
        );
    }

    #[test]
    fn bold_wrapped_paragraph_becomes_heading() {
        let blocks = parse_content("**Next Steps**\n\nBody");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Heading("Next Steps".into()),
                ContentBlock::Prose("Body".into()),
            ]
        );
    }

    #[test]
    fn bullet_wins_over_heading_markers() {
        let blocks = parse_content("**Tips**\n• one**");
        assert!(matches!(blocks[0], ContentBlock::List { .. }));
    }

    #[test]
    fn bullet_in_middle_of_line_is_prose() {
        let blocks = parse_content("Rooms • bedrooms");
        assert_eq!(blocks, vec![ContentBlock::Prose("Rooms • bedrooms".into())]);
    }

    #[test]
    fn lone_marker_pair_is_not_a_heading() {
        assert_eq!(parse_content("**"), vec![ContentBlock::Prose("**".into())]);
    }

    #[test]
    fn windows_line_endings_are_normalized() {
        let blocks = parse_content("One\r\n\r\nTwo");
        assert_eq!(blocks.len(), 2);
    }
}
