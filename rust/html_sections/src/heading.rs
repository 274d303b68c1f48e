use crate::blocks::Block;
use lazy_static::lazy_static;
use regex::Regex;

pub const UNTITLED_SECTION: &str = "Untitled Section";

lazy_static! {
    // "1", "2.3", "4.5.1 Summary"; anchored, so "Section 1" never matches.
    static ref NUMBERED_HEADING: Regex = Regex::new(r"^\d+(\.\d+)*").unwrap();
}

/// A block that opens a new section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Boundary {
    pub title: String,
    pub level: u32,
}

pub fn is_numbered_heading(text: &str) -> bool {
    NUMBERED_HEADING.is_match(text)
}

/// Shared boundary rule for both section shapes. Heading tags win over the
/// numeric prefix when computing the level; numeric boundaries take the dot
/// count of the whole title plus one.
pub fn classify(block: &Block) -> Option<Boundary> {
    let level = match block.kind.heading_level() {
        Some(level) => level,
        None if is_numbered_heading(&block.text) => numbered_level(&block.text),
        None => return None,
    };
    let title = if block.text.is_empty() {
        UNTITLED_SECTION.to_string()
    } else {
        block.text.clone()
    };
    Some(Boundary { title, level })
}

fn numbered_level(text: &str) -> u32 {
    text.matches('.').count() as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockKind;
    use rstest::rstest;

    fn para(text: &str) -> Block {
        Block::new(BlockKind::Paragraph, text, format!("<p>{text}</p>"))
    }

    #[rstest]
    #[case("1", true)]
    #[case("2.3", true)]
    #[case("4.5.1 Summary", true)]
    #[case("2.3 Results", true)]
    #[case("10Intro", true)]
    #[case("Results 2.3", false)]
    #[case("Section 1", false)]
    #[case(".5 Half", false)]
    #[case("", false)]
    fn numbered_prefix(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_numbered_heading(text), expected);
    }

    #[rstest]
    #[case("1 Scope", 1)]
    #[case("2.3 Results", 2)]
    #[case("4.5.1 Summary", 3)]
    #[case("3 See fig. 2.", 3)]
    fn numbered_paragraph_level(#[case] text: &str, #[case] level: u32) {
        let b = classify(&para(text)).unwrap();
        assert_eq!(b.level, level);
        assert_eq!(b.title, text);
    }

    #[test]
    fn plain_paragraph_is_not_a_boundary() {
        assert_eq!(classify(&para("Results 2.3")), None);
    }

    #[test]
    fn heading_tag_wins_over_numeric_level() {
        let block = Block::new(BlockKind::Heading2, "1.2.3 Deep", "<h2>1.2.3 Deep</h2>");
        let b = classify(&block).unwrap();
        assert_eq!(b.level, 2);
    }

    #[test]
    fn empty_heading_is_untitled() {
        let block = Block::new(BlockKind::Heading1, "", "<h1>   </h1>");
        let b = classify(&block).unwrap();
        assert_eq!(b.title, UNTITLED_SECTION);
        assert_eq!(b.level, 1);
    }

    #[test]
    fn images_and_tables_without_numbers_are_content() {
        assert_eq!(classify(&Block::new(BlockKind::Image, "", "<img/>")), None);
        let table = Block::new(BlockKind::Table, "a b", "<table></table>");
        assert_eq!(classify(&table), None);
    }
}
