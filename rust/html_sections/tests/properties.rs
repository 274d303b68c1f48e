use html_sections::{
    extract_section_list, extract_sections, parse_blocks, BlockKind, SectionError,
};
use pretty_assertions::assert_eq;

const REPORT: &str = r#"
<p>Prepared for the board.</p>
<h1>Intro</h1>
<p>Why we are here.</p>
<h2>1 Scope</h2>
<p>2.3 Results</p>
<table border="1"><tr><td>Total</td></tr></table>
<p>Results 2.3 were fine.</p>
<h1>Intro</h1>
<p>More intro.</p>
<img src="data:image/png;base64,AAAA">
"#;

#[test]
fn extraction_is_deterministic() {
    let a = extract_sections(REPORT).unwrap();
    let b = extract_sections(REPORT).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
    assert_eq!(
        extract_section_list(REPORT).unwrap(),
        extract_section_list(REPORT).unwrap()
    );
}

#[test]
fn list_content_preserves_non_heading_order() {
    let blocks = parse_blocks(REPORT).unwrap();
    let expected: String = blocks
        .iter()
        .filter(|b| html_sections::classify(b).is_none())
        .map(|b| b.rendered.as_str())
        .collect();
    let joined: String = extract_section_list(REPORT)
        .unwrap()
        .iter()
        .map(|s| s.content.as_str())
        .collect();
    assert_eq!(joined, expected);
}

#[test]
fn repeated_titles_merge_in_map_form() {
    let map = extract_sections(REPORT).unwrap();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["General", "Intro", "1 Scope", "2.3 Results"]);
    assert_eq!(map["Intro"], "<p>Why we are here.</p><p>More intro.</p><img src=\"data:image/png;base64,AAAA\"/>");
    assert_eq!(map["1 Scope"], "");
}

#[test]
fn numbered_paragraphs_become_sections() {
    let list = extract_section_list(REPORT).unwrap();
    let shape: Vec<(&str, u32)> = list.iter().map(|s| (s.title.as_str(), s.level)).collect();
    assert_eq!(
        shape,
        vec![
            ("General", 0),
            ("Intro", 1),
            ("1 Scope", 2),
            ("2.3 Results", 2),
            ("Intro", 1),
        ]
    );
    assert!(list[3].content.contains("Results 2.3 were fine."));
    assert!(list[3].content.starts_with("<table border=\"1\">"));
}

#[test]
fn blank_heading_is_untitled() {
    let list = extract_section_list("<h1>  \n </h1><p>x</p>").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].title, "Untitled Section");
    assert_eq!(list[0].level, 1);

    let map = extract_sections("<h1></h1><p>x</p>").unwrap();
    assert_eq!(map["Untitled Section"], "<p>x</p>");
}

#[test]
fn leading_content_forms_general_section() {
    let list = extract_section_list("<p>intro</p><h1>Scope</h1>").unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(
        (list[0].title.as_str(), list[0].level, list[0].content.as_str()),
        ("General", 0, "<p>intro</p>")
    );
    assert_eq!(
        (list[1].title.as_str(), list[1].level, list[1].content.as_str()),
        ("Scope", 1, "")
    );
}

#[test]
fn empty_input_yields_nothing() {
    assert!(extract_sections("").unwrap().is_empty());
    assert!(extract_section_list("").unwrap().is_empty());
    assert!(extract_sections("<div>ignored</div>").unwrap().is_empty());
}

#[test]
fn malformed_markup_does_not_fail() {
    let blocks = parse_blocks("<p>Unclosed paragraph<table>").unwrap();
    assert_eq!(blocks[0].kind, BlockKind::Paragraph);

    let list = extract_section_list("<h2>Open<p>body <b>bold</p><img src=x").unwrap();
    assert!(!list.is_empty());

    let res: Result<_, SectionError> = extract_sections("<<<>>><p>></p></table></h1>");
    assert!(res.is_ok());
}

#[test]
fn section_content_is_the_converter_markup() {
    let map = extract_sections("<h1>A</h1><table border='1'><tr><td>x</td></tr></table>").unwrap();
    assert_eq!(map["A"], "<table border=\"1\"><tr><td>x</td></tr></table>");
}
