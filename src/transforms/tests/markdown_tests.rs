use crate::transforms::{markdown, sanitize};

#[test]
fn test_atx_headings() {
    let md = markdown::convert("<h1>Title</h1><h2>Section</h2><p>Body.</p>").unwrap();

    assert!(md.contains("# Title"));
    assert!(md.contains("## Section"));
    assert!(md.contains("Body."));
}

#[test]
fn test_links_and_emphasis() {
    let md = markdown::convert(
        "<p>See <a href=\"https://example.com\">the docs</a> for <strong>details</strong>.</p>",
    )
    .unwrap();

    assert!(md.contains("[the docs](https://example.com)"));
    assert!(md.contains("**details**"));
}

#[test]
fn test_sanitized_markup_converts_without_noise() {
    let cleaned = sanitize::clean_html(
        "<script>alert(1)</script><h1>News</h1><nav>menu</nav><p>First.</p><p>Second.</p>",
    );
    let md = markdown::convert(&cleaned).unwrap();

    assert!(md.contains("# News"));
    assert!(md.contains("First. Second."));
    assert!(!md.contains("alert"));
    assert!(!md.contains("menu"));
}

#[test]
fn test_empty_input_yields_empty_markdown() {
    let md = markdown::convert("").unwrap();

    assert!(md.trim().is_empty());
}
