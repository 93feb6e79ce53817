use dom_query::{Document, Selection};

/// Elements that carry no readable content, plus ad/comment containers and
/// stylesheet links.
const NOISE_SELECTOR: &str =
    "script, style, nav, aside, noscript, iframe, svg, canvas, .ads, .comments, link[rel=\"stylesheet\"]";

/// Elements injected by residential-proxy services.
const PROXY_INJECTION_SELECTOR: &str = "[id^=\"brightdata-\"], [class^=\"brightdata-\"]";

/// Reduce raw page markup to a de-noised tree and serialize it back.
///
/// Deterministic and idempotent: running the pass over already-cleaned
/// markup yields the same output.
pub fn clean_html(html: &str) -> String {
    let doc = Document::from(html);

    doc.select(NOISE_SELECTOR).remove();
    doc.select(PROXY_INJECTION_SELECTOR).remove();
    remove_comments(&doc);
    prune_empty_nodes(&doc);
    merge_adjacent_paragraphs(&doc);

    doc.html().to_string()
}

/// Strip HTML comment nodes from the whole tree.
fn remove_comments(doc: &Document) {
    let comments: Vec<_> = doc
        .root()
        .descendants_it()
        .filter(|node| node.is_comment())
        .collect();

    for comment in comments {
        comment.remove_from_parent();
    }
}

/// Drop paragraph/div/span elements with no text and no element children.
///
/// Matches are processed in reverse document order so that a wrapper whose
/// only child was just pruned is itself pruned in the same pass.
fn prune_empty_nodes(doc: &Document) {
    let candidates: Vec<Selection> = doc.select("p, div, span").iter().collect();

    for candidate in candidates.iter().rev() {
        if candidate.text().trim().is_empty() && candidate.children().is_empty() {
            candidate.remove();
        }
    }
}

/// Fold each paragraph that immediately follows another paragraph into its
/// predecessor, joining the text with a single space.
fn merge_adjacent_paragraphs(doc: &Document) {
    let followers: Vec<Selection> = doc.select("p + p").iter().collect();

    for follower in followers {
        let Some(predecessor) = previous_element_sibling(&follower) else {
            continue;
        };
        let merged = format!(" {}", follower.text().trim());
        predecessor.append_html(merged.as_str());
        follower.remove();
    }
}

/// Previous sibling element, skipping text and comment nodes.
fn previous_element_sibling<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes().first().and_then(|node| {
        let mut sibling = node.prev_sibling();
        while let Some(candidate) = sibling {
            if candidate.is_element() {
                return Some(Selection::from(candidate));
            }
            sibling = candidate.prev_sibling();
        }
        None
    })
}
