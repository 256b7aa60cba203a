//! Netscape bookmark export parser.
//!
//! The document goes through `scraper`'s HTML5 tree builder first, so tag
//! case, unquoted attributes, character references and implied end tags are
//! handled the way a browser handles them. The repaired DOM is then walked
//! once, depth-first: an `<H3>` heading announces a folder, the `<DL>` that
//! follows holds its contents, `<A>` elements become links of the folder
//! being filled, and a `<DD>` right after a link supplies its description.
//!
//! Malformed structure never aborts the walk. Problems found in the DOM and
//! close tags the tree builder dropped are described in `ParseOutcome::errors`.

use scraper::{ElementRef, Html};

use crate::services::sanitizer::{sanitize_text, sanitize_url};
use crate::types::bookmark::{FolderNode, LinkNode, ParseOutcome};

const UNTITLED_FOLDER: &str = "Untitled";

struct TreeWalker {
    /// `stack[0]` is the root; the last entry is the folder being filled.
    stack: Vec<FolderNode>,
    in_root_list: bool,
    /// Heading seen, its list not yet opened.
    pending_folder: Option<FolderNode>,
    /// The last item was a link, so a `<DD>` describes it.
    describable: bool,
    last_href: Option<String>,
    errors: Vec<String>,
}

impl TreeWalker {
    fn new() -> Self {
        Self {
            stack: vec![FolderNode::default()],
            in_root_list: false,
            pending_folder: None,
            describable: false,
            last_href: None,
            errors: Vec::new(),
        }
    }

    fn current(&mut self) -> &mut FolderNode {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn current_name(&self) -> &str {
        match self.stack.last() {
            Some(node) if self.stack.len() > 1 => &node.name,
            _ => "(root)",
        }
    }

    fn walk_children(&mut self, element: ElementRef<'_>) {
        for child in element.children().filter_map(ElementRef::wrap) {
            self.visit(child);
        }
    }

    fn visit(&mut self, element: ElementRef<'_>) {
        match element.value().name() {
            "head" | "title" | "h1" => {}
            "h3" => {
                self.flush_pending_folder();
                let mut name = sanitize_text(clean_text(element.text()).as_str());
                if name.is_empty() {
                    name = UNTITLED_FOLDER.to_string();
                }
                self.describable = false;
                self.pending_folder = Some(FolderNode::new(name, 0));
            }
            "a" => self.visit_anchor(element),
            "dd" => {
                if self.describable {
                    self.describe_last_link(element);
                }
                // A folder's `<DL>` lands inside the `<DD>` holding the folder description.
                self.walk_children(element);
            }
            "dl" => self.visit_list(element),
            _ => self.walk_children(element),
        }
    }

    fn visit_anchor(&mut self, element: ElementRef<'_>) {
        let href = element.value().attr("href");
        let mut raw = String::new();
        inline_text(element, &mut raw);
        let text = clean_text(std::iter::once(raw.as_str()));

        // Blank copies of an unclosed anchor, recreated by the tree builder.
        let reconstructed = text.is_empty() && href.is_some() && href == self.last_href.as_deref();
        if !reconstructed {
            self.last_href = href.map(str::to_string);
            self.push_link(href, &text);
        }
        // An unclosed anchor swallows the lists that follow it.
        self.walk_children(element);
    }

    fn push_link(&mut self, href: Option<&str>, text: &str) {
        self.flush_pending_folder();

        let title = sanitize_text(text);
        let url = sanitize_url(href);
        if url.is_empty() {
            let shown = if title.is_empty() { "(untitled)" } else { title.as_str() };
            self.errors.push(format!(
                "Bookmark \"{}\" has an invalid or unsupported URL",
                shown
            ));
        }

        let folder = self.current();
        let order = folder.links.len();
        folder.links.push(LinkNode {
            title,
            url,
            description: String::new(),
            order,
        });
        self.describable = true;
    }

    fn describe_last_link(&mut self, element: ElementRef<'_>) {
        self.describable = false;
        let own_text = element
            .children()
            .filter_map(|node| node.value().as_text().map(|text| &**text));
        let description = sanitize_text(clean_text(own_text).as_str());
        if description.is_empty() {
            return;
        }
        if let Some(link) = self.current().links.last_mut() {
            link.description = description;
        }
    }

    fn visit_list(&mut self, element: ElementRef<'_>) {
        self.describable = false;

        if let Some(folder) = self.pending_folder.take() {
            self.stack.push(folder);
            self.walk_children(element);
            self.flush_pending_folder();
            if let Some(folder) = self.stack.pop() {
                self.attach_child(folder);
            }
        } else if self.stack.len() == 1 && !self.in_root_list {
            self.in_root_list = true;
            self.walk_children(element);
            self.flush_pending_folder();
            self.in_root_list = false;
        } else {
            let message = format!(
                "List without a folder heading inside \"{}\"; its bookmarks stay in that folder",
                self.current_name()
            );
            self.errors.push(message);
            self.walk_children(element);
            self.flush_pending_folder();
        }

        self.describable = false;
    }

    /// Appends a finished folder to the folder currently open.
    fn attach_child(&mut self, mut folder: FolderNode) {
        let parent = self.current();
        folder.order = parent.children.len();
        parent.children.push(folder);
    }

    /// A heading that never got its list becomes an empty folder.
    fn flush_pending_folder(&mut self) {
        if let Some(folder) = self.pending_folder.take() {
            self.errors.push(format!(
                "Folder \"{}\" has no bookmark list",
                folder.name
            ));
            self.attach_child(folder);
        }
    }

    fn finish(mut self) -> ParseOutcome {
        self.flush_pending_folder();
        while self.stack.len() > 1 {
            if let Some(folder) = self.stack.pop() {
                self.attach_child(folder);
            }
        }
        ParseOutcome {
            tree: self.stack.pop().unwrap_or_default(),
            errors: self.errors,
        }
    }
}

/// Joins text runs, drops control characters and collapses whitespace.
fn clean_text<'a>(runs: impl Iterator<Item = &'a str>) -> String {
    let joined: String = runs
        .flat_map(str::chars)
        .filter(|c| c.is_whitespace() || !c.is_control())
        .collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of an element, leaving out nested folder structure.
fn inline_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(inner) = ElementRef::wrap(child) {
            if !matches!(inner.value().name(), "dl" | "dt" | "dd" | "h3") {
                inline_text(inner, out);
            }
        }
    }
}

/// Open/close balance of the structural tags in the raw source.
///
/// The HTML5 tree builder silently drops close tags with no open element
/// and closes everything at end of input, so both are counted here.
fn structure_warnings(html: &str) -> Vec<String> {
    const TRACKED: [(&str, &str); 3] = [("dl", "DL"), ("a", "A"), ("h3", "H3")];

    let mut open = [0usize; 3];
    let mut warnings = Vec::new();
    let lower = html.to_ascii_lowercase();
    let mut rest = lower.as_str();

    while let Some(at) = rest.find('<') {
        rest = &rest[at + 1..];
        if let Some(comment) = rest.strip_prefix("!--") {
            rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
            continue;
        }
        let (closing, tag) = match rest.strip_prefix('/') {
            Some(tag) => (true, tag),
            None => (false, rest),
        };
        let name_len = tag
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(tag.len());
        let Some(index) = TRACKED.iter().position(|(name, _)| *name == &tag[..name_len]) else {
            continue;
        };

        if !closing {
            open[index] += 1;
        } else if open[index] > 0 {
            open[index] -= 1;
        } else {
            warnings.push(format!("Unmatched </{}> ignored", TRACKED[index].1));
        }
    }

    if open[0] > 0 {
        warnings.push(format!(
            "{} bookmark list(s) not closed at end of document",
            open[0]
        ));
    }
    warnings
}

/// Parses a Netscape bookmark export into a folder tree.
///
/// An empty document yields an empty root and no errors.
pub fn parse_bookmark_html(html: &str) -> ParseOutcome {
    if html.trim().is_empty() {
        return ParseOutcome::default();
    }

    let document = Html::parse_document(html);
    let mut walker = TreeWalker::new();
    walker.walk_children(document.root_element());

    let mut outcome = walker.finish();
    outcome.errors.extend(structure_warnings(html));
    outcome
}
