use super::*;
use crate::memory::MemoryHost;
use crate::{h, props, text};

fn mounted(tree: &VNode) -> (MemoryHost, NodeId) {
    let mut host = MemoryHost::new();
    let container = host.create_element("div").unwrap();
    reconcile(&mut host, container, Some(tree), None, 0).unwrap();
    (host, container)
}

fn list(items: &[&str]) -> VNode {
    let children: Vec<VNode> = items.iter().map(|item| h!("li", None, *item)).collect();
    h!("ul", None, children)
}

#[test]
fn insertion_materializes_whole_subtree() {
    let tree = h!("p", props! { "id" => "intro" }, "hello ", h!("b", None, "world"));
    let (host, container) = mounted(&tree);
    assert_eq!(
        host.to_html(container),
        "<div><p id=\"intro\">hello <b>world</b></p></div>"
    );
}

#[test]
fn same_kind_updates_in_place() {
    let old = h!("p", props! { "className" => "a" }, "one");
    let new = h!("p", props! { "className" => "b" }, "one");
    let (mut host, container) = mounted(&old);
    let live = host.child_at(container, 0).unwrap();

    reconcile(&mut host, container, Some(&new), Some(&old), 0).unwrap();

    assert_eq!(host.child_at(container, 0).unwrap(), live);
    assert_eq!(host.attribute(live, "class"), Some("b"));
}

#[test]
fn kind_change_replaces_node() {
    let old = h!("div", None, "a");
    let new = h!("span", None, "a");
    let (mut host, container) = mounted(&old);
    let live = host.child_at(container, 0).unwrap();

    reconcile(&mut host, container, Some(&new), Some(&old), 0).unwrap();

    let replaced = host.child_at(container, 0).unwrap();
    assert_ne!(replaced, live);
    assert!(!host.contains(live));
    assert_eq!(host.tag(replaced), Some("span"));
    assert_eq!(host.text_content(replaced), "a");
}

#[test]
fn text_change_replaces_and_equal_text_is_kept() {
    let old = h!("p", None, "same", "before");
    let new = h!("p", None, "same", "after");
    let (mut host, container) = mounted(&old);
    let p = host.child_at(container, 0).unwrap();
    let same = host.child_at(p, 0).unwrap();
    let before = host.child_at(p, 1).unwrap();

    reconcile(&mut host, container, Some(&new), Some(&old), 0).unwrap();

    assert_eq!(host.child_at(p, 0).unwrap(), same);
    assert_ne!(host.child_at(p, 1).unwrap(), before);
    assert_eq!(host.text_content(p), "sameafter");
}

#[test]
fn text_to_element_replaces() {
    let old = h!("p", None, "plain");
    let new = h!("p", None, h!("em", None, "plain"));
    let (mut host, container) = mounted(&old);

    reconcile(&mut host, container, Some(&new), Some(&old), 0).unwrap();

    assert_eq!(host.to_html(container), "<div><p><em>plain</em></p></div>");
}

#[test]
fn growing_list_appends_and_shrinking_removes_tail() {
    let two = list(&["a", "b"]);
    let four = list(&["a", "b", "c", "d"]);
    let (mut host, container) = mounted(&two);
    let ul = host.child_at(container, 0).unwrap();

    reconcile(&mut host, container, Some(&four), Some(&two), 0).unwrap();
    assert_eq!(host.text_content(ul), "abcd");
    assert_eq!(host.child_count(ul).unwrap(), 4);

    reconcile(&mut host, container, Some(&two), Some(&four), 0).unwrap();
    assert_eq!(host.text_content(ul), "ab");
    assert_eq!(host.child_count(ul).unwrap(), 2);
}

#[test]
fn reordering_patches_positionally() {
    let old = list(&["x", "y"]);
    let new = list(&["y", "x"]);
    let (mut host, container) = mounted(&old);
    let ul = host.child_at(container, 0).unwrap();
    let first_li = host.child_at(ul, 0).unwrap();

    reconcile(&mut host, container, Some(&new), Some(&old), 0).unwrap();

    assert_eq!(host.child_at(ul, 0).unwrap(), first_li);
    assert_eq!(host.text_content(ul), "yx");
}

#[test]
fn removal_at_top_level() {
    let tree = h!("section", None);
    let (mut host, container) = mounted(&tree);
    reconcile(&mut host, container, None, Some(&tree), 0).unwrap();
    assert_eq!(host.child_count(container).unwrap(), 0);
    assert_eq!(host.len(), 1);
}

#[test]
fn removal_without_live_child_is_an_error() {
    let mut host = MemoryHost::new();
    let container = host.create_element("div").unwrap();
    let err = reconcile(&mut host, container, None, Some(&text("gone")), 0).unwrap_err();
    assert_eq!(
        err,
        HostError::MissingChild {
            parent: container,
            index: 0
        }
    );
}

#[test]
fn positional_insert_lands_at_index() {
    let mut host = MemoryHost::new();
    let container = host.create_element("div").unwrap();
    for label in ["first", "last"] {
        let node = host.create_text(label).unwrap();
        host.append_child(container, node).unwrap();
    }

    reconcile(&mut host, container, Some(&text("middle")), None, 1).unwrap();

    assert_eq!(host.text_content(container), "firstmiddlelast");
}

#[test]
fn append_mode_ignores_index() {
    let mut host = MemoryHost::new();
    let container = host.create_element("div").unwrap();
    for label in ["first", "last"] {
        let node = host.create_text(label).unwrap();
        host.append_child(container, node).unwrap();
    }
    let options = PatchOptions::new().insertion(InsertionMode::Append);

    reconcile_with(&mut host, container, Some(&text("tail")), None, 1, &options).unwrap();

    assert_eq!(host.text_content(container), "firstlasttail");
}

#[test]
fn unsupported_kind_surfaces_host_error() {
    let mut host = MemoryHost::new();
    let container = host.create_element("div").unwrap();
    let err = reconcile(&mut host, container, Some(&h!("no such", None)), None, 0).unwrap_err();
    assert_eq!(
        err,
        HostError::InvalidKind {
            kind: "no such".into()
        }
    );
}

#[test]
fn tree_path_formats_segments() {
    let mut path = TreePath::default();
    assert_eq!(path.to_string(), "root");
    path.push("div", 0);
    path.push("span", 2);
    assert_eq!(path.to_string(), "root -> div[0] -> span[2]");
    path.pop();
    assert_eq!(path.to_string(), "root -> div[0]");
}
