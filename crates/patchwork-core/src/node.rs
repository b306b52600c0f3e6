//! Virtual node tree and the hyperscript-style builder.
//!
//! A [`VNode`] is either an element (kind, props, children) or a plain text
//! span. Trees are built fresh for every render and never mutated afterwards;
//! the reconciler only reads them.

use crate::props::{float_text, widen_f32, Props};

/// One node of a virtual tree.
#[derive(Clone, Debug, PartialEq)]
pub enum VNode {
    Element(Element),
    Text(String),
}

impl VNode {
    pub fn is_text(&self) -> bool {
        matches!(self, VNode::Text(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            VNode::Text(text) => Some(text),
            VNode::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            VNode::Element(element) => Some(element),
            VNode::Text(_) => None,
        }
    }

    /// Element kind, or `None` for text.
    pub fn kind(&self) -> Option<&str> {
        self.as_element().map(Element::kind)
    }
}

impl From<Element> for VNode {
    fn from(element: Element) -> Self {
        VNode::Element(element)
    }
}

impl From<&str> for VNode {
    fn from(text: &str) -> Self {
        VNode::Text(text.to_owned())
    }
}

impl From<String> for VNode {
    fn from(text: String) -> Self {
        VNode::Text(text)
    }
}

/// Element payload of a [`VNode`].
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    kind: String,
    props: Props,
    children: Vec<VNode>,
}

impl Element {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn children(&self) -> &[VNode] {
        &self.children
    }
}

/// A single argument in a builder's child list.
///
/// `Many` is spliced into the parent's children, which is what lets callers
/// pass a computed list inline next to literal children. Splicing happens one
/// level deep only.
#[derive(Clone, Debug, PartialEq)]
pub enum Child {
    Node(VNode),
    Many(Vec<VNode>),
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Child::Node(node)
    }
}

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Child::Node(VNode::Element(element))
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Node(VNode::Text(text.to_owned()))
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Node(VNode::Text(text))
    }
}

impl From<&String> for Child {
    fn from(text: &String) -> Self {
        Child::Node(VNode::Text(text.clone()))
    }
}

impl From<Vec<VNode>> for Child {
    fn from(nodes: Vec<VNode>) -> Self {
        Child::Many(nodes)
    }
}

impl FromIterator<VNode> for Child {
    fn from_iter<I: IntoIterator<Item = VNode>>(iter: I) -> Self {
        Child::Many(iter.into_iter().collect())
    }
}

macro_rules! numeric_child {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Child {
                fn from(value: $ty) -> Self {
                    Child::Node(VNode::Text(value.to_string()))
                }
            }
        )*
    };
}

numeric_child!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Child {
    fn from(value: f64) -> Self {
        Child::Node(VNode::Text(float_text(value)))
    }
}

impl From<f32> for Child {
    fn from(value: f32) -> Self {
        Child::from(widen_f32(value))
    }
}

/// Builds an element node.
///
/// `props` may be `None`, which is the same as an empty map. The kind is not
/// validated here; an unusable kind fails when the node is materialized.
pub fn h<K, P, I>(kind: K, props: P, children: I) -> VNode
where
    K: Into<String>,
    P: Into<Option<Props>>,
    I: IntoIterator,
    I::Item: Into<Child>,
{
    let mut flat = Vec::new();
    for child in children {
        match child.into() {
            Child::Node(node) => flat.push(node),
            Child::Many(nodes) => flat.extend(nodes),
        }
    }
    VNode::Element(Element {
        kind: kind.into(),
        props: props.into().unwrap_or_default(),
        children: flat,
    })
}

/// Builds a text node.
pub fn text(value: impl Into<String>) -> VNode {
    VNode::Text(value.into())
}

/// Variadic form of [`h`]: `h!("ul", None, "first", items, 3)`.
#[macro_export]
macro_rules! h {
    ($kind:expr $(,)?) => {
        $crate::node::h($kind, None, ::std::vec::Vec::<$crate::node::Child>::new())
    };
    ($kind:expr, $props:expr $(, $child:expr)* $(,)?) => {{
        let children: ::std::vec::Vec<$crate::node::Child> =
            ::std::vec![$($crate::node::Child::from($child)),*];
        $crate::node::h($kind, $props, children)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props;

    #[test]
    fn null_props_default_to_empty() {
        let node = h("div", None, Vec::<Child>::new());
        let element = node.as_element().expect("element");
        assert_eq!(element.kind(), "div");
        assert!(element.props().is_empty());
        assert!(element.children().is_empty());
    }

    #[test]
    fn nested_lists_flatten_one_level() {
        let items: Vec<VNode> = (0..3).map(|i| h!("li", None, i)).collect();
        let node = h!("ul", None, "head", items, "tail");
        let children = node.as_element().unwrap().children();
        assert_eq!(children.len(), 5);
        assert_eq!(children[0], text("head"));
        assert_eq!(children[1].kind(), Some("li"));
        assert_eq!(children[3].kind(), Some("li"));
        assert_eq!(children[4], text("tail"));
    }

    #[test]
    fn numbers_become_text() {
        let numeric = h!("span", None, 5);
        let literal = h!("span", None, "5");
        assert_eq!(numeric, literal);
        let float = h!("span", None, 2.5);
        assert_eq!(float.as_element().unwrap().children()[0], text("2.5"));
    }

    #[test]
    fn float_text_follows_script_number_formatting() {
        let children = h!("p", None, f64::INFINITY, 1e21, 0.1f32, 3.0, -0.0)
            .as_element()
            .unwrap()
            .children()
            .to_vec();
        assert_eq!(
            children,
            vec![text("Infinity"), text("1e+21"), text("0.1"), text("3"), text("0")]
        );
    }

    #[test]
    fn kind_is_not_validated_by_builder() {
        let node = h!("not a tag", props! { "id" => "x" });
        assert_eq!(node.kind(), Some("not a tag"));
    }

    #[test]
    fn text_nodes_have_no_element_payload() {
        let node = text("plain");
        assert!(node.is_text());
        assert!(node.as_element().is_none());
        assert_eq!(node.kind(), None);
    }
}
