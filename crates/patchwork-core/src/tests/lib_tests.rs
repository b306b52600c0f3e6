use super::*;
use crate::{h, props};
use std::cell::Cell;
use std::rc::Rc;

fn counter_view(count: i64, clicks: &Rc<Cell<u32>>) -> VNode {
    let clicks = clicks.clone();
    h!(
        "div",
        props! { "className" => "counter" },
        h!("span", None, count),
        h!(
            "button",
            props! {
                "disabled" => count >= 3,
                "onClick" => on(move |_| clicks.set(clicks.get() + 1)),
            },
            "+1"
        ),
    )
}

#[test]
fn root_commits_and_reuses_live_nodes() {
    let mut host = MemoryHost::new();
    let container = host.create_element("main").unwrap();
    let mut root = Root::new(host, container);
    let clicks = Rc::new(Cell::new(0));

    root.render(counter_view(1, &clicks)).unwrap();
    let live = root.live_root().unwrap().expect("mounted");
    assert_eq!(
        root.host().to_html(container),
        "<main><div class=\"counter\"><span>1</span><button>+1</button></div></main>"
    );

    root.render(counter_view(3, &clicks)).unwrap();
    assert_eq!(root.live_root().unwrap(), Some(live));
    assert_eq!(
        root.host().to_html(container),
        "<main><div class=\"counter\"><span>3</span><button disabled>+1</button></div></main>"
    );
    assert_eq!(
        root.committed().and_then(VNode::kind),
        Some("div")
    );
}

#[test]
fn rerendered_handler_replaces_old_binding() {
    let mut host = MemoryHost::new();
    let container = host.create_element("main").unwrap();
    let mut root = Root::new(host, container);
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));

    root.render(counter_view(0, &first)).unwrap();
    root.render(counter_view(0, &second)).unwrap();

    let button = root
        .host()
        .children(root.live_root().unwrap().unwrap())[1];
    assert_eq!(root.host().listener_count(button, "click"), 1);
    root.host().dispatch(&Event::new("click", button)).unwrap();
    assert_eq!((first.get(), second.get()), (0, 1));
}

#[test]
fn unmount_clears_container() {
    let mut host = MemoryHost::new();
    let container = host.create_element("main").unwrap();
    let mut root = Root::new(host, container);
    root.render(h!("p", None, "bye")).unwrap();

    root.unmount().unwrap();
    root.unmount().unwrap();

    assert!(root.committed().is_none());
    assert_eq!(root.live_root().unwrap(), None);
    assert_eq!(root.into_host().len(), 1);
}

#[test]
fn failed_render_keeps_previous_baseline() {
    let mut host = MemoryHost::new();
    let container = host.create_element("main").unwrap();
    let mut root = Root::new(host, container);
    root.render(h!("p", None, "ok")).unwrap();

    let err = root.render(h!("bad kind", None)).unwrap_err();

    assert!(matches!(err, HostError::InvalidKind { .. }));
    assert_eq!(root.committed(), Some(&h!("p", None, "ok")));
}

#[test]
fn host_errors_display() {
    assert_eq!(HostError::Missing { id: 4 }.to_string(), "node 4 missing");
    assert_eq!(
        HostError::MissingChild {
            parent: 1,
            index: 2
        }
        .to_string(),
        "node 1 has no child at index 2"
    );
    assert_eq!(
        HostError::InvalidKind { kind: "x y".into() }.to_string(),
        "invalid element kind `x y`"
    );
}
