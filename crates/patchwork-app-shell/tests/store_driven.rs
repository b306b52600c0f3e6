use patchwork_app_shell::AppShell;
use patchwork_core::{h, on, props, Event, Host, MemoryHost, Store, VNode};
use patchwork_testing::{Mutation, RecordingHost};

#[derive(Clone, Debug, Default)]
struct LoginState {
    email: String,
    password: String,
}

fn login_view(store: Store<LoginState>) -> impl Fn(&LoginState) -> VNode {
    move |state: &LoginState| {
        let email_store = store.clone();
        let password_store = store.clone();
        let ready = state.email.contains('@') && state.password.len() >= 8;
        h!(
            "form",
            props! { "className" => "login-form" },
            h!(
                "input",
                props! {
                    "type" => "email",
                    "data-field" => "email",
                    "value" => state.email.as_str(),
                    "onInput" => on(move |event: &Event| {
                        let value = event.value.clone().unwrap_or_default();
                        email_store.set(|s| s.email = value);
                    }),
                }
            ),
            h!(
                "input",
                props! {
                    "type" => "password",
                    "data-field" => "password",
                    "value" => state.password.as_str(),
                    "onInput" => on(move |event: &Event| {
                        let value = event.value.clone().unwrap_or_default();
                        password_store.set(|s| s.password = value);
                    }),
                }
            ),
            h!("button", props! { "disabled" => !ready, "data-field" => "submit" }, "Log in"),
        )
    }
}

fn mount() -> (AppShell<MemoryHost, LoginState>, usize) {
    let mut host = MemoryHost::new();
    let container = host.create_element("main").unwrap();
    let store = Store::new(LoginState::default());
    let shell = AppShell::new(host, container, store.clone(), login_view(store)).unwrap();
    (shell, container)
}

#[test]
fn renders_on_construction_and_stays_clean() {
    let (mut shell, container) = mount();
    assert_eq!(shell.render_count(), 1);
    assert!(!shell.should_render());
    assert!(!shell.update().unwrap());
    let submit = shell
        .host()
        .find_by_attribute(container, "data-field", "submit")
        .unwrap();
    assert_eq!(shell.host().attribute(submit, "disabled"), Some(""));
}

#[test]
fn input_events_flow_through_store_into_view() {
    let (mut shell, container) = mount();
    let email = shell
        .host()
        .find_by_attribute(container, "data-field", "email")
        .unwrap();
    let password = shell
        .host()
        .find_by_attribute(container, "data-field", "password")
        .unwrap();

    shell.host_mut().type_into(email, "me@example.com").unwrap();
    assert!(shell.should_render());
    shell.host_mut().type_into(password, "correct horse").unwrap();
    assert!(shell.update().unwrap());
    assert_eq!(shell.render_count(), 2);

    let submit = shell
        .host()
        .find_by_attribute(container, "data-field", "submit")
        .unwrap();
    assert_eq!(shell.host().attribute(submit, "disabled"), None);
    assert_eq!(shell.host().property_value(email), Some("me@example.com"));
    assert_eq!(shell.store().get().password, "correct horse");
    // Every render rebinds fresh closures, so each input keeps exactly one.
    assert_eq!(shell.host().listener_count(email, "input"), 1);
}

#[test]
fn external_store_updates_mark_dirty() {
    let (mut shell, container) = mount();
    shell.store().set(|s| s.email = "set@elsewhere".into());
    assert!(shell.should_render());
    shell.update().unwrap();
    let email = shell
        .host()
        .find_by_attribute(container, "data-field", "email")
        .unwrap();
    assert_eq!(shell.host().property_value(email), Some("set@elsewhere"));
}

#[test]
fn unchanged_state_rerender_only_rebinds_handlers() {
    let mut host = RecordingHost::new(MemoryHost::new());
    let container = host.create_element("main").unwrap();
    let store = Store::new(LoginState::default());
    let mut shell = AppShell::new(host, container, store.clone(), login_view(store)).unwrap();
    shell.host_mut().clear();

    shell.render().unwrap();

    let mutations = shell.host_mut().take();
    assert!(!mutations.is_empty());
    assert!(mutations.iter().all(|m| matches!(
        m,
        Mutation::AddListener { .. } | Mutation::RemoveListener { .. }
    )));
}

#[test]
fn unmount_returns_empty_host() {
    let (shell, container) = mount();
    let host = shell.unmount().unwrap();
    assert_eq!(host.child_count(container).unwrap(), 0);
    assert_eq!(host.len(), 1);
}
