//! Property values and the property applier.
//!
//! [`apply_prop`] decides how a single prop lands on a live element: as an
//! event subscription, the class attribute, a live `value`/`checked`
//! property, a presence-only boolean attribute or a plain attribute.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::host::{Host, LiveProperty, LivePropertyKind};
use crate::{HostError, NodeId};

const EVENT_PREFIX: &str = "on";
const CLASS_KEY: &str = "className";

/// Event delivered to an [`EventHandler`].
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub kind: String,
    pub target: NodeId,
    pub value: Option<String>,
    pub checked: Option<bool>,
}

impl Event {
    pub fn new(kind: impl Into<String>, target: NodeId) -> Self {
        Self {
            kind: kind.into(),
            target,
            value: None,
            checked: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }
}

/// Shared event callback. Two handlers are equal only if they are the same
/// allocation.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0))
    }
}

/// Wraps a closure as an event handler.
pub fn on(f: impl Fn(&Event) + 'static) -> EventHandler {
    EventHandler::new(f)
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Handler(EventHandler),
}

impl PropValue {
    /// Attribute text for this value. `Null` and handlers have none.
    pub fn string_form(&self) -> Option<String> {
        match self {
            PropValue::Str(value) => Some(value.clone()),
            PropValue::Int(value) => Some(value.to_string()),
            PropValue::Float(value) => Some(float_text(*value)),
            PropValue::Bool(value) => Some(value.to_string()),
            PropValue::Null | PropValue::Handler(_) => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Str(value) => !value.is_empty(),
            PropValue::Int(value) => *value != 0,
            PropValue::Float(value) => *value != 0.0 && !value.is_nan(),
            PropValue::Bool(value) => *value,
            PropValue::Null => false,
            PropValue::Handler(_) => true,
        }
    }

    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            PropValue::Handler(handler) => Some(handler),
            _ => None,
        }
    }
}

/// JS number-to-string rules: `NaN`, `Infinity`, no `-0`, and exponent
/// form (`1e+21`, `1e-7`) outside `1e-6..1e21`.
pub(crate) fn float_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }
    if (1e-6..1e21).contains(&value.abs()) {
        return value.to_string();
    }
    let exponent = format!("{value:e}");
    match exponent.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exponent,
    }
}

/// Widens through the shortest decimal so `0.1f32` stays `0.1`.
pub(crate) fn widen_f32(value: f32) -> f64 {
    value
        .to_string()
        .parse::<f64>()
        .unwrap_or_else(|_| f64::from(value))
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<&String> for PropValue {
    fn from(value: &String) -> Self {
        PropValue::Str(value.clone())
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f32> for PropValue {
    fn from(value: f32) -> Self {
        PropValue::Float(widen_f32(value))
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(handler: EventHandler) -> Self {
        PropValue::Handler(handler)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropValue::Null, Into::into)
    }
}

macro_rules! int_prop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for PropValue {
                fn from(value: $ty) -> Self {
                    PropValue::Int(i64::from(value))
                }
            }
        )*
    };
}

int_prop!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for PropValue {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or_else(|_| PropValue::Float(value as f64), PropValue::Int)
    }
}

/// Name-to-value map of an element's props.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props(IndexMap<String, PropValue>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.0.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

/// `props! { "className" => "card", "onClick" => on(|_| ()) }`
#[macro_export]
macro_rules! props {
    () => {
        $crate::props::Props::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut props = $crate::props::Props::new();
        $(props.insert($name, $value);)+
        props
    }};
}

/// `onClick` -> `click`. `None` when `name` is not an event prop name.
pub(crate) fn event_name(name: &str) -> Option<String> {
    let rest = name.strip_prefix(EVENT_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.to_ascii_lowercase())
}

/// Applies one prop to a live element.
///
/// `value` is `None` when the prop was dropped from the new tree; `old` is the
/// value committed by the previous render, if any.
pub fn apply_prop<H: Host + ?Sized>(
    host: &mut H,
    node: NodeId,
    name: &str,
    value: Option<&PropValue>,
    old: Option<&PropValue>,
) -> Result<(), HostError> {
    if let Some(event) = event_name(name) {
        let previous = old.and_then(PropValue::as_handler);
        match value {
            Some(PropValue::Handler(handler)) => {
                if let Some(previous) = previous {
                    host.remove_event_listener(node, &event, previous)?;
                }
                return host.add_event_listener(node, &event, handler.clone());
            }
            None | Some(PropValue::Null) if previous.is_some() => {
                if let Some(previous) = previous {
                    host.remove_event_listener(node, &event, previous)?;
                }
                return Ok(());
            }
            _ => {
                if let Some(previous) = previous {
                    host.remove_event_listener(node, &event, previous)?;
                }
            }
        }
    }

    if name == CLASS_KEY {
        let class = value
            .filter(|value| value.is_truthy())
            .and_then(PropValue::string_form)
            .unwrap_or_default();
        return host.set_attribute(node, "class", &class);
    }

    if name == "value" {
        let text = value.and_then(PropValue::string_form);
        if host.supports_property(node, LivePropertyKind::Value)? {
            let text = text.unwrap_or_default();
            return host.set_property(node, LiveProperty::Value(&text));
        }
        return match text {
            Some(text) => host.set_attribute(node, name, &text),
            None => host.remove_attribute(node, name),
        };
    }

    if name == "checked" {
        if host.supports_property(node, LivePropertyKind::Checked)? {
            let checked = value.is_some_and(PropValue::is_truthy);
            return host.set_property(node, LiveProperty::Checked(checked));
        }
        return Ok(());
    }

    match value {
        Some(PropValue::Bool(true)) => host.set_attribute(node, name, ""),
        Some(PropValue::Bool(false)) | Some(PropValue::Null) | None => {
            host.remove_attribute(node, name)
        }
        Some(PropValue::Handler(_)) => {
            log::warn!("prop `{name}` holds a handler but is not an event name; skipped");
            Ok(())
        }
        Some(other) => match other.string_form() {
            Some(text) => host.set_attribute(node, name, &text),
            None => host.remove_attribute(node, name),
        },
    }
}

/// Brings a live element's props from `old` to `new`.
///
/// Keys missing from `new` are unset, keys whose value changed (or is new)
/// are applied, equal keys are left alone.
pub fn diff_props<H: Host + ?Sized>(
    host: &mut H,
    node: NodeId,
    new: &Props,
    old: &Props,
) -> Result<(), HostError> {
    for (name, old_value) in old.iter() {
        if !new.contains_key(name) {
            apply_prop(host, node, name, None, Some(old_value))?;
        }
    }
    for (name, value) in new.iter() {
        let old_value = old.get(name);
        if old_value == Some(value) {
            continue;
        }
        apply_prop(host, node, name, Some(value), old_value)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/props_tests.rs"]
mod tests;
