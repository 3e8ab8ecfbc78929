//! Native event detection
//!
//! A payload handed to `dispatch` is either data, which gets wrapped into a
//! [`CustomEvent`](crate::envelope::CustomEvent), or an interaction event being
//! forwarded upward, which must reach the callback untouched. The two are told
//! apart by shape alone.

use crate::inspect::{Inspect, Member};
use smallvec::SmallVec;

/// Kind a member must have for a payload to count as a native event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Bool,
    Number,
    Str,
    Method,
    /// Present and truthy, any kind
    Truthy,
}

impl MemberKind {
    fn matches(self, member: Member<'_>) -> bool {
        match self {
            MemberKind::Bool => matches!(member, Member::Bool(_)),
            MemberKind::Number => matches!(member, Member::Number(_)),
            MemberKind::Str => matches!(member, Member::Str(_)),
            MemberKind::Method => matches!(member, Member::Method),
            MemberKind::Truthy => member.is_truthy(),
        }
    }
}

/// Members every native interaction event exposes
pub const NATIVE_EVENT_SHAPE: &[(&str, MemberKind)] = &[
    ("bubbles", MemberKind::Bool),
    ("cancelable", MemberKind::Bool),
    ("defaultPrevented", MemberKind::Bool),
    ("isTrusted", MemberKind::Bool),
    ("eventPhase", MemberKind::Number),
    ("timeStamp", MemberKind::Number),
    ("type", MemberKind::Str),
    ("preventDefault", MemberKind::Method),
    ("isDefaultPrevented", MemberKind::Method),
    ("stopPropagation", MemberKind::Method),
    ("isPropagationStopped", MemberKind::Method),
    ("persist", MemberKind::Method),
    ("currentTarget", MemberKind::Truthy),
    ("nativeEvent", MemberKind::Truthy),
    ("target", MemberKind::Truthy),
];

/// Whether `payload` already has the shape of a native interaction event
pub fn looks_like_native_event(payload: &dyn Inspect) -> bool {
    NATIVE_EVENT_SHAPE
        .iter()
        .all(|&(name, kind)| member_matches(payload, name, kind))
}

/// Like [`looks_like_native_event`] but for an optional payload
pub fn is_native_payload(payload: Option<&dyn Inspect>) -> bool {
    payload.is_some_and(looks_like_native_event)
}

/// Names of the shape members `payload` is missing or has with the wrong kind
///
/// Empty exactly when [`looks_like_native_event`] holds.
pub fn shape_mismatches(payload: &dyn Inspect) -> SmallVec<[&'static str; 4]> {
    NATIVE_EVENT_SHAPE
        .iter()
        .filter(|&&(name, kind)| !member_matches(payload, name, kind))
        .map(|&(name, _)| name)
        .collect()
}

fn member_matches(payload: &dyn Inspect, name: &str, kind: MemberKind) -> bool {
    payload
        .member(name)
        .is_some_and(|member| kind.matches(member))
}
