//! The condition a test consults to decide whether it should be skipped.

use std::any::type_name;
use std::env;

/// A condition that, when satisfied, causes the test it is attached to be skipped.
///
/// Implementors are built fresh for every test invocation by the factory stored in a
/// [`ConditionDescriptor`](crate::ConditionDescriptor), so they may capture whatever state they need at
/// construction time.
///
/// # Examples
/// ```rust
/// use condignore_core::IgnoreCondition;
///
/// struct NotOnCi;
///
/// impl IgnoreCondition for NotOnCi {
///     fn is_satisfied(&self) -> bool {
///         std::env::var_os("CI").is_some()
///     }
/// }
///
/// assert_eq!(NotOnCi.name(), "NotOnCi");
/// ```
pub trait IgnoreCondition {
    /// Whether the test should be skipped.
    fn is_satisfied(&self) -> bool;

    /// Name used in the skip reason. Defaults to the implementor's type name without its module path.
    fn name(&self) -> String {
        simple_type_name(type_name::<Self>())
    }
}

impl<C: IgnoreCondition + ?Sized> IgnoreCondition for Box<C> {
    fn is_satisfied(&self) -> bool {
        (**self).is_satisfied()
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// Strip module paths from every path segment of a type name.
///
/// ## Examples
/// ```rust
/// use condignore_core::simple_type_name;
///
/// assert_eq!(simple_type_name("my_crate::conditions::OnWindows"), "OnWindows");
/// assert_eq!(simple_type_name("a::Flag<b::Bar, c::Baz>"), "Flag<Bar, Baz>");
/// ```
pub fn simple_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;

    for (i, ch) in full.char_indices() {
        if matches!(ch, '<' | '>' | ',' | '(' | ')' | '[' | ']' | '&' | ';' | ' ') {
            push_last_segment(&mut out, &full[segment_start..i]);
            out.push(ch);
            segment_start = i + ch.len_utf8();
        }
    }
    push_last_segment(&mut out, &full[segment_start..]);

    out
}

fn push_last_segment(out: &mut String, path: &str) {
    if let Some(last) = path.rsplit("::").next() {
        out.push_str(last);
    }
}

// ============================================================================
// Ready-made conditions
// ============================================================================

/// Always satisfied: the test is always skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct Always;

impl IgnoreCondition for Always {
    fn is_satisfied(&self) -> bool {
        true
    }
}

/// Never satisfied: the test always runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct Never;

impl IgnoreCondition for Never {
    fn is_satisfied(&self) -> bool {
        false
    }
}

/// Satisfied when the named environment variable is set to a non-empty value.
#[derive(Debug, Clone, Copy)]
pub struct EnvVarSet(pub &'static str);

impl IgnoreCondition for EnvVarSet {
    fn is_satisfied(&self) -> bool {
        env::var_os(self.0).is_some_and(|v| !v.is_empty())
    }
}

/// Satisfied when the harness was compiled for the given target OS (as in `cfg(target_os = "...")`).
#[derive(Debug, Clone, Copy)]
pub struct RunningOn(pub &'static str);

impl IgnoreCondition for RunningOn {
    fn is_satisfied(&self) -> bool {
        env::consts::OS == self.0
    }
}
