//! `{token}` template substitution over a single string leaf.

use crate::manifest::Manifest;

use super::Context;

/// Replace every `{token}` span via [`Context::lookup`].
///
/// Unresolvable references keep their literal text; an unterminated `{`
/// leaves the remainder of the string untouched. Malformed syntax never
/// fails the resolution pass.
pub(crate) fn apply(input: &str, context: &Context) -> String {
    if !input.contains('{') {
        return input.to_owned();
    }

    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let Some(close) = tail.find('}') else {
            output.push_str(&rest[open..]);
            return output;
        };
        let token = &tail[..close];
        match context.lookup(token) {
            Some(value) => output.push_str(&value),
            None => {
                output.push('{');
                output.push_str(token);
                output.push('}');
            }
        }
        rest = &tail[close + 1..];
    }
    output.push_str(rest);
    output
}

/// Walk a dotted path through objects (by key) and arrays (by index).
pub(crate) fn reach<'a>(root: &'a Manifest, path: &str) -> Option<&'a Manifest> {
    path.split('.').try_fold(root, |node, segment| match node {
        Manifest::Object(entries) => entries.get(segment),
        Manifest::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    })
}

/// Stringify a scalar hit. Containers and null do not substitute.
pub(crate) fn scalar_text(value: &Manifest) -> Option<String> {
    match value {
        Manifest::String(text) => Some(text.clone()),
        Manifest::Number(number) => Some(number.to_string()),
        Manifest::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
