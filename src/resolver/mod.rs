//! Placeholder Resolution
//!
//! Rewrites a manifest tree in place so that operators can externalize
//! environment-specific values (ports, hosts, credentials) from a
//! checked-in manifest without a separate templating step.
//!
//! # Resolution Order
//!
//! ```text
//! for every string leaf, depth-first:
//!    1. {token} template pass      ← package metadata, then environment
//!    2. $env.NAME indirection      ← environment only; unset → null
//!    3. "" → null normalization    ← "absent", distinct from empty
//! ```
//!
//! Non-string scalars (numbers, booleans, null) are left untouched;
//! containers are recursed into. Unresolvable references are tolerated:
//! a `{token}` that matches nothing stays literal rather than failing the
//! whole pass.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut manifest = serde_json::json!({
//!     "server": { "host": "$env.host", "port": "$env.port" }
//! });
//! let context = Context::capture(manifest_path.parent());
//! resolve(&mut manifest, &context);
//! ```

mod context;
mod template;

pub use context::{Context, PACKAGE_DESCRIPTOR};

use crate::manifest::Manifest;

/// Prefix marking a whole-leaf environment variable reference.
pub const ENV_PREFIX: &str = "$env.";

/// Resolve every placeholder in the tree, mutating it in place.
///
/// Reapplying with the same context is idempotent: resolved values are
/// ordinary strings with no marker prefix. The one exception is a
/// substituted value that itself starts with `$env.` — that is resolved
/// again on the next pass, which is observed (and preserved) behavior.
pub fn resolve(node: &mut Manifest, context: &Context) {
    match node {
        Manifest::Object(entries) => {
            for (_key, value) in entries.iter_mut() {
                resolve(value, context);
            }
        }
        Manifest::Array(items) => {
            for item in items.iter_mut() {
                resolve(item, context);
            }
        }
        Manifest::String(leaf) => {
            let resolved = resolve_leaf(leaf, context);
            *node = resolved;
        }
        _ => {}
    }
}

fn resolve_leaf(leaf: &str, context: &Context) -> Manifest {
    let templated = template::apply(leaf, context);

    let value = match templated.strip_prefix(ENV_PREFIX) {
        Some(name) => match context.env(name) {
            Some(value) => value.to_owned(),
            None => return Manifest::Null,
        },
        None => templated,
    };

    // Empty values are normalized to an explicit "absent" marker so that
    // downstream consumers treat them as not provided.
    if value.is_empty() {
        Manifest::Null
    } else {
        Manifest::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn context_with_env(pairs: &[(&str, &str)]) -> Context {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Context::new(env, None)
    }

    #[test]
    fn manifests_without_placeholders_are_untouched() {
        let mut manifest = json!({
            "server": { "host": "localhost", "port": 8080, "tls": false },
            "register": { "plugins": [{ "plugin": "./--loaded" }] }
        });
        let expected = manifest.clone();

        resolve(&mut manifest, &context_with_env(&[]));
        assert_eq!(manifest, expected);
    }

    #[test]
    fn env_prefixed_leaves_take_the_variable_value() {
        let mut manifest = json!({ "host": "$env.FOO" });
        resolve(&mut manifest, &context_with_env(&[("FOO", "bar")]));
        assert_eq!(manifest["host"], json!("bar"));
    }

    #[test]
    fn unset_variables_yield_the_absent_sentinel() {
        let mut manifest = json!({ "secret": "$env.MISSING" });
        resolve(&mut manifest, &context_with_env(&[]));
        assert_eq!(manifest["secret"], Manifest::Null);
    }

    #[test]
    fn empty_values_are_normalized_to_absent() {
        let mut manifest = json!({
            "blank": "",
            "from_env": "$env.EMPTY"
        });
        resolve(&mut manifest, &context_with_env(&[("EMPTY", "")]));
        assert_eq!(manifest["blank"], Manifest::Null);
        assert_eq!(manifest["from_env"], Manifest::Null);
    }

    #[test]
    fn non_string_scalars_are_left_alone() {
        let mut manifest = json!({ "port": 0, "enabled": true, "none": null });
        let expected = manifest.clone();
        resolve(&mut manifest, &context_with_env(&[("port", "9")]));
        assert_eq!(manifest, expected);
    }

    #[test]
    fn templates_resolve_against_package_metadata_first() {
        let metadata = json!({ "name": "orders", "version": "1.2.3" });
        let env: HashMap<String, String> =
            [("version".to_string(), "from-env".to_string())].into();
        let context = Context::new(env, Some(metadata));

        let mut manifest = json!({ "banner": "{name} v{version} ready" });
        resolve(&mut manifest, &context);
        assert_eq!(manifest["banner"], json!("orders v1.2.3 ready"));
    }

    #[test]
    fn templates_fall_back_to_the_environment() {
        let mut manifest = json!({ "region": "deployed to {DEPLOY_REGION}" });
        resolve(
            &mut manifest,
            &context_with_env(&[("DEPLOY_REGION", "eu-west-1")]),
        );
        assert_eq!(manifest["region"], json!("deployed to eu-west-1"));
    }

    #[test]
    fn unresolved_references_stay_literal() {
        let mut manifest = json!({ "note": "value is {not.a.thing}" });
        resolve(&mut manifest, &context_with_env(&[]));
        assert_eq!(manifest["note"], json!("value is {not.a.thing}"));
    }

    #[test]
    fn metadata_paths_traverse_objects_and_arrays() {
        let metadata = json!({
            "contributors": [{ "name": "wwj" }],
            "config": { "listen": { "port": 8080 } }
        });
        let context = Context::new(HashMap::new(), Some(metadata));

        let mut manifest = json!({
            "owner": "{contributors.0.name}",
            "port": "{config.listen.port}"
        });
        resolve(&mut manifest, &context);
        assert_eq!(manifest["owner"], json!("wwj"));
        assert_eq!(manifest["port"], json!("8080"));
    }

    #[test]
    fn substituted_env_markers_are_resolved_again() {
        // A metadata value that happens to start with the marker prefix is
        // double-resolved against the environment. Observed behavior of the
        // launcher this replaces; kept as-is.
        let metadata = json!({ "listen": "$env.PORT" });
        let env: HashMap<String, String> = [("PORT".to_string(), "8080".to_string())].into();
        let context = Context::new(env, Some(metadata));

        let mut manifest = json!({ "port": "{listen}" });
        resolve(&mut manifest, &context);
        assert_eq!(manifest["port"], json!("8080"));
    }

    #[test]
    fn resolution_is_idempotent() {
        let context = context_with_env(&[("host", "localhost"), ("port", "0")]);
        let mut manifest = json!({
            "server": { "host": "$env.host", "port": "$env.port" },
            "app": { "motto": "plain text" }
        });

        resolve(&mut manifest, &context);
        let once = manifest.clone();
        resolve(&mut manifest, &context);
        assert_eq!(manifest, once);
    }

    #[test]
    fn resolves_the_full_launcher_manifest() {
        let context = context_with_env(&[
            ("host", "localhost"),
            ("port", "0"),
            ("plugin_option", "plugin-option"),
        ]);
        let mut manifest = json!({
            "server": { "host": "$env.host", "port": "$env.port" },
            "register": {
                "plugins": [{
                    "plugin": "./--options",
                    "options": { "key": "$env.plugin_option" }
                }]
            }
        });

        resolve(&mut manifest, &context);

        assert_eq!(manifest["server"]["host"], json!("localhost"));
        assert_eq!(manifest["server"]["port"], json!("0"));
        assert_eq!(
            manifest["register"]["plugins"][0]["options"]["key"],
            json!("plugin-option")
        );
    }
}
