use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// An optional fallback can be given as `{{ env.VAR | default("value") }}`;
/// it is substituted when the variable is unset instead of failing the load.
/// Lines starting with `#` (TOML comments) are passed through unchanged so a
/// commented-out secret never aborts startup.
pub fn expand_env(input: &str) -> Result<String, String> {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let placeholder = PLACEHOLDER.get_or_init(|| {
        // Group 1: variable name, group 2: optional default value
        Regex::new(r#"\{\{\s*env\.([A-Za-z0-9_]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    });

    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut missing: Option<String> = None;
        let expanded = placeholder.replace_all(line, |caps: &Captures<'_>| {
            let name = &caps[1];
            std::env::var(name).unwrap_or_else(|_| {
                caps.get(2).map_or_else(
                    || {
                        missing = Some(name.to_owned());
                        String::new()
                    },
                    |default| default.as_str().to_owned(),
                )
            })
        });

        if let Some(name) = missing {
            return Err(format!("environment variable not found: `{name}`"));
        }

        output.push_str(&expanded);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_placeholders() {
        let input = "key = \"value\"";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn single_env_var() {
        temp_env::with_var("PRISM_TEST_VAR", Some("hello"), || {
            let result = expand_env("key = \"{{ env.PRISM_TEST_VAR }}\"").unwrap();
            assert_eq!(result, "key = \"hello\"");
        });
    }

    #[test]
    fn multiple_env_vars_across_lines() {
        let vars = [("PRISM_FOO", Some("foo")), ("PRISM_BAR", Some("bar"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("a = \"{{ env.PRISM_FOO }}\"\nb = \"{{ env.PRISM_BAR }}\"").unwrap();
            assert_eq!(result, "a = \"foo\"\nb = \"bar\"");
        });
    }

    #[test]
    fn missing_env_var() {
        temp_env::with_var_unset("PRISM_MISSING_VAR", || {
            let err = expand_env("key = \"{{ env.PRISM_MISSING_VAR }}\"").unwrap_err();
            assert!(err.contains("PRISM_MISSING_VAR"));
        });
    }

    #[test]
    fn commented_lines_skip_expansion() {
        temp_env::with_var_unset("PRISM_MISSING_VAR", || {
            let input = "# key = \"{{ env.PRISM_MISSING_VAR }}\"";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }

    #[test]
    fn default_used_when_var_missing() {
        temp_env::with_var_unset("PRISM_OPTIONAL_VAR", || {
            let result = expand_env("key = \"{{ env.PRISM_OPTIONAL_VAR | default(\"\") }}\"").unwrap();
            assert_eq!(result, "key = \"\"");
        });
    }

    #[test]
    fn default_not_used_when_var_present() {
        temp_env::with_var("PRISM_OPTIONAL_VAR", Some("actual"), || {
            let result = expand_env("key = \"{{ env.PRISM_OPTIONAL_VAR | default(\"fallback\") }}\"").unwrap();
            assert_eq!(result, "key = \"actual\"");
        });
    }

    #[test]
    fn trailing_newline_preserved() {
        let input = "key = \"value\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }
}
