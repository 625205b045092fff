//! Variable interpolation for command strings
//!
//! Replaces `${var}` references from the context variables, falling back to
//! the process environment. Unresolved references are left verbatim so the
//! shell can have a final say.

use crate::error::{InterpolationError, InterpolationResult};
use regex::Regex;
use std::collections::HashMap;
use std::env;

/// Interpolate variables in a string
pub fn interpolate(s: &str, vars: &HashMap<String, String>) -> InterpolationResult<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

    let mut result = s.to_string();
    let mut seen = std::collections::HashSet::new();

    // Loop to handle nested interpolation
    loop {
        let mut changed = false;

        result = re
            .replace_all(&result, |caps: &regex::Captures| {
                let var_name = &caps[1];

                if !seen.insert(var_name.to_string()) {
                    return format!("${{{}}}", var_name);
                }

                // Context variables first
                if let Some(value) = vars.get(var_name) {
                    changed = true;
                    return value.clone();
                }

                // Then the process environment
                if let Ok(value) = env::var(var_name) {
                    changed = true;
                    return value;
                }

                // Unresolved: leave as-is
                format!("${{{}}}", var_name)
            })
            .to_string();

        if !changed {
            break;
        }

        if seen.len() > 100 {
            return Err(InterpolationError::RecursiveInterpolation);
        }
    }

    Ok(result)
}
