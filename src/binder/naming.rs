//! Naming conventions used to derive candidate configuration keys
//!
//! Conversions work on a PascalCase declared name (`MqAddress`). Each
//! uppercase character after the first position starts a new word, so
//! acronyms split per letter (`HTTPPort` -> `h_t_t_p_port`).

/// `MqAddress` -> `mqAddress`
pub fn to_camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// `MqAddress` -> `mq_address`
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `MqAddress` -> `mq-address`
pub fn to_kebab_case(name: &str) -> String {
    to_snake_case(name).replace('_', "-")
}

/// `MqAddress` -> `mq.address`
pub fn to_dot_notation(name: &str) -> String {
    to_snake_case(name).replace('_', ".")
}

/// `mq_address` -> `MqAddress`
///
/// Used to turn Rust field names into declared names.
pub fn to_pascal_case(name: &str) -> String {
    name.trim_start_matches("r#")
        .split('_')
        .filter(|s| !s.is_empty())
        .map(|word| {
            let mut c = word.chars();
            match c.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
            }
        })
        .collect()
}

/// Candidate keys for a declared name, in priority order:
/// PascalCase, camelCase, snake_case, kebab-case, dot.notation.
///
/// Duplicates are removed ignoring case, keeping the first spelling.
pub fn candidates(declared: &str) -> Vec<String> {
    if declared.is_empty() {
        return Vec::new();
    }

    let all = [
        declared.to_string(),
        to_camel_case(declared),
        to_snake_case(declared),
        to_kebab_case(declared),
        to_dot_notation(declared),
    ];

    let mut out: Vec<String> = Vec::with_capacity(all.len());
    for candidate in all {
        if !out.iter().any(|c| eq_ignore_case(c, &candidate)) {
            out.push(candidate);
        }
    }
    out
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}
