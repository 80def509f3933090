/// Time units for an offset modifier, largest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffsetUnits {
    pub y: Option<u64>,
    pub w: Option<u64>,
    pub d: Option<u64>,
    pub h: Option<u64>,
    pub m: Option<u64>,
    pub s: Option<u64>,
    pub ms: Option<u64>,
}

/// Concatenate the non-zero units of an offset, e.g. `1d12h`.
///
/// With no unit set at all the result is `0m`.
///
/// # Examples
/// ```
/// use promkit_core::utils::{OffsetUnits, build_offset_string};
/// let units = OffsetUnits { d: Some(1), h: Some(12), ..Default::default() };
/// assert_eq!(build_offset_string(&units), "1d12h");
/// assert_eq!(build_offset_string(&OffsetUnits::default()), "0m");
/// ```
pub fn build_offset_string(units: &OffsetUnits) -> String {
    let entries = [
        ("y", units.y),
        ("w", units.w),
        ("d", units.d),
        ("h", units.h),
        ("m", units.m),
        ("s", units.s),
        ("ms", units.ms),
    ];

    if entries.iter().all(|(_, value)| value.is_none()) {
        return "0m".to_string();
    }

    let mut out = String::new();
    for (unit, value) in entries {
        if let Some(v) = value
            && v != 0
        {
            out.push_str(&format!("{}{}", v, unit));
        }
    }
    out
}

/// Convert a metric or label name to snake_case.
///
/// Any character that cannot appear in an identifier becomes a separator.
/// Runs of separators collapse to one `_`.
///
/// # Examples
/// ```
/// use promkit_core::utils::to_snake_case;
/// assert_eq!(to_snake_case("kube_node_info"), "kube_node_info");
/// assert_eq!(to_snake_case("http:requests:rate5m"), "http_requests_rate5m");
/// assert_eq!(to_snake_case("HttpRequests"), "http_requests");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() {
                if prev_lower && !result.ends_with('_') {
                    result.push('_');
                }
                result.push(c.to_ascii_lowercase());
                prev_lower = false;
            } else {
                result.push(c);
                prev_lower = true;
            }
        } else {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_lower = false;
        }
    }
    while result.ends_with('_') {
        result.pop();
    }
    result
}

/// Convert a metric or label name to camelCase.
///
/// # Examples
/// ```
/// use promkit_core::utils::to_camel_case;
/// assert_eq!(to_camel_case("kube_node_info"), "kubeNodeInfo");
/// assert_eq!(to_camel_case("job"), "job");
/// ```
pub fn to_camel_case(s: &str) -> String {
    let snake = to_snake_case(s);
    let mut result = String::with_capacity(snake.len());
    let mut capitalize_next = false;
    for c in snake.chars() {
        if c == '_' {
            capitalize_next = true;
            continue;
        }
        if capitalize_next && !result.is_empty() {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
        capitalize_next = false;
    }
    result
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Identifier for names without a single ASCII letter or digit, such as `"é"`.
pub const FALLBACK_IDENTIFIER: &str = "label";

/// Keywords that cannot be used even as raw identifiers.
const RUST_NON_RAW: &[&str] = &["crate", "self", "super", "Self"];

pub fn is_rust_keyword(s: &str) -> bool {
    RUST_KEYWORDS.contains(&s)
}

/// Turn `name` into a valid Rust identifier.
///
/// Snake-cases the name, prefixes `_` when it starts with a digit, and emits
/// keywords as raw identifiers (`r#type`). Names with nothing to keep become
/// [`FALLBACK_IDENTIFIER`].
pub fn rust_identifier(name: &str) -> String {
    let ident = to_snake_case(name);
    if ident.is_empty() {
        return FALLBACK_IDENTIFIER.to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{}", ident);
    }
    if RUST_NON_RAW.contains(&ident.as_str()) {
        return format!("{}_", ident);
    }
    if is_rust_keyword(&ident) {
        return format!("r#{}", ident);
    }
    ident
}

const TS_RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with",
];

/// Turn `name` into a valid TypeScript identifier (camelCase, `_` suffix for reserved words).
pub fn ts_identifier(name: &str) -> String {
    let ident = to_camel_case(name);
    if ident.is_empty() {
        return FALLBACK_IDENTIFIER.to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{}", ident);
    }
    if TS_RESERVED.contains(&ident.as_str()) {
        return format!("{}_", ident);
    }
    ident
}
