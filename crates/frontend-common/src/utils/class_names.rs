//! Conditional class-list flattening and Tailwind conflict resolution.
//!
//! `cn` runs two passes over its input:
//! 1. flatten the [`ClassValue`] tree into a whitespace-separated list, skipping
//!    falsy entries,
//! 2. merge the list so that, for every utility group, only the right-most
//!    class survives under a given variant set (`md:`, `dark:hover:`, ...).
//!
//! Classes are scanned right-to-left. Keeping a class claims its group plus
//! every group it subsumes (`p-4` claims `px`, `pt`, ...), which is what lets
//! `px-2 p-4` collapse to `p-4` while `p-4 px-2` keeps both.

use std::collections::HashSet;

/// One argument to [`cn`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ClassValue {
    #[default]
    None,
    Str(String),
    Cond(String, bool),
    List(Vec<ClassValue>),
}

impl ClassValue {
    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            ClassValue::None => {}
            ClassValue::Str(classes) | ClassValue::Cond(classes, true) => {
                out.extend(classes.split_whitespace());
            }
            ClassValue::Cond(_, false) => {}
            ClassValue::List(values) => {
                for value in values {
                    value.flatten_into(out);
                }
            }
        }
    }
}

impl From<&str> for ClassValue {
    fn from(value: &str) -> Self {
        ClassValue::Str(value.to_string())
    }
}

impl From<String> for ClassValue {
    fn from(value: String) -> Self {
        ClassValue::Str(value)
    }
}

impl From<&String> for ClassValue {
    fn from(value: &String) -> Self {
        ClassValue::Str(value.clone())
    }
}

impl From<(&str, bool)> for ClassValue {
    fn from((class, enabled): (&str, bool)) -> Self {
        ClassValue::Cond(class.to_string(), enabled)
    }
}

impl From<bool> for ClassValue {
    fn from(_: bool) -> Self {
        ClassValue::None
    }
}

impl<T: Into<ClassValue>> From<Option<T>> for ClassValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ClassValue::None, Into::into)
    }
}

impl<T: Into<ClassValue>> From<Vec<T>> for ClassValue {
    fn from(values: Vec<T>) -> Self {
        ClassValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ClassValue>, const N: usize> From<[T; N]> for ClassValue {
    fn from(values: [T; N]) -> Self {
        ClassValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Merge class expressions into one string, later utilities overriding earlier ones.
///
/// ```
/// use blog_frontend_common::cn;
///
/// let active = true;
/// assert_eq!(cn!("px-2 py-1", ("p-4", active), None::<&str>), "p-4");
/// ```
#[macro_export]
macro_rules! cn {
    ($($value:expr),* $(,)?) => {
        $crate::utils::class_names::cn(&[
            $($crate::utils::class_names::ClassValue::from($value)),*
        ])
    };
}

/// Flatten and merge a list of class values.
pub fn cn(inputs: &[ClassValue]) -> String {
    let mut classes = Vec::new();
    for input in inputs {
        input.flatten_into(&mut classes);
    }
    merge_class_list(&classes)
}

/// Resolve conflicts in an already flat, whitespace-separated class string.
pub fn merge_classes(classes: &str) -> String {
    let classes: Vec<&str> = classes.split_whitespace().collect();
    merge_class_list(&classes)
}

fn merge_class_list(classes: &[&str]) -> String {
    let mut claimed: HashSet<String> = HashSet::new();
    let mut kept: Vec<&str> = Vec::with_capacity(classes.len());

    for &class in classes.iter().rev() {
        let resolved = ParsedClass::parse(class)
            .and_then(|parsed| Some((parsed.scope(), utility_group(parsed.base)?)));

        let Some((scope, group)) = resolved else {
            // Unknown or unparsable tokens never conflict; only exact repeats collapse.
            if claimed.insert(format!("={class}")) {
                kept.push(class);
            }
            continue;
        };

        if claimed.contains(&format!("{scope}{group}")) {
            continue;
        }

        claimed.insert(format!("{scope}{group}"));
        for subsumed in subsumed_groups(&group) {
            claimed.insert(format!("{scope}{subsumed}"));
        }
        kept.push(class);
    }

    kept.reverse();
    kept.join(" ")
}

/// A class split into its variant prefix, important marker and base utility.
#[derive(Debug, PartialEq, Eq)]
struct ParsedClass<'a> {
    variants: Vec<&'a str>,
    important: bool,
    base: &'a str,
}

impl<'a> ParsedClass<'a> {
    fn parse(class: &'a str) -> Option<Self> {
        let mut variants = Vec::new();
        let mut depth = 0usize;
        let mut start = 0usize;

        for (idx, ch) in class.char_indices() {
            match ch {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                ':' if depth == 0 => {
                    if idx == start {
                        return None;
                    }
                    variants.push(&class[start..idx]);
                    start = idx + 1;
                }
                _ => {}
            }
        }

        let mut base = &class[start..];
        let mut important = false;
        if let Some(stripped) = base.strip_prefix('!') {
            base = stripped;
            important = true;
        } else if let Some(stripped) = base.strip_suffix('!') {
            base = stripped;
            important = true;
        }
        if base.is_empty() {
            return None;
        }

        Some(Self {
            variants,
            important,
            base,
        })
    }

    /// Conflict scope: variants are order-insensitive unless arbitrary.
    fn scope(&self) -> String {
        let mut variants = self.variants.clone();
        if !variants.iter().any(|v| v.starts_with('[')) {
            variants.sort_unstable();
        }
        let mut scope = variants.join(":");
        scope.push('|');
        if self.important {
            scope.push('!');
        }
        scope
    }
}

const DISPLAY: &[&str] = &[
    "block",
    "inline-block",
    "inline",
    "flex",
    "inline-flex",
    "grid",
    "inline-grid",
    "table",
    "table-row",
    "table-cell",
    "contents",
    "flow-root",
    "list-item",
    "hidden",
];
const POSITION: &[&str] = &["static", "fixed", "absolute", "relative", "sticky"];
const VISIBILITY: &[&str] = &["visible", "invisible", "collapse"];
const FONT_SIZES: &[&str] = &[
    "xs", "sm", "base", "lg", "xl", "2xl", "3xl", "4xl", "5xl", "6xl", "7xl", "8xl", "9xl",
];
const FONT_WEIGHTS: &[&str] = &[
    "thin",
    "extralight",
    "light",
    "normal",
    "medium",
    "semibold",
    "bold",
    "extrabold",
    "black",
];
const TEXT_ALIGN: &[&str] = &["left", "center", "right", "justify", "start", "end"];
const BORDER_STYLES: &[&str] = &["solid", "dashed", "dotted", "double", "hidden", "none"];
const SHADOW_SIZES: &[&str] = &["sm", "md", "lg", "xl", "2xl", "inner", "none"];
const SIDES: &[&str] = &["x", "y", "t", "r", "b", "l", "s", "e"];
const CORNERS: &[&str] = &[
    "t", "r", "b", "l", "s", "e", "tl", "tr", "br", "bl", "ss", "se", "es", "ee",
];

/// Prefixes whose value never changes the group. Longer prefixes come first.
const PREFIX_GROUPS: &[&str] = &[
    "min-w",
    "min-h",
    "max-w",
    "max-h",
    "inset-x",
    "inset-y",
    "inset",
    "space-x",
    "space-y",
    "gap-x",
    "gap-y",
    "gap",
    "overflow-x",
    "overflow-y",
    "overflow",
    "justify-items",
    "justify-self",
    "justify",
    "items",
    "self",
    "content",
    "place-content",
    "place-items",
    "place-self",
    "grid-cols",
    "grid-rows",
    "col-span",
    "row-span",
    "line-clamp",
    "leading",
    "tracking",
    "whitespace",
    "break",
    "cursor",
    "duration",
    "delay",
    "ease",
    "opacity",
    "order",
    "basis",
    "grow",
    "shrink",
    "aspect",
    "object",
    "select",
    "pointer-events",
    "list",
    "z",
    "top",
    "right",
    "bottom",
    "left",
    "start",
    "end",
    "size",
    "w",
    "h",
    "px",
    "py",
    "ps",
    "pe",
    "pt",
    "pr",
    "pb",
    "pl",
    "p",
    "mx",
    "my",
    "ms",
    "me",
    "mt",
    "mr",
    "mb",
    "ml",
    "m",
];

fn utility_group(base: &str) -> Option<String> {
    // Negative values share the group of their positive form.
    let base = base.strip_prefix('-').unwrap_or(base);

    if base.starts_with('[') && base.ends_with(']') {
        let property = base[1..base.len() - 1].split(':').next()?;
        return Some(format!("arbitrary-{property}"));
    }

    let keyword_group = if DISPLAY.contains(&base) {
        Some("display")
    } else if POSITION.contains(&base) {
        Some("position")
    } else if VISIBILITY.contains(&base) {
        Some("visibility")
    } else {
        match base {
            "flex-row" | "flex-row-reverse" | "flex-col" | "flex-col-reverse" => {
                Some("flex-direction")
            }
            "flex-wrap" | "flex-wrap-reverse" | "flex-nowrap" => Some("flex-wrap"),
            "flex-1" | "flex-auto" | "flex-initial" | "flex-none" => Some("flex"),
            "italic" | "not-italic" => Some("font-style"),
            "underline" | "overline" | "line-through" | "no-underline" => Some("text-decoration"),
            "uppercase" | "lowercase" | "capitalize" | "normal-case" => Some("text-transform"),
            "truncate" | "text-ellipsis" | "text-clip" => Some("text-overflow"),
            "shadow" => Some("shadow"),
            "rounded" => Some("rounded"),
            "border" => Some("border-w"),
            "transition" => Some("transition"),
            "ring" => Some("ring-w"),
            _ => None,
        }
    };
    if let Some(group) = keyword_group {
        return Some(group.to_string());
    }

    let (prefix, value) = split_prefix(base)?;
    match prefix {
        "text" => Some(text_group(value).to_string()),
        "font" => Some(font_group(value).to_string()),
        "bg" => Some(background_group(value).to_string()),
        "border" => Some(border_group(value)),
        "rounded" => Some(rounded_group(value)),
        "shadow" => Some(if SHADOW_SIZES.contains(&value) {
            "shadow".to_string()
        } else {
            "shadow-color".to_string()
        }),
        "ring" => Some(ring_group(value).to_string()),
        "transition" => Some("transition".to_string()),
        "object" => Some(
            if matches!(value, "contain" | "cover" | "fill" | "none" | "scale-down") {
                "object-fit"
            } else {
                "object-position"
            }
            .to_string(),
        ),
        "list" => Some(
            if matches!(value, "inside" | "outside") {
                "list-position"
            } else if value.starts_with("image-") {
                "list-image"
            } else {
                "list-type"
            }
            .to_string(),
        ),
        _ => PREFIX_GROUPS
            .iter()
            .find(|&&candidate| candidate == prefix)
            .map(|group| (*group).to_string()),
    }
}

/// Split `px-4` into (`px`, `4`), matching the longest known prefix.
fn split_prefix(base: &str) -> Option<(&str, &str)> {
    const VALUE_PREFIXES: &[&str] = &[
        "text",
        "font",
        "bg",
        "border",
        "rounded",
        "shadow",
        "ring",
        "transition",
    ];

    PREFIX_GROUPS
        .iter()
        .chain(VALUE_PREFIXES)
        .filter_map(|prefix| {
            let rest = base.strip_prefix(prefix)?.strip_prefix('-')?;
            (!rest.is_empty()).then_some((*prefix, rest))
        })
        .max_by_key(|(prefix, _)| prefix.len())
}

fn text_group(value: &str) -> &'static str {
    let size = value.split('/').next().unwrap_or(value);
    if FONT_SIZES.contains(&size) || (is_arbitrary(value) && is_length_like(value)) {
        "font-size"
    } else if TEXT_ALIGN.contains(&value) {
        "text-align"
    } else if matches!(value, "wrap" | "nowrap" | "balance" | "pretty") {
        "text-wrap"
    } else {
        "text-color"
    }
}

fn font_group(value: &str) -> &'static str {
    if FONT_WEIGHTS.contains(&value) || value.chars().all(|c| c.is_ascii_digit()) {
        "font-weight"
    } else {
        "font-family"
    }
}

fn ring_group(value: &str) -> &'static str {
    match value.strip_prefix("offset-") {
        Some(offset) if is_length_like(offset) => "ring-offset-w",
        Some(_) => "ring-offset-color",
        None if value == "inset" => "ring-inset",
        None if is_length_like(value) => "ring-w",
        None => "ring-color",
    }
}

fn background_group(value: &str) -> &'static str {
    if value.starts_with("clip-") {
        return "bg-clip";
    }
    if value.starts_with("origin-") {
        return "bg-origin";
    }
    if value.starts_with("blend-") {
        return "bg-blend";
    }
    match value {
        "fixed" | "local" | "scroll" => "bg-attachment",
        "auto" | "cover" | "contain" => "bg-size",
        "repeat" | "no-repeat" | "repeat-x" | "repeat-y" | "repeat-round" | "repeat-space" => {
            "bg-repeat"
        }
        "center" | "top" | "bottom" | "left" | "right" | "left-top" | "left-bottom"
        | "right-top" | "right-bottom" => "bg-position",
        "none" => "bg-image",
        _ if value.starts_with("gradient-") || value.starts_with("[url(") => "bg-image",
        _ => "bg-color",
    }
}

fn border_group(value: &str) -> String {
    if BORDER_STYLES.contains(&value) {
        return "border-style".to_string();
    }
    if matches!(value, "collapse" | "separate") {
        return "border-collapse".to_string();
    }
    if let Some(spacing) = value.strip_prefix("spacing-") {
        return match spacing.split_once('-') {
            Some((axis @ ("x" | "y"), _)) => format!("border-spacing-{axis}"),
            _ => "border-spacing".to_string(),
        };
    }

    let (side, rest) = match value.split_once('-') {
        Some((side, rest)) if SIDES.contains(&side) => (Some(side), Some(rest)),
        _ if SIDES.contains(&value) => (Some(value), None),
        _ => (None, Some(value)),
    };

    let kind = match rest {
        None => "border-w",
        Some(rest) if is_length_like(rest) => "border-w",
        Some(_) => "border-color",
    };
    match side {
        Some(side) => format!("{kind}-{side}"),
        None => kind.to_string(),
    }
}

fn rounded_group(value: &str) -> String {
    let corner = value.split_once('-').map_or(value, |(corner, _)| corner);
    if CORNERS.contains(&corner) {
        format!("rounded-{corner}")
    } else {
        "rounded".to_string()
    }
}

fn is_arbitrary(value: &str) -> bool {
    value.starts_with('[') && value.ends_with(']')
}

fn is_length_like(value: &str) -> bool {
    if is_arbitrary(value) {
        let inner = &value[1..value.len() - 1];
        let inner = inner.strip_prefix("length:").unwrap_or(inner);
        return ["px", "rem", "em", "%", "vh", "vw", "ch"]
            .iter()
            .any(|unit| inner.ends_with(unit))
            || inner.parse::<f64>().is_ok();
    }
    value.chars().all(|c| c.is_ascii_digit())
}

/// Groups a class claims in addition to its own.
fn subsumed_groups(group: &str) -> Vec<String> {
    let fixed: &[&str] = match group {
        "p" => &["px", "py", "ps", "pe", "pt", "pr", "pb", "pl"],
        "px" => &["pr", "pl", "ps", "pe"],
        "py" => &["pt", "pb"],
        "m" => &["mx", "my", "ms", "me", "mt", "mr", "mb", "ml"],
        "mx" => &["mr", "ml", "ms", "me"],
        "my" => &["mt", "mb"],
        "inset" => &["inset-x", "inset-y", "start", "end", "top", "right", "bottom", "left"],
        "inset-x" => &["right", "left"],
        "inset-y" => &["top", "bottom"],
        "size" => &["w", "h"],
        "gap" => &["gap-x", "gap-y"],
        "overflow" => &["overflow-x", "overflow-y"],
        "border-spacing" => &["border-spacing-x", "border-spacing-y"],
        "rounded" => CORNERS,
        "rounded-t" => &["tl", "tr"],
        "rounded-r" => &["tr", "br"],
        "rounded-b" => &["br", "bl"],
        "rounded-l" => &["tl", "bl"],
        "rounded-s" => &["ss", "es"],
        "rounded-e" => &["se", "ee"],
        _ => &[],
    };

    if group.starts_with("rounded") {
        return fixed.iter().map(|corner| format!("rounded-{corner}")).collect();
    }

    if let Some(kind) = ["border-w", "border-color"]
        .into_iter()
        .find(|kind| group.starts_with(kind))
    {
        let sides: &[&str] = match group.strip_prefix(kind) {
            Some("") => SIDES,
            Some("-x") => &["r", "l"],
            Some("-y") => &["t", "b"],
            _ => &[],
        };
        return sides.iter().map(|side| format!("{kind}-{side}")).collect();
    }

    fixed.iter().map(|g| (*g).to_string()).collect()
}
