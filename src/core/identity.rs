//! Purpose: Render a Rust type as the root `$type` tag of a tagged document.
//! Exports: `TypeIdentity`.
//! Role: Stand-in for runtime type names; built from `std::any::type_name`.
//! Invariants: Rendering is deterministic for a given compiler and type.
//! Invariants: Types serde encodes identically share one identity: references,
//! `Box`/`Rc`/`Arc`/`Shared` wrappers, and slices or arrays versus `Vec`.
//! Invariants: A reader accepts either rendering style, so documents written with
//! `Full` remain readable under a `Simple` policy and vice versa.
use std::any;

use crate::core::cycle::Shared;
use crate::core::policy::AssemblyStyle;

const VEC_PATH: &str = "alloc::vec::Vec";
const POINTER_PATHS: [&str; 3] = ["alloc::boxed::Box", "alloc::rc::Rc", "alloc::sync::Arc"];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeIdentity {
    path: String,
}

impl TypeIdentity {
    pub fn of<T: ?Sized>() -> Self {
        Self {
            path: normalize(any::type_name::<T>()),
        }
    }

    /// Crate owning the outermost type, if the type has a path at all.
    pub fn crate_name(&self) -> Option<&str> {
        let head = self
            .path
            .split(|c: char| !is_path_char(c))
            .next()
            .unwrap_or_default();
        head.split_once("::").map(|(krate, _)| krate)
    }

    pub fn render(&self, style: AssemblyStyle) -> String {
        let name = match style {
            AssemblyStyle::Simple => shorten_paths(&self.path),
            AssemblyStyle::Full => self.path.clone(),
        };
        match self.crate_name() {
            Some(krate) => format!("{name}, {krate}"),
            None => name,
        }
    }

    pub fn matches(&self, tag: &str) -> bool {
        tag == self.render(AssemblyStyle::Simple) || tag == self.render(AssemblyStyle::Full)
    }
}

fn is_path_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == ':'
}

fn is_pointer(head: &str) -> bool {
    if POINTER_PATHS.contains(&head) {
        return true;
    }
    let shared = any::type_name::<Shared<()>>();
    shared.strip_suffix("<()>") == Some(head)
}

// `&[a::B; 2]` -> `alloc::vec::Vec<a::B>`, `Box<&a::B>` -> `a::B`
fn normalize(path: &str) -> String {
    let path = path.trim();
    if let Some(rest) = path.strip_prefix("&mut ") {
        return normalize(rest);
    }
    if let Some(rest) = path.strip_prefix('&') {
        return normalize(rest);
    }
    if let Some(inner) = path.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        let element = split_top_level(inner, ';').into_iter().next().unwrap_or(inner);
        return format!("{VEC_PATH}<{}>", normalize(element));
    }
    if let Some(inner) = path.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        let items: Vec<String> = split_top_level(inner, ',')
            .into_iter()
            .filter(|item| !item.trim().is_empty())
            .map(normalize)
            .collect();
        return match items.as_slice() {
            [single] if inner.trim_end().ends_with(',') => format!("({single},)"),
            _ => format!("({})", items.join(", ")),
        };
    }
    if let (Some(open), true) = (path.find('<'), path.ends_with('>')) {
        let head = &path[..open];
        let args: Vec<String> = split_top_level(&path[open + 1..path.len() - 1], ',')
            .into_iter()
            .map(normalize)
            .collect();
        if is_pointer(head) {
            return args.into_iter().next().unwrap_or_else(|| head.to_string());
        }
        return format!("{head}<{}>", args.join(", "));
    }
    path.to_string()
}

// Splits on `sep` outside any brackets; `->` in fn types does not close a bracket.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut prev = '\0';
    for (index, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' if prev == '-' => {}
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            _ if c == sep && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
        prev = c;
    }
    parts.push(&text[start..]);
    parts
}

// `a::b::C<d::E>` -> `C<E>`
fn shorten_paths(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut token = String::new();
    for c in path.chars() {
        if is_path_char(c) {
            token.push(c);
            continue;
        }
        push_last_segment(&mut out, &token);
        token.clear();
        out.push(c);
    }
    push_last_segment(&mut out, &token);
    out
}

fn push_last_segment(out: &mut String, token: &str) {
    if token.is_empty() {
        return;
    }
    out.push_str(token.rsplit("::").next().unwrap_or(token));
}

#[cfg(test)]
mod tests {
    use super::TypeIdentity;
    use crate::core::cycle::Shared;
    use crate::core::policy::AssemblyStyle;
    use std::marker::PhantomData;
    use std::rc::Rc;
    use std::sync::Arc;

    struct Marker;
    struct Pair<K, V>(PhantomData<(K, V)>);

    #[test]
    fn simple_style_keeps_type_name_and_crate() {
        let identity = TypeIdentity::of::<Marker>();
        assert_eq!(identity.render(AssemblyStyle::Simple), "Marker, jsonfile");
        assert_eq!(
            identity.render(AssemblyStyle::Full),
            "jsonfile::core::identity::tests::Marker, jsonfile"
        );
    }

    #[test]
    fn simple_style_shortens_generic_arguments() {
        let identity = TypeIdentity::of::<Pair<Marker, String>>();
        assert_eq!(
            identity.render(AssemblyStyle::Simple),
            "Pair<Marker, String>, jsonfile"
        );
    }

    #[test]
    fn primitives_render_without_crate() {
        let identity = TypeIdentity::of::<u32>();
        assert_eq!(identity.crate_name(), None);
        assert_eq!(identity.render(AssemblyStyle::Simple), "u32");
        assert_eq!(
            TypeIdentity::of::<(u8, String)>().render(AssemblyStyle::Simple),
            "(u8, String)"
        );
    }

    #[test]
    fn matches_accepts_either_style() {
        let identity = TypeIdentity::of::<Marker>();
        assert!(identity.matches("Marker, jsonfile"));
        assert!(identity.matches(&identity.render(AssemblyStyle::Full)));
        assert!(!identity.matches("Other, jsonfile"));
        assert!(!TypeIdentity::of::<String>().matches("Marker, jsonfile"));
    }

    #[test]
    fn references_and_smart_pointers_share_the_pointee_identity() {
        let plain = TypeIdentity::of::<Marker>();
        assert_eq!(TypeIdentity::of::<&Marker>(), plain);
        assert_eq!(TypeIdentity::of::<&&mut Marker>(), plain);
        assert_eq!(TypeIdentity::of::<Box<Marker>>(), plain);
        assert_eq!(TypeIdentity::of::<Rc<Marker>>(), plain);
        assert_eq!(TypeIdentity::of::<Arc<Box<Marker>>>(), plain);
        assert_eq!(TypeIdentity::of::<Shared<Marker>>(), plain);
    }

    #[test]
    fn slices_and_arrays_share_the_vec_identity() {
        let vec = TypeIdentity::of::<Vec<u32>>();
        assert_eq!(vec.render(AssemblyStyle::Simple), "Vec<u32>, alloc");
        assert_eq!(TypeIdentity::of::<[u32]>(), vec);
        assert_eq!(TypeIdentity::of::<&[u32]>(), vec);
        assert_eq!(TypeIdentity::of::<[u32; 3]>(), vec);
        assert_eq!(
            TypeIdentity::of::<Vec<&Marker>>(),
            TypeIdentity::of::<Vec<Marker>>()
        );
    }

    #[test]
    fn tuples_normalize_each_element() {
        assert_eq!(
            TypeIdentity::of::<(&u8, Box<String>)>(),
            TypeIdentity::of::<(u8, String)>()
        );
        assert_eq!(TypeIdentity::of::<(u8,)>().render(AssemblyStyle::Simple), "(u8,)");
        assert_eq!(TypeIdentity::of::<()>().render(AssemblyStyle::Simple), "()");
    }
}
