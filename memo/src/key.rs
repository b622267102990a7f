//! Cache key derivation.

use crate::domain::CacheKey;
use serde::Serialize;
use serde_json::Value;
use shared::{Error, Result, TtlSecs};
use url::Url;

/// Authority the default generator places every key under
pub const RESERVED_AUTHORITY: &str = "memo.internal";

/// Everything a key generator may look at for one call
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation<'a> {
    pub owner: &'a str,
    pub method: &'a str,
    /// Positional arguments, always a JSON array
    pub args: Value,
    pub ttl: TtlSecs,
}

impl<'a> Invocation<'a> {
    pub fn new<A>(owner: &'a str, method: &'a str, args: &A, ttl: TtlSecs) -> Result<Self>
    where
        A: ArgumentList + ?Sized,
    {
        Ok(Self {
            owner,
            method,
            args: Value::Array(args.to_list()?),
            ttl,
        })
    }
}

/// Positional arguments of a memoized call.
///
/// `()` is the empty list and an n-tuple is a list of n values, so a single
/// argument is passed as a 1-tuple: `(None::<u32>,)` becomes `[null]`.
pub trait ArgumentList {
    fn to_list(&self) -> Result<Vec<Value>>;
}

impl ArgumentList for () {
    fn to_list(&self) -> Result<Vec<Value>> {
        Ok(Vec::new())
    }
}

macro_rules! tuple_argument_list {
    ($($idx:tt : $name:ident),+) => {
        impl<$($name: Serialize),+> ArgumentList for ($($name,)+) {
            fn to_list(&self) -> Result<Vec<Value>> {
                Ok(vec![$(serde_json::to_value(&self.$idx)?),+])
            }
        }
    };
}

tuple_argument_list!(0: A);
tuple_argument_list!(0: A, 1: B);
tuple_argument_list!(0: A, 1: B, 2: C);
tuple_argument_list!(0: A, 1: B, 2: C, 3: D);
tuple_argument_list!(0: A, 1: B, 2: C, 3: D, 4: E);
tuple_argument_list!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F);
tuple_argument_list!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G);
tuple_argument_list!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H);

/// Turns an invocation into the key its result is stored under
pub trait KeyGenerator: Send + Sync + 'static {
    fn generate(&self, invocation: &Invocation<'_>) -> Result<CacheKey>;
}

impl<F> KeyGenerator for F
where
    F: Fn(&Invocation<'_>) -> Result<CacheKey> + Send + Sync + 'static,
{
    fn generate(&self, invocation: &Invocation<'_>) -> Result<CacheKey> {
        self(invocation)
    }
}

/// Default generator: `<owner>:<method>:<args>:<ttl>` as the single path
/// segment of `https://memo.internal/`.
#[derive(Clone, Debug, Default)]
pub struct UrlKeyGenerator;

impl UrlKeyGenerator {
    pub fn new() -> Self {
        Self
    }

    fn raw_key(invocation: &Invocation<'_>) -> Result<String> {
        let args = serde_json::to_string(&invocation.args)?;
        Ok(format!(
            "{}:{}:{}:{}",
            invocation.owner, invocation.method, args, invocation.ttl
        ))
    }
}

impl KeyGenerator for UrlKeyGenerator {
    fn generate(&self, invocation: &Invocation<'_>) -> Result<CacheKey> {
        let raw = Self::raw_key(invocation)?;

        let mut url = Url::parse(&format!("https://{RESERVED_AUTHORITY}/"))
            .map_err(|e| Error::InvalidKey(e.to_string()))?;
        // Pushing as one segment percent-encodes '/' and '%', so distinct raw keys stay distinct
        url.path_segments_mut()
            .map_err(|_| Error::InvalidKey(format!("cannot embed {raw:?} in a url path")))?
            .pop_if_empty()
            .push(&raw);

        Ok(CacheKey::new(url.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    fn key_for<A: ArgumentList + ?Sized>(owner: &str, method: &str, args: &A, ttl: u64) -> String {
        let invocation = Invocation::new(owner, method, args, TtlSecs(ttl)).unwrap();
        UrlKeyGenerator::new()
            .generate(&invocation)
            .unwrap()
            .into_string()
    }

    #[test]
    fn test_argument_list_shapes() {
        let ttl = TtlSecs(1);
        let unit = Invocation::new("A", "m", &(), ttl).unwrap();
        assert_eq!(unit.args, serde_json::json!([]));

        let tuple = Invocation::new("A", "m", &("x", 2), ttl).unwrap();
        assert_eq!(tuple.args, serde_json::json!(["x", 2]));

        let single = Invocation::new("A", "m", &(7,), ttl).unwrap();
        assert_eq!(single.args, serde_json::json!([7]));

        let none = Invocation::new("A", "m", &(None::<u32>,), ttl).unwrap();
        assert_eq!(none.args, serde_json::json!([null]));
    }

    #[test]
    fn test_absent_and_empty_arguments_get_distinct_keys() {
        let absent = key_for("Svc", "find", &(None::<Vec<u32>>,), 60);
        let empty = key_for("Svc", "find", &(Some(Vec::<u32>::new()),), 60);
        let no_args = key_for("Svc", "find", &(), 60);

        assert_eq!(absent, "https://memo.internal/Svc:find:[null]:60");
        assert_eq!(empty, "https://memo.internal/Svc:find:[[]]:60");
        assert_eq!(no_args, "https://memo.internal/Svc:find:[]:60");
        assert_ne!(absent, empty);
    }

    #[test]
    fn test_unserializable_argument_is_an_error() {
        let mut by_pair = HashMap::new();
        by_pair.insert((1u32, 2u32), 3u32);

        let result = Invocation::new("Svc", "sum", &(by_pair,), TtlSecs(60));
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_default_key_format() {
        assert_eq!(
            key_for("Counter", "increment", &(), 3600),
            "https://memo.internal/Counter:increment:[]:3600"
        );
        assert_eq!(
            key_for("Users", "find", &("a b", 1), 60),
            "https://memo.internal/Users:find:[%22a%20b%22,1]:60"
        );
    }

    #[test]
    fn test_key_is_deterministic() {
        let mut first = BTreeMap::new();
        first.insert("b", 2);
        first.insert("a", 1);
        let mut second = BTreeMap::new();
        second.insert("a", 1);
        second.insert("b", 2);

        assert_eq!(
            key_for("Svc", "get", &(&first,), 60),
            key_for("Svc", "get", &(&second,), 60)
        );
    }

    #[test]
    fn test_ttl_changes_key() {
        assert_ne!(
            key_for("Counter", "increment", &(), 60),
            key_for("Counter", "increment", &(), 120)
        );
    }

    #[test]
    fn test_slashes_and_percent_signs_stay_distinct() {
        let slash = key_for("Files", "read", &("a/b",), 1);
        let encoded = key_for("Files", "read", &("a%2Fb",), 1);

        assert!(slash.starts_with("https://memo.internal/Files:read:"));
        assert_ne!(slash, encoded);
        assert!(!slash["https://memo.internal/".len()..].contains('/'));
    }

    #[test]
    fn test_closure_generator() {
        let generator = |invocation: &Invocation<'_>| -> Result<CacheKey> {
            Ok(CacheKey::new(format!("{}.{}", invocation.owner, invocation.method)))
        };
        let invocation = Invocation::new("Svc", "get", &(1,), TtlSecs(5)).unwrap();

        assert_eq!(generator.generate(&invocation).unwrap().as_str(), "Svc.get");
    }
}
