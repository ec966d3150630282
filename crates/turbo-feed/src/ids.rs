//! Identifier newtypes.
//!
//! Backend ids are opaque strings. Each entity gets its own type so a
//! follower id cannot be passed where a creator id is expected.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        /// Ids bind as text parameters.
        impl From<&$name> for turbo_db::Value {
            fn from(id: &$name) -> Self {
                turbo_db::Value::Text(id.0.clone())
            }
        }
    };
}

define_id!(
    /// An affiliate product.
    ProductId
);
define_id!(
    /// A creator who publishes products.
    CreatorId
);
define_id!(
    /// A viewer of the feed.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_transparent_in_json() {
        let id = UserId::new("u1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u1\"");
        let back: UserId = serde_json::from_str("\"u1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_set_lookup_by_str() {
        let followed: HashSet<CreatorId> = ["c1", "c2"].into_iter().map(CreatorId::from).collect();
        assert!(followed.contains("c2"));
        assert!(!followed.contains("c3"));
    }

    #[test]
    fn test_ids_sort_lexically() {
        let mut ids = vec![ProductId::new("p10"), ProductId::new("p02")];
        ids.sort();
        assert_eq!(ids[0].to_string(), "p02");
    }

    #[test]
    fn test_id_binds_as_text() {
        let value = turbo_db::Value::from(&CreatorId::new("c9"));
        assert_eq!(value.as_text(), Some("c9"));
    }
}
