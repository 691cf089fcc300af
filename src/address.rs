//! URI-form addresses of keys and values
//!
//! ```text
//! <view>://<hive>/<segment>/.../[<value name>]
//! ```
//!
//! The trailing slash is the only thing that distinguishes a key from a
//! value: `registry://HKEY_CURRENT_USER/Software/Vendor/` is the key
//! `Software\Vendor`, while `registry://HKEY_CURRENT_USER/Software/Vendor`
//! is the value `Vendor` inside the key `Software`. An address without
//! any path (`registry://HKEY_USERS`) denotes the root key.
//!
//! Relative references are resolved with standard RFC 3986 rules, so `.`,
//! `..` and absolute addresses behave exactly as they do for URLs.

use crate::error::{Error, Result};
use crate::selector::{Hive, View};
use crate::store::KeyPath;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Characters escaped when a store name becomes a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// An absolute address of a key or value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    url: Url,
}

impl Address {
    /// Parse an absolute address
    ///
    /// # Errors
    ///
    /// Returns [`Error::AddressParse`] if `input` is not an absolute URI.
    pub fn parse(input: &str) -> Result<Self> {
        Url::parse(input)
            .map(|url| Self { url })
            .map_err(|source| Error::AddressParse {
                input: input.to_string(),
                source,
            })
    }

    /// Address of the key at `path` under `hive`/`view`
    ///
    /// # Errors
    ///
    /// Returns [`Error::AddressParse`] if the encoded path cannot be resolved.
    pub fn for_key(hive: Hive, view: View, path: &KeyPath) -> Result<Self> {
        let root = Self::parse(&format!("{}://{}/", view.as_token(), hive.as_token()))?;
        let mut relative = String::from("./");
        for segment in path.segments() {
            relative.extend(utf8_percent_encode(segment, SEGMENT));
            relative.push('/');
        }
        root.join(&relative)
    }

    /// Resolve a relative (or absolute) reference against this address
    ///
    /// # Errors
    ///
    /// Returns [`Error::AddressParse`] if `reference` is malformed.
    pub fn join(&self, reference: &str) -> Result<Self> {
        self.url
            .join(reference)
            .map(|url| Self { url })
            .map_err(|source| Error::AddressParse {
                input: reference.to_string(),
                source,
            })
    }

    /// Address of a direct child named `name` of this key
    ///
    /// The name is escaped into exactly one segment, so names containing
    /// `/`, `#`, `:` and the like survive the trip. `.` and `..` cannot be
    /// addressed: URI resolution treats them (escaped or not) as dot-segments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if this address is not a key or `name`
    /// is a dot-segment.
    pub fn child(&self, name: &str, is_container: bool) -> Result<Self> {
        if !self.is_container() {
            return Err(Error::invalid_path(self, "children exist only below a key"));
        }
        if is_dot_segment(name) {
            return Err(Error::invalid_path(
                self,
                format!("'{name}' cannot be addressed as a child"),
            ));
        }
        let mut relative = format!("./{}", utf8_percent_encode(name, SEGMENT));
        if is_container {
            relative.push('/');
        }
        self.join(&relative)
    }

    /// Whether this address denotes a key (container) rather than a value
    #[must_use]
    pub fn is_container(&self) -> bool {
        let path = self.url.path();
        path.is_empty() || path.ends_with('/')
    }

    /// The value name (final segment, decoded); empty for keys
    #[must_use]
    pub fn leaf_name(&self) -> String {
        let path = self.url.path();
        let last = path.rsplit('/').next().unwrap_or_default();
        decode(last)
    }

    /// The key containing the addressed value, or the addressed key itself
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyName`] if a decoded segment is not a valid key name.
    pub fn key_path(&self) -> Result<KeyPath> {
        let path = self.url.path();
        let dir = path.rfind('/').map_or("", |idx| &path[..idx]);
        KeyPath::from_segments(dir.split('/').filter(|s| !s.is_empty()).map(decode))
    }

    /// Decode the hive and view selected by this address
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSelector`] for an unknown scheme or authority.
    pub fn coordinate(&self) -> Result<(Hive, View)> {
        let hive = self.url.host_str().unwrap_or_default().parse::<Hive>()?;
        let view = self.url.scheme().parse::<View>()?;
        Ok((hive, view))
    }

    /// This address written relative to `base`, if they share view and hive
    #[must_use]
    pub fn relative_to(&self, base: &Address) -> Option<String> {
        base.url.make_relative(&self.url)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// Whether `name` would be consumed by reference resolution
pub(crate) fn is_dot_segment(name: &str) -> bool {
    name == "." || name == ".."
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
