//! Maven version ordering.
//!
//! Versions are split into items at `.`, at `-` and at every switch between
//! digits and letters. A `-` or a digit/letter switch opens a nested list, so
//! `1.0-alpha-2` is `[1, [alpha, [2]]]`. Numbers compare numerically,
//! qualifiers by their rank (`alpha < beta < milestone < rc < snapshot <
//! release < sp`, then unknown qualifiers alphabetically), and trailing
//! zero items do not count: `1.0 == 1 == 1.0.0` in ordering.

use std::{cmp::Ordering, fmt, hash, str::FromStr};

const QUALIFIERS: [&str; 7] = ["alpha", "beta", "milestone", "rc", "snapshot", "", "sp"];
const RELEASE_RANK: &str = "5";

/// Suffix of a moving snapshot version.
pub const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    /// Digits without leading zeros, "0" for zero.
    Int(String),
    Qualifier(String),
    List(Vec<Item>),
}

impl Item {
    fn int(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        Item::Int(if trimmed.is_empty() { "0".into() } else { trimmed.into() })
    }

    fn qualifier(value: &str, followed_by_digit: bool) -> Self {
        let value = match value {
            "a" if followed_by_digit => "alpha",
            "b" if followed_by_digit => "beta",
            "m" if followed_by_digit => "milestone",
            "ga" | "final" | "release" => "",
            "cr" => "rc",
            other => other,
        };
        Item::Qualifier(value.into())
    }

    fn parse(token: &str, digits: bool) -> Self {
        if digits {
            Item::int(token)
        } else {
            Item::qualifier(token, false)
        }
    }

    fn is_null(&self) -> bool {
        match self {
            Item::Int(digits) => digits == "0",
            Item::Qualifier(value) => value.is_empty(),
            Item::List(items) => items.is_empty(),
        }
    }
}

fn qualifier_rank(value: &str) -> String {
    match QUALIFIERS.iter().position(|q| *q == value) {
        Some(rank) => rank.to_string(),
        None => format!("{}-{}", QUALIFIERS.len(), value),
    }
}

fn cmp_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare(item: &Item, other: Option<&Item>) -> Ordering {
    use Item::*;

    match (item, other) {
        (Int(a), None) => {
            if a == "0" {
                Ordering::Equal
            } else {
                Ordering::Greater
            }
        }
        (Int(a), Some(Int(b))) => cmp_digits(a, b),
        (Int(_), Some(_)) => Ordering::Greater,

        (Qualifier(a), None) => qualifier_rank(a).as_str().cmp(RELEASE_RANK),
        (Qualifier(a), Some(Qualifier(b))) => qualifier_rank(a).cmp(&qualifier_rank(b)),
        (Qualifier(_), Some(_)) => Ordering::Less,

        (List(items), None) => items
            .first()
            .map_or(Ordering::Equal, |first| compare(first, None)),
        (List(_), Some(Int(_))) => Ordering::Less,
        (List(_), Some(Qualifier(_))) => Ordering::Greater,
        (List(left), Some(List(right))) => compare_lists(left, right),
    }
}

fn compare_lists(left: &[Item], right: &[Item]) -> Ordering {
    let len = left.len().max(right.len());
    for i in 0..len {
        let result = match (left.get(i), right.get(i)) {
            (Some(l), r) => compare(l, r),
            (None, Some(r)) => compare(r, None).reverse(),
            (None, None) => Ordering::Equal,
        };
        if result != Ordering::Equal {
            return result;
        }
    }
    Ordering::Equal
}

fn normalize(items: &mut Vec<Item>) {
    let mut i = items.len();
    while i > 0 {
        i -= 1;
        if items[i].is_null() {
            items.remove(i);
        } else if !matches!(items[i], Item::List(_)) {
            break;
        }
    }
}

fn parse_items(version: &str) -> Vec<Item> {
    let version = version.to_lowercase();

    // Every new list is appended to the list before it, so the lists form a chain.
    let mut chain: Vec<Vec<Item>> = vec![Vec::new()];
    let mut digits = false;
    let mut start = 0;

    for (i, c) in version.char_indices() {
        let current = chain.len() - 1;
        match c {
            '.' | '-' => {
                let item = if i == start {
                    Item::int("0")
                } else {
                    Item::parse(&version[start..i], digits)
                };
                chain[current].push(item);
                start = i + c.len_utf8();
                if c == '-' {
                    chain.push(Vec::new());
                }
            }
            c if c.is_ascii_digit() => {
                if !digits && i > start {
                    chain[current].push(Item::qualifier(&version[start..i], true));
                    start = i;
                    chain.push(Vec::new());
                }
                digits = true;
            }
            _ => {
                if digits && i > start {
                    chain[current].push(Item::int(&version[start..i]));
                    start = i;
                    chain.push(Vec::new());
                }
                digits = false;
            }
        }
    }

    if version.len() > start {
        let last = chain.len() - 1;
        chain[last].push(Item::parse(&version[start..], digits));
    }

    let innermost = chain.pop().unwrap_or_default();
    fold_chain(innermost, chain)
}

/// Normalize lists innermost first, nesting each into the list before it.
fn fold_chain(mut innermost: Vec<Item>, mut chain: Vec<Vec<Item>>) -> Vec<Item> {
    normalize(&mut innermost);
    while let Some(mut parent) = chain.pop() {
        parent.push(Item::List(innermost));
        normalize(&mut parent);
        innermost = parent;
    }
    innermost
}

/// Error returned for strings which cannot be Maven versions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InvalidMavenVersion(&'static str);

/// A Maven version with Maven's ordering semantics.
///
/// Equality is on the written form; ordering follows Maven, with the written
/// form breaking ties between versions Maven considers equivalent.
#[derive(Clone)]
pub struct MavenVersion {
    raw: String,
    items: Vec<Item>,
}

impl MavenVersion {
    /// Parse a version.
    pub fn parse(version: &str) -> Result<Self, InvalidMavenVersion> {
        if version.is_empty() {
            return Err(InvalidMavenVersion("version is empty"));
        }
        if version == "." || version == ".." {
            return Err(InvalidMavenVersion("version is a relative path segment"));
        }
        if version
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_whitespace() || c.is_control())
        {
            return Err(InvalidMavenVersion(
                "version contains separators or whitespace",
            ));
        }

        Ok(Self {
            raw: version.to_owned(),
            items: parse_items(version),
        })
    }

    /// The version as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Is this a `-SNAPSHOT` or a timestamped snapshot version?
    pub fn is_snapshot(&self) -> bool {
        self.raw.ends_with(SNAPSHOT_SUFFIX) || timestamped_base(&self.raw).is_some()
    }

    /// The directory version: timestamped snapshots live in their `-SNAPSHOT` directory.
    pub fn base_version(&self) -> String {
        match timestamped_base(&self.raw) {
            Some(base) => format!("{base}{SNAPSHOT_SUFFIX}"),
            None => self.raw.clone(),
        }
    }

    /// Compare by Maven semantics only, without the tie break on the written form.
    pub fn cmp_semantic(&self, other: &Self) -> Ordering {
        compare_lists(&self.items, &other.items)
    }
}

/// For `1.0-20240101.101010-3` returns `1.0`.
pub(crate) fn timestamped_base(version: &str) -> Option<&str> {
    let (rest, build) = version.rsplit_once('-')?;
    let (base, timestamp) = rest.rsplit_once('-')?;

    let build_ok = !build.is_empty() && build.bytes().all(|b| b.is_ascii_digit());
    let timestamp_ok = timestamp.len() == 15
        && timestamp.bytes().enumerate().all(|(i, b)| {
            if i == 8 {
                b == b'.'
            } else {
                b.is_ascii_digit()
            }
        });

    (build_ok && timestamp_ok && !base.is_empty()).then_some(base)
}

impl fmt::Debug for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MavenVersion").field(&self.raw).finish()
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for MavenVersion {
    type Err = InvalidMavenVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MavenVersion::parse(s)
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for MavenVersion {}

impl hash::Hash for MavenVersion {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_semantic(other)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> MavenVersion {
        MavenVersion::parse(s).unwrap()
    }

    fn assert_order(versions: &[&str]) {
        for pair in versions.windows(2) {
            assert_eq!(
                v(pair[0]).cmp_semantic(&v(pair[1])),
                Ordering::Less,
                "{} < {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn qualifier_order() {
        assert_order(&[
            "1.0-alpha-1",
            "1.0-beta-1",
            "1.0-milestone-1",
            "1.0-rc-1",
            "1.0-SNAPSHOT",
            "1.0",
            "1.0-sp-1",
            "1.0-whatever",
            "1.0.1",
        ]);
    }

    #[test]
    fn numeric_items_compare_numerically() {
        assert_order(&["1.2", "1.10", "1.10.1", "2", "10"]);
        assert_order(&["1.0.9", "1.0.10"]);
    }

    #[test]
    fn trailing_zeros_are_insignificant() {
        assert_eq!(v("1").cmp_semantic(&v("1.0.0")), Ordering::Equal);
        assert_eq!(v("1.0-ga").cmp_semantic(&v("1")), Ordering::Equal);
        assert_eq!(v("1.0-final").cmp_semantic(&v("1.0")), Ordering::Equal);
        assert_ne!(v("1"), v("1.0.0"));
        assert_eq!(v("1").cmp(&v("1.0.0")), "1".cmp("1.0.0"));
    }

    #[test]
    fn short_qualifier_aliases() {
        assert_eq!(v("1.0a1").cmp_semantic(&v("1.0-alpha-1")), Ordering::Equal);
        assert_eq!(v("1.0b2").cmp_semantic(&v("1.0-beta-2")), Ordering::Equal);
        assert_eq!(v("1.0-cr1").cmp_semantic(&v("1.0-rc1")), Ordering::Equal);
    }

    #[test]
    fn large_numbers() {
        assert_order(&["1.99999999999999999999", "1.100000000000000000000"]);
    }

    #[test]
    fn snapshot_detection() {
        assert!(v("1.0-SNAPSHOT").is_snapshot());
        assert!(v("1.0-20240101.101010-3").is_snapshot());
        assert!(!v("1.0-3").is_snapshot());
        assert!(!v("1.0").is_snapshot());
        assert_eq!(v("1.0-20240101.101010-3").base_version(), "1.0-SNAPSHOT");
        assert_eq!(v("2.1").base_version(), "2.1");
    }

    #[test]
    fn rejects_path_like_versions() {
        assert!(MavenVersion::parse("").is_err());
        assert!(MavenVersion::parse("..").is_err());
        assert!(MavenVersion::parse("1.0/2").is_err());
        assert!(MavenVersion::parse("1 0").is_err());
    }
}
