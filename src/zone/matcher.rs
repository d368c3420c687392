//! Classification of reverse-lookup names onto the served zones.
//!
//! Names arrive leaf first, exactly as decoded from the wire. The two
//! root-most labels are assumed to be `in-addr.arpa`; dispatch checks that
//! before a name gets here.

use std::ops::RangeInclusive;

/// Labels in an `in-addr.arpa` suffix
const SUFFIX_LABELS: usize = 2;

/// One row of the classification table. A rule covers either a whole /8
/// (`second == None`) or a contiguous run of /16s under the same first octet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRule {
    pub first: u32,
    pub second: Option<RangeInclusive<u32>>,
}

/// Served zones, in catalog order. The catalog is generated from this table,
/// so catalog index `n` is the `n`th zone produced by walking it.
pub static ZONE_RULES: [ZoneRule; 4] = [
    // 10.0.0.0/8
    ZoneRule {
        first: 10,
        second: None,
    },
    // 169.254.0.0/16
    ZoneRule {
        first: 169,
        second: Some(254..=254),
    },
    // 192.168.0.0/16
    ZoneRule {
        first: 192,
        second: Some(168..=168),
    },
    // 172.16.0.0/12
    ZoneRule {
        first: 172,
        second: Some(16..=31),
    },
];

impl ZoneRule {
    /// Number of zones this rule contributes to the catalog
    pub fn zone_count(&self) -> usize {
        match &self.second {
            None => 1,
            Some(range) => (range.end() - range.start() + 1) as usize,
        }
    }

    /// Labels in the apex of zones under this rule
    pub fn apex_labels(&self) -> usize {
        match self.second {
            None => SUFFIX_LABELS + 1,
            Some(_) => SUFFIX_LABELS + 2,
        }
    }

    /// Apex names of the zones under this rule, in catalog order
    pub fn apexes(&self) -> Vec<String> {
        match &self.second {
            None => vec![format!("{}.in-addr.arpa", self.first)],
            Some(range) => range
                .clone()
                .map(|second| format!("{}.{}.in-addr.arpa", second, self.first))
                .collect(),
        }
    }

    /// Offset within this rule's zones for the given octets, if covered
    fn offset_of(&self, first: u32, second: Option<u32>) -> Option<usize> {
        if first != self.first {
            return None;
        }
        match &self.second {
            None => Some(0),
            Some(range) => {
                let second = second?;
                if range.contains(&second) {
                    Some((second - range.start()) as usize)
                } else {
                    None
                }
            }
        }
    }
}

/// Matched catalog index plus the labels left below that zone's apex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneMatch {
    pub index: usize,
    pub extra_depth: usize,
}

/// Map a query name onto a catalog index. `None` when the address octets
/// are malformed, missing, or outside every served range.
pub fn match_zone<S: AsRef<str>>(labels: &[S]) -> Option<ZoneMatch> {
    let mut labels: Vec<&str> = labels
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| !l.is_empty())
        .collect();
    let total = labels.len();
    labels.reverse();

    let mut octets = labels.into_iter().skip(SUFFIX_LABELS);
    let first = parse_octet(octets.next()?)?;

    // The second label is only examined once a rule asks for it, so anything
    // may sit below a /8 apex.
    let mut second: Option<Option<u32>> = None;
    let mut base = 0;
    for rule in ZONE_RULES.iter() {
        let candidate = match rule.second {
            None => None,
            Some(_) if first == rule.first => {
                *second.get_or_insert_with(|| octets.next().and_then(parse_octet))
            }
            Some(_) => None,
        };
        if let Some(offset) = rule.offset_of(first, candidate) {
            return Some(ZoneMatch {
                index: base + offset,
                extra_depth: total - rule.apex_labels(),
            });
        }
        base += rule.zone_count();
    }

    None
}

/// Strict decimal label: non-empty and ASCII digits only. Values that do not
/// fit in a `u32` can never name a served range and are rejected.
pub fn parse_octet(label: &str) -> Option<u32> {
    if label.is_empty() || !label.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    label.parse().ok()
}
