use super::matcher::{ZONE_RULES, match_zone};
use super::{Result, ZoneError, ZoneRecord};
use crate::dns::resource::DNSResource;
use tracing::debug;

/// TTL shared by every canned record
pub const ZONE_TTL: u32 = 300;

const SOA_TEMPLATE: &str =
    "@ SOA prisoner.iana.org. hostmaster.root-servers.org. 2002040800 1800 900 604800 604800";
const NS1_TEMPLATE: &str = "@ NS blackhole-1.iana.org.";
const NS2_TEMPLATE: &str = "@ NS blackhole-2.iana.org.";

/// One served reverse-lookup zone and its canned apex records.
///
/// The records are templates: responses take clones, never the originals.
#[derive(Debug, Clone)]
pub struct Zone {
    apex: String,
    soa: DNSResource,
    ns1: DNSResource,
    ns2: DNSResource,
}

impl Zone {
    pub fn new(apex: &str) -> Result<Self> {
        let apex = apex.trim_end_matches('.').to_ascii_lowercase();
        let build = |template: &str| -> Result<DNSResource> {
            ZoneRecord::parse(template)?.to_dns_resource(&apex, ZONE_TTL)
        };

        Ok(Self {
            soa: build(SOA_TEMPLATE)?,
            ns1: build(NS1_TEMPLATE)?,
            ns2: build(NS2_TEMPLATE)?,
            apex,
        })
    }

    /// Apex name without the trailing dot
    pub fn apex(&self) -> &str {
        &self.apex
    }

    pub fn soa(&self) -> &DNSResource {
        &self.soa
    }

    pub fn ns1(&self) -> &DNSResource {
        &self.ns1
    }

    pub fn ns2(&self) -> &DNSResource {
        &self.ns2
    }
}

/// Outcome of looking a query name up in the catalog
#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'a> {
    pub zone: Option<&'a Zone>,
    /// Labels below the matched apex; zero when nothing matched
    pub extra_depth: usize,
}

impl MatchResult<'_> {
    pub fn no_match() -> Self {
        MatchResult {
            zone: None,
            extra_depth: 0,
        }
    }
}

/// The fixed set of served zones. Built once at startup and shared
/// read-only between all query handlers.
#[derive(Debug)]
pub struct Catalog {
    zones: Vec<Zone>,
}

impl Catalog {
    pub fn build() -> Result<Self> {
        let mut zones = Vec::new();
        for rule in ZONE_RULES.iter() {
            for apex in rule.apexes() {
                zones.push(Zone::new(&apex)?);
            }
        }
        debug!("Built zone catalog with {} zones", zones.len());
        Ok(Self { zones })
    }

    pub fn get(&self, index: usize) -> Result<&Zone> {
        self.zones
            .get(index)
            .ok_or(ZoneError::IndexOutOfRange(index))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    /// Classify a query name (leaf label first) against the served zones.
    pub fn lookup<S: AsRef<str>>(&self, labels: &[S]) -> MatchResult<'_> {
        match match_zone(labels) {
            Some(m) => match self.zones.get(m.index) {
                Some(zone) => MatchResult {
                    zone: Some(zone),
                    extra_depth: m.extra_depth,
                },
                None => MatchResult::no_match(),
            },
            None => MatchResult::no_match(),
        }
    }
}
