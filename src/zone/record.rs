use super::{Result, ZoneError};
use crate::dns::constants::{MAX_LABEL_LEN, MAX_NAME_LEN};
use crate::dns::enums::{DNSResourceClass, DNSResourceType};
use crate::dns::resource::DNSResource;

/// A single record written in zone-file form, e.g. `@ NS blackhole-1.iana.org.`
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRecord {
    /// Owner name (`@`, relative or FQDN)
    pub name: String,
    /// Time to live in seconds
    pub ttl: Option<u32>,
    pub class: DNSResourceClass,
    pub rtype: DNSResourceType,
    /// Record data in presentation format
    pub rdata: String,
}

impl ZoneRecord {
    /// Parse a template line: `<name> [<ttl>] [IN] <type> <rdata...>`
    pub fn parse(line: &str) -> Result<Self> {
        let mut fields = line.split_whitespace().peekable();
        let name = fields
            .next()
            .ok_or_else(|| ZoneError::InvalidRecord(line.to_string()))?
            .to_string();

        let mut ttl = None;
        if let Some(value) = fields.peek().and_then(|f| f.parse::<u32>().ok()) {
            ttl = Some(value);
            fields.next();
        }

        let mut class = DNSResourceClass::IN;
        if fields.peek().is_some_and(|f| f.eq_ignore_ascii_case("IN")) {
            class = DNSResourceClass::IN;
            fields.next();
        }

        let type_field = fields
            .next()
            .ok_or_else(|| ZoneError::InvalidRecord(line.to_string()))?;
        let rtype = DNSResourceType::from_mnemonic(type_field)
            .ok_or_else(|| ZoneError::InvalidRRType(type_field.to_string()))?;

        let rdata = fields.collect::<Vec<_>>().join(" ");
        if rdata.is_empty() {
            return Err(ZoneError::InvalidRecord(line.to_string()));
        }

        Ok(Self {
            name,
            ttl,
            class,
            rtype,
            rdata,
        })
    }

    /// Convert to a DNS resource record with the given origin and default TTL
    pub fn to_dns_resource(&self, origin: &str, default_ttl: u32) -> Result<DNSResource> {
        let full_name = self.normalize_name(origin);
        let labels: Vec<String> = full_name
            .split('.')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        // Validates the owner name the same way rdata names are checked
        encode_domain_name(&full_name)?;

        let (rdata, parsed_rdata) = match self.rtype {
            DNSResourceType::SOA => self.parse_soa_record()?,
            DNSResourceType::NS => encode_domain_name(&self.rdata)?,
            other => return Err(ZoneError::InvalidRRType(format!("{:?}", other))),
        };

        Ok(DNSResource {
            labels,
            rtype: self.rtype,
            rclass: self.class,
            ttl: self.ttl.unwrap_or(default_ttl),
            rdlength: rdata.len() as u16,
            rdata,
            parsed_rdata: Some(parsed_rdata),
        })
    }

    fn normalize_name(&self, origin: &str) -> String {
        let name = self.name.trim();
        let origin = origin.trim_end_matches('.');

        if name == "@" || name.is_empty() {
            origin.to_string()
        } else if name.ends_with('.') {
            name.trim_end_matches('.').to_string()
        } else {
            format!("{}.{}", name, origin)
        }
    }

    /// SOA format: mname rname serial refresh retry expire minimum
    fn parse_soa_record(&self) -> Result<(Vec<u8>, String)> {
        let parts: Vec<&str> = self.rdata.split_whitespace().collect();
        if parts.len() != 7 {
            return Err(ZoneError::InvalidRecord(format!(
                "SOA record requires 7 fields, got {}",
                parts.len()
            )));
        }

        let mut rdata = Vec::new();
        let (mname, mname_text) = encode_domain_name(parts[0])?;
        let (rname, rname_text) = encode_domain_name(parts[1])?;
        rdata.extend_from_slice(&mname);
        rdata.extend_from_slice(&rname);

        let mut timers = Vec::with_capacity(5);
        for part in &parts[2..] {
            let value: u32 = part
                .parse()
                .map_err(|_| ZoneError::InvalidRecord(format!("Invalid SOA value: {}", part)))?;
            rdata.extend_from_slice(&value.to_be_bytes());
            timers.push(value.to_string());
        }

        Ok((
            rdata,
            format!("{} {} {}", mname_text, rname_text, timers.join(" ")),
        ))
    }
}

/// Encode a domain name into uncompressed wire form. Returns the bytes and
/// the name in canonical presentation form (lowercase, trailing dot).
pub fn encode_domain_name(name: &str) -> Result<(Vec<u8>, String)> {
    let mut bytes = Vec::new();
    let mut labels = Vec::new();
    for label in name.trim_end_matches('.').split('.') {
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return Err(ZoneError::InvalidDomainName(name.to_string()));
        }
        bytes.push(label.len() as u8);
        bytes.extend_from_slice(label.as_bytes());
        labels.push(label.to_ascii_lowercase());
    }
    bytes.push(0);

    if bytes.len() > MAX_NAME_LEN {
        return Err(ZoneError::InvalidDomainName(name.to_string()));
    }

    Ok((bytes, format!("{}.", labels.join("."))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ns_template() {
        let record = ZoneRecord::parse("@ NS blackhole-1.iana.org.").unwrap();
        assert_eq!(record.name, "@");
        assert_eq!(record.rtype, DNSResourceType::NS);
        assert_eq!(record.ttl, None);

        let rr = record.to_dns_resource("10.in-addr.arpa", 300).unwrap();
        assert_eq!(rr.labels, vec!["10", "in-addr", "arpa"]);
        assert_eq!(rr.ttl, 300);
        assert_eq!(rr.rclass, DNSResourceClass::IN);
        assert_eq!(rr.parsed_rdata.as_deref(), Some("blackhole-1.iana.org."));
        assert_eq!(rr.rdata, b"\x0bblackhole-1\x04iana\x03org\x00".to_vec());
        assert_eq!(rr.rdlength as usize, rr.rdata.len());
    }

    #[test]
    fn test_soa_rdata_layout() {
        let record = ZoneRecord::parse(
            "@ SOA prisoner.iana.org. hostmaster.root-servers.org. 2002040800 1800 900 0604800 604800",
        )
        .unwrap();
        let rr = record.to_dns_resource("168.192.in-addr.arpa.", 300).unwrap();

        let names = b"\x08prisoner\x04iana\x03org\x00\x0ahostmaster\x0croot-servers\x03org\x00";
        assert_eq!(&rr.rdata[..names.len()], &names[..]);
        let timers = &rr.rdata[names.len()..];
        assert_eq!(timers.len(), 20);
        assert_eq!(&timers[..4], &2002040800u32.to_be_bytes());
        assert_eq!(&timers[12..16], &604800u32.to_be_bytes());
        assert_eq!(
            rr.parsed_rdata.as_deref(),
            Some("prisoner.iana.org. hostmaster.root-servers.org. 2002040800 1800 900 604800 604800")
        );
    }

    #[test]
    fn test_explicit_ttl_and_class() {
        let record = ZoneRecord::parse("ns 60 IN NS a.example.").unwrap();
        assert_eq!(record.ttl, Some(60));
        let rr = record.to_dns_resource("example", 300).unwrap();
        assert_eq!(rr.ttl, 60);
        assert_eq!(rr.labels, vec!["ns", "example"]);
    }

    #[test]
    fn test_rejects_bad_templates() {
        assert!(matches!(
            ZoneRecord::parse("@ BOGUS x."),
            Err(ZoneError::InvalidRRType(_))
        ));
        assert!(ZoneRecord::parse("@ NS").is_err());
        let short_soa = ZoneRecord::parse("@ SOA a. b. 1 2 3").unwrap();
        assert!(short_soa.to_dns_resource("10.in-addr.arpa", 300).is_err());
        let long_label = format!("@ NS {}.org.", "x".repeat(64));
        let record = ZoneRecord::parse(&long_label).unwrap();
        assert!(matches!(
            record.to_dns_resource("10.in-addr.arpa", 300),
            Err(ZoneError::InvalidDomainName(_))
        ));
    }
}
