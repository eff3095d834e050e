use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;

use maxminddb::{geoip2, MaxMindDBError, Reader};
use tracing::debug;

use super::GeoDatabase;
use crate::error::{GeoError, Result};
use crate::model::{AsnRecord, DatabaseMetadata, NamedCode, PlaceRecord};

pub const ASN_DATABASE_FILE: &str = "GeoLite2-ASN.mmdb";
pub const CITY_DATABASE_FILE: &str = "GeoLite2-City.mmdb";

const LOCALE: &str = "en";

/// MaxMind GeoLite2 ASN and City readers, opened once at startup.
pub struct MaxMindDatabase {
    asn: Reader<Vec<u8>>,
    city: Reader<Vec<u8>>,
}

impl MaxMindDatabase {
    /// Open both tables from `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        Ok(Self {
            asn: open_reader(&dir.join(ASN_DATABASE_FILE))?,
            city: open_reader(&dir.join(CITY_DATABASE_FILE))?,
        })
    }

    pub fn metadata(&self) -> Vec<DatabaseMetadata> {
        [&self.asn, &self.city]
            .into_iter()
            .map(|reader| DatabaseMetadata {
                database_type: reader.metadata.database_type.clone(),
                description: reader.metadata.description.get(LOCALE).cloned(),
                build_epoch: reader.metadata.build_epoch,
            })
            .collect()
    }
}

fn open_reader(path: &Path) -> Result<Reader<Vec<u8>>> {
    Reader::open_readfile(path)
        .map_err(|e| GeoError::Database(format!("{}: {}", path.display(), e)))
}

/// Unparseable addresses are treated like addresses missing from the table.
fn parse_address(address: &str) -> Option<IpAddr> {
    match address.parse() {
        Ok(ip) => Some(ip),
        Err(_) => {
            debug!("Not an IP address, skipping lookup: {:?}", address);
            None
        }
    }
}

/// Only a miss becomes `None`; any other reader failure is an error.
fn found<T>(result: std::result::Result<T, MaxMindDBError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(MaxMindDBError::AddressNotFoundError(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn english(names: Option<&BTreeMap<&str, &str>>) -> Option<String> {
    names
        .and_then(|names| names.get(LOCALE))
        .map(|name| name.to_string())
}

impl GeoDatabase for MaxMindDatabase {
    fn lookup_asn(&self, address: &str) -> Result<Option<AsnRecord>> {
        let Some(ip) = parse_address(address) else {
            return Ok(None);
        };

        let hit = found(self.asn.lookup_prefix::<geoip2::Asn>(ip))?;
        Ok(hit.map(|(asn, prefix_len)| AsnRecord {
            asn: asn.autonomous_system_number,
            asn_network: network_cidr(ip, prefix_len),
            asn_organization: asn.autonomous_system_organization.map(str::to_string),
        }))
    }

    fn lookup_place(&self, address: &str) -> Result<Option<PlaceRecord>> {
        let Some(ip) = parse_address(address) else {
            return Ok(None);
        };

        let Some(city) = found(self.city.lookup::<geoip2::City>(ip))? else {
            return Ok(None);
        };

        let continent: NamedCode = city
            .continent
            .map(|c| (c.code.map(str::to_string), english(c.names.as_ref())))
            .unwrap_or_default();
        let country: NamedCode = city
            .country
            .map(|c| (c.iso_code.map(str::to_string), english(c.names.as_ref())))
            .unwrap_or_default();
        let subdivision_most_specific: NamedCode = city
            .subdivisions
            .and_then(|subdivisions| subdivisions.into_iter().last())
            .map(|s| (s.iso_code.map(str::to_string), english(s.names.as_ref())))
            .unwrap_or_default();

        Ok(Some(PlaceRecord {
            city: city.city.and_then(|c| english(c.names.as_ref())),
            continent,
            country,
            subdivision_most_specific,
        }))
    }
}

/// Network containing `ip` with the given prefix, e.g. `4.0.0.0/9`.
pub fn network_cidr(ip: IpAddr, prefix_len: usize) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let prefix_len = prefix_len.min(32);
            let mask = u32::MAX.checked_shl(32 - prefix_len as u32).unwrap_or(0);
            format!("{}/{}", Ipv4Addr::from(u32::from(v4) & mask), prefix_len)
        }
        IpAddr::V6(v6) => {
            let prefix_len = prefix_len.min(128);
            let mask = u128::MAX.checked_shl(128 - prefix_len as u32).unwrap_or(0);
            format!("{}/{}", Ipv6Addr::from(u128::from(v6) & mask), prefix_len)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_cidr_ipv4() {
        let ip: IpAddr = "4.3.2.1".parse().unwrap();
        assert_eq!(network_cidr(ip, 9), "4.0.0.0/9");
        assert_eq!(network_cidr(ip, 32), "4.3.2.1/32");
        assert_eq!(network_cidr(ip, 0), "0.0.0.0/0");
    }

    #[test]
    fn test_network_cidr_ipv6() {
        let ip: IpAddr = "2600::1".parse().unwrap();
        assert_eq!(network_cidr(ip, 12), "2600::/12");
        assert_eq!(network_cidr(ip, 128), "2600::1/128");
    }

    #[test]
    fn test_found_maps_only_misses_to_none() {
        let miss: std::result::Result<u32, _> = Err(MaxMindDBError::AddressNotFoundError(
            "Address not found in database".to_string(),
        ));
        assert!(found(miss).unwrap().is_none());

        let broken: std::result::Result<u32, _> = Err(MaxMindDBError::InvalidDatabaseError(
            "invalid node in search tree".to_string(),
        ));
        assert!(matches!(found(broken), Err(GeoError::Database(_))));

        assert_eq!(found(Ok(7u32)).unwrap(), Some(7));
    }

    #[test]
    fn test_open_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        match MaxMindDatabase::open(dir.path()) {
            Err(GeoError::Database(msg)) => assert!(msg.contains(ASN_DATABASE_FILE)),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("opened a database from an empty directory"),
        }
    }

    #[test]
    #[ignore]
    fn test_real_database_lookup() {
        // Needs GeoLite2-ASN.mmdb and GeoLite2-City.mmdb in GEO_MMDB_DIR.
        let dir = std::env::var("GEO_MMDB_DIR").unwrap_or_else(|_| ".".to_string());
        let database = MaxMindDatabase::open(Path::new(&dir)).unwrap();

        let asn = database.lookup_asn("4.3.2.1").unwrap().unwrap();
        assert_eq!(asn.asn, Some(3356));
        assert!(asn.asn_network.starts_with("4."));

        assert!(database.lookup_asn("not an address").unwrap().is_none());
        assert!(database.lookup_place("127.0.0.1").unwrap().is_none());
        assert_eq!(database.metadata().len(), 2);
    }
}
