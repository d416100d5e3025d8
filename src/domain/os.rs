use crate::domain::model::PackageEntry;
use crate::utils::error::{EtlError, Result};
use std::fmt;

/// OS/build variants the CI matrix reports on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsFamily {
    Ubuntu2004,
    Ubuntu1804,
    Centos7,
    Macos1015,
    Macos1101,
    Other(String),
}

/// How one line of a package listing is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFormat {
    /// `yum list installed` style: `name version repository`.
    YumList,
}

impl OsFamily {
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier {
            "ubuntu-20-04" => OsFamily::Ubuntu2004,
            "ubuntu-18-04" => OsFamily::Ubuntu1804,
            "centos-7" => OsFamily::Centos7,
            "macos-10-15" => OsFamily::Macos1015,
            "macos-11-01" => OsFamily::Macos1101,
            other => OsFamily::Other(other.to_string()),
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            OsFamily::Ubuntu2004 => "ubuntu-20-04",
            OsFamily::Ubuntu1804 => "ubuntu-18-04",
            OsFamily::Centos7 => "centos-7",
            OsFamily::Macos1015 => "macos-10-15",
            OsFamily::Macos1101 => "macos-11-01",
            OsFamily::Other(identifier) => identifier,
        }
    }

    pub fn package_format(&self) -> Result<PackageFormat> {
        match self {
            OsFamily::Centos7 => Ok(PackageFormat::YumList),
            _ => Err(EtlError::UnsupportedOs {
                os: self.identifier().to_string(),
            }),
        }
    }
}

impl From<&str> for OsFamily {
    fn from(identifier: &str) -> Self {
        Self::from_identifier(identifier)
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl PackageFormat {
    pub fn parse_line(&self, line: &str) -> Result<PackageEntry> {
        match self {
            PackageFormat::YumList => PackageEntry::from_line(line),
        }
    }

    pub fn parse_lines<'a, I>(&self, lines: I) -> Result<Vec<PackageEntry>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines.into_iter().map(|line| self.parse_line(line)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_round_trip_for_known_families() {
        for id in ["ubuntu-20-04", "ubuntu-18-04", "centos-7", "macos-10-15", "macos-11-01"] {
            let family = OsFamily::from_identifier(id);
            assert!(!matches!(family, OsFamily::Other(_)));
            assert_eq!(family.to_string(), id);
        }
    }

    #[test]
    fn test_only_centos_has_a_package_format() {
        assert_eq!(
            OsFamily::Centos7.package_format().unwrap(),
            PackageFormat::YumList
        );

        for family in [
            OsFamily::Ubuntu2004,
            OsFamily::Macos1101,
            OsFamily::from("windows-2019"),
        ] {
            match family.package_format() {
                Err(EtlError::UnsupportedOs { os }) => assert_eq!(os, family.identifier()),
                other => panic!("expected UnsupportedOs, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_lines_stops_at_first_bad_line() {
        let result = PackageFormat::YumList.parse_lines(["a 1 r", "b 2", "c 3 r"]);
        assert!(matches!(
            result,
            Err(EtlError::MalformedPackageLine { tokens: 2, .. })
        ));
    }
}
