use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod converter;

#[cfg(test)]
mod tests;

/// Vendor that published a slab
///
/// Stored on disk as its integer code. Codes this build does not know
/// decode to `Unknown` rather than failing the whole snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Vendor {
    #[default]
    Unknown,
    StoneBasyx,
    Cosmos,
}

impl From<i64> for Vendor {
    fn from(code: i64) -> Self {
        match code {
            1 => Vendor::StoneBasyx,
            2 => Vendor::Cosmos,
            _ => Vendor::Unknown,
        }
    }
}

impl From<Vendor> for i64 {
    fn from(vendor: Vendor) -> Self {
        match vendor {
            Vendor::Unknown => 0,
            Vendor::StoneBasyx => 1,
            Vendor::Cosmos => 2,
        }
    }
}

impl Vendor {
    pub fn name(&self) -> &'static str {
        match self {
            Vendor::Unknown => "UnknownVendor",
            Vendor::StoneBasyx => "StoneBasyx",
            Vendor::Cosmos => "Cosmos",
        }
    }

    /// Lowercase id used for per-vendor log files
    pub fn log_id(&self) -> &'static str {
        match self {
            Vendor::Unknown => "unknown",
            Vendor::StoneBasyx => "stonebasyx",
            Vendor::Cosmos => "cosmos",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Surface treatment of a slab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Finish {
    #[default]
    Unknown,
    Polished,
    Leather,
    Honed,
}

impl From<i64> for Finish {
    fn from(code: i64) -> Self {
        match code {
            1 => Finish::Polished,
            2 => Finish::Leather,
            3 => Finish::Honed,
            _ => Finish::Unknown,
        }
    }
}

impl From<Finish> for i64 {
    fn from(finish: Finish) -> Self {
        match finish {
            Finish::Unknown => 0,
            Finish::Polished => 1,
            Finish::Leather => 2,
            Finish::Honed => 3,
        }
    }
}

impl Finish {
    /// Map a vendor's finish label ("Polished", "Leathered", ...) to a variant
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "polished" => Finish::Polished,
            "honed" => Finish::Honed,
            "leather" | "leathered" => Finish::Leather,
            _ => Finish::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Finish::Unknown => "UnknownFinish",
            Finish::Polished => "Polished",
            Finish::Leather => "Leather",
            Finish::Honed => "Honed",
        }
    }
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One in-stock lot of slabs, normalized across vendors
///
/// Field names on disk are PascalCase so snapshots written by earlier
/// releases keep loading. Absent fields take their default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Slab {
    /// Minor currency units; 0 when the vendor does not publish a price
    pub price: i64,
    pub color: String,
    pub finish: Finish,
    /// Centimeters
    pub thickness: f64,
    pub lot: String,
    pub bundle: String,
    /// Inches
    pub width: f64,
    /// Inches
    pub length: f64,
    /// Slabs available in this lot
    pub count: u32,
    pub vendor: Vendor,
    /// Detail page for the slab
    #[serde(rename = "URL")]
    pub url: String,
    pub photo: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Slab {
    pub fn new(vendor: Vendor) -> Self {
        Self {
            vendor,
            ..Default::default()
        }
    }

    /// Observed for the first time in the cycle that last saw it
    pub fn is_new(&self) -> bool {
        self.first_seen == self.last_seen
    }
}

/// Human-readable summary used in notifications
impl fmt::Display for Slab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Length: {}, Count: {}, Lot: {}, Bundle: {}, Finish: {}, Vendor: {}, URL: {}",
            self.length, self.count, self.lot, self.bundle, self.finish, self.vendor, self.url
        )
    }
}
