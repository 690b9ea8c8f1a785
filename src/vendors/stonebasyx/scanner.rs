//! Line-oriented scanner for StoneBasyx product pages.
//!
//! The page is read once, top to bottom, by a small state machine:
//!
//! | state          | line                        | next state        |
//! |----------------|-----------------------------|-------------------|
//! | `AwaitContent` | contains content start      | `AwaitBlock`      |
//! | `AwaitContent` | anything else               | `AwaitContent`    |
//! | `AwaitBlock`   | contains block marker       | `Skip(Lot)`       |
//! | `AwaitBlock`   | contains content end        | `Done`            |
//! | `AwaitBlock`   | anything else               | `AwaitBlock`      |
//! | `Skip(f)`      | any                         | `Read(f)`         |
//! | `Read(f)`      | label line for `f`          | `Skip(next f)`    |
//! | `Read(Count)`  | label line for Count        | `AwaitBlock`      |
//! | `Done`         | any                         | `Done`            |
//!
//! While in `AwaitBlock` the page header labels (color, finish, thickness)
//! are captured the first time each one appears. Any malformed line in
//! `Read(f)` fails the whole page; so does running out of input mid-block.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::vendors::canonical::{Finish, Slab, Vendor};
use crate::vendors::common::resolve_reference;

/// Text markers the scanner keys on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanMarkers {
    pub content_start: String,
    pub content_end: String,
    pub block: String,
    pub color_label: String,
    pub finish_label: String,
    pub thickness_label: String,
}

impl Default for ScanMarkers {
    fn default() -> Self {
        Self {
            content_start: "<!-- write data here -->".to_string(),
            content_end: "<!-- End main content -->".to_string(),
            block: "class=\"thumbpicsm2017\"".to_string(),
            color_label: ">Color: <".to_string(),
            finish_label: ">Finish: <".to_string(),
            thickness_label: ">Thickness: <".to_string(),
        }
    }
}

/// Per-slab fields, in the order they follow a block marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockField {
    Lot,
    Bundle,
    Size,
    Count,
}

impl BlockField {
    fn next(self) -> Option<BlockField> {
        match self {
            BlockField::Lot => Some(BlockField::Bundle),
            BlockField::Bundle => Some(BlockField::Size),
            BlockField::Size => Some(BlockField::Count),
            BlockField::Count => None,
        }
    }
}

impl fmt::Display for BlockField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockField::Lot => "Lot",
            BlockField::Bundle => "Bundle",
            BlockField::Size => "Size",
            BlockField::Count => "Count",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    AwaitContent,
    AwaitBlock,
    Skip(BlockField),
    Read(BlockField),
    Done,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("line {line}: {label} header invalid")]
    MalformedHeader { label: &'static str, line: usize },

    #[error("line {line}: slab photo invalid: {reason}")]
    MalformedPhoto { line: usize, reason: String },

    #[error("line {line}: {field} line invalid")]
    MissingField { field: BlockField, line: usize },

    #[error("line {line}: {field} value malformed: {value:?}")]
    MalformedField {
        field: BlockField,
        value: String,
        line: usize,
    },

    #[error("page ended while reading {field}")]
    Truncated { field: BlockField },
}

impl ScanError {
    /// Block field the error is about, if any
    pub fn field(&self) -> Option<BlockField> {
        match self {
            ScanError::MissingField { field, .. }
            | ScanError::MalformedField { field, .. }
            | ScanError::Truncated { field } => Some(*field),
            _ => None,
        }
    }
}

/// Page-level values shared by every slab on the page
#[derive(Debug, Default)]
struct PageHeader {
    color: Option<String>,
    finish: Option<Finish>,
    thickness: Option<f64>,
}

pub struct LineScanner<'a> {
    markers: &'a ScanMarkers,
    page_url: &'a str,
    state: ScanState,
    header: PageHeader,
    current: Option<Slab>,
    slabs: Vec<Slab>,
}

impl<'a> LineScanner<'a> {
    pub fn new(markers: &'a ScanMarkers, page_url: &'a str) -> Self {
        Self {
            markers,
            page_url,
            state: ScanState::AwaitContent,
            header: PageHeader::default(),
            current: None,
            slabs: Vec::new(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Advance by one line; `line_no` is 1-based and only used in errors
    pub fn feed(&mut self, line_no: usize, line: &str) -> Result<(), ScanError> {
        self.state = match self.state {
            ScanState::AwaitContent => {
                if line.contains(&self.markers.content_start) {
                    ScanState::AwaitBlock
                } else {
                    ScanState::AwaitContent
                }
            }
            ScanState::AwaitBlock => {
                self.capture_header(line_no, line)?;
                if line.contains(&self.markers.block) {
                    self.current = Some(self.start_slab(line_no, line)?);
                    ScanState::Skip(BlockField::Lot)
                } else if line.contains(&self.markers.content_end) {
                    ScanState::Done
                } else {
                    ScanState::AwaitBlock
                }
            }
            ScanState::Skip(field) => ScanState::Read(field),
            ScanState::Read(field) => {
                let slab = self
                    .current
                    .as_mut()
                    .ok_or(ScanError::MissingField { field, line: line_no })?;
                read_field(slab, field, line_no, line)?;
                match field.next() {
                    Some(next) => ScanState::Skip(next),
                    None => {
                        if let Some(done) = self.current.take() {
                            self.slabs.push(done);
                        }
                        ScanState::AwaitBlock
                    }
                }
            }
            ScanState::Done => ScanState::Done,
        };
        Ok(())
    }

    /// Finish the scan; fails if input ended inside a slab block
    pub fn finish(self) -> Result<Vec<Slab>, ScanError> {
        match self.state {
            ScanState::Skip(field) | ScanState::Read(field) => Err(ScanError::Truncated { field }),
            _ => Ok(self.slabs),
        }
    }

    fn capture_header(&mut self, line_no: usize, line: &str) -> Result<(), ScanError> {
        if self.header.color.is_none() && line.contains(&self.markers.color_label) {
            let value = parse_key(line).ok_or(ScanError::MalformedHeader {
                label: "Color",
                line: line_no,
            })?;
            self.header.color = Some(value.to_string());
        }

        if self.header.finish.is_none() && line.contains(&self.markers.finish_label) {
            let value = parse_key(line).ok_or(ScanError::MalformedHeader {
                label: "Finish",
                line: line_no,
            })?;
            self.header.finish = Some(Finish::from_label(value));
        }

        if self.header.thickness.is_none() && line.contains(&self.markers.thickness_label) {
            let malformed = ScanError::MalformedHeader {
                label: "Thickness",
                line: line_no,
            };
            let value = parse_key(line).ok_or_else(|| malformed.clone())?;
            // "3 cm" -> 3.0
            let number = value.split(' ').next().unwrap_or_default();
            self.header.thickness = Some(number.parse::<f64>().map_err(|_| malformed)?);
        }

        Ok(())
    }

    fn start_slab(&self, line_no: usize, line: &str) -> Result<Slab, ScanError> {
        let reference = line.split('"').nth(3).ok_or_else(|| ScanError::MalformedPhoto {
            line: line_no,
            reason: "fewer than 4 quoted segments".to_string(),
        })?;
        let photo =
            resolve_reference(self.page_url, reference).map_err(|e| ScanError::MalformedPhoto {
                line: line_no,
                reason: e.to_string(),
            })?;

        Ok(Slab {
            color: self.header.color.clone().unwrap_or_default(),
            finish: self.header.finish.unwrap_or_default(),
            thickness: self.header.thickness.unwrap_or_default(),
            url: self.page_url.to_string(),
            photo,
            ..Slab::new(Vendor::StoneBasyx)
        })
    }
}

fn read_field(slab: &mut Slab, field: BlockField, line_no: usize, line: &str) -> Result<(), ScanError> {
    let value = parse_key(line).ok_or(ScanError::MissingField { field, line: line_no })?;
    let malformed = || ScanError::MalformedField {
        field,
        value: value.to_string(),
        line: line_no,
    };

    match field {
        BlockField::Lot => slab.lot = value.to_string(),
        BlockField::Bundle => slab.bundle = value.to_string(),
        BlockField::Size => {
            // "<length>L x <width>H"
            let tokens: Vec<&str> = value.split(' ').collect();
            if tokens.len() < 3 {
                return Err(malformed());
            }
            let length = tokens[0].strip_suffix('L').unwrap_or(tokens[0]);
            let width = tokens[2].strip_suffix('H').unwrap_or(tokens[2]);
            slab.length = length.parse().map_err(|_| malformed())?;
            slab.width = width.parse().map_err(|_| malformed())?;
        }
        BlockField::Count => {
            // "<n> slabs"
            let count = value.strip_suffix(" slabs").unwrap_or(value);
            slab.count = count.parse().map_err(|_| malformed())?;
        }
    }
    Ok(())
}

/// Extract the value from a label line such as
/// `<strong style="padding-left:20px;">Color: <a style="padding-left:5px;">Black, White</a></strong>`
/// which yields `Black, White`: the third `>`-separated segment, up to the next `<`.
pub fn parse_key(line: &str) -> Option<&str> {
    let segment = line.split('>').nth(2)?;
    segment.split('<').next()
}

/// Scan a whole page. Either every block parses or the page yields an error.
pub fn scan_page(page: &str, page_url: &str, markers: &ScanMarkers) -> Result<Vec<Slab>, ScanError> {
    let mut scanner = LineScanner::new(markers, page_url);
    for (idx, line) in page.lines().enumerate() {
        scanner.feed(idx + 1, line)?;
        if scanner.state() == ScanState::Done {
            break;
        }
    }
    scanner.finish()
}
