//! Plain data shapes filled by the [`Handler`](crate::Handler).
//!
//! A collection file is a strict hierarchy:
//!
//! ```text
//! measCollecFile
//! ├── fileHeader / fileSender / measCollec      (merged into MeasCollecFile)
//! ├── 0.. measData
//! │   ├── managedElement                        (merged into MeasData)
//! │   └── 0.. measInfo
//! │       ├── job / granPeriod / repPeriod      (merged into MeasInfo)
//! │       ├── measTypes | 0.. measType
//! │       └── 0.. measValue
//! │           ├── measResults | 0.. r
//! │           └── suspect
//! └── fileFooter / measCollec                   (merged into MeasCollecFile)
//! ```
//!
//! Fields are optional because they are filled as the document is read: a
//! record only carries what was seen before its closing tag. The only
//! exception is `MeasValue::meas_obj_ldn`, without which no value record is
//! created.

use std::fmt;

/// Header and footer of a collection file, emitted on `</measCollecFile>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub struct MeasCollecFile {
    /// `fileHeader@fileFormatVersion`
    pub file_format_version: Option<String>,
    /// `fileHeader@vendorName`
    pub vendor_name: Option<String>,
    /// `fileHeader@dnPrefix`
    pub dn_prefix: Option<String>,
    /// `fileSender@localDn`
    pub local_dn: Option<String>,
    /// `fileSender@elementType`
    pub element_type: Option<String>,
    /// `fileHeader/measCollec@beginTime`
    pub begin_time: Option<String>,
    /// `fileFooter/measCollec@endTime`
    pub end_time: Option<String>,
}

/// Measurements of one managed element, emitted on `</measData>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub struct MeasData {
    /// `managedElement@localDn`
    pub local_dn: Option<String>,
    /// `managedElement@userLabel`
    pub user_label: Option<String>,
    /// `managedElement@swVersion`
    pub sw_version: Option<String>,
}

/// One measurement job, emitted on `</measInfo>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub struct MeasInfo {
    /// `measInfo@measInfoId`, set when the record is created
    pub meas_info_id: Option<String>,
    /// `job@jobId`
    pub job_id: Option<String>,
    /// `granPeriod@endTime`
    pub end_time: Option<String>,
    /// `granPeriod@duration`, for example `PT900S`
    pub duration: Option<String>,
    /// `repPeriod@duration`
    pub rep_period_duration: Option<String>,
    /// Measurement type codes in document order
    pub meas_types: Option<Vec<String>>,
}

/// Results of one measured object, emitted on `</measValue>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub struct MeasValue {
    /// `measValue@measObjLdn`, required when the element opens
    pub meas_obj_ldn: String,
    /// `measValue@optionalInformation`
    pub optional_information: Option<String>,
    /// Results in document order, one per measurement type
    pub meas_results: Option<Vec<String>>,
    /// Text of the `suspect` element, usually `true` or `false`
    pub suspect: Option<String>,
}

/// The kind of a [`Record`]. Each kind is bound to the element that opens it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub enum RecordKind {
    /// `measCollecFile`
    MeasCollecFile,
    /// `measData`
    MeasData,
    /// `measInfo`
    MeasInfo,
    /// `measValue`
    MeasValue,
}

impl RecordKind {
    /// Returns the element name which opens and closes records of that kind
    pub const fn name(self) -> &'static str {
        match self {
            RecordKind::MeasCollecFile => "measCollecFile",
            RecordKind::MeasData => "measData",
            RecordKind::MeasInfo => "measInfo",
            RecordKind::MeasValue => "measValue",
        }
    }

    /// Returns the record kind bound to the element `name`, if any
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "measCollecFile" => Some(RecordKind::MeasCollecFile),
            "measData" => Some(RecordKind::MeasData),
            "measInfo" => Some(RecordKind::MeasInfo),
            "measValue" => Some(RecordKind::MeasValue),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record under construction or being emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-types", derive(serde::Deserialize, serde::Serialize))]
pub enum Record {
    /// See [`MeasCollecFile`]
    MeasCollecFile(MeasCollecFile),
    /// See [`MeasData`]
    MeasData(MeasData),
    /// See [`MeasInfo`]
    MeasInfo(MeasInfo),
    /// See [`MeasValue`]
    MeasValue(MeasValue),
}

impl Record {
    /// Returns the kind of this record
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::MeasCollecFile(_) => RecordKind::MeasCollecFile,
            Record::MeasData(_) => RecordKind::MeasData,
            Record::MeasInfo(_) => RecordKind::MeasInfo,
            Record::MeasValue(_) => RecordKind::MeasValue,
        }
    }

    /// Returns the element name of this record
    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Returns the file record if this is one
    pub fn as_meas_collec_file(&self) -> Option<&MeasCollecFile> {
        match self {
            Record::MeasCollecFile(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the data block if this is one
    pub fn as_meas_data(&self) -> Option<&MeasData> {
        match self {
            Record::MeasData(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the info block if this is one
    pub fn as_meas_info(&self) -> Option<&MeasInfo> {
        match self {
            Record::MeasInfo(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the value block if this is one
    pub fn as_meas_value(&self) -> Option<&MeasValue> {
        match self {
            Record::MeasValue(r) => Some(r),
            _ => None,
        }
    }
}

impl From<MeasCollecFile> for Record {
    fn from(r: MeasCollecFile) -> Self {
        Record::MeasCollecFile(r)
    }
}

impl From<MeasData> for Record {
    fn from(r: MeasData) -> Self {
        Record::MeasData(r)
    }
}

impl From<MeasInfo> for Record {
    fn from(r: MeasInfo) -> Self {
        Record::MeasInfo(r)
    }
}

impl From<MeasValue> for Record {
    fn from(r: MeasValue) -> Self {
        Record::MeasValue(r)
    }
}
