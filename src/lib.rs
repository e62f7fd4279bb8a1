//! Streaming parser for 3GPP TS 32.435 performance measurement collection files.
//!
//! Collection files (`measCollecFile`) produced by network elements can be
//! large; this crate never builds the document in memory. A [`Handler`]
//! consumes element events one at a time and hands every record to a
//! callback as soon as its closing tag is read:
//!
//! - [`MeasValue`]: results of one measured object;
//! - [`MeasInfo`]: one measurement job with its measurement types;
//! - [`MeasData`]: the measurements of one managed element;
//! - [`MeasCollecFile`]: file header and footer.
//!
//! The callback receives the whole chain of open records, so a value block can
//! be joined with the `measTypes` of its info block and the `localDn` of its
//! managed element without any bookkeeping on the caller side.
//!
//! A filter can prune subtrees before any record is created for them, for
//! example to keep only some `measInfoId`s.
//!
//! ## Example
//!
//! ```
//! use meas_collec::{reader, Handler, Record};
//!
//! let xml = r#"
//! <measCollecFile>
//!   <fileHeader fileFormatVersion="32.435 V10.0" vendorName="Company NN"/>
//!   <measData>
//!     <managedElement localDn="RNC-Gbg-1"/>
//!     <measInfo measInfoId="RRC">
//!       <granPeriod duration="PT900S" endTime="2000-03-01T14:14:30+02:00"/>
//!       <measTypes>attTCHSeizures succTCHSeizures</measTypes>
//!       <measValue measObjLdn="RncFunction=RF-1,UtranCell=Gbg-997">
//!         <measResults>234 345</measResults>
//!         <suspect>false</suspect>
//!       </measValue>
//!     </measInfo>
//!   </measData>
//! </measCollecFile>"#;
//!
//! let mut rows = Vec::new();
//! let mut handler = Handler::new(|_name, stack| {
//!     if let [.., Record::MeasData(data), Record::MeasInfo(info), Record::MeasValue(value)] =
//!         stack
//!     {
//!         let types = info.meas_types.iter().flatten();
//!         let results = value.meas_results.iter().flatten();
//!         for (t, r) in types.zip(results) {
//!             rows.push(format!("{:?} {} {}", data.local_dn, t, r));
//!         }
//!     }
//!     Ok(())
//! });
//!
//! reader::parse_str(xml, &mut handler).unwrap();
//! drop(handler);
//! assert_eq!(rows, [
//!     r#"Some("RNC-Gbg-1") attTCHSeizures 234"#,
//!     r#"Some("RNC-Gbg-1") succTCHSeizures 345"#,
//! ]);
//! ```
//!
//! ## Features
#![cfg_attr(
    feature = "document-features",
    cfg_attr(doc, doc = ::document_features::document_features!())
)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

#[macro_use]
extern crate log;

pub mod attributes;
mod dispatch;
pub mod errors;
mod handler;
pub mod name;
pub mod reader;
pub mod records;
mod skip;
pub mod stack;
mod text;

// reexports
pub use crate::attributes::Attributes;
pub use crate::errors::{BoxError, Error, Result};
pub use crate::handler::{Handler, NoFilter};
pub use crate::records::{MeasCollecFile, MeasData, MeasInfo, MeasValue, Record, RecordKind};
