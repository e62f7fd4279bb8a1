//! The stack of open records.
//!
//! Records are pushed when their element opens and popped right after they
//! were handed to the callback. Elements that only carry fields (`fileHeader`,
//! `job`, ...) never reach the stack: their attributes are merged into the
//! record on top of it.

use crate::attributes::Attributes;
use crate::errors::{Error, Result};
use crate::records::{MeasCollecFile, MeasData, MeasInfo, MeasValue, Record, RecordKind};

/// Depth of the record hierarchy: file, data, info, value.
pub const MAX_DEPTH: usize = 4;

/// Ordered sequence of open records, outermost first.
#[derive(Clone, Debug, Default)]
pub struct ContextStack {
    records: Vec<Record>,
    /// Number of open XML elements, whatever their name
    elements: usize,
    /// Record elements that were opened where no rule allows them, with their
    /// element depth. Their end tags must not close the real record below
    /// them.
    ignored: Vec<(RecordKind, usize)>,
}

impl ContextStack {
    /// Creates an empty stack with room for the whole hierarchy
    pub fn new() -> Self {
        ContextStack {
            records: Vec::with_capacity(MAX_DEPTH),
            elements: 0,
            ignored: Vec::new(),
        }
    }

    /// Makes `record` the current context
    #[inline]
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Removes the current record
    #[inline]
    pub fn pop(&mut self) -> Option<Record> {
        self.records.pop()
    }

    /// Returns `true` if no record is open
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of open records
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Kind of the current record, `None` at the top level of the document
    #[inline]
    pub fn current(&self) -> Option<RecordKind> {
        self.records.last().map(Record::kind)
    }

    /// Kind of the current record, which the end tag `found` is about to
    /// close. Fails with [`Error::EmptyStack`] if no record is open.
    pub fn expect_current(&self, found: &str) -> Result<RecordKind> {
        self.current().ok_or_else(|| Error::EmptyStack {
            found: found.to_owned(),
        })
    }

    /// Mutable access to the current record
    #[inline]
    pub fn current_mut(&mut self) -> Option<&mut Record> {
        self.records.last_mut()
    }

    /// All open records, outermost first
    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Kinds of all open records, outermost first
    pub fn path(&self) -> Vec<RecordKind> {
        self.records.iter().map(Record::kind).collect()
    }

    /// Copies every known attribute of `attrs` into the current record.
    ///
    /// Attributes that have no field in the current record are ignored.
    pub fn merge_attributes(&mut self, attrs: &Attributes) {
        for attr in attrs {
            if !self.set_field(&attr.key, &attr.value) {
                trace!("ignoring attribute `{}` for {:?}", attr.key, self.current());
            }
        }
    }

    /// Sets the field named after the attribute `key` of the current record.
    ///
    /// Returns `false` when there is no open record or it has no such field.
    pub fn set_field(&mut self, key: &str, value: &str) -> bool {
        let slot = match self.records.last_mut() {
            Some(Record::MeasCollecFile(r)) => file_field(r, key),
            Some(Record::MeasData(r)) => data_field(r, key),
            Some(Record::MeasInfo(r)) => info_field(r, key),
            Some(Record::MeasValue(r)) => value_field(r, key),
            None => None,
        };
        match slot {
            Some(slot) => {
                *slot = Some(value.to_owned());
                true
            }
            None => false,
        }
    }

    /// Counts a start tag. Must be called for every element, including the
    /// skipped ones.
    #[inline]
    pub fn enter(&mut self) {
        self.elements += 1;
    }

    /// Counts an end tag. Returns the kind of the ignored element it closes,
    /// if any.
    pub fn leave(&mut self) -> Option<RecordKind> {
        let depth = self.elements;
        self.elements = self.elements.saturating_sub(1);
        match self.ignored.last() {
            Some(&(kind, at)) if at == depth => {
                self.ignored.pop();
                Some(kind)
            }
            _ => None,
        }
    }

    /// Remembers that the element just entered is named after a record kind
    /// but was not pushed.
    pub fn ignore(&mut self, kind: RecordKind) {
        self.ignored.push((kind, self.elements));
    }

    /// Drops every open record and forgets the element depth
    pub fn clear(&mut self) {
        self.records.clear();
        self.elements = 0;
        self.ignored.clear();
    }
}

fn file_field<'r>(r: &'r mut MeasCollecFile, key: &str) -> Option<&'r mut Option<String>> {
    Some(match key {
        "fileFormatVersion" => &mut r.file_format_version,
        "vendorName" => &mut r.vendor_name,
        "dnPrefix" => &mut r.dn_prefix,
        "localDn" => &mut r.local_dn,
        "elementType" => &mut r.element_type,
        "beginTime" => &mut r.begin_time,
        "endTime" => &mut r.end_time,
        _ => return None,
    })
}

fn data_field<'r>(r: &'r mut MeasData, key: &str) -> Option<&'r mut Option<String>> {
    Some(match key {
        "localDn" => &mut r.local_dn,
        "userLabel" => &mut r.user_label,
        "swVersion" => &mut r.sw_version,
        _ => return None,
    })
}

fn info_field<'r>(r: &'r mut MeasInfo, key: &str) -> Option<&'r mut Option<String>> {
    Some(match key {
        "measInfoId" => &mut r.meas_info_id,
        "jobId" => &mut r.job_id,
        "endTime" => &mut r.end_time,
        "duration" => &mut r.duration,
        "repPeriodDuration" => &mut r.rep_period_duration,
        _ => return None,
    })
}

fn value_field<'r>(r: &'r mut MeasValue, key: &str) -> Option<&'r mut Option<String>> {
    Some(match key {
        "optionalInformation" => &mut r.optional_information,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_known_attributes_only() {
        let mut stack = ContextStack::new();
        stack.push(MeasCollecFile::default().into());
        stack.merge_attributes(&Attributes::from([
            ("fileFormatVersion", "32.435 V10.0"),
            ("vendorName", "Company NN"),
            ("xmlns", "http://www.3gpp.org/ftp/specs/archive/32_series/32.435#measCollec"),
        ]));

        assert_eq!(
            stack.records(),
            [Record::MeasCollecFile(MeasCollecFile {
                file_format_version: Some("32.435 V10.0".into()),
                vendor_name: Some("Company NN".into()),
                ..MeasCollecFile::default()
            })]
        );
    }

    #[test]
    fn later_merge_overwrites() {
        let mut stack = ContextStack::new();
        stack.push(MeasInfo::default().into());
        assert!(stack.set_field("duration", "PT900S"));
        assert!(stack.set_field("duration", "PT60S"));
        assert!(!stack.set_field("userLabel", "x"));

        let info = stack.pop().unwrap();
        assert_eq!(
            info.as_meas_info().unwrap().duration.as_deref(),
            Some("PT60S")
        );
        assert!(stack.is_empty());
    }

    #[test]
    fn set_field_without_record() {
        let mut stack = ContextStack::new();
        assert!(!stack.set_field("localDn", "x"));
        assert_eq!(stack.current(), None);
    }

    #[test]
    fn empty_stack_has_no_context() {
        let mut stack = ContextStack::new();
        match stack.expect_current("measData") {
            Err(Error::EmptyStack { found }) => assert_eq!(found, "measData"),
            x => panic!("expected empty stack error, got {:?}", x),
        }
        stack.push(MeasData::default().into());
        assert_eq!(stack.expect_current("measData").unwrap(), RecordKind::MeasData);
    }

    #[test]
    fn ignored_elements_are_depth_bound() {
        let mut stack = ContextStack::new();
        stack.enter();
        stack.push(MeasCollecFile::default().into());
        // <measInfo> directly under the file
        stack.enter();
        stack.ignore(RecordKind::MeasInfo);
        stack.enter();
        stack.push(MeasData::default().into());
        stack.enter();
        stack.push(MeasInfo::default().into());

        // inner </measInfo> belongs to the pushed record
        assert_eq!(stack.leave(), None);
        stack.pop();
        assert_eq!(stack.leave(), None);
        stack.pop();
        // outer one to the ignored element
        assert_eq!(stack.leave(), Some(RecordKind::MeasInfo));
        assert_eq!(stack.leave(), None);
        assert_eq!(stack.path(), [RecordKind::MeasCollecFile]);
    }

    #[test]
    fn unbalanced_end_tags() {
        let mut stack = ContextStack::new();
        assert_eq!(stack.leave(), None);
        stack.enter();
        stack.ignore(RecordKind::MeasValue);
        stack.clear();
        stack.enter();
        assert_eq!(stack.leave(), None);
    }
}
