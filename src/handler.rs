//! The event driven engine turning element events into records.

use crate::attributes::Attributes;
use crate::dispatch::{self, Action};
use crate::errors::{BoxError, Error, Result};
use crate::name::local_name;
use crate::records::{Record, RecordKind};
use crate::skip::SkipGate;
use crate::stack::ContextStack;
use crate::text::TextRouter;

/// Type of the filter used by [`Handler::new`], which never skips anything.
pub type NoFilter =
    fn(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>;

fn never_skip(
    _: &str,
    _: &Attributes,
    _: &[Record],
) -> std::result::Result<Option<String>, BoxError> {
    Ok(None)
}

/// Assembles collection file records from a stream of element events.
///
/// The handler is fed with [`start_element`], [`end_element`] and
/// [`characters`] in document order, by the [`reader`] functions or by any
/// other tokenizer. When the end tag of a `measCollecFile`, `measData`,
/// `measInfo` or `measValue` element is processed, the callback receives the
/// element name and all open records, outermost first. The last record of the
/// slice is the one being closed; it is removed from the stack when the
/// callback returns.
///
/// An optional filter is asked about every start tag outside of a skipped
/// subtree. When it returns an element name, everything up to the next end
/// tag with that name is ignored.
///
/// # Examples
///
/// ```
/// use meas_collec::{reader, Handler, Record};
///
/// let xml = r#"
/// <measCollecFile>
///   <measData>
///     <measInfo measInfoId="LTE_QoS">
///       <measTypes>pmA pmB</measTypes>
///       <measValue measObjLdn="cell=1"><measResults>1 2</measResults></measValue>
///     </measInfo>
///     <measInfo measInfoId="Other">
///       <measValue measObjLdn="cell=1"><measResults>3 4</measResults></measValue>
///     </measInfo>
///   </measData>
/// </measCollecFile>"#;
///
/// let mut results = Vec::new();
/// let mut handler = Handler::new(|_name, stack| {
///     if let Some(Record::MeasValue(value)) = stack.last() {
///         results.push(value.meas_results.clone());
///     }
///     Ok(())
/// })
/// .with_filter(|name, attrs, _stack| {
///     let other = name == "measInfo" && attrs.get("measInfoId") != Some("LTE_QoS");
///     Ok(other.then(|| name.to_owned()))
/// });
///
/// reader::parse_str(xml, &mut handler).unwrap();
/// drop(handler);
/// assert_eq!(results, [Some(vec!["1".to_string(), "2".to_string()])]);
/// ```
///
/// [`start_element`]: Self::start_element
/// [`end_element`]: Self::end_element
/// [`characters`]: Self::characters
/// [`reader`]: crate::reader
pub struct Handler<C, F = NoFilter> {
    stack: ContextStack,
    skip: SkipGate,
    text: TextRouter,
    callback: C,
    filter: F,
}

impl<C> Handler<C, NoFilter>
where
    C: FnMut(&str, &[Record]) -> std::result::Result<(), BoxError>,
{
    /// Creates a handler calling `callback` for each closed record
    pub fn new(callback: C) -> Self {
        Handler {
            stack: ContextStack::new(),
            skip: SkipGate::default(),
            text: TextRouter::default(),
            callback,
            filter: never_skip,
        }
    }
}

impl<C, F> Handler<C, F> {
    /// Replaces the skip filter.
    ///
    /// The filter receives the local name and the attributes of the element
    /// being opened together with the open records, and returns the name of
    /// the element whose end tag terminates the skipped region.
    pub fn with_filter<G>(self, filter: G) -> Handler<C, G>
    where
        G: FnMut(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>,
    {
        Handler {
            stack: self.stack,
            skip: self.skip,
            text: self.text,
            callback: self.callback,
            filter,
        }
    }

    /// Open records, outermost first
    #[inline]
    pub fn records(&self) -> &[Record] {
        self.stack.records()
    }

    /// The stack of open records
    #[inline]
    pub fn stack(&self) -> &ContextStack {
        &self.stack
    }

    /// Returns `true` while inside a subtree selected by the filter
    #[inline]
    pub fn is_skipping(&self) -> bool {
        self.skip.is_active()
    }

    /// Discards all parsing state so that the handler can be used for another
    /// document. The callback and the filter are kept.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.skip.clear();
        self.text.disarm();
    }
}

impl<C, F> Handler<C, F>
where
    C: FnMut(&str, &[Record]) -> std::result::Result<(), BoxError>,
    F: FnMut(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>,
{
    /// Processes a start tag
    pub fn start_element(&mut self, name: &str, attrs: &Attributes) -> Result<()> {
        let name = local_name(name);
        self.text.close(&mut self.stack);
        self.stack.enter();

        if self
            .skip
            .on_start(&mut self.filter, name, attrs, self.stack.records())?
        {
            return Ok(());
        }

        match dispatch::lookup(self.stack.current(), name) {
            Some(Action::Open(kind)) => {
                let record = dispatch::create(kind, attrs, &self.stack)?;
                self.stack.push(record);
            }
            Some(Action::Merge) => self.stack.merge_attributes(attrs),
            Some(Action::MergeAs { attribute, field }) => {
                if let Some(value) = attrs.get(attribute) {
                    self.stack.set_field(field, value);
                }
            }
            Some(Action::Capture(field)) => self.text.arm(field),
            None => {
                if let Some(kind) = RecordKind::from_name(name) {
                    self.stack.ignore(kind);
                }
                trace!("no rule for <{}> in {:?}", name, self.stack.current());
            }
        }
        Ok(())
    }

    /// Processes an end tag, emitting the current record if `name` closes it
    pub fn end_element(&mut self, name: &str) -> Result<()> {
        let name = local_name(name);
        self.text.close(&mut self.stack);
        let ignored = self.stack.leave();

        if self.skip.is_active() {
            self.skip.end(name);
            return Ok(());
        }
        if let Some(kind) = ignored {
            trace!("end of ignored <{}>", kind);
            return Ok(());
        }

        let kind = match RecordKind::from_name(name) {
            Some(kind) => kind,
            None => return Ok(()),
        };
        let current = self.stack.expect_current(name)?;
        if current != kind {
            return Err(Error::UnexpectedEnd {
                expected: current,
                found: name.to_owned(),
            });
        }

        (self.callback)(kind.name(), self.stack.records()).map_err(Error::Callback)?;
        self.stack.pop();
        debug!("emitted <{}> at depth {}", kind, self.stack.len());
        Ok(())
    }

    /// Processes character data found between two tags.
    ///
    /// Only the first text event after a field element opened is used, so a
    /// tokenizer that splits text must join the pieces before calling this.
    pub fn characters(&mut self, text: &str) -> Result<()> {
        if !self.skip.is_active() {
            self.text.route(&mut self.stack, text);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{MeasInfo, MeasValue};
    use pretty_assertions::assert_eq;

    /// Feeds `events` and returns the name and the closed record of every callback
    fn run(events: &[Ev]) -> Result<Vec<(String, Record)>> {
        let mut out = Vec::new();
        {
            let mut handler = Handler::new(|name, stack| {
                out.push((name.to_owned(), stack.last().cloned().unwrap()));
                Ok(())
            });
            feed(&mut handler, events)?;
            assert!(handler.records().is_empty());
        }
        Ok(out)
    }

    enum Ev {
        Start(&'static str, &'static [(&'static str, &'static str)]),
        Text(&'static str),
        End(&'static str),
    }
    use Ev::*;

    fn feed<C, F>(handler: &mut Handler<C, F>, events: &[Ev]) -> Result<()>
    where
        C: FnMut(&str, &[Record]) -> std::result::Result<(), BoxError>,
        F: FnMut(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>,
    {
        for event in events {
            match event {
                Start(name, attrs) => {
                    let attrs: Attributes = attrs.iter().copied().collect();
                    handler.start_element(name, &attrs)?
                }
                Text(text) => handler.characters(text)?,
                End(name) => handler.end_element(name)?,
            }
        }
        Ok(())
    }

    const VALUE: &[Ev] = &[
        Start("measCollecFile", &[]),
        Start("measData", &[]),
        Start("measInfo", &[("measInfoId", "LTE_QoS")]),
        Start("job", &[("jobId", "7")]),
        End("job"),
        Start("repPeriod", &[("duration", "PT900S")]),
        End("repPeriod"),
        Start("measValue", &[("measObjLdn", "X"), ("optionalInformation", "Y")]),
        Start("measResults", &[]),
        Text("1 2 3"),
        End("measResults"),
        Start("suspect", &[]),
        Text("false"),
        End("suspect"),
        End("measValue"),
        End("measInfo"),
        End("measData"),
        End("measCollecFile"),
    ];

    #[test]
    fn emits_innermost_first() {
        let names: Vec<_> = run(VALUE).unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["measValue", "measInfo", "measData", "measCollecFile"]);
    }

    #[test]
    fn value_block() {
        let out = run(VALUE).unwrap();
        assert_eq!(
            out[0].1,
            Record::MeasValue(MeasValue {
                meas_obj_ldn: "X".into(),
                optional_information: Some("Y".into()),
                meas_results: Some(vec!["1".into(), "2".into(), "3".into()]),
                suspect: Some("false".into()),
            })
        );
    }

    #[test]
    fn info_block() {
        let out = run(VALUE).unwrap();
        assert_eq!(
            out[1].1,
            Record::MeasInfo(MeasInfo {
                meas_info_id: Some("LTE_QoS".into()),
                job_id: Some("7".into()),
                rep_period_duration: Some("PT900S".into()),
                ..MeasInfo::default()
            })
        );
    }

    #[test]
    fn callback_sees_whole_stack() {
        let mut paths = Vec::new();
        {
            let mut handler = Handler::new(|name, stack| {
                let path: Vec<_> = stack.iter().map(Record::name).collect();
                paths.push(format!("{}: {}", name, path.join("/")));
                Ok(())
            });
            feed(&mut handler, VALUE).unwrap();
        }
        assert_eq!(
            paths,
            [
                "measValue: measCollecFile/measData/measInfo/measValue",
                "measInfo: measCollecFile/measData/measInfo",
                "measData: measCollecFile/measData",
                "measCollecFile: measCollecFile",
            ]
        );
    }

    #[test]
    fn skip_everything() {
        let mut calls = 0;
        let mut filtered = 0;
        {
            let mut handler = Handler::new(|_, _| {
                calls += 1;
                Ok(())
            })
            .with_filter(|name, _, stack| {
                filtered += 1;
                assert!(stack.is_empty());
                Ok(Some(name.to_owned()))
            });
            feed(&mut handler, VALUE).unwrap();
            assert!(!handler.is_skipping());
        }
        assert_eq!(calls, 0);
        // only the root was offered to the filter
        assert_eq!(filtered, 1);
    }

    #[test]
    fn skip_one_info_block() {
        let events = [
            Start("measCollecFile", &[]),
            Start("measData", &[]),
            Start("measInfo", &[("measInfoId", "A")]),
            Start("measValue", &[("measObjLdn", "a")]),
            End("measValue"),
            End("measInfo"),
            Start("measInfo", &[("measInfoId", "B")]),
            Start("measValue", &[]),
            End("measValue"),
            End("measInfo"),
            End("measData"),
            End("measCollecFile"),
        ];
        let mut names = Vec::new();
        {
            let mut handler = Handler::new(|name, _| {
                names.push(name.to_owned());
                Ok(())
            })
            .with_filter(|name, attrs, _| {
                Ok((attrs.get("measInfoId") == Some("B")).then(|| name.to_owned()))
            });
            // the skipped measValue lacks measObjLdn, but is never created
            feed(&mut handler, &events).unwrap();
        }
        assert_eq!(names, ["measValue", "measInfo", "measData", "measCollecFile"]);
    }

    #[test]
    fn unknown_wrappers_are_transparent() {
        let out = run(&[
            Start("measCollecFile", &[]),
            Start("fileHeader", &[("fileFormatVersion", "32.435 V10.0")]),
            Start("fileSender", &[("elementType", "RNC")]),
            End("fileSender"),
            Start("measCollec", &[("beginTime", "2024-01-01T00:00:00Z")]),
            End("measCollec"),
            End("fileHeader"),
            Start("vendorExtension", &[("localDn", "ignored")]),
            Start("fileFooter", &[]),
            Start("measCollec", &[("endTime", "2024-01-01T00:15:00Z")]),
            End("measCollec"),
            End("fileFooter"),
            End("vendorExtension"),
            End("measCollecFile"),
        ])
        .unwrap();

        assert_eq!(
            out,
            [(
                "measCollecFile".to_string(),
                Record::MeasCollecFile(crate::records::MeasCollecFile {
                    file_format_version: Some("32.435 V10.0".into()),
                    element_type: Some("RNC".into()),
                    begin_time: Some("2024-01-01T00:00:00Z".into()),
                    end_time: Some("2024-01-01T00:15:00Z".into()),
                    ..Default::default()
                })
            )]
        );
    }

    #[test]
    fn misplaced_record_element_is_ignored() {
        let out = run(&[
            Start("measCollecFile", &[]),
            Start("measData", &[]),
            // measValue outside of measInfo
            Start("measValue", &[("measObjLdn", "X")]),
            Start("measInfo", &[("measInfoId", "nested")]),
            End("measInfo"),
            End("measValue"),
            End("measData"),
            End("measCollecFile"),
        ])
        .unwrap();

        let names: Vec<_> = out.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["measInfo", "measData", "measCollecFile"]);
    }

    #[test]
    fn skip_ending_on_ignored_element() {
        let events = [
            Start("measCollecFile", &[]),
            Start("measData", &[]),
            Start("measInfo", &[]),
            Start("measValue", &[("measObjLdn", "real")]),
            // measValue inside measValue, ignored
            Start("measValue", &[("measObjLdn", "nested")]),
            Start("suspect", &[]),
            Text("true"),
            End("suspect"),
            // closes the skip scope and the ignored element
            End("measValue"),
            End("measValue"),
            End("measInfo"),
            End("measData"),
            End("measCollecFile"),
        ];
        let mut out = Vec::new();
        {
            let mut handler = Handler::new(|name, stack| {
                out.push((name.to_owned(), stack.last().cloned().unwrap()));
                Ok(())
            })
            .with_filter(|name, _, _| Ok((name == "suspect").then(|| "measValue".to_owned())));
            feed(&mut handler, &events).unwrap();
            assert!(handler.records().is_empty());
        }

        let names: Vec<_> = out.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["measValue", "measInfo", "measData", "measCollecFile"]);
        assert_eq!(
            out[0].1,
            Record::MeasValue(MeasValue {
                meas_obj_ldn: "real".into(),
                ..MeasValue::default()
            })
        );
    }

    #[test]
    fn empty_items_are_kept() {
        let out = run(&[
            Start("measCollecFile", &[]),
            Start("measData", &[]),
            Start("measInfo", &[]),
            Start("measType", &[("p", "1")]),
            Text("a"),
            End("measType"),
            Start("measType", &[("p", "2")]),
            End("measType"),
            Start("measValue", &[("measObjLdn", "X")]),
            Start("r", &[("p", "1")]),
            End("r"),
            Start("r", &[("p", "2")]),
            Text("2"),
            End("r"),
            End("measValue"),
            End("measInfo"),
            End("measData"),
            End("measCollecFile"),
        ])
        .unwrap();

        assert_eq!(
            out[0].1.as_meas_value().unwrap().meas_results,
            Some(vec!["".to_string(), "2".to_string()])
        );
        assert_eq!(
            out[1].1.as_meas_info().unwrap().meas_types,
            Some(vec!["a".to_string(), "".to_string()])
        );
    }

    #[test]
    fn text_outside_of_fields_is_dropped() {
        let out = run(&[
            Start("measCollecFile", &[]),
            Text("\n  "),
            Start("measData", &[]),
            Start("measInfo", &[]),
            Start("measTypes", &[]),
            End("measTypes"),
            Text("a b"),
            End("measInfo"),
            End("measData"),
            End("measCollecFile"),
        ])
        .unwrap();

        assert_eq!(out[0].1, Record::MeasInfo(MeasInfo::default()));
    }

    #[test]
    fn prefixed_names() {
        let out = run(&[
            Start("pm:measCollecFile", &[]),
            Start("pm:fileHeader", &[("vendorName", "NN")]),
            End("pm:fileHeader"),
            End("pm:measCollecFile"),
        ])
        .unwrap();

        assert_eq!(out[0].0, "measCollecFile");
        assert_eq!(
            out[0].1.as_meas_collec_file().unwrap().vendor_name.as_deref(),
            Some("NN")
        );
    }

    #[test]
    fn missing_object_ldn() {
        let err = run(&[
            Start("measCollecFile", &[]),
            Start("measData", &[]),
            Start("measInfo", &[]),
            Start("measValue", &[("optionalInformation", "Y")]),
        ])
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "element <measValue> requires attribute `measObjLdn` \
             (open records: measCollecFile/measData/measInfo)"
        );
    }

    #[test]
    fn end_without_record() {
        match run(&[End("measData")]) {
            Err(Error::EmptyStack { found }) => assert_eq!(found, "measData"),
            x => panic!("expected EmptyStack, got {:?}", x),
        }
    }

    #[test]
    fn end_out_of_sequence() {
        match run(&[Start("measCollecFile", &[]), Start("measData", &[]), End("measCollecFile")]) {
            Err(Error::UnexpectedEnd { expected, found }) => {
                assert_eq!(expected, RecordKind::MeasData);
                assert_eq!(found, "measCollecFile");
            }
            x => panic!("expected UnexpectedEnd, got {:?}", x),
        }
    }

    #[test]
    fn callback_error_aborts() {
        let mut handler = Handler::new(|name, _| {
            if name == "measInfo" {
                return Err("stop".into());
            }
            Ok(())
        });
        match feed(&mut handler, VALUE) {
            Err(Error::Callback(e)) => assert_eq!(e.to_string(), "stop"),
            x => panic!("expected callback error, got {:?}", x),
        }
        // the failed record stays open
        assert_eq!(handler.stack().current(), Some(RecordKind::MeasInfo));

        handler.reset();
        assert!(handler.records().is_empty());
    }

    #[test]
    fn reset_between_documents() {
        let mut count = 0;
        {
            let mut handler = Handler::new(|_, _| {
                count += 1;
                Ok(())
            })
            .with_filter(|name, _, _| Ok((name == "measData").then(|| name.to_owned())));

            // abandoned in the middle of a skipped block
            feed(&mut handler, &VALUE[..3]).unwrap();
            assert!(handler.is_skipping());
            handler.reset();
            assert!(!handler.is_skipping());

            feed(&mut handler, &[Start("measCollecFile", &[]), End("measCollecFile")]).unwrap();
        }
        assert_eq!(count, 1);
    }
}
