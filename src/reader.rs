//! Feeding a [`Handler`] from XML documents.
//!
//! The functions of this module pull events from a [`quick_xml::Reader`] and
//! translate them into [`Handler::start_element`], [`Handler::end_element`]
//! and [`Handler::characters`] calls:
//!
//! - self-closing tags are reported as a start and an end tag;
//! - attribute values are unescaped;
//! - text, CDATA sections and entity references between two tags are joined
//!   into a single `characters` call;
//! - comments, processing instructions and declarations are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::encoding::Decoder;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::attributes::Attributes;
use crate::errors::{BoxError, Result};
use crate::handler::Handler;
use crate::records::Record;

/// Options of the underlying XML reader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Whether whitespace before and after character data should be removed.
    /// Trimming is applied to the joined text of an element, so that
    /// `1 <![CDATA[2]]>` still reads as two tokens. Text that is empty after
    /// trimming is not reported at all.
    ///
    /// List fields are split on whitespace anyway, so this only changes the
    /// value of verbatim fields such as `suspect`.
    ///
    /// (`false` by default)
    pub trim_text: bool,

    /// Whether mismatched closing tag names should be detected by the
    /// tokenizer.
    ///
    /// The handler only checks the end tags of record elements; with this
    /// option disabled, `<job></granPeriod>` goes unnoticed.
    ///
    /// (`true` by default)
    pub check_end_names: bool,
}

impl Config {
    fn apply(&self, config: &mut quick_xml::reader::Config) {
        config.check_end_names = self.check_end_names;
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trim_text: false,
            check_end_names: true,
        }
    }
}

/// Parses a whole document from `reader` with the default [`Config`].
pub fn parse_reader<R, C, F>(reader: R, handler: &mut Handler<C, F>) -> Result<()>
where
    R: BufRead,
    C: FnMut(&str, &[Record]) -> std::result::Result<(), BoxError>,
    F: FnMut(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>,
{
    parse_reader_with_config(reader, &Config::default(), handler)
}

/// Parses a whole document from `reader`.
pub fn parse_reader_with_config<R, C, F>(
    reader: R,
    config: &Config,
    handler: &mut Handler<C, F>,
) -> Result<()>
where
    R: BufRead,
    C: FnMut(&str, &[Record]) -> std::result::Result<(), BoxError>,
    F: FnMut(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>,
{
    let mut reader = Reader::from_reader(reader);
    config.apply(reader.config_mut());

    let mut pump = Pump::new(config);
    let mut buf = Vec::new();
    loop {
        let event = reader.read_event_into(&mut buf)?;
        if !pump.feed(event, reader.decoder(), handler)? {
            break;
        }
        buf.clear();
    }
    trace!("document ended at byte {}", reader.buffer_position());
    Ok(())
}

/// Parses a whole document held in memory.
///
/// # Examples
///
/// ```
/// use meas_collec::{reader, Handler};
///
/// let mut vendors = Vec::new();
/// let mut handler = Handler::new(|_name, stack| {
///     if let Some(file) = stack.last().and_then(|r| r.as_meas_collec_file()) {
///         vendors.push(file.vendor_name.clone());
///     }
///     Ok(())
/// });
/// reader::parse_str(
///     r#"<measCollecFile><fileHeader vendorName="A &amp; B"/></measCollecFile>"#,
///     &mut handler,
/// )
/// .unwrap();
/// drop(handler);
/// assert_eq!(vendors, [Some("A & B".to_string())]);
/// ```
pub fn parse_str<C, F>(xml: &str, handler: &mut Handler<C, F>) -> Result<()>
where
    C: FnMut(&str, &[Record]) -> std::result::Result<(), BoxError>,
    F: FnMut(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>,
{
    parse_reader(xml.as_bytes(), handler)
}

/// Parses an uncompressed collection file.
pub fn parse_file<P, C, F>(path: P, handler: &mut Handler<C, F>) -> Result<()>
where
    P: AsRef<Path>,
    C: FnMut(&str, &[Record]) -> std::result::Result<(), BoxError>,
    F: FnMut(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>,
{
    debug!("parsing {}", path.as_ref().display());
    let file = File::open(path)?;
    parse_reader(BufReader::new(file), handler)
}

/// Parses a gzip compressed collection file, usually named `*.xml.gz`.
#[cfg(feature = "gzip")]
pub fn parse_gzip_file<P, C, F>(path: P, handler: &mut Handler<C, F>) -> Result<()>
where
    P: AsRef<Path>,
    C: FnMut(&str, &[Record]) -> std::result::Result<(), BoxError>,
    F: FnMut(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>,
{
    debug!("parsing gzip {}", path.as_ref().display());
    let file = File::open(path)?;
    parse_gzip_reader(file, handler)
}

/// Parses a gzip compressed document from `reader`.
#[cfg(feature = "gzip")]
pub fn parse_gzip_reader<R, C, F>(reader: R, handler: &mut Handler<C, F>) -> Result<()>
where
    R: std::io::Read,
    C: FnMut(&str, &[Record]) -> std::result::Result<(), BoxError>,
    F: FnMut(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>,
{
    let decoder = flate2::read::GzDecoder::new(reader);
    parse_reader(BufReader::new(decoder), handler)
}

/// Parses a whole document from an asynchronous `reader`.
///
/// Only reading is asynchronous: the callback and the filter of `handler` are
/// called in-line and block the task while they run.
#[cfg(feature = "async-tokio")]
pub async fn parse_async<R, C, F>(
    reader: R,
    config: &Config,
    handler: &mut Handler<C, F>,
) -> Result<()>
where
    R: tokio::io::AsyncBufRead + Unpin,
    C: FnMut(&str, &[Record]) -> std::result::Result<(), BoxError>,
    F: FnMut(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>,
{
    let mut reader = Reader::from_reader(reader);
    config.apply(reader.config_mut());

    let mut pump = Pump::new(config);
    let mut buf = Vec::new();
    loop {
        let event = reader.read_event_into_async(&mut buf).await?;
        if !pump.feed(event, reader.decoder(), handler)? {
            break;
        }
        buf.clear();
    }
    Ok(())
}

/// Translates tokenizer events into handler calls.
struct Pump {
    /// Character data seen since the last tag
    text: String,
    /// Reused for every start tag
    attrs: Attributes,
    trim_text: bool,
}

impl Pump {
    fn new(config: &Config) -> Self {
        Pump {
            text: String::new(),
            attrs: Attributes::new(),
            trim_text: config.trim_text,
        }
    }

    /// Forwards one event. Returns `false` once the end of the document is
    /// reached.
    fn feed<C, F>(
        &mut self,
        event: Event,
        decoder: Decoder,
        handler: &mut Handler<C, F>,
    ) -> Result<bool>
    where
        C: FnMut(&str, &[Record]) -> std::result::Result<(), BoxError>,
        F: FnMut(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>,
    {
        match event {
            Event::Start(e) => {
                self.flush(handler)?;
                self.start(&e, decoder, handler)?;
            }
            Event::Empty(e) => {
                self.flush(handler)?;
                self.start(&e, decoder, handler)?;
                handler.end_element(&decoder.decode(e.name().as_ref())?)?;
            }
            Event::End(e) => {
                self.flush(handler)?;
                handler.end_element(&decoder.decode(e.name().as_ref())?)?;
            }
            Event::Text(e) => self.text.push_str(&e.decode()?),
            Event::CData(e) => self.text.push_str(&e.decode()?),
            Event::GeneralRef(e) => {
                if let Some(ch) = e.resolve_char_ref()? {
                    self.text.push(ch);
                } else {
                    let entity = e.decode()?;
                    match resolve_predefined_entity(&entity) {
                        Some(value) => self.text.push_str(value),
                        // no DTD support, keep unknown references as written
                        None => {
                            self.text.push('&');
                            self.text.push_str(&entity);
                            self.text.push(';');
                        }
                    }
                }
            }
            Event::Eof => {
                self.flush(handler)?;
                return Ok(false);
            }
            _ => {}
        }
        Ok(true)
    }

    fn start<C, F>(
        &mut self,
        e: &BytesStart,
        decoder: Decoder,
        handler: &mut Handler<C, F>,
    ) -> Result<()>
    where
        C: FnMut(&str, &[Record]) -> std::result::Result<(), BoxError>,
        F: FnMut(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>,
    {
        self.attrs.clear();
        for attr in e.attributes() {
            let attr = attr?;
            let key = decoder.decode(attr.key.as_ref())?;
            let value = attr.decode_and_unescape_value(decoder)?;
            self.attrs.push(key, value);
        }
        handler.start_element(&decoder.decode(e.name().as_ref())?, &self.attrs)
    }

    fn flush<C, F>(&mut self, handler: &mut Handler<C, F>) -> Result<()>
    where
        C: FnMut(&str, &[Record]) -> std::result::Result<(), BoxError>,
        F: FnMut(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>,
    {
        let text = if self.trim_text {
            self.text.trim()
        } else {
            self.text.as_str()
        };
        let result = if text.is_empty() {
            Ok(())
        } else {
            handler.characters(text)
        };
        self.text.clear();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MeasValue;
    use pretty_assertions::assert_eq;

    fn values(xml: &str, config: &Config) -> Result<Vec<MeasValue>> {
        let mut out = Vec::new();
        let mut handler = Handler::new(|_, stack| {
            if let Some(Record::MeasValue(value)) = stack.last() {
                out.push(value.clone());
            }
            Ok(())
        });
        parse_reader_with_config(xml.as_bytes(), config, &mut handler)?;
        drop(handler);
        Ok(out)
    }

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- comment -->
<measCollecFile xmlns="http://www.3gpp.org/ftp/specs/archive/32_series/32.435#measCollec">
  <measData>
    <measInfo>
      <measValue measObjLdn="cell=&quot;1&quot;">
        <measResults>1 <![CDATA[2]]>&#x20;3</measResults>
        <suspect> false </suspect>
      </measValue>
    </measInfo>
  </measData>
</measCollecFile>"#;

    #[test]
    fn joins_text_pieces() {
        let values = values(DOC, &Config::default()).unwrap();
        assert_eq!(
            values,
            [MeasValue {
                meas_obj_ldn: "cell=\"1\"".into(),
                meas_results: Some(vec!["1".into(), "2".into(), "3".into()]),
                suspect: Some(" false ".into()),
                ..MeasValue::default()
            }]
        );
    }

    #[test]
    fn trimmed_text() {
        let config = Config {
            trim_text: true,
            ..Config::default()
        };
        let values = values(DOC, &config).unwrap();
        assert_eq!(values[0].suspect.as_deref(), Some("false"));
    }

    #[test]
    fn self_closing_tags() {
        let xml = r#"<measCollecFile><measData><measInfo>
            <measValue measObjLdn="a"/><measValue measObjLdn="b"><suspect/></measValue>
        </measInfo></measData></measCollecFile>"#;
        let values = values(xml, &Config::default()).unwrap();
        let ldns: Vec<_> = values.iter().map(|v| v.meas_obj_ldn.as_str()).collect();
        assert_eq!(ldns, ["a", "b"]);
        assert_eq!(values[1].suspect, None);
    }

    #[test]
    fn tokenizer_errors() {
        match values("<measCollecFile><measData></measInfo>", &Config::default()) {
            Err(crate::Error::Xml(_)) => {}
            x => panic!("expected XML error, got {:?}", x),
        }
    }
}
