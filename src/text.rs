//! Routing of character data into record fields.
//!
//! Fields whose value is the text content of an element are filled in two
//! steps: the start tag arms one [`TextField`], and the next character data
//! event is written into that field of the current record.

use crate::records::Record;
use crate::stack::ContextStack;

/// A record field filled from element text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TextField {
    /// `measTypes`: whitespace separated list replacing `MeasInfo::meas_types`
    MeasTypes,
    /// `measType`: one item appended to `MeasInfo::meas_types`
    MeasType,
    /// `measResults`: whitespace separated list replacing `MeasValue::meas_results`
    MeasResults,
    /// `r`: one item appended to `MeasValue::meas_results`
    MeasResult,
    /// `suspect`: stored verbatim in `MeasValue::suspect`
    Suspect,
}

impl TextField {
    /// Writes `text` into the field of `record`.
    ///
    /// Returns `false` if `record` has no such field.
    fn write(self, record: &mut Record, text: &str) -> bool {
        match (self, record) {
            (TextField::MeasTypes, Record::MeasInfo(info)) => {
                info.meas_types = Some(tokens(text));
            }
            (TextField::MeasType, Record::MeasInfo(info)) => {
                info.meas_types
                    .get_or_insert_with(Vec::new)
                    .push(text.trim().to_owned());
            }
            (TextField::MeasResults, Record::MeasValue(value)) => {
                value.meas_results = Some(tokens(text));
            }
            (TextField::MeasResult, Record::MeasValue(value)) => {
                value
                    .meas_results
                    .get_or_insert_with(Vec::new)
                    .push(text.trim().to_owned());
            }
            (TextField::Suspect, Record::MeasValue(value)) => {
                value.suspect = Some(text.to_owned());
            }
            _ => return false,
        }
        true
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

/// Single slot holding the field that receives the next text event
#[derive(Clone, Debug, Default)]
pub(crate) struct TextRouter {
    armed: Option<TextField>,
}

impl TextRouter {
    #[inline]
    pub fn arm(&mut self, field: TextField) {
        self.armed = Some(field);
    }

    #[inline]
    pub fn disarm(&mut self) {
        self.armed = None;
    }

    /// Disarms on an element boundary. An item field that received no text
    /// still gets an empty item, so that items keep their position.
    pub fn close(&mut self, stack: &mut ContextStack) {
        let field = match self.armed.take() {
            Some(field @ (TextField::MeasType | TextField::MeasResult)) => field,
            _ => return,
        };
        trace!("empty {:?}", field);
        if let Some(record) = stack.current_mut() {
            field.write(record, "");
        }
    }

    /// Writes `text` into the armed field of the current record and disarms.
    /// Text arriving while nothing is armed is dropped.
    pub fn route(&mut self, stack: &mut ContextStack, text: &str) {
        let field = match self.armed.take() {
            Some(field) => field,
            None => return,
        };
        let written = match stack.current_mut() {
            Some(record) => field.write(record, text),
            None => false,
        };
        if !written {
            trace!("dropping text for {:?} in {:?}", field, stack.current());
        }
    }
}
