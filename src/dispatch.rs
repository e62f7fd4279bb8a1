//! Context sensitive rules of the collection file vocabulary.
//!
//! Each rule is keyed by the kind of the current record (or the top level of
//! the document) and the local name of the element being opened. Pairs that
//! have no rule are transparent wrappers: nothing happens on their start tag
//! and their children are processed in the unchanged context. This is what
//! routes `fileFooter/measCollec@endTime` into the file record.

use crate::attributes::Attributes;
use crate::errors::{Error, Result};
use crate::records::{MeasCollecFile, MeasData, MeasInfo, MeasValue, Record, RecordKind};
use crate::stack::ContextStack;
use crate::text::TextField;

/// What to do with an element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// Create a record of that kind and make it the current context
    Open(RecordKind),
    /// Copy the element attributes into the current record
    Merge,
    /// Copy one attribute into a differently named field of the current record
    MergeAs {
        attribute: &'static str,
        field: &'static str,
    },
    /// Route the element text into a field of the current record
    Capture(TextField),
}

/// Looks up the rule for element `name` opened in `context`
pub(crate) fn lookup(context: Option<RecordKind>, name: &str) -> Option<Action> {
    let action = match (context, name) {
        (None, "measCollecFile") => Action::Open(RecordKind::MeasCollecFile),

        // fileHeader@fileFormatVersion, @vendorName, @dnPrefix
        // fileSender@localDn, @elementType
        // fileHeader/measCollec@beginTime, fileFooter/measCollec@endTime
        (Some(RecordKind::MeasCollecFile), "fileHeader" | "fileSender" | "measCollec") => {
            Action::Merge
        }
        (Some(RecordKind::MeasCollecFile), "measData") => Action::Open(RecordKind::MeasData),

        // managedElement@localDn, @userLabel, @swVersion
        (Some(RecordKind::MeasData), "managedElement") => Action::Merge,
        (Some(RecordKind::MeasData), "measInfo") => Action::Open(RecordKind::MeasInfo),

        // job@jobId, granPeriod@endTime, @duration
        (Some(RecordKind::MeasInfo), "job" | "granPeriod") => Action::Merge,
        (Some(RecordKind::MeasInfo), "repPeriod") => Action::MergeAs {
            attribute: "duration",
            field: "repPeriodDuration",
        },
        (Some(RecordKind::MeasInfo), "measTypes") => Action::Capture(TextField::MeasTypes),
        (Some(RecordKind::MeasInfo), "measType") => Action::Capture(TextField::MeasType),
        (Some(RecordKind::MeasInfo), "measValue") => Action::Open(RecordKind::MeasValue),

        (Some(RecordKind::MeasValue), "measResults") => Action::Capture(TextField::MeasResults),
        (Some(RecordKind::MeasValue), "r") => Action::Capture(TextField::MeasResult),
        (Some(RecordKind::MeasValue), "suspect") => Action::Capture(TextField::Suspect),

        _ => return None,
    };
    Some(action)
}

/// Creates a record of `kind` from the attributes that are captured when its
/// element opens.
pub(crate) fn create(kind: RecordKind, attrs: &Attributes, stack: &ContextStack) -> Result<Record> {
    let owned = |key: &str| attrs.get(key).map(str::to_owned);

    Ok(match kind {
        RecordKind::MeasCollecFile => MeasCollecFile::default().into(),
        RecordKind::MeasData => MeasData::default().into(),
        RecordKind::MeasInfo => MeasInfo {
            meas_info_id: owned("measInfoId"),
            ..MeasInfo::default()
        }
        .into(),
        RecordKind::MeasValue => {
            let meas_obj_ldn = owned("measObjLdn").ok_or_else(|| Error::MissingAttribute {
                element: RecordKind::MeasValue,
                attribute: "measObjLdn",
                context: stack.path(),
            })?;
            MeasValue {
                meas_obj_ldn,
                optional_information: owned("optionalInformation"),
                ..MeasValue::default()
            }
            .into()
        }
    })
}
