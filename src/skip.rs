//! Caller directed pruning of subtrees.

use crate::attributes::Attributes;
use crate::errors::{BoxError, Error, Result};
use crate::records::Record;

/// Tracks the single active skip scope.
///
/// The scope is closed by the first end tag carrying the same name, not by
/// the end tag matching the start that opened it. A scope named after an
/// element that nests into itself therefore ends at the innermost closing tag.
#[derive(Clone, Debug, Default)]
pub(crate) struct SkipGate {
    scope: Option<String>,
}

impl SkipGate {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.scope.is_some()
    }

    /// Handles a start tag. Returns `true` if the element must be suppressed,
    /// either because a scope is already active or because `filter` opened one.
    pub fn on_start<F>(
        &mut self,
        filter: &mut F,
        name: &str,
        attrs: &Attributes,
        records: &[Record],
    ) -> Result<bool>
    where
        F: FnMut(&str, &Attributes, &[Record]) -> std::result::Result<Option<String>, BoxError>,
    {
        if self.scope.is_none() {
            if let Some(scope) = filter(name, attrs, records).map_err(Error::Filter)? {
                debug!("skipping from <{}> until </{}>", name, scope);
                self.scope = Some(scope);
            }
        }
        Ok(self.scope.is_some())
    }

    /// Handles an end tag while skipping. Closes the scope if `name` matches.
    pub fn end(&mut self, name: &str) {
        if self.scope.as_deref() == Some(name) {
            debug!("end of skipped </{}>", name);
            self.scope = None;
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.scope = None;
    }
}
