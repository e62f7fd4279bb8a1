//! Element name handling.
//!
//! Collection files are usually written with a default namespace, but some
//! vendors bind the 3GPP namespace to a prefix (`<pm:measInfo>`). The
//! vocabulary is matched on the [local name] only.
//!
//! [local name]: https://www.w3.org/TR/xml-names11/#dt-localname

use memchr::memchr;

/// Returns `name` without its namespace prefix.
///
/// ```
/// # use meas_collec::name::local_name;
/// assert_eq!(local_name("measInfo"), "measInfo");
/// assert_eq!(local_name("pm:measInfo"), "measInfo");
/// ```
#[inline]
pub fn local_name(name: &str) -> &str {
    match memchr(b':', name.as_bytes()) {
        // `:` is ASCII, so `i + 1` is always a char boundary
        Some(i) => &name[i + 1..],
        None => name,
    }
}
