/// Whether `s1` was issued after `s2` on a 16-bit wrapping counter.
///
/// `s1` is more recent when the signed distance from `s2` to `s1` is positive.
/// Equal numbers are never more recent, and neither is a number exactly half
/// the ring away.
///
/// ```
/// # use tandem_shared::sequence_greater_than;
/// assert!(sequence_greater_than(2, 1));
/// assert!(sequence_greater_than(0, 65535));
/// assert!(!sequence_greater_than(1, 1));
/// ```
pub fn sequence_greater_than(s1: u16, s2: u16) -> bool {
    wrapping_diff(s2, s1) > 0
}

/// Whether `s1` was issued before `s2`. See [`sequence_greater_than`].
pub fn sequence_less_than(s1: u16, s2: u16) -> bool {
    sequence_greater_than(s2, s1)
}

/// Signed distance travelling forward from `a` to `b` on the 16-bit ring.
///
/// ```
/// # use tandem_shared::wrapping_diff;
/// assert_eq!(wrapping_diff(1, 2), 1);
/// assert_eq!(wrapping_diff(2, 1), -1);
/// assert_eq!(wrapping_diff(65535, 0), 1);
/// assert_eq!(wrapping_diff(0, 65535), -1);
/// ```
pub fn wrapping_diff(a: u16, b: u16) -> i16 {
    b.wrapping_sub(a) as i16
}
