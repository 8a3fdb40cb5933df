//! Allocation-free integer formatting.

/// Exactly `N` decimal digits of `value`, most significant first, with
/// leading zeros. Digits above `N` are dropped.
pub const fn decimal_fixed<const N: usize>(value: u32) -> [u8; N] {
    let mut out = [b'0'; N];
    let mut v = value;
    let mut i = N;
    while i > 0 {
        i -= 1;
        out[i] = b'0' + (v % 10) as u8;
        v /= 10;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_keeps_leading_zeros() {
        assert_eq!(&decimal_fixed::<5>(42), b"00042");
        assert_eq!(&decimal_fixed::<5>(0), b"00000");
        assert_eq!(&decimal_fixed::<5>(65535), b"65535");
        assert_eq!(&decimal_fixed::<3>(12345), b"345");
    }
}
