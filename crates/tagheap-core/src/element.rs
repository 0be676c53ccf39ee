//! Fixed-size element types a heap can store.
//!
//! A heap is parameterised by one element type `E`; `allocate(count)`
//! requests `count * E::SIZE` payload bytes. Values are moved in and out of
//! the arena by byte copy in native byte order, so the arena never needs to
//! be aligned for `E`.

/// A plain scalar that can be copied to and from raw arena bytes.
///
/// Implemented for the primitive integer and float types. `SIZE` must equal
/// the number of bytes `write_bytes` writes and `read_bytes` consumes.
pub trait Element: Copy + 'static {
    /// Size of one element in bytes.
    const SIZE: usize;

    /// Write `self` into `out`, which is exactly `SIZE` bytes long.
    fn write_bytes(self, out: &mut [u8]);

    /// Read a value from `bytes`, which is exactly `SIZE` bytes long.
    fn read_bytes(bytes: &[u8]) -> Self;
}

macro_rules! impl_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Element for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn write_bytes(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }

                fn read_bytes(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_ne_bytes(raw)
                }
            }
        )*
    };
}

impl_element!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_primitive_widths() {
        assert_eq!(<u8 as Element>::SIZE, 1);
        assert_eq!(<i32 as Element>::SIZE, 4);
        assert_eq!(<f64 as Element>::SIZE, 8);
        assert_eq!(<u128 as Element>::SIZE, 16);
    }

    #[test]
    fn write_uses_native_byte_order() {
        let mut buf = [0u8; 4];
        0x0102_0304u32.write_bytes(&mut buf);
        assert_eq!(buf, 0x0102_0304u32.to_ne_bytes());
    }

    #[test]
    fn negative_and_float_values_survive() {
        let mut buf = [0u8; 8];
        (-7i64).write_bytes(&mut buf);
        assert_eq!(i64::read_bytes(&buf), -7);

        let mut buf = [0u8; 4];
        1.5f32.write_bytes(&mut buf);
        assert_eq!(f32::read_bytes(&buf), 1.5);
    }

    #[test]
    #[should_panic]
    fn short_buffer_panics() {
        let mut buf = [0u8; 2];
        7u32.write_bytes(&mut buf);
    }
}
