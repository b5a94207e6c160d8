/// Types that can be read from a fixed-length little-endian byte sequence.
pub trait Viewable: Sized {
    fn size() -> usize;
    fn view(buf: &[u8]) -> Self;
}

impl Viewable for u16 {
    fn size() -> usize { 2 }
    fn view(buf: &[u8]) -> u16 {
        buf[0] as u16 | (buf[1] as u16) << 8
    }
}

impl Viewable for u32 {
    fn size() -> usize { 4 }
    fn view(buf: &[u8]) -> u32 {
        buf[0] as u32 | (buf[1] as u32) << 8 | (buf[2] as u32) << 16 | (buf[3] as u32) << 24
    }
}

impl Viewable for i32 {
    fn size() -> usize { 4 }
    fn view(buf: &[u8]) -> i32 { <u32 as Viewable>::view(buf) as i32 }
}

impl Viewable for f32 {
    fn size() -> usize { 4 }
    fn view(buf: &[u8]) -> f32 { f32::from_bits(<u32 as Viewable>::view(buf)) }
}

#[test]
fn test_little_endian() {
    let buf = [0x34, 0x12, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x80, 0x3f];
    assert_eq!(<u16 as Viewable>::view(&buf[0..2]), 0x1234);
    assert_eq!(<u32 as Viewable>::view(&buf[0..4]), 0xffff1234);
    assert_eq!(<i32 as Viewable>::view(&buf[2..6]), -1);
    assert_eq!(<f32 as Viewable>::view(&buf[6..10]), 1.0);
}
