use errors::Result;
use util::view::Viewable;

/// A pointer into a buffer of bytes. Used for binary file parsing.
#[derive(Copy, Clone)]
pub struct Cur<'a> {
    buf_: &'a [u8],
    pos_: usize,
}

impl<'a> Cur<'a> {
    pub fn new(buf: &[u8]) -> Cur {
        Cur { buf_: buf, pos_: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos_
    }

    pub fn bytes_remaining(&self) -> usize {
        self.buf_.len().saturating_sub(self.pos_)
    }

    pub fn next<T: Viewable>(&mut self) -> Result<T> {
        let buf = self.next_n_u8s(<T as Viewable>::size())?;
        Ok(<T as Viewable>::view(buf))
    }

    pub fn next_n_u8s(&mut self, n: usize) -> Result<&'a [u8]> {
        let end_pos = self.pos_ + n;
        if end_pos > self.buf_.len() {
            bail!("buffer was too short (wanted {} bytes at {:#x})", n, self.pos_);
        }
        let res = &self.buf_[self.pos_ .. end_pos];
        self.pos_ = end_pos;
        Ok(res)
    }

    /// Reads a NUL-terminated string. The NUL is consumed but not returned.
    pub fn next_cstr(&mut self) -> Result<String> {
        let rest = &self.buf_[self.pos_.min(self.buf_.len())..];
        let len = match rest.iter().position(|&b| b == 0) {
            Some(len) => len,
            None => bail!("unterminated string at {:#x}", self.pos_),
        };
        let bytes = self.next_n_u8s(len + 1)?;
        Ok(String::from_utf8_lossy(&bytes[..len]).into_owned())
    }
}

#[test]
fn test_cur() {
    let buf = b"\x01\x00hip\0\x02\x00\x00\x00";
    let mut cur = Cur::new(&buf[..]);
    assert_eq!(cur.next::<u16>().unwrap(), 1);
    assert_eq!(cur.next_cstr().unwrap(), "hip");
    assert_eq!(cur.pos(), 6);
    assert_eq!(cur.next::<i32>().unwrap(), 2);
    assert_eq!(cur.bytes_remaining(), 0);
    assert!(cur.next::<u16>().is_err());
}

#[test]
fn test_cur_unterminated_string() {
    let mut cur = Cur::new(b"abc");
    assert!(cur.next_cstr().is_err());
    assert_eq!(cur.pos(), 0);
}
