macro_rules! field_helper2 {
    ($cur:ident, (unorm16($lo:expr, $hi:expr))) => {
        {
            let x = $cur.next::<u16>()?;
            ::util::quantize::dequantize_u16(x, $lo, $hi)
        }
    };
    ($cur:ident, cstr) => { $cur.next_cstr()? };
    ($cur:ident, Cur) => { $cur.clone() };
    ($cur:ident, $t:ty) => { $cur.next::<$t>()? };
}

macro_rules! field_helper {
    ($c:ident, $name:ident, $field:ident, Cur) => {
        let $field = field_helper2!($c, Cur);
    };
    ($c:ident, $name:ident, $field:ident, $ty:tt) => {
        let pos = $c.pos();
        let $field = field_helper2!($c, $ty);
        trace!("{}.{}@{:#x}: {:?}",
            stringify!($name),
            stringify!($field),
            pos,
            $field,
        );
    }
}

/// Reads a sequence of named fields from a `Cur`, binding each to a local
/// of the same name and tracing it. The cursor expression is copied, so
/// bind an `end: Cur` field to pick up where the reads left off.
macro_rules! fields {
    ($cur:expr, $name:ident { $($field:ident : $ty:tt,)* }) => {
        let mut c = $cur;
        $(field_helper!(c, $name, $field, $ty);)*
    };
    ($cur:ident, $name:ident { $($field:ident : $ty:tt),* }) => {
        fields!($cur, $name { $($field : $ty,)* });
    };
}
