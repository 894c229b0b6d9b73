use std::fmt::{Display, Error, Formatter};

pub fn disp_slice<T: Display>(f: &mut Formatter<'_>, slice: &[T], sep: &str) -> Result<(), Error> {
    let mut i = slice.iter();
    if let Some(first) = i.next() {
        write!(f, "{first}")?;
        for other in i {
            write!(f, "{sep}{other}")?;
        }
    }
    Result::Ok(())
}
