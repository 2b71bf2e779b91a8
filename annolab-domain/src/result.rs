use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
};

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct AlError {
    msg: String,
}
impl AlError {
    pub fn new(msg: &str) -> AlError {
        AlError {
            msg: msg.to_string(),
        }
    }
    pub fn msg(&self) -> &str {
        &self.msg
    }
}
impl Display for AlError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}
impl Error for AlError {}
impl From<&str> for AlError {
    fn from(value: &str) -> Self {
        AlError::new(value)
    }
}
/// Annolab's result type with [`AlError`](AlError) as error type.
pub type AlResult<U> = Result<U, AlError>;

/// Creates an [`AlError`](AlError) with a formatted message.
/// ```rust
/// # use std::error::Error;
/// use annolab_domain::{alerr, result::AlError};
/// # fn main() -> Result<(), Box<dyn Error>> {
/// assert_eq!(alerr!("some error {}", 1), AlError::new(format!("some error {}", 1).as_str()));
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! alerr {
    ($s:literal) => {
        $crate::result::AlError::new(format!($s).as_str())
    };
    ($s:literal, $( $exps:expr ),*) => {
        $crate::result::AlError::new(format!($s, $($exps,)*).as_str())
    }
}

pub fn to_al<E: Debug>(e: E) -> AlError {
    alerr!(
        "original error type is '{:?}', error message is '{:?}'",
        std::any::type_name::<E>(),
        e
    )
}
