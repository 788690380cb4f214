//! Host failure discriminators and the packed-return convention.
//!
//! Syscall-style slots report failure by returning a negative errno packed
//! into the result word. [`decode_packed`] translates that convention into an
//! explicit `Result` so callers never have to interpret raw words themselves.

use crate::Word;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A host-reported failure code.
///
/// Values follow the POSIX numbering the original hosts use; the constants
/// below cover the codes this runtime interprets specially. Unknown codes are
/// carried through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Errno(pub i32);

impl Errno {
    /// Operation not permitted
    pub const EPERM: Errno = Errno(1);
    /// No such file or directory
    pub const ENOENT: Errno = Errno(2);
    /// Interrupted by an asynchronous signal; blocking calls retry on this
    pub const EINTR: Errno = Errno(4);
    /// Bad file descriptor
    pub const EBADF: Errno = Errno(9);
    /// Resource temporarily unavailable (futex: compared value already moved)
    pub const EAGAIN: Errno = Errno(11);
    /// Out of memory
    pub const ENOMEM: Errno = Errno(12);
    /// Device or resource busy
    pub const EBUSY: Errno = Errno(16);
    /// Invalid argument (mutex lifecycle violations report this)
    pub const EINVAL: Errno = Errno(22);
    /// Function not implemented by the host
    pub const ENOSYS: Errno = Errno(38);

    /// Packs this errno into a result word per the negative-return convention.
    pub const fn to_packed(self) -> Word {
        -(self.0 as isize) as Word
    }

    fn name(self) -> Option<&'static str> {
        Some(match self {
            Errno::EPERM => "EPERM",
            Errno::ENOENT => "ENOENT",
            Errno::EINTR => "EINTR",
            Errno::EBADF => "EBADF",
            Errno::EAGAIN => "EAGAIN",
            Errno::ENOMEM => "ENOMEM",
            Errno::EBUSY => "EBUSY",
            Errno::EINVAL => "EINVAL",
            Errno::ENOSYS => "ENOSYS",
            _ => return None,
        })
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "errno({})", self.0),
        }
    }
}

// Required by the `#[from]` conversion into `AbiError::Host`, which wires
// the errno up as the error source.
impl std::error::Error for Errno {}

/// Decodes a syscall-style packed return word.
///
/// Words in `-4095..=-1` (interpreted as signed) are failures; everything
/// else, including large addresses whose top bit is set, is success. This is
/// the same window the C convention uses, so pointer-valued successes are
/// never misread as errors.
pub fn decode_packed(raw: Word) -> Result<Word, Errno> {
    let signed = raw as isize;
    if (-4095..0).contains(&signed) {
        Err(Errno(-signed as i32))
    } else {
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_words_pass_through() {
        assert_eq!(decode_packed(0), Ok(0));
        assert_eq!(decode_packed(7), Ok(7));
        // A heap address with the top bit set is success, not errno.
        assert_eq!(decode_packed(Word::MAX - 5000), Ok(Word::MAX - 5000));
    }

    #[test]
    fn negative_window_decodes_to_errno() {
        assert_eq!(decode_packed(Errno::EINVAL.to_packed()), Err(Errno::EINVAL));
        assert_eq!(decode_packed(Errno::EAGAIN.to_packed()), Err(Errno::EAGAIN));
        assert_eq!(decode_packed((-4095isize) as Word), Err(Errno(4095)));
    }

    #[test]
    fn errno_displays_symbolically() {
        assert_eq!(Errno::EINTR.to_string(), "EINTR");
        assert_eq!(Errno(977).to_string(), "errno(977)");
    }
}
