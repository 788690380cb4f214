//! File operation adapters.
//!
//! Open, seek, stat, rename, and getcwd have dedicated slots. Byte I/O on an
//! open descriptor deliberately does not: read, write, and close go through
//! the generic multiplexer with the host's native operation numbers, so new
//! descriptor operations need no numbering change.

use crate::{nr, retry_intr, Dispatcher};
use abi_types::{AbiError, Errno, Word};
use slot_registry::slots;
use std::ffi::CStr;

/// File metadata filled in by the host stat slots.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatBuf {
    pub size: Word,
}

impl Dispatcher {
    /// Opens a file on the host, returning a descriptor.
    pub fn fs_open(&self, path: &CStr, flags: Word, mode: Word) -> Result<Word, AbiError> {
        self.invoke_decoded(slots::FS_OPEN, &[path.as_ptr() as Word, flags, mode])
    }

    /// Repositions the descriptor offset, returning the new offset.
    pub fn fs_lseek(&self, fd: Word, offset: Word, whence: Word) -> Result<Word, AbiError> {
        self.invoke_decoded(slots::FS_LSEEK, &[fd, offset, whence])
    }

    /// Stats a path into the caller's buffer.
    pub fn fs_stat(&self, path: &CStr, buf: &mut StatBuf) -> Result<(), AbiError> {
        self.invoke_decoded(
            slots::FS_STAT,
            &[path.as_ptr() as Word, buf as *mut StatBuf as Word],
        )?;
        Ok(())
    }

    /// Stats an open descriptor into the caller's buffer.
    pub fn fs_fstat(&self, fd: Word, buf: &mut StatBuf) -> Result<(), AbiError> {
        self.invoke_decoded(slots::FS_FSTAT, &[fd, buf as *mut StatBuf as Word])?;
        Ok(())
    }

    /// Fills `buf` with the host working directory as a NUL-terminated path
    /// and returns its length without the terminator. A buffer too small for
    /// the path surfaces as `EINVAL` from the host.
    pub fn fs_getcwd(&self, buf: &mut [u8]) -> Result<usize, AbiError> {
        let len = self.invoke_decoded(
            slots::FS_GETCWD,
            &[buf.as_mut_ptr() as Word, buf.len() as Word],
        )?;
        Ok(len)
    }

    /// Renames a path on the host.
    pub fn fs_rename(&self, old: &CStr, new: &CStr) -> Result<(), AbiError> {
        self.invoke_decoded(
            slots::FS_RENAME,
            &[old.as_ptr() as Word, new.as_ptr() as Word],
        )?;
        Ok(())
    }

    /// Reads from a descriptor through the multiplexer. Retries `EINTR`.
    pub fn fs_read(&self, fd: Word, buf: &mut [u8]) -> Result<usize, AbiError> {
        retry_intr(|| self.call3(nr::READ, fd, buf.as_mut_ptr() as Word, buf.len() as Word))
    }

    /// Writes to a descriptor through the multiplexer. Retries `EINTR`.
    pub fn fs_write(&self, fd: Word, buf: &[u8]) -> Result<usize, AbiError> {
        retry_intr(|| self.call3(nr::WRITE, fd, buf.as_ptr() as Word, buf.len() as Word))
    }

    /// Closes a descriptor through the multiplexer.
    pub fn fs_close(&self, fd: Word) -> Result<(), AbiError> {
        self.call1(nr::CLOSE, fd)?;
        Ok(())
    }

    /// Checks for a bad descriptor without side effects, mirroring the
    /// classic zero-offset `lseek` probe.
    pub fn fs_is_open(&self, fd: Word) -> Result<bool, AbiError> {
        match self.fs_lseek(fd, 0, 1) {
            Ok(_) => Ok(true),
            Err(AbiError::Host(Errno::EBADF)) => Ok(false),
            Err(err) => Err(err),
        }
    }
}
