//! In-memory file store and descriptor table.

use abi_types::{Errno, Word};
use std::collections::HashMap;
use std::sync::Mutex;

/// Open-for-create flag in the open slot's flag word.
pub const O_CREAT: Word = 0o100;

pub const SEEK_SET: Word = 0;
pub const SEEK_CUR: Word = 1;
pub const SEEK_END: Word = 2;

struct OpenFile {
    name: String,
    pos: usize,
}

struct StoreState {
    files: HashMap<String, Vec<u8>>,
    descriptors: HashMap<Word, OpenFile>,
    next_fd: Word,
}

/// Simulated filesystem: named byte vectors plus a descriptor table.
/// Descriptors start at 3, leaving the stdio range untouched.
pub struct FileStore {
    state: Mutex<StoreState>,
    cwd: String,
}

impl Default for FileStore {
    fn default() -> Self {
        Self {
            state: Mutex::new(StoreState {
                files: HashMap::new(),
                descriptors: HashMap::new(),
                next_fd: 3,
            }),
            cwd: "/hosted".to_string(),
        }
    }
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file, for tests that open before any write.
    pub fn put(&self, name: &str, bytes: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(name.to_string(), bytes.to_vec());
    }

    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(name).cloned()
    }

    pub fn open(&self, name: &str, flags: Word) -> Word {
        let mut state = self.state.lock().unwrap();
        if !state.files.contains_key(name) {
            if flags & O_CREAT == 0 {
                return Errno::ENOENT.to_packed();
            }
            state.files.insert(name.to_string(), Vec::new());
        }
        let fd = state.next_fd;
        state.next_fd += 1;
        state.descriptors.insert(
            fd,
            OpenFile {
                name: name.to_string(),
                pos: 0,
            },
        );
        fd
    }

    pub fn close(&self, fd: Word) -> Word {
        match self.state.lock().unwrap().descriptors.remove(&fd) {
            Some(_) => 0,
            None => Errno::EBADF.to_packed(),
        }
    }

    pub fn read(&self, fd: Word, buf: &mut [u8]) -> Word {
        let mut state = self.state.lock().unwrap();
        let Some(open) = state.descriptors.get(&fd) else {
            return Errno::EBADF.to_packed();
        };
        let (name, pos) = (open.name.clone(), open.pos);
        // The position may sit past EOF after a seek; that reads as empty,
        // the same as a position exactly at EOF.
        let tail = state.files[&name].get(pos..).unwrap_or(&[]);
        let n = tail.len().min(buf.len());
        buf[..n].copy_from_slice(&tail[..n]);
        state.descriptors.get_mut(&fd).unwrap().pos = pos + n;
        n
    }

    pub fn write(&self, fd: Word, buf: &[u8]) -> Word {
        let mut state = self.state.lock().unwrap();
        let Some(open) = state.descriptors.get(&fd) else {
            return Errno::EBADF.to_packed();
        };
        let (name, pos) = (open.name.clone(), open.pos);
        let data = state.files.get_mut(&name).unwrap();
        if data.len() < pos + buf.len() {
            data.resize(pos + buf.len(), 0);
        }
        data[pos..pos + buf.len()].copy_from_slice(buf);
        state.descriptors.get_mut(&fd).unwrap().pos = pos + buf.len();
        buf.len()
    }

    pub fn lseek(&self, fd: Word, offset: Word, whence: Word) -> Word {
        let mut state = self.state.lock().unwrap();
        let Some(open) = state.descriptors.get(&fd) else {
            return Errno::EBADF.to_packed();
        };
        let size = state.files[&open.name].len();
        let base = match whence {
            SEEK_SET => 0,
            SEEK_CUR => open.pos,
            SEEK_END => size,
            _ => return Errno::EINVAL.to_packed(),
        };
        let new_pos = base.wrapping_add(offset);
        if (new_pos as isize) < 0 {
            return Errno::EINVAL.to_packed();
        }
        state.descriptors.get_mut(&fd).unwrap().pos = new_pos;
        new_pos
    }

    pub fn size_of_path(&self, name: &str) -> Option<usize> {
        self.state.lock().unwrap().files.get(name).map(Vec::len)
    }

    pub fn size_of_fd(&self, fd: Word) -> Option<usize> {
        let state = self.state.lock().unwrap();
        let open = state.descriptors.get(&fd)?;
        state.files.get(&open.name).map(Vec::len)
    }

    pub fn rename(&self, old: &str, new: &str) -> Word {
        let mut state = self.state.lock().unwrap();
        let Some(data) = state.files.remove(old) else {
            return Errno::ENOENT.to_packed();
        };
        state.files.insert(new.to_string(), data);
        for open in state.descriptors.values_mut() {
            if open.name == old {
                open.name = new.to_string();
            }
        }
        0
    }

    /// Copies the working directory into `buf` with a NUL terminator,
    /// returning the path length. A buffer too small for path plus
    /// terminator is `EINVAL`.
    pub fn getcwd(&self, buf: &mut [u8]) -> Word {
        let path = self.cwd.as_bytes();
        if buf.len() < path.len() + 1 {
            return Errno::EINVAL.to_packed();
        }
        buf[..path.len()].copy_from_slice(path);
        buf[path.len()] = 0;
        path.len()
    }
}
