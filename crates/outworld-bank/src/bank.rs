//! Resource banks.
//!
//! [`Resources`] owns the memory list and the data of every loaded
//! resource. It reads entries out of the `BANKxx` files of a data
//! directory, unpacking them when needed, and switches game parts on
//! request from bytecode.

use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use outworld_core::{GamePart, ResourceEntry, ResourceState};
use outworld_vm::{ResourceError, ResourceProvider};

use crate::memlist::{MemEntry, MemList, MemListError};
use crate::unpack::{UnpackError, unpack_in_place};

pub const MEMLIST_FILE: &str = "MEMLIST.BIN";
/// Summary written to the dump directory.
pub const DUMP_SUMMARY_FILE: &str = "memlist.txt";

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid memory list: {0}")]
    MemList(#[from] MemListError),
    #[error("unknown resource {0:#04x}")]
    UnknownResource(u16),
    #[error("{bank} ends before the end of resource {id:#04x}")]
    ShortBank { id: u16, bank: String },
    #[error("cannot unpack resource {id:#04x}: {source}")]
    Unpack { id: u16, source: UnpackError },
    #[error("unknown game part {0:#06x}")]
    UnknownPart(u16),
}

/// Data of a freshly loaded game part.
#[derive(Clone, Debug)]
pub struct LoadedPart {
    pub part: &'static GamePart,
    pub palettes: Arc<[u8]>,
    pub bytecode: Arc<[u8]>,
    pub cinematic: Arc<[u8]>,
    pub characters: Option<Arc<[u8]>>,
}

#[derive(Debug)]
pub struct Resources {
    data_dir: PathBuf,
    dump_dir: Option<PathBuf>,
    memlist: MemList,
    states: Vec<ResourceState>,
    data: Vec<Option<Arc<[u8]>>>,
    current_part: Option<u16>,
    requested_part: Option<u16>,
}

impl Resources {
    /// Read `MEMLIST.BIN` from `data_dir`.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, BankError> {
        let data_dir = data_dir.into();
        let path = data_dir.join(MEMLIST_FILE);
        let bytes = fs::read(&path).map_err(|source| BankError::Io { path, source })?;
        let memlist = MemList::parse(&bytes)?;
        tracing::debug!(
            entries = memlist.len(),
            dir = %data_dir.display(),
            "loaded memory list"
        );
        Ok(Self::with_memlist(data_dir, memlist))
    }

    /// Use an already parsed memory list. Every entry starts out not needed.
    pub fn with_memlist(data_dir: impl Into<PathBuf>, memlist: MemList) -> Self {
        let count = memlist.len();
        Self {
            data_dir: data_dir.into(),
            dump_dir: None,
            memlist,
            states: vec![ResourceState::NotNeeded; count],
            data: vec![None; count],
            current_part: None,
            requested_part: None,
        }
    }

    /// Write every resource loaded from now on to `dir`, along with a
    /// summary of the memory list.
    pub fn dump_to(&mut self, dir: impl Into<PathBuf>) -> Result<(), BankError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| BankError::Io {
            path: dir.clone(),
            source,
        })?;
        let path = dir.join(DUMP_SUMMARY_FILE);
        fs::write(&path, self.memlist.to_string())
            .map_err(|source| BankError::Io { path, source })?;
        self.dump_dir = Some(dir);
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn memlist(&self) -> &MemList {
        &self.memlist
    }

    pub fn entry(&self, id: u16) -> Result<&MemEntry, BankError> {
        self.memlist.get(id).ok_or(BankError::UnknownResource(id))
    }

    pub fn state(&self, id: u16) -> Option<ResourceState> {
        self.states.get(usize::from(id)).copied()
    }

    /// Data of a loaded resource.
    pub fn data(&self, id: u16) -> Option<&[u8]> {
        self.data.get(usize::from(id))?.as_deref()
    }

    /// Read and unpack resource `id` without changing its load state.
    pub fn read(&self, id: u16) -> Result<Vec<u8>, BankError> {
        let entry = *self.entry(id)?;
        let mut buf = self.read_packed(&entry)?;
        if entry.is_packed() {
            let unpacked = usize::from(entry.unpacked_size);
            buf.resize(unpacked, 0);
            unpack_in_place(&mut buf, usize::from(entry.packed_size), unpacked)
                .map_err(|source| BankError::Unpack { id, source })?;
        }
        Ok(buf)
    }

    /// Raw bytes of resource `id` as stored in its bank.
    pub fn read_packed(&self, entry: &MemEntry) -> Result<Vec<u8>, BankError> {
        let path = self.data_dir.join(entry.bank_file());
        let io_error = |source: io::Error| BankError::Io {
            path: path.clone(),
            source,
        };

        let mut file = File::open(&path).map_err(io_error)?;
        file.seek(SeekFrom::Start(u64::from(entry.bank_offset)))
            .map_err(io_error)?;
        let mut buf = vec![0; usize::from(entry.packed_size)];
        file.read_exact(&mut buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                BankError::ShortBank {
                    id: entry.id,
                    bank: entry.bank_file(),
                }
            } else {
                io_error(e)
            }
        })?;
        Ok(buf)
    }

    /// Load resource `id` unless it is loaded already.
    pub fn load(&mut self, id: u16) -> Result<Arc<[u8]>, BankError> {
        let index = usize::from(id);
        if let Some(Some(data)) = self.data.get(index) {
            return Ok(Arc::clone(data));
        }

        let entry = *self.entry(id)?;
        tracing::debug!(
            id = format_args!("{id:#04x}"),
            kind = %entry.kind,
            bank = format_args!("{:#04x}", entry.bank),
            "loading resource"
        );
        let data: Arc<[u8]> = self.read(id)?.into();
        self.dump(&entry, &data)?;

        self.states[index] = ResourceState::Loaded;
        self.data[index] = Some(Arc::clone(&data));
        Ok(data)
    }

    /// Forget every loaded resource.
    pub fn invalidate_all(&mut self) {
        self.states.fill(ResourceState::NotNeeded);
        self.data.fill(None);
    }

    /// Drop everything and load the resources of part `id`.
    pub fn load_part(&mut self, id: u16) -> Result<LoadedPart, BankError> {
        let part = GamePart::lookup(id).ok_or(BankError::UnknownPart(id))?;
        tracing::debug!(part = part.name, id = format_args!("{id:#06x}"), "loading part");

        self.invalidate_all();
        let palettes = self.load(u16::from(part.palettes))?;
        let bytecode = self.load(u16::from(part.bytecode))?;
        let cinematic = self.load(u16::from(part.cinematic))?;
        let characters = match part.characters {
            0 => None,
            res => Some(self.load(u16::from(res))?),
        };

        self.current_part = Some(id);
        self.requested_part = None;
        Ok(LoadedPart {
            part,
            palettes,
            bytecode,
            cinematic,
            characters,
        })
    }

    pub fn current_part(&self) -> Option<u16> {
        self.current_part
    }

    /// Part requested by bytecode since the last call.
    pub fn take_requested_part(&mut self) -> Option<u16> {
        self.requested_part.take()
    }

    fn dump(&self, entry: &MemEntry, data: &[u8]) -> Result<(), BankError> {
        let Some(dir) = &self.dump_dir else {
            return Ok(());
        };
        let path = dir.join(entry.dump_name());
        fs::write(&path, data).map_err(|source| BankError::Io { path, source })
    }
}

impl ResourceProvider for Resources {
    fn resource(&self, id: u16) -> Option<ResourceEntry> {
        let entry = self.memlist.get(id)?;
        Some(ResourceEntry {
            kind: entry.kind,
            state: self.states[usize::from(id)],
            size: entry.unpacked_size,
        })
    }

    /// Ids past the end of the memory list request a part switch; the part
    /// is loaded by whoever drives the machine once the pass is over.
    fn load_resource(&mut self, id: u16) -> Result<(), ResourceError> {
        if usize::from(id) >= self.memlist.len() {
            if GamePart::lookup(id).is_none() {
                return Err(BankError::UnknownPart(id).into());
            }
            tracing::debug!(part = format_args!("{id:#06x}"), "part requested");
            self.requested_part = Some(id);
            return Ok(());
        }
        self.load(id)?;
        Ok(())
    }
}
