use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tagsmith_types::ObjectId;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::replace::ReplaceMap;
use crate::traits::ObjectStore;

/// Default zstd compression level for loose objects.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Directory under the store root holding object files.
const OBJECTS_DIR: &str = "objects";
/// Directory under the store root holding replacement entries.
const REPLACE_DIR: &str = "replace";

/// Filesystem store with one compressed file per object.
///
/// On-disk layout:
/// ```text
/// <root>/objects/<2 hex>/<62 hex>   zstd("<type> <size>\0<data>")
/// <root>/replace/<64 hex>           "<replacement hex>\n"
/// ```
///
/// Each file is written to a temporary file in its final directory and then
/// linked into place without overwriting. If two writers race on the same
/// ID, the first rename wins and the second observes `AlreadyExists`, which is
/// treated as success.
#[derive(Debug, Clone)]
pub struct LooseObjectStore {
    root: PathBuf,
    compression_level: i32,
}

impl LooseObjectStore {
    /// Open the store rooted at `root`, creating its directories if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(OBJECTS_DIR))?;
        fs::create_dir_all(root.join(REPLACE_DIR))?;
        debug!(root = %root.display(), "opened loose object store");
        Ok(Self {
            root,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        })
    }

    /// Override the zstd compression level used for new objects.
    pub fn with_compression_level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }

    /// The store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `id`.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let (dir, file) = id.fanout();
        self.root.join(OBJECTS_DIR).join(dir).join(file)
    }

    /// Register `replacement` to stand in for `original` during verification.
    ///
    /// An existing entry for `original` is overwritten.
    pub fn add_replacement(&self, original: &ObjectId, replacement: &ObjectId) -> StoreResult<()> {
        let dir = self.root.join(REPLACE_DIR);
        let mut tmp = NamedTempFile::new_in(&dir)?;
        writeln!(tmp, "{replacement}")?;
        tmp.as_file().sync_all()?;
        tmp.persist(dir.join(original.to_hex()))
            .map_err(|e| StoreError::Io(e.error))?;
        debug!(%original, %replacement, "registered replacement");
        Ok(())
    }

    /// Remove the replacement entry for `original`. Returns `true` if one existed.
    pub fn remove_replacement(&self, original: &ObjectId) -> StoreResult<bool> {
        match fs::remove_file(self.root.join(REPLACE_DIR).join(original.to_hex())) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Load every replacement entry from disk.
    pub fn load_replacements(&self) -> StoreResult<ReplaceMap> {
        let mut map = ReplaceMap::new();
        for entry in fs::read_dir(self.root.join(REPLACE_DIR))? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 replace entry");
                continue;
            };
            let Ok(original) = name.parse::<ObjectId>() else {
                // Temporary files from an in-flight add_replacement land here too.
                debug!(name, "skipping foreign file in replace directory");
                continue;
            };
            let contents = fs::read_to_string(entry.path())?;
            let replacement = contents.trim_end().parse::<ObjectId>().map_err(|e| {
                StoreError::InvalidReplacement {
                    id: original,
                    reason: e.to_string(),
                }
            })?;
            map.insert(original, replacement);
        }
        Ok(map)
    }
}

impl ObjectStore for LooseObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let compressed = match fs::read(self.object_path(id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let raw = zstd::decode_all(compressed.as_slice()).map_err(|e| StoreError::CorruptObject {
            id: *id,
            reason: format!("decompression failed: {e}"),
        })?;
        StoredObject::from_loose_bytes(id, &raw).map(Some)
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        if id.is_null() {
            return Err(StoreError::NullObjectId);
        }

        let path = self.object_path(&id);
        if path.exists() {
            debug!(%id, "object already present, skipping write");
            return Ok(id);
        }

        let dir = path
            .parent()
            .ok_or_else(|| StoreError::Io(io::Error::other("object path has no parent")))?;
        fs::create_dir_all(dir)?;

        let compressed = zstd::encode_all(object.to_loose_bytes().as_slice(), self.compression_level)
            .map_err(|e| StoreError::Compression(e.to_string()))?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&compressed)?;
        tmp.as_file().sync_all()?;
        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                debug!(%id, kind = %object.kind, size = object.size, "wrote loose object");
                Ok(id)
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                debug!(%id, "lost write race, object already present");
                Ok(id)
            }
            Err(e) => Err(StoreError::Io(e.error)),
        }
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }

    fn replacement(&self, id: &ObjectId) -> StoreResult<ObjectId> {
        self.load_replacements()?.resolve(id)
    }
}
