//! dg-save: File-backed region store
//!
//! One pretty-printed JSON file per region, prefixed by a versioned header.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use dg_core::{NodeStore, RegionGraph, StoreError};

/// Current region file format version
pub const STORE_VERSION: u32 = 1;

const EXTENSION: &str = "json";

/// Region file header for versioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHeader {
    /// Magic identifier
    pub magic: String,
    /// File format version
    pub version: u32,
    pub region_id: String,
    pub seed: u64,
    /// Node count at save time
    pub nodes: usize,
    /// Seconds since the epoch
    pub timestamp: u64,
}

impl StoreHeader {
    const MAGIC: &'static str = "DGRS";

    pub fn new(graph: &RegionGraph) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: STORE_VERSION,
            region_id: graph.region_id.clone(),
            seed: graph.seed,
            nodes: graph.len(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.magic != Self::MAGIC {
            return Err(StoreError::InvalidHeader);
        }
        if self.version != STORE_VERSION {
            return Err(StoreError::IncompatibleVersion {
                expected: STORE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Complete region file structure
#[derive(Serialize, Deserialize)]
pub struct RegionFile {
    pub header: StoreHeader,
    pub region: RegionGraph,
}

/// Directory of region files
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Per-user default directory
    pub fn default_location() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("dungeon-regions");
        path.push("regions");
        path
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for a region id
    pub fn path_for(&self, region_id: &str) -> Result<PathBuf, StoreError> {
        if region_id.is_empty()
            || region_id.starts_with('.')
            || region_id.contains(['/', '\\'])
        {
            return Err(StoreError::Io(io::Error::new(
                ErrorKind::InvalidInput,
                format!("region id '{region_id}' is not a valid file name"),
            )));
        }
        Ok(self.root.join(format!("{region_id}.{EXTENSION}")))
    }

    fn read(&self, region_id: &str) -> Result<RegionFile, StoreError> {
        let path = self.path_for(region_id)?;
        let file = File::open(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(region_id.to_string()),
            _ => StoreError::Io(e),
        })?;
        let region_file: RegionFile = serde_json::from_reader(BufReader::new(file))?;
        region_file.header.validate()?;
        if region_file.header.region_id != region_file.region.region_id {
            return Err(StoreError::InvalidHeader);
        }
        Ok(region_file)
    }

    /// Load only the header of a region file
    pub fn load_header(&self, region_id: &str) -> Result<StoreHeader, StoreError> {
        self.read(region_id).map(|f| f.header)
    }

    pub fn delete_region(&mut self, region_id: &str) -> Result<(), StoreError> {
        let path = self.path_for(region_id)?;
        fs::remove_file(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(region_id.to_string()),
            _ => StoreError::Io(e),
        })
    }
}

impl NodeStore for JsonFileStore {
    fn load_region(&self, region_id: &str) -> Result<RegionGraph, StoreError> {
        let region_file = self.read(region_id)?;
        debug!(region = region_id, nodes = region_file.header.nodes, "region loaded");
        Ok(region_file.region)
    }

    fn save_region(&mut self, graph: &RegionGraph) -> Result<(), StoreError> {
        let path = self.path_for(&graph.region_id)?;
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        let region_file = RegionFile {
            header: StoreHeader::new(graph),
            region: graph.clone(),
        };

        // Write beside the target, then rename over it
        let writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer_pretty(writer, &region_file)?;
        fs::rename(&tmp, &path)?;
        debug!(region = %graph.region_id, path = %path.display(), "region saved");
        Ok(())
    }

    fn region_ids(&self) -> Result<Vec<String>, StoreError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn contains_region(&self, region_id: &str) -> bool {
        self.path_for(region_id).is_ok_and(|p| p.exists())
    }
}
