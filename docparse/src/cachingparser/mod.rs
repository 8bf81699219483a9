use std::{
    cell::RefCell,
    collections::HashMap,
    ffi::OsString,
    fs::File,
    io::Write,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use engine::table::RawTable;
use serde::{Deserialize, Serialize};

use crate::DocumentParser;


const MAX_TABLES_LRU: NonZeroUsize = NonZeroUsize::new(100).unwrap();
const PERSIST_CACHE_VERSION: &str = "1";
const CACHE_FILE_SUFFIX: &str = ".tables.json";

/// Default location of the cache for `pdf_path`: alongside it, with
/// `.tables.json` appended to the file name.
pub fn default_cache_path(pdf_path: &Path) -> PathBuf {
    let mut name: OsString = pdf_path.as_os_str().to_owned();
    name.push(CACHE_FILE_SUFFIX);
    PathBuf::from(name)
}

/// Wraps a [DocumentParser], persisting its results in a JSON file keyed by
/// the PDF's content and the backend name.
pub struct CachingParser<P> {
    delegate: P,
    cache_path: PathBuf,
    tables_cache: TablesCache,
    force: bool,
}

impl<P> CachingParser<P> {
    /// Loads the cache from `cache_path`. A missing or unreadable cache file
    /// yields an empty cache. With `force`, cached results are never used
    /// but fresh results are still stored.
    pub fn load(delegate: P, cache_path: PathBuf, force: bool) -> Self {
        let tables_cache = TablesCache::new();
        match read_cache_file(&cache_path) {
            Ok(Some(loaded_cache)) => {
                tables_cache.load(loaded_cache.entries.into_iter());
                let num_entries = tables_cache.len();
                log::debug!("Loaded {num_entries} entries from existing tables cache.");
            }
            Ok(None) => {
                log::info!("Did not find existing tables cache.");
            }
            Err(err) => {
                log::warn!("Failed to read existing tables cache: {err:#}");
            }
        };

        Self {
            delegate,
            cache_path,
            tables_cache,
            force,
        }
    }
}

impl<P> DocumentParser for CachingParser<P>
where
    P: DocumentParser,
{
    fn name(&self) -> &'static str {
        self.delegate.name()
    }

    fn parse(&self, pdf_path: &Path) -> Result<Vec<RawTable>> {
        let pdf_hash = hash_file(pdf_path)?;
        let key = TablesCache::key(&pdf_hash, self.delegate.name())?;

        if self.force {
            log::debug!("Ignoring cached tables for {pdf_path:?}.");
        } else if let Some(tables) = self.tables_cache.get(&key) {
            log::info!("Using cached tables for {pdf_path:?}.");
            return Ok(tables);
        }

        let tables = self.delegate.parse(pdf_path)?;
        log::info!(
            "Parsed {} tables from {pdf_path:?} with {}.",
            tables.len(),
            self.delegate.name()
        );

        self.tables_cache.put(key, tables.clone());

        Ok(tables)
    }

    fn close(self: Box<Self>) -> Result<()> {
        let Self {
            delegate,
            cache_path,
            tables_cache,
            ..
        } = *self;
        Box::new(delegate).close()?;
        store_cache_file(&cache_path, tables_cache)
    }
}

fn read_cache_file(cache_path: &Path) -> Result<Option<PersistantCache>> {
    let cache_file = match File::open(cache_path) {
        Ok(cache_file) => cache_file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(None);
        }
        Err(err) => {
            Err(err).with_context(|| format!("opening file {cache_path:?} to read cache"))?
        }
    };
    let cache: PersistantCache = serde_json::from_reader(cache_file)
        .with_context(|| format!("reading cache as JSON from file {cache_path:?}"))?;
    if cache.version != PERSIST_CACHE_VERSION {
        log::info!(
            "Ignoring tables cache with version {:?}, expected {PERSIST_CACHE_VERSION:?}.",
            cache.version
        );
        return Ok(None);
    }
    Ok(Some(cache))
}

fn store_cache_file(cache_path: &Path, tables_cache: TablesCache) -> Result<()> {
    let dumped_cache = PersistantCache {
        version: PERSIST_CACHE_VERSION.to_owned(),
        entries: tables_cache.dump(),
    };

    let mut cache_file = AtomicWriteFile::open(cache_path)
        .with_context(|| format!("opening file {cache_path:?} to write cache"))?;
    serde_json::to_writer(&mut cache_file, &dumped_cache)
        .with_context(|| format!("writing cache as JSON to file {cache_path:?}"))?;
    cache_file
        .commit()
        .with_context(|| format!("committing cache file {cache_path:?}"))?;

    log::debug!("Stored {} entries in tables cache.", dumped_cache.entries.len());
    Ok(())
}

fn hash_file(path: &Path) -> Result<HashDigest> {
    let mut f = File::open(path).with_context(|| format!("opening file {path:?} for hashing"))?;
    let mut hash = HashAlgo::default();
    std::io::copy(&mut f, &mut hash).with_context(|| format!("reading file {path:?} for hashing"))?;
    hash_digest(&mut hash).with_context(|| "generating PDF content hash")
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct PersistantCache {
    version: String,
    entries: HashMap<HashDigest, Vec<RawTable>>,
}

struct TablesCache {
    tables_cache: RefCell<lru::LruCache<HashDigest, Vec<RawTable>>>,
}

impl TablesCache {
    fn new() -> Self {
        Self {
            tables_cache: RefCell::new(lru::LruCache::new(MAX_TABLES_LRU)),
        }
    }

    fn key(pdf_hash: &HashDigest, backend: &str) -> Result<HashDigest> {
        let mut hash = HashAlgo::default();
        std::hash::Hasher::write(&mut hash, &pdf_hash.0);
        std::hash::Hasher::write(&mut hash, backend.as_bytes());
        hash_digest(&mut hash).with_context(|| "generating PDF+backend hash")
    }

    fn len(&self) -> usize {
        self.tables_cache.borrow().len()
    }

    fn load(&self, entries: impl Iterator<Item = (HashDigest, Vec<RawTable>)>) {
        let mut cache = self.tables_cache.borrow_mut();
        for (digest, tables) in entries {
            cache.put(digest, tables);
        }
    }

    fn dump(self) -> HashMap<HashDigest, Vec<RawTable>> {
        self.tables_cache.into_inner().into_iter().collect()
    }

    fn get(&self, digest: &HashDigest) -> Option<Vec<RawTable>> {
        self.tables_cache.borrow_mut().get(digest).cloned()
    }

    fn put(&self, digest: HashDigest, tables: Vec<RawTable>) {
        self.tables_cache.borrow_mut().put(digest, tables);
    }
}

type HashAlgo = sha::sha256::Sha256;

const HASH_DIGEST_LEN: usize = 32;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "HexString")]
struct HashDigest([u8; HASH_DIGEST_LEN]);

impl TryFrom<String> for HashDigest {
    type Error = hex::FromHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let mut digest = HashDigest::default();
        hex::decode_to_slice(value, &mut digest.0)?;
        Ok(digest)
    }
}

#[derive(Serialize)]
struct HexString(String);

impl From<HashDigest> for HexString {
    fn from(value: HashDigest) -> Self {
        HexString(hex::encode(value.0))
    }
}

fn hash_digest(hash: &mut HashAlgo) -> Result<HashDigest> {
    hash.flush().with_context(|| "flushing hash")?;
    let digest_vec = sha::utils::DigestExt::to_bytes(hash);
    let mut digest = HashDigest::default();
    digest.0.copy_from_slice(&digest_vec);
    Ok(digest)
}
