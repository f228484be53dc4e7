//! fontlease-core - Core library for the fontlease application
//!
//! This library provides the session-scoped font registration machinery:
//! the platform adapter over the live OS font table, the collection
//! extractor, the registration ledger that owns the session temporary
//! area, and the close-behavior session controller.

use std::path::PathBuf;
use thiserror::Error;

pub use extract::is_container;
pub use ledger::{FontEntry, Ledger};
pub use platform::{platform_support_enabled, system_font_table, FontTable};
pub use session::{CloseAction, ClosePreference, SessionController, SessionState};

/// Failure to bring one font under session registration.
///
/// Per-item and non-fatal: a batch of registrations reports one of these
/// per offending file and keeps going.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read font collection {}: {reason}", .path.display())]
    ContainerUnreadable { path: PathBuf, reason: String },

    #[error("cannot extract font #{index} from {}: {reason}", .path.display())]
    ExtractFailed {
        path: PathBuf,
        index: u32,
        reason: String,
    },

    #[error("system refused to register {display_name} ({})", .path.display())]
    RegistrationRefused {
        display_name: String,
        path: PathBuf,
    },
}

impl LoadError {
    /// The file the failure should be reported against.
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::ContainerUnreadable { path, .. }
            | LoadError::ExtractFailed { path, .. }
            | LoadError::RegistrationRefused { path, .. } => path,
        }
    }
}

/// Failure to release one registered font.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("system refused to unregister {display_name} ({})", .path.display())]
    UnregisterRefused {
        display_name: String,
        path: PathBuf,
    },

    #[error("released {display_name} but could not delete {}: {reason}", .path.display())]
    RemoveFileFailed {
        display_name: String,
        path: PathBuf,
        reason: String,
    },
}

/// Aggregate cleanup failure at session teardown.
///
/// Carries the temporary directory path so the user can be told exactly
/// what may have been leaked. Teardown never blocks process exit.
#[derive(Error, Debug)]
#[error("session cleanup incomplete; leftover files may remain in {}", .dir.display())]
pub struct TeardownError {
    pub dir: PathBuf,
    pub release_errors: Vec<ReleaseError>,
    pub remove_error: Option<String>,
}

/// Adapter boundary over the operating system's font table.
pub mod platform {
    use std::path::Path;
    use std::sync::Arc;

    /// Live OS font table for this process/session.
    ///
    /// Both operations report failure as `false` and never panic for
    /// normal failure modes (invalid format, locked file, unknown path).
    /// `unregister` must tolerate a path whose file is already gone.
    pub trait FontTable: Send + Sync {
        fn register(&self, path: &Path) -> bool;
        fn unregister(&self, path: &Path) -> bool;
    }

    /// Whether this build carries a real platform backend.
    pub fn platform_support_enabled() -> bool {
        cfg!(any(target_os = "windows", target_os = "macos"))
    }

    /// The platform-backed font table.
    pub fn system_font_table() -> Arc<dyn FontTable> {
        Arc::new(SystemFontTable::new())
    }

    #[derive(Debug, Default)]
    pub struct SystemFontTable;

    impl SystemFontTable {
        pub fn new() -> Self {
            Self
        }
    }

    impl FontTable for SystemFontTable {
        fn register(&self, path: &Path) -> bool {
            imp::register(path)
        }

        fn unregister(&self, path: &Path) -> bool {
            imp::unregister(path)
        }
    }

    #[cfg(target_os = "windows")]
    mod imp {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;
        use std::path::Path;

        #[link(name = "gdi32")]
        extern "system" {
            fn AddFontResourceW(filename: *const u16) -> i32;
            fn RemoveFontResourceW(filename: *const u16) -> i32;
        }

        fn wide(path: &Path) -> Vec<u16> {
            OsStr::new(path)
                .encode_wide()
                .chain(std::iter::once(0))
                .collect()
        }

        pub fn register(path: &Path) -> bool {
            let name = wide(path);
            unsafe { AddFontResourceW(name.as_ptr()) != 0 }
        }

        pub fn unregister(path: &Path) -> bool {
            let name = wide(path);
            unsafe { RemoveFontResourceW(name.as_ptr()) != 0 }
        }
    }

    #[cfg(target_os = "macos")]
    mod imp {
        use std::ffi::c_void;
        use std::os::unix::ffi::OsStrExt;
        use std::path::Path;

        type CFIndex = isize;
        type CFAllocatorRef = *const c_void;
        type CFURLRef = *const c_void;
        type CFErrorRef = *mut c_void;

        // kCTFontManagerScopeProcess
        const SCOPE_PROCESS: CFIndex = 1;

        #[link(name = "CoreFoundation", kind = "framework")]
        extern "C" {
            fn CFURLCreateFromFileSystemRepresentation(
                allocator: CFAllocatorRef,
                buffer: *const u8,
                buffer_length: CFIndex,
                is_directory: bool,
            ) -> CFURLRef;
            fn CFRelease(cf: *const c_void);
        }

        #[link(name = "CoreText", kind = "framework")]
        extern "C" {
            fn CTFontManagerRegisterFontsForURL(
                font_url: CFURLRef,
                scope: CFIndex,
                error: *mut CFErrorRef,
            ) -> bool;
            fn CTFontManagerUnregisterFontsForURL(
                font_url: CFURLRef,
                scope: CFIndex,
                error: *mut CFErrorRef,
            ) -> bool;
        }

        fn with_url(path: &Path, op: impl FnOnce(CFURLRef) -> bool) -> bool {
            let bytes = path.as_os_str().as_bytes();
            let url = unsafe {
                CFURLCreateFromFileSystemRepresentation(
                    std::ptr::null(),
                    bytes.as_ptr(),
                    bytes.len() as CFIndex,
                    false,
                )
            };
            if url.is_null() {
                return false;
            }
            let ok = op(url);
            unsafe { CFRelease(url) };
            ok
        }

        pub fn register(path: &Path) -> bool {
            with_url(path, |url| unsafe {
                CTFontManagerRegisterFontsForURL(url, SCOPE_PROCESS, std::ptr::null_mut())
            })
        }

        pub fn unregister(path: &Path) -> bool {
            with_url(path, |url| unsafe {
                CTFontManagerUnregisterFontsForURL(url, SCOPE_PROCESS, std::ptr::null_mut())
            })
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    mod imp {
        use std::path::Path;
        use std::sync::Once;

        static WARN_ONCE: Once = Once::new();

        fn warn_unsupported() {
            WARN_ONCE.call_once(|| {
                log::warn!("session font registration is not supported on this platform");
            });
        }

        pub fn register(_path: &Path) -> bool {
            warn_unsupported();
            false
        }

        pub fn unregister(_path: &Path) -> bool {
            warn_unsupported();
            false
        }
    }
}

/// Best-effort font metadata access.
pub mod metadata {
    use read_fonts::types::NameId;
    use read_fonts::{FontRef, TableProvider};
    use std::path::Path;

    const NAME_PREFERENCE: [NameId; 3] = [
        NameId::FULL_NAME,
        NameId::POSTSCRIPT_NAME,
        NameId::FAMILY_NAME,
    ];

    /// Read the human-readable name record of a single font file.
    ///
    /// Absence or parse failure yields `None`; callers degrade the
    /// recorded name instead of failing the operation.
    pub fn read_display_name(path: &Path) -> Option<String> {
        let data = std::fs::read(path).ok()?;
        display_name_from_bytes(&data)
    }

    pub fn display_name_from_bytes(data: &[u8]) -> Option<String> {
        let font = FontRef::new(data).ok()?;
        let name = font.name().ok()?;
        let storage = name.string_data();

        for id in NAME_PREFERENCE {
            for record in name.name_record().iter().filter(|r| r.name_id() == id) {
                if let Ok(value) = record.string(storage) {
                    let value = value.to_string();
                    if !value.is_empty() {
                        return Some(value);
                    }
                }
            }
        }

        None
    }
}

/// Expansion of multi-font container files into standalone fonts.
pub mod extract {
    use crate::LoadError;
    use read_fonts::types::Tag;
    use read_fonts::{CollectionRef, FontRef};
    use std::fs;
    use std::path::{Path, PathBuf};
    use uuid::Uuid;

    /// Container classification is by extension, never content sniffing.
    pub const CONTAINER_EXTENSIONS: &[&str] = &["ttc", "otc"];

    const HEADER_LEN: usize = 12;
    const RECORD_LEN: usize = 16;
    const OTTO: u32 = 0x4F54_544F;
    const HEAD: Tag = Tag::new(b"head");
    const CHECKSUM_TARGET: u32 = 0xB1B0_AFBA;

    pub fn is_container(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| CONTAINER_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }

    /// Materialize every font embedded in `container` as an independent
    /// file under `out_dir`, named with a fresh UUID.
    ///
    /// An unreadable container is a single error for the container path.
    /// A failure for one embedded font does not abort the others; each
    /// member gets its own outcome in the returned sequence.
    pub fn expand(
        container: &Path,
        out_dir: &Path,
    ) -> Result<Vec<Result<PathBuf, LoadError>>, LoadError> {
        let unreadable = |reason: String| LoadError::ContainerUnreadable {
            path: container.to_path_buf(),
            reason,
        };

        let data = fs::read(container).map_err(|e| unreadable(e.to_string()))?;
        let collection = CollectionRef::new(&data).map_err(|e| unreadable(e.to_string()))?;

        let mut produced = Vec::with_capacity(collection.len() as usize);
        for index in 0..collection.len() {
            produced.push(extract_member(container, &collection, index, out_dir));
        }
        Ok(produced)
    }

    fn extract_member(
        container: &Path,
        collection: &CollectionRef,
        index: u32,
        out_dir: &Path,
    ) -> Result<PathBuf, LoadError> {
        let failed = |reason: String| LoadError::ExtractFailed {
            path: container.to_path_buf(),
            index,
            reason,
        };

        let font = collection.get(index).map_err(|e| failed(e.to_string()))?;
        let bytes = standalone_font_bytes(&font).map_err(|reason| failed(reason))?;

        let extension = if font.table_directory.sfnt_version() == OTTO {
            "otf"
        } else {
            "ttf"
        };
        let out_path = out_dir.join(format!("{}.{extension}", Uuid::new_v4()));
        fs::write(&out_path, bytes).map_err(|e| failed(e.to_string()))?;
        Ok(out_path)
    }

    /// Serialize one member of a collection as a self-contained sfnt:
    /// fresh header, retargeted table directory, table data verbatim,
    /// `head` checksum adjustment recomputed for the new file.
    pub fn standalone_font_bytes(font: &FontRef) -> Result<Vec<u8>, String> {
        let records = font.table_directory.table_records();
        let num_tables = records.len();
        if num_tables == 0 {
            return Err("font contains no tables".to_string());
        }

        let mut tables = Vec::with_capacity(num_tables);
        for record in records {
            let tag = record.tag();
            let data = font
                .table_data(tag)
                .ok_or_else(|| format!("missing data for table {tag}"))?;
            tables.push((tag, record.checksum(), data.as_bytes()));
        }

        let directory_len = HEADER_LEN + RECORD_LEN * num_tables;
        let total_len = directory_len
            + tables
                .iter()
                .map(|(_, _, data)| padded_len(data.len()))
                .sum::<usize>();
        let mut out = Vec::with_capacity(total_len);

        let entry_selector = usize::BITS - 1 - num_tables.leading_zeros();
        let search_range = (1usize << entry_selector) * 16;

        out.extend_from_slice(&font.table_directory.sfnt_version().to_be_bytes());
        out.extend_from_slice(&(num_tables as u16).to_be_bytes());
        out.extend_from_slice(&(search_range as u16).to_be_bytes());
        out.extend_from_slice(&(entry_selector as u16).to_be_bytes());
        out.extend_from_slice(&((num_tables * 16 - search_range) as u16).to_be_bytes());

        let mut offset = directory_len;
        let mut head_offset = None;
        for (tag, checksum, data) in &tables {
            if *tag == HEAD {
                head_offset = Some(offset);
            }
            out.extend_from_slice(&tag.to_be_bytes());
            out.extend_from_slice(&checksum.to_be_bytes());
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            offset += padded_len(data.len());
        }

        for (_, _, data) in &tables {
            out.extend_from_slice(data);
            out.resize(padded_len(out.len()), 0);
        }

        if let Some(head) = head_offset {
            if head + 12 <= out.len() {
                out[head + 8..head + 12].fill(0);
                let adjustment = CHECKSUM_TARGET.wrapping_sub(file_checksum(&out));
                out[head + 8..head + 12].copy_from_slice(&adjustment.to_be_bytes());
            }
        }

        Ok(out)
    }

    fn padded_len(len: usize) -> usize {
        (len + 3) & !3
    }

    fn file_checksum(data: &[u8]) -> u32 {
        let mut sum = 0u32;
        for chunk in data.chunks(4) {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            sum = sum.wrapping_add(u32::from_be_bytes(word));
        }
        sum
    }
}

/// The authoritative record of currently registered fonts.
pub mod ledger {
    use crate::platform::FontTable;
    use crate::{extract, metadata, LoadError, ReleaseError, TeardownError};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Recorded when the name table gives us nothing usable.
    pub const FALLBACK_DISPLAY_NAME: &str = "Unknown";

    /// One currently registered font.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FontEntry {
        /// Best-effort human-readable name.
        pub display_name: String,
        /// Absolute path of the file registered with the OS.
        pub source_path: PathBuf,
        /// True iff the file lives in the session temp area and must be
        /// deleted on release.
        pub owned: bool,
    }

    /// Ordered collection of registered fonts, insertion order preserved.
    ///
    /// Owns the session temporary area; every extracted font file lives
    /// there and nowhere else. Teardown releases every entry and removes
    /// the directory.
    pub struct Ledger {
        table: Arc<dyn FontTable>,
        entries: Vec<FontEntry>,
        temp: Option<TempDir>,
        temp_path: PathBuf,
    }

    impl Ledger {
        pub fn new(table: Arc<dyn FontTable>) -> std::io::Result<Self> {
            let temp = tempfile::Builder::new().prefix("fontlease-").tempdir()?;
            let temp_path = temp.path().to_path_buf();
            log::debug!("session temp area at {}", temp_path.display());
            Ok(Self {
                table,
                entries: Vec::new(),
                temp: Some(temp),
                temp_path,
            })
        }

        pub fn entries(&self) -> &[FontEntry] {
            &self.entries
        }

        pub fn len(&self) -> usize {
            self.entries.len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }

        pub fn temp_dir(&self) -> &Path {
            &self.temp_path
        }

        pub fn is_registered(&self, path: &Path) -> bool {
            self.entries.iter().any(|e| e.source_path == path)
        }

        /// Bring the font(s) at `path` under session registration.
        ///
        /// A container path expands one level and yields one outcome per
        /// embedded font; none short-circuits the others. A plain font
        /// path yields exactly one outcome. Registering a path that is
        /// already live is a success no-op returning the existing entry.
        pub fn register(&mut self, path: &Path) -> Vec<Result<FontEntry, LoadError>> {
            let path = absolute(path);
            if !extract::is_container(&path) {
                return vec![self.register_single(path)];
            }

            let produced = match extract::expand(&path, &self.temp_path) {
                Ok(produced) => produced,
                Err(err) => return vec![Err(err)],
            };

            // Extracted fonts are never themselves containers; exactly
            // one level of expansion.
            produced
                .into_iter()
                .map(|item| item.and_then(|font_path| self.register_single(font_path)))
                .collect()
        }

        fn register_single(&mut self, path: PathBuf) -> Result<FontEntry, LoadError> {
            if let Some(existing) = self.entries.iter().find(|e| e.source_path == path) {
                log::debug!("{} already registered", path.display());
                return Ok(existing.clone());
            }

            let display_name = metadata::read_display_name(&path)
                .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string());

            if !self.table.register(&path) {
                return Err(LoadError::RegistrationRefused { display_name, path });
            }

            let entry = FontEntry {
                display_name,
                owned: path.starts_with(&self.temp_path),
                source_path: path,
            };
            self.entries.push(entry.clone());
            Ok(entry)
        }

        /// Release the entry for `source`, if live.
        ///
        /// A refused unregister keeps the entry in the ledger so it stays
        /// visible and can be retried. After a successful unregister the
        /// entry is gone for good: a failure to delete an owned backing
        /// file is reported but does not resurrect the entry.
        pub fn release(&mut self, source: &Path) -> Result<(), ReleaseError> {
            let Some(index) = self.entries.iter().position(|e| e.source_path == source) else {
                return Ok(());
            };

            if !self.table.unregister(source) {
                let entry = &self.entries[index];
                return Err(ReleaseError::UnregisterRefused {
                    display_name: entry.display_name.clone(),
                    path: entry.source_path.clone(),
                });
            }

            let entry = self.entries.remove(index);
            if entry.owned {
                if let Err(err) = fs::remove_file(&entry.source_path) {
                    return Err(ReleaseError::RemoveFileFailed {
                        display_name: entry.display_name,
                        path: entry.source_path,
                        reason: err.to_string(),
                    });
                }
            }
            Ok(())
        }

        /// Release every entry, last registered first.
        ///
        /// Runs to completion over the whole set; failures are collected,
        /// never retried and never abandoned partway.
        pub fn release_all(&mut self) -> Vec<ReleaseError> {
            let order: Vec<PathBuf> = self
                .entries
                .iter()
                .rev()
                .map(|e| e.source_path.clone())
                .collect();

            let mut failures = Vec::new();
            for path in order {
                if let Err(err) = self.release(&path) {
                    failures.push(err);
                }
            }
            failures
        }

        /// Release everything and remove the session temp area.
        ///
        /// The one cleanup path that must never swallow a failure: any
        /// leaked registration or leftover file is reported through the
        /// returned error, which names the directory.
        pub fn teardown(&mut self) -> Result<(), TeardownError> {
            let release_errors = self.release_all();
            let remove_error = match self.temp.take() {
                Some(dir) => dir.close().err().map(|e| e.to_string()),
                None => None,
            };

            if release_errors.is_empty() && remove_error.is_none() {
                Ok(())
            } else {
                Err(TeardownError {
                    dir: self.temp_path.clone(),
                    release_errors,
                    remove_error,
                })
            }
        }
    }

    impl Drop for Ledger {
        fn drop(&mut self) {
            // Exit paths that skipped teardown still unregister; the
            // TempDir cleans its directory itself.
            if self.entries.is_empty() {
                return;
            }
            for failure in self.release_all() {
                log::warn!("cleanup on drop: {failure}");
            }
        }
    }

    fn absolute(path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    }
}

/// Close-intent state machine and session orchestration.
pub mod session {
    use crate::ledger::Ledger;
    use crate::TeardownError;
    use serde::{Deserialize, Serialize};

    /// Persisted close-behavior choice. Missing or corrupt storage loads
    /// as `Ask`.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ClosePreference {
        #[default]
        Ask,
        Hide,
        Terminate,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SessionState {
        Visible,
        ConfirmPending,
        Hidden,
        Terminated,
    }

    /// What the caller should do about a close request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum CloseAction {
        Confirm,
        Hide,
        Terminate,
    }

    /// Owns the ledger and decides what a close request means.
    ///
    /// `Terminated` is absorbing and is the only state in which the
    /// ledger is torn down. Hiding leaves registrations active so other
    /// applications keep seeing the fonts.
    pub struct SessionController {
        ledger: Ledger,
        preference: ClosePreference,
        state: SessionState,
    }

    impl SessionController {
        pub fn new(ledger: Ledger, preference: ClosePreference, start_hidden: bool) -> Self {
            Self {
                ledger,
                preference,
                state: if start_hidden {
                    SessionState::Hidden
                } else {
                    SessionState::Visible
                },
            }
        }

        pub fn ledger(&self) -> &Ledger {
            &self.ledger
        }

        pub fn ledger_mut(&mut self) -> &mut Ledger {
            &mut self.ledger
        }

        pub fn state(&self) -> SessionState {
            self.state
        }

        pub fn preference(&self) -> ClosePreference {
            self.preference
        }

        /// Adopt a remembered choice. Persisting it is the caller's job
        /// and happens before the accompanying transition.
        pub fn set_preference(&mut self, preference: ClosePreference) {
            self.preference = preference;
        }

        /// Evaluate the close preference for a window close request.
        pub fn request_close(&mut self) -> CloseAction {
            match self.preference {
                ClosePreference::Ask => {
                    self.state = SessionState::ConfirmPending;
                    CloseAction::Confirm
                }
                ClosePreference::Hide => {
                    self.hide();
                    CloseAction::Hide
                }
                ClosePreference::Terminate => CloseAction::Terminate,
            }
        }

        /// Back out of a pending confirmation with no side effect.
        pub fn cancel_confirm(&mut self) {
            if self.state == SessionState::ConfirmPending {
                self.state = SessionState::Visible;
            }
        }

        pub fn hide(&mut self) {
            if self.state != SessionState::Terminated {
                self.state = SessionState::Hidden;
            }
        }

        pub fn restore(&mut self) {
            if self.state != SessionState::Terminated {
                self.state = SessionState::Visible;
            }
        }

        /// Enter the absorbing terminal state, tearing the ledger down
        /// exactly once. Repeat calls are no-ops.
        pub fn terminate(&mut self) -> Result<(), TeardownError> {
            if self.state == SessionState::Terminated {
                return Ok(());
            }
            self.state = SessionState::Terminated;
            self.ledger.teardown()
        }
    }
}
