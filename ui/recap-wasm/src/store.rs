//! Session state wiring for the browser.
//!
//! The form store itself lives in `recap-core`; this module gives it a
//! localStorage backend and a thread-local home (WASM is
//! single-threaded). The picked audio blob stays here: storage only
//! ever sees its metadata.

use recap_core::form::{AudioFileMeta, FormStore, STORAGE_KEY, SnapshotStore};
use recap_core::options::CivilDate;
use std::cell::RefCell;
use std::rc::Rc;

/// Snapshot backend over `window.localStorage`.
#[derive(Default)]
pub struct LocalStore;

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

impl SnapshotStore for LocalStore {
    fn load(&self) -> Option<String> {
        storage()?.get_item(STORAGE_KEY).ok()?
    }

    fn save(&self, raw: &str) {
        if let Some(s) = storage() {
            let _ = s.set_item(STORAGE_KEY, raw);
        }
    }

    fn clear(&self) {
        if let Some(s) = storage() {
            let _ = s.remove_item(STORAGE_KEY);
        }
    }
}

thread_local! {
    static STORE: RefCell<Option<Rc<FormStore<LocalStore>>>> = RefCell::new(None);
    static AUDIO_FILE: RefCell<Option<web_sys::File>> = RefCell::new(None);
}

pub fn init() {
    STORE.with(|slot| *slot.borrow_mut() = Some(Rc::new(FormStore::open(LocalStore, today()))));
}

pub fn form() -> Rc<FormStore<LocalStore>> {
    STORE.with(|slot| slot.borrow().clone().unwrap())
}

pub fn today() -> CivilDate {
    let now = js_sys::Date::new_0();
    // JS months are zero-based.
    CivilDate::new(now.get_full_year() as i32, now.get_month() as u8 + 1)
}

/// Hold the picked blob and mirror its metadata into the form state.
pub fn set_audio(file: Option<web_sys::File>) {
    let meta = file.as_ref().map(|f| AudioFileMeta {
        name: f.name(),
        size: f.size() as u64,
    });
    AUDIO_FILE.with(|slot| *slot.borrow_mut() = file);
    form().set_file(meta);
}

pub fn audio_file() -> Option<web_sys::File> {
    AUDIO_FILE.with(|slot| slot.borrow().clone())
}
