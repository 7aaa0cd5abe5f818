use crate::options::{self, CivilDate, SelectOption};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

pub const STORAGE_KEY: &str = "recap_form_state";

/// What the wizard knows about the attached audio track. The blob
/// itself stays with whoever picked it; only metadata crosses here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFileMeta {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub phone_number: String,
    pub country_code: String,
    pub otp_session: String,
    pub otp_code: String,
    pub token: String,
    pub bereal_token: String,
    pub year: Option<SelectOption>,
    pub file: Option<AudioFileMeta>,
    pub disable_music: bool,
    pub display_date: bool,
    pub mode: Option<SelectOption>,
    pub task_id: String,
    pub video_filename: String,
}

impl FormState {
    fn fresh(today: CivilDate) -> Self {
        Self {
            phone_number: String::new(),
            country_code: String::new(),
            otp_session: String::new(),
            otp_code: String::new(),
            token: String::new(),
            bereal_token: String::new(),
            year: options::default_year(today),
            file: None,
            disable_music: false,
            display_date: false,
            mode: options::default_mode(),
            task_id: String::new(),
            video_filename: String::new(),
        }
    }

    /// Country calling code and subscriber number, concatenated the way
    /// the service expects its `phone` fields.
    pub fn full_phone(&self) -> String {
        format!("{}{}", self.country_code, self.phone_number)
    }
}

// Persisted mirror of FormState. The audio file is deliberately absent
// and every field is optional so old snapshots still parse.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Snapshot {
    phone_number: String,
    country_code: String,
    otp_session: String,
    otp_code: String,
    token: String,
    bereal_token: String,
    year: Option<SelectOption>,
    disable_music: bool,
    display_date: bool,
    mode: Option<SelectOption>,
    task_id: String,
    video_filename: String,
}

impl Snapshot {
    fn of(state: &FormState) -> Self {
        Self {
            phone_number: state.phone_number.clone(),
            country_code: state.country_code.clone(),
            otp_session: state.otp_session.clone(),
            otp_code: state.otp_code.clone(),
            token: state.token.clone(),
            bereal_token: state.bereal_token.clone(),
            year: state.year.clone(),
            disable_music: state.disable_music,
            display_date: state.display_date,
            mode: state.mode.clone(),
            task_id: state.task_id.clone(),
            video_filename: state.video_filename.clone(),
        }
    }
}

/// Durable home for one serialized snapshot.
pub trait SnapshotStore {
    fn load(&self) -> Option<String>;
    fn save(&self, raw: &str);
    fn clear(&self);
}

/// In-memory backend. Clones share the slot, which lets tests keep a
/// handle on storage that outlives the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    fn save(&self, raw: &str) {
        *self.slot.borrow_mut() = Some(raw.to_owned());
    }

    fn clear(&self) {
        *self.slot.borrow_mut() = None;
    }
}

struct Inner<S> {
    state: FormState,
    backend: S,
    today: CivilDate,
}

/// One wizard session. Every setter writes through to the backend so a
/// reload resumes mid-flow; stale year/mode values from old snapshots
/// are dropped rather than trusted.
pub struct FormStore<S: SnapshotStore> {
    inner: RefCell<Inner<S>>,
}

impl<S: SnapshotStore> FormStore<S> {
    pub fn open(backend: S, today: CivilDate) -> Self {
        let state = match backend.load() {
            Some(raw) => Self::restore(&raw, today),
            None => FormState::fresh(today),
        };
        let store = Self {
            inner: RefCell::new(Inner {
                state,
                backend,
                today,
            }),
        };
        // Write the reconciled state back so storage never holds a
        // snapshot newer code cannot parse.
        store.persist();
        store
    }

    fn restore(raw: &str, today: CivilDate) -> FormState {
        let Ok(snapshot) = serde_json::from_str::<Snapshot>(raw) else {
            return FormState::fresh(today);
        };
        let years = options::year_options(today, options::YEAR_WINDOW);
        let modes = options::mode_options();
        FormState {
            phone_number: snapshot.phone_number,
            country_code: snapshot.country_code,
            otp_session: snapshot.otp_session,
            otp_code: snapshot.otp_code,
            token: snapshot.token,
            bereal_token: snapshot.bereal_token,
            year: snapshot
                .year
                .and_then(|year| options::find_by_value(&years, &year.value)),
            file: None,
            disable_music: snapshot.disable_music,
            display_date: snapshot.display_date,
            mode: snapshot
                .mode
                .and_then(|mode| options::find_by_value(&modes, &mode.value)),
            task_id: snapshot.task_id,
            video_filename: snapshot.video_filename,
        }
    }

    pub fn state(&self) -> FormState {
        self.inner.borrow().state.clone()
    }

    pub fn set_phone_number(&self, value: impl Into<String>) {
        let value = value.into();
        self.update(|state| state.phone_number = value);
    }

    pub fn set_country_code(&self, value: impl Into<String>) {
        let value = value.into();
        self.update(|state| state.country_code = value);
    }

    pub fn set_otp_session(&self, value: impl Into<String>) {
        let value = value.into();
        self.update(|state| state.otp_session = value);
    }

    pub fn set_otp_code(&self, value: impl Into<String>) {
        let value = value.into();
        self.update(|state| state.otp_code = value);
    }

    pub fn set_token(&self, value: impl Into<String>) {
        let value = value.into();
        self.update(|state| state.token = value);
    }

    pub fn set_bereal_token(&self, value: impl Into<String>) {
        let value = value.into();
        self.update(|state| state.bereal_token = value);
    }

    pub fn set_year(&self, year: Option<SelectOption>) {
        self.update(|state| state.year = year);
    }

    pub fn set_file(&self, file: Option<AudioFileMeta>) {
        self.update(|state| state.file = file);
    }

    pub fn set_disable_music(&self, on: bool) {
        self.update(|state| state.disable_music = on);
    }

    pub fn set_display_date(&self, on: bool) {
        self.update(|state| state.display_date = on);
    }

    pub fn set_mode(&self, mode: Option<SelectOption>) {
        self.update(|state| state.mode = mode);
    }

    pub fn set_task_id(&self, value: impl Into<String>) {
        let value = value.into();
        self.update(|state| state.task_id = value);
    }

    pub fn set_video_filename(&self, value: impl Into<String>) {
        let value = value.into();
        self.update(|state| state.video_filename = value);
    }

    /// Drop the whole session: fresh defaults, storage rewritten.
    pub fn reset(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.backend.clear();
        inner.state = FormState::fresh(inner.today);
        Self::persist_inner(&inner);
    }

    fn update(&self, apply: impl FnOnce(&mut FormState)) {
        let mut inner = self.inner.borrow_mut();
        apply(&mut inner.state);
        Self::persist_inner(&inner);
    }

    fn persist(&self) {
        Self::persist_inner(&self.inner.borrow());
    }

    fn persist_inner(inner: &Inner<S>) {
        if let Ok(raw) = serde_json::to_string(&Snapshot::of(&inner.state)) {
            inner.backend.save(&raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn august() -> CivilDate {
        CivilDate::new(2026, 8)
    }

    fn march() -> CivilDate {
        CivilDate::new(2026, 3)
    }

    #[test]
    fn fresh_store_picks_seasonal_defaults() {
        let store = FormStore::open(MemoryStore::default(), august());
        let state = store.state();
        assert_eq!(state.phone_number, "");
        assert_eq!(state.year.unwrap().value, "2026");
        assert_eq!(state.mode.unwrap().value, options::MODE_CLASSIC);
        assert!(!state.disable_music);
        assert!(!state.display_date);

        let store = FormStore::open(MemoryStore::default(), march());
        assert_eq!(store.state().year.unwrap().value, "2025");
    }

    #[test]
    fn setters_write_through_to_the_backend() {
        let backend = MemoryStore::default();
        let store = FormStore::open(backend.clone(), august());

        store.set_country_code("1");
        store.set_phone_number("5551234567");

        let raw = backend.raw().unwrap();
        assert!(raw.contains("\"phoneNumber\":\"5551234567\""));
        assert!(raw.contains("\"countryCode\":\"1\""));
    }

    #[test]
    fn audio_metadata_never_reaches_storage() {
        let backend = MemoryStore::default();
        let store = FormStore::open(backend.clone(), august());

        store.set_file(Some(AudioFileMeta {
            name: "track.mp3".into(),
            size: 1024,
        }));

        assert!(store.state().file.is_some());
        let raw = backend.raw().unwrap();
        assert!(!raw.contains("track.mp3"));
        assert!(!raw.contains("\"file\""));
    }

    #[test]
    fn reopening_restores_everything_but_the_file() {
        let backend = MemoryStore::default();
        {
            let store = FormStore::open(backend.clone(), august());
            store.set_country_code("1");
            store.set_phone_number("5551234567");
            store.set_otp_session("sess-1");
            store.set_token("tok");
            store.set_bereal_token("brt");
            store.set_display_date(true);
            store.set_task_id("task-9");
            store.set_file(Some(AudioFileMeta {
                name: "track.mp3".into(),
                size: 1024,
            }));
        }

        let store = FormStore::open(backend, august());
        let state = store.state();
        assert_eq!(state.full_phone(), "15551234567");
        assert_eq!(state.otp_session, "sess-1");
        assert_eq!(state.token, "tok");
        assert_eq!(state.bereal_token, "brt");
        assert!(state.display_date);
        assert_eq!(state.task_id, "task-9");
        assert_eq!(state.file, None);
    }

    #[test]
    fn stale_year_and_mode_become_none_on_restore() {
        let backend = MemoryStore::default();
        backend.save(
            r#"{"phoneNumber":"5551234567","year":{"value":"1999","label":"1999"},"mode":{"value":"imax","label":"IMAX"}}"#,
        );

        let store = FormStore::open(backend, august());
        let state = store.state();
        assert_eq!(state.phone_number, "5551234567");
        assert_eq!(state.year, None);
        assert_eq!(state.mode, None);
    }

    #[test]
    fn current_year_and_known_mode_survive_restore() {
        let backend = MemoryStore::default();
        backend.save(
            r#"{"year":{"value":"2025","label":"2025"},"mode":{"value":"classic","label":"Classic (30 seconds)"}}"#,
        );

        let store = FormStore::open(backend, august());
        let state = store.state();
        assert_eq!(state.year.unwrap().value, "2025");
        assert_eq!(state.mode.unwrap().value, options::MODE_CLASSIC);
    }

    #[test]
    fn malformed_snapshot_falls_back_to_defaults() {
        let backend = MemoryStore::default();
        backend.save("{not json");

        let store = FormStore::open(backend.clone(), august());
        let state = store.state();
        assert_eq!(state.phone_number, "");
        assert_eq!(state.year.unwrap().value, "2026");
        // The bad snapshot was replaced by a parseable one.
        assert!(backend.raw().unwrap().starts_with('{'));
    }

    #[test]
    fn reset_clears_state_and_storage() {
        let backend = MemoryStore::default();
        let store = FormStore::open(backend.clone(), august());
        store.set_phone_number("5551234567");
        store.set_task_id("task-9");

        store.reset();

        let state = store.state();
        assert_eq!(state.phone_number, "");
        assert_eq!(state.task_id, "");
        assert_eq!(state.year.unwrap().value, "2026");
        assert!(!backend.raw().unwrap().contains("task-9"));

        // A later visit starts from the same defaults.
        let state = FormStore::open(backend, august()).state();
        assert_eq!(state.phone_number, "");
        assert_eq!(state.mode.unwrap().value, options::MODE_CLASSIC);
    }
}
