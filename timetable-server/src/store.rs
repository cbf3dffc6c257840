//! JSON file storage for settings and courses.
//!
//! The whole data set lives in memory behind a lock and is written through to
//! `settings.json` and `courses.json` on every change. A change is built on a
//! copy and only swapped in once it has been persisted.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};

use timetable_grid::{Course, CourseDraft, Settings, SettingsInput, Snapshot};

use crate::error::{Error, Result};

const SETTINGS_FILE: &str = "settings.json";
const COURSES_FILE: &str = "courses.json";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct Store {
    settings_path: PathBuf,
    courses_path: PathBuf,
    data: RwLock<Snapshot>,
}

impl Store {
    /// Open the data directory, creating it and any missing file with defaults.
    /// Files that exist but cannot be decoded, and settings that fail
    /// validation, are read as defaults and left as is.
    pub async fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await?;

        let settings_path = dir.join(SETTINGS_FILE);
        let courses_path = dir.join(COURSES_FILE);

        let settings = match load_json::<Settings>(&settings_path).await {
            Some(settings) => match SettingsInput::from(&settings).validate(today()) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!("Ignoring invalid {}: {err}", settings_path.display());
                    Settings::with_defaults(today())
                }
            },
            None => {
                let settings = Settings::with_defaults(today());
                if !fs::try_exists(&settings_path).await? {
                    save_json(&settings_path, &settings).await?;
                }
                settings
            }
        };

        let courses = match load_json(&courses_path).await {
            Some(courses) => courses,
            None => {
                if !fs::try_exists(&courses_path).await? {
                    save_json(&courses_path, &Vec::<Course>::new()).await?;
                }
                Vec::new()
            }
        };

        log::debug!(
            "Loaded {} course(s) from {}",
            courses.len(),
            courses_path.display()
        );

        Ok(Self {
            settings_path,
            courses_path,
            data: RwLock::new(Snapshot { settings, courses }),
        })
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.data.read().await.clone()
    }

    pub async fn settings(&self) -> Settings {
        self.data.read().await.settings.clone()
    }

    pub async fn courses(&self) -> Vec<Course> {
        self.data.read().await.courses.clone()
    }

    pub async fn replace_settings(&self, settings: Settings) -> Result<Settings> {
        let mut data = self.data.write().await;
        save_json(&self.settings_path, &settings).await?;
        data.settings = settings.clone();

        Ok(settings)
    }

    pub async fn create_course(&self, draft: CourseDraft) -> Result<Course> {
        let mut data = self.data.write().await;

        let id = data.courses.iter().map(|course| course.id).max().unwrap_or(0) + 1;
        let course = draft.with_id(id);

        let mut courses = data.courses.clone();
        courses.push(course.clone());
        save_json(&self.courses_path, &courses).await?;
        data.courses = courses;

        Ok(course)
    }

    pub async fn update_course(&self, id: u64, draft: CourseDraft) -> Result<Course> {
        let mut data = self.data.write().await;

        let mut courses = data.courses.clone();
        let slot = courses
            .iter_mut()
            .find(|course| course.id == id)
            .ok_or(Error::NotFound)?;
        *slot = draft.with_id(id);
        let course = slot.clone();

        save_json(&self.courses_path, &courses).await?;
        data.courses = courses;

        Ok(course)
    }

    pub async fn delete_course(&self, id: u64) -> Result<()> {
        let mut data = self.data.write().await;

        if !data.courses.iter().any(|course| course.id == id) {
            return Err(Error::NotFound);
        }

        let courses = data
            .courses
            .iter()
            .filter(|course| course.id != id)
            .cloned()
            .collect::<Vec<_>>();
        save_json(&self.courses_path, &courses).await?;
        data.courses = courses;

        Ok(())
    }

    /// Replace everything with `snapshot`.
    ///
    /// Both files are staged before either is replaced, and the old settings
    /// are written back if the courses cannot be moved into place.
    pub async fn import(&self, snapshot: Snapshot) -> Result<()> {
        let mut data = self.data.write().await;

        let settings_temp = write_temp(&self.settings_path, &snapshot.settings).await?;
        let courses_temp = match write_temp(&self.courses_path, &snapshot.courses).await {
            Ok(temp) => temp,
            Err(err) => {
                discard(&settings_temp).await;
                return Err(err);
            }
        };

        if let Err(err) = fs::rename(&settings_temp, &self.settings_path).await {
            discard(&settings_temp).await;
            discard(&courses_temp).await;
            return Err(err.into());
        }

        if let Err(err) = fs::rename(&courses_temp, &self.courses_path).await {
            log::error!("Import failed, restoring {}", self.settings_path.display());
            discard(&courses_temp).await;
            save_json(&self.settings_path, &data.settings).await?;
            return Err(err.into());
        }

        *data = snapshot;

        Ok(())
    }
}

async fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = fs::read(path).await.ok()?;
    match serde_json::from_slice(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Ignoring unreadable {}: {err}", path.display());
            None
        }
    }
}

/// Write `value` next to `path` as `<path>.tmp` and return the temporary path.
async fn write_temp<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf> {
    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    let temp_path = PathBuf::from(temp_path);

    let mut raw = serde_json::to_vec_pretty(value)?;
    raw.push(b'\n');
    fs::write(&temp_path, raw).await?;

    Ok(temp_path)
}

async fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let temp_path = write_temp(path, value).await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}

async fn discard(temp_path: &Path) {
    if let Err(err) = fs::remove_file(temp_path).await {
        log::debug!("Could not remove {}: {err}", temp_path.display());
    }
}
