use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::hospital_search::Hospital;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    pub name: String,
    pub phone: String,
}

const SELECTED_HOSPITAL_FILE: &str = "selected_hospital.json";
const USER_DETAILS_FILE: &str = "user_details.json";

/// Carries the selected hospital and the user's details between flow stages
/// (search -> ambulance selection -> driver assignment -> tracking) as JSON
/// documents in the support directory. A missing document means the earlier
/// stage never ran; callers should treat it as a redirect to that stage, not
/// as a fault.
pub struct HandoffStore {
    dir: PathBuf,
}

impl HandoffStore {
    pub fn open(support_dir: &str) -> Result<Self> {
        let dir = Path::new(support_dir).join("handoff/");
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        Ok(HandoffStore { dir })
    }

    pub fn set_selected_hospital(&self, hospital: &Hospital) -> Result<()> {
        self.write(SELECTED_HOSPITAL_FILE, hospital)
    }

    pub fn selected_hospital(&self) -> Result<Option<Hospital>> {
        self.read(SELECTED_HOSPITAL_FILE)
    }

    pub fn set_user_details(&self, user: &UserDetails) -> Result<()> {
        self.write(USER_DETAILS_FILE, user)
    }

    pub fn user_details(&self) -> Result<Option<UserDetails>> {
        self.read(USER_DETAILS_FILE)
    }

    /// Forgets the whole hand-off, e.g. when a journey finishes.
    pub fn clear(&self) -> Result<()> {
        for file in [SELECTED_HOSPITAL_FILE, USER_DETAILS_FILE] {
            let path = self.dir.join(file);
            if path.exists() {
                fs::remove_file(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
            }
        }
        Ok(())
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.dir.join(file);
        let json = serde_json::to_string(value)?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let value = serde_json::from_str(&json)
            .with_context(|| format!("corrupt hand-off data in {}", path.display()))?;
        Ok(Some(value))
    }
}
